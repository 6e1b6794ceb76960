// Regulus Report - Benchmark log reporting pipeline
//
// Copyright (c) 2025 Regulus contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Command-line surface of `regulus-report`.
//!
//! Without a subcommand the binary reports on one directory tree. The
//! `batch` subcommand covers several directories and `schema` exposes the
//! schema catalog.

mod batch;
mod report;
mod schema;

use crate::error::Result;
use clap::Subcommand;

pub use batch::BatchArgs;
pub use report::{PipelineArgs, ReportArgs};
pub use schema::SchemaCommands;

#[derive(Subcommand)]
pub enum Commands {
    /// Report on several directories, one output set each
    Batch(BatchArgs),

    /// Inspect, export, validate and upgrade report schemas
    #[command(subcommand)]
    Schema(SchemaCommands),
}

impl Commands {
    /// Execute the subcommand.
    ///
    /// # Errors
    ///
    /// Returns `Err` for setup problems: unreadable configuration, unknown
    /// formats or schema versions, unwritable summary files, or an invalid
    /// document passed to `schema validate`.
    pub fn execute(self) -> Result<()> {
        match self {
            Commands::Batch(args) => args.execute(),
            Commands::Schema(cmd) => cmd.execute(),
        }
    }
}

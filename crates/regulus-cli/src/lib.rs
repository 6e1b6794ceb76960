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

//! Orchestration and command line for the Regulus report pipeline.
//!
//! - [`orchestrator`]: one directory, sequential or on a worker pool
//! - [`batch`]: several directories with an aggregate summary
//! - [`factory`]: assembled pipelines for common setups
//! - [`config`]: YAML/JSON run configuration
//! - [`cli`]: the `regulus-report` commands
//!
//! # Example
//!
//! ```no_run
//! use regulus_cli::factory::create_multi_format;
//! use std::path::Path;
//!
//! let orchestrator = create_multi_format(&["json", "csv"])?;
//! let outcome = orchestrator.run(Path::new("runs"), Path::new("out/report"))?;
//! println!("{} of {} files processed",
//!     outcome.stats.files_processed, outcome.stats.files_discovered);
//! # Ok::<(), regulus_cli::error::CliError>(())
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod factory;
pub mod orchestrator;

pub use batch::{BatchOrchestrator, BatchSummary, DirectoryResult, DirectoryStatus};
pub use config::{ReportConfig, Strategy};
pub use error::{CliError, Result};
pub use orchestrator::{Orchestrator, Pipeline, RunOptions, RunOutcome, RunStats};

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

use super::report::PipelineArgs;
use crate::batch::BatchOrchestrator;
use crate::error::Result;
use clap::Args;
use std::path::PathBuf;

/// Report on several directories with one pipeline.
///
/// Directories that are missing or fail are recorded in the batch summary;
/// the command itself only fails when the summary cannot be written.
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Directories to process, in order
    #[arg(value_name = "DIRS", num_args = 1.., required = true)]
    pub directories: Vec<PathBuf>,

    /// Output prefix; directory N writes <PREFIX>_N_summary.<ext>
    #[arg(long, default_value = "batch", value_name = "PREFIX")]
    pub prefix: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

impl BatchArgs {
    pub fn execute(self) -> Result<()> {
        let batch = BatchOrchestrator::new(self.pipeline.orchestrator()?);
        let summary = batch.run(&self.directories, &self.prefix)?;
        println!(
            "Batch summary written to {}",
            BatchOrchestrator::summary_path(&self.prefix).display()
        );
        if summary.failed > 0 {
            tracing::warn!(failed = summary.failed, "some directories failed");
        }
        Ok(())
    }
}

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

//! Several directories through one pipeline.
//!
//! Directory `i` (counting from one) writes its outputs at
//! `<prefix>_<i>_summary.<ext>`. Once every directory has run, a
//! `<prefix>_batch_summary.json` records the outcome of each in input order.
//! A directory that fails is recorded and the batch moves on.

use crate::error::{CliError, Result};
use crate::orchestrator::{Orchestrator, RunStats};
use colored::Colorize;
use regulus_report::write_artifact;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

/// How one directory of a batch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryStatus {
    Success,
    Failed,
}

/// Batch summary entry for one directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryResult {
    pub directory: PathBuf,
    pub status: DirectoryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub stats: RunStats,
}

/// Contents of `<prefix>_batch_summary.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub directories: Vec<DirectoryResult>,
    pub successful: usize,
    pub failed: usize,
    pub total: usize,
}

impl BatchSummary {
    fn from_results(directories: Vec<DirectoryResult>) -> Self {
        let successful = directories
            .iter()
            .filter(|d| d.status == DirectoryStatus::Success)
            .count();
        let total = directories.len();
        Self {
            directories,
            successful,
            failed: total - successful,
            total,
        }
    }

    pub fn print(&self, elapsed_secs: f64) {
        println!();
        println!("{}", "═".repeat(60).bright_blue());
        println!("{}", "BATCH PROCESSING SUMMARY".bright_blue().bold());
        println!("{}", "═".repeat(60).bright_blue());
        println!(
            "  {} {}",
            "Successful directories:".green().bold(),
            self.successful.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Failed directories:".red().bold(),
            self.failed.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Total directories:".bright_cyan(),
            self.total.to_string().bright_white()
        );
        if elapsed_secs > 0.0 {
            println!("  {} {:.2}s", "Elapsed:".bright_cyan(), elapsed_secs);
        }
        for entry in self.directories.iter().filter(|d| d.error.is_some()) {
            println!(
                "  {} {}: {}",
                "✗".red().bold(),
                entry.directory.display(),
                entry.error.as_deref().unwrap_or_default()
            );
        }
        println!("{}", "═".repeat(60).bright_blue());
    }
}

/// Runs one orchestrator over several directories.
///
/// The orchestrator, and with it any parse cache, is shared by every
/// directory. Counters start fresh for each one.
pub struct BatchOrchestrator {
    orchestrator: Orchestrator,
    show_summary: bool,
}

impl BatchOrchestrator {
    pub fn new(mut orchestrator: Orchestrator) -> Self {
        let show_summary = orchestrator.options().show_summary;
        orchestrator.options_mut().show_summary = false;
        Self {
            orchestrator,
            show_summary,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Output base for the directory at zero-based `index`.
    pub fn directory_base(prefix: &Path, index: usize) -> PathBuf {
        suffixed(prefix, &format!("_{}_summary", index + 1))
    }

    /// Path of the batch summary document.
    pub fn summary_path(prefix: &Path) -> PathBuf {
        suffixed(prefix, "_batch_summary.json")
    }

    /// Process every directory and write the batch summary.
    ///
    /// # Errors
    ///
    /// Only writing the batch summary itself can fail the batch.
    pub fn run(&self, directories: &[PathBuf], prefix: &Path) -> Result<BatchSummary> {
        let started = Instant::now();
        let mut results = Vec::with_capacity(directories.len());

        for (index, directory) in directories.iter().enumerate() {
            info!(
                directory = %directory.display(),
                current = index + 1,
                total = directories.len(),
                "processing directory"
            );
            let base = Self::directory_base(prefix, index);
            let entry = match self.orchestrator.run(directory, &base) {
                Ok(outcome) => {
                    let failures: Vec<String> = outcome
                        .outputs
                        .failed
                        .iter()
                        .map(|(format, e)| format!("{}: {}", format, e))
                        .collect();
                    DirectoryResult {
                        directory: directory.clone(),
                        status: if failures.is_empty() {
                            DirectoryStatus::Success
                        } else {
                            DirectoryStatus::Failed
                        },
                        output_file: outcome.outputs.written.first().cloned(),
                        error: (!failures.is_empty()).then(|| failures.join("; ")),
                        stats: outcome.stats,
                    }
                }
                Err(e) => {
                    error!(directory = %directory.display(), error = %e, "directory failed");
                    DirectoryResult {
                        directory: directory.clone(),
                        status: DirectoryStatus::Failed,
                        output_file: None,
                        error: Some(e.to_string()),
                        stats: RunStats::default(),
                    }
                }
            };
            results.push(entry);
        }

        let summary = BatchSummary::from_results(results);
        let path = Self::summary_path(prefix);
        let text = serde_json::to_string_pretty(&summary)
            .map_err(|e| CliError::Output(e.to_string()))?;
        write_artifact(&path, &text)?;
        info!(
            path = %path.display(),
            successful = summary.successful,
            failed = summary.failed,
            "wrote batch summary"
        );

        if self.show_summary {
            summary.print(started.elapsed().as_secs_f64());
        }
        Ok(summary)
    }
}

fn suffixed(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = prefix.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::factory::from_config;
    use regulus_core::Clock;
    use regulus_test::{fixtures, TreeBuilder};
    use std::fs;

    fn batch() -> BatchOrchestrator {
        let config = ReportConfig {
            formats: vec!["json".to_string()],
            ..Default::default()
        };
        // A fixed clock zeroes durations so the summary survives a JSON round trip.
        let mut orchestrator = from_config(&config, Clock::Fixed(chrono::Utc::now())).unwrap();
        orchestrator.options_mut().show_summary = false;
        BatchOrchestrator::new(orchestrator)
    }

    #[test]
    fn test_output_naming() {
        let prefix = Path::new("out/nightly");
        assert_eq!(
            BatchOrchestrator::directory_base(prefix, 0),
            PathBuf::from("out/nightly_1_summary")
        );
        assert_eq!(
            BatchOrchestrator::summary_path(prefix),
            PathBuf::from("out/nightly_batch_summary.json")
        );
    }

    #[test]
    fn test_batch_records_each_directory_in_order() {
        let tree = TreeBuilder::new()
            .file("one/result-summary.txt", fixtures::UPERF_SINGLE)
            .file("two/result-summary.txt", fixtures::IPERF)
            .build();
        let out = tempfile::TempDir::new().unwrap();
        let prefix = out.path().join("nightly");
        let dirs = vec![
            tree.path().join("one"),
            tree.path().join("missing"),
            tree.path().join("two"),
        ];

        let summary = batch().run(&dirs, &prefix).unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.directories[1].status, DirectoryStatus::Failed);
        assert!(summary.directories[1]
            .error
            .as_deref()
            .unwrap()
            .contains("does not exist"));
        assert_eq!(summary.directories[2].stats.files_processed, 1);

        assert!(out.path().join("nightly_1_summary.json").exists());
        assert!(!out.path().join("nightly_2_summary.json").exists());
        assert!(out.path().join("nightly_3_summary.json").exists());

        let written: BatchSummary = serde_json::from_str(
            &fs::read_to_string(out.path().join("nightly_batch_summary.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(written, summary);
    }
}

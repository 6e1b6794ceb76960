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

//! Drives one directory through discovery, processing and output.
//!
//! Each discovered file is an independent unit of work: parse, detect the
//! benchmark, fetch its rules, extract and transform. Units run one after
//! another or on a bounded worker pool. Their outcomes are folded into
//! [`RunStats`] at a single collecting point once every unit has finished,
//! so workers never touch shared counters beyond progress reporting.

use crate::config::{ReportConfig, Strategy};
use crate::error::{CliError, Result};
use colored::Colorize;
use rayon::prelude::*;
use regulus_core::{
    detect_benchmark, Clock, ContentParser, DataExtractor, DataTransformer, DiscoveredFile,
    FileDiscovery, FileReport, RuleEngine, DEFAULT_RULESET,
};
use regulus_report::{GenerationSummary, MultiFormatGenerator, RunMetadata};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// The wired components of a report run.
pub struct Pipeline {
    pub discovery: Box<dyn FileDiscovery>,
    pub parser: Box<dyn ContentParser>,
    pub rules: Box<dyn RuleEngine>,
    pub extractor: Box<dyn DataExtractor>,
    pub transformer: Box<dyn DataTransformer>,
    pub outputs: MultiFormatGenerator,
    /// Source of the run timestamp; a fixed clock also zeroes durations
    pub clock: Clock,
}

/// Per-run settings that are not components.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOptions {
    pub pattern: String,
    pub max_depth: usize,
    pub strategy: Strategy,
    pub workers: usize,
    /// Record failed files and keep going instead of aborting
    pub continue_on_error: bool,
    pub git_branch: Option<String>,
    pub execution_label: Option<String>,
    /// Print the processing summary banner
    pub show_summary: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self::from(&ReportConfig::default())
    }
}

impl From<&ReportConfig> for RunOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            pattern: config.pattern.clone(),
            max_depth: config.max_depth,
            strategy: config.strategy,
            workers: config.workers,
            continue_on_error: config.continue_on_error,
            git_branch: config.git_branch.clone(),
            execution_label: config.execution_label.clone(),
            show_summary: true,
        }
    }
}

/// Counters for one directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub files_discovered: usize,
    pub files_processed: usize,
    pub files_failed: usize,
    /// Seconds from discovery to the last processed file
    pub total_duration: f64,
    /// Mean seconds spent per processed file
    pub avg_processing_time: f64,
}

impl RunStats {
    /// Processed share of discovered files in percent.
    pub fn success_rate(&self) -> Option<f64> {
        if self.files_discovered == 0 {
            None
        } else {
            Some(self.files_processed as f64 / self.files_discovered as f64 * 100.0)
        }
    }

    pub fn print_summary(&self) {
        println!();
        println!("{}", "═".repeat(60).bright_blue());
        println!("{}", "PROCESSING SUMMARY".bright_blue().bold());
        println!("{}", "═".repeat(60).bright_blue());
        println!(
            "  {} {}",
            "Files discovered:".bright_cyan(),
            self.files_discovered.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Files processed:".green().bold(),
            self.files_processed.to_string().bright_white()
        );
        println!(
            "  {} {}",
            "Files failed:".red().bold(),
            self.files_failed.to_string().bright_white()
        );
        if let Some(rate) = self.success_rate() {
            println!("  {} {:.1}%", "Success rate:".bright_cyan(), rate);
        }
        if self.total_duration > 0.0 {
            println!(
                "  {} {:.2} seconds",
                "Total duration:".bright_cyan(),
                self.total_duration
            );
            println!(
                "  {} {:.1} ms/file",
                "Average processing time:".bright_cyan(),
                self.avg_processing_time * 1000.0
            );
        }
        println!("{}", "═".repeat(60).bright_blue());
    }
}

/// Everything one run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub stats: RunStats,
    /// One record per discovered file, failed files included
    pub reports: Vec<FileReport>,
    pub outputs: GenerationSummary,
}

/// Outcome of one unit of work.
enum Unit {
    Processed(FileReport, Duration),
    Failed(FileReport),
}

/// Progress logging roughly every tenth of the files, for runs of more
/// than ten files.
struct Progress {
    total: usize,
    done: AtomicUsize,
    interval: usize,
}

impl Progress {
    fn new(total: usize) -> Self {
        Self {
            total,
            done: AtomicUsize::new(0),
            interval: if total > 10 { total / 10 } else { 0 },
        }
    }

    fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if self.interval > 0 && done % self.interval == 0 {
            info!(done, total = self.total, "processing files");
        }
    }
}

/// Runs the pipeline over one directory.
pub struct Orchestrator {
    pipeline: Pipeline,
    options: RunOptions,
}

impl Orchestrator {
    pub fn new(pipeline: Pipeline, options: RunOptions) -> Self {
        Self { pipeline, options }
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut RunOptions {
        &mut self.options
    }

    /// Process every matching file under `root` and write the enabled
    /// formats next to `output`.
    ///
    /// # Errors
    ///
    /// Fails when `root` is not a directory, when the worker pool cannot be
    /// built, or when a file fails while `continue_on_error` is off. Output
    /// failures are logged per format and reported in the outcome.
    pub fn run(&self, root: &Path, output: &Path) -> Result<RunOutcome> {
        if !root.is_dir() {
            return Err(CliError::RootNotFound(root.to_path_buf()));
        }

        let started = Instant::now();
        info!(root = %root.display(), strategy = ?self.options.strategy, "starting report generation");

        let files = self.pipeline.discovery.discover(
            root,
            &self.options.pattern,
            self.options.max_depth,
        );
        info!(count = files.len(), "discovered result files");
        if files.is_empty() {
            warn!(root = %root.display(), pattern = %self.options.pattern, "no files found");
        }

        let units = match self.options.strategy {
            Strategy::Sequential => self.process_sequential(&files)?,
            Strategy::Parallel => self.process_parallel(&files)?,
        };

        let mut stats = RunStats {
            files_discovered: files.len(),
            ..Default::default()
        };
        let mut reports = Vec::with_capacity(units.len());
        let mut busy = Duration::ZERO;
        for unit in units {
            match unit {
                Unit::Processed(report, took) => {
                    stats.files_processed += 1;
                    busy += took;
                    reports.push(report);
                }
                Unit::Failed(report) => {
                    stats.files_failed += 1;
                    reports.push(report);
                }
            }
        }
        stats.total_duration = self.reported_seconds(started.elapsed());
        if stats.files_processed > 0 {
            stats.avg_processing_time =
                self.reported_seconds(busy) / stats.files_processed as f64;
        }

        let meta = RunMetadata::new(self.pipeline.clock.timestamp())
            .with_root(root.display().to_string(), self.options.pattern.clone())
            .with_duration(stats.total_duration)
            .with_git_branch(self.options.git_branch.clone())
            .with_execution_label(self.options.execution_label.clone());
        let outputs = self.pipeline.outputs.generate(&reports, &meta, output);

        if self.options.show_summary {
            stats.print_summary();
        }
        Ok(RunOutcome {
            stats,
            reports,
            outputs,
        })
    }

    /// Parse, extract and transform one file.
    pub fn process_file(&self, file: &DiscoveredFile) -> Result<FileReport> {
        let content = self
            .pipeline
            .parser
            .parse(file)
            .ok_or_else(|| CliError::file_failed(&file.path, "content could not be read"))?;

        let benchmark =
            detect_benchmark(&content).unwrap_or_else(|| DEFAULT_RULESET.to_string());
        let rules = self.pipeline.rules.rules_for(&benchmark);
        let run = self.pipeline.extractor.extract(&content, &rules, file);
        Ok(self.pipeline.transformer.transform(run))
    }

    fn process_unit(&self, file: &DiscoveredFile, progress: &Progress) -> Result<Unit> {
        let started = Instant::now();
        let outcome = self.process_file(file);
        progress.tick();

        match outcome {
            Ok(report) => {
                debug!(path = %file.path.display(), status = %report.status(), "processed file");
                Ok(Unit::Processed(report, started.elapsed()))
            }
            Err(e) if self.options.continue_on_error => {
                warn!(path = %file.path.display(), error = %e, "file failed, continuing");
                Ok(Unit::Failed(FileReport::failed(
                    file,
                    e.to_string(),
                    self.pipeline.clock.timestamp(),
                )))
            }
            Err(e) => Err(e),
        }
    }

    fn process_sequential(&self, files: &[DiscoveredFile]) -> Result<Vec<Unit>> {
        let progress = Progress::new(files.len());
        files
            .iter()
            .map(|file| self.process_unit(file, &progress))
            .collect()
    }

    fn process_parallel(&self, files: &[DiscoveredFile]) -> Result<Vec<Unit>> {
        let workers = self.options.workers.max(1);
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| CliError::ThreadPool(e.to_string()))?;
        info!(workers, "processing files in parallel");

        let progress = Progress::new(files.len());
        pool.install(|| {
            files
                .par_iter()
                .map(|file| self.process_unit(file, &progress))
                .collect()
        })
    }

    /// Wall time as reported; zero under a fixed clock so repeated runs
    /// produce identical documents.
    fn reported_seconds(&self, elapsed: Duration) -> f64 {
        match self.pipeline.clock {
            Clock::Fixed(_) => 0.0,
            Clock::System => elapsed.as_secs_f64(),
        }
    }
}

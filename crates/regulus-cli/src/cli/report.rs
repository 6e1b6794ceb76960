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

//! Flags shared by every report-producing command.

use crate::config::{ReportConfig, Strategy};
use crate::error::Result;
use crate::factory::from_config;
use crate::orchestrator::{Orchestrator, RunOutcome};
use chrono::{DateTime, Utc};
use clap::Args;
use colored::Colorize;
use regulus_core::Clock;
use std::path::PathBuf;

/// Pipeline settings. Each flag overrides the configuration file, which
/// overrides the built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Configuration file (YAML, or JSON by extension)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output formats to generate
    #[arg(short, long, num_args = 1.., value_delimiter = ',', value_name = "FORMAT")]
    pub formats: Option<Vec<String>>,

    /// Base URL that turns CSV file names into hyperlinks
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Result file name pattern
    #[arg(long, value_name = "GLOB")]
    pub pattern: Option<String>,

    /// Maximum directory depth below the root
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Process files on a worker pool
    #[arg(short, long)]
    pub parallel: bool,

    /// Worker threads for --parallel
    #[arg(short, long, value_name = "N")]
    pub workers: Option<usize>,

    /// Re-read every file instead of caching parsed content
    #[arg(long)]
    pub no_cache: bool,

    /// Abort on the first file that cannot be processed
    #[arg(long)]
    pub strict: bool,

    /// Schema version for the JSON report
    #[arg(long, value_name = "VERSION")]
    pub schema_version: Option<String>,

    /// Directory of per-benchmark rule files
    #[arg(long, value_name = "DIR")]
    pub rules_dir: Option<PathBuf>,

    /// Git branch recorded in the report
    #[arg(long, value_name = "BRANCH")]
    pub git_branch: Option<String>,

    /// Execution label recorded in the report
    #[arg(long, value_name = "LABEL")]
    pub execution_label: Option<String>,

    /// Pin the run timestamp (RFC 3339) for reproducible output
    #[arg(long, value_name = "TIME", value_parser = parse_timestamp)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl PipelineArgs {
    /// The configuration file, if any, with flags applied on top.
    pub fn resolve(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::load(path)?,
            None => ReportConfig::default(),
        };

        if let Some(formats) = &self.formats {
            config.formats = formats.iter().map(|f| f.trim().to_lowercase()).collect();
        }
        if let Some(url) = &self.base_url {
            config.base_url = Some(url.clone());
        }
        if let Some(pattern) = &self.pattern {
            config.pattern = pattern.clone();
        }
        if let Some(depth) = self.max_depth {
            config.max_depth = depth;
        }
        if self.parallel {
            config.strategy = Strategy::Parallel;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.no_cache {
            config.cache = false;
        }
        if self.strict {
            config.continue_on_error = false;
        }
        if let Some(version) = &self.schema_version {
            config.schema_version = version.clone();
        }
        if let Some(dir) = &self.rules_dir {
            config.rules_dir = Some(dir.clone());
        }
        if let Some(branch) = &self.git_branch {
            config.git_branch = Some(branch.clone());
        }
        if let Some(label) = &self.execution_label {
            config.execution_label = Some(label.clone());
        }

        config.validate()?;
        Ok(config)
    }

    pub fn clock(&self) -> Clock {
        self.timestamp.map(Clock::Fixed).unwrap_or_default()
    }

    /// Resolve the configuration and assemble the orchestrator.
    pub fn orchestrator(&self) -> Result<Orchestrator> {
        from_config(&self.resolve()?, self.clock())
    }
}

fn parse_timestamp(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

/// Report on one directory tree.
#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Root directory to scan
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    pub root: PathBuf,

    /// Output base path; each format is written as <OUTPUT>.<ext>
    #[arg(short, long, default_value = "report", value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

impl ReportArgs {
    pub fn execute(&self) -> Result<RunOutcome> {
        let orchestrator = self.pipeline.orchestrator()?;
        let outcome = orchestrator.run(&self.root, &self.output)?;

        let produced: Vec<String> = outcome
            .outputs
            .written
            .iter()
            .filter_map(|p| p.extension())
            .map(|e| e.to_string_lossy().into_owned())
            .collect();
        println!("Generated report in formats: {}", produced.join(", "));
        for (format, e) in &outcome.outputs.failed {
            eprintln!("{} {}: {}", "Failed format".red().bold(), format, e);
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: ReportArgs,
    }

    fn parse(argv: &[&str]) -> ReportArgs {
        let mut full = vec!["regulus-report"];
        full.extend_from_slice(argv);
        TestCli::parse_from(full).args
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.output, PathBuf::from("report"));
        assert_eq!(args.pipeline.resolve().unwrap(), ReportConfig::default());
    }

    #[test]
    fn test_formats_accept_lists_and_commas() {
        let spaced = parse(&["--formats", "json", "csv"]);
        let comma = parse(&["--formats", "json,csv"]);
        assert_eq!(spaced.pipeline.resolve().unwrap().formats, vec!["json", "csv"]);
        assert_eq!(comma.pipeline.resolve().unwrap().formats, vec!["json", "csv"]);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("regulus.yaml");
        fs::write(&path, "formats: [html]\nworkers: 8\nbase_url: https://a.example\n").unwrap();
        let config_arg = path.to_string_lossy().into_owned();

        let args = parse(&[
            "--config",
            &config_arg,
            "--workers",
            "2",
            "--parallel",
            "--no-cache",
            "--strict",
        ]);
        let config = args.pipeline.resolve().unwrap();
        assert_eq!(config.formats, vec!["html"]);
        assert_eq!(config.base_url.as_deref(), Some("https://a.example"));
        assert_eq!(config.workers, 2);
        assert_eq!(config.strategy, Strategy::Parallel);
        assert!(!config.cache);
        assert!(!config.continue_on_error);
    }

    #[test]
    fn test_timestamp_pins_clock() {
        let args = parse(&["--timestamp", "2025-01-20T12:00:00Z"]);
        assert_eq!(args.pipeline.clock().timestamp(), "2025-01-20T12:00:00.000000Z");
        assert_eq!(parse(&[]).pipeline.clock(), Clock::System);
    }

    #[test]
    fn test_invalid_format_fails_resolution() {
        assert!(parse(&["--formats", "pdf"]).pipeline.resolve().is_err());
    }
}

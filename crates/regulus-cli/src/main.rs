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

//! Regulus report command line.

use clap::Parser;
use regulus_cli::cli::{Commands, ReportArgs};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Regulus - benchmark result reports
///
/// Scans a directory tree for benchmark result logs and writes JSON, CSV,
/// HTML and XML reports.
///
/// # Examples
///
/// ```bash
/// # Report on the current directory as report.json, report.html, report.csv
/// regulus-report
///
/// # Only JSON and CSV, with hyperlinked file names
/// regulus-report --root runs --output out/nightly --formats json csv \
///     --base-url https://logs.example.com
///
/// # Several directories at once
/// regulus-report batch runs/a runs/b --prefix out/nightly
/// ```
#[derive(Parser)]
#[command(name = "regulus-report")]
#[command(author, version, about = "Regulus - benchmark result reports", long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(flatten)]
    report: ReportArgs,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Warnings and errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = match cli.command {
        Some(command) => command.execute(),
        None => cli.report.execute().map(|_| ()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

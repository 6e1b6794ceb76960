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

//! Structured error types for the Regulus CLI.
//!
//! Only setup problems surface as errors. Per-file failures become failed
//! records in the report unless a strict run asks for them to abort.

use regulus_core::CoreError;
use regulus_report::OutputError;
use regulus_schema::SchemaError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Regulus CLI operations.
///
/// # Examples
///
/// ```rust
/// use regulus_cli::error::CliError;
///
/// let err = CliError::RootNotFound("/no/such/dir".into());
/// assert_eq!(err.to_string(), "Root directory '/no/such/dir' does not exist");
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// The directory to scan is missing or not a directory.
    #[error("Root directory '{}' does not exist", .0.display())]
    RootNotFound(PathBuf),

    /// I/O operation failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// A configuration file could not be read or decoded.
    #[error("Invalid configuration '{path}': {message}")]
    InvalidConfig {
        /// The configuration file
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// A requested output format has no generator.
    #[error("Invalid output format '{0}'. Supported: json, csv, html, xml")]
    InvalidFormat(String),

    /// The worker pool could not be created.
    #[error("Failed to create thread pool: {0}")]
    ThreadPool(String),

    /// A file failed and the run is not allowed to continue past failures.
    #[error("Failed to process '{}': {reason}", .path.display())]
    FileFailed {
        /// The failing file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// Rule loading failed.
    #[error("Rule error: {0}")]
    Rules(String),

    /// Schema lookup, validation or migration failed.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Writing an artifact failed.
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub fn invalid_config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::InvalidConfig {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub fn file_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FileFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(source: CoreError) -> Self {
        Self::Rules(source.to_string())
    }
}

impl From<SchemaError> for CliError {
    fn from(source: SchemaError) -> Self {
        Self::Schema(source.to_string())
    }
}

impl From<OutputError> for CliError {
    fn from(source: OutputError) -> Self {
        match source {
            OutputError::UnknownFormat(name) => Self::InvalidFormat(name),
            other => Self::Output(other.to_string()),
        }
    }
}

/// Result alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

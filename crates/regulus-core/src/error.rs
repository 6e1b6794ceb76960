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

//! Error types for the pipeline stages.
//!
//! Most stages degrade to empty or partial output instead of failing, so the
//! errors here cover the few operations that can be called directly and need
//! to report why they could not complete: reading a capped file, compiling a
//! rule pattern, loading or saving a rule configuration.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the core pipeline stages.
///
/// # Examples
///
/// ```rust
/// use regulus_core::CoreError;
///
/// let err = CoreError::file_too_large("huge.txt", 300, 100);
/// assert!(err.to_string().contains("huge.txt"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// A file could not be read, listed or written.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The underlying error message
        message: String,
    },

    /// A file exceeds the configured read cap.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes")]
    FileTooLarge {
        /// The offending file
        path: PathBuf,
        /// Actual size in bytes
        actual: u64,
        /// Configured cap in bytes
        max: u64,
    },

    /// A rule pattern is not a valid regular expression.
    #[error("Invalid pattern for field '{field}': {message}")]
    InvalidPattern {
        /// Field the rule extracts
        field: String,
        /// Compiler message
        message: String,
    },

    /// A rule configuration file could not be decoded.
    #[error("Rule configuration error in '{path}': {message}")]
    RuleConfig {
        /// Configuration file
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// No rule set is registered under the requested benchmark name.
    #[error("Unknown benchmark rule set: {0}")]
    UnknownBenchmark(String),
}

impl CoreError {
    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a file-too-large error.
    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
        }
    }

    /// Create an invalid-pattern error for a rule field.
    pub fn invalid_pattern(field: impl Into<String>, source: &regex::Error) -> Self {
        Self::InvalidPattern {
            field: field.into(),
            message: source.to_string(),
        }
    }

    /// Create a rule configuration error.
    pub fn rule_config(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::RuleConfig {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = CoreError::io_error(
            "logs/result-summary.txt",
            io::Error::new(io::ErrorKind::NotFound, "file not found"),
        );
        let msg = err.to_string();
        assert!(msg.contains("logs/result-summary.txt"));
        assert!(msg.contains("file not found"));
    }

    #[test]
    fn test_file_too_large_display() {
        let err = CoreError::file_too_large("big.txt", 2048, 1024);
        let msg = err.to_string();
        assert!(msg.contains("big.txt"));
        assert!(msg.contains("2048 bytes"));
        assert!(msg.contains("1024 bytes"));
    }

    #[test]
    fn test_invalid_pattern_display() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let err = CoreError::invalid_pattern("throughput", &regex_err);
        assert!(err.to_string().starts_with("Invalid pattern for field 'throughput'"));
    }

    #[test]
    fn test_unknown_benchmark_display() {
        let err = CoreError::UnknownBenchmark("fio".to_string());
        assert_eq!(err.to_string(), "Unknown benchmark rule set: fio");
    }
}

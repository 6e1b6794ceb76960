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

//! Error types for report generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while rendering or writing a report artifact.
///
/// # Examples
///
/// ```rust
/// use regulus_report::OutputError;
///
/// let err = OutputError::UnknownFormat("pdf".to_string());
/// assert_eq!(err.to_string(), "Unknown output format: pdf");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OutputError {
    /// Writing the artifact failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// CSV encoding failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// XML encoding failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(String),

    /// No generator is registered for the format.
    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

impl OutputError {
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }
}

impl From<csv::Error> for OutputError {
    fn from(source: csv::Error) -> Self {
        Self::Csv(source.to_string())
    }
}

impl From<quick_xml::Error> for OutputError {
    fn from(source: quick_xml::Error) -> Self {
        Self::Xml(source.to_string())
    }
}

impl From<serde_json::Error> for OutputError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json(source.to_string())
    }
}

/// Result alias for report generation.
pub type Result<T> = std::result::Result<T, OutputError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_path() {
        let err = OutputError::io_error(
            "out/report.csv",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing directory"),
        );
        assert_eq!(
            err.to_string(),
            "I/O error for 'out/report.csv': missing directory"
        );
    }

    #[test]
    fn test_json_conversion() {
        let err: OutputError = serde_json::from_str::<u32>("x").unwrap_err().into();
        assert!(matches!(err, OutputError::Json(_)));
    }
}

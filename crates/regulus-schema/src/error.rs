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

//! Error types for schema operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by schema lookup, validation, export and migration.
///
/// # Examples
///
/// ```rust
/// use regulus_schema::SchemaError;
///
/// let err = SchemaError::UnknownVersion("3.0".to_string());
/// assert_eq!(err.to_string(), "Unknown schema version: 3.0");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// No schema is registered under this version.
    #[error("Unknown schema version: {0}")]
    UnknownVersion(String),

    /// No chain of migrations leads from one version to the other.
    #[error("No upgrade path from schema {from} to {to}")]
    NoUpgradePath {
        /// Source version
        from: String,
        /// Target version
        to: String,
    },

    /// The document does not conform to the schema.
    #[error("Schema validation failed: {}", .errors.join("; "))]
    ValidationFailed {
        /// One message per violation, prefixed with its location
        errors: Vec<String>,
    },

    /// A schema or extension has the wrong shape.
    #[error("Invalid schema definition: {0}")]
    InvalidDefinition(String),

    /// Writing a schema file failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// Target path
        path: PathBuf,
        /// Underlying error message
        message: String,
    },

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(String),
}

impl SchemaError {
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Violations carried by a validation failure, empty for other errors.
    pub fn validation_errors(&self) -> &[String] {
        match self {
            Self::ValidationFailed { errors } => errors,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json(source.to_string())
    }
}

/// Result alias for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_display_joins_errors() {
        let err = SchemaError::ValidationFailed {
            errors: vec!["$.a: missing".to_string(), "$.b: wrong type".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Schema validation failed: $.a: missing; $.b: wrong type"
        );
        assert_eq!(err.validation_errors().len(), 2);
    }

    #[test]
    fn test_no_upgrade_path_display() {
        let err = SchemaError::NoUpgradePath {
            from: "2.0".to_string(),
            to: "1.0".to_string(),
        };
        assert_eq!(err.to_string(), "No upgrade path from schema 2.0 to 1.0");
        assert!(err.validation_errors().is_empty());
    }
}

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

//! Run configuration, loadable from YAML or JSON.
//!
//! Command-line flags override file values, which override the defaults.

use crate::error::{CliError, Result};
use regulus_core::{DEFAULT_FILE_PATTERN, DEFAULT_MAX_DEPTH};
use regulus_schema::SchemaVersion;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Formats written when none are configured.
pub const DEFAULT_FORMATS: [&str; 3] = ["json", "html", "csv"];

/// Formats the built-in dispatcher knows.
pub const SUPPORTED_FORMATS: [&str; 4] = ["json", "csv", "html", "xml"];

/// Worker threads for the parallel strategy.
pub const DEFAULT_WORKERS: usize = 4;

/// How the files of one directory are processed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One file after another, in discovery order
    #[default]
    Sequential,
    /// A bounded worker pool
    Parallel,
}

/// Everything a report run can be configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Glob matched against file names
    pub pattern: String,
    pub max_depth: usize,
    pub formats: Vec<String>,
    /// Turns CSV file names into hyperlinks
    pub base_url: Option<String>,
    pub strategy: Strategy,
    pub workers: usize,
    /// Reuse parsed file content while mtimes are unchanged
    pub cache: bool,
    /// Smallest file size in bytes to include
    pub min_size: Option<u64>,
    /// Largest file size in bytes to include
    pub max_size: Option<u64>,
    /// Directory of per-benchmark rule files
    pub rules_dir: Option<PathBuf>,
    pub schema_version: String,
    /// Record per-file extraction time in the report
    pub extraction_timing: bool,
    pub continue_on_error: bool,
    pub git_branch: Option<String>,
    pub execution_label: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_FILE_PATTERN.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
            formats: DEFAULT_FORMATS.iter().map(|s| s.to_string()).collect(),
            base_url: None,
            strategy: Strategy::Sequential,
            workers: DEFAULT_WORKERS,
            cache: true,
            min_size: None,
            max_size: None,
            rules_dir: None,
            schema_version: SchemaVersion::latest().as_str().to_string(),
            extraction_timing: false,
            continue_on_error: true,
            git_branch: None,
            execution_label: None,
        }
    }
}

impl ReportConfig {
    /// Load a configuration file. `.json` files are read as JSON, anything
    /// else as YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))?;
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let config: Self = if is_json {
            serde_json::from_str(&text).map_err(|e| CliError::invalid_config(path, e))?
        } else {
            serde_yaml::from_str(&text).map_err(|e| CliError::invalid_config(path, e))?
        };
        config.validate().map_err(|e| match e {
            CliError::InvalidConfig { message, .. } => CliError::invalid_config(path, message),
            other => other,
        })?;
        Ok(config)
    }

    /// Check values that parse but cannot run.
    pub fn validate(&self) -> Result<()> {
        for format in &self.formats {
            if !SUPPORTED_FORMATS.contains(&format.as_str()) {
                return Err(CliError::InvalidFormat(format.clone()));
            }
        }
        if self.workers == 0 {
            return Err(CliError::invalid_config("", "workers must be at least 1"));
        }
        if let (Some(min), Some(max)) = (self.min_size, self.max_size) {
            if min > max {
                return Err(CliError::invalid_config(
                    "",
                    format!("min_size {} is larger than max_size {}", min, max),
                ));
            }
        }
        Ok(())
    }

    /// Size bounds for discovery, if any were configured.
    pub fn size_range(&self) -> Option<(u64, u64)> {
        match (self.min_size, self.max_size) {
            (None, None) => None,
            (min, max) => Some((min.unwrap_or(0), max.unwrap_or(u64::MAX))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.pattern, "result-summary.txt");
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.formats, vec!["json", "html", "csv"]);
        assert_eq!(config.workers, 4);
        assert_eq!(config.schema_version, "2.0");
        assert!(config.continue_on_error);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_yaml_keeps_unset_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("regulus.yaml");
        fs::write(
            &path,
            "formats: [json, xml]\nstrategy: parallel\nworkers: 2\nbase_url: https://logs.example.com\n",
        )
        .unwrap();

        let config = ReportConfig::load(&path).unwrap();
        assert_eq!(config.formats, vec!["json", "xml"]);
        assert_eq!(config.strategy, Strategy::Parallel);
        assert_eq!(config.workers, 2);
        assert_eq!(config.base_url.as_deref(), Some("https://logs.example.com"));
        assert_eq!(config.pattern, "result-summary.txt");
    }

    #[test]
    fn test_load_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("regulus.json");
        fs::write(&path, r#"{"max_depth": 3, "cache": false, "min_size": 10}"#).unwrap();

        let config = ReportConfig::load(&path).unwrap();
        assert_eq!(config.max_depth, 3);
        assert!(!config.cache);
        assert_eq!(config.size_range(), Some((10, u64::MAX)));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("regulus.yaml");
        fs::write(&path, "colour: blue\n").unwrap();
        assert!(matches!(
            ReportConfig::load(&path),
            Err(CliError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ReportConfig {
            formats: vec!["pdf".to_string()],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CliError::InvalidFormat(_))));

        config.formats = vec!["json".to_string()];
        config.workers = 0;
        assert!(config.validate().is_err());

        config.workers = 1;
        config.min_size = Some(10);
        config.max_size = Some(5);
        assert!(config.validate().is_err());
    }
}

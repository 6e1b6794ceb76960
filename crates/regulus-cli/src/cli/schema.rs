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

//! Schema catalog commands.

use crate::error::{CliError, Result};
use clap::Subcommand;
use colored::Colorize;
use regulus_report::write_artifact;
use regulus_schema::{detect_version, SchemaCatalog, SchemaError, SchemaManager};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug, Clone)]
pub enum SchemaCommands {
    /// List the known schema versions
    List,

    /// Write a schema document as JSON
    Export {
        /// Destination file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Schema version to export
        #[arg(long, default_value = "2.0")]
        version: String,
    },

    /// Validate a JSON report against a schema
    ///
    /// Exits non-zero when the document does not conform.
    Validate {
        /// Report to check
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Version to check against; defaults to the version the report declares
        #[arg(long)]
        version: Option<String>,
    },

    /// Upgrade a JSON report to a newer schema version
    Upgrade {
        /// Report to upgrade
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Target version
        #[arg(long, default_value = "2.0")]
        to: String,

        /// Source version; defaults to the version the report declares
        #[arg(long)]
        from: Option<String>,

        /// Destination file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl SchemaCommands {
    pub fn execute(self) -> Result<()> {
        let catalog = SchemaManager::default();
        match self {
            SchemaCommands::List => {
                for version in catalog.versions() {
                    let info = catalog.schema_info(&version)?;
                    println!("{}  {}", version.bright_white().bold(), info.description);
                }
                Ok(())
            }
            SchemaCommands::Export { output, version } => {
                catalog.export_schema(&output, &version)?;
                println!("Exported schema {} to {}", version, output.display());
                Ok(())
            }
            SchemaCommands::Validate { file, version } => {
                let data = read_json(&file)?;
                let version = match version {
                    Some(v) => v,
                    None => detect_version(&data)?.to_string(),
                };
                match catalog.validate(&data, &version) {
                    Ok(()) => {
                        println!("{} {} conforms to {}", "✓".green().bold(), file.display(), version);
                        Ok(())
                    }
                    Err(SchemaError::ValidationFailed { errors }) => {
                        for message in &errors {
                            eprintln!("  {} {}", "✗".red().bold(), message);
                        }
                        Err(CliError::Schema(format!(
                            "{} does not conform to {} ({} errors)",
                            file.display(),
                            version,
                            errors.len()
                        )))
                    }
                    Err(e) => Err(e.into()),
                }
            }
            SchemaCommands::Upgrade {
                file,
                to,
                from,
                output,
            } => {
                let data = read_json(&file)?;
                let from = match from {
                    Some(v) => v,
                    None => detect_version(&data)?.to_string(),
                };
                let upgraded = catalog.upgrade(&data, &from, &to)?;
                let text = serde_json::to_string_pretty(&upgraded)
                    .map_err(|e| CliError::Output(e.to_string()))?;
                match output {
                    Some(path) => {
                        write_artifact(&path, &text)?;
                        println!("Upgraded {} from {} to {}", file.display(), from, to);
                    }
                    None => println!("{}", text),
                }
                Ok(())
            }
        }
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))?;
    serde_json::from_str(&text).map_err(|e| CliError::invalid_config(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_export_then_validate_roundtrip_paths() {
        let dir = tempfile::TempDir::new().unwrap();
        let schema = dir.path().join("v2.json");
        SchemaCommands::Export {
            output: schema.clone(),
            version: "2.0".to_string(),
        }
        .execute()
        .unwrap();
        let written: Value = serde_json::from_str(&fs::read_to_string(&schema).unwrap()).unwrap();
        assert_eq!(written["type"], "object");
    }

    #[test]
    fn test_validate_rejects_incomplete_report() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("report.json");
        fs::write(&file, json!({"schema_info": {"version": "2.0"}}).to_string()).unwrap();

        let err = SchemaCommands::Validate {
            file,
            version: None,
        }
        .execute()
        .unwrap_err();
        assert!(matches!(err, CliError::Schema(ref m) if m.contains("does not conform to 2.0")));
    }

    #[test]
    fn test_upgrade_writes_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("old.json");
        let out = dir.path().join("new.json");
        fs::write(&file, json!({"results": []}).to_string()).unwrap();

        SchemaCommands::Upgrade {
            file,
            to: "1.1".to_string(),
            from: None,
            output: Some(out.clone()),
        }
        .execute()
        .unwrap();
        let upgraded: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(upgraded["schema_version"], "1.1");
    }

    #[test]
    fn test_downgrade_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("new.json");
        fs::write(&file, json!({"schema_info": {"version": "2.0"}}).to_string()).unwrap();

        let err = SchemaCommands::Upgrade {
            file,
            to: "1.0".to_string(),
            from: None,
            output: None,
        }
        .execute()
        .unwrap_err();
        assert!(matches!(err, CliError::Schema(_)));
    }
}

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

//! JSON output: the full aggregate report, validated against its schema.

use crate::document::{Report, RunMetadata};
use crate::error::Result;
use crate::generator::{write_artifact, OutputGenerator};
use regulus_core::FileReport;
use regulus_schema::{
    SchemaCatalog, SchemaError, SchemaInfo, SchemaManager, SchemaVersion, ValidationReport,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Writes the aggregate report as pretty JSON.
///
/// The report is validated against the configured schema version before
/// writing. A failed validation is recorded in `validation_report` and the
/// report is still written. The schema document itself is exported next to
/// the report as `<stem>_schema.json` unless disabled.
pub struct JsonOutputGenerator {
    catalog: Arc<dyn SchemaCatalog>,
    schema_version: String,
    export_schema: bool,
}

impl JsonOutputGenerator {
    pub fn new(catalog: Arc<dyn SchemaCatalog>, schema_version: impl Into<String>) -> Self {
        Self {
            catalog,
            schema_version: schema_version.into(),
            export_schema: true,
        }
    }

    pub fn without_schema_export(mut self) -> Self {
        self.export_schema = false;
        self
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    /// Sibling path the schema document is exported to.
    pub fn schema_path(report_path: &Path) -> PathBuf {
        let stem = report_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report".to_string());
        report_path.with_file_name(format!("{}_schema.json", stem))
    }

    /// Build the report and attach its validation outcome.
    pub fn build_report(&self, reports: &[FileReport], meta: &RunMetadata) -> Report {
        let info = self
            .catalog
            .schema_info(&self.schema_version)
            .unwrap_or_else(|_| SchemaInfo {
                version: self.schema_version.clone(),
                description: "Unregistered schema version".to_string(),
                created_date: None,
                last_modified: None,
            });
        let mut report = Report::build(reports, meta, info);

        let outcome = serde_json::to_value(&report)
            .map_err(SchemaError::from)
            .and_then(|value| self.catalog.validate(&value, &self.schema_version));
        if let Err(e) = &outcome {
            warn!(version = %self.schema_version, error = %e, "report failed schema validation");
        }
        report.validation_report = Some(ValidationReport::from_outcome(&outcome));
        report
    }
}

impl Default for JsonOutputGenerator {
    fn default() -> Self {
        Self::new(
            Arc::new(SchemaManager::default()),
            SchemaVersion::latest().as_str(),
        )
    }
}

impl OutputGenerator for JsonOutputGenerator {
    fn extension(&self) -> &str {
        "json"
    }

    fn render(&self, reports: &[FileReport], meta: &RunMetadata) -> Result<String> {
        let report = self.build_report(reports, meta);
        let mut text = serde_json::to_string_pretty(&report)?;
        text.push('\n');
        Ok(text)
    }

    fn generate(&self, reports: &[FileReport], meta: &RunMetadata, path: &Path) -> Result<()> {
        let text = self.render(reports, meta)?;
        write_artifact(path, &text)?;

        if self.export_schema {
            let schema_path = Self::schema_path(path);
            match self.catalog.export_schema(&schema_path, &self.schema_version) {
                Ok(()) => debug!(path = %schema_path.display(), "wrote schema export"),
                Err(e) => warn!(path = %schema_path.display(), error = %e, "schema export failed"),
            }
        }
        Ok(())
    }
}

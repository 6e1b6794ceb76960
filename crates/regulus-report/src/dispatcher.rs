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

//! Fan-out of one run to several output formats.

use crate::document::RunMetadata;
use crate::error::{OutputError, Result};
use crate::generator::OutputGenerator;
use crate::to_csv::CsvOutputGenerator;
use crate::to_html::HtmlOutputGenerator;
use crate::to_json::JsonOutputGenerator;
use crate::to_xml::XmlOutputGenerator;
use regulus_core::FileReport;
use regulus_schema::SchemaCatalog;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

/// Formats enabled on a fresh default dispatcher.
pub const DEFAULT_ENABLED: [&str; 1] = ["json"];

/// What one dispatch wrote and what failed.
#[derive(Debug, Default)]
pub struct GenerationSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(String, OutputError)>,
}

impl GenerationSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Registry of generators keyed by format name plus the enabled subset.
///
/// Each enabled format is written as a sibling of the output base path,
/// `<base>.<extension>`. A failing format is logged and does not stop the
/// others.
#[derive(Default)]
pub struct MultiFormatGenerator {
    generators: BTreeMap<String, Box<dyn OutputGenerator>>,
    enabled: Vec<String>,
}

impl MultiFormatGenerator {
    /// Empty registry with nothing enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in `json`, `csv`, `html` and `xml`
    /// generators. Only `json` is enabled.
    pub fn with_defaults(
        base_url: Option<&str>,
        catalog: Arc<dyn SchemaCatalog>,
        schema_version: &str,
    ) -> Self {
        let csv = match base_url {
            Some(url) => CsvOutputGenerator::with_base_url(url),
            None => CsvOutputGenerator::default(),
        };

        let mut dispatcher = Self::new();
        dispatcher.add_generator("json", JsonOutputGenerator::new(catalog, schema_version));
        dispatcher.add_generator("csv", csv);
        dispatcher.add_generator("html", HtmlOutputGenerator::default());
        dispatcher.add_generator("xml", XmlOutputGenerator::default());
        dispatcher.enabled = DEFAULT_ENABLED.iter().map(|s| s.to_string()).collect();
        dispatcher
    }

    /// Register or replace the generator for `name`.
    pub fn add_generator(&mut self, name: &str, generator: impl OutputGenerator + 'static) {
        self.generators.insert(name.to_string(), Box::new(generator));
    }

    pub fn enable(&mut self, name: &str) -> Result<()> {
        if !self.generators.contains_key(name) {
            return Err(OutputError::UnknownFormat(name.to_string()));
        }
        if !self.enabled.iter().any(|f| f == name) {
            self.enabled.push(name.to_string());
        }
        Ok(())
    }

    /// Returns whether the format was enabled.
    pub fn disable(&mut self, name: &str) -> bool {
        let before = self.enabled.len();
        self.enabled.retain(|f| f != name);
        self.enabled.len() != before
    }

    /// Replace the enabled set. Nothing changes if any name is unknown.
    pub fn set_enabled<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if let Some(unknown) = names
            .iter()
            .map(AsRef::as_ref)
            .find(|n| !self.generators.contains_key(*n))
        {
            return Err(OutputError::UnknownFormat(unknown.to_string()));
        }
        self.enabled.clear();
        for name in names {
            self.enable(name.as_ref())?;
        }
        Ok(())
    }

    pub fn enabled_formats(&self) -> Vec<String> {
        self.enabled.clone()
    }

    pub fn registered_formats(&self) -> Vec<String> {
        self.generators.keys().cloned().collect()
    }

    /// Sibling path for `extension`. A base that already ends in a
    /// registered extension has it replaced.
    pub fn output_path(&self, base: &Path, extension: &str) -> PathBuf {
        let known = base
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| self.generators.values().any(|g| g.extension() == e))
            .unwrap_or(false);
        if known {
            return base.with_extension(extension);
        }
        let mut name = base.as_os_str().to_os_string();
        name.push(".");
        name.push(extension);
        PathBuf::from(name)
    }

    /// Write every enabled format next to `base`.
    pub fn generate(
        &self,
        reports: &[FileReport],
        meta: &RunMetadata,
        base: &Path,
    ) -> GenerationSummary {
        let mut summary = GenerationSummary::default();
        for name in &self.enabled {
            let Some(generator) = self.generators.get(name) else {
                continue;
            };
            let path = self.output_path(base, generator.extension());
            match generator.generate(reports, meta, &path) {
                Ok(()) => {
                    info!(format = %name, path = %path.display(), "generated output");
                    summary.written.push(path);
                }
                Err(e) => {
                    error!(format = %name, path = %path.display(), error = %e, "output generation failed");
                    summary.failed.push((name.clone(), e));
                }
            }
        }
        summary
    }
}

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

//! Schema lookup, validation, export and upgrade.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::definitions::{builtin_benchmark_definitions, schema_document};
use crate::error::{Result, SchemaError};
use crate::migrations;
use crate::validator::validate_document;
use crate::version::{SchemaInfo, SchemaVersion};

/// A source of versioned schema documents.
///
/// Versions are addressed by name so catalogs that accept ad hoc versions
/// can share the interface with the built-in one.
pub trait SchemaCatalog: Send + Sync {
    /// The schema document registered under `version`.
    fn schema(&self, version: &str) -> Result<Arc<Value>>;

    /// Every version this catalog can serve.
    fn versions(&self) -> Vec<String>;

    /// Descriptive header for `version`.
    fn schema_info(&self, version: &str) -> Result<SchemaInfo>;

    /// The version used when a caller does not name one.
    fn current_version(&self) -> String;

    /// Validate `data` against `version`.
    ///
    /// Returns [`SchemaError::ValidationFailed`] listing every violation.
    fn validate(&self, data: &Value, version: &str) -> Result<()> {
        let schema = self.schema(version)?;
        let errors = validate_document(&schema, data);
        if errors.is_empty() {
            Ok(())
        } else {
            debug!(version, errors = errors.len(), "schema validation failed");
            Err(SchemaError::ValidationFailed { errors })
        }
    }

    /// Write the schema document for `version` to `path` as pretty JSON.
    fn export_schema(&self, path: &Path, version: &str) -> Result<()> {
        let schema = self.schema(version)?;
        let text = serde_json::to_string_pretty(schema.as_ref())?;
        fs::write(path, text).map_err(|e| SchemaError::io_error(path, e))?;
        info!(path = %path.display(), version, "exported schema");
        Ok(())
    }

    /// Upgrade a report between built-in generations.
    fn upgrade(&self, data: &Value, from: &str, to: &str) -> Result<Value> {
        migrations::upgrade(data, from.parse()?, to.parse()?)
    }
}

/// Catalog of the three built-in generations.
///
/// Documents are built on first use and shared afterwards.
#[derive(Debug)]
pub struct SchemaManager {
    version: SchemaVersion,
    cache: RwLock<HashMap<SchemaVersion, Arc<Value>>>,
}

impl SchemaManager {
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            version,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// The generation this manager validates against by default.
    pub fn version(&self) -> SchemaVersion {
        self.version
    }

    /// The document for a built-in generation.
    pub fn document(&self, version: SchemaVersion) -> Arc<Value> {
        if let Some(doc) = self.cache.read().get(&version) {
            return Arc::clone(doc);
        }

        let mut cache = self.cache.write();
        // Another thread may have built it while we waited for the lock.
        Arc::clone(
            cache
                .entry(version)
                .or_insert_with(|| Arc::new(schema_document(version))),
        )
    }

    /// Number of documents built so far.
    pub fn cached_documents(&self) -> usize {
        self.cache.read().len()
    }

    /// Field definitions for well-known benchmarks.
    pub fn benchmark_definitions(&self) -> Value {
        builtin_benchmark_definitions()
    }

    /// Check the shape of benchmark field definitions.
    ///
    /// Returns one entry per benchmark, each listing its problems (empty when
    /// the definition is well formed).
    pub fn validate_field_definitions(&self, definitions: &Value) -> BTreeMap<String, Vec<String>> {
        let mut outcome = BTreeMap::new();
        let Some(definitions) = definitions.as_object() else {
            return outcome;
        };

        for (name, definition) in definitions {
            let mut errors = Vec::new();
            if definition.get("required_fields").is_none() {
                errors.push("Missing required_fields definition".to_string());
            }
            if definition.get("optional_fields").is_none() {
                errors.push("Missing optional_fields definition".to_string());
            }
            if let Some(schemas) = definition.get("field_schemas").and_then(Value::as_object) {
                for (field, schema) in schemas {
                    if !schema.is_object() {
                        errors.push(format!("Invalid schema for field {}", field));
                    }
                }
            }
            outcome.insert(name.clone(), errors);
        }
        outcome
    }
}

impl Default for SchemaManager {
    fn default() -> Self {
        Self::new(SchemaVersion::latest())
    }
}

impl SchemaCatalog for SchemaManager {
    fn schema(&self, version: &str) -> Result<Arc<Value>> {
        Ok(self.document(version.parse()?))
    }

    fn versions(&self) -> Vec<String> {
        SchemaVersion::ALL
            .iter()
            .map(|v| v.as_str().to_string())
            .collect()
    }

    fn schema_info(&self, version: &str) -> Result<SchemaInfo> {
        Ok(version.parse::<SchemaVersion>()?.info())
    }

    fn current_version(&self) -> String {
        self.version.to_string()
    }
}

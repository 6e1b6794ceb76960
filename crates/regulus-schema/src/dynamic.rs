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

//! Catalog that accepts ad hoc schema versions at runtime.

use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::definitions::JSON_SCHEMA_DIALECT;
use crate::error::{Result, SchemaError};
use crate::manager::{SchemaCatalog, SchemaManager};
use crate::version::{SchemaInfo, SchemaVersion};

/// Built-in generations plus custom versions registered by name.
///
/// Custom versions shadow built-in ones with the same name.
#[derive(Debug, Default)]
pub struct DynamicSchemaManager {
    builtin: SchemaManager,
    custom: RwLock<BTreeMap<String, Arc<Value>>>,
}

impl DynamicSchemaManager {
    pub fn new(version: SchemaVersion) -> Self {
        Self {
            builtin: SchemaManager::new(version),
            custom: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn builtin(&self) -> &SchemaManager {
        &self.builtin
    }

    /// Register `schema` under `name`. A missing `$schema` key is filled in.
    pub fn add_custom_schema(&self, name: &str, mut schema: Value) -> Result<()> {
        let object = schema.as_object_mut().ok_or_else(|| {
            SchemaError::InvalidDefinition(format!("custom schema {} must be a JSON object", name))
        })?;
        object
            .entry("$schema")
            .or_insert_with(|| json!(JSON_SCHEMA_DIALECT));

        self.custom.write().insert(name.to_string(), Arc::new(schema));
        info!(version = name, "registered custom schema");
        Ok(())
    }

    /// Derive `new_version` from `base` by merging the extension's
    /// `properties` and `required` lists into a copy of the base schema.
    pub fn extend_schema(&self, base: &str, extension: &Value, new_version: &str) -> Result<()> {
        let mut schema = self.schema(base)?.as_ref().clone();
        let target = schema.as_object_mut().ok_or_else(|| {
            SchemaError::InvalidDefinition(format!("schema {} is not a JSON object", base))
        })?;

        if let Some(extra) = extension.get("properties") {
            let extra = extra.as_object().ok_or_else(|| {
                SchemaError::InvalidDefinition("extension properties must be an object".to_string())
            })?;
            let properties = target
                .entry("properties")
                .or_insert_with(|| json!({}))
                .as_object_mut()
                .ok_or_else(|| {
                    SchemaError::InvalidDefinition(format!("schema {} has invalid properties", base))
                })?;
            for (key, value) in extra {
                properties.insert(key.clone(), value.clone());
            }
        }

        if let Some(extra) = extension.get("required") {
            let extra = extra.as_array().ok_or_else(|| {
                SchemaError::InvalidDefinition("extension required must be an array".to_string())
            })?;
            let required = target
                .entry("required")
                .or_insert_with(|| json!([]))
                .as_array_mut()
                .ok_or_else(|| {
                    SchemaError::InvalidDefinition(format!("schema {} has invalid required list", base))
                })?;
            for name in extra {
                if !required.contains(name) {
                    required.push(name.clone());
                }
            }
        }

        target.insert(
            "$id".to_string(),
            json!(format!("build-report-schema-{}.json", new_version)),
        );
        target.insert(
            "title".to_string(),
            json!(format!("Build Report Schema {}", new_version)),
        );

        self.custom
            .write()
            .insert(new_version.to_string(), Arc::new(schema));
        info!(base, version = new_version, "extended schema");
        Ok(())
    }

    /// Drop a custom version. Returns whether it existed.
    pub fn remove_custom_schema(&self, name: &str) -> bool {
        self.custom.write().remove(name).is_some()
    }

    pub fn custom_versions(&self) -> Vec<String> {
        self.custom.read().keys().cloned().collect()
    }
}

impl SchemaCatalog for DynamicSchemaManager {
    fn schema(&self, version: &str) -> Result<Arc<Value>> {
        if let Some(schema) = self.custom.read().get(version) {
            return Ok(Arc::clone(schema));
        }
        self.builtin.schema(version)
    }

    fn versions(&self) -> Vec<String> {
        let mut versions = self.builtin.versions();
        for name in self.custom_versions() {
            if !versions.contains(&name) {
                versions.push(name);
            }
        }
        versions
    }

    fn schema_info(&self, version: &str) -> Result<SchemaInfo> {
        if let Some(schema) = self.custom.read().get(version) {
            let description = schema
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or("Custom schema")
                .to_string();
            return Ok(SchemaInfo {
                version: version.to_string(),
                description,
                created_date: None,
                last_modified: None,
            });
        }
        self.builtin.schema_info(version)
    }

    fn current_version(&self) -> String {
        self.builtin.current_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_custom_schema_fills_dialect() {
        let manager = DynamicSchemaManager::default();
        manager
            .add_custom_schema("lab-1", json!({"type": "object", "description": "Lab reports"}))
            .unwrap();

        let schema = manager.schema("lab-1").unwrap();
        assert_eq!(schema["$schema"], JSON_SCHEMA_DIALECT);
        assert_eq!(manager.schema_info("lab-1").unwrap().description, "Lab reports");
        assert_eq!(manager.versions(), vec!["1.0", "1.1", "2.0", "lab-1"]);
    }

    #[test]
    fn test_non_object_custom_schema_is_rejected() {
        let manager = DynamicSchemaManager::default();
        assert!(matches!(
            manager.add_custom_schema("bad", json!("nope")),
            Err(SchemaError::InvalidDefinition(_))
        ));
    }

    #[test]
    fn test_extend_schema() {
        let manager = DynamicSchemaManager::default();
        let extension = json!({
            "properties": {"lab": {"type": "string"}},
            "required": ["lab", "results"]
        });
        manager.extend_schema("2.0", &extension, "2.0-lab").unwrap();

        let schema = manager.schema("2.0-lab").unwrap();
        assert_eq!(schema["$id"], "build-report-schema-2.0-lab.json");
        assert_eq!(schema["title"], "Build Report Schema 2.0-lab");
        assert_eq!(schema["properties"]["lab"]["type"], "string");
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.iter().filter(|r| *r == "results").count(), 1);
        assert!(required.contains(&json!("lab")));

        // The base document is untouched.
        assert!(manager.schema("2.0").unwrap()["properties"].get("lab").is_none());
    }

    #[test]
    fn test_extended_schema_validates() {
        let manager = DynamicSchemaManager::default();
        manager
            .extend_schema("1.0", &json!({"required": ["lab"]}), "1.0-lab")
            .unwrap();
        let doc = json!({
            "generation_info": {"total_results": 0, "timestamp": "t"},
            "results": [],
            "summary_by_benchmark": {}
        });
        let err = manager.validate(&doc, "1.0-lab").unwrap_err();
        assert_eq!(err.validation_errors(), ["$: missing required property 'lab'".to_string()]);
        manager.validate(&doc, "1.0").unwrap();
    }

    #[test]
    fn test_extend_unknown_base_fails() {
        let manager = DynamicSchemaManager::default();
        assert!(manager.extend_schema("0.1", &json!({}), "x").is_err());
    }

    #[test]
    fn test_remove_custom_schema() {
        let manager = DynamicSchemaManager::default();
        manager.add_custom_schema("tmp", json!({})).unwrap();
        assert!(manager.remove_custom_schema("tmp"));
        assert!(!manager.remove_custom_schema("tmp"));
        assert!(manager.schema("tmp").is_err());
    }
}

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

//! Stepwise report upgrades between schema generations.
//!
//! Each [`Migration`] moves a document exactly one generation forward.
//! [`upgrade`] chains steps from the source version until it reaches the
//! target, so a new generation only needs one more entry in [`MIGRATIONS`].

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::error::{Result, SchemaError};
use crate::version::SchemaVersion;

/// One forward step between adjacent generations.
pub struct Migration {
    pub from: SchemaVersion,
    pub to: SchemaVersion,
    pub description: &'static str,
    apply: fn(&mut Map<String, Value>),
}

/// Registered steps, oldest first.
pub static MIGRATIONS: &[Migration] = &[
    Migration {
        from: SchemaVersion::V1_0,
        to: SchemaVersion::V1_1,
        description: "add schema_version and per-result processing metadata",
        apply: v1_0_to_v1_1,
    },
    Migration {
        from: SchemaVersion::V1_1,
        to: SchemaVersion::V2_0,
        description: "add schema_info, processing status, success rates and validation report",
        apply: v1_1_to_v2_0,
    },
];

/// Read the generation a document declares. Documents without any marker
/// are treated as the baseline generation.
pub fn detect_version(data: &Value) -> Result<SchemaVersion> {
    let declared = data
        .pointer("/schema_info/version")
        .or_else(|| data.get("schema_version"))
        .and_then(Value::as_str);
    match declared {
        Some(v) => v.parse(),
        None => Ok(SchemaVersion::V1_0),
    }
}

/// Upgrade `data` from `from` to `to`, composing as many steps as needed.
///
/// The input is left untouched. Equal versions return a copy; downgrades
/// and missing steps are rejected with [`SchemaError::NoUpgradePath`].
pub fn upgrade(data: &Value, from: SchemaVersion, to: SchemaVersion) -> Result<Value> {
    if from == to {
        return Ok(data.clone());
    }
    let no_path = || SchemaError::NoUpgradePath {
        from: from.to_string(),
        to: to.to_string(),
    };
    if from > to {
        return Err(no_path());
    }

    let mut document = match data {
        Value::Object(map) => map.clone(),
        _ => {
            return Err(SchemaError::InvalidDefinition(
                "report must be a JSON object".to_string(),
            ))
        }
    };

    let mut current = from;
    while current != to {
        let step = MIGRATIONS
            .iter()
            .find(|m| m.from == current && m.to <= to)
            .ok_or_else(no_path)?;
        (step.apply)(&mut document);
        debug!(from = %step.from, to = %step.to, "{}", step.description);
        current = step.to;
    }

    Ok(Value::Object(document))
}

fn v1_0_to_v1_1(doc: &mut Map<String, Value>) {
    doc.insert("schema_version".to_string(), json!("1.1"));

    if !doc.contains_key("processing_metadata") {
        let count = doc
            .get("results")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        let entries = (0..count)
            .map(|_| {
                json!({
                    "transformation_time": "",
                    "processors_used": [],
                    "status": "success"
                })
            })
            .collect();
        doc.insert("processing_metadata".to_string(), Value::Array(entries));
    }
}

fn v1_1_to_v2_0(doc: &mut Map<String, Value>) {
    doc.remove("schema_version");
    doc.insert(
        "schema_info".to_string(),
        serde_json::to_value(SchemaVersion::V2_0.info()).unwrap_or(Value::Null),
    );

    // The 1.1 metadata list runs parallel to `results`; fold each status
    // into its result.
    let statuses: Vec<String> = match doc.remove("processing_metadata") {
        Some(Value::Array(entries)) => entries
            .iter()
            .map(|e| {
                e.get("status")
                    .and_then(Value::as_str)
                    .unwrap_or("success")
                    .to_string()
            })
            .collect(),
        _ => Vec::new(),
    };

    let mut successful = 0u64;
    let mut failed = 0u64;
    let mut per_file_status = Map::new();
    if let Some(Value::Array(results)) = doc.get_mut("results") {
        for (i, result) in results.iter_mut().enumerate() {
            let Some(result) = result.as_object_mut() else {
                continue;
            };
            let status = result
                .get("processing_status")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or_else(|| statuses.get(i).cloned())
                .unwrap_or_else(|| "success".to_string());
            match status.as_str() {
                "success" => successful += 1,
                "failed" => failed += 1,
                _ => {}
            }
            if let Some(path) = result.get("file_path").and_then(Value::as_str) {
                per_file_status.insert(path.to_string(), json!(status));
            }
            result.insert("processing_status".to_string(), json!(status));
        }
    }

    let info = doc
        .entry("generation_info")
        .or_insert_with(|| json!({}));
    if let Some(info) = info.as_object_mut() {
        info.insert("successful_results".to_string(), json!(successful));
        info.insert("failed_results".to_string(), json!(failed));
        info.insert("processing_duration_seconds".to_string(), json!(0.0));
    }

    if let Some(Value::Object(summary)) = doc.get_mut("summary_by_benchmark") {
        for entry in summary.values_mut() {
            let Some(entry) = entry.as_object_mut() else {
                continue;
            };
            let files: Vec<&str> = entry
                .get("files")
                .and_then(Value::as_array)
                .map(|f| f.iter().filter_map(Value::as_str).collect())
                .unwrap_or_default();
            let ok = files
                .iter()
                .filter(|f| per_file_status.get(**f).map_or(true, |s| s == "success"))
                .count();
            let bad = files
                .iter()
                .filter(|f| per_file_status.get(**f).map_or(false, |s| s == "failed"))
                .count();
            let rate = if files.is_empty() {
                0.0
            } else {
                ok as f64 / files.len() as f64
            };
            entry.insert("successful_count".to_string(), json!(ok));
            entry.insert("failed_count".to_string(), json!(bad));
            entry.insert("success_rate".to_string(), json!(rate));
        }
    }

    doc.entry("validation_report").or_insert_with(|| {
        json!({
            "schema_validation": true,
            "validation_errors": [],
            "validation_warnings": ["Upgraded from schema 1.1"],
            "data_quality_score": 1.0
        })
    });
}

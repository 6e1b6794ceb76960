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

//! Upgrade chains checked against the target generation's schema.

use proptest::prelude::*;
use regulus_schema::{
    detect_version, SchemaCatalog, SchemaError, SchemaManager, SchemaVersion,
};
use serde_json::{json, Value};

fn v1_report(benchmarks: &[(String, usize)]) -> Value {
    let mut results = Vec::new();
    let mut summary = serde_json::Map::new();
    for (bench, count) in benchmarks {
        let files: Vec<String> = (0..*count)
            .map(|i| format!("{}/run-{}/result-summary.txt", bench, i))
            .collect();
        for file in &files {
            results.push(json!({"file_path": file, "benchmark": bench, "run_id": "abc"}));
        }
        summary.insert(bench.clone(), json!({"count": count, "files": files}));
    }
    json!({
        "generation_info": {
            "total_results": results.len(),
            "timestamp": "2025-01-20T12:00:00.000000Z",
            "benchmarks": benchmarks.iter().map(|(b, _)| b.clone()).collect::<Vec<_>>()
        },
        "results": results,
        "summary_by_benchmark": summary
    })
}

// ===== Fixed documents =====

#[test]
fn test_v1_document_validates_against_v1() {
    let manager = SchemaManager::default();
    let doc = v1_report(&[("uperf".to_string(), 2)]);
    manager.validate(&doc, "1.0").unwrap();
}

#[test]
fn test_v1_document_fails_v2() {
    let manager = SchemaManager::default();
    let doc = v1_report(&[("uperf".to_string(), 1)]);
    let err = manager.validate(&doc, "2.0").unwrap_err();
    assert!(err
        .validation_errors()
        .iter()
        .any(|e| e == "$: missing required property 'schema_info'"));
}

#[test]
fn test_upgraded_document_declares_new_version() {
    let manager = SchemaManager::default();
    let doc = v1_report(&[("iperf".to_string(), 3)]);
    let up = manager.upgrade(&doc, "1.0", "2.0").unwrap();
    assert_eq!(detect_version(&up).unwrap(), SchemaVersion::V2_0);
    assert_eq!(up["summary_by_benchmark"]["iperf"]["success_rate"], 1.0);
}

#[test]
fn test_unknown_versions_are_rejected() {
    let manager = SchemaManager::default();
    let doc = v1_report(&[]);
    assert!(matches!(
        manager.upgrade(&doc, "1.0", "3.0"),
        Err(SchemaError::UnknownVersion(_))
    ));
    assert!(matches!(
        manager.upgrade(&doc, "2.0", "1.1"),
        Err(SchemaError::NoUpgradePath { .. })
    ));
}

// ===== Properties =====

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Property: every upgraded 1.0 document is a valid document of each later generation
    #[test]
    fn prop_upgrades_validate(
        benchmarks in prop::collection::btree_map("[a-z]{3,8}", 0usize..5, 0..4)
    ) {
        let manager = SchemaManager::default();
        let benchmarks: Vec<(String, usize)> = benchmarks.into_iter().collect();
        let doc = v1_report(&benchmarks);

        for target in ["1.1", "2.0"] {
            let up = manager.upgrade(&doc, "1.0", target).unwrap();
            prop_assert!(manager.validate(&up, target).is_ok(), "{:?}", manager.validate(&up, target));
        }
    }

    /// Property: upgrading never changes the result list length
    #[test]
    fn prop_upgrade_preserves_results(
        benchmarks in prop::collection::btree_map("[a-z]{3,8}", 0usize..5, 0..4)
    ) {
        let benchmarks: Vec<(String, usize)> = benchmarks.into_iter().collect();
        let doc = v1_report(&benchmarks);
        let up = SchemaManager::default().upgrade(&doc, "1.0", "2.0").unwrap();
        prop_assert_eq!(
            up["results"].as_array().map(Vec::len),
            doc["results"].as_array().map(Vec::len)
        );
    }
}

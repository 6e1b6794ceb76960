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

//! The aggregate report document.
//!
//! [`Report`] is the structured form every generator works from: per-file
//! records plus generation info and per-benchmark summaries. Its serialized
//! form is the JSON artifact, so it deserializes back for round trips.

use regulus_core::{FileReport, ProcessingStatus};
use regulus_schema::{SchemaInfo, ValidationReport};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Run-level facts supplied by the caller.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunMetadata {
    /// Generation timestamp (RFC 3339)
    pub timestamp: String,
    /// Directory that was scanned
    pub root_directory: String,
    /// File name pattern used for discovery
    pub file_pattern: String,
    /// Wall time spent processing files
    pub processing_duration_seconds: f64,
    pub git_branch: Option<String>,
    pub execution_label: Option<String>,
}

impl RunMetadata {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            ..Default::default()
        }
    }

    pub fn with_root(mut self, root: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.root_directory = root.into();
        self.file_pattern = pattern.into();
        self
    }

    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.processing_duration_seconds = seconds;
        self
    }

    pub fn with_git_branch(mut self, branch: Option<String>) -> Self {
        self.git_branch = branch;
        self
    }

    pub fn with_execution_label(mut self, label: Option<String>) -> Self {
        self.execution_label = label;
        self
    }
}

/// The `generation_info` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationInfo {
    pub timestamp: String,
    pub total_results: usize,
    pub successful_results: usize,
    pub failed_results: usize,
    /// Distinct benchmarks, sorted
    pub benchmarks: Vec<String>,
    pub root_directory: String,
    pub file_pattern: String,
    pub processing_duration_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_label: Option<String>,
}

/// Expected fields for one benchmark's records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkDefinition {
    pub description: String,
    pub required_fields: Vec<String>,
    pub optional_fields: Vec<String>,
    pub result_format: String,
    pub validation_rules: Vec<String>,
}

impl BenchmarkDefinition {
    /// Derive a definition from a sample record of the benchmark.
    pub fn derive(benchmark: &str, sample: &FileReport) -> Self {
        let required = ["file_path", "benchmark"];
        let optional_fields = match serde_json::to_value(sample) {
            Ok(serde_json::Value::Object(map)) => map
                .keys()
                .filter(|k| !required.contains(&k.as_str()))
                .cloned()
                .collect(),
            _ => Vec::new(),
        };
        Self {
            description: format!("Auto-generated definition for {} benchmark", benchmark),
            required_fields: required.iter().map(|s| s.to_string()).collect(),
            optional_fields,
            result_format: "structured".to_string(),
            validation_rules: Vec::new(),
        }
    }
}

/// File facts repeated in the shape the 2.0 schema describes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub size_bytes: u64,
    pub modified_timestamp: f64,
}

/// One entry of `results`: the file record plus its processing status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub report: FileReport,
    pub processing_status: ProcessingStatus,
    pub file_metadata: FileMetadata,
}

impl From<&FileReport> for ReportEntry {
    fn from(report: &FileReport) -> Self {
        Self {
            processing_status: report.status(),
            file_metadata: FileMetadata {
                size_bytes: report.file_size,
                modified_timestamp: report.file_modified,
            },
            report: report.clone(),
        }
    }
}

/// Per-benchmark counts in `summary_by_benchmark`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub count: usize,
    pub successful_count: usize,
    pub failed_count: usize,
    pub success_rate: f64,
    pub total_iterations: usize,
    pub files: Vec<String>,
}

/// The aggregate report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub schema_info: SchemaInfo,
    pub generation_info: GenerationInfo,
    pub benchmark_definitions: BTreeMap<String, BenchmarkDefinition>,
    pub results: Vec<ReportEntry>,
    pub summary_by_benchmark: BTreeMap<String, BenchmarkSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_report: Option<ValidationReport>,
}

impl Report {
    /// Assemble a report. Results keep the order of `reports`.
    pub fn build(reports: &[FileReport], meta: &RunMetadata, schema_info: SchemaInfo) -> Self {
        let benchmarks: BTreeSet<&str> = reports.iter().map(|r| r.benchmark.as_str()).collect();
        let successful = count_status(reports.iter(), ProcessingStatus::Success);
        let failed = count_status(reports.iter(), ProcessingStatus::Failed);

        let mut benchmark_definitions = BTreeMap::new();
        let mut summary_by_benchmark = BTreeMap::new();
        for bench in &benchmarks {
            let group: Vec<&FileReport> = reports.iter().filter(|r| r.benchmark == *bench).collect();
            if let Some(first) = group.first() {
                benchmark_definitions
                    .insert(bench.to_string(), BenchmarkDefinition::derive(bench, first));
            }

            let ok = count_status(group.iter().copied(), ProcessingStatus::Success);
            summary_by_benchmark.insert(
                bench.to_string(),
                BenchmarkSummary {
                    count: group.len(),
                    successful_count: ok,
                    failed_count: count_status(group.iter().copied(), ProcessingStatus::Failed),
                    success_rate: ratio(ok, group.len()),
                    total_iterations: group.iter().map(|r| r.total_iterations).sum(),
                    files: group.iter().map(|r| r.file_path.clone()).collect(),
                },
            );
        }

        Self {
            schema_info,
            generation_info: GenerationInfo {
                timestamp: meta.timestamp.clone(),
                total_results: reports.len(),
                successful_results: successful,
                failed_results: failed,
                benchmarks: benchmarks.iter().map(|b| b.to_string()).collect(),
                root_directory: meta.root_directory.clone(),
                file_pattern: meta.file_pattern.clone(),
                processing_duration_seconds: meta.processing_duration_seconds,
                git_branch: meta.git_branch.clone(),
                execution_label: meta.execution_label.clone(),
            },
            benchmark_definitions,
            results: reports.iter().map(ReportEntry::from).collect(),
            summary_by_benchmark,
            validation_report: None,
        }
    }

    /// The file records, in result order.
    pub fn reports(&self) -> impl Iterator<Item = &FileReport> {
        self.results.iter().map(|e| &e.report)
    }

    /// Share of successful files, 0.0 for an empty report.
    pub fn success_rate(&self) -> f64 {
        ratio(
            self.generation_info.successful_results,
            self.generation_info.total_results,
        )
    }
}

fn count_status<'a>(reports: impl Iterator<Item = &'a FileReport>, status: ProcessingStatus) -> usize {
    reports.filter(|r| r.status() == status).count()
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regulus_core::{DiscoveredFile, ProcessingStatus};
    use regulus_schema::SchemaVersion;
    use std::time::UNIX_EPOCH;

    fn report(path: &str, bench: &str, status: ProcessingStatus) -> FileReport {
        let file = DiscoveredFile::new(path, 10, UNIX_EPOCH);
        let mut r = FileReport::failed(&file, "x", "t");
        r.benchmark = bench.to_string();
        r.processing_metadata.status = status;
        r.total_iterations = 2;
        r
    }

    #[test]
    fn test_build_counts_and_summary() {
        let reports = vec![
            report("a/r.txt", "uperf", ProcessingStatus::Success),
            report("b/r.txt", "uperf", ProcessingStatus::Failed),
            report("c/r.txt", "iperf", ProcessingStatus::Success),
        ];
        let meta = RunMetadata::new("2025-01-20T12:00:00.000000Z").with_root("runs", "r.txt");
        let doc = Report::build(&reports, &meta, SchemaVersion::V2_0.info());

        assert_eq!(doc.generation_info.total_results, 3);
        assert_eq!(doc.generation_info.successful_results, 2);
        assert_eq!(doc.generation_info.failed_results, 1);
        assert_eq!(doc.generation_info.benchmarks, vec!["iperf", "uperf"]);

        let uperf = &doc.summary_by_benchmark["uperf"];
        assert_eq!(uperf.count, 2);
        assert_eq!(uperf.success_rate, 0.5);
        assert_eq!(uperf.total_iterations, 4);
        assert_eq!(uperf.files, vec!["a/r.txt", "b/r.txt"]);
        assert!((doc.success_rate() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_derived_definition() {
        let r = report("a/r.txt", "uperf", ProcessingStatus::Success);
        let def = BenchmarkDefinition::derive("uperf", &r);
        assert_eq!(def.description, "Auto-generated definition for uperf benchmark");
        assert_eq!(def.required_fields, vec!["file_path", "benchmark"]);
        assert!(def.optional_fields.contains(&"iterations".to_string()));
        assert!(!def.optional_fields.contains(&"file_path".to_string()));
    }

    #[test]
    fn test_entry_flattens_report() {
        let r = report("a/r.txt", "uperf", ProcessingStatus::Partial);
        let value = serde_json::to_value(ReportEntry::from(&r)).unwrap();
        assert_eq!(value["file_path"], "a/r.txt");
        assert_eq!(value["processing_status"], "partial");
        assert_eq!(value["file_metadata"]["size_bytes"], 10);
    }

    #[test]
    fn test_empty_report() {
        let doc = Report::build(&[], &RunMetadata::default(), SchemaVersion::V2_0.info());
        assert_eq!(doc.success_rate(), 0.0);
        assert!(doc.summary_by_benchmark.is_empty());
    }
}

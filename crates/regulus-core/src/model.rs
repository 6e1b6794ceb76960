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

//! Data model shared by every pipeline stage.
//!
//! Values flow in one direction: a [`DiscoveredFile`] is read into text, the
//! extractor turns text into an [`ExtractedRun`], and the transformer turns
//! that into a [`FileReport`]. Reports are serializable; everything upstream
//! is an in-memory intermediate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Ordered `key=value` parameters parsed from a log line.
pub type Params = BTreeMap<String, String>;

/// Iteration id given to results found in logs without iteration markers.
pub const LEGACY_ITERATION_ID: &str = "legacy-format";

/// Raw text stored for an iteration whose block has no result lines.
pub const NO_RESULT_FOUND: &str = "No result found";

/// A file selected by discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Path as found under the discovery root
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

impl DiscoveredFile {
    /// Create a file record from known metadata.
    pub fn new(path: impl Into<PathBuf>, size: u64, modified: SystemTime) -> Self {
        Self {
            path: path.into(),
            size,
            modified,
        }
    }

    /// Build a record by reading metadata from disk.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let meta = std::fs::metadata(path)?;
        Ok(Self::new(
            path,
            meta.len(),
            meta.modified().unwrap_or(UNIX_EPOCH),
        ))
    }

    /// Modification time as fractional seconds since the Unix epoch.
    pub fn modified_secs(&self) -> f64 {
        self.modified
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Final path component, or the whole path when there is none.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A named regular expression, optionally paired with a post-processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRule {
    /// Name of the field the rule fills
    pub field_name: String,
    /// Regular expression applied to the file content
    pub pattern: String,
    /// Registered processor name applied to the captures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
}

impl ExtractionRule {
    /// Create a rule without a processor.
    pub fn new(field_name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            pattern: pattern.into(),
            processor: None,
        }
    }

    /// Attach a processor name.
    pub fn with_processor(mut self, processor: impl Into<String>) -> Self {
        self.processor = Some(processor.into());
        self
    }
}

/// The rules registered for one benchmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Benchmark the rules apply to
    pub benchmark_name: String,
    /// Primary field rules
    pub rules: Vec<ExtractionRule>,
    /// Rules for auxiliary metadata fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_rules: Option<Vec<ExtractionRule>>,
}

impl RuleSet {
    /// Create a rule set with primary rules only.
    pub fn new(benchmark_name: impl Into<String>, rules: Vec<ExtractionRule>) -> Self {
        Self {
            benchmark_name: benchmark_name.into(),
            rules,
            metadata_rules: None,
        }
    }

    /// Attach metadata rules.
    pub fn with_metadata_rules(mut self, rules: Vec<ExtractionRule>) -> Self {
        self.metadata_rules = Some(rules);
        self
    }

    /// Look up a primary rule by field name.
    pub fn rule(&self, field_name: &str) -> Option<&ExtractionRule> {
        self.rules.iter().find(|r| r.field_name == field_name)
    }

    /// Metadata rules, empty when none are set.
    pub fn metadata(&self) -> &[ExtractionRule] {
        self.metadata_rules.as_deref().unwrap_or(&[])
    }

    /// Check that every pattern compiles.
    pub fn validate(&self) -> crate::Result<()> {
        for rule in self.rules.iter().chain(self.metadata()) {
            regex::Regex::new(&rule.pattern)
                .map_err(|e| crate::CoreError::invalid_pattern(&rule.field_name, &e))?;
        }
        Ok(())
    }
}

/// One sample window inside an iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Sample identifier
    pub sample_id: String,
    /// Period start
    pub begin: u64,
    /// Period end
    pub end: u64,
    /// Period length in seconds
    pub duration: f64,
}

/// Benchmark tool whose result grammar produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// `(uperf::...)` results
    Uperf,
    /// `(iperf::...)` results
    Iperf,
    /// `(trafficgen::...)` results
    Trafficgen,
}

impl Tool {
    /// Lowercase tool name as it appears in result lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Tool::Uperf => "uperf",
            Tool::Iperf => "iperf",
            Tool::Trafficgen => "trafficgen",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// A fully measured result line with per-sample values and statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredResult {
    /// Metric type, e.g. `Gbps` or `rx-pps`
    #[serde(rename = "type")]
    pub metric: String,
    /// Grammar that produced the result
    pub tool: Tool,
    /// Individual sample values
    pub sample_values: Vec<f64>,
    /// Number of sample values
    pub sample_count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
    pub stddevpct: f64,
    /// `max - min`
    pub range: f64,
    /// Unit inferred from the metric type
    pub unit: String,
    /// Busy CPU percentage, when reported
    #[serde(rename = "CPU", default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<f64>,
    /// Set when stddev or stddevpct was reported as NaN
    #[serde(default, skip_serializing_if = "is_false")]
    pub stddev_undefined: bool,
}

/// The compact trafficgen form that reports a sample count but no values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    #[serde(rename = "type")]
    pub metric: String,
    pub tool: Tool,
    /// Reported sample count
    pub samples: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

/// Kind of an unparsed result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawKind {
    /// A result line with no known grammar
    Generic,
    /// Placeholder for an iteration without any result line
    Unknown,
}

/// A result kept as raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawResult {
    pub raw: String,
    #[serde(rename = "type")]
    pub kind: RawKind,
}

/// One result parsed from a `result:` line.
///
/// The variants are distinguishable by their fields alone, so the
/// serialized form carries no extra tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BenchResult {
    Measured(MeasuredResult),
    Summary(SummaryResult),
    Raw(RawResult),
}

impl BenchResult {
    /// Placeholder stored when an iteration has no result lines.
    pub fn placeholder() -> Self {
        BenchResult::Raw(RawResult {
            raw: NO_RESULT_FOUND.to_string(),
            kind: RawKind::Unknown,
        })
    }

    /// Wrap an unrecognized result line.
    pub fn generic(raw: impl Into<String>) -> Self {
        BenchResult::Raw(RawResult {
            raw: raw.into(),
            kind: RawKind::Generic,
        })
    }

    /// The `type` value as serialized.
    pub fn metric_type(&self) -> &str {
        match self {
            BenchResult::Measured(m) => &m.metric,
            BenchResult::Summary(s) => &s.metric,
            BenchResult::Raw(r) => match r.kind {
                RawKind::Generic => "generic",
                RawKind::Unknown => "unknown",
            },
        }
    }

    pub fn tool(&self) -> Option<Tool> {
        match self {
            BenchResult::Measured(m) => Some(m.tool),
            BenchResult::Summary(s) => Some(s.tool),
            BenchResult::Raw(_) => None,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        match self {
            BenchResult::Measured(m) => Some(m.mean),
            BenchResult::Summary(s) => Some(s.mean),
            BenchResult::Raw(_) => None,
        }
    }

    pub fn unit(&self) -> Option<&str> {
        match self {
            BenchResult::Measured(m) => Some(&m.unit),
            BenchResult::Summary(s) => Some(&s.unit),
            BenchResult::Raw(_) => None,
        }
    }

    /// Number of samples behind the result.
    pub fn sample_count(&self) -> Option<usize> {
        match self {
            BenchResult::Measured(m) => Some(m.sample_count),
            BenchResult::Summary(s) if s.samples >= 0.0 => Some(s.samples as usize),
            _ => None,
        }
    }

    pub fn stddevpct(&self) -> Option<f64> {
        match self {
            BenchResult::Measured(m) => Some(m.stddevpct),
            _ => None,
        }
    }

    pub fn cpu(&self) -> Option<f64> {
        match self {
            BenchResult::Measured(m) => m.cpu,
            _ => None,
        }
    }

    /// True for the "No result found" placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self, BenchResult::Raw(r) if r.kind == RawKind::Unknown)
    }
}

/// One iteration: its parameters, sample windows and results.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Iteration {
    pub iteration_id: String,
    pub unique_params: Params,
    pub samples: Vec<Sample>,
    pub results: Vec<BenchResult>,
}

impl Iteration {
    /// The single iteration synthesized for logs without iteration markers.
    pub fn legacy(results: Vec<BenchResult>) -> Self {
        let mut unique_params = Params::new();
        unique_params.insert("format".to_string(), "legacy".to_string());
        Self {
            iteration_id: LEGACY_ITERATION_ID.to_string(),
            unique_params,
            samples: Vec::new(),
            results,
        }
    }
}

/// Bookkeeping recorded while extracting one file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Names of the rules in the rule set used
    pub rules_applied: Vec<String>,
    pub iterations_found: usize,
    pub total_samples: usize,
    pub benchmark_detected: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_duration_ms: Option<f64>,
}

/// Structured content of one result file.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRun {
    pub file: DiscoveredFile,
    pub benchmark: String,
    pub run_id: String,
    /// The `tags:` line verbatim
    pub tags: String,
    pub common_params: Params,
    /// Recognized reporting tags picked from the `tags:` line
    pub key_tags: Params,
    pub iterations: Vec<Iteration>,
    pub metadata: ExtractionMetadata,
}

/// One rule's outcome on the rule-driven extraction path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldMatch {
    /// Whether the pattern matched at all
    pub matched: bool,
    /// Capture groups 1..n, empty strings for groups that did not take part
    pub groups: Vec<String>,
    /// Text of the whole match
    pub full_match: String,
    /// Processor requested by the rule
    pub processor: Option<String>,
}

impl FieldMatch {
    /// First capture group, or the whole match when the pattern has no groups.
    pub fn primary(&self) -> Option<&str> {
        if !self.matched {
            return None;
        }
        Some(
            self.groups
                .first()
                .map(String::as_str)
                .unwrap_or(self.full_match.as_str()),
        )
    }
}

/// Output of the rule-driven extraction path.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldExtraction {
    pub file: DiscoveredFile,
    pub benchmark: String,
    /// Primary rule outcomes by field name
    pub raw_matches: BTreeMap<String, FieldMatch>,
    /// Metadata rule outcomes by field name
    pub metadata_matches: BTreeMap<String, FieldMatch>,
    pub rules_applied: Vec<String>,
}

/// Processing outcome of one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Success,
    Partial,
    Failed,
    Skipped,
}

impl ProcessingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStatus::Success => "success",
            ProcessingStatus::Partial => "partial",
            ProcessingStatus::Failed => "failed",
            ProcessingStatus::Skipped => "skipped",
        }
    }

    /// All status names, in declaration order.
    pub fn names() -> [&'static str; 4] {
        ["success", "partial", "failed", "skipped"]
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An iteration as it appears in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationReport {
    pub iteration_id: String,
    pub unique_params: Params,
    pub sample_count: usize,
    pub result_count: usize,
    pub samples: Vec<Sample>,
    pub results: Vec<BenchResult>,
    pub test_description: String,
}

impl IterationReport {
    /// First result, which drives tabular output.
    pub fn first_result(&self) -> Option<&BenchResult> {
        self.results.first()
    }
}

/// Per-file statistics over all iterations.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunSummary {
    pub total_iterations: usize,
    pub total_samples: usize,
    /// Distinct result types, sorted
    pub result_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_mean: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_range: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_summary: Option<String>,
}

/// How a report was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingMetadata {
    pub transformation_time: String,
    pub status: ProcessingStatus,
    pub iterations_processed: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processors_used: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processing_errors: Vec<String>,
}

/// The report record for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileReport {
    pub file_path: String,
    pub benchmark: String,
    pub run_id: String,
    pub tags: String,
    pub common_params: Params,
    pub key_tags: Params,
    pub file_size: u64,
    /// Modification time in seconds since the Unix epoch
    pub file_modified: f64,
    pub total_iterations: usize,
    pub iterations: Vec<IterationReport>,
    pub summary: RunSummary,
    pub processing_metadata: ProcessingMetadata,
    pub extraction_metadata: ExtractionMetadata,
    /// Processed fields from the rule-driven path
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl FileReport {
    pub fn status(&self) -> ProcessingStatus {
        self.processing_metadata.status
    }

    /// File name component of `file_path`.
    pub fn file_name(&self) -> &str {
        Path::new(&self.file_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(&self.file_path)
    }

    /// Record for a file that could not be processed.
    pub fn failed(
        file: &DiscoveredFile,
        reason: impl Into<String>,
        transformation_time: impl Into<String>,
    ) -> Self {
        Self {
            file_path: file.path.display().to_string(),
            benchmark: crate::extract::UNKNOWN_BENCHMARK.to_string(),
            run_id: String::new(),
            tags: String::new(),
            common_params: Params::new(),
            key_tags: Params::new(),
            file_size: file.size,
            file_modified: file.modified_secs(),
            total_iterations: 0,
            iterations: Vec::new(),
            summary: RunSummary::default(),
            processing_metadata: ProcessingMetadata {
                transformation_time: transformation_time.into(),
                status: ProcessingStatus::Failed,
                iterations_processed: 0,
                processors_used: Vec::new(),
                processing_errors: vec![reason.into()],
            },
            extraction_metadata: ExtractionMetadata::default(),
            fields: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn measured() -> BenchResult {
        BenchResult::Measured(MeasuredResult {
            metric: "Gbps".to_string(),
            tool: Tool::Uperf,
            sample_values: vec![9.8, 9.9, 10.0],
            sample_count: 3,
            mean: 9.9,
            min: 9.8,
            max: 10.0,
            stddev: 0.1,
            stddevpct: 1.0,
            range: 0.2,
            unit: "Gbps".to_string(),
            cpu: None,
            stddev_undefined: false,
        })
    }

    #[test]
    fn test_measured_result_serializes_type_key() {
        let value = serde_json::to_value(measured()).unwrap();
        assert_eq!(value["type"], "Gbps");
        assert_eq!(value["tool"], "uperf");
        assert!(value.get("CPU").is_none());
        assert!(value.get("stddev_undefined").is_none());
    }

    #[test]
    fn test_untagged_results_deserialize_to_matching_variant() {
        let summary: BenchResult = serde_json::from_value(json!({
            "type": "rx-pps", "tool": "trafficgen", "samples": 5.0,
            "mean": 1.0, "min": 0.5, "max": 1.5, "unit": "packets/sec"
        }))
        .unwrap();
        assert!(matches!(summary, BenchResult::Summary(_)));

        let raw: BenchResult =
            serde_json::from_value(json!({"raw": "No result found", "type": "unknown"})).unwrap();
        assert!(raw.is_placeholder());

        let round: BenchResult =
            serde_json::from_value(serde_json::to_value(measured()).unwrap()).unwrap();
        assert_eq!(round, measured());
    }

    #[test]
    fn test_result_accessors() {
        let r = measured();
        assert_eq!(r.metric_type(), "Gbps");
        assert_eq!(r.mean(), Some(9.9));
        assert_eq!(r.sample_count(), Some(3));
        assert_eq!(BenchResult::generic("x").metric_type(), "generic");
        assert_eq!(BenchResult::placeholder().mean(), None);
    }

    #[test]
    fn test_processing_status_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProcessingStatus::Partial).unwrap(),
            "\"partial\""
        );
        assert_eq!(ProcessingStatus::Skipped.to_string(), "skipped");
    }

    #[test]
    fn test_legacy_iteration() {
        let it = Iteration::legacy(vec![]);
        assert_eq!(it.iteration_id, LEGACY_ITERATION_ID);
        assert_eq!(it.unique_params.get("format").map(String::as_str), Some("legacy"));
    }

    #[test]
    fn test_field_match_primary() {
        let m = FieldMatch {
            matched: true,
            groups: vec![],
            full_match: "run-id: abc".to_string(),
            processor: None,
        };
        assert_eq!(m.primary(), Some("run-id: abc"));
        assert_eq!(FieldMatch::default().primary(), None);
    }

    #[test]
    fn test_ruleset_validate_rejects_bad_pattern() {
        let set = RuleSet::new("x", vec![ExtractionRule::new("f", "(")]);
        assert!(set.validate().is_err());
    }

    #[test]
    fn test_failed_report() {
        let file = DiscoveredFile::new("runs/a/result-summary.txt", 12, UNIX_EPOCH);
        let report = FileReport::failed(&file, "unreadable", "2025-01-20T12:00:00.000000Z");
        assert_eq!(report.status(), ProcessingStatus::Failed);
        assert_eq!(report.benchmark, "unknown");
        assert_eq!(report.file_name(), "result-summary.txt");
        assert_eq!(report.processing_metadata.processing_errors, vec!["unreadable"]);
        assert!(report.iterations.is_empty());
    }
}

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

//! Transformation of extracted data into report records.
//!
//! Two paths share one output type:
//!
//! - **Iteration path**: [`DataTransformer::transform`] turns an
//!   [`ExtractedRun`] into a [`FileReport`] with per-iteration descriptions
//!   and a run summary.
//! - **Field path**: [`StandardDataTransformer::transform_fields`] runs named
//!   processors over rule matches and grades the outcome by match ratio.

use crate::clock::Clock;
use crate::model::{
    BenchResult, ExtractedRun, FieldExtraction, FieldMatch, FileReport, Iteration,
    IterationReport, Params, ProcessingMetadata, ProcessingStatus, RunSummary,
};
use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Fraction of matched rules below which a file counts as partial.
pub const DEFAULT_PARTIAL_THRESHOLD: f64 = 0.8;

/// Metric types preferred when picking an iteration's headline result.
const PRIMARY_METRICS: [&str; 4] = ["gbps", "mbps", "transactions-sec", "connections-sec"];

static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9.]+)\s*([a-zA-Z]+)").expect("valid duration regex"));

/// A named post-processor for one rule match.
pub type Processor = Box<dyn Fn(&FieldMatch) -> Result<Value, String> + Send + Sync>;

/// Turns extracted data into a report record.
pub trait DataTransformer: Send + Sync {
    fn transform(&self, run: ExtractedRun) -> FileReport;
}

/// The headline result: first match by metric priority, else the first
/// result with a mean, else the first result.
pub fn primary_result(results: &[BenchResult]) -> Option<&BenchResult> {
    PRIMARY_METRICS
        .iter()
        .find_map(|p| {
            results
                .iter()
                .find(|r| r.metric_type().to_lowercase().contains(p))
        })
        .or_else(|| results.iter().find(|r| r.mean().is_some()))
        .or_else(|| results.first())
}

/// Short human description of an iteration.
///
/// ```rust
/// use regulus_core::model::{Iteration, Params};
/// use regulus_core::transform::describe_iteration;
///
/// let mut params = Params::new();
/// params.insert("nthreads".into(), "4".into());
/// params.insert("test-type".into(), "stream".into());
/// let it = Iteration { unique_params: params, ..Default::default() };
/// assert_eq!(describe_iteration(&it, "uperf"), "4 threads, stream test");
/// ```
pub fn describe_iteration(iteration: &Iteration, benchmark: &str) -> String {
    let params = &iteration.unique_params;
    let mut parts = Vec::new();

    if let Some(threads) = params.get("nthreads") {
        let plural = if threads == "1" { "" } else { "s" };
        parts.push(format!("{} thread{}", threads, plural));
    }
    if let Some(test_type) = params.get("test-type") {
        parts.push(format!("{} test", test_type));
    }
    if let Some(wsize) = params.get("wsize") {
        parts.push(format!("write={}B", wsize));
    }
    if let Some(rsize) = params.get("rsize") {
        parts.push(format!("read={}B", rsize));
    }
    if let Some(primary) = primary_result(&iteration.results) {
        if let Some(mean) = primary.mean() {
            let unit = primary.unit().unwrap_or_else(|| primary.metric_type());
            parts.push(format!("\u{2192} {:.2} {}", mean, unit));
        }
    }

    if parts.is_empty() {
        format!("{} test", benchmark)
    } else {
        parts.join(", ")
    }
}

/// Human summary over the result means of a file.
pub fn performance_summary(means: &[f64]) -> String {
    if means.is_empty() {
        return "No performance data".to_string();
    }
    let min = means.iter().copied().fold(f64::INFINITY, f64::min);
    let max = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = means.iter().sum::<f64>() / means.len() as f64;

    if means.len() == 1 {
        return format!("Single test: {:.2}", avg);
    }
    let variance_pct = if avg > 0.0 {
        (max - min) / avg * 100.0
    } else {
        0.0
    };
    format!(
        "Range: {:.2} - {:.2}, Avg: {:.2}, Variance: {:.1}%",
        min, max, avg, variance_pct
    )
}

/// Statistics across every result of every iteration.
pub fn summarize(iterations: &[Iteration]) -> RunSummary {
    let means: Vec<f64> = iterations
        .iter()
        .flat_map(|it| it.results.iter().filter_map(BenchResult::mean))
        .collect();
    let result_types: BTreeSet<String> = iterations
        .iter()
        .flat_map(|it| it.results.iter().map(|r| r.metric_type().to_string()))
        .collect();

    let mut summary = RunSummary {
        total_iterations: iterations.len(),
        total_samples: iterations.iter().map(|it| it.samples.len()).sum(),
        result_types: result_types.into_iter().collect(),
        ..RunSummary::default()
    };

    if !means.is_empty() {
        let min = means.iter().copied().fold(f64::INFINITY, f64::min);
        let max = means.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        summary.overall_mean = Some(means.iter().sum::<f64>() / means.len() as f64);
        summary.overall_min = Some(min);
        summary.overall_max = Some(max);
        summary.result_range = Some(max - min);
        summary.performance_summary = Some(performance_summary(&means));
    }
    summary
}

fn first_group(m: &FieldMatch) -> Option<&str> {
    m.groups.first().map(String::as_str)
}

fn trafficgen_result(m: &FieldMatch) -> Result<Value, String> {
    let g = &m.groups;
    if g.len() < 5 {
        return Ok(json!({ "raw": g }));
    }
    let parse = |s: &str| s.parse::<f64>().map_err(|e| format!("'{}': {}", s, e));
    let parsed = (|| -> Result<Value, String> {
        Ok(json!({
            "type": g[0],
            "samples": parse(&g[1])?,
            "mean": parse(&g[2])?,
            "min": parse(&g[3])?,
            "max": parse(&g[4])?,
            "stddev": g.get(5).filter(|s| !s.is_empty()).map(|s| parse(s)).transpose()?,
        }))
    })();
    Ok(parsed.unwrap_or_else(|e| json!({ "raw": g, "error": e })))
}

fn timestamp_converter(m: &FieldMatch) -> Result<Value, String> {
    let Some(raw) = first_group(m) else {
        return Ok(Value::Null);
    };
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Ok(Value::String(raw.to_string()));
    }
    let converted = raw.parse::<i64>().ok().and_then(|ts| {
        let when = if ts > 10_000_000_000 {
            Utc.timestamp_millis_opt(ts).single()
        } else {
            Utc.timestamp_opt(ts, 0).single()
        };
        when.map(|dt| dt.to_rfc3339())
    });
    Ok(Value::String(converted.unwrap_or_else(|| raw.to_string())))
}

fn numeric_converter(m: &FieldMatch) -> Result<Value, String> {
    let Some(raw) = first_group(m) else {
        return Ok(Value::Null);
    };
    Ok(raw
        .parse::<f64>()
        .ok()
        .and_then(|v| serde_json::Number::from_f64(v).map(Value::Number))
        .unwrap_or_else(|| Value::String(raw.to_string())))
}

fn duration_parser(m: &FieldMatch) -> Result<Value, String> {
    let Some(raw) = first_group(m) else {
        return Ok(json!({}));
    };
    if let Some(caps) = DURATION.captures(raw) {
        if let Ok(value) = caps[1].parse::<f64>() {
            return Ok(json!({
                "value": value,
                "unit": caps[2].to_lowercase(),
                "raw": raw,
            }));
        }
    }
    Ok(json!({ "raw": raw }))
}

/// The default transformer.
pub struct StandardDataTransformer {
    processors: BTreeMap<String, Processor>,
    partial_threshold: f64,
    clock: Clock,
}

impl StandardDataTransformer {
    /// Transformer with the built-in processors registered.
    pub fn new() -> Self {
        let mut transformer = Self {
            processors: BTreeMap::new(),
            partial_threshold: DEFAULT_PARTIAL_THRESHOLD,
            clock: Clock::System,
        };
        transformer.add_processor("trafficgen_result", trafficgen_result);
        transformer.add_processor("timestamp_converter", timestamp_converter);
        transformer.add_processor("numeric_converter", numeric_converter);
        transformer.add_processor("duration_parser", duration_parser);
        transformer
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_partial_threshold(mut self, threshold: f64) -> Self {
        self.partial_threshold = threshold;
        self
    }

    /// Register or replace a processor.
    pub fn add_processor(
        &mut self,
        name: impl Into<String>,
        processor: impl Fn(&FieldMatch) -> Result<Value, String> + Send + Sync + 'static,
    ) {
        self.processors.insert(name.into(), Box::new(processor));
    }

    pub fn remove_processor(&mut self, name: &str) -> bool {
        self.processors.remove(name).is_some()
    }

    pub fn processor_names(&self) -> Vec<String> {
        self.processors.keys().cloned().collect()
    }

    fn grade_fields(&self, matches: &BTreeMap<String, FieldMatch>, errors: usize) -> ProcessingStatus {
        let total = matches.len();
        let matched = matches
            .values()
            .filter(|m| m.matched && !m.groups.is_empty())
            .count();

        if errors > 0 {
            return if matched > 0 {
                ProcessingStatus::Partial
            } else {
                ProcessingStatus::Failed
            };
        }
        if matched == 0 {
            ProcessingStatus::Failed
        } else if (matched as f64) < total as f64 * self.partial_threshold {
            ProcessingStatus::Partial
        } else {
            ProcessingStatus::Success
        }
    }

    /// Transform a rule-driven extraction.
    ///
    /// Fields with a registered processor get its output. Others get their
    /// first capture group or the whole match.
    pub fn transform_fields(&self, extraction: FieldExtraction) -> FileReport {
        let mut fields = BTreeMap::new();
        let mut errors = Vec::new();
        let mut processors_used = Vec::new();

        for (name, m) in &extraction.raw_matches {
            let registered = m
                .processor
                .as_deref()
                .and_then(|p| self.processors.get(p).map(|f| (p, f)));
            let value = match registered {
                Some((proc_name, processor)) => {
                    processors_used.push(proc_name.to_string());
                    match processor(m) {
                        Ok(v) => v,
                        Err(e) => {
                            errors.push(format!("Error processing {}: {}", name, e));
                            Value::String(format!("ERROR: {}", e))
                        }
                    }
                }
                None => Value::String(
                    first_group(m)
                        .map(str::to_string)
                        .unwrap_or_else(|| m.full_match.clone()),
                ),
            };
            fields.insert(name.clone(), value);
        }

        for (name, m) in &extraction.metadata_matches {
            if let Some(value) = m.primary() {
                fields
                    .entry(name.clone())
                    .or_insert_with(|| Value::String(value.to_string()));
            }
        }

        let status = self.grade_fields(&extraction.raw_matches, errors.len());
        debug!(file = %extraction.file.path.display(), %status, "transformed rule fields");

        FileReport {
            file_path: extraction.file.path.display().to_string(),
            benchmark: extraction.benchmark.clone(),
            run_id: String::new(),
            tags: String::new(),
            common_params: Params::new(),
            key_tags: Params::new(),
            file_size: extraction.file.size,
            file_modified: extraction.file.modified_secs(),
            total_iterations: 0,
            iterations: Vec::new(),
            summary: RunSummary::default(),
            processing_metadata: ProcessingMetadata {
                transformation_time: self.clock.timestamp(),
                status,
                iterations_processed: 0,
                processors_used,
                processing_errors: errors,
            },
            extraction_metadata: crate::model::ExtractionMetadata {
                rules_applied: extraction.rules_applied,
                benchmark_detected: extraction.benchmark,
                ..Default::default()
            },
            fields,
        }
    }
}

impl Default for StandardDataTransformer {
    fn default() -> Self {
        Self::new()
    }
}

impl DataTransformer for StandardDataTransformer {
    fn transform(&self, run: ExtractedRun) -> FileReport {
        let summary = summarize(&run.iterations);
        let status = if run.iterations.is_empty() {
            ProcessingStatus::Failed
        } else {
            ProcessingStatus::Success
        };

        let iterations: Vec<IterationReport> = run
            .iterations
            .iter()
            .map(|it| IterationReport {
                iteration_id: it.iteration_id.clone(),
                unique_params: it.unique_params.clone(),
                sample_count: it.samples.len(),
                result_count: it.results.len(),
                samples: it.samples.clone(),
                results: it.results.clone(),
                test_description: describe_iteration(it, &run.benchmark),
            })
            .collect();

        FileReport {
            file_path: run.file.path.display().to_string(),
            file_size: run.file.size,
            file_modified: run.file.modified_secs(),
            total_iterations: iterations.len(),
            processing_metadata: ProcessingMetadata {
                transformation_time: self.clock.timestamp(),
                status,
                iterations_processed: iterations.len(),
                processors_used: Vec::new(),
                processing_errors: Vec::new(),
            },
            iterations,
            summary,
            benchmark: run.benchmark,
            run_id: run.run_id,
            tags: run.tags,
            common_params: run.common_params,
            key_tags: run.key_tags,
            extraction_metadata: run.metadata,
            fields: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{parse_result_line, DataExtractor, RegexDataExtractor};
    use crate::model::{DiscoveredFile, ExtractionRule, RuleSet};
    use crate::rules::{ConfigurableRuleEngine, RuleEngine};
    use regulus_test::fixtures;
    use std::time::UNIX_EPOCH;

    fn matched(groups: &[&str]) -> FieldMatch {
        FieldMatch {
            matched: true,
            groups: groups.iter().map(|s| s.to_string()).collect(),
            full_match: groups.join(" "),
            processor: None,
        }
    }

    fn report(content: &str) -> FileReport {
        let rules = ConfigurableRuleEngine::new().rules_for("default");
        let file = DiscoveredFile::new("run/result-summary.txt", 10, UNIX_EPOCH);
        let run = RegexDataExtractor::new().extract(content, &rules, &file);
        StandardDataTransformer::new().transform(run)
    }

    #[test]
    fn test_single_iteration_description_and_summary() {
        let report = report(fixtures::UPERF_SINGLE);
        assert_eq!(report.status(), ProcessingStatus::Success);
        assert_eq!(report.total_iterations, 1);
        assert_eq!(
            report.iterations[0].test_description,
            "1 thread, stream test, write=1024B, read=1024B, \u{2192} 9.90 Gbps"
        );
        assert_eq!(
            report.summary.performance_summary.as_deref(),
            Some("Single test: 9.90")
        );
    }

    #[test]
    fn test_multi_iteration_summary() {
        let report = report(fixtures::UPERF_MULTI);
        assert_eq!(report.summary.total_iterations, 3);
        assert_eq!(report.summary.result_types, vec!["Gbps", "transactions-sec"]);
        let perf = report.summary.performance_summary.unwrap();
        assert!(perf.starts_with("Range: "), "{}", perf);
    }

    #[test]
    fn test_placeholder_only_file_has_no_statistics() {
        let report = report(fixtures::EMPTY_ITERATION);
        assert_eq!(report.status(), ProcessingStatus::Success);
        assert!(report.summary.overall_mean.is_none());
        assert_eq!(report.summary.result_types, vec!["unknown"]);
    }

    #[test]
    fn test_description_fallback() {
        let it = Iteration::default();
        assert_eq!(describe_iteration(&it, "fio"), "fio test");
    }

    #[test]
    fn test_primary_result_priority() {
        let tps = parse_result_line(
            "result: (uperf::transactions-sec) samples: 5 mean: 5 min: 5 max: 5 stddev: 0 stddevpct: 0",
        )
        .unwrap();
        let gbps = parse_result_line(
            "result: (uperf::Gbps) samples: 1 mean: 1 min: 1 max: 1 stddev: 0 stddevpct: 0",
        )
        .unwrap();
        let results = vec![BenchResult::generic("x"), tps, gbps.clone()];
        assert_eq!(primary_result(&results), Some(&gbps));
        assert_eq!(primary_result(&[]), None);
    }

    #[test]
    fn test_performance_summary_variance() {
        assert_eq!(
            performance_summary(&[10.0, 20.0]),
            "Range: 10.00 - 20.00, Avg: 15.00, Variance: 66.7%"
        );
        assert_eq!(performance_summary(&[]), "No performance data");
    }

    #[test]
    fn test_builtin_processors() {
        let t = trafficgen_result(&matched(&["rx-pps", "3", "1.5", "1", "2"])).unwrap();
        assert_eq!(t["mean"], 1.5);
        assert!(t["stddev"].is_null());

        let bad = trafficgen_result(&matched(&["rx-pps", "x", "1", "1", "1"])).unwrap();
        assert!(bad.get("error").is_some());

        assert_eq!(numeric_converter(&matched(&["42.5"])).unwrap(), json!(42.5));
        assert_eq!(numeric_converter(&matched(&["n/a"])).unwrap(), json!("n/a"));

        assert_eq!(
            timestamp_converter(&matched(&["0"])).unwrap(),
            json!("1970-01-01T00:00:00+00:00")
        );
        assert_eq!(
            timestamp_converter(&matched(&["yesterday"])).unwrap(),
            json!("yesterday")
        );

        let d = duration_parser(&matched(&["60.0 Seconds"])).unwrap();
        assert_eq!(d["value"], 60.0);
        assert_eq!(d["unit"], "seconds");
    }

    fn extraction(matches: Vec<(&str, FieldMatch)>) -> FieldExtraction {
        FieldExtraction {
            file: DiscoveredFile::new("f.txt", 1, UNIX_EPOCH),
            benchmark: "custom".to_string(),
            raw_matches: matches
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            metadata_matches: BTreeMap::new(),
            rules_applied: Vec::new(),
        }
    }

    #[test]
    fn test_field_status_grading() {
        let t = StandardDataTransformer::new();

        let all = extraction(vec![("a", matched(&["1"])), ("b", matched(&["2"]))]);
        assert_eq!(t.transform_fields(all).status(), ProcessingStatus::Success);

        let half = extraction(vec![("a", matched(&["1"])), ("b", FieldMatch::default())]);
        assert_eq!(t.transform_fields(half).status(), ProcessingStatus::Partial);

        let none = extraction(vec![("a", FieldMatch::default())]);
        assert_eq!(t.transform_fields(none).status(), ProcessingStatus::Failed);

        let lenient = StandardDataTransformer::new().with_partial_threshold(0.5);
        let half = extraction(vec![("a", matched(&["1"])), ("b", FieldMatch::default())]);
        assert_eq!(lenient.transform_fields(half).status(), ProcessingStatus::Success);
    }

    #[test]
    fn test_processor_errors_are_recorded() {
        let mut t = StandardDataTransformer::new();
        t.add_processor("always_fails", |_: &FieldMatch| Err("boom".to_string()));

        let mut m = matched(&["1"]);
        m.processor = Some("always_fails".to_string());
        let report = t.transform_fields(extraction(vec![("a", m)]));

        assert_eq!(report.status(), ProcessingStatus::Partial);
        assert_eq!(report.fields["a"], json!("ERROR: boom"));
        assert_eq!(
            report.processing_metadata.processing_errors,
            vec!["Error processing a: boom"]
        );
        assert!(t.remove_processor("always_fails"));
        assert!(!t.remove_processor("always_fails"));
    }

    #[test]
    fn test_field_path_end_to_end() {
        let rules = RuleSet::new(
            "custom",
            vec![
                ExtractionRule::new("benchmark", r"benchmark:\s*(.+)"),
                ExtractionRule::new("period", r"period length:\s*([0-9.]+\s*\w+)")
                    .with_processor("duration_parser"),
            ],
        );
        let file = DiscoveredFile::new("f.txt", 1, UNIX_EPOCH);
        let extraction =
            RegexDataExtractor::new().extract_fields(fixtures::UPERF_SINGLE, &rules, &file);
        let report = StandardDataTransformer::new().transform_fields(extraction);
        assert_eq!(report.status(), ProcessingStatus::Success);
        assert_eq!(report.fields["benchmark"], json!("uperf"));
        assert_eq!(report.fields["period"]["unit"], "seconds");
        assert_eq!(report.processing_metadata.processors_used, vec!["duration_parser"]);
    }
}

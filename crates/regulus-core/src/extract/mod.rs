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

//! Data extraction from result log text.
//!
//! # Log Layout
//!
//! ```text
//! benchmark: uperf
//! run-id: 3f2a...
//! tags: model=dell perf=on topo=internode
//! common params: protocol=tcp test-type=stream
//! iteration-id: 8D1C...
//!   unique params: nthreads=1 wsize=1024
//!   sample-id: 11AA... period range: begin: 1 end: 2 period length: 60.0 seconds
//!   result: (uperf::Gbps) samples: ... mean: ... min: ... max: ... stddev: ... stddevpct: ...
//! ```
//!
//! Everything from one `iteration-id:` line up to the next belongs to that
//! iteration. A log without markers becomes a single legacy iteration built
//! from every result line in the file.

mod fields;
mod grammar;

pub use fields::apply_rules;
pub use grammar::{infer_unit, parse_result_line, ResultGrammar};

use crate::model::{
    BenchResult, DiscoveredFile, ExtractedRun, ExtractionMetadata, FieldExtraction, Iteration,
    Params, RuleSet, Sample,
};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{trace, warn};

/// Tag keys surfaced as `key_tags`.
pub const KEY_TAGS: &[&str] = &[
    "model",
    "perf",
    "offload",
    "kernel",
    "rcos",
    "cpu",
    "pods-per-worker",
    "scale_out_factor",
    "topo",
];

/// Benchmark name reported when none can be detected.
pub const UNKNOWN_BENCHMARK: &str = "unknown";

static BENCHMARK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)benchmark:[ \t]*([\w.-]+)").expect("valid benchmark regex"));
static RUN_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)run-id:\s*([a-f0-9-]+)").expect("valid run-id regex"));
static TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)tags:[ \t]*(.*)$").expect("valid tags regex"));
static COMMON_PARAMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)common params:[ \t]*(.*)$").expect("valid common params regex")
});
static UNIQUE_PARAMS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)unique params:[ \t]*(.*)$").expect("valid unique params regex")
});
static ITERATION_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)iteration-id:\s*(\S+)").expect("valid iteration-id regex"));
static SAMPLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)sample-id:\s*([a-f0-9-]+).*?period range:.*?begin:\s*(\d+)\s+end:\s*(\d+).*?period length:\s*([0-9.-]+)\s*seconds",
    )
    .expect("valid sample regex")
});

/// Turns log text into an [`ExtractedRun`].
pub trait DataExtractor: Send + Sync {
    fn extract(&self, content: &str, rules: &RuleSet, file: &DiscoveredFile) -> ExtractedRun;
}

/// Detect the benchmark name with the built-in pattern.
pub fn detect_benchmark(content: &str) -> Option<String> {
    BENCHMARK
        .captures(content)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Split whitespace-separated `key=value` tokens. Tokens without `=` are ignored.
pub fn parse_key_values(text: &str) -> Params {
    text.split_whitespace()
        .filter_map(|token| token.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Regex-based extractor for the result log layout.
#[derive(Debug, Clone, Default)]
pub struct RegexDataExtractor {
    enable_timing: bool,
}

impl RegexDataExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record extraction duration in the metadata.
    pub fn with_timing(mut self, enable: bool) -> Self {
        self.enable_timing = enable;
        self
    }

    fn benchmark(content: &str, rules: &RuleSet) -> String {
        for rule in rules.rules.iter().filter(|r| r.field_name == "benchmark") {
            let re = match RegexBuilder::new(&rule.pattern)
                .case_insensitive(true)
                .multi_line(true)
                .build()
            {
                Ok(re) => re,
                Err(e) => {
                    warn!(error = %e, "invalid benchmark rule pattern");
                    continue;
                }
            };
            if let Some(name) = re
                .captures(content)
                .and_then(|c| c.get(1))
                .map(|m| m.as_str().trim())
                .filter(|s| !s.is_empty())
            {
                return name.to_string();
            }
        }
        detect_benchmark(content).unwrap_or_else(|| UNKNOWN_BENCHMARK.to_string())
    }

    fn line_value(re: &Regex, content: &str) -> String {
        re.captures(content)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_default()
    }

    fn key_tags(tags: &str) -> Params {
        parse_key_values(tags)
            .into_iter()
            .filter(|(k, _)| KEY_TAGS.contains(&k.as_str()))
            .collect()
    }

    /// Iteration blocks in source order, as `(id, block text)`.
    fn iteration_blocks(content: &str) -> Vec<(String, String)> {
        let mut blocks: Vec<(String, String)> = Vec::new();
        for line in content.lines() {
            if line.contains("iteration-id:") {
                if let Some(caps) = ITERATION_ID.captures(line) {
                    blocks.push((caps[1].to_string(), line.to_string()));
                    continue;
                }
            }
            if let Some((_, block)) = blocks.last_mut() {
                block.push('\n');
                block.push_str(line);
            }
        }
        blocks
    }

    fn samples(block: &str) -> Vec<Sample> {
        SAMPLE
            .captures_iter(block)
            .filter_map(|c| {
                Some(Sample {
                    sample_id: c[1].to_string(),
                    begin: c[2].parse().ok()?,
                    end: c[3].parse().ok()?,
                    duration: c[4].parse().ok()?,
                })
            })
            .collect()
    }

    fn results(text: &str) -> Vec<BenchResult> {
        text.lines()
            .filter(|line| line.contains("result:"))
            .filter_map(|line| {
                let parsed = parse_result_line(line);
                if parsed.is_none() {
                    trace!(line, "dropping result line rejected by its grammar");
                }
                parsed
            })
            .collect()
    }

    /// Result lines of `text`, or the placeholder when none parse.
    fn results_or_placeholder(text: &str) -> Vec<BenchResult> {
        let mut results = Self::results(text);
        if results.is_empty() {
            results.push(BenchResult::placeholder());
        }
        results
    }

    fn parse_iteration(id: String, block: &str) -> Iteration {
        let results = Self::results_or_placeholder(block);
        Iteration {
            iteration_id: id,
            unique_params: parse_key_values(&Self::line_value(&UNIQUE_PARAMS, block)),
            samples: Self::samples(block),
            results,
        }
    }

    /// Parse every block, merging repeated ids into their first occurrence.
    fn iterations(content: &str) -> Vec<Iteration> {
        let mut iterations: Vec<Iteration> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for (id, block) in Self::iteration_blocks(content) {
            let parsed = Self::parse_iteration(id, &block);
            match index.get(&parsed.iteration_id) {
                Some(&at) => {
                    let existing = &mut iterations[at];
                    for (k, v) in parsed.unique_params {
                        existing.unique_params.entry(k).or_insert(v);
                    }
                    existing.samples.extend(parsed.samples);
                    existing.results.retain(|r| !r.is_placeholder());
                    existing
                        .results
                        .extend(parsed.results.into_iter().filter(|r| !r.is_placeholder()));
                    if existing.results.is_empty() {
                        existing.results.push(BenchResult::placeholder());
                    }
                }
                None => {
                    index.insert(parsed.iteration_id.clone(), iterations.len());
                    iterations.push(parsed);
                }
            }
        }

        if iterations.is_empty() {
            iterations.push(Iteration::legacy(Self::results_or_placeholder(content)));
        }
        iterations
    }

    /// Rule-driven extraction: apply each primary and metadata rule once.
    pub fn extract_fields(
        &self,
        content: &str,
        rules: &RuleSet,
        file: &DiscoveredFile,
    ) -> FieldExtraction {
        FieldExtraction {
            file: file.clone(),
            benchmark: Self::benchmark(content, rules),
            raw_matches: apply_rules(content, &rules.rules),
            metadata_matches: apply_rules(content, rules.metadata()),
            rules_applied: rules.rules.iter().map(|r| r.field_name.clone()).collect(),
        }
    }
}

impl DataExtractor for RegexDataExtractor {
    fn extract(&self, content: &str, rules: &RuleSet, file: &DiscoveredFile) -> ExtractedRun {
        let started = Instant::now();

        let benchmark = Self::benchmark(content, rules);
        let tags = Self::line_value(&TAGS, content);
        let iterations = Self::iterations(content);

        let metadata = ExtractionMetadata {
            rules_applied: rules.rules.iter().map(|r| r.field_name.clone()).collect(),
            iterations_found: iterations.len(),
            total_samples: iterations.iter().map(|it| it.samples.len()).sum(),
            benchmark_detected: benchmark.clone(),
            extraction_duration_ms: self
                .enable_timing
                .then(|| started.elapsed().as_secs_f64() * 1000.0),
        };

        ExtractedRun {
            file: file.clone(),
            run_id: Self::line_value(&RUN_ID, content),
            common_params: parse_key_values(&Self::line_value(&COMMON_PARAMS, content)),
            key_tags: Self::key_tags(&tags),
            tags,
            benchmark,
            iterations,
            metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{ConfigurableRuleEngine, RuleEngine};
    use proptest::prelude::*;
    use regulus_test::{fixtures, IterationBuilder, LogBuilder};
    use std::time::UNIX_EPOCH;

    fn run(content: &str) -> ExtractedRun {
        let rules = ConfigurableRuleEngine::new().rules_for("default");
        let file = DiscoveredFile::new("run/result-summary.txt", content.len() as u64, UNIX_EPOCH);
        RegexDataExtractor::new().extract(content, &rules, &file)
    }

    #[test]
    fn test_single_uperf_iteration() {
        let extracted = run(fixtures::UPERF_SINGLE);
        assert_eq!(extracted.benchmark, "uperf");
        assert_eq!(extracted.iterations.len(), 1);

        let it = &extracted.iterations[0];
        assert_eq!(it.unique_params.get("nthreads").map(String::as_str), Some("1"));
        assert_eq!(it.samples.len(), 1);
        assert_eq!(it.results.len(), 1);
        assert_eq!(it.results[0].metric_type(), "Gbps");
        assert_eq!(it.results[0].mean(), Some(9.9));
    }

    #[test]
    fn test_header_fields() {
        let extracted = run(fixtures::UPERF_MULTI);
        assert_eq!(extracted.run_id, "3f2a1c9e-0000-4d2b-9b1a-aa00bb11cc22");
        assert_eq!(extracted.common_params.get("protocol").map(String::as_str), Some("tcp"));
        assert_eq!(extracted.key_tags.get("model").map(String::as_str), Some("dell-r750"));
        assert!(!extracted.key_tags.contains_key("unrelated"));
        assert!(extracted.tags.contains("unrelated=1"));
    }

    #[test]
    fn test_iterations_in_source_order() {
        let extracted = run(fixtures::UPERF_MULTI);
        let ids: Vec<_> = extracted
            .iterations
            .iter()
            .map(|it| it.iteration_id.as_str())
            .collect();
        assert_eq!(ids, vec!["AAAA-0001", "BBBB-0002", "CCCC-0003"]);
        assert_eq!(extracted.metadata.iterations_found, 3);
        assert_eq!(extracted.iterations[1].results.len(), 2);
    }

    #[test]
    fn test_iteration_without_results_gets_placeholder() {
        let extracted = run(fixtures::EMPTY_ITERATION);
        assert_eq!(extracted.iterations.len(), 1);
        assert!(extracted.iterations[0].results[0].is_placeholder());
    }

    #[test]
    fn test_log_without_markers_is_legacy() {
        let extracted = run(fixtures::LEGACY);
        assert_eq!(extracted.iterations.len(), 1);
        let it = &extracted.iterations[0];
        assert_eq!(it.iteration_id, crate::model::LEGACY_ITERATION_ID);
        assert_eq!(it.results.len(), 2);
    }

    #[test]
    fn test_log_without_markers_or_results_gets_placeholder() {
        let extracted = run("benchmark: uperf\nno results here\n");
        assert_eq!(extracted.iterations.len(), 1);
        let it = &extracted.iterations[0];
        assert_eq!(it.iteration_id, crate::model::LEGACY_ITERATION_ID);
        assert_eq!(it.results.len(), 1);
        assert!(it.results[0].is_placeholder());
        assert_eq!(it.results[0].metric_type(), "unknown");
    }

    #[test]
    fn test_duplicate_iteration_ids_merge() {
        let content = "benchmark: uperf\n\
            iteration-id: AAAA\n  unique params: nthreads=1\n\
            result: (uperf::Gbps) samples: 1 mean: 1 min: 1 max: 1 stddev: 0 stddevpct: 0\n\
            iteration-id: AAAA\n  unique params: nthreads=2 wsize=64\n\
            result: (uperf::Mbps) samples: 2 mean: 2 min: 2 max: 2 stddev: 0 stddevpct: 0\n";
        let extracted = run(content);
        assert_eq!(extracted.iterations.len(), 1);
        let it = &extracted.iterations[0];
        assert_eq!(it.results.len(), 2);
        assert_eq!(it.unique_params.get("nthreads").map(String::as_str), Some("1"));
        assert_eq!(it.unique_params.get("wsize").map(String::as_str), Some("64"));
    }

    #[test]
    fn test_benchmark_falls_back_to_unknown() {
        assert_eq!(run("nothing useful here\n").benchmark, UNKNOWN_BENCHMARK);
    }

    #[test]
    fn test_timing_is_optional() {
        let rules = ConfigurableRuleEngine::new().rules_for("default");
        let file = DiscoveredFile::new("f", 0, UNIX_EPOCH);
        let untimed = RegexDataExtractor::new().extract(fixtures::UPERF_SINGLE, &rules, &file);
        let timed = RegexDataExtractor::new()
            .with_timing(true)
            .extract(fixtures::UPERF_SINGLE, &rules, &file);
        assert!(untimed.metadata.extraction_duration_ms.is_none());
        assert!(timed.metadata.extraction_duration_ms.is_some());
    }

    #[test]
    fn test_extract_fields_uses_rules() {
        let rules = ConfigurableRuleEngine::new().rules_for("trafficgen");
        let file = DiscoveredFile::new("f", 0, UNIX_EPOCH);
        let fields =
            RegexDataExtractor::new().extract_fields(fixtures::TRAFFICGEN, &rules, &file);
        assert_eq!(fields.benchmark, "trafficgen");
        assert!(fields.raw_matches["result"].matched);
        assert_eq!(fields.raw_matches["result"].groups[0], "trafficgen::rx-pps");
        assert!(fields.metadata_matches["iteration-id"].matched);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(48))]

        #[test]
        fn prop_every_iteration_has_a_result(
            with_results in prop::collection::vec(any::<bool>(), 0..8)
        ) {
            let mut builder = LogBuilder::new("uperf");
            for (i, has_result) in with_results.iter().enumerate() {
                let mut it = IterationBuilder::new(&format!("ITER-{:03}", i));
                if *has_result {
                    it = it.uperf_result("Gbps", &[2.0, 3.0]);
                }
                builder = builder.iteration(it);
            }
            let extracted = run(&builder.build());

            prop_assert_eq!(extracted.iterations.len(), with_results.len().max(1));
            prop_assert!(extracted.iterations.iter().all(|it| !it.results.is_empty()));
            if with_results.is_empty() {
                prop_assert_eq!(
                    extracted.iterations[0].iteration_id.as_str(),
                    crate::model::LEGACY_ITERATION_ID
                );
                prop_assert!(extracted.iterations[0].results[0].is_placeholder());
            }
        }
    }

    #[test]
    fn test_parse_key_values_ignores_bare_tokens() {
        let params = parse_key_values("a=1 flag b=x=y");
        assert_eq!(params.len(), 2);
        assert_eq!(params["b"], "x=y");
    }
}

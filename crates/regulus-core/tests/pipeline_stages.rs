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

//! Stage-to-stage tests over real files on disk.

use regulus_core::model::Tool;
use regulus_core::{
    BenchResult, CachingParser, ConfigurableRuleEngine, ContentParser, DataExtractor,
    DataTransformer, FileDiscovery, ProcessingStatus, RegexDataExtractor, RuleEngine,
    StandardDataTransformer, StandardFileDiscovery, TextFileParser, DEFAULT_FILE_PATTERN,
};
use regulus_test::{fixtures, TreeBuilder};

// ===== Full stage chain =====

#[test]
fn test_discovered_files_flow_through_every_stage() {
    let tree = TreeBuilder::new()
        .file("uperf/result-summary.txt", fixtures::UPERF_MULTI)
        .file("iperf/result-summary.txt", fixtures::IPERF)
        .file("trafficgen/result-summary.txt", fixtures::TRAFFICGEN)
        .build();

    let files = StandardFileDiscovery::new().discover(tree.path(), DEFAULT_FILE_PATTERN, 8);
    assert_eq!(files.len(), 3);

    let parser = TextFileParser::new();
    let engine = ConfigurableRuleEngine::new();
    let extractor = RegexDataExtractor::new();
    let transformer = StandardDataTransformer::new();

    let reports: Vec<_> = files
        .iter()
        .map(|file| {
            let content = parser.parse(file).expect("fixture is readable");
            let benchmark = regulus_core::detect_benchmark(&content).unwrap_or_default();
            let rules = engine.rules_for(&benchmark);
            transformer.transform(extractor.extract(&content, &rules, file))
        })
        .collect();

    let mut benchmarks: Vec<_> = reports.iter().map(|r| r.benchmark.as_str()).collect();
    benchmarks.sort();
    assert_eq!(benchmarks, vec!["iperf", "trafficgen", "uperf"]);
    assert!(reports
        .iter()
        .all(|r| r.status() == ProcessingStatus::Success));
}

// ===== Result grammars =====

#[test]
fn test_iperf_results_carry_cpu_and_nan_flag() {
    let tree = TreeBuilder::new()
        .file("run/result-summary.txt", fixtures::IPERF)
        .build();
    let file = &StandardFileDiscovery::new().discover(tree.path(), DEFAULT_FILE_PATTERN, 2)[0];
    let content = TextFileParser::new().parse(file).unwrap();
    let run = RegexDataExtractor::new().extract(
        &content,
        &ConfigurableRuleEngine::new().rules_for("iperf"),
        file,
    );

    assert_eq!(run.iterations.len(), 2);
    let second = &run.iterations[1].results[0];
    match second {
        BenchResult::Measured(m) => {
            assert_eq!(m.tool, Tool::Iperf);
            assert_eq!(m.cpu, Some(12.5));
            assert!(m.stddev_undefined);
            assert_eq!(m.stddev, 0.0);
        }
        other => panic!("expected measured result, got {:?}", other),
    }
}

#[test]
fn test_generic_and_trafficgen_results() {
    let rules = ConfigurableRuleEngine::new().rules_for("default");
    let file = regulus_core::DiscoveredFile::new("x", 0, std::time::UNIX_EPOCH);
    let extractor = RegexDataExtractor::new();

    let generic = extractor.extract(fixtures::GENERIC, &rules, &file);
    assert_eq!(generic.iterations[0].results[0].metric_type(), "generic");

    let tg = extractor.extract(fixtures::TRAFFICGEN, &rules, &file);
    let result = &tg.iterations[0].results[0];
    assert_eq!(result.metric_type(), "rx-pps");
    assert_eq!(result.unit(), Some("packets/sec"));
    assert_eq!(result.sample_count(), Some(3));
    assert_eq!(tg.iterations[0].samples[0].duration, 30.0);
}

// ===== Caching =====

#[test]
fn test_cached_content_matches_uncached() {
    let tree = TreeBuilder::new()
        .file("a/result-summary.txt", fixtures::UPERF_SINGLE)
        .build();
    let file = &StandardFileDiscovery::new().discover(tree.path(), DEFAULT_FILE_PATTERN, 8)[0];

    let cached = CachingParser::new(TextFileParser::new());
    let first = cached.parse(file);
    let second = cached.parse(file);
    assert_eq!(first, second);
    assert_eq!(first, TextFileParser::new().parse(file));
    assert_eq!(cached.stats().hits, 1);
}

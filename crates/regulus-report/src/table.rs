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

//! One-row-per-iteration tabular view shared by the CSV and HTML outputs.

use regulus_core::{FileReport, IterationReport, Params};
use std::collections::{BTreeMap, BTreeSet};

/// Fixed leading columns, in output order.
pub const PREFERRED_COLUMNS: [&str; 17] = [
    "file",
    "benchmark",
    "model",
    "perf",
    "config",
    "cpu",
    "test_type",
    "threads",
    "wsize",
    "rsize",
    "samples",
    "mean",
    "unit",
    "busyCPU",
    "stddev%",
    "iteration_id",
    "protocol",
];

/// Parameters already shown in a fixed column.
const CONSUMED_PARAMS: [&str; 5] = ["test-type", "nthreads", "wsize", "rsize", "protocol"];

/// Parameters iperf iterations normally carry. Anything else marks the
/// iteration as a custom test.
const IPERF_KNOWN_PARAMS: [&str; 12] = [
    "protocol",
    "max-loss-pct",
    "bitrate-range",
    "length",
    "nthreads",
    "test-type",
    "wsize",
    "rsize",
    "num_clients",
    "ifname",
    "ipv",
    "time",
];

/// Longest iteration id shown.
const ITERATION_ID_WIDTH: usize = 16;

/// Column headers plus one row of cells per iteration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Common params overlaid with the iteration's unique params.
pub fn merged_params(report: &FileReport, iteration: &IterationReport) -> Params {
    let mut params = report.common_params.clone();
    params.extend(
        iteration
            .unique_params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );
    params
}

/// `<pods-per-worker>,<scale_out_factor>,<topo>` with `?` for missing parts.
pub fn config_triple(report: &FileReport) -> String {
    ["pods-per-worker", "scale_out_factor", "topo"]
        .iter()
        .map(|k| report.key_tags.get(*k).map(String::as_str).unwrap_or("?"))
        .collect::<Vec<_>>()
        .join(",")
}

/// The iteration's test type; iperf iterations with unrecognized
/// parameters get a `custom` marker.
pub fn test_type(report: &FileReport, iteration: &IterationReport) -> String {
    let params = merged_params(report, iteration);
    let base = params.get("test-type").cloned().unwrap_or_default();

    let custom = report.benchmark == "iperf"
        && iteration
            .unique_params
            .keys()
            .any(|k| !IPERF_KNOWN_PARAMS.contains(&k.as_str()));
    match (custom, base.is_empty()) {
        (false, _) => base,
        (true, true) => "custom".to_string(),
        (true, false) => format!("{}, custom", base),
    }
}

/// Render a float the way the logs print them.
pub fn format_number(value: f64) -> String {
    format!("{}", value)
}

fn truncate_id(id: &str) -> String {
    id.chars().take(ITERATION_ID_WIDTH).collect()
}

fn file_cell(report: &FileReport, base_url: Option<&str>) -> String {
    let name = report.file_name();
    match base_url.filter(|u| !u.is_empty()) {
        Some(base) => format!(
            "=HYPERLINK(\"{}/{}\",\"{}\")",
            base.trim_end_matches('/'),
            report.file_path.trim_start_matches('/'),
            name
        ),
        None => name.to_string(),
    }
}

fn row_values(
    report: &FileReport,
    iteration: &IterationReport,
    base_url: Option<&str>,
) -> BTreeMap<String, String> {
    let params = merged_params(report, iteration);
    let param = |key: &str| params.get(key).cloned().unwrap_or_default();
    let tag = |key: &str| report.key_tags.get(key).cloned().unwrap_or_default();
    let result = iteration.first_result();
    let opt = |v: Option<f64>| v.map(format_number).unwrap_or_default();

    let mut values = BTreeMap::new();
    let mut put = |k: &str, v: String| {
        values.insert(k.to_string(), v);
    };
    put("file", file_cell(report, base_url));
    put("benchmark", report.benchmark.clone());
    put("model", tag("model"));
    put("perf", tag("perf"));
    put("config", config_triple(report));
    put("cpu", tag("cpu"));
    put("test_type", test_type(report, iteration));
    put("threads", param("nthreads"));
    put("wsize", param("wsize"));
    put("rsize", param("rsize"));
    put(
        "samples",
        result
            .and_then(|r| r.sample_count())
            .map(|n| n.to_string())
            .unwrap_or_default(),
    );
    put("mean", opt(result.and_then(|r| r.mean())));
    put(
        "unit",
        result.and_then(|r| r.unit()).unwrap_or_default().to_string(),
    );
    put("busyCPU", opt(result.and_then(|r| r.cpu())));
    put("stddev%", opt(result.and_then(|r| r.stddevpct())));
    put("iteration_id", truncate_id(&iteration.iteration_id));
    put("protocol", param("protocol"));

    for (key, value) in &params {
        if !CONSUMED_PARAMS.contains(&key.as_str()) && !values.contains_key(key) {
            values.insert(key.clone(), value.clone());
        }
    }
    values
}

/// Build the table. Columns are the fixed ones followed by every other
/// parameter seen in any iteration, sorted.
pub fn build_table(reports: &[FileReport], base_url: Option<&str>) -> Table {
    let all: Vec<BTreeMap<String, String>> = reports
        .iter()
        .flat_map(|r| r.iterations.iter().map(move |it| row_values(r, it, base_url)))
        .collect();

    let extras: BTreeSet<&String> = all
        .iter()
        .flat_map(|row| row.keys())
        .filter(|k| !PREFERRED_COLUMNS.contains(&k.as_str()))
        .collect();

    let columns: Vec<String> = PREFERRED_COLUMNS
        .iter()
        .map(|c| c.to_string())
        .chain(extras.into_iter().cloned())
        .collect();

    let rows = all
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| row.get(c).cloned().unwrap_or_default())
                .collect()
        })
        .collect();

    Table { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regulus_core::{
        ConfigurableRuleEngine, DataExtractor, DataTransformer, DiscoveredFile,
        RegexDataExtractor, RuleEngine, StandardDataTransformer,
    };
    use regulus_test::fixtures;
    use std::time::UNIX_EPOCH;

    fn report(path: &str, log: &str) -> FileReport {
        let rules = ConfigurableRuleEngine::new().rules_for("default");
        let file = DiscoveredFile::new(path, log.len() as u64, UNIX_EPOCH);
        let run = RegexDataExtractor::new().extract(log, &rules, &file);
        StandardDataTransformer::new().transform(run)
    }

    fn cell<'a>(table: &'a Table, row: usize, column: &str) -> &'a str {
        let idx = table.columns.iter().position(|c| c == column).unwrap();
        &table.rows[row][idx]
    }

    #[test]
    fn test_one_row_per_iteration() {
        let table = build_table(
            &[
                report("a/result-summary.txt", fixtures::UPERF_MULTI),
                report("b/result-summary.txt", fixtures::UPERF_SINGLE),
            ],
            None,
        );
        assert_eq!(table.rows.len(), 4);
        assert_eq!(&table.columns[..17], &PREFERRED_COLUMNS.map(String::from)[..]);
    }

    #[test]
    fn test_uperf_cells() {
        let table = build_table(&[report("a/result-summary.txt", fixtures::UPERF_SINGLE)], None);
        assert_eq!(cell(&table, 0, "file"), "result-summary.txt");
        assert_eq!(cell(&table, 0, "model"), "dell-r750");
        assert_eq!(cell(&table, 0, "config"), "?,?,intranode");
        assert_eq!(cell(&table, 0, "test_type"), "stream");
        assert_eq!(cell(&table, 0, "threads"), "1");
        assert_eq!(cell(&table, 0, "mean"), "9.9");
        assert_eq!(cell(&table, 0, "unit"), "Gbps");
        assert_eq!(cell(&table, 0, "protocol"), "tcp");
        // duration is a common param without a fixed column
        assert_eq!(cell(&table, 0, "duration"), "60");
    }

    #[test]
    fn test_config_triple_and_truncated_id() {
        let table = build_table(&[report("a/result-summary.txt", fixtures::UPERF_MULTI)], None);
        assert_eq!(cell(&table, 0, "config"), "4,2,?");
        assert_eq!(cell(&table, 0, "cpu"), "26");
        assert!(cell(&table, 0, "iteration_id").chars().count() <= ITERATION_ID_WIDTH);
    }

    #[test]
    fn test_iperf_custom_marker() {
        let table = build_table(&[report("a/result-summary.txt", fixtures::IPERF)], None);
        assert_eq!(cell(&table, 0, "test_type"), "");
        assert_eq!(cell(&table, 1, "test_type"), "custom");
        assert_eq!(cell(&table, 0, "busyCPU"), "41.25");
        assert_eq!(cell(&table, 1, "passes"), "3");
        assert_eq!(cell(&table, 0, "passes"), "");
    }

    #[test]
    fn test_hyperlink_formula() {
        let table = build_table(
            &[report("runs/a/result-summary.txt", fixtures::UPERF_SINGLE)],
            Some("https://ci.example.com/logs/"),
        );
        assert_eq!(
            cell(&table, 0, "file"),
            "=HYPERLINK(\"https://ci.example.com/logs/runs/a/result-summary.txt\",\"result-summary.txt\")"
        );
    }

    #[test]
    fn test_empty_input_has_fixed_columns_only() {
        let table = build_table(&[], None);
        assert_eq!(table.columns.len(), PREFERRED_COLUMNS.len());
        assert!(table.rows.is_empty());
    }
}

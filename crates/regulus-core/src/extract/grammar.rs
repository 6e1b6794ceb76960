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

//! Result line grammars.
//!
//! A `result:` line is routed to a grammar by the tool marker it contains.
//! Tool grammars either produce a result or reject the line; a rejected line
//! is dropped rather than kept as raw text.

use crate::model::{BenchResult, MeasuredResult, SummaryResult, Tool};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static MEASURED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)result:\s*\((uperf|iperf|trafficgen)::([^)]+)\)\s*samples:\s*([\d.\s]+?)\s*mean:\s*([0-9.]+)\s*min:\s*([0-9.]+)\s*max:\s*([0-9.]+)\s*stddev:\s*([0-9.]+|nan)\s*stddevpct:\s*([0-9.]+|nan)(?:\s*CPU:\s*([0-9.]+))?",
    )
    .expect("valid measured result regex")
});

static TRAFFICGEN_COMPACT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)result:\s*\(([^)]+)\)\s*samples:\s*([0-9.]+)\s*mean:\s*([0-9.]+)\s*min:\s*([0-9.]+)\s*max:\s*([0-9.]+)",
    )
    .expect("valid trafficgen result regex")
});

static GENERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"result:\s*(.+?)\s*$").expect("valid generic result regex"));

/// The grammar a result line is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultGrammar {
    Uperf,
    Iperf,
    Trafficgen,
    Generic,
}

impl ResultGrammar {
    /// Pick the grammar by tool marker.
    pub fn detect(line: &str) -> Self {
        if line.contains("(uperf::") {
            ResultGrammar::Uperf
        } else if line.contains("(iperf::") {
            ResultGrammar::Iperf
        } else if line.contains("(trafficgen::") {
            ResultGrammar::Trafficgen
        } else {
            ResultGrammar::Generic
        }
    }

    /// Parse a line; `None` when the line does not fit the grammar.
    pub fn parse(self, line: &str) -> Option<BenchResult> {
        match self {
            ResultGrammar::Uperf => parse_measured(line, Tool::Uperf),
            ResultGrammar::Iperf => parse_measured(line, Tool::Iperf),
            ResultGrammar::Trafficgen => {
                parse_measured(line, Tool::Trafficgen).or_else(|| parse_trafficgen_compact(line))
            }
            ResultGrammar::Generic => GENERIC
                .captures(line)
                .map(|c| BenchResult::generic(c[1].trim())),
        }
    }
}

/// Parse any result line with the grammar its marker selects.
pub fn parse_result_line(line: &str) -> Option<BenchResult> {
    ResultGrammar::detect(line).parse(line)
}

/// Map a metric type to a display unit.
pub fn infer_unit(metric: &str) -> String {
    let lower = metric.to_lowercase();
    let unit = if lower.contains("gbps") {
        "Gbps"
    } else if lower.contains("mbps") {
        "Mbps"
    } else if lower.contains("transactions-sec") {
        "transactions/sec"
    } else if lower.contains("connections-sec") {
        "connections/sec"
    } else if lower.contains("pps") {
        "packets/sec"
    } else if lower.contains("retry/sec") {
        "retries/sec"
    } else {
        return metric.to_string();
    };
    unit.to_string()
}

fn number(caps: &Captures<'_>, idx: usize) -> Option<f64> {
    caps.get(idx)?.as_str().parse::<f64>().ok()
}

/// Parse a statistic that may be reported as NaN. Returns the value and
/// whether it was undefined.
fn statistic(caps: &Captures<'_>, idx: usize) -> (f64, bool) {
    match number(caps, idx) {
        Some(v) if v.is_finite() => (v, false),
        _ => (0.0, true),
    }
}

fn parse_measured(line: &str, tool: Tool) -> Option<BenchResult> {
    let caps = MEASURED.captures(line)?;
    if !caps[1].eq_ignore_ascii_case(tool.as_str()) {
        return None;
    }

    let metric = caps[2].trim().to_string();
    let sample_values: Vec<f64> = caps[3]
        .split_whitespace()
        .filter_map(|v| v.parse().ok())
        .collect();
    let mean = number(&caps, 4)?;
    let min = number(&caps, 5)?;
    let max = number(&caps, 6)?;
    let (stddev, stddev_nan) = statistic(&caps, 7);
    let (stddevpct, pct_nan) = statistic(&caps, 8);
    let cpu = number(&caps, 9);

    Some(BenchResult::Measured(MeasuredResult {
        unit: infer_unit(&metric),
        metric,
        tool,
        sample_count: sample_values.len(),
        sample_values,
        mean,
        min,
        max,
        stddev,
        stddevpct,
        range: max - min,
        cpu,
        stddev_undefined: stddev_nan || pct_nan,
    }))
}

fn parse_trafficgen_compact(line: &str) -> Option<BenchResult> {
    let caps = TRAFFICGEN_COMPACT.captures(line)?;
    let label = caps[1].trim();
    let metric = label
        .split_once("::")
        .map(|(_, m)| m)
        .unwrap_or(label)
        .to_string();

    Some(BenchResult::Summary(SummaryResult {
        unit: infer_unit(&metric),
        metric,
        tool: Tool::Trafficgen,
        samples: number(&caps, 2)?,
        mean: number(&caps, 3)?,
        min: number(&caps, 4)?,
        max: number(&caps, 5)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UPERF_LINE: &str =
        "    result: (uperf::Gbps) samples: 9.8 9.9 10.0 mean: 9.9 min: 9.8 max: 10.0 stddev: 0.1 stddevpct: 1.0";

    fn measured(result: BenchResult) -> MeasuredResult {
        match result {
            BenchResult::Measured(m) => m,
            other => panic!("expected measured result, got {:?}", other),
        }
    }

    #[test]
    fn test_uperf_line() {
        let m = measured(parse_result_line(UPERF_LINE).unwrap());
        assert_eq!(m.metric, "Gbps");
        assert_eq!(m.tool, Tool::Uperf);
        assert_eq!(m.sample_values, vec![9.8, 9.9, 10.0]);
        assert_eq!(m.sample_count, 3);
        assert_eq!(m.mean, 9.9);
        assert!((m.range - 0.2).abs() < 1e-9);
        assert_eq!(m.unit, "Gbps");
        assert_eq!(m.cpu, None);
        assert!(!m.stddev_undefined);
    }

    #[test]
    fn test_iperf_line_with_cpu() {
        let line = "result: (iperf::rx-Gbps) samples: 20.1 20.3 mean: 20.2 min: 20.1 max: 20.3 stddev: 0.14 stddevpct: 0.7 CPU: 35.5";
        let m = measured(parse_result_line(line).unwrap());
        assert_eq!(m.tool, Tool::Iperf);
        assert_eq!(m.metric, "rx-Gbps");
        assert_eq!(m.cpu, Some(35.5));
    }

    #[test]
    fn test_two_sample_line_with_cpu() {
        let line = "result: (uperf::Gbps) samples: 9.8 9.9 mean: 9.85 min: 9.8 max: 9.9 stddev: 0.05 stddevpct: 0.5 CPU: 12.3";
        let m = measured(parse_result_line(line).unwrap());
        assert_eq!(m.metric, "Gbps");
        assert_eq!(m.unit, "Gbps");
        assert_eq!((m.mean, m.min, m.max), (9.85, 9.8, 9.9));
        assert_eq!((m.stddev, m.stddevpct), (0.05, 0.5));
        assert_eq!(m.cpu, Some(12.3));
        assert_eq!(m.sample_count, 2);
    }

    #[test]
    fn test_nan_statistics_become_zero_with_flag() {
        let line = "result: (uperf::transactions-sec) samples: 500 mean: 500 min: 500 max: 500 stddev: NaN stddevpct: NaN";
        let m = measured(parse_result_line(line).unwrap());
        assert_eq!(m.stddev, 0.0);
        assert_eq!(m.stddevpct, 0.0);
        assert!(m.stddev_undefined);
        assert_eq!(m.unit, "transactions/sec");
    }

    #[test]
    fn test_trafficgen_compact_form() {
        let line = "result: (trafficgen::rx-pps) samples: 3 mean: 1500000.5 min: 1400000 max: 1600000";
        match parse_result_line(line).unwrap() {
            BenchResult::Summary(s) => {
                assert_eq!(s.metric, "rx-pps");
                assert_eq!(s.samples, 3.0);
                assert_eq!(s.unit, "packets/sec");
            }
            other => panic!("expected summary result, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_tool_line_is_rejected() {
        assert!(parse_result_line("result: (uperf::Gbps) garbage").is_none());
    }

    #[test]
    fn test_generic_line() {
        let r = parse_result_line("result: 42 ops/sec  ").unwrap();
        assert_eq!(r, BenchResult::generic("42 ops/sec"));
    }

    #[test]
    fn test_infer_unit() {
        assert_eq!(infer_unit("rx-Gbps"), "Gbps");
        assert_eq!(infer_unit("Mbps"), "Mbps");
        assert_eq!(infer_unit("connections-sec"), "connections/sec");
        assert_eq!(infer_unit("retry/sec"), "retries/sec");
        assert_eq!(infer_unit("latency-usec"), "latency-usec");
    }

    #[test]
    fn test_detect() {
        assert_eq!(ResultGrammar::detect(UPERF_LINE), ResultGrammar::Uperf);
        assert_eq!(ResultGrammar::detect("result: (fio::iops)"), ResultGrammar::Generic);
    }
}

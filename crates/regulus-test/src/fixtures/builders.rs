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

//! Builder pattern for generated result logs.
//!
//! # Examples
//!
//! ```rust
//! use regulus_test::{IterationBuilder, LogBuilder};
//!
//! let log = LogBuilder::new("uperf")
//!     .tag("model", "dell-r750")
//!     .iteration(
//!         IterationBuilder::new("AAAA-0001")
//!             .param("nthreads", "4")
//!             .uperf_result("Gbps", &[9.5, 10.5]),
//!     )
//!     .build();
//! assert!(log.contains("mean: 10"));
//! ```

use std::fmt::Write;

/// Builds a whole result log.
#[derive(Debug, Clone)]
pub struct LogBuilder {
    benchmark: String,
    run_id: String,
    tags: Vec<(String, String)>,
    common: Vec<(String, String)>,
    iterations: Vec<IterationBuilder>,
}

impl LogBuilder {
    pub fn new(benchmark: &str) -> Self {
        Self {
            benchmark: benchmark.to_string(),
            run_id: "00000000-0000-4000-8000-000000000000".to_string(),
            tags: Vec::new(),
            common: Vec::new(),
            iterations: Vec::new(),
        }
    }

    pub fn run_id(mut self, run_id: &str) -> Self {
        self.run_id = run_id.to_string();
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.tags.push((key.to_string(), value.to_string()));
        self
    }

    pub fn common_param(mut self, key: &str, value: &str) -> Self {
        self.common.push((key.to_string(), value.to_string()));
        self
    }

    pub fn iteration(mut self, iteration: IterationBuilder) -> Self {
        self.iterations.push(iteration);
        self
    }

    /// Add `count` single-result iterations with ids `ITER-0000`, `ITER-0001`, ...
    pub fn iterations(mut self, count: usize) -> Self {
        for i in 0..count {
            let value = 1.0 + i as f64;
            self.iterations.push(
                IterationBuilder::new(&format!("ITER-{:04}", i))
                    .param("nthreads", &(i + 1).to_string())
                    .uperf_result("Gbps", &[value, value + 0.5]),
            );
        }
        self
    }

    pub fn build(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "benchmark: {}", self.benchmark);
        let _ = writeln!(out, "run-id: {}", self.run_id);
        let _ = writeln!(out, "tags: {}", join_pairs(&self.tags));
        let _ = writeln!(out, "common params: {}", join_pairs(&self.common));
        for iteration in &self.iterations {
            iteration.write_to(&mut out);
        }
        out
    }
}

/// Builds one iteration block.
#[derive(Debug, Clone)]
pub struct IterationBuilder {
    id: String,
    params: Vec<(String, String)>,
    samples: Vec<(u64, u64, f64)>,
    results: Vec<String>,
}

impl IterationBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            params: Vec::new(),
            samples: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    pub fn sample(mut self, begin: u64, end: u64, length: f64) -> Self {
        self.samples.push((begin, end, length));
        self
    }

    /// Add a verbatim result line.
    pub fn raw_result(mut self, line: &str) -> Self {
        self.results.push(line.to_string());
        self
    }

    /// Add a measured result for `tool` with statistics computed from `samples`.
    pub fn measured_result(mut self, tool: &str, metric: &str, samples: &[f64]) -> Self {
        self.results.push(measured_line(tool, metric, samples));
        self
    }

    pub fn uperf_result(self, metric: &str, samples: &[f64]) -> Self {
        self.measured_result("uperf", metric, samples)
    }

    fn write_to(&self, out: &mut String) {
        let _ = writeln!(out, "iteration-id: {}", self.id);
        let _ = writeln!(out, "  unique params: {}", join_pairs(&self.params));
        for (i, (begin, end, length)) in self.samples.iter().enumerate() {
            let _ = writeln!(out, "  sample-id: {:08X}-0000-0000-0000-000000000000", i);
            let _ = writeln!(out, "    period range: begin: {} end: {}", begin, end);
            let _ = writeln!(out, "    period length: {} seconds", length);
        }
        for result in &self.results {
            let _ = writeln!(out, "  result: {}", result.trim_start_matches("result: "));
        }
    }
}

fn join_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a measured result line with population statistics.
pub fn measured_line(tool: &str, metric: &str, samples: &[f64]) -> String {
    let n = samples.len().max(1) as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let stddev = (samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let pct = if mean > 0.0 { stddev / mean * 100.0 } else { 0.0 };
    let values = samples
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "result: ({}::{}) samples: {} mean: {} min: {} max: {} stddev: {} stddevpct: {}",
        tool, metric, values, mean, min, max, stddev, pct
    )
}

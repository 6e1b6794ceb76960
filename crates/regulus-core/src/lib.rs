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

//! Core pipeline stages for benchmark result logs.
//!
//! This crate turns a directory of result logs into structured per-file
//! reports. Each stage sits behind a trait so strategies can be swapped:
//!
//! - [`discovery`]: locate result files ([`FileDiscovery`])
//! - [`parser`]: read them into text, optionally cached ([`ContentParser`])
//! - [`rules`]: pick extraction rules per benchmark ([`RuleEngine`])
//! - [`extract`]: parse iterations, samples and results ([`DataExtractor`])
//! - [`transform`]: summarize into [`FileReport`]s ([`DataTransformer`])
//!
//! # Example
//!
//! ```rust
//! use regulus_core::{
//!     ConfigurableRuleEngine, DataExtractor, DataTransformer, DiscoveredFile,
//!     RegexDataExtractor, RuleEngine, StandardDataTransformer,
//! };
//! use std::time::UNIX_EPOCH;
//!
//! let log = "benchmark: uperf\niteration-id: A1\n  result: (uperf::Gbps) samples: 9.9 mean: 9.9 min: 9.9 max: 9.9 stddev: 0 stddevpct: 0\n";
//! let rules = ConfigurableRuleEngine::new().rules_for("uperf");
//! let file = DiscoveredFile::new("result-summary.txt", log.len() as u64, UNIX_EPOCH);
//!
//! let run = RegexDataExtractor::new().extract(log, &rules, &file);
//! let report = StandardDataTransformer::new().transform(run);
//! assert_eq!(report.iterations[0].test_description, "\u{2192} 9.90 Gbps");
//! ```

pub mod clock;
pub mod discovery;
mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod rules;
pub mod transform;

pub use clock::Clock;
pub use discovery::{
    FileDiscovery, FilteredFileDiscovery, RegexPatternDiscovery, StandardFileDiscovery,
    DEFAULT_FILE_PATTERN, DEFAULT_MAX_DEPTH,
};
pub use error::{CoreError, Result};
pub use extract::{detect_benchmark, DataExtractor, RegexDataExtractor};
pub use model::{
    BenchResult, DiscoveredFile, ExtractedRun, ExtractionMetadata, ExtractionRule, FileReport,
    Iteration, IterationReport, Params, ProcessingStatus, RuleSet, RunSummary,
};
pub use parser::{
    BinaryAwareParser, CacheStats, CachingParser, ContentParser, MultiEncodingParser,
    TextFileParser,
};
pub use rules::{
    ConfigurableRuleEngine, DynamicRuleEngine, FileBasedRuleEngine, RuleEngine, DEFAULT_RULESET,
};
pub use transform::{DataTransformer, StandardDataTransformer, DEFAULT_PARTIAL_THRESHOLD};

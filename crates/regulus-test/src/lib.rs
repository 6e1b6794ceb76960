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

//! Shared test fixtures and utilities for the Regulus crates.
//!
//! # Features
//!
//! - **Log Fixtures**: Result logs covering each result grammar and edge case
//! - **Log Builder**: Fluent API for generating logs with many iterations
//! - **Tree Builder**: Temporary directory trees of result files
//!
//! # Quick Start
//!
//! ```rust
//! use regulus_test::{fixtures, TreeBuilder};
//!
//! let tree = TreeBuilder::new()
//!     .file("run-1/result-summary.txt", fixtures::UPERF_SINGLE)
//!     .file("run-2/result-summary.txt", fixtures::IPERF)
//!     .build();
//! assert!(tree.path().join("run-1/result-summary.txt").exists());
//! ```

/// Canonical result logs and a builder for generated ones.
pub mod fixtures;

mod tree;

pub use fixtures::builders::{IterationBuilder, LogBuilder};
pub use tree::TreeBuilder;

/// Type alias for a list of named log fixtures.
pub type FixtureList = Vec<(&'static str, &'static str)>;

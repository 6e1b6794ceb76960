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

//! Report generation for processed Regulus result files.
//!
//! Every generator consumes the same slice of [`FileReport`] records:
//!
//! - **JSON**: the aggregate [`Report`], validated against a versioned
//!   schema, with the validation outcome embedded
//! - **CSV**: one row per iteration with fixed leading columns
//! - **HTML**: a self-contained summary page with a row filter
//! - **XML**: one `result` element per file
//!
//! [`MultiFormatGenerator`] fans a run out to every enabled format, writing
//! `<base>.json`, `<base>.csv` and so on.
//!
//! # Example
//!
//! ```no_run
//! use regulus_report::{MultiFormatGenerator, RunMetadata};
//! use regulus_schema::SchemaManager;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let mut outputs =
//!     MultiFormatGenerator::with_defaults(None, Arc::new(SchemaManager::default()), "2.0");
//! outputs.set_enabled(&["json", "csv"])?;
//!
//! let meta = RunMetadata::new("2025-01-20T12:00:00.000000Z");
//! let summary = outputs.generate(&[], &meta, Path::new("out/report"));
//! assert_eq!(summary.written.len(), 2);
//! # Ok::<(), regulus_report::OutputError>(())
//! ```
//!
//! [`FileReport`]: regulus_core::FileReport

pub mod dispatcher;
pub mod document;
mod error;
mod generator;
pub mod table;
mod to_csv;
mod to_html;
mod to_json;
mod to_xml;

pub use dispatcher::{GenerationSummary, MultiFormatGenerator, DEFAULT_ENABLED};
pub use document::{
    BenchmarkDefinition, BenchmarkSummary, FileMetadata, GenerationInfo, Report, ReportEntry,
    RunMetadata,
};
pub use error::{OutputError, Result};
pub use generator::{write_artifact, OutputGenerator};
pub use to_csv::{CsvConfig, CsvOutputGenerator};
pub use to_html::{format_file_size, HtmlConfig, HtmlOutputGenerator};
pub use to_json::JsonOutputGenerator;
pub use to_xml::{element_name, XmlConfig, XmlOutputGenerator};

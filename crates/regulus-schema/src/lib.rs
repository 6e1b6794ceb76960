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

//! Versioned schemas for aggregate Regulus reports.
//!
//! Three generations exist:
//!
//! - **1.0**: generation info, per-file results and a per-benchmark summary
//! - **1.1**: adds benchmark field definitions and processing metadata
//! - **2.0**: adds schema info, per-result processing status, success rates
//!   and a validation report
//!
//! # Example
//!
//! ```rust
//! use regulus_schema::{SchemaCatalog, SchemaManager, ValidationReport};
//! use serde_json::json;
//!
//! let manager = SchemaManager::default();
//! let report = json!({"results": []});
//!
//! let outcome = manager.validate(&report, "2.0");
//! let validation = ValidationReport::from_outcome(&outcome);
//! assert!(!validation.schema_validation);
//! assert!(!validation.validation_errors.is_empty());
//!
//! let upgraded = manager.upgrade(&json!({"results": []}), "1.0", "1.1")?;
//! assert_eq!(upgraded["schema_version"], "1.1");
//! # Ok::<(), regulus_schema::SchemaError>(())
//! ```

pub mod definitions;
pub mod dynamic;
mod error;
pub mod manager;
pub mod migrations;
pub mod validator;
mod version;

pub use definitions::{builtin_benchmark_definitions, schema_document, JSON_SCHEMA_DIALECT};
pub use dynamic::DynamicSchemaManager;
pub use error::{Result, SchemaError};
pub use manager::{SchemaCatalog, SchemaManager};
pub use migrations::{detect_version, upgrade};
pub use validator::{validate_document, ValidationReport};
pub use version::{SchemaInfo, SchemaVersion};

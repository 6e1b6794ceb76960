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

//! Structural validation of JSON documents.
//!
//! Supports the subset of JSON Schema keywords the report schemas use:
//! `type`, `const`, `enum`, `minimum`, `maximum`, `pattern`, `required`,
//! `properties`, `patternProperties`, `additionalProperties` and `items`.
//! Every other keyword is ignored and never produces a violation. That
//! covers annotations such as `format`, `description` and `$schema` as well
//! as composition and reference keywords (`$ref`, `allOf`, `anyOf`, `oneOf`,
//! `not`) and length or size bounds (`minLength`, `minItems`). Schemas that
//! rely on those are checked only as far as the supported subset reaches.
//!
//! Violations are collected rather than stopping at the first one. Each
//! message starts with the location of the offending value, e.g.
//! `$.results[0]: missing required property 'file_path'`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;

/// Validate `instance` against `schema`, returning every violation found.
pub fn validate_document(schema: &Value, instance: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    check(schema, instance, "$", &mut errors);
    errors
}

fn check(schema: &Value, instance: &Value, path: &str, errors: &mut Vec<String>) {
    let Some(schema) = schema.as_object() else {
        return;
    };

    if let Some(expected) = schema.get("type") {
        if !type_matches(expected, instance) {
            errors.push(format!(
                "{}: expected {}, found {}",
                path,
                describe_type(expected),
                type_name(instance)
            ));
            // Further keywords would only repeat the mismatch.
            return;
        }
    }

    if let Some(constant) = schema.get("const") {
        if instance != constant {
            errors.push(format!("{}: expected {}, found {}", path, constant, instance));
        }
    }

    if let Some(Value::Array(options)) = schema.get("enum") {
        if !options.contains(instance) {
            errors.push(format!(
                "{}: {} is not one of {}",
                path,
                instance,
                Value::Array(options.clone())
            ));
        }
    }

    if let Some(n) = instance.as_f64() {
        if let Some(min) = schema.get("minimum").and_then(Value::as_f64) {
            if n < min {
                errors.push(format!("{}: {} is less than minimum {}", path, n, min));
            }
        }
        if let Some(max) = schema.get("maximum").and_then(Value::as_f64) {
            if n > max {
                errors.push(format!("{}: {} is greater than maximum {}", path, n, max));
            }
        }
    }

    if let (Some(pattern), Some(text)) = (
        schema.get("pattern").and_then(Value::as_str),
        instance.as_str(),
    ) {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(text) => {}
            Ok(_) => errors.push(format!(
                "{}: '{}' does not match pattern '{}'",
                path, text, pattern
            )),
            Err(e) => errors.push(format!("{}: invalid pattern '{}': {}", path, pattern, e)),
        }
    }

    match instance {
        Value::Object(object) => check_object(schema, object, path, errors),
        Value::Array(items) => {
            if let Some(item_schema) = schema.get("items") {
                for (i, item) in items.iter().enumerate() {
                    check(item_schema, item, &format!("{}[{}]", path, i), errors);
                }
            }
        }
        _ => {}
    }
}

fn check_object(
    schema: &Map<String, Value>,
    object: &Map<String, Value>,
    path: &str,
    errors: &mut Vec<String>,
) {
    if let Some(Value::Array(required)) = schema.get("required") {
        for name in required.iter().filter_map(Value::as_str) {
            if !object.contains_key(name) {
                errors.push(format!("{}: missing required property '{}'", path, name));
            }
        }
    }

    let properties = schema.get("properties").and_then(Value::as_object);
    let mut patterns = Vec::new();
    if let Some(pattern_props) = schema.get("patternProperties").and_then(Value::as_object) {
        for (pattern, sub) in pattern_props {
            match Regex::new(pattern) {
                Ok(re) => patterns.push((re, sub)),
                Err(e) => errors.push(format!("{}: invalid pattern '{}': {}", path, pattern, e)),
            }
        }
    }
    let additional = schema.get("additionalProperties");

    for (key, value) in object {
        let child = format!("{}.{}", path, key);
        let mut matched = false;

        if let Some(sub) = properties.and_then(|p| p.get(key)) {
            matched = true;
            check(sub, value, &child, errors);
        }
        for (re, sub) in &patterns {
            if re.is_match(key) {
                matched = true;
                check(sub, value, &child, errors);
            }
        }

        if !matched {
            match additional {
                Some(Value::Bool(false)) => {
                    errors.push(format!("{}: unexpected property '{}'", path, key))
                }
                Some(sub @ Value::Object(_)) => check(sub, value, &child, errors),
                _ => {}
            }
        }
    }
}

fn type_matches(expected: &Value, instance: &Value) -> bool {
    match expected {
        Value::String(name) => is_type(name, instance),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .any(|name| is_type(name, instance)),
        _ => true,
    }
}

fn is_type(name: &str, instance: &Value) -> bool {
    match name {
        "object" => instance.is_object(),
        "array" => instance.is_array(),
        "string" => instance.is_string(),
        "boolean" => instance.is_boolean(),
        "null" => instance.is_null(),
        "number" => instance.is_number(),
        "integer" => {
            instance.is_i64()
                || instance.is_u64()
                || instance.as_f64().map_or(false, |n| n.fract() == 0.0)
        }
        _ => true,
    }
}

fn describe_type(expected: &Value) -> String {
    match expected {
        Value::String(name) => name.clone(),
        Value::Array(names) => names
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join(" or "),
        other => other.to_string(),
    }
}

fn type_name(instance: &Value) -> &'static str {
    match instance {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Outcome of validating an aggregate report, embedded in the report itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub schema_validation: bool,
    pub validation_errors: Vec<String>,
    pub validation_warnings: Vec<String>,
    pub data_quality_score: f64,
}

impl ValidationReport {
    /// A passing report with a perfect score.
    pub fn passed() -> Self {
        Self {
            schema_validation: true,
            validation_errors: Vec::new(),
            validation_warnings: Vec::new(),
            data_quality_score: 1.0,
        }
    }

    /// A failing report carrying `errors`.
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            schema_validation: false,
            validation_errors: errors,
            validation_warnings: Vec::new(),
            data_quality_score: 0.0,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.validation_warnings.push(warning.into());
        self
    }

    /// Fold a validation result into a report. Errors other than
    /// validation failures are recorded as a single message.
    pub fn from_outcome(outcome: &Result<(), SchemaError>) -> Self {
        match outcome {
            Ok(()) => Self::passed(),
            Err(SchemaError::ValidationFailed { errors }) => Self::failed(errors.clone()),
            Err(other) => Self::failed(vec![other.to_string()]),
        }
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::passed()
    }
}

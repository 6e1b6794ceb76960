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

//! Built-in schema generations.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A built-in schema generation. Ordering follows release order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SchemaVersion {
    /// Baseline report structure
    #[serde(rename = "1.0")]
    V1_0,
    /// Adds benchmark definitions and processing metadata
    #[serde(rename = "1.1")]
    V1_1,
    /// Adds schema info, validation report and per-benchmark success rates
    #[serde(rename = "2.0")]
    V2_0,
}

impl SchemaVersion {
    /// Every generation, oldest first.
    pub const ALL: [SchemaVersion; 3] = [Self::V1_0, Self::V1_1, Self::V2_0];

    pub fn latest() -> Self {
        Self::V2_0
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V2_0 => "2.0",
        }
    }

    pub fn info(self) -> SchemaInfo {
        let (description, last_modified) = match self {
            Self::V1_0 => (
                "Initial build report schema with basic result structure",
                "2025-01-01",
            ),
            Self::V1_1 => (
                "Enhanced schema with benchmark-specific fields and metadata",
                "2025-01-15",
            ),
            Self::V2_0 => (
                "Advanced schema with extensible benchmark definitions and validation",
                "2025-01-20",
            ),
        };
        SchemaInfo {
            version: self.as_str().to_string(),
            description: description.to_string(),
            created_date: Some("2025-01-01".to_string()),
            last_modified: Some(last_modified.to_string()),
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::latest()
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVersion {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches(['v', 'V']);
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == trimmed)
            .ok_or_else(|| SchemaError::UnknownVersion(s.to_string()))
    }
}

/// Descriptive header for a schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub version: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_versions() {
        assert_eq!("2.0".parse::<SchemaVersion>().unwrap(), SchemaVersion::V2_0);
        assert_eq!("v1.1".parse::<SchemaVersion>().unwrap(), SchemaVersion::V1_1);
        assert!(matches!(
            "3.0".parse::<SchemaVersion>(),
            Err(SchemaError::UnknownVersion(_))
        ));
    }

    #[test]
    fn test_versions_are_ordered() {
        assert!(SchemaVersion::V1_0 < SchemaVersion::V1_1);
        assert!(SchemaVersion::V1_1 < SchemaVersion::V2_0);
        assert_eq!(SchemaVersion::default(), SchemaVersion::V2_0);
    }

    #[test]
    fn test_info_serializes_dates() {
        let info = serde_json::to_value(SchemaVersion::V1_1.info()).unwrap();
        assert_eq!(info["version"], "1.1");
        assert_eq!(info["last_modified"], "2025-01-15");
    }
}

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

//! Rule-driven field extraction: one match per rule, no iteration structure.

use crate::model::{ExtractionRule, FieldMatch};
use regex::RegexBuilder;
use std::collections::BTreeMap;
use tracing::warn;

/// Apply each rule once to `content`.
///
/// Every rule gets an entry; rules that do not match, or whose pattern does
/// not compile, get an unmatched entry.
pub fn apply_rules(content: &str, rules: &[ExtractionRule]) -> BTreeMap<String, FieldMatch> {
    rules
        .iter()
        .map(|rule| (rule.field_name.clone(), apply_rule(content, rule)))
        .collect()
}

fn apply_rule(content: &str, rule: &ExtractionRule) -> FieldMatch {
    let unmatched = FieldMatch {
        processor: rule.processor.clone(),
        ..FieldMatch::default()
    };

    let re = match RegexBuilder::new(&rule.pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            warn!(field = %rule.field_name, error = %e, "skipping rule with invalid pattern");
            return unmatched;
        }
    };

    match re.captures(content) {
        Some(caps) => FieldMatch {
            matched: true,
            groups: caps
                .iter()
                .skip(1)
                .map(|g| g.map(|m| m.as_str().trim().to_string()).unwrap_or_default())
                .collect(),
            full_match: caps[0].to_string(),
            processor: rule.processor.clone(),
        },
        None => unmatched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_has_an_entry() {
        let rules = vec![
            ExtractionRule::new("benchmark", r"benchmark:\s*(.+)"),
            ExtractionRule::new("missing", r"nothing-here:\s*(.+)"),
            ExtractionRule::new("broken", r"("),
        ];
        let matches = apply_rules("Benchmark: uperf\n", &rules);
        assert_eq!(matches.len(), 3);
        assert_eq!(matches["benchmark"].primary(), Some("uperf"));
        assert!(!matches["missing"].matched);
        assert!(!matches["broken"].matched);
    }

    #[test]
    fn test_groups_and_processor_are_recorded() {
        let rules = vec![ExtractionRule::new(
            "period",
            r"begin:\s*(\d+)\s+end:\s*(\d+)(x)?",
        )
        .with_processor("numeric_converter")];
        let matches = apply_rules("begin: 10 end: 20", &rules);
        let m = &matches["period"];
        assert_eq!(m.groups, vec!["10", "20", ""]);
        assert_eq!(m.processor.as_deref(), Some("numeric_converter"));
    }
}

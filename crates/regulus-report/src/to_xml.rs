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

//! XML output, one `result` element per file.

use crate::document::RunMetadata;
use crate::error::{OutputError, Result};
use crate::generator::OutputGenerator;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use regulus_core::FileReport;
use serde_json::Value;
use std::io::Cursor;

/// Configuration for XML output
#[derive(Debug, Clone)]
pub struct XmlConfig {
    /// Pretty-print with indentation
    pub pretty: bool,
    /// Spaces per indentation level
    pub indent: usize,
    /// Root element name
    pub root_element: String,
}

impl Default for XmlConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 2,
            root_element: "build_report".to_string(),
        }
    }
}

/// Writes file reports as XML.
///
/// `file_path` and `benchmark` become attributes of each `result`; every
/// other field becomes a nested element. Array entries are written as
/// `item` children.
#[derive(Debug, Clone, Default)]
pub struct XmlOutputGenerator {
    config: XmlConfig,
}

impl XmlOutputGenerator {
    pub fn new(config: XmlConfig) -> Self {
        Self { config }
    }
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

impl OutputGenerator for XmlOutputGenerator {
    fn extension(&self) -> &str {
        "xml"
    }

    fn render(&self, reports: &[FileReport], meta: &RunMetadata) -> Result<String> {
        let mut writer = if self.config.pretty {
            Writer::new_with_indent(Cursor::new(Vec::new()), b' ', self.config.indent)
        } else {
            Writer::new(Cursor::new(Vec::new()))
        };

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        let root = element_name(&self.config.root_element);
        writer.write_event(Event::Start(BytesStart::new(root.as_str())))?;

        writer.write_event(Event::Start(BytesStart::new("metadata")))?;
        write_text_element(&mut writer, "timestamp", &meta.timestamp)?;
        write_text_element(&mut writer, "total_results", &reports.len().to_string())?;
        writer.write_event(Event::End(BytesEnd::new("metadata")))?;

        writer.write_event(Event::Start(BytesStart::new("results")))?;
        for report in reports {
            write_result(&mut writer, report)?;
        }
        writer.write_event(Event::End(BytesEnd::new("results")))?;

        writer.write_event(Event::End(BytesEnd::new(root.as_str())))?;

        let mut text = String::from_utf8(writer.into_inner().into_inner())
            .map_err(|e| OutputError::Xml(format!("Invalid UTF-8 in XML output: {}", e)))?;
        text.push('\n');
        Ok(text)
    }
}

fn write_result(writer: &mut XmlWriter, report: &FileReport) -> Result<()> {
    let mut elem = BytesStart::new("result");
    elem.push_attribute(("benchmark", report.benchmark.as_str()));
    elem.push_attribute(("file_path", report.file_path.as_str()));
    writer.write_event(Event::Start(elem))?;

    if let Value::Object(fields) = serde_json::to_value(report)? {
        for (key, value) in &fields {
            if key == "benchmark" || key == "file_path" {
                continue;
            }
            write_value(writer, key, value)?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("result")))?;
    Ok(())
}

fn write_value(writer: &mut XmlWriter, name: &str, value: &Value) -> Result<()> {
    let name = element_name(name);
    match value {
        Value::Object(map) => {
            if map.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(name.as_str())))?;
                return Ok(());
            }
            writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
            for (key, child) in map {
                write_value(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
        Value::Array(items) => {
            if items.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(name.as_str())))?;
                return Ok(());
            }
            writer.write_event(Event::Start(BytesStart::new(name.as_str())))?;
            for item in items {
                write_value(writer, "item", item)?;
            }
            writer.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        }
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(name.as_str())))?;
        }
        Value::String(s) => write_text_element(writer, &name, s)?,
        other => write_text_element(writer, &name, &other.to_string())?,
    }
    Ok(())
}

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Map an arbitrary key to a valid XML element name.
pub fn element_name(key: &str) -> String {
    let mut name: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let valid_start = name
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic() || c == '_')
        .unwrap_or(false);
    if !valid_start {
        name.insert(0, '_');
    }
    name
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

    fn report(log: &str) -> FileReport {
        let rules = ConfigurableRuleEngine::new().rules_for("default");
        let file = DiscoveredFile::new("run/result-summary.txt", log.len() as u64, UNIX_EPOCH);
        let run = RegexDataExtractor::new().extract(log, &rules, &file);
        StandardDataTransformer::new().transform(run)
    }

    #[test]
    fn test_document_shape() {
        let xml = XmlOutputGenerator::default()
            .render(&[report(fixtures::UPERF_SINGLE)], &RunMetadata::new("2025-01-20T12:00:00Z"))
            .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<build_report>"));
        assert!(xml.contains("<timestamp>2025-01-20T12:00:00Z</timestamp>"));
        assert!(xml.contains("<total_results>1</total_results>"));
        assert!(xml.contains(
            "<result benchmark=\"uperf\" file_path=\"run/result-summary.txt\">"
        ));
        assert!(xml.contains("<iterations>"));
        assert!(xml.contains("<item>"));
        assert!(!xml.contains("<file_path>"));
    }

    #[test]
    fn test_compact_output_has_no_newlines_inside() {
        let gen = XmlOutputGenerator::new(XmlConfig {
            pretty: false,
            ..Default::default()
        });
        let xml = gen.render(&[], &RunMetadata::new("t")).unwrap();
        assert_eq!(xml.trim_end().lines().count(), 1);
        assert!(xml.contains("<results></results>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let mut r = report(fixtures::UPERF_SINGLE);
        r.tags = "a<b & c".to_string();
        let xml = XmlOutputGenerator::default()
            .render(&[r], &RunMetadata::new("t"))
            .unwrap();
        assert!(xml.contains("<tags>a&lt;b &amp; c</tags>"));
    }

    #[test]
    fn test_element_name_sanitizing() {
        assert_eq!(element_name("stddev%"), "stddev_");
        assert_eq!(element_name("test-type"), "test-type");
        assert_eq!(element_name("1st"), "_1st");
        assert_eq!(element_name(""), "_");
        assert_eq!(element_name("a b"), "a_b");
    }
}

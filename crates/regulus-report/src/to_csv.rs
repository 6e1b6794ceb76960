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

//! CSV output, one row per iteration.

use crate::document::RunMetadata;
use crate::error::{OutputError, Result};
use crate::generator::OutputGenerator;
use crate::table::build_table;
use regulus_core::FileReport;

/// Configuration for CSV output.
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Prefix that turns the file column into a hyperlink formula
    pub base_url: Option<String>,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: b',',
            base_url: None,
        }
    }
}

/// Writes the iteration table as CSV. An empty input still gets the header.
#[derive(Debug, Clone, Default)]
pub struct CsvOutputGenerator {
    config: CsvConfig,
}

impl CsvOutputGenerator {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(CsvConfig {
            base_url: Some(base_url.into()),
            ..Default::default()
        })
    }
}

impl OutputGenerator for CsvOutputGenerator {
    fn extension(&self) -> &str {
        "csv"
    }

    fn render(&self, reports: &[FileReport], _meta: &RunMetadata) -> Result<String> {
        let table = build_table(reports, self.config.base_url.as_deref());

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.config.delimiter)
            .from_writer(Vec::new());
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| OutputError::Csv(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| OutputError::Csv(e.to_string()))
    }
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
        let file = DiscoveredFile::new("run/result-summary.txt", 1, UNIX_EPOCH);
        StandardDataTransformer::new().transform(RegexDataExtractor::new().extract(log, &rules, &file))
    }

    #[test]
    fn test_header_only_for_empty_input() {
        let csv = CsvOutputGenerator::default()
            .render(&[], &RunMetadata::default())
            .unwrap();
        assert_eq!(
            csv,
            "file,benchmark,model,perf,config,cpu,test_type,threads,wsize,rsize,samples,mean,unit,busyCPU,stddev%,iteration_id,protocol\n"
        );
    }

    #[test]
    fn test_rows_and_extra_columns() {
        let csv = CsvOutputGenerator::default()
            .render(&[report(fixtures::UPERF_MULTI)], &RunMetadata::default())
            .unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(headers.len(), 17);
        assert_eq!(&rows[1][11], "19");
        assert_eq!(&rows[1][6], "stream");
        assert_eq!(&rows[2][7], "32");
    }

    #[test]
    fn test_hyperlink_is_quoted() {
        let csv = CsvOutputGenerator::with_base_url("http://logs")
            .render(&[report(fixtures::UPERF_SINGLE)], &RunMetadata::default())
            .unwrap();
        let second_line = csv.lines().nth(1).unwrap();
        assert!(second_line.starts_with(
            "\"=HYPERLINK(\"\"http://logs/run/result-summary.txt\"\",\"\"result-summary.txt\"\")\""
        ));
    }

    #[test]
    fn test_custom_delimiter() {
        let gen = CsvOutputGenerator::new(CsvConfig {
            delimiter: b';',
            base_url: None,
        });
        let csv = gen.render(&[], &RunMetadata::default()).unwrap();
        assert!(csv.starts_with("file;benchmark;model"));
    }
}

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

//! Preconfigured orchestrators.
//!
//! [`from_config`] is the general assembly point. The named constructors
//! cover the common setups without writing a configuration file.

use crate::config::{ReportConfig, Strategy, DEFAULT_WORKERS};
use crate::error::Result;
use crate::orchestrator::{Orchestrator, Pipeline, RunOptions};
use regulus_core::{
    CachingParser, Clock, ConfigurableRuleEngine, ContentParser, FileBasedRuleEngine,
    FileDiscovery, FilteredFileDiscovery, RegexDataExtractor, RuleEngine,
    StandardDataTransformer, StandardFileDiscovery, TextFileParser,
};
use regulus_report::MultiFormatGenerator;
use regulus_schema::{SchemaManager, SchemaVersion};
use std::sync::Arc;
use tracing::debug;

/// Size window applied by [`create_enhanced`] when filtering is on.
pub const ENHANCED_SIZE_RANGE: (u64, u64) = (100, 50 * 1024 * 1024);

/// Assemble an orchestrator from a validated configuration.
///
/// # Errors
///
/// Fails when the configuration is invalid, the schema version is unknown,
/// or the rules directory cannot be loaded.
pub fn from_config(config: &ReportConfig, clock: Clock) -> Result<Orchestrator> {
    config.validate()?;
    let version: SchemaVersion = config.schema_version.parse()?;

    let discovery: Box<dyn FileDiscovery> = match config.size_range() {
        Some((min, max)) => Box::new(
            FilteredFileDiscovery::new(StandardFileDiscovery::new()).with_size_range(min, max),
        ),
        None => Box::new(StandardFileDiscovery::new()),
    };

    let parser: Box<dyn ContentParser> = if config.cache {
        Box::new(CachingParser::new(TextFileParser::new()))
    } else {
        Box::new(TextFileParser::new())
    };

    let rules: Box<dyn RuleEngine> = match &config.rules_dir {
        Some(dir) => Box::new(FileBasedRuleEngine::open(dir)?),
        None => Box::new(ConfigurableRuleEngine::new()),
    };

    let mut outputs = MultiFormatGenerator::with_defaults(
        config.base_url.as_deref(),
        Arc::new(SchemaManager::new(version)),
        version.as_str(),
    );
    outputs.set_enabled(&config.formats)?;

    debug!(
        formats = ?config.formats,
        cache = config.cache,
        strategy = ?config.strategy,
        schema = version.as_str(),
        "assembled pipeline"
    );

    let pipeline = Pipeline {
        discovery,
        parser,
        rules,
        extractor: Box::new(RegexDataExtractor::new().with_timing(config.extraction_timing)),
        transformer: Box::new(StandardDataTransformer::new().with_clock(clock)),
        outputs,
        clock,
    };
    Ok(Orchestrator::new(pipeline, RunOptions::from(config)))
}

/// JSON output only, no cache, sequential.
pub fn create_default() -> Result<Orchestrator> {
    from_config(
        &ReportConfig {
            formats: vec!["json".to_string()],
            cache: false,
            ..Default::default()
        },
        Clock::System,
    )
}

/// Knobs for [`create_enhanced`].
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancedOptions {
    pub schema_version: String,
    pub caching: bool,
    /// Skip files outside [`ENHANCED_SIZE_RANGE`]
    pub filtering: bool,
    pub parallel: bool,
    pub workers: usize,
}

impl Default for EnhancedOptions {
    fn default() -> Self {
        Self {
            schema_version: SchemaVersion::latest().as_str().to_string(),
            caching: true,
            filtering: false,
            parallel: false,
            workers: DEFAULT_WORKERS,
        }
    }
}

/// Caching, extraction timing and every output format.
pub fn create_enhanced(options: EnhancedOptions) -> Result<Orchestrator> {
    let (min_size, max_size) = if options.filtering {
        (Some(ENHANCED_SIZE_RANGE.0), Some(ENHANCED_SIZE_RANGE.1))
    } else {
        (None, None)
    };
    let config = ReportConfig {
        formats: vec!["json", "csv", "html", "xml"]
            .into_iter()
            .map(String::from)
            .collect(),
        cache: options.caching,
        min_size,
        max_size,
        strategy: if options.parallel {
            Strategy::Parallel
        } else {
            Strategy::Sequential
        },
        workers: options.workers,
        schema_version: options.schema_version,
        extraction_timing: true,
        ..Default::default()
    };
    from_config(&config, Clock::System)
}

/// Cached, timed pipeline for many directories in one process.
pub fn create_batch() -> Result<Orchestrator> {
    from_config(
        &ReportConfig {
            formats: vec!["json".to_string()],
            extraction_timing: true,
            ..Default::default()
        },
        Clock::System,
    )
}

/// HTML output only.
pub fn create_html() -> Result<Orchestrator> {
    create_multi_format(&["html"])
}

/// Exactly the given formats.
pub fn create_multi_format<S: AsRef<str>>(formats: &[S]) -> Result<Orchestrator> {
    from_config(
        &ReportConfig {
            formats: formats.iter().map(|f| f.as_ref().to_string()).collect(),
            ..Default::default()
        },
        Clock::System,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;

    fn formats(orchestrator: &Orchestrator) -> Vec<String> {
        orchestrator.pipeline().outputs.enabled_formats()
    }

    #[test]
    fn test_default_is_json_only() {
        let orchestrator = create_default().unwrap();
        assert_eq!(formats(&orchestrator), vec!["json"]);
        assert_eq!(orchestrator.options().strategy, Strategy::Sequential);
    }

    #[test]
    fn test_html_only() {
        assert_eq!(formats(&create_html().unwrap()), vec!["html"]);
    }

    #[test]
    fn test_enhanced_parallel() {
        let orchestrator = create_enhanced(EnhancedOptions {
            parallel: true,
            workers: 2,
            filtering: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(orchestrator.options().strategy, Strategy::Parallel);
        assert_eq!(orchestrator.options().workers, 2);
        assert_eq!(formats(&orchestrator).len(), 4);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let err = create_multi_format(&["json", "pdf"]).err().unwrap();
        assert!(matches!(err, CliError::InvalidFormat(ref f) if f == "pdf"));
    }

    #[test]
    fn test_unknown_schema_version_is_rejected() {
        let config = ReportConfig {
            schema_version: "9.9".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            from_config(&config, Clock::System),
            Err(CliError::Schema(_))
        ));
    }

    #[test]
    fn test_unusable_rules_dir_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let not_a_dir = dir.path().join("rules");
        std::fs::write(&not_a_dir, "plain file").unwrap();
        let config = ReportConfig {
            rules_dir: Some(not_a_dir),
            ..Default::default()
        };
        assert!(matches!(
            from_config(&config, Clock::System),
            Err(CliError::Rules(_))
        ));
    }
}

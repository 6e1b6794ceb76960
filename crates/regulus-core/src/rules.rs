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

//! Rule engines: which extraction rules apply to which benchmark.
//!
//! Every engine holds a `default` rule set that is returned for benchmarks
//! without their own entry and that can never be removed.

use crate::error::{CoreError, Result};
use crate::model::{ExtractionRule, RuleSet};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Name of the fallback rule set.
pub const DEFAULT_RULESET: &str = "default";

/// Looks up the rule set for a benchmark.
pub trait RuleEngine: Send + Sync {
    /// Rules for `benchmark`, or the default set when none is registered.
    fn rules_for(&self, benchmark: &str) -> RuleSet;

    /// Add or replace the rule set registered under its benchmark name.
    fn register(&mut self, ruleset: RuleSet);
}

/// The rule sets every engine starts with.
pub fn builtin_rulesets() -> Vec<RuleSet> {
    let default = RuleSet::new(
        DEFAULT_RULESET,
        vec![
            ExtractionRule::new("benchmark", r"benchmark:\s*(.+)"),
            ExtractionRule::new("run-id", r"run-id:\s*(.+)"),
            ExtractionRule::new("result", r"result:\s*(.+)"),
        ],
    );

    let trafficgen = RuleSet::new(
        "trafficgen",
        vec![
            ExtractionRule::new("benchmark", r"benchmark:\s*(.+)"),
            ExtractionRule::new("run-id", r"run-id:\s*(.+)"),
            ExtractionRule::new("period_length", r"period length:\s*(.+)"),
            ExtractionRule::new(
                "result",
                r"result:\s*\(([^)]+)\)\s*samples:\s*([0-9.]+)\s*mean:\s*([0-9.]+)\s*min:\s*([0-9.]+)\s*max:\s*([0-9.]+)",
            )
            .with_processor("trafficgen_result"),
        ],
    )
    .with_metadata_rules(vec![
        ExtractionRule::new("tags", r"tags:\s*(.+)"),
        ExtractionRule::new("iteration-id", r"iteration-id:\s*(.+)"),
        ExtractionRule::new("sample-id", r"sample-id:\s*(.+)"),
        ExtractionRule::new("period_range_begin", r"begin:\s*(\d+)"),
        ExtractionRule::new("period_range_end", r"end:\s*(\d+)"),
    ]);

    vec![default, trafficgen]
}

/// In-memory registry of rule sets.
#[derive(Debug, Clone)]
pub struct ConfigurableRuleEngine {
    rulesets: BTreeMap<String, RuleSet>,
}

impl ConfigurableRuleEngine {
    /// Engine holding the built-in rule sets.
    pub fn new() -> Self {
        let mut engine = Self {
            rulesets: BTreeMap::new(),
        };
        for set in builtin_rulesets() {
            engine.register(set);
        }
        engine
    }

    pub fn get(&self, benchmark: &str) -> Option<&RuleSet> {
        self.rulesets.get(benchmark)
    }

    pub fn get_mut(&mut self, benchmark: &str) -> Option<&mut RuleSet> {
        self.rulesets.get_mut(benchmark)
    }

    /// Registered benchmark names, sorted.
    pub fn list_benchmarks(&self) -> Vec<String> {
        self.rulesets.keys().cloned().collect()
    }

    /// Remove a rule set. The default set is never removed.
    pub fn remove(&mut self, benchmark: &str) -> bool {
        if benchmark == DEFAULT_RULESET {
            warn!("refusing to remove the default rule set");
            return false;
        }
        self.rulesets.remove(benchmark).is_some()
    }
}

impl Default for ConfigurableRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine for ConfigurableRuleEngine {
    fn rules_for(&self, benchmark: &str) -> RuleSet {
        self.rulesets
            .get(benchmark)
            .or_else(|| self.rulesets.get(DEFAULT_RULESET))
            .cloned()
            .unwrap_or_else(|| RuleSet::new(DEFAULT_RULESET, Vec::new()))
    }

    fn register(&mut self, ruleset: RuleSet) {
        debug!(benchmark = %ruleset.benchmark_name, rules = ruleset.rules.len(), "registering rule set");
        self.rulesets.insert(ruleset.benchmark_name.clone(), ruleset);
    }
}

/// Rule engine backed by a directory of JSON or YAML rule files.
#[derive(Debug, Clone)]
pub struct FileBasedRuleEngine {
    engine: ConfigurableRuleEngine,
    config_dir: PathBuf,
}

impl FileBasedRuleEngine {
    /// Open a rule directory, creating it if needed, and load every file in it.
    ///
    /// Files that fail to decode are logged and skipped.
    pub fn open(config_dir: impl Into<PathBuf>) -> Result<Self> {
        let config_dir = config_dir.into();
        fs::create_dir_all(&config_dir).map_err(|e| CoreError::io_error(&config_dir, e))?;
        let mut engine = Self {
            engine: ConfigurableRuleEngine::new(),
            config_dir,
        };
        let loaded = engine.reload()?;
        info!(dir = %engine.config_dir.display(), loaded, "loaded rule configurations");
        Ok(engine)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Load every `.json`, `.yaml` and `.yml` file in the directory.
    /// Returns the number of rule sets loaded.
    pub fn reload(&mut self) -> Result<usize> {
        let entries =
            fs::read_dir(&self.config_dir).map_err(|e| CoreError::io_error(&self.config_dir, e))?;
        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                matches!(
                    p.extension().and_then(|e| e.to_str()),
                    Some("json" | "yaml" | "yml")
                )
            })
            .collect();
        paths.sort();

        let mut loaded = 0;
        for path in paths {
            match Self::load_file(&path) {
                Ok(set) => {
                    self.engine.register(set);
                    loaded += 1;
                }
                Err(e) => warn!(error = %e, "skipping rule configuration"),
            }
        }
        Ok(loaded)
    }

    /// Decode one rule file; the format follows the extension.
    pub fn load_file(path: &Path) -> Result<RuleSet> {
        let text = fs::read_to_string(path).map_err(|e| CoreError::io_error(path, e))?;
        let set: RuleSet = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => {
                serde_json::from_str(&text).map_err(|e| CoreError::rule_config(path, e))?
            }
            _ => serde_yaml::from_str(&text).map_err(|e| CoreError::rule_config(path, e))?,
        };
        set.validate()?;
        Ok(set)
    }

    /// Write a registered rule set to `<config_dir>/<benchmark>.json`.
    pub fn save(&self, benchmark: &str) -> Result<PathBuf> {
        let set = self
            .engine
            .get(benchmark)
            .ok_or_else(|| CoreError::UnknownBenchmark(benchmark.to_string()))?;
        let path = self.config_dir.join(format!("{}.json", benchmark));
        let json =
            serde_json::to_string_pretty(set).map_err(|e| CoreError::rule_config(&path, e))?;
        fs::write(&path, json).map_err(|e| CoreError::io_error(&path, e))?;
        Ok(path)
    }

    pub fn engine(&self) -> &ConfigurableRuleEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut ConfigurableRuleEngine {
        &mut self.engine
    }
}

impl RuleEngine for FileBasedRuleEngine {
    fn rules_for(&self, benchmark: &str) -> RuleSet {
        self.engine.rules_for(benchmark)
    }

    fn register(&mut self, ruleset: RuleSet) {
        self.engine.register(ruleset);
    }
}

/// Whether a rule was added or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Added,
    Removed,
}

/// Notification passed to change listeners.
#[derive(Debug, Clone, Copy)]
pub struct RuleChange<'a> {
    pub benchmark: &'a str,
    pub action: RuleAction,
    pub rule: &'a ExtractionRule,
    /// The rule belongs to the metadata list
    pub metadata: bool,
}

pub type RuleChangeListener = Box<dyn Fn(&RuleChange<'_>) + Send + Sync>;

/// Rule engine that edits single rules at runtime and notifies listeners.
pub struct DynamicRuleEngine {
    engine: ConfigurableRuleEngine,
    listeners: Vec<RuleChangeListener>,
}

impl DynamicRuleEngine {
    pub fn new() -> Self {
        Self {
            engine: ConfigurableRuleEngine::new(),
            listeners: Vec::new(),
        }
    }

    /// Register a listener called after every rule change.
    pub fn on_change(&mut self, listener: impl Fn(&RuleChange<'_>) + Send + Sync + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Add a rule, creating the benchmark's rule set if it does not exist.
    pub fn add_rule(&mut self, benchmark: &str, rule: ExtractionRule, metadata: bool) {
        let set = self
            .engine
            .rulesets
            .entry(benchmark.to_string())
            .or_insert_with(|| RuleSet::new(benchmark, Vec::new()));
        if metadata {
            set.metadata_rules.get_or_insert_with(Vec::new).push(rule.clone());
        } else {
            set.rules.push(rule.clone());
        }
        self.notify(&RuleChange {
            benchmark,
            action: RuleAction::Added,
            rule: &rule,
            metadata,
        });
    }

    /// Remove every rule for `field_name`. Returns whether anything was removed.
    pub fn remove_rule(&mut self, benchmark: &str, field_name: &str, metadata: bool) -> bool {
        let Some(set) = self.engine.get_mut(benchmark) else {
            return false;
        };
        let list = if metadata {
            match set.metadata_rules.as_mut() {
                Some(list) => list,
                None => return false,
            }
        } else {
            &mut set.rules
        };

        let (removed, kept): (Vec<_>, Vec<_>) =
            list.drain(..).partition(|r| r.field_name == field_name);
        *list = kept;

        for rule in &removed {
            self.notify(&RuleChange {
                benchmark,
                action: RuleAction::Removed,
                rule,
                metadata,
            });
        }
        !removed.is_empty()
    }

    pub fn engine(&self) -> &ConfigurableRuleEngine {
        &self.engine
    }

    fn notify(&self, change: &RuleChange<'_>) {
        debug!(benchmark = change.benchmark, action = ?change.action, field = %change.rule.field_name, "rule changed");
        for listener in &self.listeners {
            listener(change);
        }
    }
}

impl Default for DynamicRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleEngine for DynamicRuleEngine {
    fn rules_for(&self, benchmark: &str) -> RuleSet {
        self.engine.rules_for(benchmark)
    }

    fn register(&mut self, ruleset: RuleSet) {
        self.engine.register(ruleset);
    }
}

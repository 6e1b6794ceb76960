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

//! File discovery.
//!
//! Result files live one per run directory. The standard strategy walks the
//! tree in a stable order and takes the first matching file in each
//! directory; once a directory has produced a file, nothing beneath it is
//! visited. Sibling directories are independent of each other.
//!
//! Filtering and regex selection are decorators over any [`FileDiscovery`].

use crate::error::{CoreError, Result};
use crate::model::DiscoveredFile;
use regex::Regex;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// File name searched for when none is configured.
pub const DEFAULT_FILE_PATTERN: &str = "result-summary.txt";

/// Directory depth searched when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 8;

/// A strategy for locating result files under a root directory.
pub trait FileDiscovery: Send + Sync {
    /// Find files whose name matches `pattern`, descending at most
    /// `max_depth` directories below `root`.
    ///
    /// Unreadable directories are logged and skipped; the call itself never
    /// fails.
    fn discover(&self, root: &Path, pattern: &str, max_depth: usize) -> Vec<DiscoveredFile>;
}

impl<T: FileDiscovery + ?Sized> FileDiscovery for Box<T> {
    fn discover(&self, root: &Path, pattern: &str, max_depth: usize) -> Vec<DiscoveredFile> {
        (**self).discover(root, pattern, max_depth)
    }
}

/// Files before directories, then by name.
fn files_first(a: &DirEntry, b: &DirEntry) -> Ordering {
    a.file_type()
        .is_dir()
        .cmp(&b.file_type().is_dir())
        .then_with(|| a.file_name().cmp(b.file_name()))
}

/// Depth-first, first-match-per-directory discovery using glob name patterns.
#[derive(Debug, Clone, Default)]
pub struct StandardFileDiscovery {
    follow_symlinks: bool,
}

impl StandardFileDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow symbolic links while walking.
    pub fn follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

impl FileDiscovery for StandardFileDiscovery {
    fn discover(&self, root: &Path, pattern: &str, max_depth: usize) -> Vec<DiscoveredFile> {
        let matcher = match glob::Pattern::new(pattern) {
            Ok(m) => m,
            Err(e) => {
                warn!(pattern, error = %e, "invalid file pattern");
                return Vec::new();
            }
        };

        let mut found = Vec::new();
        let mut satisfied: HashSet<PathBuf> = HashSet::new();

        // Files sit one level below their directory, so a directory at depth
        // `max_depth` needs the walk to reach `max_depth + 1`.
        let mut walker = WalkDir::new(root)
            .follow_links(self.follow_symlinks)
            .max_depth(max_depth.saturating_add(1))
            .sort_by(files_first)
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable path during discovery");
                    continue;
                }
            };
            let path = entry.path();

            if entry.file_type().is_dir() {
                if path.ancestors().any(|a| satisfied.contains(a)) {
                    walker.skip_current_dir();
                }
                continue;
            }

            let Some(parent) = path.parent() else {
                continue;
            };
            if parent.ancestors().any(|a| satisfied.contains(a)) {
                continue;
            }
            if !matcher.matches(&entry.file_name().to_string_lossy()) || !path.is_file() {
                continue;
            }

            match std::fs::metadata(path) {
                Ok(meta) => {
                    debug!(path = %path.display(), "discovered result file");
                    found.push(DiscoveredFile::new(
                        path,
                        meta.len(),
                        meta.modified().unwrap_or(UNIX_EPOCH),
                    ));
                    satisfied.insert(parent.to_path_buf());
                }
                Err(e) => warn!(path = %path.display(), error = %e, "cannot stat file"),
            }
        }

        found
    }
}

/// Discovery that drops files outside a size or modification-time range.
///
/// Both ranges are inclusive.
pub struct FilteredFileDiscovery {
    base: Box<dyn FileDiscovery>,
    size_range: Option<(u64, u64)>,
    date_range: Option<(SystemTime, SystemTime)>,
}

impl FilteredFileDiscovery {
    pub fn new(base: impl FileDiscovery + 'static) -> Self {
        Self {
            base: Box::new(base),
            size_range: None,
            date_range: None,
        }
    }

    pub fn with_size_range(mut self, min: u64, max: u64) -> Self {
        self.size_range = Some((min, max));
        self
    }

    pub fn with_date_range(mut self, from: SystemTime, to: SystemTime) -> Self {
        self.date_range = Some((from, to));
        self
    }

    fn accepts(&self, file: &DiscoveredFile) -> bool {
        if let Some((min, max)) = self.size_range {
            if file.size < min || file.size > max {
                return false;
            }
        }
        if let Some((from, to)) = self.date_range {
            if file.modified < from || file.modified > to {
                return false;
            }
        }
        true
    }
}

impl FileDiscovery for FilteredFileDiscovery {
    fn discover(&self, root: &Path, pattern: &str, max_depth: usize) -> Vec<DiscoveredFile> {
        let files = self.base.discover(root, pattern, max_depth);
        let before = files.len();
        let kept: Vec<_> = files.into_iter().filter(|f| self.accepts(f)).collect();
        debug!(before, after = kept.len(), "applied discovery filters");
        kept
    }
}

/// Discovery that selects file names by regular expression.
///
/// The base strategy is asked for every file (`*`) and the names are then
/// matched against the regex. Since the base keeps only the first file per
/// directory, a directory whose first file does not match contributes
/// nothing.
pub struct RegexPatternDiscovery {
    base: Box<dyn FileDiscovery>,
}

impl RegexPatternDiscovery {
    pub fn new(base: impl FileDiscovery + 'static) -> Self {
        Self {
            base: Box::new(base),
        }
    }

    /// Discover files whose name matches `regex`.
    pub fn discover_by_regex(
        &self,
        root: &Path,
        regex: &str,
        max_depth: usize,
    ) -> Result<Vec<DiscoveredFile>> {
        let re = Regex::new(regex).map_err(|e| CoreError::invalid_pattern("file_name", &e))?;
        Ok(self
            .base
            .discover(root, "*", max_depth)
            .into_iter()
            .filter(|f| re.is_match(&f.file_name()))
            .collect())
    }
}

impl FileDiscovery for RegexPatternDiscovery {
    fn discover(&self, root: &Path, pattern: &str, max_depth: usize) -> Vec<DiscoveredFile> {
        self.discover_by_regex(root, pattern, max_depth)
            .unwrap_or_else(|e| {
                warn!(error = %e, "regex discovery failed");
                Vec::new()
            })
    }
}

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

//! Content cache keyed by path and modification time.
//!
//! # Thread Safety
//!
//! Entries live behind a `parking_lot::RwLock`, so parallel workers can read
//! concurrently while inserts are exclusive. Hit and miss counters are
//! atomics and never take the lock.

use super::ContentParser;
use crate::model::DiscoveredFile;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::trace;

#[derive(Debug)]
struct CacheEntry {
    modified: SystemTime,
    content: Arc<str>,
}

/// Snapshot of cache usage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    /// Number of cached files
    pub entries: usize,
    /// Total cached text in bytes
    pub bytes: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Hit rate in `0.0..=1.0`.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Wraps another parser and remembers its output.
///
/// An entry is reused only while the file's modification time is unchanged;
/// a newer mtime replaces the entry. Files the inner parser rejects are not
/// cached.
pub struct CachingParser {
    inner: Box<dyn ContentParser>,
    entries: RwLock<HashMap<PathBuf, CacheEntry>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CachingParser {
    pub fn new(inner: impl ContentParser + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            entries: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        CacheStats {
            entries: entries.len(),
            bytes: entries.values().map(|e| e.content.len()).sum(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.entries.write().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    fn lookup(&self, file: &DiscoveredFile) -> Option<Arc<str>> {
        self.entries
            .read()
            .get(&file.path)
            .filter(|e| e.modified == file.modified)
            .map(|e| Arc::clone(&e.content))
    }
}

impl ContentParser for CachingParser {
    fn parse(&self, file: &DiscoveredFile) -> Option<String> {
        if let Some(content) = self.lookup(file) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(path = %file.path.display(), "content cache hit");
            return Some(content.to_string());
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let content = self.inner.parse(file)?;
        self.entries.write().insert(
            file.path.clone(),
            CacheEntry {
                modified: file.modified,
                content: Arc::from(content.as_str()),
            },
        );
        Some(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::{Duration, UNIX_EPOCH};

    struct CountingParser {
        calls: Arc<AtomicUsize>,
    }

    impl ContentParser for CountingParser {
        fn parse(&self, file: &DiscoveredFile) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if file.path.ends_with("missing.txt") {
                None
            } else {
                Some(format!("content of {}", file.path.display()))
            }
        }
    }

    fn counting() -> (CachingParser, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let parser = CachingParser::new(CountingParser {
            calls: Arc::clone(&calls),
        });
        (parser, calls)
    }

    #[test]
    fn test_second_parse_is_a_hit() {
        let (parser, calls) = counting();
        let file = DiscoveredFile::new("a.txt", 10, UNIX_EPOCH);

        let first = parser.parse(&file);
        let second = parser.parse(&file);
        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let stats = parser.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (1, 1, 1));
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_changed_mtime_invalidates_entry() {
        let (parser, calls) = counting();
        let old = DiscoveredFile::new("a.txt", 10, UNIX_EPOCH);
        let new = DiscoveredFile::new("a.txt", 10, UNIX_EPOCH + Duration::from_secs(5));

        parser.parse(&old);
        parser.parse(&new);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(parser.stats().entries, 1);
    }

    #[test]
    fn test_failures_are_not_cached() {
        let (parser, calls) = counting();
        let file = DiscoveredFile::new("missing.txt", 0, UNIX_EPOCH);
        assert!(parser.parse(&file).is_none());
        assert!(parser.parse(&file).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(parser.stats().entries, 0);
    }

    #[test]
    fn test_clear_resets_everything() {
        let (parser, _) = counting();
        parser.parse(&DiscoveredFile::new("a.txt", 1, UNIX_EPOCH));
        parser.clear();
        assert_eq!(parser.stats(), CacheStats::default());
    }
}

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

//! Temporary directory trees of result files.

use std::fs;
use tempfile::TempDir;

/// Collects files and writes them under a fresh temporary directory.
///
/// Panics on I/O failure; intended for tests only.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    files: Vec<(String, Vec<u8>)>,
    dirs: Vec<String>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text file at a `/`-separated relative path.
    pub fn file(mut self, rel: &str, content: &str) -> Self {
        self.files.push((rel.to_string(), content.as_bytes().to_vec()));
        self
    }

    /// Add a file with arbitrary bytes.
    pub fn bytes(mut self, rel: &str, content: &[u8]) -> Self {
        self.files.push((rel.to_string(), content.to_vec()));
        self
    }

    /// Add an empty directory.
    pub fn dir(mut self, rel: &str) -> Self {
        self.dirs.push(rel.to_string());
        self
    }

    pub fn build(self) -> TempDir {
        let root = TempDir::new().expect("create temp dir");
        for dir in &self.dirs {
            fs::create_dir_all(root.path().join(dir)).expect("create dir");
        }
        for (rel, content) in &self.files {
            let path = root.path().join(rel);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent dir");
            }
            fs::write(&path, content).expect("write fixture file");
        }
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_nested_tree() {
        let tree = TreeBuilder::new()
            .file("a/b/result-summary.txt", "x")
            .dir("empty")
            .build();
        assert!(tree.path().join("a/b/result-summary.txt").is_file());
        assert!(tree.path().join("empty").is_dir());
    }
}

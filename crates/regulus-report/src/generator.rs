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

//! The output generator interface.

use crate::document::RunMetadata;
use crate::error::{OutputError, Result};
use regulus_core::FileReport;
use std::fs;
use std::path::Path;

/// Renders processed file reports into one artifact.
pub trait OutputGenerator: Send + Sync {
    /// File extension of the artifact, without the dot.
    fn extension(&self) -> &str;

    /// Render the artifact as text.
    fn render(&self, reports: &[FileReport], meta: &RunMetadata) -> Result<String>;

    /// Render and write the artifact to `path`.
    fn generate(&self, reports: &[FileReport], meta: &RunMetadata, path: &Path) -> Result<()> {
        let text = self.render(reports, meta)?;
        write_artifact(path, &text)
    }
}

impl<T: OutputGenerator + ?Sized> OutputGenerator for Box<T> {
    fn extension(&self) -> &str {
        (**self).extension()
    }

    fn render(&self, reports: &[FileReport], meta: &RunMetadata) -> Result<String> {
        (**self).render(reports, meta)
    }

    fn generate(&self, reports: &[FileReport], meta: &RunMetadata, path: &Path) -> Result<()> {
        (**self).generate(reports, meta, path)
    }
}

/// Write `text` to `path`, creating missing parent directories.
pub fn write_artifact(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| OutputError::io_error(parent, e))?;
    }
    fs::write(path, text).map_err(|e| OutputError::io_error(path, e))
}

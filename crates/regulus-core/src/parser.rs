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

//! Content parsers: turn a discovered file into text.
//!
//! A parser returns `None` when it cannot produce usable text. The reason is
//! logged, never raised, so one bad file cannot stop a run.

mod cache;

pub use cache::{CacheStats, CachingParser};

use crate::error::{CoreError, Result};
use crate::model::DiscoveredFile;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Default read cap (100 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Environment variable overriding [`DEFAULT_MAX_FILE_SIZE`].
pub const MAX_FILE_SIZE_ENV: &str = "REGULUS_MAX_FILE_SIZE";

/// Bytes inspected when deciding whether a file is binary.
const BINARY_PROBE_LEN: u64 = 1024;

/// Read cap from the environment, falling back to the default.
pub fn max_file_size() -> u64 {
    std::env::var(MAX_FILE_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Read a whole file, refusing anything larger than `max_size`.
pub fn read_capped(path: &Path, max_size: u64) -> Result<Vec<u8>> {
    let meta = std::fs::metadata(path).map_err(|e| CoreError::io_error(path, e))?;
    if meta.len() > max_size {
        return Err(CoreError::file_too_large(path, meta.len(), max_size));
    }
    std::fs::read(path).map_err(|e| CoreError::io_error(path, e))
}

/// Turns a file into text.
pub trait ContentParser: Send + Sync {
    fn parse(&self, file: &DiscoveredFile) -> Option<String>;
}

impl<T: ContentParser + ?Sized> ContentParser for Box<T> {
    fn parse(&self, file: &DiscoveredFile) -> Option<String> {
        (**self).parse(file)
    }
}

impl<T: ContentParser + ?Sized> ContentParser for std::sync::Arc<T> {
    fn parse(&self, file: &DiscoveredFile) -> Option<String> {
        (**self).parse(file)
    }
}

/// Reads UTF-8 text, replacing invalid sequences.
#[derive(Debug, Clone)]
pub struct TextFileParser {
    max_size: u64,
}

impl TextFileParser {
    pub fn new() -> Self {
        Self {
            max_size: max_file_size(),
        }
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }
}

impl Default for TextFileParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentParser for TextFileParser {
    fn parse(&self, file: &DiscoveredFile) -> Option<String> {
        match read_capped(&file.path, self.max_size) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!(error = %e, "cannot read result file");
                None
            }
        }
    }
}

/// Text encodings tried by [`MultiEncodingParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Windows1252,
    Latin1,
}

/// Characters for Windows-1252 bytes 0x80..=0x9F; `None` marks unassigned bytes.
const WINDOWS_1252_HIGH: [Option<char>; 32] = [
    Some('\u{20AC}'),
    None,
    Some('\u{201A}'),
    Some('\u{0192}'),
    Some('\u{201E}'),
    Some('\u{2026}'),
    Some('\u{2020}'),
    Some('\u{2021}'),
    Some('\u{02C6}'),
    Some('\u{2030}'),
    Some('\u{0160}'),
    Some('\u{2039}'),
    Some('\u{0152}'),
    None,
    Some('\u{017D}'),
    None,
    None,
    Some('\u{2018}'),
    Some('\u{2019}'),
    Some('\u{201C}'),
    Some('\u{201D}'),
    Some('\u{2022}'),
    Some('\u{2013}'),
    Some('\u{2014}'),
    Some('\u{02DC}'),
    Some('\u{2122}'),
    Some('\u{0161}'),
    Some('\u{203A}'),
    Some('\u{0153}'),
    None,
    Some('\u{017E}'),
    Some('\u{0178}'),
];

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Windows1252 => "windows-1252",
            Encoding::Latin1 => "latin-1",
        }
    }

    /// Strict decode; `None` if the bytes are not valid in this encoding.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Encoding::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Encoding::Latin1 => Some(bytes.iter().map(|&b| b as char).collect()),
            Encoding::Windows1252 => bytes
                .iter()
                .map(|&b| match b {
                    0x80..=0x9F => WINDOWS_1252_HIGH[(b - 0x80) as usize],
                    _ => Some(b as char),
                })
                .collect(),
        }
    }
}

/// Tries a fixed list of encodings in order and keeps the first clean decode.
#[derive(Debug, Clone)]
pub struct MultiEncodingParser {
    encodings: Vec<Encoding>,
    max_size: u64,
}

impl MultiEncodingParser {
    pub fn new() -> Self {
        Self {
            encodings: vec![Encoding::Utf8, Encoding::Windows1252, Encoding::Latin1],
            max_size: max_file_size(),
        }
    }

    pub fn with_encodings(mut self, encodings: Vec<Encoding>) -> Self {
        self.encodings = encodings;
        self
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }
}

impl Default for MultiEncodingParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentParser for MultiEncodingParser {
    fn parse(&self, file: &DiscoveredFile) -> Option<String> {
        let bytes = match read_capped(&file.path, self.max_size) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "cannot read result file");
                return None;
            }
        };
        for encoding in &self.encodings {
            if let Some(text) = encoding.decode(&bytes) {
                debug!(path = %file.path.display(), encoding = encoding.name(), "decoded file");
                return Some(text);
            }
        }
        warn!(path = %file.path.display(), "no configured encoding could decode file");
        None
    }
}

/// Keep printable ASCII plus tab, newline and carriage return.
pub fn extract_printable(bytes: &[u8]) -> Option<String> {
    let text: String = bytes
        .iter()
        .filter(|&&b| (32..=126).contains(&b) || matches!(b, b'\t' | b'\n' | b'\r'))
        .map(|&b| b as char)
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Salvages printable text from files that look binary.
///
/// A NUL byte in the first KiB marks a file as binary. Text files go to the
/// fallback parser.
pub struct BinaryAwareParser {
    fallback: Box<dyn ContentParser>,
    max_size: u64,
}

impl BinaryAwareParser {
    pub fn new(fallback: impl ContentParser + 'static) -> Self {
        Self {
            fallback: Box::new(fallback),
            max_size: max_file_size(),
        }
    }

    fn looks_binary(path: &Path) -> std::io::Result<bool> {
        let mut probe = Vec::with_capacity(BINARY_PROBE_LEN as usize);
        File::open(path)?
            .take(BINARY_PROBE_LEN)
            .read_to_end(&mut probe)?;
        Ok(probe.contains(&0))
    }
}

impl Default for BinaryAwareParser {
    fn default() -> Self {
        Self::new(TextFileParser::new())
    }
}

impl ContentParser for BinaryAwareParser {
    fn parse(&self, file: &DiscoveredFile) -> Option<String> {
        match Self::looks_binary(&file.path) {
            Ok(false) => self.fallback.parse(file),
            Ok(true) => {
                debug!(path = %file.path.display(), "extracting text from binary file");
                match read_capped(&file.path, self.max_size) {
                    Ok(bytes) => extract_printable(&bytes),
                    Err(e) => {
                        warn!(error = %e, "cannot read binary file");
                        None
                    }
                }
            }
            Err(e) => {
                warn!(path = %file.path.display(), error = %e, "cannot probe file");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regulus_test::TreeBuilder;

    fn discovered(path: &Path) -> DiscoveredFile {
        DiscoveredFile::from_path(path).unwrap()
    }

    #[test]
    fn test_text_parser_reads_file() {
        let tree = TreeBuilder::new().file("r.txt", "benchmark: uperf\n").build();
        let file = discovered(&tree.path().join("r.txt"));
        assert_eq!(
            TextFileParser::new().parse(&file).as_deref(),
            Some("benchmark: uperf\n")
        );
    }

    #[test]
    fn test_text_parser_respects_size_cap() {
        let tree = TreeBuilder::new().file("r.txt", "0123456789").build();
        let file = discovered(&tree.path().join("r.txt"));
        assert!(TextFileParser::new().with_max_size(4).parse(&file).is_none());
    }

    #[test]
    fn test_unreadable_file_yields_none() {
        let file = DiscoveredFile::new("/nonexistent/result.txt", 0, std::time::UNIX_EPOCH);
        assert!(TextFileParser::new().parse(&file).is_none());
        assert!(MultiEncodingParser::new().parse(&file).is_none());
        assert!(BinaryAwareParser::default().parse(&file).is_none());
    }

    #[test]
    fn test_windows_1252_decoding() {
        assert_eq!(
            Encoding::Windows1252.decode(&[0x80, b'5']).as_deref(),
            Some("\u{20AC}5")
        );
        assert!(Encoding::Windows1252.decode(&[0x81]).is_none());
        assert!(Encoding::Utf8.decode(&[0xE9]).is_none());
        assert_eq!(Encoding::Latin1.decode(&[0xE9]).as_deref(), Some("\u{e9}"));
    }

    #[test]
    fn test_multi_encoding_falls_back() {
        let tree = TreeBuilder::new()
            .bytes("r.txt", b"caf\xe9 \x93quoted\x94")
            .build();
        let file = discovered(&tree.path().join("r.txt"));
        let text = MultiEncodingParser::new().parse(&file).unwrap();
        assert_eq!(text, "caf\u{e9} \u{201C}quoted\u{201D}");
    }

    #[test]
    fn test_binary_parser_extracts_printable_text() {
        let tree = TreeBuilder::new()
            .bytes("r.bin", b"\x00\x01benchmark: uperf\n\xff\x00")
            .build();
        let file = discovered(&tree.path().join("r.bin"));
        assert_eq!(
            BinaryAwareParser::default().parse(&file).as_deref(),
            Some("benchmark: uperf\n")
        );
    }

    #[test]
    fn test_binary_parser_returns_none_without_printable_text() {
        let tree = TreeBuilder::new().bytes("r.bin", b"\x00\x01\x02 \x00").build();
        let file = discovered(&tree.path().join("r.bin"));
        assert!(BinaryAwareParser::default().parse(&file).is_none());
    }

    #[test]
    fn test_binary_parser_delegates_text() {
        let tree = TreeBuilder::new().file("r.txt", "plain").build();
        let file = discovered(&tree.path().join("r.txt"));
        assert_eq!(BinaryAwareParser::default().parse(&file).as_deref(), Some("plain"));
    }
}

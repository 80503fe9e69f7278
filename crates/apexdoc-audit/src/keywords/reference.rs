//! Reference Document Extractor
//!
//! Pulls the set of documented keys out of the Markdown YAML reference:
//! fenced `yaml` blocks, backtick-quoted table cells, and the trailing
//! segment of quoted `source-field` / `target-field` values.

use super::{KeywordSet, scan_line_keys};
use crate::Result;
use once_cell::sync::Lazy;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag, TagEnd};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

static TABLE_CELL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\|[ \t]*`([A-Za-z_][A-Za-z0-9_.-]*)`[ \t]*\|").expect("Invalid regex")
});

static FIELD_REFERENCE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:source-field|target-field)[ \t]*:[ \t]*["']([^"']+)["']"#)
        .expect("Invalid regex")
});

/// Keys documented by the reference, with per-pass counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceKeys {
    /// Document that was read
    pub path: PathBuf,
    /// False when the document did not exist
    pub exists: bool,
    /// Union of every extraction pass
    pub keys: KeywordSet,
    /// Number of fenced YAML blocks seen
    pub fenced_blocks: usize,
    /// Keys found inside fenced YAML blocks
    pub from_code_blocks: KeywordSet,
    /// Keys found in backtick-quoted table cells
    pub from_tables: KeywordSet,
    /// Keys derived from source-field / target-field values
    pub from_field_references: KeywordSet,
}

/// Markdown reference extractor
#[derive(Debug, Default)]
pub struct ReferenceExtractor;

impl ReferenceExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Read and extract a reference document.
    ///
    /// A missing document yields an empty result with `exists = false`.
    pub fn extract_file(&self, path: impl AsRef<Path>) -> Result<ReferenceKeys> {
        let path = path.as_ref();
        if !path.is_file() {
            warn!(document = %path.display(), "reference document not found");
            return Ok(ReferenceKeys {
                path: path.to_path_buf(),
                exists: false,
                ..ReferenceKeys::default()
            });
        }

        let content = std::fs::read_to_string(path)?;
        let mut keys = self.extract_str(&content);
        keys.path = path.to_path_buf();
        debug!(
            document = %path.display(),
            keys = keys.keys.len(),
            blocks = keys.fenced_blocks,
            "reference document parsed"
        );
        Ok(keys)
    }

    /// Extract keys from Markdown text
    pub fn extract_str(&self, markdown: &str) -> ReferenceKeys {
        let (fenced_blocks, from_code_blocks) = Self::code_block_keys(markdown);
        let from_tables = Self::table_keys(markdown);
        let from_field_references = Self::field_reference_keys(markdown);

        let keys = from_code_blocks
            .iter()
            .chain(&from_tables)
            .chain(&from_field_references)
            .cloned()
            .collect();

        ReferenceKeys {
            path: PathBuf::new(),
            exists: true,
            keys,
            fenced_blocks,
            from_code_blocks,
            from_tables,
            from_field_references,
        }
    }

    fn code_block_keys(markdown: &str) -> (usize, KeywordSet) {
        let mut blocks = 0;
        let mut keys = KeywordSet::new();
        let mut in_yaml_block = false;
        let mut buffer = String::new();

        for event in Parser::new(markdown) {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    in_yaml_block = is_yaml_fence(&info);
                    buffer.clear();
                }
                Event::Text(text) if in_yaml_block => buffer.push_str(&text),
                Event::End(TagEnd::CodeBlock) if in_yaml_block => {
                    blocks += 1;
                    keys.extend(scan_line_keys(&buffer));
                    in_yaml_block = false;
                }
                _ => {}
            }
        }

        (blocks, keys)
    }

    fn table_keys(markdown: &str) -> KeywordSet {
        // Adjacent cells share a pipe, so scan line by line with overlapping starts.
        let mut keys = KeywordSet::new();
        for line in markdown.lines() {
            let mut offset = 0;
            while let Some(caps) = TABLE_CELL_PATTERN.captures_at(line, offset) {
                let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                    break;
                };
                // Dotted paths document their leaf key, as field references do
                if let Some(leaf) = name.as_str().rsplit('.').next().filter(|s| !s.is_empty()) {
                    keys.insert(leaf.to_string());
                }
                // Resume at the closing pipe so the next cell can reuse it.
                offset = whole.end() - 1;
            }
        }
        keys
    }

    fn field_reference_keys(markdown: &str) -> KeywordSet {
        FIELD_REFERENCE_PATTERN
            .captures_iter(markdown)
            .filter_map(|caps| caps.get(1))
            .filter_map(|value| value.as_str().rsplit('.').next())
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect()
    }
}

fn is_yaml_fence(info: &str) -> bool {
    info.split_whitespace()
        .next()
        .is_some_and(|lang| lang.eq_ignore_ascii_case("yaml") || lang.eq_ignore_ascii_case("yml"))
}

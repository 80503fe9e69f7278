//! Keyword Coverage
//!
//! Extracts YAML mapping keys from configuration files and from the
//! reference document, then computes and categorizes the gaps between them.

pub mod classifier;
pub mod extractor;
pub mod gap;
pub mod reference;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

pub use classifier::{Category, CategoryBucket, Classification, GapClassifier, OTHER_CATEGORY};
pub use extractor::{Extraction, FileExtraction, KeywordExtractor, ParseOutcome};
pub use gap::{GapAnalysis, GapReport};
pub use reference::{ReferenceExtractor, ReferenceKeys};

/// Flat set of keyword names. Ordered only so reports are deterministic.
pub type KeywordSet = BTreeSet<String>;

/// `identifier:` at the start of a line, optionally indented.
static LINE_KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*([A-Za-z_][A-Za-z0-9_-]*)[ \t]*:").expect("Invalid regex")
});

/// Line-oriented key scan shared by the YAML fallback and the reference
/// document's fenced blocks.
pub fn scan_line_keys(text: &str) -> KeywordSet {
    LINE_KEY_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

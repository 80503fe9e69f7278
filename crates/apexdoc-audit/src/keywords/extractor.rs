//! YAML Keyword Extractor
//!
//! Collects every mapping key that appears in the YAML files below a root
//! directory. Files are parsed structurally first; when the parser rejects a
//! file, a line regex recovers what it can and the outcome is tagged as a
//! heuristic fallback.

use super::{KeywordSet, scan_line_keys};
use crate::{AuditConfig, Result, scan};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Result of parsing a single YAML document stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseOutcome {
    /// The YAML parser accepted the file; keys are exact
    Structured { keys: KeywordSet },
    /// The parser rejected the file; keys come from the line regex
    HeuristicFallback { keys: KeywordSet, reason: String },
}

impl ParseOutcome {
    /// Keys found regardless of parse confidence
    pub fn keys(&self) -> &KeywordSet {
        match self {
            Self::Structured { keys } | Self::HeuristicFallback { keys, .. } => keys,
        }
    }

    /// Consume the outcome, returning its keys
    pub fn into_keys(self) -> KeywordSet {
        match self {
            Self::Structured { keys } | Self::HeuristicFallback { keys, .. } => keys,
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, Self::Structured { .. })
    }
}

/// Per-file extraction record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileExtraction {
    pub path: PathBuf,
    pub outcome: ParseOutcome,
}

/// Aggregate extraction over a directory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    /// Directory that was scanned
    pub root: PathBuf,
    /// False when the root did not exist; every other field is then empty
    pub root_exists: bool,
    /// Union of all keys found
    pub keys: KeywordSet,
    /// One record per file that could be read
    pub files: Vec<FileExtraction>,
    /// Files that could not be read at all, with the reason
    pub unreadable: Vec<(PathBuf, String)>,
}

impl Extraction {
    /// Number of files that matched the extension filter
    pub fn files_scanned(&self) -> usize {
        self.files.len() + self.unreadable.len()
    }

    pub fn structured_count(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_structured()).count()
    }

    pub fn fallback_count(&self) -> usize {
        self.files.len() - self.structured_count()
    }
}

/// Parse YAML text, falling back to the line regex on parse failure.
pub fn extract_from_str(content: &str) -> ParseOutcome {
    match parse_documents(content) {
        Ok(documents) => {
            let mut keys = KeywordSet::new();
            for document in &documents {
                collect_mapping_keys(document, &mut keys);
            }
            ParseOutcome::Structured { keys }
        }
        Err(err) => ParseOutcome::HeuristicFallback {
            keys: scan_line_keys(content),
            reason: err.to_string(),
        },
    }
}

/// Every document in a (possibly multi-document) YAML stream
fn parse_documents(content: &str) -> std::result::Result<Vec<Value>, serde_yaml::Error> {
    serde_yaml::Deserializer::from_str(content)
        .map(Value::deserialize)
        .collect()
}

/// Recursively collect mapping keys at any depth.
///
/// Sequences contribute no keys themselves; their elements are visited.
pub fn collect_mapping_keys(value: &Value, keys: &mut KeywordSet) {
    match value {
        Value::Mapping(mapping) => {
            for (key, child) in mapping {
                if let Some(name) = key_to_string(key) {
                    keys.insert(name);
                }
                collect_mapping_keys(child, keys);
            }
        }
        Value::Sequence(items) => {
            for item in items {
                collect_mapping_keys(item, keys);
            }
        }
        Value::Tagged(tagged) => collect_mapping_keys(&tagged.value, keys),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => key_to_string(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// Directory-level keyword extractor
pub struct KeywordExtractor {
    config: AuditConfig,
}

impl KeywordExtractor {
    /// Create an extractor for the given scan configuration
    pub fn new(config: AuditConfig) -> Self {
        Self { config }
    }

    /// Create a recursive extractor rooted at `root`
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self::new(AuditConfig::new(root))
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Extract keys from every file whose extension is in `extensions`.
    ///
    /// A missing root is not an error: it is logged and an empty extraction
    /// with `root_exists = false` is returned.
    pub fn extract(&self, extensions: &[&str]) -> Result<Extraction> {
        let root = self.config.root.clone();
        if !self.config.root_exists() {
            warn!(root = %root.display(), "keyword root not found, nothing to extract");
            return Ok(Extraction {
                root,
                root_exists: false,
                ..Extraction::default()
            });
        }

        let mut extraction = Extraction {
            root,
            root_exists: true,
            ..Extraction::default()
        };

        for path in scan::collect_files(&self.config, extensions) {
            match Self::extract_file(&path) {
                Ok(outcome) => {
                    if let ParseOutcome::HeuristicFallback { reason, .. } = &outcome {
                        debug!(file = %path.display(), %reason, "YAML parse failed, used line fallback");
                    }
                    extraction.keys.extend(outcome.keys().iter().cloned());
                    extraction.files.push(FileExtraction { path, outcome });
                }
                Err(err) => {
                    warn!(file = %path.display(), error = %err, "skipping unreadable file");
                    extraction.unreadable.push((path, err.to_string()));
                }
            }
        }

        info!(
            root = %extraction.root.display(),
            files = extraction.files_scanned(),
            keys = extraction.keys.len(),
            fallback = extraction.fallback_count(),
            "keyword extraction complete"
        );
        Ok(extraction)
    }

    /// Extract keys from a single file
    pub fn extract_file(path: &Path) -> Result<ParseOutcome> {
        let content = std::fs::read_to_string(path)?;
        Ok(extract_from_str(&content))
    }
}

//! Metadata auto-fixer
//!
//! Adds missing required `metadata` fields by inserting text, so comments,
//! ordering and formatting of the rest of the file are untouched. Generated
//! values are derived from the file name; `type` is inferred from the
//! top-level keys and left out when nothing matches.

use crate::config::ConformanceConfig;
use crate::{AuditConfig, Result, scan};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Block-style `metadata:` line at column zero
static METADATA_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^metadata:[ \t]*(?:#.*)?\r?$").expect("Invalid regex"));

const DEFAULT_INDENT: &str = "  ";
const DEFAULT_VERSION: &str = "1.0.0";

/// Top-level key → inferred file type, first match wins
const TYPE_HINTS: [(&str, &str); 8] = [
    ("scenario", "scenario"),
    ("scenario-registry", "scenario-registry"),
    ("rule-chains", "rule-chain"),
    ("enrichments", "enrichment"),
    ("rules", "rule-config"),
    ("data-sources", "external-data-config"),
    ("pipeline", "pipeline"),
    ("data", "dataset"),
];

/// Result of fixing one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FixOutcome {
    /// Nothing could be added; `unresolved` lists fields still missing
    Unchanged { unresolved: Vec<String> },
    /// Fields were written to the file
    Patched {
        added: Vec<String>,
        unresolved: Vec<String>,
    },
    /// Dry run; fields would have been written
    WouldPatch {
        added: Vec<String>,
        unresolved: Vec<String>,
    },
    /// File left alone because its structure could not be patched
    Unparseable { reason: String },
}

impl std::fmt::Display for FixOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unchanged { unresolved } if unresolved.is_empty() => write!(f, "unchanged"),
            Self::Unchanged { unresolved } => {
                write!(f, "unchanged (unresolved: {})", unresolved.join(", "))
            }
            Self::Patched { added, unresolved } | Self::WouldPatch { added, unresolved } => {
                let verb = if matches!(self, Self::Patched { .. }) {
                    "added"
                } else {
                    "would add"
                };
                write!(f, "{verb}: {}", added.join(", "))?;
                if !unresolved.is_empty() {
                    write!(f, " (unresolved: {})", unresolved.join(", "))?;
                }
                Ok(())
            }
            Self::Unparseable { reason } => write!(f, "skipped: {reason}"),
        }
    }
}

/// Text patch computed for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPatch {
    pub added: Vec<String>,
    pub unresolved: Vec<String>,
    /// Patched file content; equal to the input when `added` is empty
    pub content: String,
}

/// Adds missing required metadata fields
#[derive(Debug, Clone)]
pub struct MetadataFixer {
    required_fields: Vec<String>,
    dry_run: bool,
}

impl MetadataFixer {
    pub fn new(rules: &ConformanceConfig) -> Self {
        Self {
            required_fields: rules.required_fields.clone(),
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Fix every YAML file under the scan root
    pub fn fix_tree(&self, config: &AuditConfig, extensions: &[&str]) -> Vec<(PathBuf, FixOutcome)> {
        let results: Vec<(PathBuf, FixOutcome)> = scan::collect_files(config, extensions)
            .into_iter()
            .map(|path| {
                let outcome = self.fix_file(&path).unwrap_or_else(|e| {
                    warn!(file = %path.display(), error = %e, "metadata fix failed");
                    FixOutcome::Unparseable {
                        reason: e.to_string(),
                    }
                });
                (path, outcome)
            })
            .collect();

        info!(
            files = results.len(),
            patched = results
                .iter()
                .filter(|(_, o)| matches!(o, FixOutcome::Patched { .. } | FixOutcome::WouldPatch { .. }))
                .count(),
            dry_run = self.dry_run,
            "metadata fix completed"
        );
        results
    }

    /// Fix one file in place (unless dry-running)
    pub fn fix_file(&self, path: &Path) -> Result<FixOutcome> {
        let content = std::fs::read_to_string(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let patch = match self.patch_str(&stem, &content) {
            Ok(patch) => patch,
            Err(reason) => {
                debug!(file = %path.display(), %reason, "not patchable");
                return Ok(FixOutcome::Unparseable { reason });
            }
        };

        if patch.added.is_empty() {
            return Ok(FixOutcome::Unchanged {
                unresolved: patch.unresolved,
            });
        }
        if self.dry_run {
            return Ok(FixOutcome::WouldPatch {
                added: patch.added,
                unresolved: patch.unresolved,
            });
        }

        std::fs::write(path, &patch.content)?;
        debug!(file = %path.display(), added = ?patch.added, "metadata patched");
        Ok(FixOutcome::Patched {
            added: patch.added,
            unresolved: patch.unresolved,
        })
    }

    /// Compute the patch for `content`; `stem` seeds generated values.
    ///
    /// Returns the reason when the text cannot be patched safely.
    pub fn patch_str(&self, stem: &str, content: &str) -> std::result::Result<MetadataPatch, String> {
        let document: Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
        let Value::Mapping(root) = &document else {
            return Err("document is not a mapping".to_string());
        };

        let existing = match root.get("metadata") {
            Some(Value::Mapping(metadata)) => Some(metadata),
            Some(Value::Null) | None => None,
            Some(_) => return Err("metadata is not a mapping".to_string()),
        };

        let mut added = Vec::new();
        let mut unresolved = Vec::new();
        let mut lines = Vec::new();
        for field in &self.required_fields {
            if existing.is_some_and(|m| m.contains_key(field.as_str())) {
                continue;
            }
            match generate_value(field, stem, root) {
                Some(value) => {
                    lines.push((field.clone(), value));
                    added.push(field.clone());
                }
                None => unresolved.push(field.clone()),
            }
        }

        if lines.is_empty() {
            return Ok(MetadataPatch {
                added,
                unresolved,
                content: content.to_string(),
            });
        }

        let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
        let patched = match METADATA_LINE.find(content) {
            Some(found) => insert_into_block(content, found.end(), &lines, newline),
            None if root.contains_key("metadata") => {
                return Err("metadata is not a block mapping".to_string());
            }
            None => insert_new_block(content, &lines, newline),
        };

        // Never write something that no longer parses
        serde_yaml::from_str::<Value>(&patched)
            .map_err(|e| format!("patch would produce invalid YAML: {e}"))?;

        Ok(MetadataPatch {
            added,
            unresolved,
            content: patched,
        })
    }
}

fn generate_value(field: &str, stem: &str, root: &Mapping) -> Option<String> {
    match field {
        "id" => Some(stem.to_string()),
        "name" => Some(title_case(stem)),
        "version" => Some(DEFAULT_VERSION.to_string()),
        "description" => Some(format!("{} configuration", title_case(stem))),
        "type" => infer_type(root).map(str::to_string),
        _ => None,
    }
}

/// File type suggested by the top-level keys
pub fn infer_type(root: &Mapping) -> Option<&'static str> {
    TYPE_HINTS
        .iter()
        .find(|(key, _)| root.contains_key(*key))
        .map(|(_, file_type)| *file_type)
}

/// `custody-auto-repair_rules` → `Custody Auto Repair Rules`
pub fn title_case(stem: &str) -> String {
    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_line(indent: &str, field: &str, value: &str, newline: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("{indent}{field}: \"{escaped}\"{newline}")
}

/// Insert fields right below an existing `metadata:` line
fn insert_into_block(content: &str, line_end: usize, fields: &[(String, String)], newline: &str) -> String {
    let rest = &content[line_end..];
    let indent = child_indent(rest);
    let head_end = if rest.starts_with("\r\n") {
        line_end + 2
    } else if rest.starts_with('\n') {
        line_end + 1
    } else {
        line_end
    };

    let mut patched = String::with_capacity(content.len() + fields.len() * 32);
    patched.push_str(&content[..head_end]);
    // metadata line was the last line, without a trailing newline
    if head_end == line_end {
        patched.push_str(newline);
    }
    for (field, value) in fields {
        patched.push_str(&render_line(&indent, field, value, newline));
    }
    patched.push_str(&content[head_end..]);
    patched
}

/// Indentation of the first child line of the block, two spaces when empty
fn child_indent(rest: &str) -> String {
    rest.lines()
        .skip(1)
        .find(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|line| {
            line.chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect::<String>()
        })
        .filter(|indent| !indent.is_empty())
        .unwrap_or_else(|| DEFAULT_INDENT.to_string())
}

/// Insert a new `metadata:` block after leading comments and document markers
fn insert_new_block(content: &str, fields: &[(String, String)], newline: &str) -> String {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        let trimmed = line.trim();
        let is_preamble = trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed == "---"
            || trimmed.starts_with('%');
        if !is_preamble {
            break;
        }
        offset += line.len();
    }

    let mut block = String::new();
    if offset > 0 && !content[..offset].ends_with('\n') {
        block.push_str(newline);
    }
    block.push_str("metadata:");
    block.push_str(newline);
    for (field, value) in fields {
        block.push_str(&render_line(DEFAULT_INDENT, field, value, newline));
    }

    let mut patched = String::with_capacity(content.len() + block.len());
    patched.push_str(&content[..offset]);
    patched.push_str(&block);
    patched.push_str(&content[offset..]);
    patched
}

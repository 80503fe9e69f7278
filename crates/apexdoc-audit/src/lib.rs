//! YAML Asset Auditing for APEX Rule Configurations
//!
//! This crate backs the `apexdoc` maintenance CLI. Every operation is a
//! single pass over local files:
//! - Keyword extraction from YAML files (structured parse with regex fallback)
//! - Keyword extraction from the Markdown YAML reference document
//! - Documentation gap analysis and heuristic categorization
//! - Demo module YAML usage analysis (Java class references, metadata quality)
//! - Metadata conformance validation
//! - Reorganization layout validation
//! - Dry-run capable file relocation and metadata patching
//!
//! # Example
//!
//! ```ignore
//! use apexdoc_audit::{AuditConfig, GapAnalysis, KeywordExtractor, ReferenceExtractor};
//!
//! let config = AuditConfig::new("apex-demo").with_exclude_pattern("target/");
//! let found = KeywordExtractor::new(config).extract(&["yaml", "yml"])?;
//! let documented = ReferenceExtractor::new().extract_file("docs/APEX_YAML_REFERENCE.md")?;
//! let gaps = GapAnalysis::compute(&found.keys, &documented.keys);
//! println!("{} keys undocumented", gaps.missing.len());
//! ```

pub mod config;
pub mod conformance;
pub mod demo;
pub mod keywords;
pub mod layout;
pub mod logging;
pub mod metadata_fix;
pub mod relocate;
pub mod reporter;
pub mod scan;
pub mod violation_trait;

use std::path::{Path, PathBuf};
use thiserror::Error;

pub use config::{
    CategoryConfig, ConformanceConfig, DemoConfig, FileConfig, GeneralConfig, LayoutConfig,
    LoggingConfig,
};
pub use conformance::{
    ConformanceReport, ConformanceValidator, ConformanceViolation, FileConformance,
};
pub use demo::{
    DemoAnalysisReport, DemoAnalyzer, DemoClassInfo, DocQuality, LoadingPattern, PatternCounts,
    YamlFileInfo,
};
pub use keywords::{
    Category, CategoryBucket, Classification, Extraction, FileExtraction, GapAnalysis,
    GapClassifier, GapReport, KeywordExtractor, KeywordSet, ParseOutcome, ReferenceExtractor,
    ReferenceKeys,
};
pub use layout::{LayoutReport, LayoutSection, LayoutValidator, LayoutViolation};
pub use metadata_fix::{FixOutcome, MetadataFixer, MetadataPatch};
pub use relocate::{
    RelocationEntry, RelocationMode, RelocationOutcome, RelocationPlan, RelocationResult, Relocator,
};
pub use reporter::Reporter;
pub use violation_trait::{Violation, ViolationCategory};

/// Result type for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Audit error types
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {file}: {message}")]
    Parse { file: PathBuf, message: String },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Required input not found: {}", .0.display())]
    MissingInput(PathBuf),
}

impl From<figment::Error> for AuditError {
    fn from(err: figment::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Severity level for violations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
            Self::Info => write!(f, "INFO"),
        }
    }
}

/// Scan configuration shared by every directory-walking operation
///
/// # Example
///
/// ```ignore
/// use apexdoc_audit::AuditConfig;
///
/// let config = AuditConfig::new("apex-demo/src/main/resources")
///     .with_exclude_pattern("target/")
///     .non_recursive();
/// ```
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Directory the scan starts from
    pub root: PathBuf,
    /// Substrings; any path containing one of them is skipped
    pub exclude_patterns: Vec<String>,
    /// Descend into subdirectories
    pub recursive: bool,
}

impl AuditConfig {
    /// Create a recursive scan configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude_patterns: Vec::new(),
            recursive: true,
        }
    }

    /// Add an exclude pattern (files/directories matching this will be skipped)
    pub fn with_exclude_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Add several exclude patterns at once
    pub fn with_exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Only look at the root's immediate children
    pub fn non_recursive(mut self) -> Self {
        self.recursive = false;
        self
    }

    /// Set recursion explicitly
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Check if a path should be excluded based on patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.exclude_patterns
            .iter()
            .any(|pattern| path_str.contains(pattern.as_str()))
    }

    /// True when the scan root exists and is a directory
    pub fn root_exists(&self) -> bool {
        self.root.is_dir()
    }
}

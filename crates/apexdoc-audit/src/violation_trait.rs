//! Violation Trait
//!
//! Common interface for the findings of the metadata and layout validators,
//! so reporters and exit-code logic can treat them uniformly.

use serde::Serialize;
use std::fmt::Display;
use std::path::PathBuf;

pub use super::Severity;

/// Category of violation for grouping in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationCategory {
    /// YAML `metadata` block conformance
    Metadata,
    /// Directory/file layout after reorganization
    Layout,
    /// Java sources still on the old resource paths
    Migration,
    /// Deprecation and documentation markers
    Documentation,
}

impl Display for ViolationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Metadata => write!(f, "Metadata"),
            Self::Layout => write!(f, "Layout"),
            Self::Migration => write!(f, "Migration"),
            Self::Documentation => write!(f, "Documentation"),
        }
    }
}

/// Generic violation trait - all violations implement this
pub trait Violation: Display {
    /// Unique violation ID (e.g., "META001", "LAY002")
    fn id(&self) -> &str;

    /// Category for grouping in reports
    fn category(&self) -> ViolationCategory;

    /// Severity level
    fn severity(&self) -> Severity;

    /// File the violation refers to (if applicable)
    fn file(&self) -> Option<&PathBuf>;

    /// Human-readable message describing the violation
    fn message(&self) -> String {
        self.to_string()
    }

    /// Suggested fix for the violation (if applicable)
    fn suggestion(&self) -> Option<String> {
        None
    }
}

/// Number of error-severity violations in a slice
pub fn error_count<V: Violation>(violations: &[V]) -> usize {
    violations
        .iter()
        .filter(|v| v.severity() == Severity::Error)
        .count()
}

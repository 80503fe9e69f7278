//! Reorganization Layout Validation
//!
//! Confirms that the demo resource reorganization is complete. Five
//! sections are checked independently, each yielding PASS/FAIL:
//! 1. Legacy directories and files are gone
//! 2. Expected directories and files exist
//! 3. Java sources reference the new layout directly
//! 4. The path resolver is deprecated
//! 5. Demo runners exist

use crate::config::LayoutConfig;
use crate::violation_trait::{Violation, ViolationCategory};
use crate::Severity;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const DEPRECATED_ANNOTATION: &str = "@Deprecated";

/// Layout violation types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LayoutViolation {
    /// Directory or file from the old layout still exists
    LegacyPathPresent { path: PathBuf, severity: Severity },
    /// Directory or file of the new layout is missing
    ExpectedPathMissing {
        path: PathBuf,
        is_dir: bool,
        severity: Severity,
    },
    /// Java source listed for migration does not exist
    JavaSourceMissing { path: PathBuf, severity: Severity },
    /// Source exists but could not be read
    UnreadableSource {
        path: PathBuf,
        message: String,
        severity: Severity,
    },
    /// Java source still imports the path resolver
    ResolverStillImported { path: PathBuf, severity: Severity },
    /// Java source still calls the path resolver
    ResolverStillUsed { path: PathBuf, severity: Severity },
    /// Java source never mentions the new layout
    NewPathsUnused {
        path: PathBuf,
        marker: String,
        severity: Severity,
    },
    /// Path resolver is not fully deprecated
    DeprecationIncomplete {
        path: PathBuf,
        reason: String,
        severity: Severity,
    },
    /// Demo runner source is missing
    RunnerMissing { path: PathBuf, severity: Severity },
}

impl std::fmt::Display for LayoutViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LegacyPathPresent { path, .. } => {
                write!(f, "Old path still exists: {}", path.display())
            }
            Self::ExpectedPathMissing { path, is_dir, .. } => {
                let kind = if *is_dir { "directory" } else { "file" };
                write!(f, "Expected {kind} missing: {}", path.display())
            }
            Self::JavaSourceMissing { path, .. } => {
                write!(f, "Java source not found: {}", path.display())
            }
            Self::UnreadableSource { path, message, .. } => {
                write!(f, "Error reading {}: {}", path.display(), message)
            }
            Self::ResolverStillImported { path, .. } => {
                write!(f, "Still imports the path resolver: {}", path.display())
            }
            Self::ResolverStillUsed { path, .. } => {
                write!(f, "Still resolves paths through the resolver: {}", path.display())
            }
            Self::NewPathsUnused { path, marker, .. } => {
                write!(f, "Doesn't use new paths ('{marker}'): {}", path.display())
            }
            Self::DeprecationIncomplete { path, reason, .. } => {
                write!(f, "Deprecation incomplete: {} - {}", path.display(), reason)
            }
            Self::RunnerMissing { path, .. } => {
                write!(f, "Demo runner missing: {}", path.display())
            }
        }
    }
}

impl Violation for LayoutViolation {
    fn id(&self) -> &str {
        match self {
            Self::LegacyPathPresent { .. } => "LAY001",
            Self::ExpectedPathMissing { .. } => "LAY002",
            Self::JavaSourceMissing { .. } => "LAY003",
            Self::UnreadableSource { .. } => "LAY004",
            Self::ResolverStillImported { .. } => "LAY005",
            Self::ResolverStillUsed { .. } => "LAY006",
            Self::NewPathsUnused { .. } => "LAY007",
            Self::DeprecationIncomplete { .. } => "LAY008",
            Self::RunnerMissing { .. } => "LAY009",
        }
    }

    fn category(&self) -> ViolationCategory {
        match self {
            Self::LegacyPathPresent { .. }
            | Self::ExpectedPathMissing { .. }
            | Self::RunnerMissing { .. } => ViolationCategory::Layout,
            Self::JavaSourceMissing { .. }
            | Self::UnreadableSource { .. }
            | Self::ResolverStillImported { .. }
            | Self::ResolverStillUsed { .. }
            | Self::NewPathsUnused { .. } => ViolationCategory::Migration,
            Self::DeprecationIncomplete { .. } => ViolationCategory::Documentation,
        }
    }

    fn severity(&self) -> Severity {
        match self {
            Self::LegacyPathPresent { severity, .. }
            | Self::ExpectedPathMissing { severity, .. }
            | Self::JavaSourceMissing { severity, .. }
            | Self::UnreadableSource { severity, .. }
            | Self::ResolverStillImported { severity, .. }
            | Self::ResolverStillUsed { severity, .. }
            | Self::NewPathsUnused { severity, .. }
            | Self::DeprecationIncomplete { severity, .. }
            | Self::RunnerMissing { severity, .. } => *severity,
        }
    }

    fn file(&self) -> Option<&PathBuf> {
        match self {
            Self::LegacyPathPresent { path, .. }
            | Self::ExpectedPathMissing { path, .. }
            | Self::JavaSourceMissing { path, .. }
            | Self::UnreadableSource { path, .. }
            | Self::ResolverStillImported { path, .. }
            | Self::ResolverStillUsed { path, .. }
            | Self::NewPathsUnused { path, .. }
            | Self::DeprecationIncomplete { path, .. }
            | Self::RunnerMissing { path, .. } => Some(path),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::LegacyPathPresent { .. } => {
                Some("Relocate remaining files, then remove the old path".to_string())
            }
            Self::ResolverStillImported { .. } | Self::ResolverStillUsed { .. } => {
                Some("Load resources from their new location directly".to_string())
            }
            Self::DeprecationIncomplete { .. } => Some(
                "Mark the class and its public methods @Deprecated and document the migration"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// Outcome of one validation section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutSection {
    pub name: String,
    /// Items inspected by this section
    pub checked: usize,
    /// Items that satisfied the expectation
    pub passed_count: usize,
    pub passed: bool,
}

impl LayoutSection {
    fn new(name: &str, checked: usize, passed_count: usize) -> Self {
        Self {
            name: name.to_string(),
            checked,
            passed_count,
            passed: passed_count == checked,
        }
    }
}

/// Result of a full layout validation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutReport {
    pub timestamp: String,
    pub project_root: PathBuf,
    pub sections: Vec<LayoutSection>,
    pub violations: Vec<LayoutViolation>,
}

impl LayoutReport {
    /// True only when every section passed
    pub fn passed(&self) -> bool {
        self.sections.iter().all(|s| s.passed)
    }

    pub fn section(&self, name: &str) -> Option<&LayoutSection> {
        self.sections.iter().find(|s| s.name == name)
    }
}

/// Validates a project tree against a `LayoutConfig`
pub struct LayoutValidator {
    project_root: PathBuf,
    config: LayoutConfig,
}

impl LayoutValidator {
    pub const LEGACY_REMOVED: &'static str = "Old structure removed";
    pub const NEW_STRUCTURE: &'static str = "New structure complete";
    pub const JAVA_UPDATED: &'static str = "Java classes updated";
    pub const RESOLVER_DEPRECATED: &'static str = "Path resolver deprecated";
    pub const RUNNERS_PRESENT: &'static str = "Demo runners available";

    pub fn new(project_root: impl Into<PathBuf>, config: LayoutConfig) -> Self {
        Self {
            project_root: project_root.into(),
            config,
        }
    }

    /// Run all sections
    pub fn validate(&self) -> LayoutReport {
        let mut violations = Vec::new();
        let sections = vec![
            self.check_legacy_removed(&mut violations),
            self.check_new_structure(&mut violations),
            self.check_java_sources(&mut violations),
            self.check_resolver_deprecated(&mut violations),
            self.check_runners(&mut violations),
        ];

        for section in &sections {
            info!(
                section = %section.name,
                passed = section.passed,
                "{}/{}",
                section.passed_count,
                section.checked
            );
        }

        LayoutReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            project_root: self.project_root.clone(),
            sections,
            violations,
        }
    }

    fn resources_root(&self) -> PathBuf {
        self.project_root.join(&self.config.resources_root)
    }

    fn check_legacy_removed(&self, violations: &mut Vec<LayoutViolation>) -> LayoutSection {
        let resources = self.resources_root();
        let mut removed = 0;
        for legacy in &self.config.legacy_paths {
            let path = resources.join(legacy);
            if path.exists() {
                violations.push(LayoutViolation::LegacyPathPresent {
                    path,
                    severity: Severity::Error,
                });
            } else {
                removed += 1;
            }
        }
        LayoutSection::new(Self::LEGACY_REMOVED, self.config.legacy_paths.len(), removed)
    }

    fn check_new_structure(&self, violations: &mut Vec<LayoutViolation>) -> LayoutSection {
        let resources = self.resources_root();
        let expected = self
            .config
            .expected_dirs
            .iter()
            .map(|d| (d, true))
            .chain(self.config.expected_files.iter().map(|f| (f, false)));

        let mut checked = 0;
        let mut present = 0;
        for (relative, is_dir) in expected {
            checked += 1;
            let path = resources.join(relative);
            if path.exists() {
                present += 1;
            } else {
                violations.push(LayoutViolation::ExpectedPathMissing {
                    path,
                    is_dir,
                    severity: Severity::Error,
                });
            }
        }
        LayoutSection::new(Self::NEW_STRUCTURE, checked, present)
    }

    fn check_java_sources(&self, violations: &mut Vec<LayoutViolation>) -> LayoutSection {
        let mut updated = 0;
        for relative in &self.config.java_sources {
            let path = self.project_root.join(relative);
            let Some(content) = self.read_source(&path, violations) else {
                continue;
            };

            let before = violations.len();
            if content.contains(&self.config.resolver_import) {
                violations.push(LayoutViolation::ResolverStillImported {
                    path: path.clone(),
                    severity: Severity::Error,
                });
            }
            if content.contains(&self.config.resolver_usage) {
                violations.push(LayoutViolation::ResolverStillUsed {
                    path: path.clone(),
                    severity: Severity::Error,
                });
            }
            if !content.contains(&self.config.new_path_marker) {
                violations.push(LayoutViolation::NewPathsUnused {
                    path: path.clone(),
                    marker: self.config.new_path_marker.clone(),
                    severity: Severity::Error,
                });
            }
            if violations.len() == before {
                debug!(file = %path.display(), "uses new paths directly");
                updated += 1;
            }
        }
        LayoutSection::new(Self::JAVA_UPDATED, self.config.java_sources.len(), updated)
    }

    fn check_resolver_deprecated(&self, violations: &mut Vec<LayoutViolation>) -> LayoutSection {
        let path = self.project_root.join(&self.config.resolver_source);
        let Some(content) = self.read_source(&path, violations) else {
            return LayoutSection::new(Self::RESOLVER_DEPRECATED, 1, 0);
        };

        let mut reasons = Vec::new();
        if !(content.contains(DEPRECATED_ANNOTATION)
            && content.contains(&self.config.resolver_class_declaration))
        {
            reasons.push("class not marked as @Deprecated".to_string());
        }
        let annotations = content.matches(DEPRECATED_ANNOTATION).count();
        if annotations < self.config.min_deprecated_annotations {
            reasons.push(format!(
                "methods not properly deprecated ({annotations} of {} annotations)",
                self.config.min_deprecated_annotations
            ));
        }
        if !self
            .config
            .deprecation_markers
            .iter()
            .all(|marker| content.contains(marker.as_str()))
        {
            reasons.push("deprecation documentation missing".to_string());
        }

        let deprecated = reasons.is_empty();
        violations.extend(reasons.into_iter().map(|reason| {
            LayoutViolation::DeprecationIncomplete {
                path: path.clone(),
                reason,
                severity: Severity::Error,
            }
        }));
        LayoutSection::new(Self::RESOLVER_DEPRECATED, 1, usize::from(deprecated))
    }

    fn check_runners(&self, violations: &mut Vec<LayoutViolation>) -> LayoutSection {
        let mut present = 0;
        for relative in &self.config.runners {
            let path = self.project_root.join(relative);
            if path.is_file() {
                present += 1;
            } else {
                violations.push(LayoutViolation::RunnerMissing {
                    path,
                    severity: Severity::Error,
                });
            }
        }
        LayoutSection::new(Self::RUNNERS_PRESENT, self.config.runners.len(), present)
    }

    fn read_source(&self, path: &Path, violations: &mut Vec<LayoutViolation>) -> Option<String> {
        if !path.is_file() {
            violations.push(LayoutViolation::JavaSourceMissing {
                path: path.to_path_buf(),
                severity: Severity::Error,
            });
            return None;
        }
        match std::fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) => {
                violations.push(LayoutViolation::UnreadableSource {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                    severity: Severity::Error,
                });
                None
            }
        }
    }
}

//! Metadata Conformance Validation
//!
//! Validates the `metadata` block of APEX YAML files:
//! - Required fields present as non-empty strings
//! - `type` drawn from the known file types
//! - Type-specific required fields
//! - Version format (warning only)

use crate::config::ConformanceConfig;
use crate::violation_trait::{Violation, ViolationCategory, error_count};
use crate::{AuditConfig, AuditError, Result, Severity, scan};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Metadata conformance violation types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConformanceViolation {
    /// File could not be parsed as YAML
    ParseFailure {
        file: PathBuf,
        message: String,
        severity: Severity,
    },
    /// No top-level `metadata` key
    MissingMetadataSection { file: PathBuf, severity: Severity },
    /// `metadata` is present but not a mapping
    MetadataNotMapping { file: PathBuf, severity: Severity },
    /// Required field absent or null
    MissingRequiredField {
        file: PathBuf,
        field: String,
        severity: Severity,
    },
    /// Required field present but not a non-empty string
    EmptyRequiredField {
        file: PathBuf,
        field: String,
        severity: Severity,
    },
    /// `type` is not one of the known file types
    InvalidFileType {
        file: PathBuf,
        file_type: String,
        valid_types: Vec<String>,
        severity: Severity,
    },
    /// Field required by this file type is absent
    MissingTypeField {
        file: PathBuf,
        file_type: String,
        field: String,
        severity: Severity,
    },
    /// Version does not look like semantic versioning
    NonSemanticVersion {
        file: PathBuf,
        version: String,
        severity: Severity,
    },
}

impl std::fmt::Display for ConformanceViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailure { file, message, .. } => {
                write!(f, "Failed to parse YAML file: {} - {}", file.display(), message)
            }
            Self::MissingMetadataSection { file, .. } => {
                write!(f, "Missing 'metadata' section: {}", file.display())
            }
            Self::MetadataNotMapping { file, .. } => {
                write!(
                    f,
                    "'metadata' section must be a map/object: {}",
                    file.display()
                )
            }
            Self::MissingRequiredField { file, field, .. } => {
                write!(
                    f,
                    "Missing required metadata field: {} - {}",
                    file.display(),
                    field
                )
            }
            Self::EmptyRequiredField { file, field, .. } => {
                write!(
                    f,
                    "Metadata field '{}' must be a non-empty string: {}",
                    field,
                    file.display()
                )
            }
            Self::InvalidFileType {
                file,
                file_type,
                valid_types,
                ..
            } => {
                write!(
                    f,
                    "Invalid file type: {} - '{}' (valid types: {})",
                    file.display(),
                    file_type,
                    valid_types.join(", ")
                )
            }
            Self::MissingTypeField {
                file,
                file_type,
                field,
                ..
            } => {
                write!(
                    f,
                    "Missing required field for type '{}': {} - {}",
                    file_type,
                    file.display(),
                    field
                )
            }
            Self::NonSemanticVersion { file, version, .. } => {
                write!(
                    f,
                    "Version should follow semantic versioning format (e.g., 1.0.0): {} - {}",
                    file.display(),
                    version
                )
            }
        }
    }
}

impl Violation for ConformanceViolation {
    fn id(&self) -> &str {
        match self {
            Self::ParseFailure { .. } => "META001",
            Self::MissingMetadataSection { .. } => "META002",
            Self::MetadataNotMapping { .. } => "META003",
            Self::MissingRequiredField { .. } => "META004",
            Self::EmptyRequiredField { .. } => "META005",
            Self::InvalidFileType { .. } => "META006",
            Self::MissingTypeField { .. } => "META007",
            Self::NonSemanticVersion { .. } => "META008",
        }
    }

    fn category(&self) -> ViolationCategory {
        ViolationCategory::Metadata
    }

    fn severity(&self) -> Severity {
        match self {
            Self::ParseFailure { severity, .. }
            | Self::MissingMetadataSection { severity, .. }
            | Self::MetadataNotMapping { severity, .. }
            | Self::MissingRequiredField { severity, .. }
            | Self::EmptyRequiredField { severity, .. }
            | Self::InvalidFileType { severity, .. }
            | Self::MissingTypeField { severity, .. }
            | Self::NonSemanticVersion { severity, .. } => *severity,
        }
    }

    fn file(&self) -> Option<&PathBuf> {
        match self {
            Self::ParseFailure { file, .. }
            | Self::MissingMetadataSection { file, .. }
            | Self::MetadataNotMapping { file, .. }
            | Self::MissingRequiredField { file, .. }
            | Self::EmptyRequiredField { file, .. }
            | Self::InvalidFileType { file, .. }
            | Self::MissingTypeField { file, .. }
            | Self::NonSemanticVersion { file, .. } => Some(file),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Self::ParseFailure { .. } => Some("Fix the YAML syntax error".to_string()),
            Self::MissingMetadataSection { .. } | Self::MissingRequiredField { .. } => {
                Some("Run `apexdoc fix-metadata` to add the missing fields".to_string())
            }
            Self::InvalidFileType { .. } => {
                Some("Use one of the listed file types for metadata.type".to_string())
            }
            Self::NonSemanticVersion { .. } => Some("Use a version such as 1.0.0".to_string()),
            _ => None,
        }
    }
}

/// Violations found in one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileConformance {
    pub file: PathBuf,
    pub violations: Vec<ConformanceViolation>,
}

impl FileConformance {
    pub fn is_valid(&self) -> bool {
        error_count(&self.violations) == 0
    }
}

/// Result of validating a set of files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub timestamp: String,
    /// Requested paths that did not exist
    pub missing_inputs: Vec<PathBuf>,
    pub files: Vec<FileConformance>,
}

impl ConformanceReport {
    pub fn files_checked(&self) -> usize {
        self.files.len()
    }

    pub fn valid_count(&self) -> usize {
        self.files.iter().filter(|f| f.is_valid()).count()
    }

    pub fn invalid_count(&self) -> usize {
        self.files_checked() - self.valid_count()
    }

    pub fn violations(&self) -> impl Iterator<Item = &ConformanceViolation> {
        self.files.iter().flat_map(|f| f.violations.iter())
    }

    pub fn error_count(&self) -> usize {
        self.violations()
            .filter(|v| v.severity() == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations()
            .filter(|v| v.severity() == Severity::Warning)
            .count()
    }

    /// Passed when every input existed and no error-level violation was found
    pub fn passed(&self) -> bool {
        self.missing_inputs.is_empty() && self.error_count() == 0
    }
}

/// Metadata conformance validator
pub struct ConformanceValidator {
    rules: ConformanceConfig,
    version_pattern: Regex,
}

impl ConformanceValidator {
    /// Create a validator for a rule set
    pub fn new(rules: ConformanceConfig) -> Result<Self> {
        let version_pattern = Regex::new(&rules.version_pattern).map_err(|e| {
            AuditError::Config(format!("invalid version pattern: {e}"))
        })?;
        Ok(Self {
            rules,
            version_pattern,
        })
    }

    /// Validator with the built-in rule set
    pub fn with_defaults() -> Result<Self> {
        Self::new(ConformanceConfig::default())
    }

    pub fn rules(&self) -> &ConformanceConfig {
        &self.rules
    }

    /// Validate every YAML file below the given paths (files are taken as-is)
    pub fn validate_paths(
        &self,
        paths: &[PathBuf],
        scan_template: &AuditConfig,
        extensions: &[&str],
    ) -> ConformanceReport {
        let mut report = ConformanceReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            missing_inputs: Vec::new(),
            files: Vec::new(),
        };

        for path in paths {
            if path.is_file() {
                report.files.push(self.validate_file(path));
            } else if path.is_dir() {
                let config = AuditConfig {
                    root: path.clone(),
                    ..scan_template.clone()
                };
                for file in scan::collect_files(&config, extensions) {
                    report.files.push(self.validate_file(&file));
                }
            } else {
                warn!(path = %path.display(), "validation input not found");
                report.missing_inputs.push(path.clone());
            }
        }

        info!(
            files = report.files_checked(),
            valid = report.valid_count(),
            invalid = report.invalid_count(),
            "metadata validation completed"
        );
        report
    }

    /// Validate one file
    pub fn validate_file(&self, path: &Path) -> FileConformance {
        debug!(file = %path.display(), "validating YAML file");
        let violations = match std::fs::read_to_string(path) {
            Ok(content) => self.validate_str(path, &content),
            Err(e) => vec![ConformanceViolation::ParseFailure {
                file: path.to_path_buf(),
                message: e.to_string(),
                severity: Severity::Error,
            }],
        };
        FileConformance {
            file: path.to_path_buf(),
            violations,
        }
    }

    /// Validate YAML text attributed to `file`
    pub fn validate_str(&self, file: &Path, content: &str) -> Vec<ConformanceViolation> {
        let file = file.to_path_buf();
        let document: Value = match serde_yaml::from_str(content) {
            Ok(value) => value,
            Err(e) => {
                return vec![ConformanceViolation::ParseFailure {
                    file,
                    message: e.to_string(),
                    severity: Severity::Error,
                }];
            }
        };

        match document.get("metadata") {
            None | Some(Value::Null) => vec![ConformanceViolation::MissingMetadataSection {
                file,
                severity: Severity::Error,
            }],
            Some(Value::Mapping(metadata)) => self.validate_metadata(&file, metadata),
            Some(_) => vec![ConformanceViolation::MetadataNotMapping {
                file,
                severity: Severity::Error,
            }],
        }
    }

    fn validate_metadata(&self, file: &Path, metadata: &Mapping) -> Vec<ConformanceViolation> {
        let mut violations = Vec::new();

        for field in &self.rules.required_fields {
            match metadata.get(field.as_str()) {
                None | Some(Value::Null) => {
                    violations.push(ConformanceViolation::MissingRequiredField {
                        file: file.to_path_buf(),
                        field: field.clone(),
                        severity: Severity::Error,
                    });
                }
                Some(Value::String(s)) if !s.trim().is_empty() => {}
                Some(_) => violations.push(ConformanceViolation::EmptyRequiredField {
                    file: file.to_path_buf(),
                    field: field.clone(),
                    severity: Severity::Error,
                }),
            }
        }

        if let Some(file_type) = metadata.get("type").and_then(Value::as_str) {
            if !self.rules.valid_types.iter().any(|t| t == file_type) {
                violations.push(ConformanceViolation::InvalidFileType {
                    file: file.to_path_buf(),
                    file_type: file_type.to_string(),
                    valid_types: self.rules.valid_types.clone(),
                    severity: Severity::Error,
                });
            }

            if let Some(fields) = self.rules.type_required_fields.get(file_type) {
                for field in fields {
                    if matches!(metadata.get(field.as_str()), None | Some(Value::Null)) {
                        violations.push(ConformanceViolation::MissingTypeField {
                            file: file.to_path_buf(),
                            file_type: file_type.to_string(),
                            field: field.clone(),
                            severity: Severity::Error,
                        });
                    }
                }
            }
        }

        if let Some(version) = metadata.get("version").and_then(Value::as_str) {
            if !self.version_pattern.is_match(version) {
                violations.push(ConformanceViolation::NonSemanticVersion {
                    file: file.to_path_buf(),
                    version: version.to_string(),
                    severity: Severity::Warning,
                });
            }
        }

        violations
    }
}

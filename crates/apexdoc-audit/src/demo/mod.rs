//! Demo Module YAML Usage Analysis
//!
//! Cross-references the Java demo classes of the demo module with the YAML
//! resources they load:
//! - which classes load which YAML files, and whether those files exist
//! - loading style and error handling per class
//! - documentation quality of every YAML resource
//! - an overall consistency score with recommendations

pub mod java;
pub mod yaml_files;

use crate::config::{DemoConfig, GeneralConfig};
use crate::{AuditConfig, AuditError, Result, scan};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How a demo class loads its YAML configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingPattern {
    /// `loadFromClasspath` through `YamlConfigurationLoader`
    StandardApexLoader,
    /// `loadFromClasspath` on some other loader
    CustomLoader,
    /// `loadConfiguration` helper
    ConfigurationMethod,
    Unknown,
}

impl LoadingPattern {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StandardApexLoader => "standard_apex_loader",
            Self::CustomLoader => "custom_loader",
            Self::ConfigurationMethod => "configuration_method",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for LoadingPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Documentation quality of a YAML resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl DocQuality {
    /// 6+ excellent, 4+ good, 2+ fair
    pub fn from_score(score: usize) -> Self {
        if score >= 6 {
            Self::Excellent
        } else if score >= 4 {
            Self::Good
        } else if score >= 2 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }

    /// Excellent or good
    pub fn is_acceptable(self) -> bool {
        self >= Self::Good
    }
}

impl std::fmt::Display for DocQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One Java demo class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoClassInfo {
    pub class_name: String,
    pub package: String,
    /// Relative to the APEX root
    pub file_path: String,
    /// Classpath references, relative to the resources root
    pub yaml_files: Vec<String>,
    /// Subset of `yaml_files` with no file behind it
    #[serde(default)]
    pub missing_yaml_files: Vec<String>,
    pub loading_pattern: LoadingPattern,
    pub error_handling: bool,
    pub documentation: String,
}

impl DemoClassInfo {
    /// Last package segment, used in table output
    pub fn short_package(&self) -> &str {
        self.package.rsplit('.').next().unwrap_or(&self.package)
    }
}

/// One YAML resource of the demo module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YamlFileInfo {
    /// Relative to the resources root
    pub path: String,
    pub exists: bool,
    pub size: u64,
    pub metadata: serde_json::Map<String, serde_json::Value>,
    pub documentation_quality: DocQuality,
    pub tags: Vec<String>,
}

/// Occurrence counts of class-level patterns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternCounts {
    pub standard_apex_loader: usize,
    pub custom_loader: usize,
    pub configuration_method: usize,
    pub unknown: usize,
    pub error_handling: usize,
    pub multiple_yaml_files: usize,
    pub single_yaml_file: usize,
    pub no_yaml_files: usize,
}

impl PatternCounts {
    pub fn from_classes(classes: &[DemoClassInfo]) -> Self {
        let mut counts = Self::default();
        for class in classes {
            match class.loading_pattern {
                LoadingPattern::StandardApexLoader => counts.standard_apex_loader += 1,
                LoadingPattern::CustomLoader => counts.custom_loader += 1,
                LoadingPattern::ConfigurationMethod => counts.configuration_method += 1,
                LoadingPattern::Unknown => counts.unknown += 1,
            }
            if class.error_handling {
                counts.error_handling += 1;
            }
            match class.yaml_files.len() {
                0 => counts.no_yaml_files += 1,
                1 => counts.single_yaml_file += 1,
                _ => counts.multiple_yaml_files += 1,
            }
        }
        counts
    }

    /// Counts in report order
    pub fn entries(&self) -> [(&'static str, usize); 8] {
        [
            ("standard_apex_loader", self.standard_apex_loader),
            ("custom_loader", self.custom_loader),
            ("configuration_method", self.configuration_method),
            ("unknown", self.unknown),
            ("error_handling", self.error_handling),
            ("multiple_yaml_files", self.multiple_yaml_files),
            ("single_yaml_file", self.single_yaml_file),
            ("no_yaml_files", self.no_yaml_files),
        ]
    }
}

/// Complete demo analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoAnalysisReport {
    pub timestamp: String,
    pub total_demo_classes: usize,
    pub total_yaml_files: usize,
    pub missing_yaml_files: usize,
    /// Percentage, 0 to 100
    pub consistency_score: f64,
    pub demo_classes: Vec<DemoClassInfo>,
    pub yaml_files: Vec<YamlFileInfo>,
    pub patterns: PatternCounts,
    pub recommendations: Vec<String>,
}

impl DemoAnalysisReport {
    /// Verdict used in the report conclusion
    pub fn consistency_label(&self) -> &'static str {
        if self.consistency_score >= 90.0 {
            "excellent"
        } else if self.consistency_score >= 70.0 {
            "good"
        } else {
            "fair"
        }
    }
}

/// Analyzer for the demo module below an APEX root
pub struct DemoAnalyzer {
    apex_root: PathBuf,
    demo_root: PathBuf,
    java_root: PathBuf,
    resources_root: PathBuf,
    excluded_class_paths: Vec<String>,
    exclude_patterns: Vec<String>,
}

impl DemoAnalyzer {
    pub fn new(apex_root: impl Into<PathBuf>, general: &GeneralConfig, demo: &DemoConfig) -> Self {
        let apex_root = apex_root.into();
        let demo_root = apex_root.join(&general.demo_dir);
        Self {
            java_root: demo_root.join(&demo.java_source_dir),
            resources_root: demo_root.join(&demo.resources_dir),
            demo_root,
            apex_root,
            excluded_class_paths: demo.excluded_class_paths.clone(),
            exclude_patterns: general.exclude_patterns.clone(),
        }
    }

    /// Analyzer with built-in layout settings
    pub fn with_defaults(apex_root: impl Into<PathBuf>) -> Self {
        Self::new(apex_root, &GeneralConfig::default(), &DemoConfig::default())
    }

    pub fn demo_root(&self) -> &Path {
        &self.demo_root
    }

    /// Run the analysis. Fails with `MissingInput` when the demo module is absent.
    pub fn analyze(&self) -> Result<DemoAnalysisReport> {
        if !self.demo_root.is_dir() {
            return Err(AuditError::MissingInput(self.demo_root.clone()));
        }

        let mut demo_classes = self.find_demo_classes();
        for class in &mut demo_classes {
            class.missing_yaml_files = class
                .yaml_files
                .iter()
                .filter(|path| !self.yaml_file_exists(path))
                .cloned()
                .collect();
        }
        info!(count = demo_classes.len(), "demo classes found");

        let yaml_files = self.inventory_yaml_files();
        info!(count = yaml_files.len(), "YAML files found");

        let missing_yaml_files = demo_classes
            .iter()
            .map(|c| c.missing_yaml_files.len())
            .sum();

        Ok(DemoAnalysisReport {
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_demo_classes: demo_classes.len(),
            total_yaml_files: yaml_files.len(),
            missing_yaml_files,
            consistency_score: consistency_score(&demo_classes, &yaml_files),
            patterns: PatternCounts::from_classes(&demo_classes),
            recommendations: recommendations(&demo_classes, &yaml_files),
            demo_classes,
            yaml_files,
        })
    }

    fn find_demo_classes(&self) -> Vec<DemoClassInfo> {
        let config = AuditConfig::new(&self.java_root)
            .with_exclude_patterns(self.exclude_patterns.iter().cloned());

        let mut classes: Vec<DemoClassInfo> = scan::collect_files(&config, &["java"])
            .into_iter()
            .filter(|path| self.is_demo_class(path))
            .filter_map(|path| {
                let content = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(file = %path.display(), error = %e, "error analyzing demo class");
                        return None;
                    }
                };
                let relative = scan::relative_display(&path, &self.apex_root);
                let info = java::analyze_source(&content, relative);
                if info.is_none() {
                    debug!(file = %path.display(), "no public class, skipped");
                }
                info
            })
            .collect();

        classes.sort_by(|a, b| a.class_name.cmp(&b.class_name));
        classes
    }

    /// Tests, models and infrastructure are not demo classes
    fn is_demo_class(&self, path: &Path) -> bool {
        let relative = format!("/{}", scan::relative_display(path, &self.apex_root));
        !self
            .excluded_class_paths
            .iter()
            .any(|pattern| relative.contains(pattern.as_str()))
    }

    fn inventory_yaml_files(&self) -> Vec<YamlFileInfo> {
        let config = AuditConfig::new(&self.resources_root)
            .with_exclude_patterns(self.exclude_patterns.iter().cloned());

        let mut files: Vec<YamlFileInfo> = scan::collect_files(&config, &["yaml"])
            .into_iter()
            .filter_map(|path| {
                let content = match std::fs::read_to_string(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(file = %path.display(), error = %e, "error analyzing YAML file");
                        return None;
                    }
                };
                let size = std::fs::metadata(&path).map_or(0, |m| m.len());
                let relative = scan::relative_display(&path, &self.resources_root);
                Some(yaml_files::inspect(relative, size, &content))
            })
            .collect();

        files.sort_by(|a, b| a.path.cmp(&b.path));
        files
    }

    fn yaml_file_exists(&self, relative: &str) -> bool {
        self.resources_root.join(relative).exists()
    }
}

/// Per class 4 points, per YAML file 2 points; percentage of points earned
pub fn consistency_score(classes: &[DemoClassInfo], files: &[YamlFileInfo]) -> f64 {
    let mut total = 0usize;
    let mut max = 0usize;

    for class in classes {
        max += 4;
        total += usize::from(class.loading_pattern == LoadingPattern::StandardApexLoader);
        total += usize::from(class.error_handling);
        total += usize::from(!class.yaml_files.is_empty());
        total += usize::from(class.missing_yaml_files.is_empty());
    }

    for file in files {
        max += 2;
        total += usize::from(file.documentation_quality.is_acceptable());
        total += usize::from(!file.metadata.is_empty());
    }

    if max == 0 {
        0.0
    } else {
        #[allow(clippy::cast_precision_loss)]
        let score = total as f64 / max as f64 * 100.0;
        score
    }
}

/// Improvement suggestions, most urgent first
pub fn recommendations(classes: &[DemoClassInfo], files: &[YamlFileInfo]) -> Vec<String> {
    let mut recommendations = Vec::new();

    let missing: Vec<String> = classes
        .iter()
        .flat_map(|c| {
            c.missing_yaml_files
                .iter()
                .map(move |path| format!("{} -> {}", c.class_name, path))
        })
        .collect();
    if !missing.is_empty() {
        recommendations.push(format!("Create missing YAML files: {}", missing.join(", ")));
    }

    let non_standard: Vec<&str> = classes
        .iter()
        .filter(|c| c.loading_pattern != LoadingPattern::StandardApexLoader)
        .map(|c| c.class_name.as_str())
        .collect();
    if !non_standard.is_empty() {
        recommendations.push(format!(
            "Standardize loading patterns in: {}",
            non_standard.join(", ")
        ));
    }

    let poorly_documented: Vec<&str> = files
        .iter()
        .filter(|f| f.documentation_quality == DocQuality::Poor)
        .map(|f| f.path.as_str())
        .collect();
    if !poorly_documented.is_empty() {
        recommendations.push(format!(
            "Improve documentation in: {}",
            poorly_documented.join(", ")
        ));
    }

    let no_error_handling: Vec<&str> = classes
        .iter()
        .filter(|c| !c.error_handling && !c.yaml_files.is_empty())
        .map(|c| c.class_name.as_str())
        .collect();
    if !no_error_handling.is_empty() {
        recommendations.push(format!(
            "Add error handling to: {}",
            no_error_handling.join(", ")
        ));
    }

    recommendations
}

//! File-based configuration
//!
//! Sources are merged in this order (later sources override earlier):
//! 1. Built-in defaults from `FileConfig::default()`
//! 2. TOML configuration file (explicit path, or `.apexdoc.toml` if present)
//! 3. Environment variables prefixed `APEXDOC_`, `__` separating nested keys
//!    (e.g. `APEXDOC_GENERAL__DEMO_DIR=apex-demo`)

use crate::keywords::{Category, GapClassifier, classifier::default_categories};
use crate::{AuditConfig, AuditError, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILENAME: &str = ".apexdoc.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "APEXDOC_";

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub categories: Vec<CategoryConfig>,
    pub demo: DemoConfig,
    pub conformance: ConformanceConfig,
    pub layout: LayoutConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            logging: LoggingConfig::default(),
            categories: default_category_configs(),
            demo: DemoConfig::default(),
            conformance: ConformanceConfig::default(),
            layout: LayoutConfig::default(),
        }
    }
}

impl FileConfig {
    /// Load configuration from defaults, file and environment.
    ///
    /// An explicitly requested file must exist; the default file is optional.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        match config_path {
            Some(path) if path.is_file() => {
                info!(path = %path.display(), "configuration loaded");
                figment = figment.merge(Toml::file(path));
            }
            Some(path) => return Err(AuditError::MissingInput(path.to_path_buf())),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILENAME);
                if default_path.is_file() {
                    info!(path = %default_path.display(), "configuration loaded");
                    figment = figment.merge(Toml::file(default_path));
                } else {
                    debug!("no configuration file, using defaults");
                }
            }
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string layered over the defaults
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Toml::string(toml))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AuditError::Config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.general.yaml_extensions.is_empty() {
            return Err(AuditError::Config(
                "general.yaml_extensions cannot be empty".to_string(),
            ));
        }
        if let Some(category) = self.categories.iter().find(|c| c.name.trim().is_empty()) {
            return Err(AuditError::Config(format!(
                "category with patterns {:?} has an empty name",
                category.patterns
            )));
        }
        if let Err(e) = regex::Regex::new(&self.conformance.version_pattern) {
            return Err(AuditError::Config(format!(
                "conformance.version_pattern is not a valid regex: {e}"
            )));
        }
        Ok(())
    }

    /// Category table; an empty list in the file means the built-in table
    pub fn classifier(&self) -> GapClassifier {
        if self.categories.is_empty() {
            GapClassifier::default()
        } else {
            GapClassifier::new(self.categories.iter().cloned().map(Category::from).collect())
        }
    }

    /// Scan configuration for `root` carrying the global exclude patterns
    pub fn scan_config(&self, root: impl Into<PathBuf>) -> AuditConfig {
        AuditConfig::new(root).with_exclude_patterns(self.general.exclude_patterns.iter().cloned())
    }

    /// YAML extensions as string slices
    pub fn yaml_extensions(&self) -> Vec<&str> {
        self.general
            .yaml_extensions
            .iter()
            .map(String::as_str)
            .collect()
    }
}

/// General paths and scan settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Demo module scanned for keywords and demo analysis
    pub demo_dir: PathBuf,
    /// Markdown YAML reference document
    pub reference_doc: PathBuf,
    /// Extensions treated as YAML
    pub yaml_extensions: Vec<String>,
    /// Path substrings skipped during scans
    pub exclude_patterns: Vec<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            demo_dir: PathBuf::from("apex-demo"),
            reference_doc: PathBuf::from("docs/APEX_YAML_REFERENCE.md"),
            yaml_extensions: vec!["yaml".to_string(), "yml".to_string()],
            exclude_patterns: vec!["/target/".to_string(), "/.git/".to_string()],
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `APEXDOC_LOG` is unset
    pub level: String,
    /// Emit JSON log lines
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Category entry as written in the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl From<CategoryConfig> for Category {
    fn from(config: CategoryConfig) -> Self {
        Category::new(config.name, config.patterns)
    }
}

impl From<Category> for CategoryConfig {
    fn from(category: Category) -> Self {
        Self {
            name: category.name,
            patterns: category.patterns,
        }
    }
}

/// Built-in categories in config-file form
pub(crate) fn default_category_configs() -> Vec<CategoryConfig> {
    default_categories().into_iter().map(Into::into).collect()
}

/// Demo module layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Java sources of demo classes, relative to the demo module
    pub java_source_dir: PathBuf,
    /// YAML resources, relative to the demo module
    pub resources_dir: PathBuf,
    /// Path substrings that mark a Java file as not being a demo class
    pub excluded_class_paths: Vec<String>,
    /// Default Markdown report path
    pub default_output: PathBuf,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            java_source_dir: PathBuf::from("src/main/java/dev/mars/apex/demo"),
            resources_dir: PathBuf::from("src/main/resources"),
            excluded_class_paths: [
                "Test.java",
                "test/",
                "/model/",
                "/util/TestUtilities.java",
                "/infrastructure/",
                "/runners/",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            default_output: PathBuf::from("demo_yaml_analysis.md"),
        }
    }
}

/// Metadata conformance rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConformanceConfig {
    /// Directory validated when no paths are given
    pub default_root: PathBuf,
    /// Fields every `metadata` block must carry as non-empty strings
    pub required_fields: Vec<String>,
    /// Accepted values of `metadata.type`
    pub valid_types: Vec<String>,
    /// Versions not matching this are reported as warnings
    pub version_pattern: String,
    /// Additional required fields per file type
    pub type_required_fields: BTreeMap<String, Vec<String>>,
}

impl Default for ConformanceConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();

        let mut type_required_fields = BTreeMap::new();
        type_required_fields.insert("scenario".to_string(), strings(&["business-domain", "owner"]));
        type_required_fields.insert("scenario-registry".to_string(), strings(&["created-by"]));
        type_required_fields.insert(
            "bootstrap".to_string(),
            strings(&["business-domain", "created-by"]),
        );
        for file_type in [
            "rule-config",
            "enrichment",
            "rule-chain",
            "external-data-config",
            "pipeline",
        ] {
            type_required_fields.insert(file_type.to_string(), strings(&["author"]));
        }
        type_required_fields.insert("dataset".to_string(), strings(&["source"]));

        Self {
            default_root: PathBuf::from("apex-demo/src/main/resources"),
            required_fields: strings(&["id", "name", "version", "description", "type"]),
            valid_types: strings(&[
                "scenario",
                "scenario-registry",
                "bootstrap",
                "rule-config",
                "dataset",
                "enrichment",
                "rule-chain",
                "external-data-config",
                "pipeline",
            ]),
            version_pattern: r"^\d+\.\d+(\.\d+)?$".to_string(),
            type_required_fields,
        }
    }
}

/// Expected state after the demo resource reorganization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Resource root, relative to the project root
    pub resources_root: PathBuf,
    /// Directories/files (relative to `resources_root`) that must be gone
    pub legacy_paths: Vec<String>,
    /// Directories (relative to `resources_root`) that must exist
    pub expected_dirs: Vec<String>,
    /// Files (relative to `resources_root`) that must exist
    pub expected_files: Vec<String>,
    /// Java sources (relative to the project root) that must use new paths directly
    pub java_sources: Vec<String>,
    /// Import line that must no longer appear
    pub resolver_import: String,
    /// Call that must no longer appear
    pub resolver_usage: String,
    /// Substring proving a source references the new layout
    pub new_path_marker: String,
    /// Path resolver source (relative to the project root) that must be deprecated
    pub resolver_source: String,
    /// Class declaration that must carry `@Deprecated`
    pub resolver_class_declaration: String,
    /// Minimum `@Deprecated` annotations (class plus methods)
    pub min_deprecated_annotations: usize,
    /// Markers the deprecation docs must contain
    pub deprecation_markers: Vec<String>,
    /// Demo runner sources (relative to the project root) that must exist
    pub runners: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect::<Vec<_>>();
        let java = "apex-demo/src/main/java/dev/mars/apex/demo";

        Self {
            resources_root: PathBuf::from("apex-demo/src/main/resources"),
            legacy_paths: strings(&[
                "bootstrap",
                "config",
                "demo-configs",
                "demo-rules",
                "examples",
                "financial-settlement",
                "scenarios",
                "yaml-examples",
                "batch-processing.yaml",
                "file-processing-rules.yaml",
            ]),
            expected_dirs: strings(&[
                "demos/quickstart",
                "demos/fundamentals/rules",
                "demos/fundamentals/enrichments",
                "demos/fundamentals/datasets",
                "demos/patterns/lookups",
                "demos/industry/financial-services/settlement",
                "demos/industry/financial-services/custody",
                "demos/bootstrap/custody-auto-repair",
                "demos/bootstrap/otc-options",
                "demos/bootstrap/commodity-swap",
                "demos/advanced/complex-scenarios",
                "demos/advanced/performance",
                "reference/syntax-examples",
            ]),
            expected_files: strings(&[
                "demos/quickstart/quick-start.yaml",
                "demos/fundamentals/rules/financial-validation-rules.yaml",
                "demos/patterns/lookups/simple-field-lookup.yaml",
                "demos/patterns/lookups/conditional-expression-lookup.yaml",
                "demos/patterns/lookups/nested-field-lookup.yaml",
                "demos/patterns/lookups/compound-key-lookup.yaml",
                "demos/patterns/lookups/comprehensive-lookup-demo.yaml",
                "demos/industry/financial-services/settlement/comprehensive-settlement-enrichment.yaml",
                "demos/industry/financial-services/custody/custody-auto-repair-rules.yaml",
                "demos/bootstrap/custody-auto-repair/bootstrap-config.yaml",
                "reference/syntax-examples/file-processing-config.yaml",
            ]),
            java_sources: vec![
                format!("{java}/examples/lookups/SimpleFieldLookupDemo.java"),
                format!("{java}/examples/lookups/ConditionalExpressionLookupDemo.java"),
                format!("{java}/examples/lookups/NestedFieldLookupDemo.java"),
                format!("{java}/examples/lookups/CompoundKeyLookupDemo.java"),
                format!("{java}/QuickStartDemo.java"),
            ],
            resolver_import: "import dev.mars.apex.demo.support.util.ResourcePathResolver"
                .to_string(),
            resolver_usage: "ResourcePathResolver.resolvePath".to_string(),
            new_path_marker: "demos/".to_string(),
            resolver_source: format!("{java}/support/util/ResourcePathResolver.java"),
            resolver_class_declaration: "class ResourcePathResolver".to_string(),
            min_deprecated_annotations: 4,
            deprecation_markers: strings(&["DEPRECATED", "Phase 4"]),
            runners: vec![
                format!("{java}/runners/AllDemosRunner.java"),
                format!("{java}/runners/quickstart/QuickStartRunner.java"),
                format!("{java}/runners/patterns/PatternsRunner.java"),
            ],
        }
    }
}

//! Java demo class scanning
//!
//! Text-level inspection only: class name, package, classpath YAML
//! references, loading style, error handling and class documentation.

use super::{DemoClassInfo, LoadingPattern};
use once_cell::sync::Lazy;
use regex::Regex;

static CLASS_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"public class (\w+)").expect("Invalid regex"));

static PACKAGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"package\s+([\w.]+);").expect("Invalid regex"));

static CLASSPATH_LOAD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"loadFromClasspath\s*\(\s*["']([^"']+)["']"#).expect("Invalid regex")
});

static JAVADOC_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*\*\s*(.*?)\s*\*/").expect("Invalid regex"));

static JAVADOC_GUTTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*\*\s*").expect("Invalid regex"));

const DOC_LIMIT: usize = 200;
pub(crate) const NO_DOCUMENTATION: &str = "No documentation found";

/// Inspect one Java source. Sources without a `public class` are not demo classes.
pub fn analyze_source(content: &str, file_path: String) -> Option<DemoClassInfo> {
    let class_name = CLASS_NAME_PATTERN.captures(content)?.get(1)?.as_str().to_string();
    let package = PACKAGE_PATTERN
        .captures(content)
        .and_then(|c| c.get(1))
        .map_or_else(|| "unknown".to_string(), |m| m.as_str().to_string());

    Some(DemoClassInfo {
        class_name,
        package,
        file_path,
        yaml_files: yaml_references(content),
        missing_yaml_files: Vec::new(),
        loading_pattern: loading_pattern(content),
        error_handling: has_error_handling(content),
        documentation: class_documentation(content),
    })
}

/// Classpath YAML references in first-seen order, `.yaml` appended when absent
pub fn yaml_references(content: &str) -> Vec<String> {
    let mut references: Vec<String> = Vec::new();
    for caps in CLASSPATH_LOAD_PATTERN.captures_iter(content) {
        let mut path = caps[1].to_string();
        if !path.ends_with(".yaml") {
            path.push_str(".yaml");
        }
        if !references.contains(&path) {
            references.push(path);
        }
    }
    references
}

pub fn loading_pattern(content: &str) -> LoadingPattern {
    if content.contains("loadFromClasspath") {
        if content.contains("YamlConfigurationLoader") {
            LoadingPattern::StandardApexLoader
        } else {
            LoadingPattern::CustomLoader
        }
    } else if content.contains("loadConfiguration") {
        LoadingPattern::ConfigurationMethod
    } else {
        LoadingPattern::Unknown
    }
}

pub fn has_error_handling(content: &str) -> bool {
    content.contains("try") && content.contains("catch") && content.contains("RuntimeException")
}

/// Last `/** */` block, gutters collapsed, truncated for tables
pub fn class_documentation(content: &str) -> String {
    let Some(doc) = JAVADOC_PATTERN
        .captures_iter(content)
        .last()
        .and_then(|c| c.get(1))
    else {
        return NO_DOCUMENTATION.to_string();
    };

    let collapsed = JAVADOC_GUTTER_PATTERN.replace_all(doc.as_str(), " ");
    let cleaned = collapsed.trim();
    if cleaned.chars().count() > DOC_LIMIT {
        let truncated: String = cleaned.chars().take(DOC_LIMIT).collect();
        format!("{truncated}...")
    } else {
        cleaned.to_string()
    }
}

//! Tests for layered configuration and logging setup helpers

use crate::test_utils::create_file_at_path;
use apexdoc_audit::logging::parse_log_level;
use apexdoc_audit::{AuditError, FileConfig};
use std::path::PathBuf;
use tempfile::TempDir;
use tracing::Level;

#[test]
fn test_defaults() {
    let config = FileConfig::default();

    assert_eq!(config.general.demo_dir, PathBuf::from("apex-demo"));
    assert_eq!(config.yaml_extensions(), vec!["yaml", "yml"]);
    assert_eq!(config.logging.level, "info");
    assert!(!config.categories.is_empty());
    assert_eq!(config.conformance.required_fields.len(), 5);
    assert_eq!(config.layout.min_deprecated_annotations, 4);
}

#[test]
fn test_toml_overrides_only_named_fields() {
    let config = FileConfig::from_toml_str(
        r#"
[general]
demo_dir = "modules/demo"

[conformance]
required_fields = ["id", "type"]
"#,
    )
    .unwrap();

    assert_eq!(config.general.demo_dir, PathBuf::from("modules/demo"));
    assert_eq!(config.general.reference_doc, FileConfig::default().general.reference_doc);
    assert_eq!(config.conformance.required_fields, vec!["id", "type"]);
    assert_eq!(config.conformance.valid_types, FileConfig::default().conformance.valid_types);
}

#[test]
fn test_custom_categories_drive_the_classifier() {
    let config = FileConfig::from_toml_str(
        r#"
[[categories]]
name = "Money"
patterns = ["amount", "currency"]
"#,
    )
    .unwrap();

    let classifier = config.classifier();
    assert_eq!(classifier.classify("trade-amount"), "Money");
    assert_eq!(classifier.classify("cache"), "Other");
}

#[test]
fn test_invalid_version_pattern_is_rejected() {
    let result = FileConfig::from_toml_str("[conformance]\nversion_pattern = \"([\"\n");
    assert!(matches!(result, Err(AuditError::Config(msg)) if msg.contains("version_pattern")));
}

#[test]
fn test_empty_extension_list_is_rejected() {
    let result = FileConfig::from_toml_str("[general]\nyaml_extensions = []\n");
    assert!(matches!(result, Err(AuditError::Config(_))));
}

#[test]
fn test_unnamed_category_is_rejected() {
    let result = FileConfig::from_toml_str("[[categories]]\nname = \" \"\npatterns = [\"x\"]\n");
    assert!(matches!(result, Err(AuditError::Config(_))));
}

#[test]
fn test_explicit_config_file_must_exist() {
    let temp = TempDir::new().unwrap();
    let result = FileConfig::load(Some(&temp.path().join("missing.toml")));
    assert!(matches!(result, Err(AuditError::MissingInput(_))));
}

#[test]
fn test_load_explicit_file() {
    let temp = TempDir::new().unwrap();
    let path = create_file_at_path(&temp, "apexdoc.toml", "[logging]\nlevel = \"debug\"\n");

    let config = FileConfig::load(Some(&path)).unwrap();

    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_rendered_toml_round_trips() {
    let config = FileConfig::default();
    let rendered = config.to_toml().unwrap();

    assert_eq!(FileConfig::from_toml_str(&rendered).unwrap(), config);
}

#[test]
fn test_scan_config_carries_excludes() {
    let config = FileConfig::default();
    let scan = config.scan_config("resources");

    assert_eq!(scan.root, PathBuf::from("resources"));
    assert!(scan.should_exclude(std::path::Path::new("/app/target/x.yaml")));
}

#[test]
fn test_parse_log_level() {
    assert_eq!(parse_log_level("INFO").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert!(parse_log_level("loud").is_err());
}

//! Tests for the metadata auto-fixer

use crate::test_utils::{create_file_at_path, valid_metadata_yaml};
use apexdoc_audit::metadata_fix::{infer_type, title_case};
use apexdoc_audit::{
    AuditConfig, ConformanceConfig, ConformanceValidator, FixOutcome, MetadataFixer, Violation,
};
use serde_yaml::Mapping;
use std::fs;
use tempfile::TempDir;

fn fixer() -> MetadataFixer {
    MetadataFixer::new(&ConformanceConfig::default())
}

#[test]
fn test_fields_inserted_below_existing_block_with_its_indent() {
    let content = "# Header\nmetadata:\n    id: \"x\"\n    name: \"X\"\nrules: []\n";

    let patch = fixer().patch_str("my-rules", content).unwrap();

    assert_eq!(patch.added, vec!["version", "description", "type"]);
    assert!(patch.unresolved.is_empty());
    assert_eq!(
        patch.content,
        "# Header\nmetadata:\n    version: \"1.0.0\"\n    description: \"My Rules configuration\"\n    type: \"rule-config\"\n    id: \"x\"\n    name: \"X\"\nrules: []\n"
    );
}

#[test]
fn test_new_block_goes_after_leading_comments() {
    let content = "# Lookup enrichment\n---\nenrichments: []\n";

    let patch = fixer().patch_str("lookup_enrich", content).unwrap();

    assert_eq!(patch.added.len(), 5);
    assert_eq!(
        patch.content,
        "# Lookup enrichment\n---\nmetadata:\n  id: \"lookup_enrich\"\n  name: \"Lookup Enrich\"\n  version: \"1.0.0\"\n  description: \"Lookup Enrich configuration\"\n  type: \"enrichment\"\nenrichments: []\n"
    );
}

#[test]
fn test_empty_metadata_key_gets_default_indent() {
    let patch = fixer().patch_str("a", "metadata:\nrules: []\n").unwrap();

    assert!(patch.content.starts_with("metadata:\n  id: \"a\"\n"));
    assert!(patch.content.ends_with("rules: []\n"));
}

#[test]
fn test_metadata_as_last_line_without_newline() {
    let patch = fixer().patch_str("a", "rules: []\nmetadata:").unwrap();
    assert!(patch.content.starts_with("rules: []\nmetadata:\n  id: \"a\"\n"));
}

#[test]
fn test_uninferable_type_is_unresolved() {
    let patch = fixer().patch_str("misc", "other: 1\n").unwrap();

    assert_eq!(patch.added, vec!["id", "name", "version", "description"]);
    assert_eq!(patch.unresolved, vec!["type"]);
}

#[test]
fn test_patched_file_passes_required_field_checks() {
    let patch = fixer()
        .patch_str("quick-start", "# Demo\nrules:\n  - id: r1\n")
        .unwrap();

    let violations = ConformanceValidator::with_defaults()
        .unwrap()
        .validate_str(std::path::Path::new("quick-start.yaml"), &patch.content);
    // Only the type-specific `author` is left for a human
    let ids: Vec<&str> = violations.iter().map(Violation::id).collect();
    assert_eq!(ids, vec!["META007"], "{violations:?}");
}

#[test]
fn test_not_patchable_documents() {
    let fixer = fixer();

    assert_eq!(
        fixer.patch_str("a", "- a\n- b\n").unwrap_err(),
        "document is not a mapping"
    );
    assert_eq!(
        fixer.patch_str("a", "metadata: text\n").unwrap_err(),
        "metadata is not a mapping"
    );
    assert_eq!(
        fixer.patch_str("a", "metadata: {id: a}\n").unwrap_err(),
        "metadata is not a block mapping"
    );
    assert!(fixer.patch_str("a", "key: [\n").is_err());
}

#[test]
fn test_complete_file_is_unchanged() {
    let temp = TempDir::new().unwrap();
    let content = valid_metadata_yaml("rule-config", "");
    let path = create_file_at_path(&temp, "done.yaml", &content);

    let outcome = fixer().fix_file(&path).unwrap();

    assert_eq!(outcome, FixOutcome::Unchanged { unresolved: Vec::new() });
    assert_eq!(fs::read_to_string(&path).unwrap(), content);
}

#[test]
fn test_dry_run_does_not_write() {
    let temp = TempDir::new().unwrap();
    let path = create_file_at_path(&temp, "todo.yaml", "rules: []\n");

    let outcome = fixer().dry_run(true).fix_file(&path).unwrap();

    assert!(matches!(outcome, FixOutcome::WouldPatch { ref added, .. } if added.len() == 5));
    assert_eq!(fs::read_to_string(&path).unwrap(), "rules: []\n");
}

#[test]
fn test_fix_file_writes_patch() {
    let temp = TempDir::new().unwrap();
    let path = create_file_at_path(&temp, "data-set.yaml", "data:\n  - a\n");

    let outcome = fixer().fix_file(&path).unwrap();

    assert!(matches!(outcome, FixOutcome::Patched { .. }));
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("  type: \"dataset\"\n"));
    assert!(written.contains("  name: \"Data Set\"\n"));
}

#[test]
fn test_fix_tree_reports_every_file() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "a.yaml", &valid_metadata_yaml("dataset", "  source: \"feed\""));
    create_file_at_path(&temp, "nested/b.yaml", "rules: []\n");
    create_file_at_path(&temp, "nested/c.yaml", "- list\n");

    let results = fixer().fix_tree(&AuditConfig::new(temp.path()), &["yaml"]);

    assert_eq!(results.len(), 3);
    let by_name = |name: &str| {
        results
            .iter()
            .find(|(p, _)| p.ends_with(name))
            .map(|(_, o)| o.clone())
            .unwrap()
    };
    assert!(matches!(by_name("a.yaml"), FixOutcome::Unchanged { .. }));
    assert!(matches!(by_name("b.yaml"), FixOutcome::Patched { .. }));
    assert!(matches!(by_name("c.yaml"), FixOutcome::Unparseable { .. }));
}

#[test]
fn test_type_inference_priority() {
    let mut root = Mapping::new();
    root.insert("rules".into(), serde_yaml::Value::Null);
    root.insert("enrichments".into(), serde_yaml::Value::Null);
    assert_eq!(infer_type(&root), Some("enrichment"));

    let mut root = Mapping::new();
    root.insert("rule-chains".into(), serde_yaml::Value::Null);
    assert_eq!(infer_type(&root), Some("rule-chain"));

    assert_eq!(infer_type(&Mapping::new()), None);
}

#[test]
fn test_title_case() {
    assert_eq!(title_case("custody-auto-repair_rules"), "Custody Auto Repair Rules");
    assert_eq!(title_case("simple"), "Simple");
    assert_eq!(title_case("--double--dash"), "Double Dash");
}

#[test]
fn test_outcome_display() {
    let outcome = FixOutcome::WouldPatch {
        added: vec!["id".to_string(), "name".to_string()],
        unresolved: vec!["type".to_string()],
    };
    assert_eq!(outcome.to_string(), "would add: id, name (unresolved: type)");
}

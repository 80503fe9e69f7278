//! Tests for YAML keyword extraction

use crate::test_utils::create_file_at_path;
use apexdoc_audit::keywords::extractor::extract_from_str;
use apexdoc_audit::{AuditConfig, KeywordExtractor, KeywordSet, ParseOutcome};
use tempfile::TempDir;

fn set(keys: &[&str]) -> KeywordSet {
    keys.iter().map(|k| (*k).to_string()).collect()
}

#[test]
fn test_nested_keys_at_any_depth() {
    let outcome = extract_from_str(
        r"
metadata:
  name: demo
  tags: [a, b]
enrichments:
  - id: lookup
    lookup-config:
      cache-ttl-seconds: 300
      field-mappings:
        - source-field: code
          target-field: name
",
    );

    assert!(outcome.is_structured());
    assert_eq!(
        outcome.keys(),
        &set(&[
            "metadata",
            "name",
            "tags",
            "enrichments",
            "id",
            "lookup-config",
            "cache-ttl-seconds",
            "field-mappings",
            "source-field",
            "target-field",
        ])
    );
}

#[test]
fn test_extraction_is_idempotent() {
    let content = "rules:\n  - id: r1\n    condition: '#x > 1'\n";
    assert_eq!(extract_from_str(content), extract_from_str(content));
}

#[test]
fn test_malformed_yaml_falls_back_to_line_scan() {
    let outcome = extract_from_str("metadata:\n  name: [unclosed\n  version: 1.0\n");

    match &outcome {
        ParseOutcome::HeuristicFallback { keys, reason } => {
            assert!(keys.contains("metadata"));
            assert!(keys.contains("name"));
            assert!(keys.contains("version"));
            assert!(!reason.is_empty());
        }
        other => panic!("expected heuristic fallback, got {other:?}"),
    }
}

#[test]
fn test_multi_document_stream_is_structured() {
    let outcome = extract_from_str("first: 1\n---\nsecond:\n  third: 3\n");

    assert!(outcome.is_structured());
    assert_eq!(outcome.keys(), &set(&["first", "second", "third"]));
}

#[test]
fn test_scalar_document_has_no_keys() {
    let outcome = extract_from_str("just a string\n");
    assert!(outcome.is_structured());
    assert!(outcome.keys().is_empty());
}

#[test]
fn test_directory_extraction_unions_files() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "a.yaml", "alpha: 1\nshared: 2\n");
    create_file_at_path(&temp, "nested/b.yml", "beta:\n  shared: 3\n");
    create_file_at_path(&temp, "notes.txt", "ignored: true\n");

    let extraction = KeywordExtractor::for_root(temp.path())
        .extract(&["yaml", "yml"])
        .unwrap();

    assert!(extraction.root_exists);
    assert_eq!(extraction.files_scanned(), 2);
    assert_eq!(extraction.structured_count(), 2);
    assert_eq!(extraction.keys, set(&["alpha", "beta", "shared"]));
}

#[test]
fn test_non_recursive_skips_subdirectories() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "top.yaml", "top: 1\n");
    create_file_at_path(&temp, "sub/deep.yaml", "deep: 1\n");

    let config = AuditConfig::new(temp.path()).non_recursive();
    let extraction = KeywordExtractor::new(config).extract(&["yaml"]).unwrap();

    assert_eq!(extraction.keys, set(&["top"]));
}

#[test]
fn test_exclude_patterns_skip_directories() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "src/keep.yaml", "kept: 1\n");
    create_file_at_path(&temp, "target/classes/copy.yaml", "copied: 1\n");

    let config = AuditConfig::new(temp.path()).with_exclude_pattern("/target/");
    let extraction = KeywordExtractor::new(config).extract(&["yaml"]).unwrap();

    assert_eq!(extraction.keys, set(&["kept"]));
}

#[test]
fn test_empty_directory_yields_empty_set() {
    let temp = TempDir::new().unwrap();

    let extraction = KeywordExtractor::for_root(temp.path())
        .extract(&["yaml"])
        .unwrap();

    assert!(extraction.root_exists);
    assert_eq!(extraction.files_scanned(), 0);
    assert!(extraction.keys.is_empty());
}

#[test]
fn test_missing_root_is_not_an_error() {
    let temp = TempDir::new().unwrap();

    let extraction = KeywordExtractor::for_root(temp.path().join("absent"))
        .extract(&["yaml"])
        .unwrap();

    assert!(!extraction.root_exists);
    assert!(extraction.keys.is_empty());
    assert!(extraction.files.is_empty());
}

#[test]
fn test_fallback_files_are_counted() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "good.yaml", "good: 1\n");
    create_file_at_path(&temp, "bad.yaml", "bad: [\n  oops: 1\n");

    let extraction = KeywordExtractor::for_root(temp.path())
        .extract(&["yaml"])
        .unwrap();

    assert_eq!(extraction.structured_count(), 1);
    assert_eq!(extraction.fallback_count(), 1);
    assert!(extraction.keys.contains("good"));
    assert!(extraction.keys.contains("bad"));
}

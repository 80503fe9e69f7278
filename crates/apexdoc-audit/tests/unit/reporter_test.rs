//! Tests for report formatting

use crate::test_utils::create_file_at_path;
use apexdoc_audit::keywords::extractor::extract_from_str;
use apexdoc_audit::{
    AuditConfig, ConformanceValidator, DemoAnalysisReport, DemoClassInfo, DocQuality, FixOutcome,
    GapClassifier, GapReport, KeywordExtractor, LayoutConfig, LayoutValidator, LoadingPattern,
    PatternCounts, ReferenceExtractor, RelocationOutcome, RelocationResult, Reporter,
    YamlFileInfo,
};
use std::path::PathBuf;
use tempfile::TempDir;

fn class(name: &str, yaml_files: &[&str]) -> DemoClassInfo {
    DemoClassInfo {
        class_name: name.to_string(),
        package: "dev.mars.apex.demo.lookups".to_string(),
        file_path: format!("demo/{name}.java"),
        yaml_files: yaml_files.iter().map(|s| (*s).to_string()).collect(),
        missing_yaml_files: Vec::new(),
        loading_pattern: LoadingPattern::StandardApexLoader,
        error_handling: true,
        documentation: "Docs".to_string(),
    }
}

fn demo_report() -> DemoAnalysisReport {
    let demo_classes = vec![
        class("LookupDemo", &["demos/a.yaml", "demos/b.yaml"]),
        class("Odd,Name", &[]),
    ];
    let yaml_files = vec![YamlFileInfo {
        path: "demos/a.yaml".to_string(),
        exists: true,
        size: 42,
        metadata: serde_json::Map::new(),
        documentation_quality: DocQuality::Good,
        tags: vec!["t1".into(), "t2".into(), "t3".into(), "t4".into()],
    }];
    DemoAnalysisReport {
        timestamp: "2026-01-01T00:00:00+00:00".to_string(),
        total_demo_classes: 2,
        total_yaml_files: 1,
        missing_yaml_files: 0,
        consistency_score: 75.0,
        patterns: PatternCounts::from_classes(&demo_classes),
        recommendations: vec!["Add error handling to: X".to_string()],
        demo_classes,
        yaml_files,
    }
}

fn gap_report(temp: &TempDir) -> GapReport {
    create_file_at_path(temp, "configs/a.yaml", "metadata:\n  name: a\n  cache-ttl: 5\n");
    let reference = create_file_at_path(temp, "ref.md", "```yaml\nmetadata:\n  name: x\n  legacy-key: y\n```\n");

    let found = KeywordExtractor::for_root(temp.path().join("configs"))
        .extract(&["yaml"])
        .unwrap();
    let documented = ReferenceExtractor::new().extract_file(&reference).unwrap();
    GapReport::new(&found, &documented, &GapClassifier::default())
}

#[test]
fn test_gap_text_sections() {
    let temp = TempDir::new().unwrap();
    let text = Reporter::gap_text(&gap_report(&temp));

    assert!(text.starts_with("=== YAML Keyword Documentation Gap Report ===\n"));
    assert!(text.contains("(1 files found)"));
    assert!(text.contains("Missing from docs:    1\n"));
    assert!(text.contains("Caching & Performance (1):\n  - cache-ttl\n"));
    assert!(text.contains("--- Documented but Unused ---\n  - legacy-key\n"));
    assert!(!text.contains("(not found)"));
}

#[test]
fn test_gap_markdown_lists_missing_by_category() {
    let temp = TempDir::new().unwrap();
    let markdown = Reporter::gap_markdown(&gap_report(&temp));

    assert!(markdown.starts_with("# APEX YAML Keyword Gap Analysis"));
    assert!(markdown.contains("### Caching & Performance (1)\n\n- `cache-ttl`\n"));
    assert!(markdown.contains("| Missing from docs | 1 |"));
}

#[test]
fn test_keywords_text_lists_sorted_keys() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "b.yaml", "zeta: 1\nalpha: 2\n");

    let extraction = KeywordExtractor::new(AuditConfig::new(temp.path()))
        .extract(&["yaml"])
        .unwrap();
    let text = Reporter::keywords_text(&extraction);

    assert!(text.contains("Unique keywords: 2\n\nalpha\nzeta\n"), "{text}");
    assert!(!text.contains("Heuristic Fallback"));
}

#[test]
fn test_demo_csv_escapes_fields() {
    let csv = Reporter::demo_csv(&demo_report());

    assert_eq!(
        csv,
        "class_name,yaml_files\nLookupDemo,demos/a.yaml;demos/b.yaml\n\"Odd,Name\",\n"
    );
}

#[test]
fn test_demo_markdown() {
    let markdown = Reporter::demo_markdown(&demo_report());

    assert!(markdown.contains("**Consistency Score:** 75.0%"));
    assert!(markdown.contains("- **Standard Apex Loader:** 2\n"));
    assert!(markdown.contains("- **No Yaml Files:** 1\n"));
    assert!(markdown.contains("| LookupDemo | lookups | 2 | standard_apex_loader | yes |"));
    // Only the first three tags are shown
    assert!(markdown.contains("| demos/a.yaml | good | 42 | t1, t2, t3 |"));
    assert!(markdown.contains("1. Add error handling to: X\n"));
    assert!(markdown.contains("shows good consistency"));
}

#[test]
fn test_demo_summary() {
    let summary = Reporter::demo_summary(&demo_report());
    assert!(summary.contains("Consistency Score: 75.0%\n"));
    assert!(summary.contains("Demo Classes: 2\n"));
}

#[test]
fn test_conformance_output_lists_violations_with_suggestions() {
    let temp = TempDir::new().unwrap();
    let file = create_file_at_path(&temp, "x.yaml", "rules: []\n");

    let report = ConformanceValidator::with_defaults().unwrap().validate_paths(
        &[file],
        &AuditConfig::new("."),
        &["yaml"],
    );
    let text = Reporter::conformance_human_readable(&report);

    assert!(text.contains("Files checked: 1\n"));
    assert!(text.contains("[ERROR] META002"));
    assert!(text.contains("Suggestion:"));
    assert!(text.contains("Status: FAILED\n"));
}

#[test]
fn test_layout_output_marks_sections() {
    let temp = TempDir::new().unwrap();
    let report = LayoutValidator::new(temp.path(), LayoutConfig::default()).validate();

    let text = Reporter::layout_human_readable(&report);

    assert!(text.contains(LayoutValidator::LEGACY_REMOVED));
    assert!(text.contains("PASS\n"));
    assert!(text.contains("FAIL\n"));
    assert!(text.ends_with("Status: FAILED\n"));
}

#[test]
fn test_relocation_text_counts_failures() {
    let results = vec![
        RelocationResult {
            source: PathBuf::from("a"),
            destination: PathBuf::from("b"),
            outcome: RelocationOutcome::Copied,
        },
        RelocationResult {
            source: PathBuf::from("c"),
            destination: PathBuf::from("d"),
            outcome: RelocationOutcome::Failed("denied".to_string()),
        },
    ];

    let text = Reporter::relocation_text(&results);

    assert!(text.contains("a -> b: copied\n"));
    assert!(text.contains("c -> d: failed: denied\n"));
    assert!(text.ends_with("2 entries, 1 failed\n"));
}

#[test]
fn test_metadata_fix_text_hides_clean_files() {
    let results = vec![
        (PathBuf::from("clean.yaml"), FixOutcome::Unchanged { unresolved: Vec::new() }),
        (
            PathBuf::from("fixed.yaml"),
            FixOutcome::Patched {
                added: vec!["id".to_string()],
                unresolved: Vec::new(),
            },
        ),
    ];

    let text = Reporter::metadata_fix_text(&results);

    assert!(!text.contains("clean.yaml"));
    assert!(text.contains("fixed.yaml: added: id\n"));
    assert!(text.ends_with("2 files checked\n"));
}

#[test]
fn test_json_output() {
    let json = Reporter::to_json(&demo_report()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["total_demo_classes"], 2);
    assert_eq!(value["demo_classes"][0]["loading_pattern"], "standard_apex_loader");
    assert_eq!(value["yaml_files"][0]["documentation_quality"], "good");
}

#[test]
fn test_relocation_outcome_json_shape() {
    let json = Reporter::to_json(&RelocationOutcome::Failed("denied".to_string())).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["status"], "failed");
    assert_eq!(value["reason"], "denied");
}

#[test]
fn test_write_report_creates_parent_directories() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("reports/nested/gaps.md");

    Reporter::write_report(&path, "# Report\n").unwrap();

    assert_eq!(std::fs::read_to_string(path).unwrap(), "# Report\n");
}

#[test]
fn test_flattened_keys_feed_the_report() {
    // Nested keys are reported under their own name, without the parent path
    let extraction = extract_from_str("outer:\n  inner:\n    leaf: 1\n");
    let keys: Vec<&str> = extraction.keys().iter().map(String::as_str).collect();
    assert_eq!(keys, vec!["inner", "leaf", "outer"]);
}

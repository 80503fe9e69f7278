//! Tests for plan-driven relocation

use crate::test_utils::{create_dir_at_path, create_file_at_path};
use apexdoc_audit::{AuditError, RelocationMode, RelocationOutcome, RelocationPlan, Relocator};
use std::fs;
use tempfile::TempDir;

fn plan_for(temp: &TempDir, moves: &[(&str, &str)]) -> RelocationPlan {
    let mut yaml = format!("base: {}\nmoves:\n", temp.path().display());
    for (from, to) in moves {
        yaml.push_str(&format!("  - from: {from}\n    to: {to}\n"));
    }
    RelocationPlan::from_yaml_str(&yaml).unwrap()
}

#[test]
fn test_plan_parsing() {
    let plan = RelocationPlan::from_yaml_str(
        "base: resources\nmoves:\n  - from: a.yaml\n    to: demos/a.yaml\n",
    )
    .unwrap();

    assert_eq!(plan.moves.len(), 1);
    let (source, destination) = plan.resolve(&plan.moves[0]);
    assert_eq!(source, std::path::Path::new("resources/a.yaml"));
    assert_eq!(destination, std::path::Path::new("resources/demos/a.yaml"));
}

#[test]
fn test_plan_without_base_uses_paths_as_given() {
    let plan = RelocationPlan::from_yaml_str("moves:\n  - from: a\n    to: b\n").unwrap();
    assert!(plan.base.is_none());
    let (source, destination) = plan.resolve(&plan.moves[0]);
    assert_eq!(source, std::path::Path::new("a"));
    assert_eq!(destination, std::path::Path::new("b"));
}

#[test]
fn test_missing_plan_file() {
    let temp = TempDir::new().unwrap();
    let result = RelocationPlan::load(&temp.path().join("plan.yaml"));
    assert!(matches!(result, Err(AuditError::MissingInput(_))));
}

#[test]
fn test_malformed_plan_file() {
    let temp = TempDir::new().unwrap();
    let path = create_file_at_path(&temp, "plan.yaml", "moves: {from: [\n");
    let result = RelocationPlan::load(&path);
    assert!(matches!(result, Err(AuditError::Parse { .. })));
}

#[test]
fn test_copy_keeps_source_and_creates_parents() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "old/a.yaml", "a: 1\n");
    let plan = plan_for(&temp, &[("old/a.yaml", "demos/deep/a.yaml")]);

    let results = Relocator::new(RelocationMode::Copy).apply(&plan);

    assert_eq!(results[0].outcome, RelocationOutcome::Copied);
    assert!(temp.path().join("old/a.yaml").exists());
    assert_eq!(
        fs::read_to_string(temp.path().join("demos/deep/a.yaml")).unwrap(),
        "a: 1\n"
    );
}

#[test]
fn test_move_removes_source() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "old/a.yaml", "a: 1\n");
    let plan = plan_for(&temp, &[("old/a.yaml", "new/a.yaml")]);

    let results = Relocator::new(RelocationMode::Move).apply(&plan);

    assert_eq!(results[0].outcome, RelocationOutcome::Moved);
    assert!(!temp.path().join("old/a.yaml").exists());
    assert!(temp.path().join("new/a.yaml").exists());
}

#[test]
fn test_directory_copy_is_recursive() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "yaml-examples/one.yaml", "one: 1\n");
    create_file_at_path(&temp, "yaml-examples/nested/two.yaml", "two: 2\n");
    create_dir_at_path(&temp, "yaml-examples/empty");
    let plan = plan_for(&temp, &[("yaml-examples", "reference/syntax-examples")]);

    let results = Relocator::default().apply(&plan);

    assert_eq!(results[0].outcome, RelocationOutcome::Copied);
    let target = temp.path().join("reference/syntax-examples");
    assert!(target.join("one.yaml").is_file());
    assert!(target.join("nested/two.yaml").is_file());
    assert!(target.join("empty").is_dir());
}

#[test]
fn test_dry_run_leaves_filesystem_untouched() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "old/a.yaml", "a: 1\n");
    let plan = plan_for(&temp, &[("old/a.yaml", "new/a.yaml")]);

    let results = Relocator::new(RelocationMode::Move).dry_run(true).apply(&plan);

    assert_eq!(results[0].outcome, RelocationOutcome::Planned);
    assert!(temp.path().join("old/a.yaml").exists());
    assert!(!temp.path().join("new").exists());
}

#[test]
fn test_existing_destination_is_skipped() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "old/a.yaml", "old\n");
    create_file_at_path(&temp, "new/a.yaml", "new\n");
    let plan = plan_for(&temp, &[("old/a.yaml", "new/a.yaml")]);

    let results = Relocator::new(RelocationMode::Move).apply(&plan);

    assert_eq!(results[0].outcome, RelocationOutcome::SkippedExists);
    assert_eq!(fs::read_to_string(temp.path().join("new/a.yaml")).unwrap(), "new\n");
    assert!(temp.path().join("old/a.yaml").exists());
}

#[test]
fn test_missing_source_does_not_stop_the_plan() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "b.yaml", "b: 1\n");
    let plan = plan_for(&temp, &[("a.yaml", "x/a.yaml"), ("b.yaml", "x/b.yaml")]);

    let results = Relocator::default().apply(&plan);

    assert_eq!(results[0].outcome, RelocationOutcome::SourceMissing);
    assert_eq!(results[1].outcome, RelocationOutcome::Copied);
    assert!(results.iter().all(|r| !r.outcome.is_failure()));
}

#[test]
fn test_reapplying_a_plan_is_idempotent() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "old/a.yaml", "a: 1\n");
    let plan = plan_for(&temp, &[("old/a.yaml", "new/a.yaml")]);
    let relocator = Relocator::new(RelocationMode::Move);

    let first = relocator.apply(&plan);
    let second = relocator.apply(&plan);

    assert_eq!(first[0].outcome, RelocationOutcome::Moved);
    assert_eq!(second[0].outcome, RelocationOutcome::SkippedExists);
    assert!(temp.path().join("new/a.yaml").exists());
}

#[test]
fn test_outcome_display() {
    assert_eq!(RelocationOutcome::SkippedExists.to_string(), "skipped (destination exists)");
    assert_eq!(
        RelocationOutcome::Failed("denied".to_string()).to_string(),
        "failed: denied"
    );
}

#[cfg(unix)]
#[test]
fn test_failed_copy_leaves_no_partial_destination() {
    let temp = TempDir::new().unwrap();
    create_file_at_path(&temp, "src-dir/a.yaml", "a: 1\n");
    // Copied after a.yaml in file-name order, and fails because its target is gone
    std::os::unix::fs::symlink(temp.path().join("gone.yaml"), temp.path().join("src-dir/z-link.yaml"))
        .unwrap();
    let plan = plan_for(&temp, &[("src-dir", "dst-dir")]);
    let relocator = Relocator::new(RelocationMode::Copy);

    let first = relocator.apply(&plan);

    assert!(first[0].outcome.is_failure(), "{:?}", first[0].outcome);
    assert!(!temp.path().join("dst-dir").exists());

    // The entry is retried rather than reported as already done
    let second = relocator.apply(&plan);
    assert!(second[0].outcome.is_failure(), "{:?}", second[0].outcome);
    assert!(temp.path().join("src-dir/a.yaml").exists());
}

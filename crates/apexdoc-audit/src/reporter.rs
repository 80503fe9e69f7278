//! Report Generation
//!
//! Pure formatting of computed results:
//! - Plain text for the terminal
//! - Markdown for committed reports
//! - JSON for CI integration
//! - CSV for the demo class listing

use crate::conformance::ConformanceReport;
use crate::demo::DemoAnalysisReport;
use crate::keywords::{Extraction, GapReport};
use crate::layout::LayoutReport;
use crate::metadata_fix::{FixOutcome, title_case};
use crate::relocate::RelocationResult;
use crate::violation_trait::Violation;
use crate::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Report generator
pub struct Reporter;

impl Reporter {
    /// Pretty JSON for any report type
    pub fn to_json<T: Serialize>(report: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Write a report, creating parent directories and truncating any old file
    pub fn write_report(path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }

    /// Sorted keyword listing with scan statistics
    pub fn keywords_text(extraction: &Extraction) -> String {
        let mut output = String::new();

        output.push_str("=== YAML Keywords ===\n\n");
        output.push_str(&format!(
            "Root: {} ({})\n",
            extraction.root.display(),
            files_found(extraction.root_exists, extraction.files_scanned())
        ));
        output.push_str(&format!(
            "Parsed: {} structured, {} heuristic fallback, {} unreadable\n",
            extraction.structured_count(),
            extraction.fallback_count(),
            extraction.unreadable.len()
        ));
        output.push_str(&format!("Unique keywords: {}\n\n", extraction.keys.len()));

        for key in &extraction.keys {
            output.push_str(key);
            output.push('\n');
        }

        let fallback: Vec<&PathBuf> = extraction
            .files
            .iter()
            .filter(|f| !f.outcome.is_structured())
            .map(|f| &f.path)
            .collect();
        if !fallback.is_empty() {
            output.push_str("\n--- Heuristic Fallback Files ---\n");
            for path in fallback {
                output.push_str(&format!("  {}\n", path.display()));
            }
        }

        output
    }

    /// Plain-text gap report
    pub fn gap_text(report: &GapReport) -> String {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str("=== YAML Keyword Documentation Gap Report ===\n\n");
        output.push_str(&format!("Timestamp: {}\n", report.timestamp));
        output.push_str(&format!(
            "YAML root: {} ({})\n",
            report.yaml_root.display(),
            files_found(report.yaml_root_exists, report.files_scanned)
        ));
        output.push_str(&format!(
            "Reference: {}{}\n\n",
            report.reference_doc.display(),
            if report.reference_exists { "" } else { " (not found)" }
        ));

        output.push_str("--- Summary ---\n");
        output.push_str(&format!("Keywords found:       {}\n", analysis.found.len()));
        output.push_str(&format!("Keywords documented:  {}\n", analysis.documented.len()));
        output.push_str(&format!(
            "Documented and used:  {}\n",
            analysis.documented_found.len()
        ));
        output.push_str(&format!("Missing from docs:    {}\n", analysis.missing.len()));
        output.push_str(&format!("Documented, unused:   {}\n", analysis.unused.len()));
        output.push_str(&format!("Coverage:             {:.1}%\n", report.coverage_percent));
        if !report.fallback_files.is_empty() {
            output.push_str(&format!(
                "Heuristic parses:     {}\n",
                report.fallback_files.len()
            ));
        }
        output.push('\n');

        if analysis.missing.is_empty() {
            output.push_str("All found keywords are documented.\n");
        } else {
            output.push_str("--- Missing Keywords by Category ---\n");
            for bucket in report.missing_by_category.non_empty() {
                output.push_str(&format!("{} ({}):\n", bucket.name, bucket.keywords.len()));
                for keyword in &bucket.keywords {
                    output.push_str(&format!("  - {keyword}\n"));
                }
            }
        }

        if !analysis.unused.is_empty() {
            output.push_str("\n--- Documented but Unused ---\n");
            for keyword in &analysis.unused {
                output.push_str(&format!("  - {keyword}\n"));
            }
        }

        output
    }

    /// Markdown gap report
    pub fn gap_markdown(report: &GapReport) -> String {
        let analysis = &report.analysis;
        let mut output = String::new();

        output.push_str("# APEX YAML Keyword Gap Analysis\n\n");
        output.push_str(&format!("**Generated:** {}\n", report.timestamp));
        output.push_str(&format!(
            "**YAML root:** `{}` ({})\n",
            report.yaml_root.display(),
            files_found(report.yaml_root_exists, report.files_scanned)
        ));
        output.push_str(&format!(
            "**Reference:** `{}`{}\n\n",
            report.reference_doc.display(),
            if report.reference_exists { "" } else { " (not found)" }
        ));

        output.push_str("## Summary\n\n");
        output.push_str("| Metric | Count |\n|--------|-------|\n");
        output.push_str(&format!("| Keywords found | {} |\n", analysis.found.len()));
        output.push_str(&format!(
            "| Keywords documented | {} |\n",
            analysis.documented.len()
        ));
        output.push_str(&format!(
            "| Documented and used | {} |\n",
            analysis.documented_found.len()
        ));
        output.push_str(&format!("| Missing from docs | {} |\n", analysis.missing.len()));
        output.push_str(&format!("| Documented, unused | {} |\n", analysis.unused.len()));
        output.push_str(&format!("| Coverage | {:.1}% |\n\n", report.coverage_percent));

        output.push_str("## Missing Keywords\n\n");
        if analysis.missing.is_empty() {
            output.push_str("All found keywords are documented.\n\n");
        }
        for bucket in report.missing_by_category.non_empty() {
            output.push_str(&format!("### {} ({})\n\n", bucket.name, bucket.keywords.len()));
            for keyword in &bucket.keywords {
                output.push_str(&format!("- `{keyword}`\n"));
            }
            output.push('\n');
        }

        if !analysis.unused.is_empty() {
            output.push_str("## Documented but Unused\n\n");
            for keyword in &analysis.unused {
                output.push_str(&format!("- `{keyword}`\n"));
            }
            output.push('\n');
        }

        if !report.fallback_files.is_empty() {
            output.push_str("## Files Parsed Heuristically\n\n");
            for path in &report.fallback_files {
                output.push_str(&format!("- `{}`\n", path.display()));
            }
            output.push('\n');
        }

        output
    }

    /// Markdown demo analysis report
    pub fn demo_markdown(report: &DemoAnalysisReport) -> String {
        let mut output = String::new();

        output.push_str("# APEX Demo YAML File Analysis Report\n\n");
        output.push_str(&format!("**Generated:** {}\n", report.timestamp));
        output.push_str(&format!(
            "**Consistency Score:** {:.1}%\n\n",
            report.consistency_score
        ));

        output.push_str("## Summary Statistics\n\n");
        output.push_str(&format!(
            "- **Total Demo Classes:** {}\n",
            report.total_demo_classes
        ));
        output.push_str(&format!("- **Total YAML Files:** {}\n", report.total_yaml_files));
        output.push_str(&format!(
            "- **Missing YAML Files:** {}\n",
            report.missing_yaml_files
        ));
        output.push_str(&format!(
            "- **Consistency Score:** {:.1}%\n\n",
            report.consistency_score
        ));

        output.push_str("## Pattern Analysis\n\n");
        for (pattern, count) in report.patterns.entries() {
            output.push_str(&format!("- **{}:** {}\n", title_case(pattern), count));
        }

        output.push_str("\n## Demo Classes Analysis\n\n");
        output.push_str("| Class Name | Package | YAML Files | Loading Pattern | Error Handling |\n");
        output.push_str("|------------|---------|------------|-----------------|----------------|\n");
        for class in &report.demo_classes {
            output.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                class.class_name,
                class.short_package(),
                class.yaml_files.len(),
                class.loading_pattern,
                if class.error_handling { "yes" } else { "no" }
            ));
        }

        output.push_str("\n## YAML Files Analysis\n\n");
        output.push_str("| File Path | Documentation Quality | Size (bytes) | Tags |\n");
        output.push_str("|-----------|----------------------|--------------|------|\n");
        for file in &report.yaml_files {
            let tags = if file.tags.is_empty() {
                "None".to_string()
            } else {
                file.tags.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
            };
            output.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                file.path, file.documentation_quality, file.size, tags
            ));
        }

        if !report.recommendations.is_empty() {
            output.push_str("\n## Recommendations\n\n");
            for (i, recommendation) in report.recommendations.iter().enumerate() {
                output.push_str(&format!("{}. {}\n", i + 1, recommendation));
            }
        }

        output.push_str("\n## Conclusion\n\n");
        output.push_str(&format!(
            "The APEX demo module shows {} consistency in YAML file usage with a score of {:.1}%.\n",
            report.consistency_label(),
            report.consistency_score
        ));

        output
    }

    /// `class_name,yaml_files` with the file list joined by `;`
    pub fn demo_csv(report: &DemoAnalysisReport) -> String {
        let mut output = String::from("class_name,yaml_files\n");
        for class in &report.demo_classes {
            output.push_str(&csv_field(&class.class_name));
            output.push(',');
            output.push_str(&csv_field(&class.yaml_files.join(";")));
            output.push('\n');
        }
        output
    }

    /// Short terminal summary printed after a demo analysis
    pub fn demo_summary(report: &DemoAnalysisReport) -> String {
        format!(
            "Analysis complete\n\
             Consistency Score: {:.1}%\n\
             Demo Classes: {}\n\
             YAML Files: {}\n\
             Missing Files: {}\n",
            report.consistency_score,
            report.total_demo_classes,
            report.total_yaml_files,
            report.missing_yaml_files
        )
    }

    /// Human-readable metadata conformance report
    pub fn conformance_human_readable(report: &ConformanceReport) -> String {
        let mut output = String::new();

        output.push_str("=== YAML Metadata Validation Report ===\n\n");
        output.push_str(&format!("Timestamp: {}\n\n", report.timestamp));

        output.push_str("--- Summary ---\n");
        output.push_str(&format!("Files checked: {}\n", report.files_checked()));
        output.push_str(&format!("  Valid:       {}\n", report.valid_count()));
        output.push_str(&format!("  Invalid:     {}\n", report.invalid_count()));
        output.push_str(&format!("Errors:        {}\n", report.error_count()));
        output.push_str(&format!("Warnings:      {}\n", report.warning_count()));
        for missing in &report.missing_inputs {
            output.push_str(&format!("Not found:     {}\n", missing.display()));
        }
        output.push('\n');

        let status = if report.passed() { "PASSED" } else { "FAILED" };
        output.push_str(&format!("Status: {status}\n\n"));

        for file in report.files.iter().filter(|f| !f.violations.is_empty()) {
            output.push_str(&format!("--- {} ---\n", file.file.display()));
            for v in &file.violations {
                output.push_str(&format!("  [{}] {}: {}\n", v.severity(), v.id(), v));
                if let Some(suggestion) = v.suggestion() {
                    output.push_str(&format!("    Suggestion: {suggestion}\n"));
                }
            }
            output.push('\n');
        }

        output
    }

    /// Human-readable layout report with one PASS/FAIL line per section
    pub fn layout_human_readable(report: &LayoutReport) -> String {
        let mut output = String::new();

        output.push_str("=== Demo Reorganization Validation ===\n\n");
        output.push_str(&format!("Timestamp: {}\n", report.timestamp));
        output.push_str(&format!("Project: {}\n\n", report.project_root.display()));

        output.push_str("--- Sections ---\n");
        for section in &report.sections {
            output.push_str(&format!(
                "{:<28} {}/{}  {}\n",
                section.name,
                section.passed_count,
                section.checked,
                if section.passed { "PASS" } else { "FAIL" }
            ));
        }
        output.push('\n');

        if !report.violations.is_empty() {
            output.push_str("--- Violations ---\n");
            for v in &report.violations {
                output.push_str(&format!("  [{}] {} {}: {}\n", v.severity(), v.id(), v.category(), v));
            }
            output.push('\n');
        }

        let status = if report.passed() { "PASSED" } else { "FAILED" };
        output.push_str(&format!("Status: {status}\n"));
        output
    }

    /// One line per relocation entry
    pub fn relocation_text(results: &[RelocationResult]) -> String {
        let mut output = String::new();
        for result in results {
            output.push_str(&format!(
                "{} -> {}: {}\n",
                result.source.display(),
                result.destination.display(),
                result.outcome
            ));
        }
        output.push_str(&format!(
            "\n{} entries, {} failed\n",
            results.len(),
            results.iter().filter(|r| r.outcome.is_failure()).count()
        ));
        output
    }

    /// One line per file touched by the metadata fixer
    pub fn metadata_fix_text(results: &[(PathBuf, FixOutcome)]) -> String {
        let mut output = String::new();
        for (path, outcome) in results {
            if matches!(outcome, FixOutcome::Unchanged { unresolved } if unresolved.is_empty()) {
                continue;
            }
            output.push_str(&format!("{}: {}\n", path.display(), outcome));
        }
        output.push_str(&format!("\n{} files checked\n", results.len()));
        output
    }
}

/// `N files found`, noting when the directory itself was absent
fn files_found(exists: bool, count: usize) -> String {
    if exists {
        format!("{count} files found")
    } else {
        format!("directory not found, {count} files found")
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

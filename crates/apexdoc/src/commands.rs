//! Subcommand implementations
//!
//! Reports go to stdout (or the requested file); diagnostics go through
//! `tracing` to stderr. Each command returns the process exit code.

use crate::cli::{
    Command, ConformanceArgs, DemoArgs, FixMetadataArgs, GapsArgs, KeywordsArgs, LayoutArgs,
    RelocateArgs,
};
use anyhow::{Context, Result};
use apexdoc_audit::{
    AuditError, ConformanceValidator, DemoAnalyzer, FileConfig, GapReport, KeywordExtractor,
    LayoutValidator, MetadataFixer, ReferenceExtractor, RelocationMode, RelocationPlan, Relocator,
    Reporter,
};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};

/// Dispatch a parsed command against the loaded configuration
pub fn execute(command: &Command, config: &FileConfig) -> Result<ExitCode> {
    match command {
        Command::Keywords(args) => keywords(args, config),
        Command::Gaps(args) => gaps(args, config),
        Command::Demo(args) => demo(args, config),
        Command::Conformance(args) => conformance(args, config),
        Command::Layout(args) => layout(args, config),
        Command::Relocate(args) => relocate(args),
        Command::FixMetadata(args) => fix_metadata(args, config),
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Write to `output` when given, stdout otherwise
fn emit(contents: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => Reporter::write_report(path, contents)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            print!("{contents}");
            Ok(())
        }
    }
}

fn keywords(args: &KeywordsArgs, config: &FileConfig) -> Result<ExitCode> {
    let root = args.root.as_ref().unwrap_or(&config.general.demo_dir);
    let scan = config.scan_config(root).with_recursive(!args.no_recursive);

    let extraction = KeywordExtractor::new(scan).extract(&config.yaml_extensions())?;
    if !extraction.root_exists {
        error!(root = %root.display(), "keyword root not found");
        return Ok(ExitCode::FAILURE);
    }
    emit(&Reporter::keywords_text(&extraction), args.output.as_deref())?;
    Ok(ExitCode::SUCCESS)
}

fn gaps(args: &GapsArgs, config: &FileConfig) -> Result<ExitCode> {
    let root = args.root.as_ref().unwrap_or(&config.general.demo_dir);
    let reference_path = args
        .reference
        .as_ref()
        .unwrap_or(&config.general.reference_doc);

    let found = KeywordExtractor::new(config.scan_config(root)).extract(&config.yaml_extensions())?;
    let reference = ReferenceExtractor::new()
        .extract_file(reference_path)
        .with_context(|| format!("failed to read {}", reference_path.display()))?;
    let report = GapReport::new(&found, &reference, &config.classifier());

    let rendered = if args.json {
        Reporter::to_json(&report)?
    } else if args.markdown {
        Reporter::gap_markdown(&report)
    } else {
        Reporter::gap_text(&report)
    };
    emit(&rendered, args.output.as_deref())?;

    let missing = report.analysis.missing.len();
    info!(missing, coverage = report.coverage_percent, "gap analysis completed");
    Ok(exit_code(!(args.fail_on_missing && missing > 0)))
}

fn demo(args: &DemoArgs, config: &FileConfig) -> Result<ExitCode> {
    let analyzer = DemoAnalyzer::new(&args.apex_root, &config.general, &config.demo);
    let report = match analyzer.analyze() {
        Ok(report) => report,
        Err(AuditError::MissingInput(path)) => {
            error!(
                path = %path.display(),
                "demo directory not found; run from the APEX root or pass --apex-root"
            );
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let output = args.output.as_ref().unwrap_or(&config.demo.default_output);
    Reporter::write_report(output, &Reporter::demo_markdown(&report))
        .with_context(|| format!("failed to write {}", output.display()))?;
    if let Some(path) = &args.json {
        Reporter::write_report(path, &Reporter::to_json(&report)?)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    if let Some(path) = &args.csv {
        Reporter::write_report(path, &Reporter::demo_csv(&report))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    print!("{}", Reporter::demo_summary(&report));
    Ok(ExitCode::SUCCESS)
}

fn conformance(args: &ConformanceArgs, config: &FileConfig) -> Result<ExitCode> {
    let paths = if args.paths.is_empty() {
        vec![config.conformance.default_root.clone()]
    } else {
        args.paths.clone()
    };

    let validator = ConformanceValidator::new(config.conformance.clone())?;
    let template = config.scan_config(".").with_recursive(!args.no_recursive);
    let report = validator.validate_paths(&paths, &template, &config.yaml_extensions());

    if args.json {
        println!("{}", Reporter::to_json(&report)?);
    } else {
        print!("{}", Reporter::conformance_human_readable(&report));
    }
    Ok(exit_code(report.passed()))
}

fn layout(args: &LayoutArgs, config: &FileConfig) -> Result<ExitCode> {
    let report = LayoutValidator::new(&args.root, config.layout.clone()).validate();

    if args.json {
        println!("{}", Reporter::to_json(&report)?);
    } else {
        print!("{}", Reporter::layout_human_readable(&report));
    }
    Ok(exit_code(report.passed()))
}

fn relocate(args: &RelocateArgs) -> Result<ExitCode> {
    let plan = RelocationPlan::load(&args.plan)
        .with_context(|| format!("failed to load relocation plan {}", args.plan.display()))?;
    let mode = if args.move_files {
        RelocationMode::Move
    } else {
        RelocationMode::Copy
    };

    let results = Relocator::new(mode).dry_run(args.dry_run).apply(&plan);
    print!("{}", Reporter::relocation_text(&results));
    Ok(exit_code(!results.iter().any(|r| r.outcome.is_failure())))
}

fn fix_metadata(args: &FixMetadataArgs, config: &FileConfig) -> Result<ExitCode> {
    let root = args
        .root
        .as_ref()
        .unwrap_or(&config.conformance.default_root);
    let scan = config.scan_config(root).with_recursive(!args.no_recursive);
    if !scan.root_exists() {
        error!(root = %root.display(), "directory not found, nothing to fix");
        return Ok(ExitCode::FAILURE);
    }

    let results = MetadataFixer::new(&config.conformance)
        .dry_run(args.dry_run)
        .fix_tree(&scan, &config.yaml_extensions());
    print!("{}", Reporter::metadata_fix_text(&results));
    Ok(ExitCode::SUCCESS)
}

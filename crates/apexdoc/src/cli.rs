//! Command line definition
//!
//! Subcommands:
//! - `keywords`: list YAML keys found under a directory
//! - `gaps`: compare found keys with the reference document
//! - `demo`: analyze demo class YAML usage
//! - `conformance`: validate YAML metadata blocks
//! - `layout`: validate the reorganized demo layout
//! - `relocate`: apply a copy/move plan
//! - `fix-metadata`: add missing metadata fields
//! - `config`: print the effective configuration

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// APEX YAML documentation and reorganization audits
#[derive(Parser, Debug)]
#[command(name = "apexdoc")]
#[command(about = "Audit APEX YAML assets against their reference documentation")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (defaults to ./.apexdoc.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every mapping key found in YAML files
    Keywords(KeywordsArgs),

    /// Report found keywords missing from the reference document
    Gaps(GapsArgs),

    /// Analyze YAML usage of the demo module
    Demo(DemoArgs),

    /// Validate the metadata section of YAML files
    Conformance(ConformanceArgs),

    /// Validate the reorganized demo resource layout
    Layout(LayoutArgs),

    /// Copy or move files according to a relocation plan
    Relocate(RelocateArgs),

    /// Add missing required metadata fields
    FixMetadata(FixMetadataArgs),

    /// Print the effective configuration as TOML
    Config,
}

#[derive(Args, Debug)]
pub struct KeywordsArgs {
    /// Directory to scan (defaults to general.demo_dir)
    pub root: Option<PathBuf>,

    /// Only scan the directory's immediate children
    #[arg(long)]
    pub no_recursive: bool,

    /// Write the listing to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct GapsArgs {
    /// Directory to scan (defaults to general.demo_dir)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Reference document (defaults to general.reference_doc)
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Render Markdown
    #[arg(long, conflicts_with = "json")]
    pub markdown: bool,

    /// Render JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with status 1 when any keyword is undocumented
    #[arg(long)]
    pub fail_on_missing: bool,
}

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// APEX root containing the demo module
    #[arg(long, default_value = ".")]
    pub apex_root: PathBuf,

    /// Markdown report path (defaults to demo.default_output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Also write a JSON report
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Also write a CSV class listing
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConformanceArgs {
    /// Files or directories (defaults to conformance.default_root)
    pub paths: Vec<PathBuf>,

    /// Only scan the directories' immediate children
    #[arg(long)]
    pub no_recursive: bool,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// Project root the layout paths are relative to
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct RelocateArgs {
    /// YAML relocation plan
    pub plan: PathBuf,

    /// Move instead of copy
    #[arg(long = "move")]
    pub move_files: bool,

    /// Report what would happen without touching files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct FixMetadataArgs {
    /// Directory to fix (defaults to conformance.default_root)
    pub root: Option<PathBuf>,

    /// Only fix the directory's immediate children
    #[arg(long)]
    pub no_recursive: bool,

    /// Report what would change without writing
    #[arg(long)]
    pub dry_run: bool,
}

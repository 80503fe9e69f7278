//! `apexdoc` command line front end
//!
//! Parsing lives in [`cli`], command bodies in [`commands`]. [`run`] wires
//! configuration and logging together before dispatching.

pub mod cli;
pub mod commands;

pub use cli::{Cli, Command};

use anyhow::{Context, Result};
use apexdoc_audit::FileConfig;
use apexdoc_audit::logging::init_logging;
use std::process::ExitCode;

/// Load configuration, initialize logging and run the selected command
pub fn run(cli: &Cli) -> Result<ExitCode> {
    let mut config = FileConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    init_logging(&config.logging)?;

    commands::execute(&cli.command, &config)
}

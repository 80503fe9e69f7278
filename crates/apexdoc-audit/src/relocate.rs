//! Plan-driven file relocation
//!
//! A relocation plan lists `from`/`to` pairs. Every entry is applied
//! independently and reports what happened instead of aborting the run, so a
//! plan can be re-applied safely: entries whose destination already exists
//! are skipped.
//!
//! ```yaml
//! base: apex-demo/src/main/resources
//! moves:
//!   - from: bootstrap/custody-auto-repair-bootstrap.yaml
//!     to: demos/bootstrap/custody-auto-repair/bootstrap-config.yaml
//!   - from: yaml-examples
//!     to: reference/syntax-examples
//! ```

use crate::{AuditError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// One `from` → `to` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationEntry {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Relocation plan as read from YAML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelocationPlan {
    /// Directory both sides are relative to; the working directory when absent
    #[serde(default)]
    pub base: Option<PathBuf>,
    #[serde(default)]
    pub moves: Vec<RelocationEntry>,
}

impl RelocationPlan {
    /// Read a plan file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(AuditError::MissingInput(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content).map_err(|e| AuditError::Parse {
            file: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Source and destination of an entry with `base` applied
    pub fn resolve(&self, entry: &RelocationEntry) -> (PathBuf, PathBuf) {
        match &self.base {
            Some(base) => (base.join(&entry.from), base.join(&entry.to)),
            None => (entry.from.clone(), entry.to.clone()),
        }
    }
}

/// Copy leaves the source in place; move removes it
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelocationMode {
    #[default]
    Copy,
    Move,
}

/// What happened to one entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum RelocationOutcome {
    Copied,
    Moved,
    /// Dry run; nothing was touched
    Planned,
    /// Destination already present
    SkippedExists,
    SourceMissing,
    Failed(String),
}

impl RelocationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl std::fmt::Display for RelocationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Copied => write!(f, "copied"),
            Self::Moved => write!(f, "moved"),
            Self::Planned => write!(f, "planned"),
            Self::SkippedExists => write!(f, "skipped (destination exists)"),
            Self::SourceMissing => write!(f, "source missing"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome of one plan entry with resolved paths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelocationResult {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub outcome: RelocationOutcome,
}

/// Applies relocation plans
#[derive(Debug, Clone, Copy, Default)]
pub struct Relocator {
    mode: RelocationMode,
    dry_run: bool,
}

impl Relocator {
    pub fn new(mode: RelocationMode) -> Self {
        Self {
            mode,
            dry_run: false,
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn mode(&self) -> RelocationMode {
        self.mode
    }

    /// Apply every entry of the plan in order
    pub fn apply(&self, plan: &RelocationPlan) -> Vec<RelocationResult> {
        let results: Vec<RelocationResult> = plan
            .moves
            .iter()
            .map(|entry| {
                let (source, destination) = plan.resolve(entry);
                let outcome = self.relocate(&source, &destination);
                RelocationResult {
                    source,
                    destination,
                    outcome,
                }
            })
            .collect();

        info!(
            entries = results.len(),
            failed = results.iter().filter(|r| r.outcome.is_failure()).count(),
            dry_run = self.dry_run,
            "relocation plan applied"
        );
        results
    }

    /// Relocate a single file or directory
    pub fn relocate(&self, source: &Path, destination: &Path) -> RelocationOutcome {
        if destination.exists() {
            debug!(destination = %destination.display(), "destination exists, skipping");
            return RelocationOutcome::SkippedExists;
        }
        if !source.exists() {
            warn!(source = %source.display(), "relocation source missing");
            return RelocationOutcome::SourceMissing;
        }
        if self.dry_run {
            info!(
                from = %source.display(),
                to = %destination.display(),
                mode = ?self.mode,
                "would relocate"
            );
            return RelocationOutcome::Planned;
        }

        let result = match self.mode {
            RelocationMode::Copy => copy_path(source, destination).map(|()| RelocationOutcome::Copied),
            RelocationMode::Move => move_path(source, destination).map(|()| RelocationOutcome::Moved),
        };

        result.unwrap_or_else(|e| {
            warn!(from = %source.display(), to = %destination.display(), error = %e, "relocation failed");
            RelocationOutcome::Failed(e.to_string())
        })
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

/// Copy, removing a partial destination on failure so a re-run retries it
fn copy_path(source: &Path, destination: &Path) -> std::io::Result<()> {
    ensure_parent(destination)?;
    let result = if source.is_dir() {
        copy_dir(source, destination)
    } else {
        std::fs::copy(source, destination).map(|_| ())
    };
    if result.is_err() {
        remove_partial(destination);
    }
    result
}

fn remove_partial(destination: &Path) {
    let removed = match std::fs::symlink_metadata(destination) {
        Ok(meta) if meta.is_dir() => std::fs::remove_dir_all(destination),
        Ok(_) => std::fs::remove_file(destination),
        Err(_) => return,
    };
    if let Err(e) = removed {
        warn!(destination = %destination.display(), error = %e, "could not remove partial copy");
    }
}

fn copy_dir(source: &Path, destination: &Path) -> std::io::Result<()> {
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::other)?;
        let relative = entry.path().strip_prefix(source).map_err(std::io::Error::other)?;
        let target = destination.join(relative);
        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn move_path(source: &Path, destination: &Path) -> std::io::Result<()> {
    ensure_parent(destination)?;
    if std::fs::rename(source, destination).is_ok() {
        return Ok(());
    }
    // rename fails across filesystems; a failed copy leaves the source intact
    copy_path(source, destination)?;
    if source.is_dir() {
        std::fs::remove_dir_all(source)
    } else {
        std::fs::remove_file(source)
    }
}

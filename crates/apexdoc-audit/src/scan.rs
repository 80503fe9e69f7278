//! Shared file-scanning helpers.

use crate::AuditConfig;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// True if the path's extension matches one of `extensions` (case-insensitive, no dot).
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Collect files under the configured root whose extension is in `extensions`.
///
/// Returns an empty list when the root does not exist. Entries are sorted by
/// file name so reports are stable between runs.
pub fn collect_files(config: &AuditConfig, extensions: &[&str]) -> Vec<PathBuf> {
    if !config.root_exists() {
        return Vec::new();
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };

    WalkDir::new(&config.root)
        .max_depth(max_depth)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_excluded(config, e.path()))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file() && has_extension(e.path(), extensions))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

/// Exclude patterns are matched against the path below the root, with a
/// leading `/`, so `/target/` only hits a `target` directory inside the scan.
fn is_excluded(config: &AuditConfig, path: &Path) -> bool {
    let relative = path.strip_prefix(&config.root).unwrap_or(path);
    config.should_exclude(&Path::new("/").join(relative))
}

/// Render `path` relative to `base`, falling back to the full path.
pub fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

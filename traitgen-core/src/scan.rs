//! Parallel, deterministic file discovery with directory pruning.
//!
//! Uses `WalkDir::filter_entry` for O(1) subtree skipping of excluded
//! directories and Rayon's `par_bridge` for the remaining entries. The
//! result is sorted so downstream declaration order (and therefore the
//! locator's first-match tie-break) is stable across runs.

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories to exclude by default (standard Rust project conventions).
const EXCLUDED_DIRS: &[&str] = &["target", ".git", "node_modules", ".cargo"];

/// Checks if a directory entry should be pruned from traversal.
#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers all `.rs` files under `root`, sorted by path.
///
/// Automatically excludes `target/`, `.git/`, `node_modules/`, and
/// `.cargo/`.
pub fn gather_rs_files(root: &Path) -> Result<Vec<PathBuf>> {
    gather_rs_files_with_excludes(root, &[])
}

/// Gathers all `.rs` files with additional exclusion patterns.
pub fn gather_rs_files_with_excludes(root: &Path, excludes: &[&str]) -> Result<Vec<PathBuf>> {
    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        // filter_entry prunes entire subtrees before iteration
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if path.is_file() && path.extension().is_some_and(|ext| ext == "rs") {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .context(format!("Failed to gather .rs files from {}", root.display()))?;

    // par_bridge yields in nondeterministic order; sort for stability.
    files.sort();
    Ok(files)
}

//! Source tree discovery.
//!
//! Walks a source root depth-first and returns every file under it as a flat,
//! ordered list of [`SourceEntry`] values. Directories are structural only and
//! never appear in the result.
//!
//! ## Exclusions
//!
//! Each entry's base name is checked against an [`ExclusionSet`]:
//!
//! - an excluded **directory** is pruned with its whole subtree
//! - an excluded **file** is skipped on its own
//!
//! The root itself is never excluded; naming it is an explicit choice by the
//! caller. An optional `prune` path additionally keeps one exact directory out
//! of the walk, which is how the dispatcher stops an output root nested inside
//! the source root from being read back as source.
//!
//! ## Ordering
//!
//! Children are visited in file-name order, so the result is a stable
//! pre-order for a given filesystem snapshot:
//!
//! ```text
//! site/                 →  site/a.md
//! ├── a.md                 site/b/c.css
//! ├── b/                   site/b/d/e.md
//! │   ├── c.css            site/z.txt
//! │   └── d/
//! │       └── e.md
//! └── z.txt
//! ```
//!
//! ## Errors
//!
//! An unreadable entry aborts the walk under [`ErrorPolicy::FailFast`]. Under
//! [`ErrorPolicy::CollectAll`] the walk records the error, skips the entry,
//! and carries on.

use crate::build::ErrorPolicy;
use crate::names::ExclusionSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Unable to read {}: {source}", .path.display())]
    Entry {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Path {} is not under source root {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },
}

/// A file discovered under a source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Root the walk started from.
    pub root: PathBuf,
    /// Full path as produced by the walk (`root` joined with `relative`).
    pub path: PathBuf,
    /// Path relative to `root`.
    pub relative: PathBuf,
}

impl SourceEntry {
    /// Build an entry for `path`, which must lie under `root`.
    pub fn new(root: &Path, path: &Path) -> Result<Self, WalkError> {
        let relative = path
            .strip_prefix(root)
            .map_err(|_| WalkError::OutsideRoot {
                path: path.to_path_buf(),
                root: root.to_path_buf(),
            })?
            .to_path_buf();
        Ok(Self {
            root: root.to_path_buf(),
            path: path.to_path_buf(),
            relative,
        })
    }

    /// Containing directory relative to the root; empty for top-level files.
    pub fn relative_dir(&self) -> &Path {
        self.relative.parent().unwrap_or(Path::new(""))
    }

    pub fn file_name(&self) -> &OsStr {
        self.path.file_name().unwrap_or(self.path.as_os_str())
    }
}

/// Everything a policy-aware walk found, plus what it could not read.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    pub entries: Vec<SourceEntry>,
    pub errors: Vec<WalkError>,
}

/// Walk `root` and return every non-excluded file, stopping at the first error.
pub fn walk(root: &Path, excludes: &ExclusionSet) -> Result<Vec<SourceEntry>, WalkError> {
    let mut outcome = walk_with_policy(root, excludes, None, ErrorPolicy::FailFast);
    match outcome.errors.pop() {
        Some(err) => Err(err),
        None => Ok(outcome.entries),
    }
}

/// Walk `root`, never descending into `prune`, following `policy` on errors.
///
/// Under [`ErrorPolicy::FailFast`] the outcome holds at most one error and no
/// entries discovered after it.
pub fn walk_with_policy(
    root: &Path,
    excludes: &ExclusionSet,
    prune: Option<&Path>,
    policy: ErrorPolicy,
) -> WalkOutcome {
    let mut outcome = WalkOutcome::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| keep_entry(e, excludes, prune));

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let path = err
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                log::debug!("walk error at {}: {}", path.display(), err);
                outcome.errors.push(WalkError::Entry { path, source: err });
                if policy == ErrorPolicy::FailFast {
                    break;
                }
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        match SourceEntry::new(root, entry.path()) {
            Ok(source) => outcome.entries.push(source),
            Err(err) => {
                outcome.errors.push(err);
                if policy == ErrorPolicy::FailFast {
                    break;
                }
            }
        }
    }

    outcome
}

fn keep_entry(entry: &DirEntry, excludes: &ExclusionSet, prune: Option<&Path>) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if prune.is_some_and(|p| entry.path() == p) {
        log::debug!("pruning output root {}", entry.path().display());
        return false;
    }
    match entry.file_name().to_str() {
        Some(name) if excludes.contains(name) => {
            log::debug!("excluding {}", entry.path().display());
            false
        }
        _ => true,
    }
}

//! Output-tree writes.
//!
//! Three primitives, all with truncate-and-overwrite semantics:
//!
//! - [`ensure_dir`]: recursive, idempotent directory creation. An existing
//!   directory (including one created concurrently) is success.
//! - [`write_file`]: write converted bytes to a destination.
//! - [`copy_file`]: byte-for-byte copy of a passthrough file.
//!
//! Errors always name the path that failed.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error("Unable to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to copy {} to {}: {source}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid copy: {0}")]
    Precondition(String),
}

pub fn ensure_dir(path: &Path) -> Result<(), MaterializeError> {
    fs::create_dir_all(path).map_err(|source| MaterializeError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_file(path: &Path, bytes: &[u8]) -> Result<(), MaterializeError> {
    fs::write(path, bytes).map_err(|source| MaterializeError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Copy `from` to `to`, replacing any existing file at `to`.
///
/// Empty paths and `from == to` are rejected before touching the filesystem.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64, MaterializeError> {
    if from.as_os_str().is_empty() {
        return Err(MaterializeError::Precondition(
            "no source file specified".into(),
        ));
    }
    if to.as_os_str().is_empty() {
        return Err(MaterializeError::Precondition(format!(
            "no destination specified for {}",
            from.display()
        )));
    }
    if from == to {
        return Err(MaterializeError::Precondition(format!(
            "{} and {} are the same",
            from.display(),
            to.display()
        )));
    }
    fs::copy(from, to).map_err(|source| MaterializeError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_dir_creates_nested() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a/b/c");
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("out");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn ensure_dir_concurrent_overlap() {
        let tmp = TempDir::new().unwrap();
        let base = tmp.path().to_path_buf();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let base = base.clone();
                std::thread::spawn(move || ensure_dir(&base.join("shared/deep").join(i.to_string())))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert!(base.join("shared/deep/7").is_dir());
    }

    #[test]
    fn ensure_dir_over_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("taken");
        fs::write(&file, "x").unwrap();
        let result = ensure_dir(&file.join("sub"));
        assert!(matches!(result, Err(MaterializeError::CreateDir { .. })));
    }

    #[test]
    fn write_file_truncates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("index.html");
        write_file(&path, b"a much longer first version").unwrap();
        write_file(&path, b"short").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"short");
    }

    #[test]
    fn write_file_missing_parent_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = write_file(&tmp.path().join("missing/index.html"), b"x");
        assert!(matches!(result, Err(MaterializeError::Write { .. })));
    }

    #[test]
    fn copy_file_copies_bytes_and_overwrites() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("style.css");
        let to = tmp.path().join("copy.css");
        fs::write(&from, "body{}").unwrap();
        fs::write(&to, "old contents that are longer").unwrap();

        let n = copy_file(&from, &to).unwrap();
        assert_eq!(n, 6);
        assert_eq!(fs::read(&to).unwrap(), b"body{}");
    }

    #[test]
    fn copy_file_rejects_same_path() {
        let path = Path::new("same.css");
        let result = copy_file(path, path);
        assert!(matches!(result, Err(MaterializeError::Precondition(_))));
    }

    #[test]
    fn copy_file_rejects_empty_paths() {
        assert!(matches!(
            copy_file(Path::new(""), Path::new("to")),
            Err(MaterializeError::Precondition(_))
        ));
        assert!(matches!(
            copy_file(Path::new("from"), Path::new("")),
            Err(MaterializeError::Precondition(_))
        ));
    }

    #[test]
    fn copy_file_missing_source_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = copy_file(&tmp.path().join("missing"), &tmp.path().join("to"));
        assert!(matches!(result, Err(MaterializeError::Copy { .. })));
    }
}

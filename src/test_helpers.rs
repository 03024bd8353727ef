//! Shared test utilities: build a source tree on disk, read an output tree back.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_tree(tmp.path(), &[
//!     ("index.md", "# Hi"),
//!     ("css/root.css", "html {}"),
//! ]);
//!
//! let out = read_tree(tmp.path());
//! assert_eq!(out["css/root.css"], b"html {}");
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create each `(relative path, contents)` pair under `root`, making parent
/// directories as needed.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, contents).unwrap();
    }
}

// =========================================================================
// Output inspection
// =========================================================================

/// Every file under `root`, keyed by `/`-separated relative path.
///
/// Returns an empty map if `root` does not exist.
pub fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut files = BTreeMap::new();
    if root.exists() {
        collect(root, root, &mut files);
    }
    files
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let rel = path
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            files.insert(rel, fs::read(&path).unwrap());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn write_then_read_tree() {
        let tmp = TempDir::new().unwrap();
        write_tree(
            tmp.path(),
            &[("index.html", "<h1>hello</h1>"), ("assets/img/bg.css", "body{}")],
        );

        let tree = read_tree(tmp.path());
        let keys: Vec<&str> = tree.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["assets/img/bg.css", "index.html"]);
    }

    #[test]
    fn read_missing_tree_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_tree(&tmp.path().join("missing")).is_empty());
    }
}

//! Document vs passthrough classification.
//!
//! A file is a **document** when its extension, taken as the substring from
//! the last `.` of the base name through the end (dot included), is an exact,
//! case-sensitive member of the configured [`DocumentExtensionSet`]. Every
//! other file is **passthrough** and gets copied byte-for-byte.
//!
//! | File name | Extension | With `{.md}` |
//! |-----------|-----------|--------------|
//! | `index.md` | `.md` | document |
//! | `notes.MD` | `.MD` | passthrough |
//! | `a.tar.md` | `.md` | document |
//! | `Makefile` | (empty) | passthrough |
//! | `.gitignore` | `.gitignore` | passthrough |
//!
//! File names that are not valid UTF-8 are always passthrough.

use crate::names::DocumentExtensionSet;
use serde::Serialize;
use std::path::Path;

/// Extension given to converted documents.
pub const HTML_EXTENSION: &str = ".html";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Document,
    Passthrough,
}

/// Decides per file whether it gets converted or copied.
#[derive(Debug, Clone)]
pub struct Classifier {
    extensions: DocumentExtensionSet,
}

impl Classifier {
    pub fn new(extensions: DocumentExtensionSet) -> Self {
        Self { extensions }
    }

    pub fn extensions(&self) -> &DocumentExtensionSet {
        &self.extensions
    }

    pub fn is_document(&self, path: &Path) -> bool {
        self.classify(path) == ContentKind::Document
    }

    pub fn classify(&self, path: &Path) -> ContentKind {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return ContentKind::Passthrough;
        };
        let ext = extension_of(name);
        if !ext.is_empty() && self.extensions.contains(ext) {
            ContentKind::Document
        } else {
            ContentKind::Passthrough
        }
    }
}

/// Substring from the last `.` to the end of `name`, dot included.
///
/// Returns `""` when the name has no dot.
pub fn extension_of(name: &str) -> &str {
    name.rfind('.').map(|pos| &name[pos..]).unwrap_or("")
}

/// Replace a document's extension with `.html`.
///
/// `index.md` → `index.html`, `a.tar.markdown` → `a.tar.html`.
pub fn html_file_name(name: &str) -> String {
    let ext = extension_of(name);
    format!("{}{}", &name[..name.len() - ext.len()], HTML_EXTENSION)
}

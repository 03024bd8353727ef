//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure and do no I/O.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Documents
//! 001 index.md → index.html
//! 002 blog/may.md → blog/may.html
//!
//! Passthrough
//! 001 css/root.css
//!
//! 2 documents, 1 passthrough file
//! ```
//!
//! ## Build (one line per event, as entries complete)
//!
//! ```text
//! convert index.md → index.html
//! copy    css/root.css
//! FAILED  broken.md: Unable to convert …
//! ```

use crate::build::{BuildEvent, BuildReport, PlannedEntry};
use crate::classify::ContentKind;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Forward-slash display of a relative path.
fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

fn plural(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("{n} {singular}")
    } else {
        format!("{n} {plural}")
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the build plan: documents first, then passthrough files.
pub fn format_plan(planned: &[PlannedEntry]) -> Vec<String> {
    let mut lines = Vec::new();

    let documents: Vec<&PlannedEntry> = planned
        .iter()
        .filter(|p| p.kind == ContentKind::Document)
        .collect();
    let passthrough: Vec<&PlannedEntry> = planned
        .iter()
        .filter(|p| p.kind == ContentKind::Passthrough)
        .collect();

    if !documents.is_empty() {
        lines.push("Documents".to_string());
        for (i, entry) in documents.iter().enumerate() {
            lines.push(format!(
                "{} {} \u{2192} {}",
                format_index(i + 1),
                display_path(&entry.source.relative),
                display_path(&entry.target_relative)
            ));
        }
    }

    if !passthrough.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Passthrough".to_string());
        for (i, entry) in passthrough.iter().enumerate() {
            lines.push(format!(
                "{} {}",
                format_index(i + 1),
                display_path(&entry.source.relative)
            ));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "{}, {}",
        plural(documents.len(), "document", "documents"),
        plural(passthrough.len(), "passthrough file", "passthrough files")
    ));
    lines
}

pub fn print_plan(planned: &[PlannedEntry]) {
    for line in format_plan(planned) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format a single build progress event.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::Converted { source, target } => vec![format!(
            "convert {} \u{2192} {}",
            display_path(source),
            display_path(target)
        )],
        BuildEvent::Copied { source, .. } => vec![format!("copy    {}", display_path(source))],
        BuildEvent::Failed { source, message } => {
            vec![format!("FAILED  {}: {}", display_path(source), message)]
        }
    }
}

/// Format the closing summary of a successful build.
pub fn format_build_summary(report: &BuildReport, output_root: &Path) -> Vec<String> {
    vec![format!(
        "Converted {}, copied {} \u{2192} {}",
        plural(report.converted(), "document", "documents"),
        plural(report.copied(), "file", "files"),
        output_root.display()
    )]
}

pub fn print_build_summary(report: &BuildReport, output_root: &Path) {
    for line in format_build_summary(report, output_root) {
        println!("{}", line);
    }
}

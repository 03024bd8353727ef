//! Site configuration.
//!
//! Loads `microcms.toml` from the source root, layers it over the stock
//! defaults, rejects unknown keys, and validates the result. A missing file
//! means "all defaults".
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_dir = "WWW"            # Relative paths resolve against the source root
//! error_policy = "fail-fast"    # or "collect-all"
//! exclude = ["node_modules", "main.bak", ".git", "pub", ".DS_Store", ".gitignore"]
//! document_extensions = [".md", ".mkd", ".mdwn", ".mdown", ".mdtxt", ".mdtext", ".markdown"]
//!
//! [markdown]
//! tables = true
//! footnotes = true
//! strikethrough = true
//! tasklists = true
//! smart_punctuation = false
//! heading_attributes = false
//!
//! [page]
//! standalone = false            # Wrap converted documents in a full HTML page
//! title = "powered by microCMS" # Used when a document has no `# ` heading
//! language = "en"
//! stylesheets = []
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [page]
//! standalone = true
//! stylesheets = ["theme.css"]
//! ```
//!
//! `exclude` and `document_extensions` replace the default lists entirely.
//! The config file itself is always excluded from the walk.

use crate::build::ErrorPolicy;
use crate::names::{DEFAULT_DOCUMENT_EXTENSIONS, DEFAULT_EXCLUDES};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the config file looked up in the source root.
pub const CONFIG_FILE_NAME: &str = "microcms.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `microcms.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Output root. Relative paths resolve against the source root.
    pub output_dir: String,
    /// Abort on the first error, or finish the run and report every error.
    pub error_policy: ErrorPolicy,
    /// Directory and file names skipped during the walk.
    pub exclude: Vec<String>,
    /// Extensions (dot included) converted to HTML.
    pub document_extensions: Vec<String>,
    /// Markdown parser extensions.
    pub markdown: MarkdownConfig,
    /// Standalone page shell settings.
    pub page: PageConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            output_dir: "WWW".to_string(),
            error_policy: ErrorPolicy::default(),
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            document_extensions: DEFAULT_DOCUMENT_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            markdown: MarkdownConfig::default(),
            page: PageConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        for ext in &self.document_extensions {
            if !ext.starts_with('.') || ext.len() < 2 {
                return Err(ConfigError::Validation(format!(
                    "document_extensions entry {ext:?} must start with '.' followed by at least one character"
                )));
            }
        }
        if self.exclude.iter().any(|name| name.is_empty()) {
            return Err(ConfigError::Validation(
                "exclude entries must not be empty".into(),
            ));
        }
        if self.page.language.trim().is_empty() {
            return Err(ConfigError::Validation(
                "page.language must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Markdown extensions passed to the parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarkdownConfig {
    pub tables: bool,
    pub footnotes: bool,
    pub strikethrough: bool,
    pub tasklists: bool,
    /// Curly quotes, en/em dashes, ellipses.
    pub smart_punctuation: bool,
    /// `# Heading {#id .class}` syntax.
    pub heading_attributes: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            tables: true,
            footnotes: true,
            strikethrough: true,
            tasklists: true,
            smart_punctuation: false,
            heading_attributes: false,
        }
    }
}

/// Full-page wrapper applied to converted documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageConfig {
    /// When false, documents convert to bare HTML fragments.
    pub standalone: bool,
    /// Fallback `<title>` for documents without a `# ` heading.
    pub title: String,
    /// Value of `<html lang>`.
    pub language: String,
    /// Stylesheet hrefs, linked in order.
    pub stylesheets: Vec<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            standalone: false,
            title: "powered by microCMS".to_string(),
            language: "en".to_string(),
            stylesheets: Vec::new(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SiteConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `microcms.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `microcms.toml` in `source_root`, defaults if absent.
pub fn load_config(source_root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(source_root)?;
    let config = resolve_config(base, overlay)?;
    log::debug!(
        "config: output_dir={} policy={:?} {} exclusions, {} document extensions",
        config.output_dir,
        config.error_policy,
        config.exclude.len(),
        config.document_extensions.len()
    );
    Ok(config)
}

/// Returns a fully-commented stock `microcms.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# microCMS Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Place this file in the source root
# as microcms.toml; it is never copied to the output.
# Unknown keys will cause an error.

# Output directory. A relative path is resolved against the source root and
# is kept out of the walk automatically.
output_dir = "WWW"

# What to do when a file cannot be read, converted, or written:
#   "fail-fast"   stop at the first error (default)
#   "collect-all" process everything else, then report every error
error_policy = "fail-fast"

# Directory and file names to skip. A matching directory is skipped with
# everything beneath it. Matching is exact and case-sensitive.
# Setting this replaces the whole list.
exclude = ["node_modules", "main.bak", ".git", "pub", ".DS_Store", ".gitignore"]

# Extensions (dot included, case-sensitive) converted from Markdown to HTML.
# Every other file is copied unchanged.
document_extensions = [".md", ".mkd", ".mdwn", ".mdown", ".mdtxt", ".mdtext", ".markdown"]

# ---------------------------------------------------------------------------
# Markdown extensions
# ---------------------------------------------------------------------------
[markdown]
tables = true
footnotes = true
strikethrough = true
tasklists = true
# Curly quotes, dashes, and ellipses.
smart_punctuation = false
# `# Heading {#id .class}` syntax.
heading_attributes = false

# ---------------------------------------------------------------------------
# Standalone pages
# ---------------------------------------------------------------------------
[page]
# Wrap each converted document in a complete HTML page.
standalone = false
# <title> for documents without a top-level "# " heading.
title = "powered by microCMS"
# <html lang="...">
language = "en"
# Stylesheet hrefs, linked in order. Local paths or URLs.
stylesheets = []
"##
}

//! Markdown → HTML conversion.
//!
//! The dispatcher only knows the [`Converter`] trait: bytes in, HTML bytes
//! out, or an error. It never sees partial output. [`MarkdownConverter`] is
//! the production implementation, backed by `pulldown-cmark`.
//!
//! A converter is a pure function of its input. Converting the same bytes
//! twice yields the same HTML, which is what makes rebuilds byte-identical.
//!
//! ## Standalone pages
//!
//! By default a document converts to an HTML fragment (`<h1>Hi</h1>\n`).
//! With `[page] standalone = true` the fragment is wrapped in a full page
//! shell (see [`crate::page`]) whose title comes from the document's first
//! `# ` heading.

use crate::config::{MarkdownConfig, PageConfig, SiteConfig};
use crate::page;
use pulldown_cmark::{Options, Parser, html as md_html};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Document is not valid UTF-8 (at byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
    #[error("Unable to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Conversion failed: {0}")]
    Failed(String),
}

/// Turns document bytes into HTML bytes.
pub trait Converter {
    fn convert(&self, source: &[u8]) -> Result<Vec<u8>, ConvertError>;
}

/// CommonMark converter with configurable extensions.
#[derive(Debug, Clone)]
pub struct MarkdownConverter {
    options: Options,
    page: Option<PageConfig>,
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

impl MarkdownConverter {
    pub fn new(markdown: &MarkdownConfig) -> Self {
        Self {
            options: parser_options(markdown),
            page: None,
        }
    }

    pub fn from_config(config: &SiteConfig) -> Self {
        let converter = Self::new(&config.markdown);
        if config.page.standalone {
            converter.with_page(config.page.clone())
        } else {
            converter
        }
    }

    /// Wrap every converted document in a full HTML page.
    pub fn with_page(mut self, page: PageConfig) -> Self {
        self.page = Some(page);
        self
    }

    /// Render Markdown text to an HTML fragment.
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        md_html::push_html(&mut out, parser);
        out
    }

    /// Read `path` and convert it, as a single-document entry point.
    pub fn convert_file(&self, path: &Path) -> Result<Vec<u8>, ConvertError> {
        let bytes = fs::read(path).map_err(|source| ConvertError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.convert(&bytes)
    }
}

impl Converter for MarkdownConverter {
    fn convert(&self, source: &[u8]) -> Result<Vec<u8>, ConvertError> {
        let markdown = std::str::from_utf8(source).map_err(|e| ConvertError::InvalidUtf8 {
            valid_up_to: e.valid_up_to(),
        })?;
        let article = self.render(markdown);

        let html = match &self.page {
            Some(page_config) => {
                let title = first_heading(markdown).unwrap_or(&page_config.title);
                page::render_page(&article, title, page_config).into_string()
            }
            None => article,
        };
        Ok(html.into_bytes())
    }
}

fn parser_options(markdown: &MarkdownConfig) -> Options {
    let mut options = Options::empty();
    if markdown.tables {
        options.insert(Options::ENABLE_TABLES);
    }
    if markdown.footnotes {
        options.insert(Options::ENABLE_FOOTNOTES);
    }
    if markdown.strikethrough {
        options.insert(Options::ENABLE_STRIKETHROUGH);
    }
    if markdown.tasklists {
        options.insert(Options::ENABLE_TASKLISTS);
    }
    if markdown.smart_punctuation {
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
    }
    if markdown.heading_attributes {
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);
    }
    options
}

/// Text of the first `# ` heading line, if any.
fn first_heading(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim())
        .filter(|title| !title.is_empty())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Converter double that records its inputs and fails on a marker.
    #[derive(Default)]
    pub struct MockConverter {
        pub fail_marker: Option<Vec<u8>>,
        pub calls: RefCell<Vec<Vec<u8>>>,
    }

    impl MockConverter {
        pub fn new() -> Self {
            Self::default()
        }

        /// Fail any input containing `marker`.
        pub fn failing_on(marker: &str) -> Self {
            Self {
                fail_marker: Some(marker.as_bytes().to_vec()),
                calls: RefCell::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }
    }

    impl Converter for MockConverter {
        fn convert(&self, source: &[u8]) -> Result<Vec<u8>, ConvertError> {
            self.calls.borrow_mut().push(source.to_vec());
            if let Some(marker) = &self.fail_marker
                && source.windows(marker.len()).any(|w| w == marker.as_slice())
            {
                return Err(ConvertError::Failed(
                    String::from_utf8_lossy(source).into_owned(),
                ));
            }
            let mut out = b"<converted>".to_vec();
            out.extend_from_slice(source);
            out.extend_from_slice(b"</converted>");
            Ok(out)
        }
    }

    #[test]
    fn converts_heading() {
        let converter = MarkdownConverter::default();
        let html = converter.convert(b"# Hi").unwrap();
        assert_eq!(String::from_utf8(html).unwrap(), "<h1>Hi</h1>\n");
    }

    #[test]
    fn converts_paragraph_and_emphasis() {
        let converter = MarkdownConverter::default();
        let html = converter.render("hello, *world*.");
        assert_eq!(html, "<p>hello, <em>world</em>.</p>\n");
    }

    #[test]
    fn invalid_utf8_is_error() {
        let converter = MarkdownConverter::default();
        let result = converter.convert(b"# ok\n\xff\xfe");
        assert!(matches!(
            result,
            Err(ConvertError::InvalidUtf8 { valid_up_to: 5 })
        ));
    }

    #[test]
    fn conversion_is_deterministic() {
        let converter = MarkdownConverter::default();
        let source = b"# Title\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        assert_eq!(
            converter.convert(source).unwrap(),
            converter.convert(source).unwrap()
        );
    }

    #[test]
    fn tables_enabled_by_default() {
        let converter = MarkdownConverter::default();
        let html = converter.render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn tables_can_be_disabled() {
        let markdown = MarkdownConfig {
            tables: false,
            ..MarkdownConfig::default()
        };
        let converter = MarkdownConverter::new(&markdown);
        let html = converter.render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn strikethrough_enabled_by_default() {
        let converter = MarkdownConverter::default();
        assert!(converter.render("~~gone~~").contains("<del>gone</del>"));
    }

    #[test]
    fn standalone_page_uses_first_heading_as_title() {
        let converter = MarkdownConverter::default().with_page(PageConfig::default());
        let html = String::from_utf8(converter.convert(b"# Welcome\n\ntext").unwrap()).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Welcome</title>"));
        assert!(html.contains("<h1>Welcome</h1>"));
    }

    #[test]
    fn standalone_page_falls_back_to_configured_title() {
        let page = PageConfig {
            title: "My Site".to_string(),
            ..PageConfig::default()
        };
        let converter = MarkdownConverter::default().with_page(page);
        let html = String::from_utf8(converter.convert(b"no heading").unwrap()).unwrap();
        assert!(html.contains("<title>My Site</title>"));
    }

    #[test]
    fn from_config_respects_standalone_flag() {
        let mut config = SiteConfig::default();
        let fragment = MarkdownConverter::from_config(&config).convert(b"# a").unwrap();
        assert!(!String::from_utf8(fragment).unwrap().contains("<html"));

        config.page.standalone = true;
        let page = MarkdownConverter::from_config(&config).convert(b"# a").unwrap();
        assert!(String::from_utf8(page).unwrap().contains("<html"));
    }

    #[test]
    fn first_heading_skips_subheadings() {
        assert_eq!(first_heading("## sub\n# Main\n"), Some("Main"));
        assert_eq!(first_heading("no heading"), None);
        assert_eq!(first_heading("#   \n"), None);
    }

    #[test]
    fn convert_file_missing_is_read_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = MarkdownConverter::default().convert_file(&tmp.path().join("missing.md"));
        assert!(matches!(result, Err(ConvertError::Read { .. })));
    }

    #[test]
    fn mock_converter_records_and_fails() {
        let mock = MockConverter::failing_on("BAD");
        assert!(mock.convert(b"fine").is_ok());
        assert!(mock.convert(b"this is BAD").is_err());
        assert_eq!(mock.call_count(), 2);
    }
}

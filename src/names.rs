//! Sorted name sets for exclusion and document-extension lookups.
//!
//! Both the walk exclusions (`.git`, `node_modules`, ...) and the document
//! extensions (`.md`, `.markdown`, ...) are small, fixed lists of strings that
//! get queried once per filesystem entry. They share one representation:
//!
//! ```text
//! NameSetBuilder  (unsorted, accepts inserts)
//!       │ finish()   sort + dedup, exactly once
//!       ▼
//! NameSet         (immutable, binary-searched)
//! ```
//!
//! Finalizing up front means a [`NameSet`] is never mutated by a query, so it
//! is `Send + Sync` and can be shared by reference across a whole build.
//!
//! Matching is exact and case-sensitive: `.MD` is not `.md`, and there is no
//! glob or prefix matching.

/// Directory and file names skipped by the walker unless configured otherwise.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules",
    "main.bak",
    ".git",
    "pub",
    ".DS_Store",
    ".gitignore",
];

/// File extensions (dot included) treated as Markdown documents by default.
pub const DEFAULT_DOCUMENT_EXTENSIONS: &[&str] = &[
    ".md", ".mkd", ".mdwn", ".mdown", ".mdtxt", ".mdtext", ".markdown",
];

/// Names the walker prunes: a matching directory skips its whole subtree,
/// a matching file skips just that file.
pub type ExclusionSet = NameSet;

/// Extensions whose files are converted rather than copied.
pub type DocumentExtensionSet = NameSet;

/// Collects names before they are frozen into a [`NameSet`].
#[derive(Debug, Clone, Default)]
pub struct NameSetBuilder {
    names: Vec<String>,
}

impl NameSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> &mut Self {
        self.names.push(name.into());
        self
    }

    pub fn extend<I, S>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sort ascending by byte order and drop duplicates.
    pub fn finish(self) -> NameSet {
        let mut names = self.names;
        names.sort_unstable();
        names.dedup();
        NameSet { names }
    }
}

/// An immutable, sorted, deduplicated set of names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NameSet {
    names: Vec<String>,
}

impl NameSet {
    pub fn builder() -> NameSetBuilder {
        NameSetBuilder::new()
    }

    /// Exact, case-sensitive membership.
    pub fn contains(&self, name: &str) -> bool {
        self.names
            .binary_search_by(|probe| probe.as_str().cmp(name))
            .is_ok()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut builder = NameSetBuilder::new();
        builder.extend(iter);
        builder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finish_sorts_and_dedups() {
        let mut builder = NameSet::builder();
        builder.extend(["pub", ".git", "node_modules", ".git"]);
        let set = builder.finish();

        let names: Vec<&str> = set.iter().collect();
        assert_eq!(names, vec![".git", "node_modules", "pub"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn contains_exact_match_only() {
        let set: NameSet = DEFAULT_EXCLUDES.iter().copied().collect();

        assert!(set.contains(".git"));
        assert!(set.contains("node_modules"));
        assert!(!set.contains(".gi"));
        assert!(!set.contains(".gitx"));
        assert!(!set.contains("node"));
    }

    #[test]
    fn contains_is_case_sensitive() {
        let set: NameSet = DEFAULT_DOCUMENT_EXTENSIONS.iter().copied().collect();

        assert!(set.contains(".md"));
        assert!(!set.contains(".MD"));
        assert!(!set.contains(".Markdown"));
    }

    #[test]
    fn first_and_last_elements_found() {
        let set: NameSet = ["b", "a", "c"].into_iter().collect();
        assert!(set.contains("a"));
        assert!(set.contains("c"));
        assert!(!set.contains(""));
        assert!(!set.contains("d"));
    }

    #[test]
    fn empty_set_contains_nothing() {
        let set = NameSet::builder().finish();
        assert!(set.is_empty());
        assert!(!set.contains(".git"));
        assert!(!set.contains(""));
    }

    #[test]
    fn insert_chains() {
        let mut builder = NameSetBuilder::new();
        builder.insert("WWW").insert("microcms.toml");
        let set = builder.finish();
        assert!(set.contains("WWW"));
        assert!(set.contains("microcms.toml"));
    }

    #[test]
    fn name_set_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<NameSet>();
    }
}

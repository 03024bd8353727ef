//! # microCMS
//!
//! Turns a project directory into a publishable site. Every file under the
//! source root is mirrored into an output root at the same relative path:
//! Markdown documents become HTML, everything else is copied unchanged.
//!
//! ```text
//! project/                     project/WWW/
//! ├── index.md          →      ├── index.html
//! ├── css/root.css      →      ├── css/root.css
//! ├── blog/2023/may.md  →      ├── blog/2023/may.html
//! ├── .git/…            ✗      └── (excluded)
//! └── microcms.toml     ✗
//! ```
//!
//! # Architecture: One-Way Pipeline
//!
//! ```text
//! source root → walk → [SourceEntry] → classify → convert | copy → output root
//! ```
//!
//! Data only flows forward. Nothing is mutated after it is produced, and a
//! build either finishes or stops at its first error (see
//! [`build::ErrorPolicy`] for the collect-all alternative).
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`names`] | Sorted, immutable name sets for exclusions and document extensions |
//! | [`walk`] | Depth-first source discovery with subtree pruning |
//! | [`classify`] | Document vs passthrough decision by exact extension match |
//! | [`convert`] | `Converter` trait and the `pulldown-cmark` implementation |
//! | [`page`] | Optional standalone HTML page shell (Maud) |
//! | [`materialize`] | Idempotent directory creation, file writes and copies |
//! | [`build`] | The dispatcher: mirrors the walk into the output root |
//! | [`config`] | `microcms.toml` loading, merging, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Settings, No Globals
//!
//! Exclusions, document extensions, and the error policy travel in a
//! [`build::BuildSettings`] value built once from config. The name sets are
//! sorted when they are built, not on first lookup, so they are immutable for
//! the whole run.
//!
//! ## Output Inside Source
//!
//! The default output root (`WWW`) lives inside the project it is built from.
//! [`build::BuildRoots`] notices this and the walk prunes that exact path, so
//! a second build never reads the first build's output back in.
//!
//! ## Sequential by Default
//!
//! Entries are processed one at a time in walk order. Output is a pure
//! function of the source tree, so two builds of the same tree produce
//! byte-identical output.

pub mod build;
pub mod classify;
pub mod config;
pub mod convert;
pub mod materialize;
pub mod names;
pub mod output;
pub mod page;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;

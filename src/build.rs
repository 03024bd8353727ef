//! The build: walk, classify, convert or copy, mirror.
//!
//! ```text
//! source root ──walk──▶ [SourceEntry] ──classify──▶ document ──convert──▶ write  ─┐
//!                                                 └▶ passthrough ──────────▶ copy ─┴─▶ output root
//! ```
//!
//! Every discovered file lands at the same relative path under the output
//! root. Documents swap their extension for `.html`; passthrough files keep
//! their name and bytes. Target directories are created on demand, once.
//!
//! ## Ordering and errors
//!
//! Entries are processed strictly in walk order, one at a time. Under
//! [`ErrorPolicy::FailFast`] (the default) the first error of any kind stops
//! the build and is returned as-is; nothing after the failing entry is
//! written. Under [`ErrorPolicy::CollectAll`] failing entries are skipped, the
//! rest of the tree is still built, and all errors come back together as
//! [`BuildError::Aggregate`].
//!
//! ## Self-referential builds
//!
//! An output root inside the source root would otherwise be read back as
//! source on the next run. [`BuildRoots`] detects that case and the walk
//! prunes the output root by path, whatever it is named. An output root equal
//! to the source root is rejected up front.

use crate::classify::{Classifier, ContentKind, html_file_name};
use crate::config::{CONFIG_FILE_NAME, SiteConfig};
use crate::convert::{ConvertError, Converter};
use crate::materialize::{self, MaterializeError};
use crate::names::{ExclusionSet, NameSet};
use crate::walk::{self, SourceEntry, WalkError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Walk(#[from] WalkError),
    #[error("Unable to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unable to convert {}: {source}", .path.display())]
    Convert {
        path: PathBuf,
        #[source]
        source: ConvertError,
    },
    #[error(transparent)]
    Materialize(#[from] MaterializeError),
    #[error("Output root {} is the source root", .0.display())]
    OutputIsSource(PathBuf),
    #[error("Unable to resolve {}: {source}", .path.display())]
    Resolve {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} errors during build:\n{}", .0.len(), format_errors(.0))]
    Aggregate(Vec<BuildError>),
}

fn format_errors(errors: &[BuildError]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// What to do when an entry fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorPolicy {
    /// Stop at the first error.
    #[default]
    FailFast,
    /// Build everything that can be built, then report every error.
    CollectAll,
}

/// The source and output roots of one build.
#[derive(Debug, Clone)]
pub struct BuildRoots {
    source: PathBuf,
    output: PathBuf,
    nested_output: Option<PathBuf>,
}

impl BuildRoots {
    /// Pair a source root with an output root.
    ///
    /// A relative `output` is resolved against `source`. Fails when both
    /// resolve to the same directory.
    pub fn new(source: impl Into<PathBuf>, output: impl AsRef<Path>) -> Result<Self, BuildError> {
        let source = source.into();
        let output = source.join(output.as_ref());

        let abs_source = normalize(&source)?;
        let abs_output = normalize(&output)?;
        if abs_source == abs_output {
            return Err(BuildError::OutputIsSource(output));
        }

        // Expressed in walk terms (source joined with a relative tail) so it
        // compares equal to the walker's own entry paths.
        let nested_output = abs_output
            .strip_prefix(&abs_source)
            .ok()
            .map(|rel| source.join(rel));

        Ok(Self {
            source,
            output,
            nested_output,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// The output root as seen from the walk, when it lies inside the source.
    pub fn nested_output(&self) -> Option<&Path> {
        self.nested_output.as_deref()
    }
}

/// Absolute, lexically normalized form of `path` (no symlink resolution).
fn normalize(path: &Path) -> Result<PathBuf, BuildError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|source| BuildError::Resolve {
            path: path.to_path_buf(),
            source,
        })?;
        cwd.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// Everything the dispatcher needs besides the roots and the converter.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub excludes: ExclusionSet,
    pub classifier: Classifier,
    pub policy: ErrorPolicy,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self::from_config(&SiteConfig::default())
    }
}

impl BuildSettings {
    pub fn new(excludes: ExclusionSet, classifier: Classifier) -> Self {
        Self {
            excludes,
            classifier,
            policy: ErrorPolicy::FailFast,
        }
    }

    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Freeze the configured name lists. The config file is always excluded.
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut excludes = NameSet::builder();
        excludes
            .extend(config.exclude.iter().cloned())
            .insert(CONFIG_FILE_NAME);
        let extensions: NameSet = config.document_extensions.iter().cloned().collect();

        Self::new(excludes.finish(), Classifier::new(extensions)).with_policy(config.error_policy)
    }
}

/// A discovered file and where it will land.
#[derive(Debug, Clone)]
pub struct PlannedEntry {
    pub source: SourceEntry,
    pub kind: ContentKind,
    /// Directory the target is written into.
    pub target_dir: PathBuf,
    /// Full destination path.
    pub target: PathBuf,
    /// Destination path relative to the output root.
    pub target_relative: PathBuf,
}

impl PlannedEntry {
    fn new(source: SourceEntry, classifier: &Classifier, output: &Path) -> Self {
        let kind = classifier.classify(&source.path);
        let file_name = match (kind, source.file_name().to_str()) {
            (ContentKind::Document, Some(name)) => OsString::from(html_file_name(name)),
            _ => source.file_name().to_os_string(),
        };
        let target_dir = output.join(source.relative_dir());
        let target = target_dir.join(&file_name);
        let target_relative = source.relative_dir().join(&file_name);
        Self {
            source,
            kind,
            target_dir,
            target,
            target_relative,
        }
    }
}

/// A file written to the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuiltEntry {
    /// Source path relative to the source root.
    pub source: PathBuf,
    /// Target path relative to the output root.
    pub target: PathBuf,
    pub kind: ContentKind,
    pub bytes: u64,
}

/// Result of a completed build, in walk order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildReport {
    pub entries: Vec<BuiltEntry>,
}

impl BuildReport {
    pub fn converted(&self) -> usize {
        self.count(ContentKind::Document)
    }

    pub fn copied(&self) -> usize {
        self.count(ContentKind::Passthrough)
    }

    fn count(&self, kind: ContentKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}

/// Progress events emitted while the build runs.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    Converted { source: PathBuf, target: PathBuf },
    Copied { source: PathBuf, target: PathBuf },
    Failed { source: PathBuf, message: String },
}

/// Walk and classify without writing anything.
pub fn plan(roots: &BuildRoots, settings: &BuildSettings) -> Result<Vec<PlannedEntry>, BuildError> {
    let (planned, errors) = plan_entries(roots, settings);
    finish(planned, errors, settings.policy)
}

fn plan_entries(
    roots: &BuildRoots,
    settings: &BuildSettings,
) -> (Vec<PlannedEntry>, Vec<BuildError>) {
    let outcome = walk::walk_with_policy(
        roots.source(),
        &settings.excludes,
        roots.nested_output(),
        settings.policy,
    );
    let planned = outcome
        .entries
        .into_iter()
        .map(|entry| PlannedEntry::new(entry, &settings.classifier, roots.output()))
        .collect();
    let errors = outcome.errors.into_iter().map(BuildError::from).collect();
    (planned, errors)
}

/// Mirror `roots.source()` into `roots.output()`.
///
/// Documents go through `converter`; everything else is copied. Events are
/// sent to `progress` as entries complete. Dropping the sender at the end
/// lets a listening printer thread finish.
pub fn build<C: Converter + ?Sized>(
    roots: &BuildRoots,
    settings: &BuildSettings,
    converter: &C,
    progress: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    let (planned, mut errors) = plan_entries(roots, settings);
    if settings.policy == ErrorPolicy::FailFast && !errors.is_empty() {
        return Err(errors.swap_remove(0));
    }

    log::info!(
        "building {} entries from {} into {}",
        planned.len(),
        roots.source().display(),
        roots.output().display()
    );

    materialize::ensure_dir(roots.output())?;
    let mut known_dirs: HashSet<PathBuf> = HashSet::new();
    known_dirs.insert(roots.output().to_path_buf());

    let mut report = BuildReport::default();
    for item in &planned {
        match dispatch(item, converter, &mut known_dirs) {
            Ok(built) => {
                if let Some(tx) = &progress {
                    let event = match built.kind {
                        ContentKind::Document => BuildEvent::Converted {
                            source: built.source.clone(),
                            target: built.target.clone(),
                        },
                        ContentKind::Passthrough => BuildEvent::Copied {
                            source: built.source.clone(),
                            target: built.target.clone(),
                        },
                    };
                    tx.send(event).ok();
                }
                report.entries.push(built);
            }
            Err(err) => {
                log::debug!("{}: {}", item.source.path.display(), err);
                if settings.policy == ErrorPolicy::FailFast {
                    return Err(err);
                }
                if let Some(tx) = &progress {
                    tx.send(BuildEvent::Failed {
                        source: item.source.relative.clone(),
                        message: err.to_string(),
                    })
                    .ok();
                }
                errors.push(err);
            }
        }
    }

    finish(report, errors, settings.policy)
}

fn finish<T>(value: T, mut errors: Vec<BuildError>, policy: ErrorPolicy) -> Result<T, BuildError> {
    match (errors.is_empty(), policy) {
        (true, _) => Ok(value),
        (false, ErrorPolicy::FailFast) => Err(errors.swap_remove(0)),
        (false, ErrorPolicy::CollectAll) => Err(BuildError::Aggregate(errors)),
    }
}

fn dispatch<C: Converter + ?Sized>(
    item: &PlannedEntry,
    converter: &C,
    known_dirs: &mut HashSet<PathBuf>,
) -> Result<BuiltEntry, BuildError> {
    let bytes = match item.kind {
        ContentKind::Document => {
            let source = fs::read(&item.source.path).map_err(|source| BuildError::Read {
                path: item.source.path.clone(),
                source,
            })?;
            let html = converter
                .convert(&source)
                .map_err(|source| BuildError::Convert {
                    path: item.source.path.clone(),
                    source,
                })?;
            ensure_target_dir(&item.target_dir, known_dirs)?;
            materialize::write_file(&item.target, &html)?;
            log::debug!(
                "converted {} -> {}",
                item.source.path.display(),
                item.target.display()
            );
            html.len() as u64
        }
        ContentKind::Passthrough => {
            ensure_target_dir(&item.target_dir, known_dirs)?;
            let copied = materialize::copy_file(&item.source.path, &item.target)?;
            log::debug!(
                "copied {} -> {}",
                item.source.path.display(),
                item.target.display()
            );
            copied
        }
    };

    Ok(BuiltEntry {
        source: item.source.relative.clone(),
        target: item.target_relative.clone(),
        kind: item.kind,
        bytes,
    })
}

fn ensure_target_dir(dir: &Path, known_dirs: &mut HashSet<PathBuf>) -> Result<(), BuildError> {
    if !known_dirs.contains(dir) {
        materialize::ensure_dir(dir)?;
        known_dirs.insert(dir.to_path_buf());
    }
    Ok(())
}

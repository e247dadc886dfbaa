//! Depth-first directory walk with early pruning.
//!
//! Excluded directories are pruned before their children are listed, so the
//! walk only costs what it actually visits. Symlinks are followed; a link
//! leading back into the current ancestry is reported instead of descended.

use crate::Decision;
use crate::ExclusionRules;
use crate::SkipReason;
use crate::filters;
use crate::filters::EntryKind;
use log::debug;
use log::warn;
use std::io;
use std::path::Path;
use std::path::PathBuf;
use walkdir::WalkDir;

/// An entry that passed the exclusion rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEntry {
    /// Filesystem path of the entry.
    pub path: PathBuf,

    /// Directory or file.
    pub kind: EntryKind,

    /// Forward-slash path relative to the source root.
    pub name: String,

    /// Size in bytes as reported by metadata (0 for directories).
    pub size: u64,
}

/// One step of the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// Entry to descend into (directory) or to store (file).
    Entry(TraversalEntry),
    /// Entry left out, with the decision to report.
    Skipped(Decision),
}

/// Walks a source tree, applying exclusion rules as it goes.
///
/// Children are visited in file-name order so that repeated runs over an
/// unchanged tree produce the same sequence. The root itself is never
/// classified or reported.
///
/// # Examples
///
/// ```no_run
/// use snapzip_core::ExclusionRules;
/// use snapzip_core::walker::PrunedWalker;
/// use snapzip_core::walker::WalkEvent;
/// use std::path::Path;
///
/// let rules = ExclusionRules::default();
/// for event in PrunedWalker::new(Path::new("./project"), &rules) {
///     match event {
///         WalkEvent::Entry(entry) => println!("visit {}", entry.name),
///         WalkEvent::Skipped(decision) => println!("{decision}"),
///     }
/// }
/// ```
pub struct PrunedWalker<'a> {
    root: PathBuf,
    rules: &'a ExclusionRules,
    inner: walkdir::IntoIter,
}

impl<'a> PrunedWalker<'a> {
    /// Creates a walker rooted at `root`.
    #[must_use]
    pub fn new(root: &Path, rules: &'a ExclusionRules) -> Self {
        let inner = WalkDir::new(root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        Self {
            root: root.to_path_buf(),
            rules,
            inner,
        }
    }

    fn visit(&mut self, entry: &walkdir::DirEntry) -> Option<WalkEvent> {
        let path = entry.path();
        let file_type = entry.file_type();

        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            debug!("ignoring special file {}", path.display());
            return None;
        };

        if let Some(reason) = filters::classify(path, kind, self.rules) {
            if kind == EntryKind::Directory {
                self.inner.skip_current_dir();
            }
            return Some(self.skipped(path, reason, None));
        }

        let name = match filters::archive_name(path, &self.root) {
            Ok(name) => name,
            Err(err) => {
                warn!("{err}");
                if kind == EntryKind::Directory {
                    self.inner.skip_current_dir();
                }
                return Some(self.skipped(path, SkipReason::ReadError, Some(err.to_string())));
            }
        };

        let size = match kind {
            EntryKind::Directory => 0,
            EntryKind::File => match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(err) => return Some(self.walk_error(&err)),
            },
        };

        Some(WalkEvent::Entry(TraversalEntry {
            path: path.to_path_buf(),
            kind,
            name,
            size,
        }))
    }

    fn walk_error(&self, err: &walkdir::Error) -> WalkEvent {
        let path = err.path().unwrap_or(&self.root);

        if let Some(ancestor) = err.loop_ancestor() {
            // Rules come first; a looping link named like an excluded
            // directory is reported as excluded
            if let Some(reason) = filters::classify_directory(path, self.rules) {
                return self.skipped(path, reason, None);
            }
            debug!(
                "{} loops back to {}",
                path.display(),
                ancestor.display()
            );
            return self.skipped(path, SkipReason::CyclicLink, None);
        }

        match err.io_error().map(io::Error::kind) {
            Some(io::ErrorKind::NotFound) => {
                let detail = path
                    .symlink_metadata()
                    .is_ok_and(|m| m.file_type().is_symlink())
                    .then(|| "dangling symbolic link".to_string());
                self.skipped(path, SkipReason::EntryVanished, detail)
            }
            _ => {
                warn!("cannot read {}: {err}", path.display());
                let detail = err
                    .io_error()
                    .map_or_else(|| err.to_string(), ToString::to_string);
                self.skipped(path, SkipReason::ReadError, Some(detail))
            }
        }
    }

    fn skipped(&self, path: &Path, reason: SkipReason, detail: Option<String>) -> WalkEvent {
        WalkEvent::Skipped(Decision::Skipped {
            name: display_name(path, &self.root),
            reason,
            detail,
        })
    }
}

impl Iterator for PrunedWalker<'_> {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if entry.depth() == 0 {
                        continue;
                    }
                    if let Some(event) = self.visit(&entry) {
                        return Some(event);
                    }
                }
                Err(err) => return Some(self.walk_error(&err)),
            }
        }
    }
}

/// Best-effort relative name for reporting, lossy for non-UTF-8 segments.
pub(crate) fn display_name(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

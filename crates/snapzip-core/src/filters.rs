//! Pure predicates deciding whether an entry is excluded.
//!
//! Directories are matched on their base name only. Files are matched on
//! their base name first, then on their extension, so the reported reason
//! does not depend on set iteration order.

use crate::ArchiveError;
use crate::ExclusionRules;
use crate::Result;
use crate::SkipReason;
use std::path::Component;
use std::path::Path;

/// Kind of filesystem entry seen during the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Directory (or a symlink resolving to one).
    Directory,
    /// Regular file (or a symlink resolving to one).
    File,
}

/// Decides whether a directory is pruned.
///
/// # Examples
///
/// ```
/// use snapzip_core::ExclusionRules;
/// use snapzip_core::SkipReason;
/// use snapzip_core::filters::classify_directory;
/// use std::path::Path;
///
/// let rules = ExclusionRules::default();
/// assert_eq!(
///     classify_directory(Path::new("web/node_modules"), &rules),
///     Some(SkipReason::ExcludedDirectory)
/// );
/// assert_eq!(classify_directory(Path::new("web/src"), &rules), None);
/// ```
#[must_use]
pub fn classify_directory(path: &Path, rules: &ExclusionRules) -> Option<SkipReason> {
    let name = path.file_name()?.to_str()?;
    rules
        .excludes_directory(name)
        .then_some(SkipReason::ExcludedDirectory)
}

/// Decides whether a file is skipped.
///
/// The file-name rule takes precedence over the extension rule.
///
/// # Examples
///
/// ```
/// use snapzip_core::ExclusionRules;
/// use snapzip_core::SkipReason;
/// use snapzip_core::filters::classify_file;
/// use std::path::Path;
///
/// let rules = ExclusionRules::default().with_file_names(["debug.log"]);
/// assert_eq!(
///     classify_file(Path::new("debug.log"), &rules),
///     Some(SkipReason::ExcludedFile)
/// );
/// assert_eq!(
///     classify_file(Path::new("server.log"), &rules),
///     Some(SkipReason::ExcludedExtension)
/// );
/// assert_eq!(classify_file(Path::new("README.md"), &rules), None);
/// ```
#[must_use]
pub fn classify_file(path: &Path, rules: &ExclusionRules) -> Option<SkipReason> {
    if let Some(name) = path.file_name().and_then(|n| n.to_str())
        && rules.excludes_file_name(name)
    {
        return Some(SkipReason::ExcludedFile);
    }

    let extension = path.extension()?.to_str()?;
    rules
        .excludes_extension(&format!(".{extension}"))
        .then_some(SkipReason::ExcludedExtension)
}

/// Classifies an entry of either kind.
#[must_use]
pub fn classify(path: &Path, kind: EntryKind, rules: &ExclusionRules) -> Option<SkipReason> {
    match kind {
        EntryKind::Directory => classify_directory(path, rules),
        EntryKind::File => classify_file(path, rules),
    }
}

/// Computes the archive name of `path` relative to `root`.
///
/// Segments are joined with `/` whatever the host separator is.
///
/// # Errors
///
/// Returns `InvalidEntryName` if `path` is not under `root` or contains a
/// segment that is not valid UTF-8.
///
/// # Examples
///
/// ```
/// use snapzip_core::filters::archive_name;
/// use std::path::Path;
///
/// let name = archive_name(
///     Path::new("/home/user/project/src/main.rs"),
///     Path::new("/home/user/project"),
/// )
/// .unwrap();
/// assert_eq!(name, "src/main.rs");
/// ```
pub fn archive_name(path: &Path, root: &Path) -> Result<String> {
    let invalid = || ArchiveError::InvalidEntryName {
        path: path.to_path_buf(),
    };

    let relative = path.strip_prefix(root).map_err(|_| invalid())?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str().ok_or_else(invalid)?),
            Component::CurDir => {}
            _ => return Err(invalid()),
        }
    }

    Ok(segments.join("/"))
}

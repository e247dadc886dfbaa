//! Decisions and run reporting.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Why an entry was left out of the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SkipReason {
    /// Directory name matched; the whole subtree was pruned.
    ExcludedDirectory,
    /// File name matched.
    ExcludedFile,
    /// File extension matched.
    ExcludedExtension,
    /// The entry could not be read.
    ReadError,
    /// The entry disappeared between listing and opening.
    EntryVanished,
    /// A symlink pointed back into the current traversal ancestry.
    CyclicLink,
    /// The entry is the archive being written.
    OutputArchive,
}

impl SkipReason {
    /// Returns `true` for skips caused by an exclusion rule, as opposed to a
    /// problem with the entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use snapzip_core::SkipReason;
    ///
    /// assert!(SkipReason::ExcludedExtension.is_rule_exclusion());
    /// assert!(!SkipReason::ReadError.is_rule_exclusion());
    /// ```
    #[must_use]
    pub const fn is_rule_exclusion(self) -> bool {
        matches!(
            self,
            Self::ExcludedDirectory | Self::ExcludedFile | Self::ExcludedExtension
        )
    }

    /// Stable, human-readable reason string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExcludedDirectory => "excluded directory",
            Self::ExcludedFile => "excluded file",
            Self::ExcludedExtension => "excluded extension",
            Self::ReadError => "read error",
            Self::EntryVanished => "entry vanished",
            Self::CyclicLink => "cyclic link",
            Self::OutputArchive => "output archive",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One include/skip decision taken during the walk.
///
/// `Display` renders the decision as a log line:
///
/// ```
/// use snapzip_core::Decision;
/// use snapzip_core::SkipReason;
///
/// let added = Decision::Added { name: "src/app.js".into(), size: 12 };
/// assert_eq!(added.to_string(), "[ADD ] src/app.js (12 B)");
///
/// let skipped = Decision::Skipped {
///     name: "node_modules".into(),
///     reason: SkipReason::ExcludedDirectory,
///     detail: None,
/// };
/// assert_eq!(skipped.to_string(), "[SKIP] node_modules (excluded directory)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// File stored in the archive under `name`.
    Added {
        /// Forward-slash path relative to the source root.
        name: String,
        /// Uncompressed size in bytes.
        size: u64,
    },
    /// Entry left out of the archive.
    Skipped {
        /// Forward-slash path relative to the source root.
        name: String,
        /// Why the entry was skipped.
        reason: SkipReason,
        /// Extra context, such as the underlying I/O error.
        detail: Option<String>,
    },
}

impl Decision {
    /// Relative name of the entry this decision is about.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Added { name, .. } | Self::Skipped { name, .. } => name,
        }
    }

    /// Skip reason, or `None` if the entry was added.
    #[must_use]
    pub const fn skip_reason(&self) -> Option<SkipReason> {
        match self {
            Self::Added { .. } => None,
            Self::Skipped { reason, .. } => Some(*reason),
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added { name, size } => write!(f, "[ADD ] {name} ({size} B)"),
            Self::Skipped {
                name,
                reason,
                detail: Some(detail),
            } => write!(f, "[SKIP] {name} ({reason}: {detail})"),
            Self::Skipped { name, reason, .. } => write!(f, "[SKIP] {name} ({reason})"),
        }
    }
}

/// Receives decisions as the archiver takes them.
///
/// Both methods default to doing nothing.
pub trait ArchiveObserver {
    /// Called once per include/skip decision, in traversal order.
    fn on_decision(&mut self, _decision: &Decision) {}

    /// Called once after the archive has been finalized.
    fn on_complete(&mut self, _report: &RunReport) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ArchiveObserver for NoopObserver {}

/// Collects every decision, mostly useful in tests.
impl ArchiveObserver for Vec<Decision> {
    fn on_decision(&mut self, decision: &Decision) {
        self.push(decision.clone());
    }
}

/// Outcome of a successful archiving run.
///
/// # Examples
///
/// ```
/// use snapzip_core::RunReport;
///
/// let mut report = RunReport::default();
/// report.bytes_added = 1000;
/// report.bytes_compressed = 250;
///
/// assert_eq!(report.compression_ratio(), 4.0);
/// assert_eq!(report.compression_percentage(), 75.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Number of files stored in the archive.
    pub files_added: usize,

    /// Number of skip decisions (a pruned directory counts once).
    pub entries_skipped: usize,

    /// Total uncompressed bytes stored.
    pub bytes_added: u64,

    /// Size of the finished archive file.
    pub bytes_compressed: u64,

    /// Skip counts broken down by reason.
    pub skipped_by_reason: BTreeMap<SkipReason, usize>,

    /// Final archive path.
    pub output_path: PathBuf,

    /// Wall-clock duration of the run.
    pub duration: Duration,
}

impl RunReport {
    /// Creates an empty report for the given output path.
    #[must_use]
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            ..Self::default()
        }
    }

    /// Accounts for one decision.
    pub fn record(&mut self, decision: &Decision) {
        match decision {
            Decision::Added { size, .. } => {
                self.files_added += 1;
                self.bytes_added += size;
            }
            Decision::Skipped { reason, .. } => {
                self.entries_skipped += 1;
                *self.skipped_by_reason.entry(*reason).or_default() += 1;
            }
        }
    }

    /// Number of skips recorded for `reason`.
    #[must_use]
    pub fn skipped(&self, reason: SkipReason) -> usize {
        self.skipped_by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Returns the compression ratio (uncompressed / compressed).
    ///
    /// Returns 0.0 if either size is 0.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        if self.bytes_compressed == 0 || self.bytes_added == 0 {
            return 0.0;
        }
        self.bytes_added as f64 / self.bytes_compressed as f64
    }

    /// Returns the space saved as a percentage of the uncompressed size.
    ///
    /// The archive's own overhead can make this negative for tiny inputs.
    #[must_use]
    pub fn compression_percentage(&self) -> f64 {
        if self.bytes_added == 0 {
            return 0.0;
        }
        (1.0 - self.bytes_compressed as f64 / self.bytes_added as f64) * 100.0
    }
}

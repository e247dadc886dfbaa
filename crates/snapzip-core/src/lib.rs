//! Exclusion-aware directory snapshots into ZIP archives.
//!
//! `snapzip-core` walks a source tree depth-first, prunes excluded
//! directories before descending into them, skips excluded files by name or
//! extension, and streams every remaining file into a deflate-compressed ZIP
//! container under its forward-slash path relative to the source root.
//!
//! Each include/skip decision is handed to an [`ArchiveObserver`] as it is
//! taken. Per-entry problems (unreadable files, entries that vanish, cyclic
//! symlinks) are skip decisions, never errors; only an invalid source or a
//! failure to write the container aborts a run.
//!
//! # Examples
//!
//! ```no_run
//! use snapzip_core::Archiver;
//! use snapzip_core::Decision;
//! use snapzip_core::ExclusionRules;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let rules = ExclusionRules::default().with_file_names(["secrets.json"]);
//! let mut decisions: Vec<Decision> = Vec::new();
//! let report = Archiver::new(rules).run(
//!     Path::new("my-app"),
//!     Path::new("my-app.zip"),
//!     &mut decisions,
//! )?;
//! println!(
//!     "{} files added, {} skipped",
//!     report.files_added, report.entries_skipped
//! );
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod archiver;
pub mod config;
pub mod error;
pub mod filters;
pub mod report;
pub mod rules;
pub mod walker;

pub use archiver::Archiver;
pub use archiver::create_snapshot;
pub use config::ArchiveOptions;
pub use error::ArchiveError;
pub use error::Result;
pub use filters::EntryKind;
pub use report::ArchiveObserver;
pub use report::Decision;
pub use report::NoopObserver;
pub use report::RunReport;
pub use report::SkipReason;
pub use rules::ExclusionRules;

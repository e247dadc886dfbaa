//! Error types for archiving runs.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ArchiveError`.
pub type Result<T> = std::result::Result<T, ArchiveError>;

/// Errors that can fail an archiving run.
///
/// Per-entry problems (unreadable files, vanished entries, cyclic links) are
/// not errors: they are reported as skip decisions and the walk continues.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// Source root is missing or not a directory.
    #[error("invalid source {path}: {reason}")]
    InvalidSource {
        /// The offending source path.
        path: PathBuf,
        /// Why the path was rejected.
        reason: String,
    },

    /// The archive container could not be created or written.
    #[error("cannot write archive {path}: {source}")]
    WriteFailure {
        /// The output archive path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Compression level outside the supported 1-9 range.
    #[error("invalid compression level {level}, expected 1-9")]
    InvalidCompressionLevel {
        /// The rejected level.
        level: u8,
    },

    /// Entry name cannot be stored portably in the archive.
    #[error("cannot be stored as an archive name: {path}")]
    InvalidEntryName {
        /// The entry path.
        path: PathBuf,
    },
}

impl ArchiveError {
    /// Wraps an I/O error that happened on the output container.
    pub fn write_failure(path: &Path, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Converts a zip writer error into a `WriteFailure`.
    pub fn from_zip(path: &Path, err: zip::result::ZipError) -> Self {
        let source = match err {
            zip::result::ZipError::Io(io_err) => io_err,
            other => std::io::Error::other(other.to_string()),
        };
        Self::write_failure(path, source)
    }

    /// Returns `true` if this error aborts the whole run.
    ///
    /// # Examples
    ///
    /// ```
    /// use snapzip_core::ArchiveError;
    /// use std::path::PathBuf;
    ///
    /// let err = ArchiveError::InvalidSource {
    ///     path: PathBuf::from("missing"),
    ///     reason: "does not exist".to_string(),
    /// };
    /// assert!(err.is_fatal());
    ///
    /// let err = ArchiveError::InvalidEntryName {
    ///     path: PathBuf::from("bad"),
    /// };
    /// assert!(!err.is_fatal());
    /// ```
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::InvalidEntryName { .. })
    }
}

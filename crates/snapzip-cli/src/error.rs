//! Error conversion utilities for CLI.
//!
//! Converts snapzip-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use snapzip_core::ArchiveError;

/// Converts `ArchiveError` to a user-friendly anyhow error with a hint.
pub fn convert_archive_error(err: ArchiveError) -> anyhow::Error {
    match err {
        ArchiveError::InvalidSource { path, reason } => {
            anyhow!(
                "Cannot archive '{}': {reason}\n\
                 HINT: SOURCE must be an existing directory.",
                path.display()
            )
        }
        ArchiveError::WriteFailure { path, source } => {
            anyhow!(
                "Failed to write archive '{}': {source}\n\
                 HINT: Check that the output location is writable and has free space.",
                path.display()
            )
        }
        ArchiveError::InvalidCompressionLevel { level } => {
            anyhow!(
                "Invalid compression level {level}\n\
                 HINT: Use --compression-level with a value from 1 (fastest) to 9 (smallest)."
            )
        }
        err @ ArchiveError::InvalidEntryName { .. } => anyhow::Error::from(err),
    }
}

/// Maps a core result into an anyhow result with hints.
pub fn add_archive_context<T>(result: snapzip_core::Result<T>) -> anyhow::Result<T> {
    result.map_err(convert_archive_error)
}

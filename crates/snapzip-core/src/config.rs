//! Options controlling how entries are written.

use crate::ArchiveError;
use crate::Result;

/// Compression level used when none is given: best ratio.
pub const DEFAULT_COMPRESSION_LEVEL: u8 = 9;

/// Options controlling how the archive is written.
///
/// # Examples
///
/// ```
/// use snapzip_core::ArchiveOptions;
///
/// let options = ArchiveOptions::default();
/// assert_eq!(options.compression_level, 9);
///
/// let fast = ArchiveOptions::default().with_compression_level(1);
/// assert!(fast.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOptions {
    /// Deflate level, 1 (fastest) to 9 (smallest).
    ///
    /// Default: `9`.
    pub compression_level: u8,

    /// Store unix permission bits with each entry.
    ///
    /// Default: `true`. Has no effect on non-unix hosts.
    pub preserve_permissions: bool,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            preserve_permissions: true,
        }
    }
}

impl ArchiveOptions {
    /// Creates options with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression level. Checked by [`ArchiveOptions::validate`].
    #[must_use]
    pub fn with_compression_level(mut self, level: u8) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets whether to store permission bits.
    #[must_use]
    pub fn with_preserve_permissions(mut self, preserve: bool) -> Self {
        self.preserve_permissions = preserve;
        self
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCompressionLevel` if the level is not in 1-9.
    pub fn validate(&self) -> Result<()> {
        if !(1..=9).contains(&self.compression_level) {
            return Err(ArchiveError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        Ok(())
    }
}

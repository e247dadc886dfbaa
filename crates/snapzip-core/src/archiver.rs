//! Snapshot archiver: walk, decide, stream into a ZIP container.
//!
//! The archive is written to a temporary file next to the requested output
//! and renamed into place only after the central directory has been written
//! and synced. Any container-level failure drops the temporary file, so a
//! failed run never leaves a corrupt archive at the output path.

use crate::ArchiveError;
use crate::ArchiveObserver;
use crate::ArchiveOptions;
use crate::Decision;
use crate::ExclusionRules;
use crate::NoopObserver;
use crate::Result;
use crate::RunReport;
use crate::SkipReason;
use crate::filters::EntryKind;
use crate::walker::PrunedWalker;
use crate::walker::TraversalEntry;
use crate::walker::WalkEvent;
use chrono::DateTime;
use chrono::Datelike;
use chrono::Local;
use chrono::Timelike;
use log::debug;
use log::warn;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;
use tempfile::NamedTempFile;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Creates a ZIP snapshot of `source_root` at `output_path`.
///
/// Shorthand for `Archiver::new(rules.clone()).run(..)` with default options
/// and no observer.
///
/// # Examples
///
/// ```no_run
/// use snapzip_core::ExclusionRules;
/// use snapzip_core::create_snapshot;
/// use std::path::Path;
///
/// let rules = ExclusionRules::default();
/// let report = create_snapshot(Path::new("my-app"), Path::new("my-app.zip"), &rules)?;
/// println!("{} added, {} skipped", report.files_added, report.entries_skipped);
/// # Ok::<(), snapzip_core::ArchiveError>(())
/// ```
///
/// # Errors
///
/// Returns `InvalidSource` if the source is not a directory and
/// `WriteFailure` if the archive cannot be written.
pub fn create_snapshot(
    source_root: &Path,
    output_path: &Path,
    rules: &ExclusionRules,
) -> Result<RunReport> {
    Archiver::new(rules.clone()).run_silent(source_root, output_path)
}

/// Walks a source tree and writes every non-excluded file into a ZIP archive.
///
/// # Examples
///
/// ```no_run
/// use snapzip_core::ArchiveOptions;
/// use snapzip_core::Archiver;
/// use snapzip_core::Decision;
/// use snapzip_core::ExclusionRules;
/// use std::path::Path;
///
/// let rules = ExclusionRules::default().with_directory_names(["target"]);
/// let archiver = Archiver::new(rules).with_options(ArchiveOptions::default());
///
/// let mut decisions: Vec<Decision> = Vec::new();
/// let report = archiver.run(Path::new("."), Path::new("/tmp/snapshot.zip"), &mut decisions)?;
/// for decision in &decisions {
///     println!("{decision}");
/// }
/// # Ok::<(), snapzip_core::ArchiveError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Archiver {
    rules: ExclusionRules,
    options: ArchiveOptions,
}

impl Archiver {
    /// Creates an archiver with default options.
    #[must_use]
    pub fn new(rules: ExclusionRules) -> Self {
        Self {
            rules,
            options: ArchiveOptions::default(),
        }
    }

    /// Replaces the write options.
    #[must_use]
    pub fn with_options(mut self, options: ArchiveOptions) -> Self {
        self.options = options;
        self
    }

    /// Exclusion rules used by this archiver.
    pub const fn rules(&self) -> &ExclusionRules {
        &self.rules
    }

    /// Write options used by this archiver.
    pub const fn options(&self) -> &ArchiveOptions {
        &self.options
    }

    /// Runs without reporting individual decisions.
    ///
    /// # Errors
    ///
    /// See [`Archiver::run`].
    pub fn run_silent(&self, source_root: &Path, output_path: &Path) -> Result<RunReport> {
        self.run(source_root, output_path, &mut NoopObserver)
    }

    /// Archives `source_root` into `output_path`.
    ///
    /// Every decision is passed to `observer` as it is taken, in traversal
    /// order; the observer's `on_complete` runs once the archive is in place.
    ///
    /// # Errors
    ///
    /// - `InvalidCompressionLevel` if the options are invalid
    /// - `InvalidSource` if `source_root` is missing or not a directory
    /// - `WriteFailure` if the container cannot be created, written,
    ///   finalized or moved into place
    pub fn run(
        &self,
        source_root: &Path,
        output_path: &Path,
        observer: &mut dyn ArchiveObserver,
    ) -> Result<RunReport> {
        let start = Instant::now();

        self.options.validate()?;
        validate_source(source_root)?;

        let temp = open_temp_archive(output_path)?;
        let guard = OutputGuard::new(output_path, temp.path());
        debug!(
            "archiving {} into {} via {}",
            source_root.display(),
            output_path.display(),
            temp.path().display()
        );

        let mut zip = ZipWriter::new(temp);
        let base_options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(self.options.compression_level)));

        let mut report = RunReport::new(output_path.to_path_buf());
        let mut buffer = vec![0u8; COPY_BUFFER_SIZE];

        for event in PrunedWalker::new(source_root, &self.rules) {
            let decision = match event {
                WalkEvent::Skipped(decision) => decision,
                WalkEvent::Entry(entry) => match entry.kind {
                    EntryKind::Directory => continue,
                    EntryKind::File if guard.matches(&entry.path) => Decision::Skipped {
                        name: entry.name,
                        reason: SkipReason::OutputArchive,
                        detail: None,
                    },
                    EntryKind::File => self.add_file(
                        &mut zip,
                        &entry,
                        base_options,
                        &mut buffer,
                        output_path,
                    )?,
                },
            };

            report.record(&decision);
            observer.on_decision(&decision);
        }

        let temp = zip
            .finish()
            .map_err(|e| ArchiveError::from_zip(output_path, e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| ArchiveError::write_failure(output_path, e))?;
        let file = temp
            .persist(output_path)
            .map_err(|e| ArchiveError::write_failure(output_path, e.error))?;
        debug!("finalized {}", output_path.display());

        report.bytes_compressed = file.metadata().map_or(0, |m| m.len());
        report.duration = start.elapsed();

        observer.on_complete(&report);

        Ok(report)
    }

    /// Streams one file into the archive.
    ///
    /// Problems with the source file become skip decisions; problems with
    /// the archive are returned as errors.
    fn add_file<W: Write + Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        entry: &TraversalEntry,
        base_options: SimpleFileOptions,
        buffer: &mut [u8],
        output_path: &Path,
    ) -> Result<Decision> {
        let mut file = match File::open(&entry.path) {
            Ok(file) => file,
            Err(err) => return Ok(skip_for_io(entry, &err)),
        };
        let metadata = match file.metadata() {
            Ok(metadata) => metadata,
            Err(err) => return Ok(skip_for_io(entry, &err)),
        };

        let mut options = base_options.large_file(needs_large_file(entry.size));
        if let Some(modified) = modified_time(&metadata) {
            options = options.last_modified_time(modified);
        } else {
            debug!("keeping default timestamp for {}", entry.path.display());
        }
        if self.options.preserve_permissions {
            options = with_permissions(options, &metadata);
        }

        zip.start_file(entry.name.as_str(), options)
            .map_err(|e| ArchiveError::from_zip(output_path, e))?;

        let mut bytes_written = 0u64;
        loop {
            let bytes_read = match file.read(buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
                Err(err) => {
                    zip.abort_file()
                        .map_err(|e| ArchiveError::from_zip(output_path, e))?;
                    return Ok(skip_for_io(entry, &err));
                }
            };
            zip.write_all(&buffer[..bytes_read])
                .map_err(|e| ArchiveError::write_failure(output_path, e))?;
            bytes_written += bytes_read as u64;
        }

        Ok(Decision::Added {
            name: entry.name.clone(),
            size: bytes_written,
        })
    }
}

#[cfg(unix)]
fn with_permissions(options: SimpleFileOptions, metadata: &fs::Metadata) -> SimpleFileOptions {
    use std::os::unix::fs::PermissionsExt;
    options.unix_permissions(metadata.permissions().mode())
}

#[cfg(not(unix))]
fn with_permissions(options: SimpleFileOptions, _metadata: &fs::Metadata) -> SimpleFileOptions {
    options
}

/// Entries this large need ZIP64 headers.
fn needs_large_file(size: u64) -> bool {
    size >= u64::from(u32::MAX)
}

/// File mtime in local time, as ZIP readers expect. `None` when unknown or
/// outside the 1980-2107 range the format can hold.
fn modified_time(metadata: &fs::Metadata) -> Option<zip::DateTime> {
    let modified: DateTime<Local> = metadata.modified().ok()?.into();

    zip::DateTime::from_date_and_time(
        u16::try_from(modified.year()).ok()?,
        u8::try_from(modified.month()).ok()?,
        u8::try_from(modified.day()).ok()?,
        u8::try_from(modified.hour()).ok()?,
        u8::try_from(modified.minute()).ok()?,
        u8::try_from(modified.second()).ok()?,
    )
    .ok()
}

fn skip_for_io(entry: &TraversalEntry, err: &io::Error) -> Decision {
    let reason = if err.kind() == io::ErrorKind::NotFound {
        SkipReason::EntryVanished
    } else {
        warn!("cannot read {}: {err}", entry.path.display());
        SkipReason::ReadError
    };

    Decision::Skipped {
        name: entry.name.clone(),
        reason,
        detail: Some(err.to_string()),
    }
}

fn validate_source(source_root: &Path) -> Result<()> {
    let metadata = fs::metadata(source_root).map_err(|e| ArchiveError::InvalidSource {
        path: source_root.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !metadata.is_dir() {
        return Err(ArchiveError::InvalidSource {
            path: source_root.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(())
}

/// Directory the output lands in; `.` for bare file names.
fn output_parent(output_path: &Path) -> PathBuf {
    match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn open_temp_archive(output_path: &Path) -> Result<NamedTempFile> {
    let parent = output_parent(output_path);
    fs::create_dir_all(&parent).map_err(|e| ArchiveError::write_failure(output_path, e))?;

    tempfile::Builder::new()
        .prefix(".snapzip-")
        .suffix(".partial")
        .tempfile_in(&parent)
        .map_err(|e| ArchiveError::write_failure(output_path, e))
}

/// Recognizes the archive being written when the walk runs into it.
struct OutputGuard {
    candidates: Vec<PathBuf>,
}

impl OutputGuard {
    fn new(output_path: &Path, temp_path: &Path) -> Self {
        let mut candidates = Vec::with_capacity(2);

        if let Ok(temp) = temp_path.canonicalize() {
            candidates.push(temp);
        }
        if let Some(name) = output_path.file_name()
            && let Ok(parent) = output_parent(output_path).canonicalize()
        {
            candidates.push(parent.join(name));
        }

        Self { candidates }
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        if !self
            .candidates
            .iter()
            .any(|candidate| candidate.file_name() == Some(name))
        {
            return false;
        }

        path.canonicalize()
            .is_ok_and(|resolved| self.candidates.contains(&resolved))
    }
}

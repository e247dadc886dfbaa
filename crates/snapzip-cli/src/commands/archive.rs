//! Archive command implementation.

use crate::cli::Cli;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use chrono::Local;
use chrono::NaiveDateTime;
use snapzip_core::ArchiveError;
use snapzip_core::ArchiveOptions;
use snapzip_core::Archiver;
use snapzip_core::ExclusionRules;
use snapzip_core::rules::parse_list;
use std::env;
use std::path::Path;
use std::path::PathBuf;

pub fn execute(args: &Cli, formatter: &mut dyn OutputFormatter) -> Result<()> {
    let Some(source) = args.source.as_deref() else {
        bail!("missing SOURCE argument");
    };

    let source_root = add_archive_context(source.canonicalize().map_err(|e| {
        ArchiveError::InvalidSource {
            path: source.to_path_buf(),
            reason: e.to_string(),
        }
    }))?;

    let output = resolve_output(
        args.output.as_deref(),
        &source_root,
        Local::now().naive_local(),
    )?;

    let rules = build_rules(args);
    let options = ArchiveOptions::default()
        .with_compression_level(args.compression_level)
        .with_preserve_permissions(!args.no_preserve_permissions);

    formatter.format_plan(&source_root, &output, &rules);

    let report = add_archive_context(
        Archiver::new(rules)
            .with_options(options)
            .run(&source_root, &output, &mut *formatter),
    )?;

    formatter.format_archive_result(&report)
}

/// Unions the `--ignore-*` lists with the built-in defaults.
fn build_rules(args: &Cli) -> ExclusionRules {
    ExclusionRules::default()
        .with_directory_names(args.ignore_dirs.iter().flat_map(|raw| parse_list(raw)))
        .with_file_names(args.ignore_files.iter().flat_map(|raw| parse_list(raw)))
        .with_extensions(args.ignore_exts.iter().flat_map(|raw| parse_list(raw)))
}

/// Picks the archive path.
///
/// No output means a generated name in the current directory; an existing
/// directory gets the generated name inside it; anything else is used as is.
fn resolve_output(
    output: Option<&Path>,
    source_root: &Path,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    let name = generated_name(source_root, now);

    match output {
        None => Ok(env::current_dir()
            .context("failed to get current directory")?
            .join(name)),
        Some(path) if path.is_dir() => Ok(path.join(name)),
        Some(path) => Ok(path.to_path_buf()),
    }
}

/// `<folder>_<YYYY-mm-dd_HHMMSS>.zip`, with `project` for nameless roots.
fn generated_name(source_root: &Path, now: NaiveDateTime) -> String {
    let folder = source_root
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("project");

    format!("{folder}_{}.zip", now.format("%Y-%m-%d_%H%M%S"))
}

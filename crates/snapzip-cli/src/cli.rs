//! CLI argument parsing using clap.

use clap::Parser;
use clap_complete::Shell;
use snapzip_core::config::DEFAULT_COMPRESSION_LEVEL;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "snapzip")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Project directory to archive
    #[arg(value_name = "SOURCE", required_unless_present = "completions")]
    pub source: Option<PathBuf>,

    /// Output archive path or directory (default: generated name in the
    /// current directory)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Extra directory names to exclude (comma-separated, can be repeated)
    #[arg(long, value_name = "NAMES")]
    pub ignore_dirs: Vec<String>,

    /// Extra file names to exclude (comma-separated, can be repeated)
    #[arg(long, value_name = "NAMES")]
    pub ignore_files: Vec<String>,

    /// Extra extensions to exclude, with or without the dot (comma-separated,
    /// can be repeated)
    #[arg(long, value_name = "EXTS")]
    pub ignore_exts: Vec<String>,

    /// Compression level (1-9)
    #[arg(
        short = 'l',
        long,
        default_value_t = DEFAULT_COMPRESSION_LEVEL,
        value_parser = clap::value_parser!(u8).range(1..=9)
    )]
    pub compression_level: u8,

    /// Do not store Unix permission bits
    #[arg(long)]
    pub no_preserve_permissions: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(short, long)]
    pub json: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL", exclusive = true)]
    pub completions: Option<Shell>,
}

//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use snapzip_core::ArchiveObserver;
use snapzip_core::ExclusionRules;
use snapzip_core::RunReport;
use std::path::Path;

/// Common output formatter trait.
///
/// A formatter is also the observer of the run, so decisions are rendered
/// while the archive is being written.
pub trait OutputFormatter: ArchiveObserver {
    /// Announce what is about to be archived
    fn format_plan(&mut self, source: &Path, output: &Path, rules: &ExclusionRules);

    /// Format the outcome of a finished run
    fn format_archive_result(&mut self, report: &RunReport) -> Result<()>;

    /// Format error message
    fn format_error(&self, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}

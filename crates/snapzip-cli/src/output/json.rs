//! JSON output formatter for machine-readable results.
//!
//! Decisions are buffered and printed as part of a single document once the
//! run finishes, so stdout always holds exactly one JSON value.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use snapzip_core::ArchiveObserver;
use snapzip_core::Decision;
use snapzip_core::ExclusionRules;
use snapzip_core::RunReport;
use std::collections::BTreeMap;
use std::io::Write;
use std::io::{self};
use std::path::Path;

const OPERATION: &str = "archive";

#[derive(Debug, Serialize)]
struct DecisionOutput {
    action: &'static str,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl From<&Decision> for DecisionOutput {
    fn from(decision: &Decision) -> Self {
        match decision {
            Decision::Added { name, size } => Self {
                action: "add",
                name: name.clone(),
                size: Some(*size),
                reason: None,
                detail: None,
            },
            Decision::Skipped {
                name,
                reason,
                detail,
            } => Self {
                action: "skip",
                name: name.clone(),
                size: None,
                reason: Some(reason.as_str()),
                detail: detail.clone(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct RulesOutput {
    directories: Vec<String>,
    files: Vec<String>,
    extensions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ArchiveOutput {
    source: String,
    output_path: String,
    files_added: usize,
    entries_skipped: usize,
    skipped_by_reason: BTreeMap<&'static str, usize>,
    bytes_added: u64,
    bytes_compressed: u64,
    compression_ratio: f64,
    compression_percentage: f64,
    duration_ms: u128,
    rules: Option<RulesOutput>,
    decisions: Vec<DecisionOutput>,
}

#[derive(Default)]
pub struct JsonFormatter {
    source: Option<String>,
    rules: Option<RulesOutput>,
    decisions: Vec<DecisionOutput>,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }

    fn build_output(&mut self, report: &RunReport) -> ArchiveOutput {
        ArchiveOutput {
            source: self.source.take().unwrap_or_default(),
            output_path: report.output_path.display().to_string(),
            files_added: report.files_added,
            entries_skipped: report.entries_skipped,
            skipped_by_reason: report
                .skipped_by_reason
                .iter()
                .map(|(reason, count)| (reason.as_str(), *count))
                .collect(),
            bytes_added: report.bytes_added,
            bytes_compressed: report.bytes_compressed,
            compression_ratio: report.compression_ratio(),
            compression_percentage: report.compression_percentage(),
            duration_ms: report.duration.as_millis(),
            rules: self.rules.take(),
            decisions: std::mem::take(&mut self.decisions),
        }
    }
}

impl ArchiveObserver for JsonFormatter {
    fn on_decision(&mut self, decision: &Decision) {
        self.decisions.push(DecisionOutput::from(decision));
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_plan(&mut self, source: &Path, _output: &Path, rules: &ExclusionRules) {
        self.source = Some(source.display().to_string());
        self.rules = Some(RulesOutput {
            directories: rules.directory_names().iter().cloned().collect(),
            files: rules.file_names().iter().cloned().collect(),
            extensions: rules.extensions().iter().cloned().collect(),
        });
    }

    fn format_archive_result(&mut self, report: &RunReport) -> Result<()> {
        let data = self.build_output(report);
        Self::output(&JsonOutput::success(OPERATION, data))
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error(OPERATION, format!("{error:#}"));
        let _ = Self::output(&output);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use snapzip_core::SkipReason;
    use std::path::PathBuf;

    #[test]
    fn test_decision_output_fields() {
        let added = serde_json::to_value(DecisionOutput::from(&Decision::Added {
            name: "README.md".to_string(),
            size: 12,
        }))
        .unwrap();
        assert_eq!(added["action"], "add");
        assert_eq!(added["size"], 12);
        assert!(added.get("reason").is_none());

        let skipped = serde_json::to_value(DecisionOutput::from(&Decision::Skipped {
            name: ".git".to_string(),
            reason: SkipReason::ExcludedDirectory,
            detail: None,
        }))
        .unwrap();
        assert_eq!(skipped["action"], "skip");
        assert_eq!(skipped["reason"], "excluded directory");
        assert!(skipped.get("size").is_none());
        assert!(skipped.get("detail").is_none());
    }

    #[test]
    fn test_build_output_drains_decisions() {
        let mut formatter = JsonFormatter::new();
        formatter.format_plan(
            Path::new("/work/app"),
            Path::new("/out/app.zip"),
            &ExclusionRules::default(),
        );

        let decisions = [
            Decision::Added {
                name: "a.txt".to_string(),
                size: 4,
            },
            Decision::Skipped {
                name: "notes.log".to_string(),
                reason: SkipReason::ExcludedExtension,
                detail: None,
            },
        ];
        let mut report = RunReport::new(PathBuf::from("/out/app.zip"));
        for decision in &decisions {
            formatter.on_decision(decision);
            report.record(decision);
        }

        let output = serde_json::to_value(formatter.build_output(&report)).unwrap();
        assert_eq!(output["source"], "/work/app");
        assert_eq!(output["files_added"], 1);
        assert_eq!(output["entries_skipped"], 1);
        assert_eq!(output["skipped_by_reason"]["excluded extension"], 1);
        assert_eq!(output["decisions"].as_array().unwrap().len(), 2);
        assert!(
            output["rules"]["directories"]
                .as_array()
                .unwrap()
                .contains(&serde_json::json!("node_modules"))
        );
        assert!(formatter.decisions.is_empty());
    }
}

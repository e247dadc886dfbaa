//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use snapzip_core::ArchiveObserver;
use snapzip_core::Decision;
use snapzip_core::ExclusionRules;
use snapzip_core::RunReport;
use std::collections::BTreeSet;
use std::path::Path;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn format_set(items: &BTreeSet<String>) -> String {
        items.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    }

    /// Renders one decision line. Rule exclusions and entry problems get
    /// different colors; the reason text tells them apart without colors.
    fn render_decision(decision: &Decision, use_colors: bool) -> String {
        match decision {
            Decision::Added { name, size } => {
                let tag = if use_colors {
                    style("[ADD ]").green().to_string()
                } else {
                    "[ADD ]".to_string()
                };
                format!("{tag} {name} ({})", Self::format_size(*size))
            }
            Decision::Skipped {
                name,
                reason,
                detail,
            } => {
                let tag = match (use_colors, reason.is_rule_exclusion()) {
                    (false, _) => "[SKIP]".to_string(),
                    (true, true) => style("[SKIP]").yellow().to_string(),
                    (true, false) => style("[SKIP]").red().bold().to_string(),
                };
                match detail {
                    Some(detail) => format!("{tag} {name} ({reason}: {detail})"),
                    None => format!("{tag} {name} ({reason})"),
                }
            }
        }
    }

    fn info(&self, message: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("[INFO]").cyan()));
        } else {
            let _ = self.term.write_line(&format!("[INFO] {message}"));
        }
    }
}

impl ArchiveObserver for HumanFormatter {
    fn on_decision(&mut self, decision: &Decision) {
        if self.quiet {
            return;
        }
        let _ = self
            .term
            .write_line(&Self::render_decision(decision, self.use_colors));
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_plan(&mut self, source: &Path, output: &Path, rules: &ExclusionRules) {
        if !self.verbose {
            return;
        }

        self.info(&format!("Source: {}", source.display()));
        self.info(&format!("Output: {}", output.display()));
        self.info(&format!(
            "Ignored directories: {}",
            Self::format_set(rules.directory_names())
        ));
        self.info(&format!(
            "Ignored files: {}",
            Self::format_set(rules.file_names())
        ));
        self.info(&format!(
            "Ignored extensions: {}",
            Self::format_set(rules.extensions())
        ));
    }

    fn format_archive_result(&mut self, report: &RunReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let _ = self.term.write_line("");
        if self.use_colors {
            let _ = self.term.write_line(&format!(
                "{} Archive created: {}",
                style("✓").green().bold(),
                report.output_path.display()
            ));
        } else {
            let _ = self.term.write_line(&format!(
                "Archive created: {}",
                report.output_path.display()
            ));
        }

        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Entries skipped:  {}",
            Self::format_number(report.entries_skipped)
        ));

        if self.verbose {
            for (reason, count) in &report.skipped_by_reason {
                let _ = self.term.write_line(&format!(
                    "    {:<18} {}",
                    format!("{reason}:"),
                    Self::format_number(*count)
                ));
            }
        }

        let _ = self.term.write_line(&format!(
            "  Total size:       {}",
            Self::format_size(report.bytes_added)
        ));

        if report.bytes_compressed > 0 {
            let _ = self.term.write_line(&format!(
                "  Compressed size:  {}",
                Self::format_size(report.bytes_compressed)
            ));
            let _ = self.term.write_line(&format!(
                "  Compression:      {:.1}%",
                report.compression_percentage()
            ));
        }

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        // Always show errors, even in quiet mode
        let term = Term::stderr();
        if self.use_colors {
            let _ = term.write_line(&format!("{} {error:?}", style("ERROR:").red().bold()));
        } else {
            let _ = term.write_line(&format!("ERROR: {error:?}"));
        }
    }
}

//! Output formatting for ecsfix
//!
//! Supports text (colored terminal), JSON and unified diff output.

use anyhow::Result;
use colored::*;
use ecsfix_fixer::{FileReport, FileStatus};
use serde::Serialize;
use similar::{ChangeTag, TextDiff};
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Diff,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "diff" => Some(OutputFormat::Diff),
            _ => None,
        }
    }
}

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Unchanged,
    Fixed,
    Error,
}

/// Per-file entry of the JSON output
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    pub status: Outcome,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub applied_fixers: Vec<String>,
    pub passes: usize,
    pub fixpoint_reached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn from_report(path: &Path, report: &FileReport) -> Self {
        let status = match report.status {
            FileStatus::Unchanged => Outcome::Unchanged,
            FileStatus::Fixed(_) => Outcome::Fixed,
            FileStatus::Error(_) => Outcome::Error,
        };
        Self {
            path: path.display().to_string(),
            status,
            applied_fixers: report.applied_fixers.clone(),
            passes: report.passes,
            fixpoint_reached: report.fixpoint_reached,
            error: report.error().map(|e| e.to_string()),
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            status: Outcome::Error,
            applied_fixers: Vec::new(),
            passes: 0,
            fixpoint_reached: true,
            error: Some(error),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_changes: usize,
    pub errors: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self {
            format,
            verbose,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    fn record(&mut self, result: FileResult) {
        self.summary.files_processed += 1;
        match result.status {
            Outcome::Fixed => self.summary.files_with_changes += 1,
            Outcome::Error => self.summary.errors += 1,
            Outcome::Unchanged => {}
        }
        self.results.push(result);
    }

    /// A file that would change; `diff` is printed in diff mode
    pub fn report_check(&mut self, path: &Path, report: &FileReport, old_source: &str, diff: &str) {
        match self.format {
            OutputFormat::Text => {
                println!("{}", path.display().to_string().bold());
                print_diff(old_source, report.fixed_content().unwrap_or(old_source));
                println!();
                for fixer in &report.applied_fixers {
                    println!("  {} {}", "->".green(), fixer);
                }
                println!();
            }
            OutputFormat::Diff => print!("{}", diff),
            OutputFormat::Json => {}
        }
        self.record(FileResult::from_report(path, report));
    }

    /// A file whose fixed content was written back
    pub fn report_fix(&mut self, path: &Path, report: &FileReport) {
        if self.format == OutputFormat::Text {
            println!(
                "{} {} ({})",
                "Fixed".green(),
                path.display().to_string().bold(),
                report.applied_fixers.join(", ")
            );
        }
        self.record(FileResult::from_report(path, report));
    }

    pub fn report_unchanged(&mut self, path: &Path, report: &FileReport) {
        if self.verbose && self.format == OutputFormat::Text {
            println!("{}: No changes needed", path.display());
        }
        self.record(FileResult::from_report(path, report));
    }

    /// A file the runner left alone, or one that could not be read
    pub fn report_failed(&mut self, path: &Path, result: FileResult) {
        if self.format == OutputFormat::Text {
            let message = result.error.as_deref().unwrap_or("unknown error");
            eprintln!("{}: {} - {}", "Warning".yellow(), path.display(), message);
        }
        self.record(result);
    }

    /// Print final summary/output
    pub fn finish(self, check_mode: bool) -> Result<()> {
        match self.format {
            OutputFormat::Text => {
                println!();
                println!("{}", "Summary".bold().underline());
                println!("  Files processed: {}", self.summary.files_processed);
                println!("  Files with changes: {}", self.summary.files_with_changes);
                if self.summary.errors > 0 {
                    println!("  Errors: {}", self.summary.errors);
                }

                if check_mode && self.summary.files_with_changes > 0 {
                    println!();
                    println!("{}", "Run with --fix to apply changes".yellow());
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    summary: self.summary,
                    files: self.results,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
            // Patch-compatible output, no summary
            OutputFormat::Diff => {}
        }
        Ok(())
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

/// Print changed lines in color
fn print_diff(old: &str, new: &str) {
    let diff = TextDiff::from_lines(old, new);
    for change in diff.iter_all_changes() {
        let line = change.to_string_lossy();
        let line = line.trim_end_matches(['\n', '\r']);
        match change.tag() {
            ChangeTag::Delete => println!("  {}", format!("- {}", line).red()),
            ChangeTag::Insert => println!("  {}", format!("+ {}", line).green()),
            ChangeTag::Equal => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsfix_fixer::{FileError, LintError};

    fn report(status: FileStatus) -> FileReport {
        FileReport {
            status,
            applied_fixers: vec!["lowercase_keywords".to_string()],
            passes: 2,
            fixpoint_reached: true,
        }
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("diff"), Some(OutputFormat::Diff));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    #[test]
    fn test_file_result_from_report() {
        let fixed = FileResult::from_report(
            Path::new("a.php"),
            &report(FileStatus::Fixed("<?php\n".to_string())),
        );
        assert_eq!(fixed.status, Outcome::Fixed);
        assert_eq!(fixed.applied_fixers, vec!["lowercase_keywords"]);
        assert!(fixed.error.is_none());

        let failed = FileResult::from_report(
            Path::new("a.php"),
            &report(FileStatus::Error(FileError::Lint(LintError::new(3, "unexpected token")))),
        );
        assert_eq!(failed.status, Outcome::Error);
        assert_eq!(
            failed.error.as_deref(),
            Some("Parse error on line 3: unexpected token")
        );
    }

    #[test]
    fn test_summary_counts() {
        let mut reporter = Reporter::new(OutputFormat::Json, false);
        let fixed = report(FileStatus::Fixed("<?php\necho 1;\n".to_string()));
        reporter.report_check(Path::new("a.php"), &fixed, "<?php\nECHO 1;\n", "");
        reporter.report_unchanged(Path::new("b.php"), &report(FileStatus::Unchanged));
        reporter.report_failed(
            Path::new("c.php"),
            FileResult::error(Path::new("c.php"), "Failed to read file".to_string()),
        );

        let summary = reporter.summary();
        assert_eq!(summary.files_processed, 3);
        assert_eq!(summary.files_with_changes, 1);
        assert_eq!(summary.errors, 1);
    }

    #[test]
    fn test_json_serialization() {
        let output = JsonOutput {
            version: "0.1.0".to_string(),
            summary: Summary {
                files_processed: 2,
                files_with_changes: 1,
                errors: 0,
            },
            files: vec![
                FileResult::from_report(Path::new("a.php"), &report(FileStatus::Fixed(String::new()))),
                FileResult::error(Path::new("b.php"), "Failed to read file".to_string()),
            ],
        };

        let json = serde_json::to_string(&output).unwrap();
        assert!(json.contains("\"version\":\"0.1.0\""));
        assert!(json.contains("\"files_processed\":2"));
        assert!(json.contains("\"status\":\"fixed\""));
        assert!(json.contains("\"applied_fixers\":[\"lowercase_keywords\"]"));
        assert!(json.contains("\"error\":\"Failed to read file\""));
    }
}

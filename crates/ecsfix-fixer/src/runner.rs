//! Per-file fixpoint loop
//!
//! A file is linted and lexed once, then every fixer in the set runs in
//! order, pass after pass, until a pass leaves the code unchanged or the
//! pass cap is hit. The result is linted again before it is reported as
//! fixed.

use std::panic::{self, AssertUnwindSafe};

use ecsfix_core::Tokens;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{FixerSet, WhitespaceConfig};
use crate::differ::{Differ, UnifiedDiffer};
use crate::error::FileError;
use crate::fixers::{Fixer, FixerConfig};
use crate::linter::{Linter, MagoLinter};

/// Runner settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Give up on reaching a fixpoint after this many passes
    pub max_passes: usize,
    pub whitespace: WhitespaceConfig,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_passes: 50,
            whitespace: WhitespaceConfig::default(),
        }
    }
}

/// Outcome for one file
#[derive(Debug, Clone, PartialEq)]
pub enum FileStatus {
    /// Nothing to fix, or the fixers ended where they started
    Unchanged,
    /// New content of the file
    Fixed(String),
    /// The file was left alone
    Error(FileError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FileReport {
    pub status: FileStatus,
    /// Fixers that changed the tokens at least once, in first-applied order
    pub applied_fixers: Vec<String>,
    pub passes: usize,
    /// False if the pass cap was hit while the code was still changing
    pub fixpoint_reached: bool,
}

impl FileReport {
    fn new() -> Self {
        Self {
            status: FileStatus::Unchanged,
            applied_fixers: Vec::new(),
            passes: 0,
            fixpoint_reached: true,
        }
    }

    fn failed(mut self, error: FileError) -> Self {
        self.status = FileStatus::Error(error);
        self
    }

    pub fn is_changed(&self) -> bool {
        matches!(self.status, FileStatus::Fixed(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.status, FileStatus::Error(_))
    }

    pub fn fixed_content(&self) -> Option<&str> {
        match &self.status {
            FileStatus::Fixed(content) => Some(content),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&FileError> {
        match &self.status {
            FileStatus::Error(error) => Some(error),
            _ => None,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Apply one fixer, turning both errors and panics into a [`FileError`]
fn run_fixer(fixer: &dyn Fixer, tokens: &mut Tokens, config: &FixerConfig) -> Result<(), FileError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| fixer.apply_fix(tokens, config)));
    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(source)) => Err(FileError::Fixer {
            fixer: fixer.name().to_string(),
            source,
        }),
        Err(payload) => Err(FileError::Panicked {
            fixer: fixer.name().to_string(),
            message: panic_message(payload.as_ref()),
        }),
    }
}

/// Runs a [`FixerSet`] over files
pub struct Runner {
    fixers: FixerSet,
    config: RunnerConfig,
    linter: Box<dyn Linter>,
    differ: Box<dyn Differ>,
}

impl Runner {
    /// Runner with the mago linter and unified diffs
    pub fn new(fixers: FixerSet, config: RunnerConfig) -> Self {
        Self {
            fixers,
            config,
            linter: Box::new(MagoLinter::new()),
            differ: Box::new(UnifiedDiffer),
        }
    }

    pub fn with_linter(mut self, linter: impl Linter + 'static) -> Self {
        self.linter = Box::new(linter);
        self
    }

    pub fn with_differ(mut self, differ: impl Differ + 'static) -> Self {
        self.differ = Box::new(differ);
        self
    }

    pub fn fixers(&self) -> &FixerSet {
        &self.fixers
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Whitespace settings for `source`, detecting its line ending when a
    /// whitespace-aware fixer is enabled and detection is configured
    fn fixer_config(&self, source: &str) -> FixerConfig {
        let mut whitespace = self.config.whitespace.clone();
        if self.fixers.is_whitespace_aware() {
            whitespace.line_ending = whitespace.line_ending_for(source);
        }
        FixerConfig::from(&whitespace)
    }

    /// Fix `source`; `path` only labels log records
    pub fn fix(&self, path: &str, source: &str) -> FileReport {
        let report = FileReport::new();

        if let Err(error) = self.linter.lint(source) {
            warn!(path, %error, "skipping file that does not parse");
            return report.failed(FileError::Lint(error));
        }
        let tokens = match Tokens::from_code(source) {
            Ok(tokens) => tokens,
            Err(error) => {
                warn!(path, %error, "skipping file that does not tokenize");
                return report.failed(error.into());
            }
        };

        let report = self.run_passes(path, source, tokens, report);
        let Some(fixed) = report.fixed_content() else {
            return report;
        };
        match self.linter.lint(fixed) {
            Ok(()) => report,
            Err(error) => {
                warn!(path, %error, "fixers produced invalid code");
                let applied = report.applied_fixers.clone();
                report.failed(FileError::InvalidResult { error, applied })
            }
        }
    }

    fn run_passes(&self, path: &str, source: &str, mut tokens: Tokens, mut report: FileReport) -> FileReport {
        let base = self.fixer_config(source);
        let configs: Vec<FixerConfig> = self
            .fixers
            .iter()
            .map(|entry| base.clone().with_options(entry.options().clone()))
            .collect();

        let mut previous = source.to_string();
        loop {
            if report.passes >= self.config.max_passes {
                report.fixpoint_reached = false;
                warn!(path, passes = report.passes, "no fixpoint reached, keeping last pass");
                break;
            }
            report.passes += 1;

            for (entry, config) in self.fixers.iter().zip(&configs) {
                let fixer = entry.fixer();
                if !fixer.is_candidate(&tokens) {
                    continue;
                }

                tokens.reset_changed();
                if let Err(error) = run_fixer(fixer, &mut tokens, config) {
                    warn!(path, %error, "fixer failed");
                    return report.failed(error);
                }
                tokens.clear_empty_tokens();

                if tokens.is_changed() {
                    debug!(path, fixer = fixer.name(), pass = report.passes, "applied fixer");
                    if !report.applied_fixers.iter().any(|n| n == fixer.name()) {
                        report.applied_fixers.push(fixer.name().to_string());
                    }
                }
            }

            let code = tokens.generate_code();
            if code == previous {
                break;
            }
            previous = code;
        }

        if previous != source {
            report.status = FileStatus::Fixed(previous);
        }
        report
    }

    /// Diff of `old` against `new` for display
    pub fn diff(&self, old: &str, new: &str, path: &str) -> String {
        self.differ.diff(old, new, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LineEnding, RuleSetConfig};
    use crate::fixers::FixerRegistry;
    use crate::linter::NullLinter;

    fn runner(rules: &[&str]) -> Runner {
        let set = RuleSetConfig::with_rules(rules.iter().copied())
            .resolve(&FixerRegistry::new())
            .unwrap();
        Runner::new(set, RunnerConfig::default())
    }

    #[test]
    fn test_fixed_and_unchanged() {
        let runner = runner(&["no_trailing_whitespace", "lowercase_keywords"]);
        let report = runner.fix("a.php", "<?php\nIF ($a) {   \n}\n");
        assert_eq!(report.fixed_content(), Some("<?php\nif ($a) {\n}\n"));
        assert_eq!(report.applied_fixers, vec!["lowercase_keywords", "no_trailing_whitespace"]);
        assert_eq!(report.passes, 2);
        assert!(report.fixpoint_reached);

        let again = runner.fix("a.php", report.fixed_content().unwrap());
        assert_eq!(again.status, FileStatus::Unchanged);
        assert_eq!(again.passes, 1);
    }

    #[test]
    fn test_lint_error_leaves_file() {
        let report = runner(&["lowercase_keywords"]).fix("a.php", "<?php\nIF ($a {\n");
        assert!(report.is_error());
        assert!(matches!(report.error(), Some(FileError::Lint(_))));
        assert_eq!(report.passes, 0);
    }

    #[test]
    fn test_lex_error_leaves_file() {
        let report = runner(&["lowercase_keywords"])
            .with_linter(NullLinter)
            .fix("a.php", "<?php\n$a = 'open;\n");
        assert!(matches!(report.error(), Some(FileError::Lex(_))));
    }

    #[test]
    fn test_interpolated_string_is_left_alone() {
        let report = runner(&["single_line_comment_style"])
            .fix("a.php", "<?php\n$s = \"{$a[\"#\"]}\";\necho $s;\n");
        assert_eq!(report.status, FileStatus::Unchanged);

        let report = runner(&["lowercase_keywords"])
            .fix("a.php", "<?php\n$s = \"{$cfg[\"DEFAULT\"]}\";\n");
        assert_eq!(report.status, FileStatus::Unchanged);
    }

    #[test]
    fn test_line_ending_detection() {
        let set = RuleSetConfig::with_rules(["no_leading_namespace_whitespace"])
            .resolve(&FixerRegistry::new())
            .unwrap();
        let mut config = RunnerConfig::default();
        config.whitespace.detect_line_ending = true;
        let runner = Runner::new(set, config);
        assert!(runner.fixers().is_whitespace_aware());
        assert_eq!(runner.fixer_config("<?php\r\n").line_ending, LineEnding::CrLf);
    }

    #[test]
    fn test_null_differ() {
        let runner = runner(&["lowercase_keywords"]).with_differ(crate::differ::NullDiffer);
        assert_eq!(runner.diff("<?php\nECHO 1;\n", "<?php\necho 1;\n", "a.php"), "");
    }

    #[test]
    fn test_panic_message() {
        let payload = panic::catch_unwind(|| panic!("boom")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom");
    }
}

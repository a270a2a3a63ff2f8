//! Error types for fixers, rule-set resolution, linting and per-file runs

use ecsfix_core::{LexError, TokensError};
use thiserror::Error;

/// Failure inside a single fixer application
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixerError {
    #[error(transparent)]
    Tokens(#[from] TokensError),

    #[error("Invalid value for option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },
}

/// Rejected rule-set configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown rule '{0}'")]
    UnknownRule(String),

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("Unknown option '{option}' for rule '{rule}'")]
    UnknownOption { rule: String, option: String },

    #[error("Option '{option}' for rule '{rule}' expects {expected}")]
    InvalidOptionType {
        rule: String,
        option: String,
        expected: String,
    },

    #[error("Rule '{0}' is not configurable")]
    NotConfigurable(String),
}

/// Source rejected by a [`crate::Linter`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Parse error on line {line}: {message}")]
pub struct LintError {
    pub line: usize,
    pub message: String,
}

impl LintError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Why a file was left untouched
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Lint(LintError),

    #[error("Fixer '{fixer}' failed: {source}")]
    Fixer { fixer: String, source: FixerError },

    #[error("Fixer '{fixer}' panicked: {message}")]
    Panicked { fixer: String, message: String },

    #[error("Fixed code is invalid ({error}); applied fixers: {}", .applied.join(", "))]
    InvalidResult { error: LintError, applied: Vec<String> },
}

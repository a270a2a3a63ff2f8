//! Error types for token collections and the lexer

use thiserror::Error;

/// Errors raised by [`crate::Tokens`] and the analyzers built on it
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokensError {
    #[error("Index {index} out of bounds for token collection of size {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Invalid token at index {index}: {reason}")]
    InvalidToken { index: usize, reason: String },

    /// Malformed structure: unbalanced block or a misused navigation call.
    /// Fatal for the current file.
    #[error("Token structure invariant violated: {0}")]
    InvariantViolation(String),
}

/// Input that cannot be tokenized
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Lex error on line {line} (offset {offset}): {message}")]
pub struct LexError {
    pub line: usize,
    pub offset: usize,
    pub message: String,
}

impl LexError {
    pub(crate) fn new(source: &str, offset: usize, message: impl Into<String>) -> Self {
        let line = source[..offset.min(source.len())].matches('\n').count() + 1;
        Self {
            line,
            offset,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_line() {
        let err = LexError::new("<?php\n\n/* open", 7, "Unterminated comment");
        assert_eq!(err.line, 3);
        assert_eq!(
            err.to_string(),
            "Lex error on line 3 (offset 7): Unterminated comment"
        );
    }
}

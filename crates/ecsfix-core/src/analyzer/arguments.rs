//! Splitting parenthesized argument and parameter lists

use crate::error::TokensError;
use crate::token::TokenKind;
use crate::tokens::{BlockType, Tokens};

/// Decomposed declaration of one parameter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentInfo {
    /// Variable name including `$`
    pub name: String,
    /// Declared type, empty when untyped
    pub type_name: String,
    /// Default value source, empty when absent
    pub default: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ArgumentsAnalyzer;

impl ArgumentsAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Inclusive `(start, end)` spans of each argument between `open` and
    /// `close`. Nested blocks are skipped; a trailing comma adds no span.
    pub fn arguments(
        &self,
        tokens: &Tokens,
        open: usize,
        close: usize,
    ) -> Result<Vec<(usize, usize)>, TokensError> {
        if close <= open || close >= tokens.len() {
            return Err(TokensError::InvariantViolation(format!(
                "invalid argument list bounds {}..{}",
                open, close
            )));
        }
        if tokens.next_meaningful_token(open) == Some(close) {
            return Ok(Vec::new());
        }

        let mut spans = Vec::new();
        let mut start = open + 1;
        let mut index = open + 1;
        while index < close {
            let token = &tokens[index];
            if let Some(block) = BlockType::opened_by(token.kind()) {
                index = tokens.find_block_end(block, index)? + 1;
                continue;
            }
            if token.is_given_kind(TokenKind::Comma) {
                if tokens.next_meaningful_token(index) == Some(close) {
                    spans.push((start, index - 1));
                    return Ok(spans);
                }
                spans.push((start, index - 1));
                start = index + 1;
            }
            index += 1;
        }
        spans.push((start, close - 1));
        Ok(spans)
    }

    pub fn count_arguments(
        &self,
        tokens: &Tokens,
        open: usize,
        close: usize,
    ) -> Result<usize, TokensError> {
        Ok(self.arguments(tokens, open, close)?.len())
    }

    /// Name, type and default of the parameter spanning `start..=end`
    pub fn argument_info(&self, tokens: &Tokens, start: usize, end: usize) -> ArgumentInfo {
        let mut info = ArgumentInfo::default();
        let mut saw_name = false;

        for token in tokens.iter().take(end + 1).skip(start) {
            if token.is_comment() || token.is_whitespace() {
                continue;
            }
            if token.is_given_kind(TokenKind::Variable) {
                saw_name = true;
                info.name = token.content().to_string();
                continue;
            }
            if token.is_given_kind(TokenKind::Equals) {
                continue;
            }
            if saw_name {
                info.default.push_str(token.content());
            } else if token.is_given_kind(TokenKind::Ellipsis) {
                if info.type_name.is_empty() {
                    info.type_name.push_str("array");
                } else {
                    info.type_name.push_str("[]");
                }
            } else if !token.equals("&") {
                info.type_name.push_str(token.content());
            }
        }
        info
    }
}

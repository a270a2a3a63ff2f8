//! Remove trailing whitespace at the end of non-blank lines

use ecsfix_core::analyzer::{CommentType, CommentsAnalyzer};
use ecsfix_core::{Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{Fixer, FixerConfig};

/// Removes spaces and tabs in front of line breaks
pub struct NoTrailingWhitespaceFixer;

/// Split `content` into text and line break runs: `[text, breaks, text, ...]`
fn split_line_breaks(content: &str) -> Vec<&str> {
    let bytes = content.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\n' || bytes[i] == b'\r' {
            let text_end = i;
            while i < bytes.len() && (bytes[i] == b'\n' || bytes[i] == b'\r') {
                i += 1;
            }
            parts.push(&content[start..text_end]);
            parts.push(&content[text_end..i]);
            start = i;
        } else {
            i += 1;
        }
    }
    parts.push(&content[start..]);
    parts
}

fn trim_horizontal_end(s: &str) -> &str {
    s.trim_end_matches([' ', '\t'])
}

fn starts_with_line_break(s: &str) -> bool {
    s.starts_with(['\n', '\r'])
}

impl NoTrailingWhitespaceFixer {
    /// `<?php ` followed by a line break: move the break into the tag
    fn fix_open_tag(&self, tokens: &mut Tokens, index: usize) -> Result<(), FixerError> {
        let tag = tokens[index].content();
        let Some(next) = tokens.get(index + 1) else {
            return Ok(());
        };
        if !next.is_given_kind(TokenKind::Whitespace)
            || !tag.ends_with([' ', '\t'])
            || !starts_with_line_break(next.content())
        {
            return Ok(());
        }

        let next = next.content();
        let break_len = if next.starts_with("\r\n") { 2 } else { 1 };
        let tag = format!("{}{}", trim_horizontal_end(tag), &next[..break_len]);
        let rest = next[break_len..].to_string();

        tokens.set(index, Token::new(TokenKind::OpenTag, tag))?;
        if rest.is_empty() {
            tokens.clear_at(index + 1)?;
        } else {
            tokens.set(index + 1, Token::whitespace(rest))?;
        }
        Ok(())
    }

    fn fix_whitespace(&self, tokens: &mut Tokens, index: usize) -> Result<(), FixerError> {
        let content = tokens[index].content();
        let lines = split_line_breaks(content);
        let is_last = index + 1 == tokens.len();
        // Single-line whitespace is only trailing at the end of the file
        if lines.len() == 1 && !is_last {
            return Ok(());
        }

        let after_open_tag_line = index
            .checked_sub(1)
            .map(|i| &tokens[i])
            .is_some_and(|t| t.is_given_kind(TokenKind::OpenTag) && t.content().ends_with(['\n', '\r']));
        let first = if after_open_tag_line {
            lines[0]
        } else {
            trim_horizontal_end(lines[0])
        };

        let fixed: String = std::iter::once(first).chain(lines[1..].iter().copied()).collect();
        if fixed.is_empty() {
            tokens.clear_at(index)?;
        } else {
            tokens.set(index, Token::whitespace(fixed))?;
        }
        Ok(())
    }

    /// `// text   ` keeps its trailing blanks in the comment token itself
    fn fix_line_comment(&self, tokens: &mut Tokens, index: usize) -> Result<(), FixerError> {
        let at_line_end = tokens
            .get(index + 1)
            .map_or(true, |t| starts_with_line_break(t.content()));
        let content = tokens[index].content();
        let trimmed = trim_horizontal_end(content);
        if at_line_end && trimmed.len() < content.len() {
            let token = Token::new(TokenKind::Comment, trimmed);
            tokens.set(index, token)?;
        }
        Ok(())
    }
}

impl Fixer for NoTrailingWhitespaceFixer {
    fn name(&self) -> &'static str {
        "no_trailing_whitespace"
    }

    fn description(&self) -> &'static str {
        "Remove trailing whitespace at the end of non-blank lines"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_any_token_kind_found(&[TokenKind::Whitespace, TokenKind::Comment])
    }

    fn apply_fix(&self, tokens: &mut Tokens, _config: &FixerConfig) -> Result<(), FixerError> {
        let comments = CommentsAnalyzer::new();
        for index in (0..tokens.len()).rev() {
            match tokens[index].kind() {
                TokenKind::OpenTag => self.fix_open_tag(tokens, index)?,
                TokenKind::Whitespace => self.fix_whitespace(tokens, index)?,
                TokenKind::Comment
                    if comments.comment_type(tokens[index].content()) != CommentType::SlashAsterisk =>
                {
                    self.fix_line_comment(tokens, index)?
                }
                _ => {}
            }
        }
        Ok(())
    }
}

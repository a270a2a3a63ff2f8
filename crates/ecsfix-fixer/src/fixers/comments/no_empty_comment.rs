//! Remove empty comments

use ecsfix_core::analyzer::{CommentType, CommentsAnalyzer};
use ecsfix_core::{Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{Fixer, FixerConfig};

/// Removes comments without any text, including whole blocks of empty
/// line comments
pub struct NoEmptyCommentFixer;

fn is_empty_comment(analyzer: &CommentsAnalyzer, content: &str) -> bool {
    match analyzer.comment_type(content) {
        CommentType::Hash => content[1..].trim().is_empty(),
        CommentType::DoubleSlash => content[2..].trim().is_empty(),
        CommentType::SlashAsterisk => content.len() >= 4
            && content.ends_with("*/")
            && content[2..content.len() - 2]
                .chars()
                .all(|c| c == '*' || c.is_whitespace()),
    }
}

/// Text after the first line break of `content`, or `None` without one
fn after_first_line_break(content: &str) -> Option<&str> {
    let at = content.find(['\n', '\r'])?;
    let rest = &content[at..];
    Some(rest.strip_prefix("\r\n").unwrap_or(&rest[1..]))
}

fn set_or_clear(tokens: &mut Tokens, index: usize, content: String) -> Result<(), FixerError> {
    if content.is_empty() {
        tokens.clear_at(index)?;
    } else {
        tokens.set(index, Token::whitespace(content))?;
    }
    Ok(())
}

/// Nearest token before `index` that was not cleared
fn previous_kept(tokens: &Tokens, index: usize) -> Option<usize> {
    (0..index).rev().find(|&i| !tokens[i].is_given_kind(TokenKind::Empty))
}

fn ends_line(tokens: &Tokens, index: Option<usize>) -> bool {
    index.is_some_and(|i| tokens[i].content().ends_with(['\n', '\r']))
}

impl NoEmptyCommentFixer {
    /// Clear `first..=last` and join the whitespace on both sides so the
    /// comment's line disappears with it
    fn remove_block(&self, tokens: &mut Tokens, first: usize, last: usize) -> Result<(), FixerError> {
        for index in first..=last {
            tokens.clear_at(index)?;
        }

        let next = last + 1;
        if !tokens.get(next).is_some_and(|t| t.is_given_kind(TokenKind::Whitespace)) {
            return Ok(());
        }
        let next_content = tokens[next].content().to_string();

        let prev = previous_kept(tokens, first);
        match prev.filter(|&p| tokens[p].is_given_kind(TokenKind::Whitespace)) {
            Some(prev) => {
                let prev_content = tokens[prev].content();
                // Indentation of a comment that opens its line goes too
                let line_prefix = match prev_content.rfind(['\n', '\r']) {
                    Some(line_end) => Some(&prev_content[..=line_end]),
                    None if ends_line(tokens, previous_kept(tokens, prev)) => Some(""),
                    None => None,
                };
                let merged = match (line_prefix, after_first_line_break(&next_content)) {
                    (Some(prefix), Some(rest)) => format!("{}{}", prefix, rest),
                    (Some(_), None) => prev_content.to_string(),
                    (None, _) => next_content.clone(),
                };
                tokens.clear_at(next)?;
                set_or_clear(tokens, prev, merged)
            }
            None => match after_first_line_break(&next_content) {
                Some(rest) if ends_line(tokens, prev) => set_or_clear(tokens, next, rest.to_string()),
                _ => Ok(()),
            },
        }
    }
}

impl Fixer for NoEmptyCommentFixer {
    fn name(&self) -> &'static str {
        "no_empty_comment"
    }

    fn description(&self) -> &'static str {
        "There should not be any empty comments"
    }

    fn priority(&self) -> i32 {
        2
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::Comment)
    }

    fn apply_fix(&self, tokens: &mut Tokens, _config: &FixerConfig) -> Result<(), FixerError> {
        let analyzer = CommentsAnalyzer::new();
        let mut index = 0;
        while index < tokens.len() {
            if !tokens[index].is_given_kind(TokenKind::Comment) {
                index += 1;
                continue;
            }

            let block = analyzer.comment_block_indices(tokens, index)?;
            let last = block.last().copied().unwrap_or(index);
            if block
                .iter()
                .all(|&i| is_empty_comment(&analyzer, tokens[i].content()))
            {
                self.remove_block(tokens, index, last)?;
            }
            index = last + 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::fix_with;

    fn fix(source: &str) -> String {
        fix_with(&NoEmptyCommentFixer, source, &FixerConfig::default())
    }

    #[test]
    fn test_is_empty_comment() {
        let analyzer = CommentsAnalyzer::new();
        for empty in ["#", "#  ", "//", "// ", "/**/", "/* */", "/* * */", "/*\n *\n */"] {
            assert!(is_empty_comment(&analyzer, empty), "{empty:?}");
        }
        for text in ["# a", "//a", "/* a */", "/*a*/"] {
            assert!(!is_empty_comment(&analyzer, text), "{text:?}");
        }
    }

    #[test]
    fn test_empty_comment_on_own_line() {
        assert_eq!(fix("<?php\n//\n$a = 1;\n"), "<?php\n$a = 1;\n");
        assert_eq!(
            fix("<?php\n$a = 1;\n    //\n    $b = 2;\n"),
            "<?php\n$a = 1;\n    $b = 2;\n"
        );
    }

    #[test]
    fn test_empty_block() {
        assert_eq!(fix("<?php\n#\n#\n$a = 1;\n"), "<?php\n$a = 1;\n");
    }

    #[test]
    fn test_block_with_text_is_kept() {
        let source = "<?php\n// a\n//\n$a = 1;\n";
        assert_eq!(fix(source), source);
    }

    #[test]
    fn test_trailing_and_inline_comments() {
        assert_eq!(fix("<?php\n$a = 1; //   \n$b = 2;\n"), "<?php\n$a = 1;\n$b = 2;\n");
        assert_eq!(fix("<?php\n$a = /**/ 1;\n"), "<?php\n$a = 1;\n");
    }

    #[test]
    fn test_adjacent_empty_comments_of_mixed_style() {
        assert_eq!(fix("<?php\n  //\n  # \n  $a = 1;\n"), "<?php\n  $a = 1;\n");
        assert_eq!(
            fix("<?php\n$a = 1;\n    #\n    /* */\n    //\n    $b = 2;\n"),
            "<?php\n$a = 1;\n    $b = 2;\n"
        );
    }

    #[test]
    fn test_doc_comments_untouched() {
        let source = "<?php\n/** */\nfunction a() {}\n";
        assert_eq!(fix(source), source);
    }
}

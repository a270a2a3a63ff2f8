//! Comment classification: header comments, docblocks before structural
//! elements and blocks of consecutive line comments

use crate::error::TokensError;
use crate::token::{Token, TokenKind};
use crate::tokens::{BlockType, Tokens};

/// Comment syntax of a single comment token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentType {
    /// `# ...`
    Hash,
    /// `// ...`
    DoubleSlash,
    /// `/* ... */` and `/** ... */`
    SlashAsterisk,
}

const STRUCTURAL_KINDS: &[TokenKind] = &[
    TokenKind::Private,
    TokenKind::Protected,
    TokenKind::Public,
    TokenKind::Var,
    TokenKind::Function,
    TokenKind::Fn,
    TokenKind::Abstract,
    TokenKind::Const,
    TokenKind::Namespace,
    TokenKind::Require,
    TokenKind::RequireOnce,
    TokenKind::Include,
    TokenKind::IncludeOnce,
    TokenKind::Final,
    TokenKind::Readonly,
    TokenKind::Static,
];

const CONTROL_KINDS: &[TokenKind] = &[
    TokenKind::For,
    TokenKind::Foreach,
    TokenKind::If,
    TokenKind::Switch,
    TokenKind::While,
];

const LANGUAGE_CONSTRUCT_KINDS: &[TokenKind] = &[
    TokenKind::List,
    TokenKind::Print,
    TokenKind::Echo,
    TokenKind::DestructuringSquareBraceOpen,
];

#[derive(Debug, Default, Clone, Copy)]
pub struct CommentsAnalyzer;

impl CommentsAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn comment_type(&self, content: &str) -> CommentType {
        let bytes = content.as_bytes();
        if bytes.first() == Some(&b'#') {
            CommentType::Hash
        } else if bytes.get(1) == Some(&b'*') {
            CommentType::SlashAsterisk
        } else {
            CommentType::DoubleSlash
        }
    }

    fn expect_comment(tokens: &Tokens, index: usize) -> Result<&Token, TokensError> {
        match tokens.get(index) {
            Some(token) if token.is_comment() => Ok(token),
            Some(_) => Err(TokensError::InvalidToken {
                index,
                reason: "expected a comment".to_string(),
            }),
            None => Err(TokensError::IndexOutOfBounds {
                index,
                len: tokens.len(),
            }),
        }
    }

    /// Whether the comment at `index` opens the file: only the open tag (and
    /// optionally one `declare(...);`) precedes it and code follows it
    pub fn is_header_comment(&self, tokens: &Tokens, index: usize) -> Result<bool, TokensError> {
        Self::expect_comment(tokens, index)?;
        if tokens.next_meaningful_token(index).is_none() {
            return Ok(false);
        }

        let Some(mut prev) = tokens.prev_non_whitespace(index) else {
            return Ok(false);
        };
        if tokens[prev].is_given_kind(TokenKind::Semicolon) {
            let Some(close) = tokens.prev_meaningful_token(prev) else {
                return Ok(false);
            };
            if !tokens[close].is_given_kind(TokenKind::CloseParen) {
                return Ok(false);
            }
            let open = tokens.find_block_start(BlockType::Parenthesis, close)?;
            let declare = tokens.prev_meaningful_token(open);
            let Some(declare) = declare.filter(|&i| tokens[i].is_given_kind(TokenKind::Declare))
            else {
                return Ok(false);
            };
            match tokens.prev_non_whitespace(declare) {
                Some(i) => prev = i,
                None => return Ok(false),
            }
        }

        Ok(tokens[prev].is_given_kind(TokenKind::OpenTag))
    }

    /// Whether the comment at `index` documents the element that follows it
    pub fn is_before_structural_element(
        &self,
        tokens: &Tokens,
        index: usize,
    ) -> Result<bool, TokensError> {
        let comment = Self::expect_comment(tokens, index)?;

        let mut next = Some(index);
        loop {
            next = next.and_then(|i| tokens.next_meaningful_token(i));
            while let Some(i) = next.filter(|&i| tokens[i].is_given_kind(TokenKind::AttributeOpen)) {
                let end = tokens.find_block_end(BlockType::Attribute, i)?;
                next = tokens.next_meaningful_token(end);
            }
            if !next.is_some_and(|i| tokens[i].is_given_kind(TokenKind::OpenParen)) {
                break;
            }
        }

        let Some(next) = next else {
            return Ok(false);
        };
        let token = &tokens[next];
        if token.is_given_kind(TokenKind::CloseBrace) {
            return Ok(false);
        }
        if token.is_classy() || token.is_any_kind(STRUCTURAL_KINDS) {
            return Ok(true);
        }
        if self.is_valid_control(tokens, comment, next)? {
            return Ok(true);
        }
        if Self::is_assignment(tokens, next) {
            return Ok(true);
        }
        Ok(self.is_valid_language_construct(tokens, comment, next))
    }

    /// `if ($x ...)`-style control structure whose condition names a variable
    /// mentioned in the comment
    fn is_valid_control(
        &self,
        tokens: &Tokens,
        comment: &Token,
        index: usize,
    ) -> Result<bool, TokensError> {
        if !tokens[index].is_any_kind(CONTROL_KINDS) {
            return Ok(false);
        }
        let Some(open) = tokens
            .next_meaningful_token(index)
            .filter(|&i| tokens[i].is_given_kind(TokenKind::OpenParen))
        else {
            return Ok(false);
        };
        let close = tokens.find_block_end(BlockType::Parenthesis, open)?;
        Ok(Self::mentions_variable(tokens, comment, open + 1..close))
    }

    /// `list(...)`, `print`, `echo` or `[...] =` naming a documented variable
    fn is_valid_language_construct(&self, tokens: &Tokens, comment: &Token, index: usize) -> bool {
        if !tokens[index].is_any_kind(LANGUAGE_CONSTRUCT_KINDS) {
            return false;
        }
        let end_kind = if tokens[index].is_given_kind(TokenKind::DestructuringSquareBraceOpen) {
            TokenKind::DestructuringSquareBraceClose
        } else {
            TokenKind::CloseParen
        };
        let end = tokens
            .next_token_of_kind(index, &[end_kind])
            .unwrap_or(tokens.len());
        Self::mentions_variable(tokens, comment, index + 1..end)
    }

    fn is_assignment(tokens: &Tokens, index: usize) -> bool {
        tokens[index].is_given_kind(TokenKind::Variable)
            && tokens
                .next_meaningful_token(index)
                .is_some_and(|i| tokens[i].is_given_kind(TokenKind::Equals))
    }

    fn mentions_variable(tokens: &Tokens, comment: &Token, range: std::ops::Range<usize>) -> bool {
        range.into_iter().any(|i| {
            tokens[i].is_given_kind(TokenKind::Variable)
                && comment.content().contains(tokens[i].content())
        })
    }

    /// Indices of the comment block starting at `index`: consecutive line
    /// comments of the same style separated by at most one line break
    pub fn comment_block_indices(
        &self,
        tokens: &Tokens,
        index: usize,
    ) -> Result<Vec<usize>, TokensError> {
        let first = Self::expect_comment(tokens, index)?;
        if !first.is_given_kind(TokenKind::Comment) {
            return Err(TokensError::InvalidToken {
                index,
                reason: "expected a non-doc comment".to_string(),
            });
        }

        let style = self.comment_type(first.content());
        let mut indices = vec![index];
        if style == CommentType::SlashAsterisk {
            return Ok(indices);
        }

        for i in index + 1..tokens.len() {
            let token = &tokens[i];
            if token.is_comment() {
                if self.comment_type(token.content()) == style {
                    indices.push(i);
                    continue;
                }
                break;
            }
            if !token.is_whitespace() || token.line_break_count() > 1 {
                break;
            }
        }
        Ok(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Tokens {
        Tokens::from_code(source).unwrap()
    }

    fn comment_at(tokens: &Tokens, nth: usize) -> usize {
        tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_comment())
            .map(|(i, _)| i)
            .nth(nth)
            .unwrap()
    }

    #[test]
    fn test_comment_type() {
        let analyzer = CommentsAnalyzer::new();
        assert_eq!(analyzer.comment_type("# x"), CommentType::Hash);
        assert_eq!(analyzer.comment_type("// x"), CommentType::DoubleSlash);
        assert_eq!(analyzer.comment_type("/* x */"), CommentType::SlashAsterisk);
        assert_eq!(analyzer.comment_type("/** x */"), CommentType::SlashAsterisk);
    }

    #[test]
    fn test_header_comment() {
        let analyzer = CommentsAnalyzer::new();
        let t = tokens("<?php\n/* header */\n\nnamespace A;\n");
        assert!(analyzer.is_header_comment(&t, comment_at(&t, 0)).unwrap());

        let t = tokens("<?php\ndeclare(strict_types=1);\n/* header */\nnamespace A;\n");
        assert!(analyzer.is_header_comment(&t, comment_at(&t, 0)).unwrap());

        let t = tokens("<?php\n$a = 1;\n/* not header */\n$b = 2;\n");
        assert!(!analyzer.is_header_comment(&t, comment_at(&t, 0)).unwrap());

        // Nothing follows it
        let t = tokens("<?php\n/* alone */\n");
        assert!(!analyzer.is_header_comment(&t, comment_at(&t, 0)).unwrap());
    }

    #[test]
    fn test_header_comment_requires_comment_index() {
        let t = tokens("<?php $a;");
        let err = CommentsAnalyzer::new().is_header_comment(&t, 1).unwrap_err();
        assert!(matches!(err, TokensError::InvalidToken { index: 1, .. }));
    }

    #[test]
    fn test_before_structural_element() {
        let analyzer = CommentsAnalyzer::new();
        let cases = [
            ("<?php\n/** doc */\nfunction f() {}\n", true),
            ("<?php\n/** doc */\n#[Attr]\nfinal class A {}\n", true),
            ("<?php\n/** @var int $a */\n$a = 1;\n", true),
            ("<?php\n/** @var int $a */\nforeach ($list as $a) {}\n", true),
            ("<?php\n/** @var int $b */\nforeach ($list as $a) {}\n", false),
            ("<?php\n/** @var int $a */\n[$a, $b] = f();\n", true),
            ("<?php\n/** @var int $a */\nlist($a) = f();\n", true),
            ("<?php\n/** doc */\n$a->call();\n", false),
            ("<?php\nfunction f() {\n/** doc */\n}\n", false),
            ("<?php\n/** doc */\n", false),
        ];
        for (source, expected) in cases {
            let t = tokens(source);
            let index = comment_at(&t, 0);
            assert_eq!(
                analyzer.is_before_structural_element(&t, index).unwrap(),
                expected,
                "{source:?}"
            );
        }
    }

    #[test]
    fn test_comment_block_indices() {
        let analyzer = CommentsAnalyzer::new();
        let t = tokens("<?php\n// a\n// b\n\n// c\n# d\n");
        let first = comment_at(&t, 0);
        let block = analyzer.comment_block_indices(&t, first).unwrap();
        assert_eq!(block, vec![first, comment_at(&t, 1)]);

        let third = comment_at(&t, 2);
        assert_eq!(analyzer.comment_block_indices(&t, third).unwrap(), vec![third]);
    }

    #[test]
    fn test_comment_block_split_by_blank_line() {
        let analyzer = CommentsAnalyzer::new();
        let t = tokens("<?php\n// a\n// b\n// c\n$x = 1;\n");
        let first = comment_at(&t, 0);
        assert_eq!(
            analyzer.comment_block_indices(&t, first).unwrap(),
            vec![first, comment_at(&t, 1), comment_at(&t, 2)]
        );

        let t = tokens("<?php\n// a\n\n// b\n// c\n");
        let first = comment_at(&t, 0);
        let second = comment_at(&t, 1);
        assert_eq!(analyzer.comment_block_indices(&t, first).unwrap(), vec![first]);
        assert_eq!(
            analyzer.comment_block_indices(&t, second).unwrap(),
            vec![second, comment_at(&t, 2)]
        );
    }

    #[test]
    fn test_slash_asterisk_is_a_block_of_one() {
        let analyzer = CommentsAnalyzer::new();
        let t = tokens("<?php\n/* a */\n/* b */\n");
        let first = comment_at(&t, 0);
        assert_eq!(analyzer.comment_block_indices(&t, first).unwrap(), vec![first]);
    }

    #[test]
    fn test_comment_block_rejects_doc_comment() {
        let t = tokens("<?php\n/** doc */\n");
        assert!(CommentsAnalyzer::new()
            .comment_block_indices(&t, comment_at(&t, 0))
            .is_err());
    }
}

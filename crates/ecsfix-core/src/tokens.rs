//! Mutable, index-addressable token collection

use std::collections::HashMap;
use std::ops::{Index, Range};

use tracing::trace;

use crate::error::{LexError, TokensError};
use crate::lexer::tokenize;
use crate::token::{self, Token, TokenKind};
use crate::transformer::Transformers;

/// Delimited block kinds that can be matched with
/// [`Tokens::find_block_end`] and [`Tokens::find_block_start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Parenthesis,
    CurlyBrace,
    IndexSquareBrace,
    ArraySquareBrace,
    DestructuringSquareBrace,
    Attribute,
}

impl BlockType {
    pub const ALL: [BlockType; 6] = [
        BlockType::Parenthesis,
        BlockType::CurlyBrace,
        BlockType::IndexSquareBrace,
        BlockType::ArraySquareBrace,
        BlockType::DestructuringSquareBrace,
        BlockType::Attribute,
    ];

    /// Opening and closing delimiter kinds
    pub fn delimiters(self) -> (TokenKind, TokenKind) {
        match self {
            BlockType::Parenthesis => (TokenKind::OpenParen, TokenKind::CloseParen),
            BlockType::CurlyBrace => (TokenKind::OpenBrace, TokenKind::CloseBrace),
            BlockType::IndexSquareBrace => (TokenKind::OpenBracket, TokenKind::CloseBracket),
            BlockType::ArraySquareBrace => (
                TokenKind::ArraySquareBraceOpen,
                TokenKind::ArraySquareBraceClose,
            ),
            BlockType::DestructuringSquareBrace => (
                TokenKind::DestructuringSquareBraceOpen,
                TokenKind::DestructuringSquareBraceClose,
            ),
            BlockType::Attribute => (TokenKind::AttributeOpen, TokenKind::AttributeClose),
        }
    }

    /// Block opened by a token of this kind, if any
    pub fn opened_by(kind: TokenKind) -> Option<BlockType> {
        Self::ALL.into_iter().find(|b| b.delimiters().0 == kind)
    }
}

/// The token collection one file pass works on
///
/// Indices stay valid across [`Tokens::set`] and [`Tokens::clear_at`]; any
/// insert, remove or [`Tokens::clear_empty_tokens`] shifts them.
#[derive(Debug, Clone, Default)]
pub struct Tokens {
    items: Vec<Token>,
    kind_counts: HashMap<TokenKind, usize>,
    changed: bool,
}

impl Tokens {
    /// Lex `source` and run the default transformer passes
    pub fn from_code(source: &str) -> Result<Self, LexError> {
        let mut items = tokenize(source)?;
        Transformers::default().apply(&mut items);
        trace!(count = items.len(), "tokenized source");
        Ok(Self::from_vec(items))
    }

    /// Wrap already lexed tokens without running transformers
    pub fn from_vec(items: Vec<Token>) -> Self {
        let mut kind_counts = HashMap::new();
        for token in &items {
            *kind_counts.entry(token.kind()).or_insert(0) += 1;
        }
        Self {
            items,
            kind_counts,
            changed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.items.iter()
    }

    /// Whether any mutation happened since construction or the last reset
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn reset_changed(&mut self) {
        self.changed = false;
    }

    fn check_index(&self, index: usize) -> Result<(), TokensError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(TokensError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            })
        }
    }

    fn count_in(&mut self, kind: TokenKind) {
        *self.kind_counts.entry(kind).or_insert(0) += 1;
    }

    fn count_out(&mut self, kind: TokenKind) {
        if let Some(count) = self.kind_counts.get_mut(&kind) {
            *count -= 1;
            if *count == 0 {
                self.kind_counts.remove(&kind);
            }
        }
    }

    fn replace(&mut self, index: usize, token: Token) {
        if self.items[index] == token {
            return;
        }
        let old = std::mem::replace(&mut self.items[index], token);
        self.count_out(old.kind());
        self.count_in(self.items[index].kind());
        self.changed = true;
    }

    /// Overwrite the token at `index`
    ///
    /// A token with empty content is rejected; use [`Tokens::clear_at`] to
    /// blank a slot.
    pub fn set(&mut self, index: usize, token: Token) -> Result<(), TokensError> {
        self.check_index(index)?;
        if token.content().is_empty() {
            return Err(TokensError::InvalidToken {
                index,
                reason: "cannot set a token with empty content".to_string(),
            });
        }
        self.replace(index, token);
        Ok(())
    }

    /// Insert before `index`; `index == len()` appends
    pub fn insert_at(&mut self, index: usize, token: Token) -> Result<(), TokensError> {
        self.insert_all_at(index, vec![token])
    }

    pub fn insert_all_at(&mut self, index: usize, tokens: Vec<Token>) -> Result<(), TokensError> {
        if index > self.items.len() {
            return Err(TokensError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        if tokens.is_empty() {
            return Ok(());
        }
        for token in &tokens {
            self.count_in(token.kind());
        }
        self.items.splice(index..index, tokens);
        self.changed = true;
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Token, TokensError> {
        self.check_index(index)?;
        let token = self.items.remove(index);
        self.count_out(token.kind());
        self.changed = true;
        Ok(token)
    }

    /// Blank the slot at `index`, keeping indices stable until
    /// [`Tokens::clear_empty_tokens`]
    pub fn clear_at(&mut self, index: usize) -> Result<(), TokensError> {
        self.check_index(index)?;
        self.replace(index, Token::empty());
        Ok(())
    }

    /// Drop every cleared slot
    pub fn clear_empty_tokens(&mut self) {
        let before = self.items.len();
        self.items.retain(|t| !t.is_given_kind(TokenKind::Empty));
        if self.items.len() != before {
            self.kind_counts.remove(&TokenKind::Empty);
        }
    }

    /// Index of the delimiter closing the block opened at `start`
    pub fn find_block_end(&self, block: BlockType, start: usize) -> Result<usize, TokensError> {
        let (open, close) = block.delimiters();
        self.check_index(start)?;
        if !self.items[start].is_given_kind(open) {
            return Err(TokensError::InvariantViolation(format!(
                "token at index {} is not the start of a {:?} block",
                start, block
            )));
        }
        let mut depth = 0usize;
        for index in start..self.items.len() {
            let kind = self.items[index].kind();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return Ok(index);
                }
            }
        }
        Err(TokensError::InvariantViolation(format!(
            "missing end of {:?} block opened at index {}",
            block, start
        )))
    }

    /// Index of the delimiter opening the block closed at `end`
    pub fn find_block_start(&self, block: BlockType, end: usize) -> Result<usize, TokensError> {
        let (open, close) = block.delimiters();
        self.check_index(end)?;
        if !self.items[end].is_given_kind(close) {
            return Err(TokensError::InvariantViolation(format!(
                "token at index {} is not the end of a {:?} block",
                end, block
            )));
        }
        let mut depth = 0usize;
        for index in (0..=end).rev() {
            let kind = self.items[index].kind();
            if kind == close {
                depth += 1;
            } else if kind == open {
                depth -= 1;
                if depth == 0 {
                    return Ok(index);
                }
            }
        }
        Err(TokensError::InvariantViolation(format!(
            "missing start of {:?} block closed at index {}",
            block, end
        )))
    }

    pub fn next_meaningful_token(&self, index: usize) -> Option<usize> {
        self.next_matching(index, Token::is_meaningful)
    }

    pub fn prev_meaningful_token(&self, index: usize) -> Option<usize> {
        self.prev_matching(index, Token::is_meaningful)
    }

    pub fn first_meaningful_token(&self) -> Option<usize> {
        self.items.iter().position(Token::is_meaningful)
    }

    /// Next token that is not whitespace (comments included)
    pub fn next_non_whitespace(&self, index: usize) -> Option<usize> {
        self.next_matching(index, |t| !t.is_whitespace())
    }

    pub fn prev_non_whitespace(&self, index: usize) -> Option<usize> {
        self.prev_matching(index, |t| !t.is_whitespace())
    }

    /// Next token after `index` whose kind is one of `kinds`
    pub fn next_token_of_kind(&self, index: usize, kinds: &[TokenKind]) -> Option<usize> {
        self.next_matching(index, |t| t.is_any_kind(kinds))
    }

    fn next_matching(&self, index: usize, pred: impl Fn(&Token) -> bool) -> Option<usize> {
        let from = index.checked_add(1)?;
        (from..self.items.len()).find(|&i| pred(&self.items[i]))
    }

    fn prev_matching(&self, index: usize, pred: impl Fn(&Token) -> bool) -> Option<usize> {
        (0..index.min(self.items.len()))
            .rev()
            .find(|&i| pred(&self.items[i]))
    }

    pub fn is_token_kind_found(&self, kind: TokenKind) -> bool {
        self.kind_counts.contains_key(&kind)
    }

    pub fn is_any_token_kind_found(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|k| self.is_token_kind_found(*k))
    }

    pub fn is_all_token_kinds_found(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().all(|k| self.is_token_kind_found(*k))
    }

    /// Occurrences of `kind` currently in the collection
    pub fn kind_count(&self, kind: TokenKind) -> usize {
        self.kind_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn generate_code(&self) -> String {
        let capacity = self.items.iter().map(|t| t.content().len()).sum();
        let mut code = String::with_capacity(capacity);
        for token in &self.items {
            code.push_str(token.content());
        }
        code
    }

    /// Line breaks within the tokens of `range`, clamped to the collection
    pub fn count_line_breaks(&self, range: Range<usize>) -> usize {
        let end = range.end.min(self.items.len());
        let start = range.start.min(end);
        self.items[start..end]
            .iter()
            .map(|t| token::count_line_breaks(t.content()))
            .sum()
    }
}

impl Index<usize> for Tokens {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tokens(source: &str) -> Tokens {
        Tokens::from_code(source).unwrap()
    }

    fn index_of(tokens: &Tokens, content: &str) -> usize {
        tokens.iter().position(|t| t.equals(content)).unwrap()
    }

    #[test]
    fn test_round_trip() {
        let source = "<html>\n<?php\n// c\nfunction &f(array $a = []) {\n    return $a[0] ?? null;\n}\n?>\ntail";
        assert_eq!(tokens(source).generate_code(), source);
    }

    #[test]
    fn test_set_rejects_empty_content() {
        let mut t = tokens("<?php $a;");
        let err = t.set(1, Token::new(TokenKind::Variable, "")).unwrap_err();
        assert!(matches!(err, TokensError::InvalidToken { index: 1, .. }));
        assert!(!t.is_changed());
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut t = tokens("<?php $a;");
        assert_eq!(
            t.set(10, Token::whitespace(" ")),
            Err(TokensError::IndexOutOfBounds { index: 10, len: 3 })
        );
    }

    #[test]
    fn test_set_same_token_is_not_a_change() {
        let mut t = tokens("<?php $a;");
        let same = t[1].clone();
        t.set(1, same).unwrap();
        assert!(!t.is_changed());
    }

    #[test]
    fn test_insert_and_remove() {
        let mut t = tokens("<?php $a;");
        t.insert_at(3, Token::whitespace("\n")).unwrap();
        assert_eq!(t.generate_code(), "<?php $a;\n");
        assert!(t.insert_at(10, Token::whitespace(" ")).is_err());

        let removed = t.remove_at(1).unwrap();
        assert_eq!(removed.content(), "$a");
        assert_eq!(t.generate_code(), "<?php ;\n");
        assert!(t.is_changed());
        assert!(t.remove_at(5).is_err());
    }

    #[test]
    fn test_clear_keeps_indices_until_compaction() {
        let mut t = tokens("<?php $a = 1;");
        let len = t.len();
        t.clear_at(2).unwrap();
        assert_eq!(t.len(), len);
        assert!(t.is_token_kind_found(TokenKind::Empty));
        assert_eq!(t.next_meaningful_token(1), Some(3));

        t.clear_empty_tokens();
        assert_eq!(t.len(), len - 1);
        assert!(!t.is_token_kind_found(TokenKind::Empty));
        assert_eq!(t.generate_code(), "<?php $a= 1;");
    }

    #[test]
    fn test_kind_counts_follow_mutations() {
        let mut t = tokens("<?php $a; $b;");
        assert_eq!(t.kind_count(TokenKind::Variable), 2);

        let a = index_of(&t, "$a");
        t.set(a, Token::new(TokenKind::String, "foo")).unwrap();
        assert_eq!(t.kind_count(TokenKind::Variable), 1);
        assert!(t.is_token_kind_found(TokenKind::String));

        let b = index_of(&t, "$b");
        t.remove_at(b).unwrap();
        assert!(!t.is_token_kind_found(TokenKind::Variable));

        t.insert_all_at(1, vec![Token::new(TokenKind::Variable, "$c"), Token::whitespace(" ")])
            .unwrap();
        assert!(t.is_all_token_kinds_found(&[TokenKind::Variable, TokenKind::String]));
        assert!(!t.is_any_token_kind_found(&[TokenKind::Class, TokenKind::Function]));
    }

    #[test]
    fn test_block_matching() {
        let t = tokens("<?php if (($a)) { $b = [1, [2]]; }");
        let open = index_of(&t, "(");
        let close = t.find_block_end(BlockType::Parenthesis, open).unwrap();
        assert!(t[close].equals(")"));
        assert_eq!(t.find_block_start(BlockType::Parenthesis, close), Ok(open));
        assert_eq!(t.next_meaningful_token(close).map(|i| t[i].content()), Some("{"));

        let brace = index_of(&t, "{");
        let brace_end = t.find_block_end(BlockType::CurlyBrace, brace).unwrap();
        assert_eq!(brace_end, t.len() - 1);

        let array = index_of(&t, "[");
        let array_end = t.find_block_end(BlockType::ArraySquareBrace, array).unwrap();
        assert_eq!(t.next_meaningful_token(array_end).map(|i| t[i].content()), Some(";"));
    }

    #[test]
    fn test_block_matching_misuse() {
        let t = tokens("<?php f(1;");
        let open = index_of(&t, "(");
        assert!(matches!(
            t.find_block_end(BlockType::Parenthesis, open),
            Err(TokensError::InvariantViolation(_))
        ));
        assert!(matches!(
            t.find_block_end(BlockType::CurlyBrace, open),
            Err(TokensError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_navigation() {
        let t = tokens("<?php /* c */ $a\n\n;");
        assert_eq!(t.first_meaningful_token(), Some(0));
        let a = index_of(&t, "$a");
        assert_eq!(t.prev_meaningful_token(a), Some(0));
        assert_eq!(t.prev_non_whitespace(a).map(|i| t[i].content()), Some("/* c */"));
        assert_eq!(t.next_non_whitespace(0).map(|i| t[i].content()), Some("/* c */"));
        assert_eq!(t.next_meaningful_token(a), Some(t.len() - 1));
        assert_eq!(t.next_meaningful_token(t.len() - 1), None);
        assert_eq!(t.prev_meaningful_token(0), None);
        assert_eq!(t.next_token_of_kind(0, &[TokenKind::Semicolon]), Some(t.len() - 1));
        assert_eq!(t.count_line_breaks(0..t.len()), 2);
    }

    fn php_fragments() -> impl Strategy<Value = String> {
        let fragments = vec![
            "$a", " ", "\n", "(", ")", "{", "}", "foo", "=", ";", "[", "]", "// c\n", "'s'",
            "1", ",", "/* x */", "function", "&",
        ];
        prop::collection::vec(prop::sample::select(fragments), 0..40)
            .prop_map(|parts| format!("<?php {}", parts.concat()))
    }

    proptest! {
        #[test]
        fn prop_round_trip(source in php_fragments()) {
            let t = Tokens::from_code(&source).unwrap();
            prop_assert_eq!(t.generate_code(), source);
        }

        #[test]
        fn prop_block_matching_is_symmetric(source in php_fragments()) {
            let t = Tokens::from_code(&source).unwrap();
            for block in BlockType::ALL {
                let (open, _) = block.delimiters();
                for i in (0..t.len()).filter(|&i| t[i].is_given_kind(open)) {
                    if let Ok(end) = t.find_block_end(block, i) {
                        prop_assert_eq!(t.find_block_start(block, end), Ok(i));
                    }
                }
            }
        }

        #[test]
        fn prop_next_meaningful_skips_only_trivia(source in php_fragments()) {
            let t = Tokens::from_code(&source).unwrap();
            for i in 0..t.len() {
                match t.next_meaningful_token(i) {
                    Some(j) => {
                        prop_assert!(j > i && t[j].is_meaningful());
                        prop_assert!((i + 1..j).all(|k| !t[k].is_meaningful()));
                    }
                    None => prop_assert!((i + 1..t.len()).all(|k| !t[k].is_meaningful())),
                }
            }
        }
    }
}

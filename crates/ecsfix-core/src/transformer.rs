//! Transformer passes assigning custom token kinds after lexing
//!
//! The lexer only knows local context. Some distinctions fixers rely on
//! (a return-by-reference `&`, which `]` closes an attribute, array literal
//! versus index access versus destructuring brackets) need a look at the
//! neighbouring meaningful tokens, so they are resolved here.

use crate::token::{Token, TokenKind};

/// A pass over freshly lexed tokens
pub trait Transformer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Custom kinds this pass may assign
    fn custom_kinds(&self) -> &'static [TokenKind];

    fn process(&self, tokens: &mut [Token]);
}

/// Ordered set of transformer passes
pub struct Transformers {
    items: Vec<Box<dyn Transformer>>,
}

impl Transformers {
    pub fn new(items: Vec<Box<dyn Transformer>>) -> Self {
        Self { items }
    }

    pub fn apply(&self, tokens: &mut [Token]) {
        for transformer in &self.items {
            transformer.process(tokens);
        }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.items.iter().map(|t| t.name()).collect()
    }
}

impl Default for Transformers {
    fn default() -> Self {
        Self::new(vec![Box::new(SquareBraceTransformer), Box::new(ReturnRefTransformer)])
    }
}

fn prev_meaningful(tokens: &[Token], index: usize) -> Option<usize> {
    (0..index).rev().find(|&i| tokens[i].is_meaningful())
}

fn next_meaningful(tokens: &[Token], index: usize) -> Option<usize> {
    (index + 1..tokens.len()).find(|&i| tokens[i].is_meaningful())
}

/// `&` right after `function` or `fn` becomes [`TokenKind::ReturnRef`]
pub struct ReturnRefTransformer;

impl Transformer for ReturnRefTransformer {
    fn name(&self) -> &'static str {
        "return_ref"
    }

    fn custom_kinds(&self) -> &'static [TokenKind] {
        &[TokenKind::ReturnRef]
    }

    fn process(&self, tokens: &mut [Token]) {
        for index in 0..tokens.len() {
            if !tokens[index].is_given_kind(TokenKind::Ampersand) {
                continue;
            }
            let follows_function = prev_meaningful(tokens, index)
                .is_some_and(|prev| tokens[prev].is_any_kind(&[TokenKind::Function, TokenKind::Fn]));
            if follows_function {
                tokens[index] = Token::new(TokenKind::ReturnRef, "&");
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Square {
    Attribute,
    Index,
    Array,
}

struct ArrayPair {
    open: usize,
    close: usize,
    parent: Option<usize>,
}

/// Classifies `[`/`]` into attribute, index, array and destructuring braces
pub struct SquareBraceTransformer;

impl SquareBraceTransformer {
    /// A `[` in value position opens an array literal; after an operand it
    /// indexes into that operand.
    fn opens_array(tokens: &[Token], index: usize) -> bool {
        let Some(prev) = prev_meaningful(tokens, index) else {
            return true;
        };
        !tokens[prev].is_any_kind(&[
            TokenKind::Variable,
            TokenKind::String,
            TokenKind::NameQualified,
            TokenKind::NameFullyQualified,
            TokenKind::ConstantEncapsedString,
            TokenKind::CloseParen,
            TokenKind::CloseBracket,
            TokenKind::ArraySquareBraceClose,
        ])
    }

    fn is_destructuring(tokens: &[Token], pair: &ArrayPair) -> bool {
        let assigned = next_meaningful(tokens, pair.close)
            .is_some_and(|next| tokens[next].is_given_kind(TokenKind::Equals));
        let foreach_target = prev_meaningful(tokens, pair.open)
            .is_some_and(|prev| tokens[prev].is_given_kind(TokenKind::As));
        assigned || foreach_target
    }

    /// A nested list element: directly inside its parent, after `[`, `,` or `=>`
    fn is_list_element(tokens: &[Token], pair: &ArrayPair, parent: &ArrayPair) -> bool {
        prev_meaningful(tokens, pair.open).is_some_and(|prev| {
            prev == parent.open
                || tokens[prev].is_any_kind(&[TokenKind::Comma, TokenKind::DoubleArrow])
        })
    }
}

impl Transformer for SquareBraceTransformer {
    fn name(&self) -> &'static str {
        "square_brace"
    }

    fn custom_kinds(&self) -> &'static [TokenKind] {
        &[
            TokenKind::AttributeClose,
            TokenKind::ArraySquareBraceOpen,
            TokenKind::ArraySquareBraceClose,
            TokenKind::DestructuringSquareBraceOpen,
            TokenKind::DestructuringSquareBraceClose,
        ]
    }

    fn process(&self, tokens: &mut [Token]) {
        let mut stack: Vec<(usize, Square, Option<usize>)> = Vec::new();
        let mut pairs: Vec<ArrayPair> = Vec::new();

        for index in 0..tokens.len() {
            match tokens[index].kind() {
                TokenKind::AttributeOpen => stack.push((index, Square::Attribute, None)),
                TokenKind::OpenBracket => {
                    if Self::opens_array(tokens, index) {
                        // Nearest enclosing array literal, if it is the innermost bracket
                        let parent = match stack.last() {
                            Some((open, Square::Array, _)) => {
                                pairs.iter().position(|p| p.open == *open)
                            }
                            _ => None,
                        };
                        tokens[index] = Token::new(TokenKind::ArraySquareBraceOpen, "[");
                        pairs.push(ArrayPair {
                            open: index,
                            close: index,
                            parent,
                        });
                        stack.push((index, Square::Array, parent));
                    } else {
                        stack.push((index, Square::Index, None));
                    }
                }
                TokenKind::CloseBracket => match stack.pop() {
                    Some((_, Square::Attribute, _)) => {
                        tokens[index] = Token::new(TokenKind::AttributeClose, "]");
                    }
                    Some((open, Square::Array, _)) => {
                        tokens[index] = Token::new(TokenKind::ArraySquareBraceClose, "]");
                        if let Some(pair) = pairs.iter_mut().find(|p| p.open == open) {
                            pair.close = index;
                        }
                    }
                    Some((_, Square::Index, _)) | None => {}
                },
                _ => {}
            }
        }

        // Unclosed array openers are left as plain brackets
        for pair in pairs.iter().filter(|p| p.close == p.open) {
            tokens[pair.open] = Token::new(TokenKind::OpenBracket, "[");
        }

        // Parents precede children, so a single forward sweep settles nesting
        let mut destructuring = vec![false; pairs.len()];
        for (i, pair) in pairs.iter().enumerate() {
            if pair.close == pair.open {
                continue;
            }
            let inherited = pair.parent.is_some_and(|p| {
                destructuring[p] && Self::is_list_element(tokens, pair, &pairs[p])
            });
            destructuring[i] = inherited || Self::is_destructuring(tokens, pair);
        }

        for (pair, is_list) in pairs.iter().zip(destructuring) {
            if is_list {
                tokens[pair.open] = Token::new(TokenKind::DestructuringSquareBraceOpen, "[");
                tokens[pair.close] = Token::new(TokenKind::DestructuringSquareBraceClose, "]");
            }
        }
    }
}

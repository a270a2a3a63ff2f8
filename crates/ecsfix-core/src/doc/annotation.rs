//! Doctrine-style annotation tokens re-lexed from one doc comment

use std::ops::Index;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::TokensError;
use crate::token::{Token, TokenKind};

/// Kind of an annotation token. Free text between annotations is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocTokenKind {
    None,
    Integer,
    String,
    Float,
    Identifier,
    True,
    False,
    Null,
    At,
    OpenParenthesis,
    CloseParenthesis,
    OpenCurlyBrace,
    CloseCurlyBrace,
    Comma,
    Equals,
    Colon,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationToken {
    kind: DocTokenKind,
    content: String,
}

impl AnnotationToken {
    pub fn new(kind: DocTokenKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn kind(&self) -> DocTokenKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_type(&self, kind: DocTokenKind) -> bool {
        self.kind == kind
    }
}

/// A lexeme found by the doc lexer, positioned relative to its input
struct Scanned {
    kind: DocTokenKind,
    start: usize,
    end: usize,
}

fn doc_lexer() -> &'static Regex {
    static DOC_LEXER_REGEX: OnceLock<Regex> = OnceLock::new();
    DOC_LEXER_REGEX.get_or_init(|| {
        Regex::new(
            r#"(?is)([a-z_\\][a-z0-9_:\\]*[a-z_][a-z0-9_]*|[a-z_])|((?:[+-]?[0-9]+(?:\.[0-9]+)*)(?:e[+-]?[0-9]+)?)|("(?:""|[^"])*")|(\s+|\*+)|(.)"#,
        )
        .unwrap()
    })
}

/// Lexemes of `input`, skipping whitespace and `*` runs
fn scan(input: &str) -> impl Iterator<Item = Scanned> + '_ {
    doc_lexer().captures_iter(input).filter_map(|caps| {
        let (group, m) = (1..=5).find_map(|g| caps.get(g).map(|m| (g, m)))?;
        let kind = match group {
            1 => match m.as_str().to_ascii_lowercase().as_str() {
                "true" => DocTokenKind::True,
                "false" => DocTokenKind::False,
                "null" => DocTokenKind::Null,
                _ => DocTokenKind::Identifier,
            },
            2 if m.as_str().contains(['.', 'e', 'E']) => DocTokenKind::Float,
            2 => DocTokenKind::Integer,
            3 => DocTokenKind::String,
            4 => return None,
            _ => match m.as_str() {
                "@" => DocTokenKind::At,
                "(" => DocTokenKind::OpenParenthesis,
                ")" => DocTokenKind::CloseParenthesis,
                "{" => DocTokenKind::OpenCurlyBrace,
                "}" => DocTokenKind::CloseCurlyBrace,
                "," => DocTokenKind::Comma,
                "=" => DocTokenKind::Equals,
                ":" => DocTokenKind::Colon,
                _ => DocTokenKind::None,
            },
        };
        Some(Scanned {
            kind,
            start: m.start(),
            end: m.end(),
        })
    })
}

/// Token sequence of a single doc comment
///
/// Owned by the caller and never aliased into the file's
/// [`crate::Tokens`]; write it back with [`AnnotationTokens::generate_code`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotationTokens {
    items: Vec<AnnotationToken>,
}

impl AnnotationTokens {
    /// Split a doc comment into annotations (`@`, tag name and a balanced
    /// argument list) and free text. Tags listed in `ignored_tags` stay text.
    /// Returns `None` if `token` is not a doc comment.
    pub fn from_doc_comment(token: &Token, ignored_tags: &[String]) -> Option<Self> {
        if !token.is_given_kind(TokenKind::DocComment) {
            return None;
        }
        let content = token.content();
        let mut items = Vec::new();
        let mut ignored_text_position = 0;
        let mut current = 0;

        while let Some(found) = content[current..].find('@') {
            let at = current + found;
            let after_space = content[..at]
                .chars()
                .next_back()
                .map_or(true, char::is_whitespace);
            if !after_space {
                current = at + 1;
                continue;
            }

            let rest = &content[at..];
            let mut scanned = Vec::new();
            let mut used = 0;
            let mut scopes = 0usize;
            for (index, lexeme) in scan(rest).enumerate() {
                if index == 0 && lexeme.kind != DocTokenKind::At {
                    break;
                }
                if index == 1 {
                    let tag = &rest[lexeme.start..lexeme.end];
                    if lexeme.kind != DocTokenKind::Identifier
                        || ignored_tags.iter().any(|t| t == tag)
                    {
                        break;
                    }
                    used = 2;
                }
                if index >= 2
                    && scopes == 0
                    && !matches!(lexeme.kind, DocTokenKind::None | DocTokenKind::OpenParenthesis)
                {
                    break;
                }
                let kind = lexeme.kind;
                scanned.push(lexeme);
                if kind == DocTokenKind::OpenParenthesis {
                    scopes += 1;
                } else if kind == DocTokenKind::CloseParenthesis {
                    scopes -= 1;
                    if scopes == 0 {
                        used = scanned.len();
                        break;
                    }
                }
            }

            // Unbalanced argument list: leave the remainder as text
            if scopes != 0 {
                break;
            }
            if used == 0 {
                current = at + 1;
                continue;
            }

            if at > ignored_text_position {
                items.push(AnnotationToken::new(
                    DocTokenKind::None,
                    &content[ignored_text_position..at],
                ));
            }
            let mut last_end = 0;
            for lexeme in &scanned[..used] {
                if lexeme.start > last_end {
                    items.push(AnnotationToken::new(
                        DocTokenKind::None,
                        &rest[last_end..lexeme.start],
                    ));
                }
                items.push(AnnotationToken::new(
                    lexeme.kind,
                    &rest[lexeme.start..lexeme.end],
                ));
                last_end = lexeme.end;
            }
            current = at + last_end;
            ignored_text_position = current;
        }

        if ignored_text_position < content.len() {
            items.push(AnnotationToken::new(
                DocTokenKind::None,
                &content[ignored_text_position..],
            ));
        }
        Some(Self { items })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AnnotationToken> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnnotationToken> {
        self.items.iter()
    }

    /// Next index after `index` that is not free text
    pub fn next_meaningful_token(&self, index: usize) -> Option<usize> {
        (index + 1..self.items.len()).find(|&i| !self.items[i].is_type(DocTokenKind::None))
    }

    pub fn prev_meaningful_token(&self, index: usize) -> Option<usize> {
        (0..index.min(self.items.len()))
            .rev()
            .find(|&i| !self.items[i].is_type(DocTokenKind::None))
    }

    /// Last index belonging to the annotation whose `@` is at `index`:
    /// the closing parenthesis of its argument list, or the tag name
    pub fn annotation_end(&self, index: usize) -> Option<usize> {
        static CONTINUATION_REGEX: OnceLock<Regex> = OnceLock::new();
        let continuation = CONTINUATION_REGEX
            .get_or_init(|| Regex::new(r"^(?:(?:\r\n|\n|\r)\s*\*\s*)*\s*$").unwrap());

        let open = match (self.items.get(index + 2), self.items.get(index + 3)) {
            (Some(t), _) if t.is_type(DocTokenKind::OpenParenthesis) => Some(index + 2),
            (Some(gap), Some(t))
                if gap.is_type(DocTokenKind::None)
                    && t.is_type(DocTokenKind::OpenParenthesis)
                    && continuation.is_match(gap.content()) =>
            {
                Some(index + 3)
            }
            _ => None,
        };

        let Some(open) = open else {
            return Some(index + 1);
        };
        let mut level = 0usize;
        for i in open..self.items.len() {
            match self.items[i].kind() {
                DocTokenKind::OpenParenthesis => level += 1,
                DocTokenKind::CloseParenthesis => level = level.saturating_sub(1),
                _ => {}
            }
            if level == 0 {
                return Some(i);
            }
        }
        None
    }

    /// Insert before `index`; `index == len()` appends
    pub fn insert_at(&mut self, index: usize, token: AnnotationToken) -> Result<(), TokensError> {
        if index > self.items.len() {
            return Err(TokensError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        self.items.insert(index, token);
        Ok(())
    }

    pub fn remove_at(&mut self, index: usize) -> Result<AnnotationToken, TokensError> {
        if index >= self.items.len() {
            return Err(TokensError::IndexOutOfBounds {
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn generate_code(&self) -> String {
        self.items.iter().map(AnnotationToken::content).collect()
    }
}

impl Index<usize> for AnnotationTokens {
    type Output = AnnotationToken;

    fn index(&self, index: usize) -> &AnnotationToken {
        &self.items[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Token {
        Token::new(TokenKind::DocComment, content)
    }

    fn kinds(tokens: &AnnotationTokens) -> Vec<DocTokenKind> {
        tokens.iter().map(AnnotationToken::kind).collect()
    }

    #[test]
    fn test_requires_doc_comment() {
        let comment = Token::new(TokenKind::Comment, "/* @Foo */");
        assert!(AnnotationTokens::from_doc_comment(&comment, &[]).is_none());
    }

    #[test]
    fn test_plain_annotation() {
        let content = "/**\n * @Foo\n */";
        let tokens = AnnotationTokens::from_doc_comment(&doc(content), &[]).unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                DocTokenKind::None,
                DocTokenKind::At,
                DocTokenKind::Identifier,
                DocTokenKind::None,
            ]
        );
        assert_eq!(tokens[2].content(), "Foo");
        assert_eq!(tokens.generate_code(), content);
        assert_eq!(tokens.annotation_end(1), Some(2));
    }

    #[test]
    fn test_annotation_with_arguments() {
        let content = "/**\n * @Route(\"/path\", methods={\"GET\"}) trailing\n */";
        let tokens = AnnotationTokens::from_doc_comment(&doc(content), &[]).unwrap();
        assert_eq!(tokens.generate_code(), content);

        let at = tokens.iter().position(|t| t.is_type(DocTokenKind::At)).unwrap();
        let end = tokens.annotation_end(at).unwrap();
        assert!(tokens[end].is_type(DocTokenKind::CloseParenthesis));
        assert!(tokens
            .iter()
            .any(|t| t.is_type(DocTokenKind::String) && t.content() == "\"/path\""));
        assert_eq!(tokens.next_meaningful_token(at), Some(at + 1));
        assert!(tokens[end + 1].content().contains("trailing"));
    }

    #[test]
    fn test_ignored_tags_stay_text() {
        let content = "/**\n * @param int $a\n * @Foo\n */";
        let ignored = vec!["param".to_string()];
        let tokens = AnnotationTokens::from_doc_comment(&doc(content), &ignored).unwrap();
        let ats = tokens.iter().filter(|t| t.is_type(DocTokenKind::At)).count();
        assert_eq!(ats, 1);
        assert_eq!(tokens.generate_code(), content);
    }

    #[test]
    fn test_email_is_not_an_annotation() {
        let content = "/** mail me@example.com */";
        let tokens = AnnotationTokens::from_doc_comment(&doc(content), &[]).unwrap();
        assert_eq!(kinds(&tokens), vec![DocTokenKind::None]);
    }

    #[test]
    fn test_unbalanced_parenthesis_is_text() {
        let content = "/**\n * @Foo(\n */";
        let tokens = AnnotationTokens::from_doc_comment(&doc(content), &[]).unwrap();
        assert_eq!(kinds(&tokens), vec![DocTokenKind::None]);
        assert_eq!(tokens.generate_code(), content);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut tokens = AnnotationTokens::from_doc_comment(&doc("/** @Foo */"), &[]).unwrap();
        tokens
            .insert_at(3, AnnotationToken::new(DocTokenKind::OpenParenthesis, "("))
            .unwrap();
        tokens
            .insert_at(4, AnnotationToken::new(DocTokenKind::CloseParenthesis, ")"))
            .unwrap();
        assert_eq!(tokens.generate_code(), "/** @Foo() */");
        assert_eq!(tokens.annotation_end(1), Some(4));

        tokens.remove_at(4).unwrap();
        tokens.remove_at(3).unwrap();
        assert_eq!(tokens.generate_code(), "/** @Foo */");
        assert!(tokens.remove_at(10).is_err());
        assert!(tokens.insert_at(10, AnnotationToken::new(DocTokenKind::None, " ")).is_err());
    }
}

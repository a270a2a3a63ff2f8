//! Lossless PHP tokenizer
//!
//! Produces a token for every byte of input: concatenating the contents of
//! the returned tokens yields the original source. Only unterminated
//! comments, strings and heredocs are rejected; everything else (including
//! syntactically invalid PHP) tokenizes, validity being the linter's job.

use crate::error::LexError;
use crate::token::{Token, TokenKind, KEYWORDS, SOFT_KEYWORDS};

const OPERATORS_3: &[&str] = &["===", "!==", "<=>", "**=", "...", "<<=", ">>=", "??=", "?->"];
const OPERATORS_2: &[&str] = &[
    "==", "!=", "<>", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", ".=", "%=",
    "&=", "|=", "^=", "->", "=>", "::", "<<", ">>", "??", "**",
];

/// Tokenize PHP source
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).run()
}

struct Lexer<'a> {
    source: &'a str,
    bytes: &'a [u8],
    position: usize,
    tokens: Vec<Token>,
    in_php: bool,
    last_meaningful: Option<TokenKind>,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            position: 0,
            tokens: Vec::new(),
            in_php: false,
            last_meaningful: None,
        }
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        while self.position < self.bytes.len() {
            if self.in_php {
                self.lex_php()?;
            } else {
                self.lex_inline_html();
            }
        }
        Ok(self.tokens)
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.position + offset).copied()
    }

    fn starts_with(&self, needle: &str) -> bool {
        self.bytes[self.position..].starts_with(needle.as_bytes())
    }

    fn push(&mut self, kind: TokenKind, end: usize) {
        let content = &self.source[self.position..end];
        if !matches!(
            kind,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
        ) {
            self.last_meaningful = Some(kind);
        }
        self.tokens.push(Token::new(kind, content));
        self.position = end;
    }

    fn error(&self, offset: usize, message: &str) -> LexError {
        LexError::new(self.source, offset, message)
    }

    fn lex_inline_html(&mut self) {
        let source = self.source;
        let rest = &source[self.position..];
        let mut search = 0;
        let open = loop {
            match rest[search..].find("<?") {
                Some(found) => {
                    let at = search + found;
                    let tail = &rest.as_bytes()[at..];
                    if tail.starts_with(b"<?=") || is_php_open_tag(tail) {
                        break Some(at);
                    }
                    search = at + 2;
                }
                None => break None,
            }
        };

        match open {
            Some(0) => self.lex_open_tag(),
            Some(at) => self.push(TokenKind::InlineHtml, self.position + at),
            None => self.push(TokenKind::InlineHtml, self.bytes.len()),
        }
    }

    fn lex_open_tag(&mut self) {
        self.in_php = true;
        if self.starts_with("<?=") {
            self.push(TokenKind::OpenTagWithEcho, self.position + 3);
            return;
        }
        let mut end = self.position + 5;
        match self.bytes.get(end) {
            Some(b'\r') if self.bytes.get(end + 1) == Some(&b'\n') => end += 2,
            Some(b' ' | b'\t' | b'\n' | b'\r') => end += 1,
            _ => {}
        }
        self.push(TokenKind::OpenTag, end);
    }

    fn lex_php(&mut self) -> Result<(), LexError> {
        let c = self.bytes[self.position];

        if self.starts_with("?>") {
            let mut end = self.position + 2;
            if self.bytes[end..].starts_with(b"\r\n") {
                end += 2;
            } else if self.bytes.get(end) == Some(&b'\n') {
                end += 1;
            }
            self.in_php = false;
            self.push(TokenKind::CloseTag, end);
            return Ok(());
        }

        if is_whitespace(c) {
            let end = self.scan_while(self.position, is_whitespace);
            self.push(TokenKind::Whitespace, end);
            return Ok(());
        }

        if self.starts_with("#[") {
            self.push(TokenKind::AttributeOpen, self.position + 2);
            return Ok(());
        }

        if c == b'#' || self.starts_with("//") {
            let end = self.line_comment_end();
            self.push(TokenKind::Comment, end);
            return Ok(());
        }

        if self.starts_with("/*") {
            return self.lex_block_comment();
        }

        if c == b'$' && self.peek(1).is_some_and(is_ident_start) {
            let end = self.scan_while(self.position + 1, is_ident_char);
            self.push(TokenKind::Variable, end);
            return Ok(());
        }

        if is_ident_start(c) || (c == b'\\' && self.peek(1).is_some_and(is_ident_start)) {
            self.lex_name();
            return Ok(());
        }

        if c.is_ascii_digit() || (c == b'.' && self.peek(1).is_some_and(|d| d.is_ascii_digit())) {
            self.lex_number();
            return Ok(());
        }

        match c {
            b'\'' | b'"' => return self.lex_quoted(c, TokenKind::ConstantEncapsedString),
            b'`' => return self.lex_quoted(c, TokenKind::Backtick),
            b'<' if self.starts_with("<<<") => {
                if let Some(result) = self.lex_heredoc() {
                    return result;
                }
            }
            _ => {}
        }

        self.lex_operator();
        Ok(())
    }

    fn scan_while(&self, from: usize, predicate: impl Fn(u8) -> bool) -> usize {
        let mut end = from;
        while end < self.bytes.len() && predicate(self.bytes[end]) {
            end += 1;
        }
        end
    }

    /// Single-line comments stop before the line break or a close tag
    fn line_comment_end(&self) -> usize {
        let mut end = self.position;
        while end < self.bytes.len() {
            match self.bytes[end] {
                b'\n' | b'\r' => break,
                b'?' if self.bytes.get(end + 1) == Some(&b'>') => break,
                _ => end += 1,
            }
        }
        end
    }

    fn lex_block_comment(&mut self) -> Result<(), LexError> {
        let body_start = self.position + 2;
        let close = self.source[body_start..]
            .find("*/")
            .ok_or_else(|| self.error(self.position, "Unterminated comment"))?;
        let end = body_start + close + 2;
        let is_doc = self.starts_with("/**") && self.bytes.get(self.position + 3).is_some_and(|b| is_whitespace(*b));
        let kind = if is_doc {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        };
        self.push(kind, end);
        Ok(())
    }

    fn lex_name(&mut self) {
        let start = self.position;
        let mut end = start;
        let mut qualified = false;
        loop {
            if self.bytes.get(end) == Some(&b'\\') && self.bytes.get(end + 1).copied().is_some_and(is_ident_start) {
                qualified = true;
                end += 1;
            }
            end = self.scan_while(end, is_ident_char);
            if !(self.bytes.get(end) == Some(&b'\\')
                && self.bytes.get(end + 1).copied().is_some_and(is_ident_start))
            {
                break;
            }
        }

        if qualified {
            let kind = if self.bytes[start] == b'\\' {
                TokenKind::NameFullyQualified
            } else {
                TokenKind::NameQualified
            };
            self.push(kind, end);
            return;
        }

        let kind = self.classify_word(&self.source[start..end], end);
        self.push(kind, end);
    }

    fn classify_word(&self, word: &str, end: usize) -> TokenKind {
        if matches!(
            self.last_meaningful,
            Some(TokenKind::ObjectOperator | TokenKind::NullsafeObjectOperator | TokenKind::DoubleColon)
        ) {
            return TokenKind::String;
        }

        let lower = word.to_ascii_lowercase();
        if let Some((_, kind)) = KEYWORDS.iter().find(|(kw, _)| *kw == lower) {
            return *kind;
        }

        let next = self.bytes[self.scan_while(end, is_whitespace)..].first().copied();
        match SOFT_KEYWORDS.iter().find(|(kw, _)| *kw == lower) {
            Some((_, TokenKind::Enum)) if next.is_some_and(is_ident_start) => TokenKind::Enum,
            Some((_, TokenKind::Match)) if next == Some(b'(') => TokenKind::Match,
            Some((_, TokenKind::Readonly)) if next != Some(b'(') => TokenKind::Readonly,
            _ => TokenKind::String,
        }
    }

    fn lex_number(&mut self) {
        let start = self.position;
        let lower_prefix = self.source.get(start..start + 2).map(|p| p.to_ascii_lowercase());
        match lower_prefix.as_deref() {
            Some("0x") => {
                let end = self.scan_while(start + 2, |b| b.is_ascii_hexdigit() || b == b'_');
                self.push(TokenKind::LNumber, end);
                return;
            }
            Some("0b") => {
                let end = self.scan_while(start + 2, |b| b == b'0' || b == b'1' || b == b'_');
                self.push(TokenKind::LNumber, end);
                return;
            }
            _ => {}
        }

        let is_digit = |b: u8| b.is_ascii_digit() || b == b'_';
        let mut end = self.scan_while(start, is_digit);
        let mut is_float = false;

        if self.bytes.get(end) == Some(&b'.') && self.bytes.get(end + 1) != Some(&b'.') {
            is_float = true;
            end = self.scan_while(end + 1, is_digit);
        }

        if matches!(self.bytes.get(end), Some(b'e' | b'E')) {
            let mut exp = end + 1;
            if matches!(self.bytes.get(exp), Some(b'+' | b'-')) {
                exp += 1;
            }
            if self.bytes.get(exp).is_some_and(|b| b.is_ascii_digit()) {
                is_float = true;
                end = self.scan_while(exp, is_digit);
            }
        }

        let kind = if is_float {
            TokenKind::DNumber
        } else {
            TokenKind::LNumber
        };
        self.push(kind, end);
    }

    fn lex_quoted(&mut self, quote: u8, kind: TokenKind) -> Result<(), LexError> {
        match self.quoted_end(self.position, quote) {
            Some(end) => {
                self.push(kind, end);
                Ok(())
            }
            None => Err(self.error(self.position, "Unterminated string")),
        }
    }

    /// End (exclusive) of the quoted literal opened at `start`
    ///
    /// Double-quoted and backtick strings may embed `{$...}` and `${...}`
    /// expressions; quotes inside those belong to nested literals and do
    /// not close the string.
    fn quoted_end(&self, start: usize, quote: u8) -> Option<usize> {
        let interpolates = quote != b'\'';
        let mut depth = 0usize;
        let mut end = start + 1;
        while end < self.bytes.len() {
            let b = self.bytes[end];
            if depth == 0 {
                match b {
                    b'\\' => end += 2,
                    b if b == quote => return Some(end + 1),
                    b'{' if interpolates && self.bytes.get(end + 1) == Some(&b'$') => {
                        depth = 1;
                        end += 2;
                    }
                    b'$' if interpolates && self.bytes.get(end + 1) == Some(&b'{') => {
                        depth = 1;
                        end += 2;
                    }
                    _ => end += 1,
                }
            } else {
                match b {
                    b'{' => {
                        depth += 1;
                        end += 1;
                    }
                    b'}' => {
                        depth -= 1;
                        end += 1;
                    }
                    b'\'' | b'"' | b'`' => end = self.quoted_end(end, b)?,
                    _ => end += 1,
                }
            }
        }
        None
    }

    /// Returns `None` when `<<<` does not introduce a heredoc
    fn lex_heredoc(&mut self) -> Option<Result<(), LexError>> {
        let mut cursor = self.scan_while(self.position + 3, |b| b == b' ' || b == b'\t');
        let quote = match self.bytes.get(cursor) {
            Some(q @ (b'\'' | b'"')) => {
                cursor += 1;
                Some(*q)
            }
            _ => None,
        };
        if !self.bytes.get(cursor).copied().is_some_and(is_ident_start) {
            return None;
        }
        let label_end = self.scan_while(cursor, is_ident_char);
        let label = &self.source[cursor..label_end];
        cursor = label_end;
        if let Some(q) = quote {
            if self.bytes.get(cursor) != Some(&q) {
                return None;
            }
            cursor += 1;
        }
        match self.bytes.get(cursor) {
            Some(b'\n') => cursor += 1,
            Some(b'\r') if self.bytes.get(cursor + 1) == Some(&b'\n') => cursor += 2,
            _ => return None,
        }

        // Closing label: first line whose indentation is followed by the
        // label and a non-identifier character.
        let mut line_start = cursor;
        while line_start <= self.bytes.len() {
            let body = self.scan_while(line_start, |b| b == b' ' || b == b'\t');
            if self.bytes[body..].starts_with(label.as_bytes())
                && !self.bytes.get(body + label.len()).copied().is_some_and(is_ident_char)
            {
                self.push(TokenKind::Heredoc, body + label.len());
                return Some(Ok(()));
            }
            match self.source[line_start..].find('\n') {
                Some(nl) => line_start += nl + 1,
                None => break,
            }
        }
        Some(Err(self.error(self.position, "Unterminated heredoc")))
    }

    fn lex_operator(&mut self) {
        let source = self.source;
        let rest = &source[self.position..];
        let text = OPERATORS_3
            .iter()
            .chain(OPERATORS_2)
            .find(|op| rest.starts_with(**op))
            .copied()
            .unwrap_or_else(|| {
                let len = rest.chars().next().map_or(1, char::len_utf8);
                &rest[..len]
            });

        let kind = match text {
            "(" => TokenKind::OpenParen,
            ")" => TokenKind::CloseParen,
            "{" => TokenKind::OpenBrace,
            "}" => TokenKind::CloseBrace,
            "[" => TokenKind::OpenBracket,
            "]" => TokenKind::CloseBracket,
            ";" => TokenKind::Semicolon,
            "," => TokenKind::Comma,
            "=" => TokenKind::Equals,
            "&" => TokenKind::Ampersand,
            "..." => TokenKind::Ellipsis,
            "?" => TokenKind::Question,
            ":" => TokenKind::Colon,
            "::" => TokenKind::DoubleColon,
            "->" => TokenKind::ObjectOperator,
            "?->" => TokenKind::NullsafeObjectOperator,
            "=>" => TokenKind::DoubleArrow,
            _ => TokenKind::Operator,
        };
        self.push(kind, self.position + text.len());
    }
}

fn is_php_open_tag(tail: &[u8]) -> bool {
    tail.len() >= 5
        && tail[..5].eq_ignore_ascii_case(b"<?php")
        && tail.get(5).map_or(true, |b| is_whitespace(*b))
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

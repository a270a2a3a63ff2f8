//! Single lexical units of PHP source

use std::fmt;

/// Kind tag of a token
///
/// Keywords that analyzers or fixers look at get their own variant; the
/// remaining reserved words share [`TokenKind::Keyword`]. The variants after
/// `AttributeOpen` are never produced by the lexer directly: they are
/// assigned by the transformer passes or by [`crate::Tokens::clear_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    InlineHtml,
    OpenTag,
    OpenTagWithEcho,
    CloseTag,
    Whitespace,
    Comment,
    DocComment,
    Variable,
    /// Unqualified name (`foo`, `Bar`, `true`)
    String,
    /// `Foo\Bar`
    NameQualified,
    /// `\Foo\Bar`
    NameFullyQualified,
    LNumber,
    DNumber,
    ConstantEncapsedString,
    Heredoc,
    Backtick,

    Abstract,
    Array,
    As,
    Break,
    Case,
    Catch,
    Class,
    Clone,
    Const,
    Continue,
    Declare,
    Default,
    Do,
    Echo,
    Else,
    ElseIf,
    Enum,
    Extends,
    Final,
    Finally,
    Fn,
    For,
    Foreach,
    Function,
    Global,
    If,
    Implements,
    Include,
    IncludeOnce,
    Interface,
    List,
    Match,
    Namespace,
    New,
    Print,
    Private,
    Protected,
    Public,
    Readonly,
    Require,
    RequireOnce,
    Return,
    Static,
    Switch,
    Throw,
    Trait,
    Try,
    Use,
    Var,
    While,
    Yield,
    /// Any other reserved word (`isset`, `instanceof`, `endif`, ...)
    Keyword,

    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
    Equals,
    Ampersand,
    Ellipsis,
    Question,
    Colon,
    DoubleColon,
    ObjectOperator,
    NullsafeObjectOperator,
    DoubleArrow,
    /// Any other operator or stray character
    Operator,
    /// `#[`
    AttributeOpen,

    /// `&` in `function &foo()`
    ReturnRef,
    /// `]` closing an attribute list
    AttributeClose,
    ArraySquareBraceOpen,
    ArraySquareBraceClose,
    DestructuringSquareBraceOpen,
    DestructuringSquareBraceClose,
    /// A cleared slot awaiting compaction
    Empty,
}

impl TokenKind {
    /// Every keyword kind, for kind probes over a whole collection
    pub const KEYWORDS: &'static [TokenKind] = &[
        TokenKind::Abstract,
        TokenKind::Array,
        TokenKind::As,
        TokenKind::Break,
        TokenKind::Case,
        TokenKind::Catch,
        TokenKind::Class,
        TokenKind::Clone,
        TokenKind::Const,
        TokenKind::Continue,
        TokenKind::Declare,
        TokenKind::Default,
        TokenKind::Do,
        TokenKind::Echo,
        TokenKind::Else,
        TokenKind::ElseIf,
        TokenKind::Enum,
        TokenKind::Extends,
        TokenKind::Final,
        TokenKind::Finally,
        TokenKind::Fn,
        TokenKind::For,
        TokenKind::Foreach,
        TokenKind::Function,
        TokenKind::Global,
        TokenKind::If,
        TokenKind::Implements,
        TokenKind::Include,
        TokenKind::IncludeOnce,
        TokenKind::Interface,
        TokenKind::List,
        TokenKind::Match,
        TokenKind::Namespace,
        TokenKind::New,
        TokenKind::Print,
        TokenKind::Private,
        TokenKind::Protected,
        TokenKind::Public,
        TokenKind::Readonly,
        TokenKind::Require,
        TokenKind::RequireOnce,
        TokenKind::Return,
        TokenKind::Static,
        TokenKind::Switch,
        TokenKind::Throw,
        TokenKind::Trait,
        TokenKind::Try,
        TokenKind::Use,
        TokenKind::Var,
        TokenKind::While,
        TokenKind::Yield,
        TokenKind::Keyword,
    ];

    /// Whether this kind is a reserved word
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Abstract | Array | As | Break | Case | Catch | Class | Clone | Const | Continue
                | Declare | Default | Do | Echo | Else | ElseIf | Enum | Extends | Final
                | Finally | Fn | For | Foreach | Function | Global | If | Implements | Include
                | IncludeOnce | Interface | List | Match | Namespace | New | Print | Private
                | Protected | Public | Readonly | Require | RequireOnce | Return | Static
                | Switch | Throw | Trait | Try | Use | Var | While | Yield | Keyword
        )
    }

    /// Whether this kind is produced by a transformer rather than the lexer
    pub fn is_custom(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            ReturnRef
                | AttributeClose
                | ArraySquareBraceOpen
                | ArraySquareBraceClose
                | DestructuringSquareBraceOpen
                | DestructuringSquareBraceClose
                | Empty
        )
    }
}

/// Keyword lookup table, matched case-insensitively by the lexer
pub(crate) const KEYWORDS: &[(&str, TokenKind)] = &[
    ("abstract", TokenKind::Abstract),
    ("and", TokenKind::Keyword),
    ("array", TokenKind::Array),
    ("as", TokenKind::As),
    ("break", TokenKind::Break),
    ("callable", TokenKind::Keyword),
    ("case", TokenKind::Case),
    ("catch", TokenKind::Catch),
    ("class", TokenKind::Class),
    ("clone", TokenKind::Clone),
    ("const", TokenKind::Const),
    ("continue", TokenKind::Continue),
    ("declare", TokenKind::Declare),
    ("default", TokenKind::Default),
    ("die", TokenKind::Keyword),
    ("do", TokenKind::Do),
    ("echo", TokenKind::Echo),
    ("else", TokenKind::Else),
    ("elseif", TokenKind::ElseIf),
    ("empty", TokenKind::Keyword),
    ("enddeclare", TokenKind::Keyword),
    ("endfor", TokenKind::Keyword),
    ("endforeach", TokenKind::Keyword),
    ("endif", TokenKind::Keyword),
    ("endswitch", TokenKind::Keyword),
    ("endwhile", TokenKind::Keyword),
    ("eval", TokenKind::Keyword),
    ("exit", TokenKind::Keyword),
    ("extends", TokenKind::Extends),
    ("final", TokenKind::Final),
    ("finally", TokenKind::Finally),
    ("fn", TokenKind::Fn),
    ("for", TokenKind::For),
    ("foreach", TokenKind::Foreach),
    ("function", TokenKind::Function),
    ("global", TokenKind::Global),
    ("goto", TokenKind::Keyword),
    ("if", TokenKind::If),
    ("implements", TokenKind::Implements),
    ("include", TokenKind::Include),
    ("include_once", TokenKind::IncludeOnce),
    ("instanceof", TokenKind::Keyword),
    ("insteadof", TokenKind::Keyword),
    ("interface", TokenKind::Interface),
    ("isset", TokenKind::Keyword),
    ("list", TokenKind::List),
    ("namespace", TokenKind::Namespace),
    ("new", TokenKind::New),
    ("or", TokenKind::Keyword),
    ("print", TokenKind::Print),
    ("private", TokenKind::Private),
    ("protected", TokenKind::Protected),
    ("public", TokenKind::Public),
    ("require", TokenKind::Require),
    ("require_once", TokenKind::RequireOnce),
    ("return", TokenKind::Return),
    ("static", TokenKind::Static),
    ("switch", TokenKind::Switch),
    ("throw", TokenKind::Throw),
    ("trait", TokenKind::Trait),
    ("try", TokenKind::Try),
    ("unset", TokenKind::Keyword),
    ("use", TokenKind::Use),
    ("var", TokenKind::Var),
    ("while", TokenKind::While),
    ("xor", TokenKind::Keyword),
    ("yield", TokenKind::Yield),
];

/// Soft keywords: only reserved in a specific position
pub(crate) const SOFT_KEYWORDS: &[(&str, TokenKind)] = &[
    ("enum", TokenKind::Enum),
    ("match", TokenKind::Match),
    ("readonly", TokenKind::Readonly),
];

/// One lexical unit: a kind tag and the exact source text it covers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    content: String,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }

    pub fn whitespace(content: impl Into<String>) -> Self {
        Self::new(TokenKind::Whitespace, content)
    }

    /// The placeholder left behind by a cleared slot
    pub fn empty() -> Self {
        Self::new(TokenKind::Empty, "")
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_given_kind(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_any_kind(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.kind)
    }

    /// Compare the raw content, e.g. `token.equals("(")`
    pub fn equals(&self, content: &str) -> bool {
        self.content == content
    }

    /// Whitespace tokens and cleared slots
    pub fn is_whitespace(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Empty)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::Comment | TokenKind::DocComment)
    }

    /// Neither whitespace nor comment
    pub fn is_meaningful(&self) -> bool {
        !self.is_whitespace() && !self.is_comment()
    }

    /// Class-like declaration keyword
    pub fn is_classy(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Class | TokenKind::Interface | TokenKind::Trait | TokenKind::Enum
        )
    }

    pub fn is_keyword(&self) -> bool {
        self.kind.is_keyword()
    }

    /// Number of line breaks (`\r\n`, `\n` or lone `\r`) in the content
    pub fn line_break_count(&self) -> usize {
        count_line_breaks(&self.content)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

pub(crate) fn count_line_breaks(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                count += 1;
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
            }
            b'\n' => count += 1,
            _ => {}
        }
        i += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        let ws = Token::whitespace("\n  ");
        assert!(ws.is_whitespace());
        assert!(!ws.is_meaningful());

        let comment = Token::new(TokenKind::Comment, "// hi");
        assert!(comment.is_comment());
        assert!(!comment.is_meaningful());

        let class = Token::new(TokenKind::Class, "class");
        assert!(class.is_classy());
        assert!(class.is_keyword());
        assert!(class.is_meaningful());
        assert!(class.is_any_kind(&[TokenKind::Function, TokenKind::Class]));
    }

    #[test]
    fn test_empty_counts_as_whitespace() {
        assert!(Token::empty().is_whitespace());
        assert!(TokenKind::Empty.is_custom());
    }

    #[test]
    fn test_line_break_count() {
        assert_eq!(Token::whitespace("\n\n").line_break_count(), 2);
        assert_eq!(Token::whitespace("\r\n  \r\n").line_break_count(), 2);
        assert_eq!(Token::whitespace("\r").line_break_count(), 1);
        assert_eq!(Token::whitespace("   ").line_break_count(), 0);
    }

    #[test]
    fn test_keyword_table_kinds_are_keywords() {
        for (_, kind) in KEYWORDS.iter().chain(SOFT_KEYWORDS) {
            assert!(kind.is_keyword(), "{:?} should be a keyword kind", kind);
            assert!(TokenKind::KEYWORDS.contains(kind));
        }
        assert!(TokenKind::KEYWORDS.iter().all(|k| k.is_keyword()));
    }
}

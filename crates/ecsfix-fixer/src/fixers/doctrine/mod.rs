//! Doctrine annotation fixers
//!
//! Doctrine annotations live inside doc comments, so these fixers re-lex each
//! doc comment into [`ecsfix_core::doc::AnnotationTokens`] and write the
//! result back as a single token.

mod doctrine_annotation_braces;

pub use doctrine_annotation_braces::DoctrineAnnotationBracesFixer;

use ecsfix_core::{TokenKind, Tokens};

/// Tags that are plain PHPDoc rather than Doctrine annotations
pub(crate) const DEFAULT_IGNORED_TAGS: &[&str] = &[
    // PHPDocumentor 1
    "abstract", "access", "code", "deprec", "encode", "exception", "final", "ingroup",
    "inheritdoc", "inheritDoc", "magic", "name", "toc", "tutorial", "private", "static",
    "staticvar", "staticVar", "throw",
    // PHPDocumentor 2
    "api", "author", "category", "copyright", "deprecated", "example", "filesource",
    "global", "ignore", "internal", "license", "link", "method", "package", "param",
    "property", "property-read", "property-write", "return", "see", "since", "source",
    "subpackage", "throws", "todo", "TODO", "usedBy", "uses", "var", "version",
    // PHPUnit
    "after", "afterClass", "backupGlobals", "backupStaticAttributes", "before",
    "beforeClass", "codeCoverageIgnore", "codeCoverageIgnoreStart", "codeCoverageIgnoreEnd",
    "covers", "coversDefaultClass", "coversNothing", "dataProvider", "depends",
    "expectedException", "expectedExceptionCode", "expectedExceptionMessage",
    "expectedExceptionMessageRegExp", "group", "large", "medium", "preserveGlobalState",
    "requires", "runTestsInSeparateProcesses", "runInSeparateProcess", "small", "test",
    "testdox", "ticket",
    // PHPCheckStyle
    "SuppressWarnings",
    // PHPStorm
    "noinspection",
    // PEAR
    "package_version",
    // PlantUML
    "enduml", "startuml",
    // Psalm and PHPStan
    "psalm", "phpstan", "template",
    // other
    "fix", "FIXME", "fixme", "override",
];

const MEMBER_PREFIX_KINDS: &[TokenKind] = &[
    TokenKind::Public,
    TokenKind::Protected,
    TokenKind::Private,
    TokenKind::Final,
    TokenKind::Abstract,
    TokenKind::Static,
    TokenKind::Readonly,
    TokenKind::Var,
    TokenKind::String,
    TokenKind::NameQualified,
    TokenKind::NameFullyQualified,
    TokenKind::Array,
    TokenKind::Question,
];

/// Whether the doc comment at `index` precedes a class, property or method,
/// the only places Doctrine reads annotations from
pub(crate) fn next_element_accepts_annotations(tokens: &Tokens, index: usize) -> bool {
    let mut next = tokens.next_meaningful_token(index);
    while let Some(i) =
        next.filter(|&i| tokens[i].is_any_kind(&[TokenKind::Abstract, TokenKind::Final]))
    {
        next = tokens.next_meaningful_token(i);
    }
    let Some(mut index) = next else {
        return false;
    };
    if tokens[index].is_classy() {
        return true;
    }
    while tokens[index].is_any_kind(MEMBER_PREFIX_KINDS) {
        match tokens.next_meaningful_token(index) {
            Some(i) => index = i,
            None => return false,
        }
    }
    tokens[index].is_any_kind(&[TokenKind::Variable, TokenKind::Function])
}

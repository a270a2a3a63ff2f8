//! Remove leading whitespace before namespace declarations

use ecsfix_core::{Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{Capabilities, Fixer, FixerConfig};

/// Puts every `namespace` declaration at the start of its line
pub struct NoLeadingNamespaceWhitespaceFixer;

fn ends_with_whitespace(content: &str) -> bool {
    content.ends_with(char::is_whitespace)
}

impl Fixer for NoLeadingNamespaceWhitespaceFixer {
    fn name(&self) -> &'static str {
        "no_leading_namespace_whitespace"
    }

    fn description(&self) -> &'static str {
        "The namespace declaration line shouldn't contain leading whitespace"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            configurable: false,
            whitespace_aware: true,
        }
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::Namespace)
    }

    fn apply_fix(&self, tokens: &mut Tokens, config: &FixerConfig) -> Result<(), FixerError> {
        for index in (1..tokens.len()).rev() {
            if !tokens[index].is_given_kind(TokenKind::Namespace) {
                continue;
            }

            let before = index - 1;
            if !tokens[before].is_given_kind(TokenKind::Whitespace) {
                if !ends_with_whitespace(tokens[before].content()) {
                    tokens.insert_at(index, Token::whitespace(config.line_ending.as_str()))?;
                }
                continue;
            }

            let content = tokens[before].content().to_string();
            match content.rfind('\n') {
                Some(newline) => {
                    tokens.set(before, Token::whitespace(&content[..=newline]))?;
                }
                None => {
                    let previous_ends_with_whitespace = before
                        .checked_sub(1)
                        .and_then(|i| tokens.get(i))
                        .is_some_and(|t| ends_with_whitespace(t.content()));
                    if previous_ends_with_whitespace {
                        tokens.clear_at(before)?;
                    } else {
                        tokens.set(before, Token::whitespace(" "))?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LineEnding;
    use crate::fixers::fix_with;

    fn fix(source: &str) -> String {
        fix_with(&NoLeadingNamespaceWhitespaceFixer, source, &FixerConfig::default())
    }

    #[test]
    fn test_indented_namespace() {
        assert_eq!(fix("<?php\n    namespace App;\n"), "<?php\nnamespace App;\n");
    }

    #[test]
    fn test_multiple_namespaces() {
        assert_eq!(
            fix("<?php\n namespace Test8a;\n    namespace Test8b;\n"),
            "<?php\nnamespace Test8a;\nnamespace Test8b;\n"
        );
    }

    #[test]
    fn test_namespace_after_statement_on_same_line() {
        assert_eq!(fix("<?php\n$a = 1; namespace B;\n"), "<?php\n$a = 1; namespace B;\n");
        assert_eq!(fix("<?php\n$a = 1;   namespace B;\n"), "<?php\n$a = 1; namespace B;\n");
    }

    #[test]
    fn test_namespace_glued_to_comment() {
        let config = FixerConfig {
            line_ending: LineEnding::CrLf,
            ..FixerConfig::default()
        };
        assert_eq!(
            fix_with(&NoLeadingNamespaceWhitespaceFixer, "<?php\n/* x */namespace A;", &config),
            "<?php\n/* x */\r\nnamespace A;"
        );
    }

    #[test]
    fn test_relative_namespace_name_untouched() {
        let source = "<?php\n$a =   namespace\\foo();\n";
        assert_eq!(fix(source), source);
    }

    #[test]
    fn test_well_formed_is_unchanged() {
        let source = "<?php\n\nnamespace App\\Service;\n\nclass A {}\n";
        assert_eq!(fix(source), source);
    }
}

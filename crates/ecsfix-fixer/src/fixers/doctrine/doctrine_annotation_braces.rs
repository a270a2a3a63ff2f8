//! Add or remove the parentheses of argument-less Doctrine annotations

use ecsfix_core::doc::{AnnotationToken, AnnotationTokens, DocTokenKind};
use ecsfix_core::{Token, TokenKind, Tokens};

use super::{next_element_accepts_annotations, DEFAULT_IGNORED_TAGS};
use crate::error::FixerError;
use crate::fixers::{ConfigValue, Fixer, FixerConfig, FixerOption, OptionType};

pub struct DoctrineAnnotationBracesFixer;

/// `@Foo()` becomes `@Foo`
fn remove_braces(annotations: &mut AnnotationTokens) -> Result<(), FixerError> {
    let mut index = 0;
    while index < annotations.len() {
        if !annotations[index].is_type(DocTokenKind::At) {
            index += 1;
            continue;
        }
        let close = annotations
            .next_meaningful_token(index + 1)
            .filter(|&open| annotations[open].is_type(DocTokenKind::OpenParenthesis))
            .and_then(|open| annotations.next_meaningful_token(open))
            .filter(|&close| annotations[close].is_type(DocTokenKind::CloseParenthesis));
        if let Some(close) = close {
            for _ in index + 2..=close {
                annotations.remove_at(index + 2)?;
            }
        }
        index += 1;
    }
    Ok(())
}

/// `@Foo` becomes `@Foo()`
fn add_braces(annotations: &mut AnnotationTokens) -> Result<(), FixerError> {
    let mut index = 0;
    while index < annotations.len() {
        if !annotations[index].is_type(DocTokenKind::At) {
            index += 1;
            continue;
        }
        let has_braces = annotations
            .next_meaningful_token(index + 1)
            .is_some_and(|i| annotations[i].is_type(DocTokenKind::OpenParenthesis));
        if !has_braces {
            annotations.insert_at(index + 2, AnnotationToken::new(DocTokenKind::OpenParenthesis, "("))?;
            annotations.insert_at(index + 3, AnnotationToken::new(DocTokenKind::CloseParenthesis, ")"))?;
        }
        index += 1;
    }
    Ok(())
}

impl Fixer for DoctrineAnnotationBracesFixer {
    fn name(&self) -> &'static str { "doctrine_annotation_braces" }
    fn description(&self) -> &'static str { "Doctrine annotations without arguments must use the configured syntax" }
    fn priority(&self) -> i32 { 0 }

    fn options(&self) -> Vec<FixerOption> {
        vec![
            FixerOption {
                name: "ignored_tags",
                description: "List of tags that must not be treated as Doctrine annotations",
                option_type: OptionType::StringArray,
                default: Some(ConfigValue::Array(
                    DEFAULT_IGNORED_TAGS.iter().map(|s| s.to_string()).collect(),
                )),
            },
            FixerOption {
                name: "syntax",
                description: "Whether to add or remove braces",
                option_type: OptionType::Enum(vec!["with_braces", "without_braces"]),
                default: Some(ConfigValue::String("without_braces".to_string())),
            },
        ]
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::DocComment)
    }

    fn apply_fix(&self, tokens: &mut Tokens, config: &FixerConfig) -> Result<(), FixerError> {
        let ignored_tags = config.array_option("ignored_tags", DEFAULT_IGNORED_TAGS);
        let with_braces = match config.string_option("syntax", "without_braces") {
            "with_braces" => true,
            "without_braces" => false,
            other => {
                return Err(FixerError::InvalidOption {
                    option: "syntax".to_string(),
                    reason: format!("unknown syntax '{}'", other),
                })
            }
        };

        for index in 0..tokens.len() {
            if !tokens[index].is_given_kind(TokenKind::DocComment)
                || !next_element_accepts_annotations(tokens, index)
            {
                continue;
            }
            let Some(mut annotations) = AnnotationTokens::from_doc_comment(&tokens[index], &ignored_tags)
            else {
                continue;
            };
            if with_braces {
                add_braces(&mut annotations)?;
            } else {
                remove_braces(&mut annotations)?;
            }
            tokens.set(index, Token::new(TokenKind::DocComment, annotations.generate_code()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::{fix_with, options};

    fn fix(source: &str) -> String {
        fix_with(&DoctrineAnnotationBracesFixer, source, &FixerConfig::default())
    }

    fn fix_with_braces(source: &str) -> String {
        let config = options(&[("syntax", ConfigValue::String("with_braces".into()))]);
        fix_with(&DoctrineAnnotationBracesFixer, source, &config)
    }

    #[test]
    fn test_removes_empty_braces() {
        assert_eq!(
            fix("<?php\n/**\n * @Entity()\n * @Table ()\n */\nclass A {}\n"),
            "<?php\n/**\n * @Entity\n * @Table\n */\nclass A {}\n"
        );
    }

    #[test]
    fn test_keeps_arguments() {
        let source = "<?php\n/**\n * @Table(name=\"users\")\n */\nclass A {}\n";
        assert_eq!(fix(source), source);
    }

    #[test]
    fn test_adds_braces() {
        assert_eq!(
            fix_with_braces("<?php\nclass A {\n    /**\n     * @Id\n     * @Column\n     */\n    private $id;\n}\n"),
            "<?php\nclass A {\n    /**\n     * @Id()\n     * @Column()\n     */\n    private $id;\n}\n"
        );
    }

    #[test]
    fn test_ignored_tags_untouched() {
        let source = "<?php\n/**\n * @param int $a\n * @return void\n */\nfunction a($a) {}\n";
        assert_eq!(fix_with_braces(source), source);
    }

    #[test]
    fn test_doc_away_from_members_untouched() {
        let source = "<?php\n/** @Foo() */\n$a = 1;\n";
        assert_eq!(fix(source), source);
    }

    #[test]
    fn test_idempotent() {
        let once = fix_with_braces("<?php\n/**\n * @Foo\n */\nclass A {}\n");
        assert_eq!(fix_with_braces(&once), once);
    }
}

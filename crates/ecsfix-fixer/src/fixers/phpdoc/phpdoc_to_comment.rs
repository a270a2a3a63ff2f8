//! Convert PHPDoc that documents nothing to a regular comment

use std::sync::OnceLock;

use ecsfix_core::analyzer::CommentsAnalyzer;
use ecsfix_core::{Token, TokenKind, Tokens};
use regex::Regex;

use crate::error::FixerError;
use crate::fixers::{ConfigValue, Fixer, FixerConfig, FixerOption, OptionType};

pub struct PhpdocToCommentFixer;

fn mentions_ignored_tag(content: &str, ignored: &[String]) -> bool {
    static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = TAG_REGEX.get_or_init(|| Regex::new(r"@([a-zA-Z0-9_\\-]+)\b").unwrap());
    regex.captures_iter(content).any(|c| {
        let tag = c[1].to_lowercase();
        ignored.iter().any(|i| i.to_lowercase() == tag)
    })
}

impl Fixer for PhpdocToCommentFixer {
    fn name(&self) -> &'static str { "phpdoc_to_comment" }
    fn description(&self) -> &'static str { "Docblocks should only be used on structural elements" }
    fn priority(&self) -> i32 { 25 }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "ignored_tags",
            description: "List of tags whose docblocks are kept even away from structural elements",
            option_type: OptionType::StringArray,
            default: Some(ConfigValue::Array(vec![])),
        }]
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::DocComment)
    }

    fn apply_fix(&self, tokens: &mut Tokens, config: &FixerConfig) -> Result<(), FixerError> {
        let analyzer = CommentsAnalyzer::new();
        let ignored = config.array_option("ignored_tags", &[]);

        for index in 0..tokens.len() {
            if !tokens[index].is_given_kind(TokenKind::DocComment) {
                continue;
            }
            if analyzer.is_header_comment(tokens, index)?
                || analyzer.is_before_structural_element(tokens, index)?
            {
                continue;
            }

            let content = tokens[index].content();
            if mentions_ignored_tag(content, &ignored) {
                continue;
            }
            let comment = format!("/*{}", content.trim_start_matches(['/', '*']));
            tokens.set(index, Token::new(TokenKind::Comment, comment))?;
        }
        Ok(())
    }
}

//! Convert single-line comments to the `//` style

use std::sync::OnceLock;

use ecsfix_core::{Token, TokenKind, Tokens};
use regex::Regex;

use crate::error::FixerError;
use crate::fixers::{ConfigValue, Fixer, FixerConfig, FixerOption, OptionType};

const COMMENT_TYPES: [&str; 2] = ["asterisk", "hash"];

/// Rewrites `# text` and single-line `/* text */` comments as `// text`
pub struct SingleLineCommentStyleFixer;

/// Text on more than one line of the comment body
fn spans_lines(body: &str) -> bool {
    static MULTI_LINE: OnceLock<Regex> = OnceLock::new();
    MULTI_LINE
        .get_or_init(|| Regex::new(r"(?s)[^\s*].*(?:\r\n|\n|\r).*[^\s*]").unwrap())
        .is_match(body)
}

/// Body text without the surrounding blanks and asterisks
fn strip_decoration(body: &str) -> String {
    static DECORATION: OnceLock<Regex> = OnceLock::new();
    DECORATION
        .get_or_init(|| Regex::new(r"[\s*]*([^\s*](?:.+[^\s*])?)[\s*]*").unwrap())
        .replace_all(body, "${1}")
        .into_owned()
}

impl SingleLineCommentStyleFixer {
    fn fix_asterisk(&self, tokens: &mut Tokens, index: usize) -> Result<(), FixerError> {
        let content = tokens[index].content();
        if !content.starts_with("/*") || content.len() < 4 {
            return Ok(());
        }
        let body = &content[2..content.len() - 2];
        if body.contains("?>") || spans_lines(body) {
            return Ok(());
        }

        let replacement = if body.chars().any(|c| !c.is_whitespace() && c != '*') {
            format!("// {}", strip_decoration(body))
        } else {
            "//".to_string()
        };

        if let Some(next) = tokens.get(index + 1) {
            // `//` runs to the end of the line, so only a comment that ends
            // its line can be converted
            if !next.is_given_kind(TokenKind::Whitespace) || !next.content().contains(['\n', '\r']) {
                return Ok(());
            }
            let rest = next.content().trim_start_matches([' ', '\t']).to_string();
            tokens.set(index + 1, Token::whitespace(rest))?;
        }
        tokens.set(index, Token::new(TokenKind::Comment, replacement))?;
        Ok(())
    }
}

impl Fixer for SingleLineCommentStyleFixer {
    fn name(&self) -> &'static str {
        "single_line_comment_style"
    }

    fn description(&self) -> &'static str {
        "Single-line comments and multi-line comments with only one line of actual content should use the `//` syntax"
    }

    fn priority(&self) -> i32 {
        -31
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "comment_types",
            description: "List of comment types to fix",
            option_type: OptionType::EnumArray(COMMENT_TYPES.to_vec()),
            default: Some(ConfigValue::Array(
                COMMENT_TYPES.iter().map(|s| s.to_string()).collect(),
            )),
        }]
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::Comment)
    }

    fn apply_fix(&self, tokens: &mut Tokens, config: &FixerConfig) -> Result<(), FixerError> {
        let types = config.array_option("comment_types", &COMMENT_TYPES);
        let hash = types.iter().any(|t| t == "hash");
        let asterisk = types.iter().any(|t| t == "asterisk");

        for index in 0..tokens.len() {
            let token = &tokens[index];
            if !token.is_given_kind(TokenKind::Comment) {
                continue;
            }
            let content = token.content();
            if content.starts_with('#') {
                if hash && !content.starts_with("#[") {
                    let converted = format!("//{}", &content[1..]);
                    tokens.set(index, Token::new(TokenKind::Comment, converted))?;
                }
                continue;
            }
            if asterisk {
                self.fix_asterisk(tokens, index)?;
            }
        }
        Ok(())
    }
}

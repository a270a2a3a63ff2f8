//! Add `@param` annotations for undocumented function parameters

use std::sync::OnceLock;

use ecsfix_core::analyzer::{ArgumentInfo, ArgumentsAnalyzer};
use ecsfix_core::doc::{DocBlock, Line};
use ecsfix_core::{BlockType, Token, TokenKind, Tokens};
use regex::Regex;

use crate::error::FixerError;
use crate::fixers::{Capabilities, ConfigValue, Fixer, FixerConfig, FixerOption, OptionType};

const MODIFIERS: &[TokenKind] = &[
    TokenKind::Abstract,
    TokenKind::Final,
    TokenKind::Private,
    TokenKind::Protected,
    TokenKind::Public,
    TokenKind::Static,
    TokenKind::Var,
];

/// Completes the `@param` list of multi-line function docblocks
pub struct PhpdocAddMissingParamAnnotationFixer;

/// Variable named by a `@param` annotation
fn documented_name(annotation: &str) -> Option<String> {
    static PARAM_NAME: OnceLock<Regex> = OnceLock::new();
    let regex = PARAM_NAME.get_or_init(|| Regex::new(r"(?s)^[^$]+(\$\w+).*$").unwrap());
    regex.captures(annotation).map(|c| c[1].to_string())
}

fn annotated_type(argument: &ArgumentInfo) -> String {
    let type_name = if argument.type_name.is_empty() {
        "mixed"
    } else {
        argument.type_name.as_str()
    };
    if !type_name.starts_with('?') && argument.default.eq_ignore_ascii_case("null") {
        format!("null|{}", type_name)
    } else {
        type_name.to_string()
    }
}

impl PhpdocAddMissingParamAnnotationFixer {
    /// Parameters of the function documented by the docblock at `index`
    fn documented_function_arguments(
        &self,
        tokens: &Tokens,
        index: usize,
    ) -> Result<Option<Vec<ArgumentInfo>>, FixerError> {
        let mut next = tokens.next_meaningful_token(index);
        while let Some(i) = next.filter(|&i| tokens[i].is_any_kind(MODIFIERS)) {
            next = tokens.next_meaningful_token(i);
        }
        let Some(function) = next.filter(|&i| tokens[i].is_given_kind(TokenKind::Function)) else {
            return Ok(None);
        };
        let Some(open) = tokens.next_token_of_kind(function, &[TokenKind::OpenParen]) else {
            return Ok(None);
        };
        let close = tokens.find_block_end(BlockType::Parenthesis, open)?;

        let analyzer = ArgumentsAnalyzer::new();
        let mut arguments: Vec<ArgumentInfo> = Vec::new();
        for (start, end) in analyzer.arguments(tokens, open, close)? {
            let info = analyzer.argument_info(tokens, start, end);
            if !info.name.is_empty() && !arguments.iter().any(|a| a.name == info.name) {
                arguments.push(info);
            }
        }
        Ok(Some(arguments))
    }
}

impl Fixer for PhpdocAddMissingParamAnnotationFixer {
    fn name(&self) -> &'static str { "phpdoc_add_missing_param_annotation" }
    fn description(&self) -> &'static str { "PHPDoc should contain `@param` for all params" }
    fn priority(&self) -> i32 { 10 }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            configurable: true,
            whitespace_aware: true,
        }
    }

    fn options(&self) -> Vec<FixerOption> {
        vec![FixerOption {
            name: "only_untyped",
            description: "Whether to add missing `@param` annotations for untyped parameters only",
            option_type: OptionType::Bool,
            default: Some(ConfigValue::Bool(true)),
        }]
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_token_kind_found(TokenKind::DocComment)
    }

    fn apply_fix(&self, tokens: &mut Tokens, config: &FixerConfig) -> Result<(), FixerError> {
        let only_untyped = config.bool_option("only_untyped", true);

        for index in 0..tokens.len() {
            let token = &tokens[index];
            if !token.is_given_kind(TokenKind::DocComment) {
                continue;
            }
            let content = token.content();
            if content.to_lowercase().contains("inheritdoc") || !content.contains('\n') {
                continue;
            }

            let Some(arguments) = self.documented_function_arguments(tokens, index)? else {
                continue;
            };
            let mut missing: Vec<ArgumentInfo> = arguments
                .into_iter()
                .filter(|a| !only_untyped || a.type_name.is_empty())
                .collect();
            if missing.is_empty() {
                continue;
            }

            let mut doc = DocBlock::new(tokens[index].content());
            let mut last_param_line: Option<usize> = None;
            for annotation in doc.annotations_of_type(&["param"]) {
                if let Some(name) = documented_name(&doc.annotation_content(&annotation)) {
                    missing.retain(|a| a.name != name);
                }
                last_param_line = Some(last_param_line.map_or(annotation.end, |l| l.max(annotation.end)));
            }
            if missing.is_empty() {
                continue;
            }

            let last_line = doc.lines().len().saturating_sub(1);
            let indent = doc
                .line(last_line)
                .map(|l| l.indent().to_string())
                .unwrap_or_default();
            let lines = missing
                .iter()
                .map(|a| {
                    Line::new(format!(
                        "{}* @param {} {}{}",
                        indent,
                        annotated_type(a),
                        a.name,
                        config.line_ending.as_str()
                    ))
                })
                .collect();
            doc.insert_lines(last_param_line.map_or(last_line, |l| l + 1), lines);
            tokens.set(index, Token::new(TokenKind::DocComment, doc.content()))?;
        }
        Ok(())
    }
}

//! Convert PHP keywords to lowercase

use ecsfix_core::{Token, TokenKind, Tokens};

use crate::error::FixerError;
use crate::fixers::{Fixer, FixerConfig};

/// Lowercases every keyword token
pub struct LowercaseKeywordsFixer;

impl Fixer for LowercaseKeywordsFixer {
    fn name(&self) -> &'static str {
        "lowercase_keywords"
    }

    fn description(&self) -> &'static str {
        "PHP keywords must be in lower case"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, tokens: &Tokens) -> bool {
        tokens.is_any_token_kind_found(TokenKind::KEYWORDS)
    }

    fn apply_fix(&self, tokens: &mut Tokens, _config: &FixerConfig) -> Result<(), FixerError> {
        for index in 0..tokens.len() {
            let token = &tokens[index];
            if !token.is_keyword() || !token.content().bytes().any(|b| b.is_ascii_uppercase()) {
                continue;
            }
            let lowered = Token::new(token.kind(), token.content().to_ascii_lowercase());
            tokens.set(index, lowered)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::fix_with;

    fn fix(source: &str) -> String {
        fix_with(&LowercaseKeywordsFixer, source, &FixerConfig::default())
    }

    #[test]
    fn test_uppercase_keywords() {
        assert_eq!(
            fix("<?php\nFINAL CLASS Foo EXTENDS Bar {\n    PUBLIC Function run() { RETURN NEW Baz(); }\n}\n"),
            "<?php\nfinal class Foo extends Bar {\n    public function run() { return new Baz(); }\n}\n"
        );
    }

    #[test]
    fn test_names_and_constants_untouched() {
        let source = "<?php\n$a = Foo::CLASS;\n$b = TRUE;\necho \"IF\";\n";
        assert_eq!(fix(source), source);
    }

    #[test]
    fn test_lowercase_is_unchanged() {
        let mut tokens = Tokens::from_code("<?php\nif ($a) { echo 1; }\n").unwrap();
        LowercaseKeywordsFixer
            .apply_fix(&mut tokens, &FixerConfig::default())
            .unwrap();
        assert!(!tokens.is_changed());
    }
}

//! Syntax checks before and after fixing

use bumpalo::Bump;
use mago_database::file::FileId;
use mago_span::HasSpan;

use crate::error::LintError;

/// Accepts or rejects PHP source
pub trait Linter: Send + Sync {
    fn lint(&self, source: &str) -> Result<(), LintError>;
}

/// Lints by parsing with mago
#[derive(Debug, Default, Clone, Copy)]
pub struct MagoLinter;

impl MagoLinter {
    pub fn new() -> Self {
        Self
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    let offset = offset.min(source.len());
    source.as_bytes()[..offset].iter().filter(|&&b| b == b'\n').count() + 1
}

impl Linter for MagoLinter {
    fn lint(&self, source: &str) -> Result<(), LintError> {
        let arena = Bump::new();
        let file_id = FileId::new("lint");
        let (_, parse_error) = mago_syntax::parser::parse_file_content(&arena, file_id, source);

        match parse_error {
            Some(error) => {
                let offset = error.span().start.offset as usize;
                Err(LintError::new(line_of(source, offset), error.to_string()))
            }
            None => Ok(()),
        }
    }
}

/// Accepts everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLinter;

impl Linter for NullLinter {
    fn lint(&self, _source: &str) -> Result<(), LintError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_source() {
        let linter = MagoLinter::new();
        assert!(linter.lint("<?php\n\nfunction a(int $b): int\n{\n    return $b + 1;\n}\n").is_ok());
    }

    #[test]
    fn test_invalid_source_reports_line() {
        let err = MagoLinter::new()
            .lint("<?php\n$a = 1;\n$b = ;\n")
            .unwrap_err();
        assert_eq!(err.line, 3);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_null_linter() {
        assert!(NullLinter.lint("<?php $a = ;").is_ok());
    }

    #[test]
    fn test_line_of() {
        assert_eq!(line_of("a\nb\nc", 0), 1);
        assert_eq!(line_of("a\nb\nc", 2), 2);
        assert_eq!(line_of("a\nb\nc", 100), 3);
    }
}

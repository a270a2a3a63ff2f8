//! Fixer presets
//!
//! Maps preset names to their constituent rules.

/// Available presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Every built-in rule
    Ecs,
    /// The PSR-12 rules among the built-ins
    Psr12,
    /// Docblock and comment hygiene
    Phpdoc,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Ecs, Preset::Psr12, Preset::Phpdoc];

    pub fn from_name(s: &str) -> Option<Self> {
        match s.trim_start_matches('@').to_lowercase().replace('-', "").as_str() {
            "ecs" => Some(Preset::Ecs),
            "psr12" => Some(Preset::Psr12),
            "phpdoc" => Some(Preset::Phpdoc),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Ecs => "@ecs",
            Preset::Psr12 => "@psr12",
            Preset::Phpdoc => "@phpdoc",
        }
    }

    pub fn rules(&self) -> &'static [&'static str] {
        match self {
            Preset::Ecs => ECS_RULES,
            Preset::Psr12 => PSR12_RULES,
            Preset::Phpdoc => PHPDOC_RULES,
        }
    }
}

/// PSR-12 preset rules
pub const PSR12_RULES: &[&str] = &[
    "lowercase_keywords",
    "no_trailing_whitespace",
];

/// Docblock preset rules
pub const PHPDOC_RULES: &[&str] = &[
    "no_empty_comment",
    "phpdoc_add_missing_param_annotation",
    "phpdoc_to_comment",
];

/// Full preset rules
pub const ECS_RULES: &[&str] = &[
    // Whitespace
    "no_leading_namespace_whitespace",
    "no_trailing_whitespace",

    // Casing
    "lowercase_keywords",

    // Comments
    "no_empty_comment",
    "single_line_comment_style",

    // PHPDoc
    "phpdoc_add_missing_param_annotation",
    "phpdoc_to_comment",

    // Doctrine
    "doctrine_annotation_braces",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixers::FixerRegistry;

    #[test]
    fn test_from_name() {
        assert_eq!(Preset::from_name("@ecs"), Some(Preset::Ecs));
        assert_eq!(Preset::from_name("PSR-12"), Some(Preset::Psr12));
        assert_eq!(Preset::from_name("@PHPDoc"), Some(Preset::Phpdoc));
        assert_eq!(Preset::from_name("@symfony"), None);
    }

    #[test]
    fn test_preset_rules_are_registered() {
        let registry = FixerRegistry::new();
        for preset in Preset::ALL {
            for rule in preset.rules() {
                assert!(registry.get(rule).is_some(), "{} in {}", rule, preset.name());
            }
        }
        assert_eq!(ECS_RULES.len(), registry.len());
    }
}

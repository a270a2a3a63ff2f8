//! Fixer registry for managing available fixers
//!
//! The registry collects all available fixers and looks them up by name.
//! Fixers are kept in priority order (highest first, then by name).

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use super::casing::LowercaseKeywordsFixer;
use super::comments::{NoEmptyCommentFixer, SingleLineCommentStyleFixer};
use super::doctrine::DoctrineAnnotationBracesFixer;
use super::phpdoc::{PhpdocAddMissingParamAnnotationFixer, PhpdocToCommentFixer};
use super::whitespace::{NoLeadingNamespaceWhitespaceFixer, NoTrailingWhitespaceFixer};
use super::{Capabilities, Fixer};

/// Information about a registered fixer
#[derive(Debug, Clone, Serialize)]
pub struct FixerInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub priority: i32,
    pub is_risky: bool,
    #[serde(flatten)]
    pub capabilities: Capabilities,
}

/// Registry of all available fixers
pub struct FixerRegistry {
    fixers: Vec<Arc<dyn Fixer>>,
    by_name: HashMap<&'static str, usize>,
}

impl FixerRegistry {
    /// Create a registry with all built-in fixers
    pub fn new() -> Self {
        let mut registry = Self::empty();

        // Whitespace
        registry.register(Arc::new(NoLeadingNamespaceWhitespaceFixer));
        registry.register(Arc::new(NoTrailingWhitespaceFixer));

        // Casing
        registry.register(Arc::new(LowercaseKeywordsFixer));

        // Comments
        registry.register(Arc::new(NoEmptyCommentFixer));
        registry.register(Arc::new(SingleLineCommentStyleFixer));

        // PHPDoc
        registry.register(Arc::new(PhpdocAddMissingParamAnnotationFixer));
        registry.register(Arc::new(PhpdocToCommentFixer));

        // Doctrine
        registry.register(Arc::new(DoctrineAnnotationBracesFixer));

        registry
    }

    /// A registry without any fixer
    pub fn empty() -> Self {
        Self {
            fixers: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a fixer, replacing any fixer with the same name
    pub fn register(&mut self, fixer: Arc<dyn Fixer>) {
        self.fixers.retain(|f| f.name() != fixer.name());
        self.fixers.push(fixer);

        // Sort by priority (descending - higher priority runs first)
        self.fixers.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then_with(|| a.name().cmp(b.name()))
        });

        // Rebuild indices after sorting
        self.by_name.clear();
        for (idx, fixer) in self.fixers.iter().enumerate() {
            self.by_name.insert(fixer.name(), idx);
        }
    }

    /// Get a fixer by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Fixer>> {
        self.by_name.get(name).map(|&idx| &self.fixers[idx])
    }

    /// Get all fixers in priority order
    pub fn all(&self) -> &[Arc<dyn Fixer>] {
        &self.fixers
    }

    /// Get information about all fixers
    pub fn list(&self) -> Vec<FixerInfo> {
        self.fixers
            .iter()
            .map(|f| FixerInfo {
                name: f.name(),
                description: f.description(),
                priority: f.priority(),
                is_risky: f.is_risky(),
                capabilities: f.capabilities(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fixers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fixers.is_empty()
    }
}

impl Default for FixerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = FixerRegistry::new();
        assert_eq!(registry.len(), 8);
        for name in [
            "phpdoc_add_missing_param_annotation",
            "phpdoc_to_comment",
            "no_empty_comment",
            "single_line_comment_style",
            "no_leading_namespace_whitespace",
            "no_trailing_whitespace",
            "lowercase_keywords",
            "doctrine_annotation_braces",
        ] {
            assert!(registry.get(name).is_some(), "{} not registered", name);
        }
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn test_priority_then_name_order() {
        let registry = FixerRegistry::new();
        let names: Vec<_> = registry.all().iter().map(|f| f.name()).collect();
        assert_eq!(names.first(), Some(&"phpdoc_to_comment"));
        assert_eq!(names.last(), Some(&"single_line_comment_style"));

        let ordered = registry.all().windows(2).all(|w| {
            w[0].priority() > w[1].priority()
                || (w[0].priority() == w[1].priority() && w[0].name() < w[1].name())
        });
        assert!(ordered);
    }

    #[test]
    fn test_list_reports_capabilities() {
        let registry = FixerRegistry::new();
        let list = registry.list();
        let namespace = list
            .iter()
            .find(|i| i.name == "no_leading_namespace_whitespace")
            .unwrap();
        assert!(namespace.capabilities.whitespace_aware);
        assert!(!namespace.capabilities.configurable);

        let braces = list
            .iter()
            .find(|i| i.name == "doctrine_annotation_braces")
            .unwrap();
        assert!(braces.capabilities.configurable);
    }
}

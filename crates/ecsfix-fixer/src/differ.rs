//! Diffs between original and fixed source

use similar::TextDiff;

/// Renders the difference between two versions of a file
pub trait Differ: Send + Sync {
    fn diff(&self, old: &str, new: &str, path: &str) -> String;
}

/// Unified diff with three lines of context
#[derive(Debug, Default, Clone, Copy)]
pub struct UnifiedDiffer;

impl Differ for UnifiedDiffer {
    fn diff(&self, old: &str, new: &str, path: &str) -> String {
        if old == new {
            return String::new();
        }
        TextDiff::from_lines(old, new)
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{}", path), &format!("b/{}", path))
            .to_string()
    }
}

/// Always empty
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDiffer;

impl Differ for NullDiffer {
    fn diff(&self, _old: &str, _new: &str, _path: &str) -> String {
        String::new()
    }
}

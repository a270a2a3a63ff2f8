//! Line-oriented view of a doc comment

use std::sync::OnceLock;

use regex::Regex;

/// One line of a doc comment, line ending included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    content: String,
}

impl Line {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_the_start(&self) -> bool {
        self.content.contains("/**")
    }

    pub fn is_the_end(&self) -> bool {
        self.content.contains("*/")
    }

    /// Tag name if the line starts an annotation (`* @param ...`)
    pub fn tag(&self) -> Option<&str> {
        static TAG_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = TAG_REGEX
            .get_or_init(|| Regex::new(r"^\s*(?:/\*\*)?\s*\*?\s*@([A-Za-z0-9_\\-]+)").unwrap());
        regex
            .captures(&self.content)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    /// Whether anything besides the comment decoration is on the line
    pub fn contains_useful_content(&self) -> bool {
        let text = self.content.trim();
        let text = text.strip_prefix("/**").unwrap_or(text);
        let text = text.strip_suffix("*/").unwrap_or(text);
        let text = text.trim_start().trim_start_matches('*');
        !text.trim().is_empty()
    }

    /// Leading whitespace of the line
    pub fn indent(&self) -> &str {
        let trimmed = self.content.trim_start_matches([' ', '\t']);
        &self.content[..self.content.len() - trimmed.len()]
    }
}

/// An annotation spanning lines `start..=end` of its docblock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub start: usize,
    pub end: usize,
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocBlock {
    lines: Vec<Line>,
}

impl DocBlock {
    pub fn new(content: &str) -> Self {
        let lines = content.split_inclusive('\n').map(Line::new).collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Annotations in line order. An annotation continues over the following
    /// lines until the next tag, a blank line or the closing line.
    pub fn annotations(&self) -> Vec<Annotation> {
        let mut annotations = Vec::new();
        for (start, line) in self.lines.iter().enumerate() {
            let Some(tag) = line.tag() else {
                continue;
            };
            let mut end = start;
            if !line.is_the_end() {
                for (index, next) in self.lines.iter().enumerate().skip(start + 1) {
                    if next.tag().is_some() || next.is_the_end() || !next.contains_useful_content() {
                        break;
                    }
                    end = index;
                }
            }
            annotations.push(Annotation {
                start,
                end,
                tag: tag.to_string(),
            });
        }
        annotations
    }

    /// Annotations whose tag is one of `types`, compared case-insensitively
    pub fn annotations_of_type(&self, types: &[&str]) -> Vec<Annotation> {
        self.annotations()
            .into_iter()
            .filter(|a| types.iter().any(|t| t.eq_ignore_ascii_case(&a.tag)))
            .collect()
    }

    /// Source text of `annotation`
    pub fn annotation_content(&self, annotation: &Annotation) -> String {
        self.lines[annotation.start..=annotation.end.min(self.lines.len() - 1)]
            .iter()
            .map(Line::content)
            .collect()
    }

    /// Insert `lines` before line `at` (clamped to the line count)
    pub fn insert_lines(&mut self, at: usize, lines: Vec<Line>) {
        let at = at.min(self.lines.len());
        self.lines.splice(at..at, lines);
    }

    pub fn content(&self) -> String {
        self.lines.iter().map(Line::content).collect()
    }
}

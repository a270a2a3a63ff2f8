//! Whitespace configuration shared by whitespace-aware fixers

use serde::{Deserialize, Serialize};

/// Indentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IndentStyle {
    /// Use spaces for indentation
    Spaces(usize),
    /// Use tabs for indentation
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

impl IndentStyle {
    /// The indentation string for one level
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }

    /// Parse a configured indent: the literal unit (`"    "`, `"\t"`), the
    /// word `tab`, or a number of spaces
    pub fn parse(s: &str) -> Option<Self> {
        if s == "\t" || s == "\\t" || s.eq_ignore_ascii_case("tab") || s.eq_ignore_ascii_case("tabs") {
            return Some(IndentStyle::Tabs);
        }
        if !s.is_empty() && s.chars().all(|c| c == ' ') {
            return Some(IndentStyle::Spaces(s.len()));
        }
        s.trim().parse::<usize>().ok().filter(|n| *n > 0).map(IndentStyle::Spaces)
    }
}

impl TryFrom<String> for IndentStyle {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        IndentStyle::parse(&value).ok_or_else(|| format!("invalid indent '{}'", value))
    }
}

impl From<IndentStyle> for String {
    fn from(style: IndentStyle) -> Self {
        style.unit()
    }
}

/// Line ending style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Unix-style line endings (LF)
    #[default]
    Lf,
    /// Windows-style line endings (CRLF)
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Line ending of the first line break in `source`
    pub fn detect(source: &str) -> Option<Self> {
        let at = source.find('\n')?;
        if at > 0 && source.as_bytes()[at - 1] == b'\r' {
            Some(LineEnding::CrLf)
        } else {
            Some(LineEnding::Lf)
        }
    }
}

/// Combined whitespace configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhitespaceConfig {
    pub indent: IndentStyle,
    pub line_ending: LineEnding,
    /// Use the line ending found in each file instead of `line_ending`
    pub detect_line_ending: bool,
}

impl WhitespaceConfig {
    pub fn new(indent: IndentStyle, line_ending: LineEnding) -> Self {
        Self {
            indent,
            line_ending,
            detect_line_ending: false,
        }
    }

    /// Configured line ending, or the one used by `source` when detection
    /// is enabled and the source has any line break
    pub fn line_ending_for(&self, source: &str) -> LineEnding {
        if self.detect_line_ending {
            LineEnding::detect(source).unwrap_or(self.line_ending)
        } else {
            self.line_ending
        }
    }
}

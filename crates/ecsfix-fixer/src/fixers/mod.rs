//! Fixer contract and built-in fixers
//!
//! A fixer inspects a [`Tokens`] collection, says whether it could apply at
//! all (`is_candidate`), and rewrites the tokens in place (`apply_fix`).
//! Fixers must keep block delimiters balanced and be idempotent.

mod registry;
pub mod casing;
pub mod comments;
pub mod doctrine;
pub mod phpdoc;
pub mod whitespace;

pub use registry::{FixerInfo, FixerRegistry};

use std::collections::HashMap;

use ecsfix_core::Tokens;
use serde::{Deserialize, Serialize};

use crate::config::{IndentStyle, LineEnding, WhitespaceConfig};
use crate::error::FixerError;

/// Configuration passed to fixers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixerConfig {
    /// Indentation style
    pub indent: IndentStyle,
    /// Line ending style
    pub line_ending: LineEnding,
    /// Rule-specific options, defaults filled in
    pub options: HashMap<String, ConfigValue>,
}

impl From<&WhitespaceConfig> for FixerConfig {
    fn from(ws: &WhitespaceConfig) -> Self {
        Self {
            indent: ws.indent,
            line_ending: ws.line_ending,
            options: HashMap::new(),
        }
    }
}

impl FixerConfig {
    pub fn with_options(mut self, options: HashMap<String, ConfigValue>) -> Self {
        self.options = options;
        self
    }

    pub fn bool_option(&self, name: &str, default: bool) -> bool {
        match self.options.get(name) {
            Some(ConfigValue::Bool(b)) => *b,
            _ => default,
        }
    }

    pub fn string_option<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.options.get(name) {
            Some(ConfigValue::String(s)) => s,
            _ => default,
        }
    }

    pub fn array_option(&self, name: &str, default: &[&str]) -> Vec<String> {
        match self.options.get(name) {
            Some(ConfigValue::Array(values)) => values.clone(),
            _ => default.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Configuration value types for fixer options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(i64),
    String(String),
    Array(Vec<String>),
    StringMap(HashMap<String, String>),
}

/// What the runner and rule-set resolution need to know about a fixer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Accepts options
    pub configurable: bool,
    /// Reads the indent or line ending from [`FixerConfig`]
    pub whitespace_aware: bool,
}

/// A token-based fixer
pub trait Fixer: Send + Sync {
    /// Rule name, as used in configuration
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Execution priority (higher = runs first). Ordering only matters for
    /// efficiency; the runner repeats passes until nothing changes.
    fn priority(&self) -> i32;

    /// Whether this fixer may change behavior of the code
    fn is_risky(&self) -> bool {
        false
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            configurable: !self.options().is_empty(),
            whitespace_aware: false,
        }
    }

    /// Configurable options for this fixer
    fn options(&self) -> Vec<FixerOption> {
        vec![]
    }

    /// Cheap pre-check, usually a token kind probe
    fn is_candidate(&self, tokens: &Tokens) -> bool;

    fn apply_fix(&self, tokens: &mut Tokens, config: &FixerConfig) -> Result<(), FixerError>;
}

/// A configurable option for a fixer
#[derive(Debug, Clone)]
pub struct FixerOption {
    pub name: &'static str,
    pub description: &'static str,
    pub option_type: OptionType,
    pub default: Option<ConfigValue>,
}

/// Type of a fixer option
#[derive(Debug, Clone)]
pub enum OptionType {
    Bool,
    String,
    Number,
    StringArray,
    Enum(Vec<&'static str>),
    /// A list whose items come from a fixed set
    EnumArray(Vec<&'static str>),
}

impl OptionType {
    pub fn accepts(&self, value: &ConfigValue) -> bool {
        match (self, value) {
            (OptionType::Bool, ConfigValue::Bool(_)) => true,
            (OptionType::String, ConfigValue::String(_)) => true,
            (OptionType::Number, ConfigValue::Number(_)) => true,
            (OptionType::StringArray, ConfigValue::Array(_)) => true,
            (OptionType::Enum(allowed), ConfigValue::String(s)) => allowed.contains(&s.as_str()),
            (OptionType::EnumArray(allowed), ConfigValue::Array(items)) => {
                items.iter().all(|i| allowed.contains(&i.as_str()))
            }
            _ => false,
        }
    }

    /// Description of accepted values, for error messages
    pub fn expected(&self) -> String {
        match self {
            OptionType::Bool => "a boolean".to_string(),
            OptionType::String => "a string".to_string(),
            OptionType::Number => "an integer".to_string(),
            OptionType::StringArray => "a list of strings".to_string(),
            OptionType::Enum(allowed) => format!("one of [{}]", allowed.join(", ")),
            OptionType::EnumArray(allowed) => format!("a list of [{}]", allowed.join(", ")),
        }
    }
}

/// Run one fixer over `source` the way a single runner pass would
#[cfg(test)]
pub(crate) fn fix_with(fixer: &dyn Fixer, source: &str, config: &FixerConfig) -> String {
    let mut tokens = Tokens::from_code(source).unwrap();
    if fixer.is_candidate(&tokens) {
        fixer.apply_fix(&mut tokens, config).unwrap();
        tokens.clear_empty_tokens();
    }
    tokens.generate_code()
}

/// Options map from `(name, value)` pairs
#[cfg(test)]
pub(crate) fn options(pairs: &[(&str, ConfigValue)]) -> FixerConfig {
    FixerConfig::default().with_options(
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect(),
    )
}

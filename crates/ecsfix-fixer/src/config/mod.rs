//! Rule-set configuration
//!
//! This module turns a user's rule selection (preset, enabled and disabled
//! rules, per-rule options) into an ordered, validated [`FixerSet`].

mod presets;
mod rule_set;
mod whitespace;

pub use presets::Preset;
pub use rule_set::{FixerEntry, FixerSet, RuleSetConfig};
pub use whitespace::{IndentStyle, LineEnding, WhitespaceConfig};

//! Rule selection and its resolution into a fixer set

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::presets::Preset;
use crate::error::ConfigError;
use crate::fixers::{ConfigValue, Fixer, FixerRegistry};

/// Which rules to run and how they are configured
///
/// Without a preset and without enabled rules, the `@ecs` preset is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSetConfig {
    pub preset: Option<String>,
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
    /// Rule name → option name → value
    pub options: HashMap<String, HashMap<String, ConfigValue>>,
}

impl RuleSetConfig {
    /// Only the given rules, no preset
    pub fn with_rules<I, S>(rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            enabled: rules.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    fn selected_rules(&self) -> Result<Vec<String>, ConfigError> {
        let preset = match (&self.preset, self.enabled.is_empty()) {
            (Some(name), _) => {
                Some(Preset::from_name(name).ok_or_else(|| ConfigError::UnknownPreset(name.clone()))?)
            }
            (None, true) => Some(Preset::Ecs),
            (None, false) => None,
        };

        let mut rules: Vec<String> = Vec::new();
        let from_preset = preset.iter().flat_map(|p| p.rules().iter().map(|r| r.to_string()));
        for rule in from_preset.chain(self.enabled.iter().cloned()) {
            if !rules.contains(&rule) && !self.disabled.contains(&rule) {
                rules.push(rule);
            }
        }
        Ok(rules)
    }

    /// Validate the selection against `registry` and build the ordered set
    pub fn resolve(&self, registry: &FixerRegistry) -> Result<FixerSet, ConfigError> {
        let mentioned = self
            .enabled
            .iter()
            .chain(&self.disabled)
            .chain(self.options.keys());
        for name in mentioned {
            if registry.get(name).is_none() {
                return Err(ConfigError::UnknownRule(name.clone()));
            }
        }

        let mut entries = Vec::new();
        for name in self.selected_rules()? {
            let fixer = registry
                .get(&name)
                .ok_or_else(|| ConfigError::UnknownRule(name.clone()))?;
            let configured = self.options.get(&name).cloned().unwrap_or_default();
            entries.push(FixerEntry::configured(Arc::clone(fixer), configured)?);
        }

        let set = FixerSet::from_entries(entries);
        debug!(rules = ?set.names(), "resolved rule set");
        Ok(set)
    }
}

/// A fixer with its validated options, defaults filled in
#[derive(Clone)]
pub struct FixerEntry {
    fixer: Arc<dyn Fixer>,
    options: HashMap<String, ConfigValue>,
}

impl FixerEntry {
    /// Check `configured` against the fixer's declared options and fill in
    /// the defaults of everything not configured
    pub fn configured(
        fixer: Arc<dyn Fixer>,
        configured: HashMap<String, ConfigValue>,
    ) -> Result<Self, ConfigError> {
        let rule = fixer.name();
        if !configured.is_empty() && !fixer.capabilities().configurable {
            return Err(ConfigError::NotConfigurable(rule.to_string()));
        }

        let declared = fixer.options();
        for (option, value) in &configured {
            let spec = declared
                .iter()
                .find(|o| o.name == option.as_str())
                .ok_or_else(|| ConfigError::UnknownOption {
                    rule: rule.to_string(),
                    option: option.clone(),
                })?;
            if !spec.option_type.accepts(value) {
                return Err(ConfigError::InvalidOptionType {
                    rule: rule.to_string(),
                    option: option.clone(),
                    expected: spec.option_type.expected(),
                });
            }
        }

        let mut options = configured;
        for option in declared {
            if let Some(default) = option.default {
                options.entry(option.name.to_string()).or_insert(default);
            }
        }
        Ok(Self { fixer, options })
    }

    pub fn fixer(&self) -> &dyn Fixer {
        self.fixer.as_ref()
    }

    pub fn name(&self) -> &'static str {
        self.fixer.name()
    }

    pub fn options(&self) -> &HashMap<String, ConfigValue> {
        &self.options
    }
}

impl std::fmt::Debug for FixerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixerEntry")
            .field("name", &self.name())
            .field("options", &self.options)
            .finish()
    }
}

/// Resolved fixers ordered by priority (highest first), then name
#[derive(Debug, Clone, Default)]
pub struct FixerSet {
    entries: Vec<FixerEntry>,
}

impl FixerSet {
    pub fn from_entries(mut entries: Vec<FixerEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.fixer
                .priority()
                .cmp(&a.fixer.priority())
                .then_with(|| a.name().cmp(b.name()))
        });
        entries.dedup_by(|a, b| a.name() == b.name());
        Self { entries }
    }

    /// Fixers with their default options
    pub fn from_fixers(fixers: Vec<Arc<dyn Fixer>>) -> Result<Self, ConfigError> {
        let entries = fixers
            .into_iter()
            .map(|f| FixerEntry::configured(f, HashMap::new()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_entries(entries))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FixerEntry> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(FixerEntry::name).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any fixer reads the indent or line ending
    pub fn is_whitespace_aware(&self) -> bool {
        self.entries
            .iter()
            .any(|e| e.fixer.capabilities().whitespace_aware)
    }
}

//! Configuration file support for ecsfix
//!
//! Loads `ecsfix.toml` from the current directory or its parents.

use anyhow::{Context, Result};
use ecsfix_fixer::{RuleSetConfig, RunnerConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "ecsfix.toml";

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EcsConfig {
    pub rules: RuleSetConfig,
    pub runner: RunnerConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing
    pub exclude: Vec<String>,
}

impl EcsConfig {
    /// Load config searching from the current directory upward
    pub fn load() -> Result<Option<(EcsConfig, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(EcsConfig, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<EcsConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: EcsConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Rule selection after command line overrides
    ///
    /// Rules given on the command line replace the configured preset and
    /// rule lists; configured options still apply to them.
    pub fn effective_rules(&self, cli_rules: &[String]) -> RuleSetConfig {
        if cli_rules.is_empty() {
            return self.rules.clone();
        }
        RuleSetConfig {
            options: self.rules.options.clone(),
            ..RuleSetConfig::with_rules(cli_rules.iter().cloned())
        }
    }

    /// Check if a path should be excluded based on config patterns
    pub fn should_exclude(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();

        for pattern in &self.paths.exclude {
            if let Ok(glob_pattern) = glob::Pattern::new(pattern) {
                if glob_pattern.matches(&path_str) {
                    return true;
                }
                if let Some(file_name) = path.file_name() {
                    if glob_pattern.matches(&file_name.to_string_lossy()) {
                        return true;
                    }
                }
            }

            // `dir/` excludes everything below a directory of that name
            if pattern.ends_with('/') {
                let dir_pattern = pattern.trim_end_matches('/');
                if path_str.contains(&format!("/{}/", dir_pattern))
                    || path_str.starts_with(&format!("{}/", dir_pattern))
                {
                    return true;
                }
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsfix_fixer::fixers::ConfigValue;
    use ecsfix_fixer::LineEnding;
    use std::fs;
    use tempfile::TempDir;

    fn create_config(dir: &Path, content: &str) {
        fs::write(dir.join(CONFIG_FILE), content).unwrap();
    }

    #[test]
    fn test_load_full_config() {
        let temp = TempDir::new().unwrap();
        create_config(
            temp.path(),
            r#"
[rules]
preset = "@psr12"
enabled = ["no_empty_comment"]
disabled = ["no_trailing_whitespace"]

[rules.options.doctrine_annotation_braces]
syntax = "with_braces"

[runner]
max_passes = 10

[runner.whitespace]
indent = "\t"
line_ending = "crlf"

[paths]
exclude = ["vendor/", "*.generated.php"]
"#,
        );

        let (config, path) = EcsConfig::load_from(temp.path().to_path_buf())
            .unwrap()
            .unwrap();

        assert_eq!(path, temp.path().join(CONFIG_FILE));
        assert_eq!(config.rules.preset.as_deref(), Some("@psr12"));
        assert_eq!(config.rules.enabled, vec!["no_empty_comment".to_string()]);
        assert_eq!(config.rules.disabled, vec!["no_trailing_whitespace".to_string()]);
        assert_eq!(
            config.rules.options["doctrine_annotation_braces"]["syntax"],
            ConfigValue::String("with_braces".to_string())
        );
        assert_eq!(config.runner.max_passes, 10);
        assert_eq!(config.runner.whitespace.line_ending, LineEnding::CrLf);
        assert_eq!(config.paths.exclude.len(), 2);
    }

    #[test]
    fn test_found_in_parent_directory() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[runner]\nmax_passes = 3\n");
        let nested = temp.path().join("src").join("Domain");
        fs::create_dir_all(&nested).unwrap();

        let (config, path) = EcsConfig::load_from(nested).unwrap().unwrap();
        assert_eq!(path, temp.path().join(CONFIG_FILE));
        assert_eq!(config.runner.max_passes, 3);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "");

        let (config, _) = EcsConfig::load_from(temp.path().to_path_buf())
            .unwrap()
            .unwrap();
        assert_eq!(config.rules, RuleSetConfig::default());
        assert_eq!(config.runner, RunnerConfig::default());
        assert!(config.paths.exclude.is_empty());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        create_config(temp.path(), "[runner]\nmax_passes = \"many\"\n");
        let error = EcsConfig::load_from(temp.path().to_path_buf()).unwrap_err();
        assert!(format!("{:#}", error).contains("Failed to parse"));
    }

    #[test]
    fn test_cli_rules_keep_options() {
        let mut config = EcsConfig::default();
        config.rules.preset = Some("@phpdoc".to_string());
        config.rules.options.insert(
            "doctrine_annotation_braces".to_string(),
            [("syntax".to_string(), ConfigValue::String("with_braces".to_string()))]
                .into_iter()
                .collect(),
        );

        let rules = config.effective_rules(&["doctrine_annotation_braces".to_string()]);
        assert_eq!(rules.preset, None);
        assert_eq!(rules.enabled, vec!["doctrine_annotation_braces".to_string()]);
        assert!(rules.options.contains_key("doctrine_annotation_braces"));

        assert_eq!(config.effective_rules(&[]), config.rules);
    }

    #[test]
    fn test_should_exclude() {
        let config = EcsConfig {
            paths: PathsConfig {
                exclude: vec!["vendor/".to_string(), "*.generated.php".to_string()],
            },
            ..Default::default()
        };

        assert!(config.should_exclude(Path::new("project/vendor/autoload.php")));
        assert!(config.should_exclude(Path::new("vendor/package/file.php")));
        assert!(config.should_exclude(Path::new("src/Model.generated.php")));
        assert!(!config.should_exclude(Path::new("src/vendor.php")));
    }
}

//! ecsfix-fixer: token-based PHP fixers and the fixpoint runner
//!
//! This crate provides the fixers that rewrite an [`ecsfix_core::Tokens`]
//! stream, the rule-set configuration that selects and configures them, and
//! the [`Runner`] that applies a [`FixerSet`] to a file until nothing changes.
//!
//! # Features
//!
//! - Eight built-in fixers (whitespace, casing, comments, PHPDoc, Doctrine)
//! - Presets (`@ecs`, `@psr12`, `@phpdoc`) with per-rule options
//! - Priority-based execution order, repeated up to a fixpoint
//! - Parse check of input and output through mago
//!
//! # Example
//!
//! ```no_run
//! use ecsfix_fixer::{FixerRegistry, RuleSetConfig, Runner, RunnerConfig};
//!
//! let registry = FixerRegistry::new();
//! let fixers = RuleSetConfig::default().resolve(&registry).unwrap();
//! let runner = Runner::new(fixers, RunnerConfig::default());
//! let report = runner.fix("src/a.php", "<?php\nECHO 1;   \n");
//! assert_eq!(report.fixed_content(), Some("<?php\necho 1;\n"));
//! ```

pub mod config;
pub mod differ;
pub mod error;
pub mod fixers;
pub mod linter;
pub mod runner;

pub use config::{FixerSet, IndentStyle, LineEnding, Preset, RuleSetConfig, WhitespaceConfig};
pub use differ::{Differ, NullDiffer, UnifiedDiffer};
pub use error::{ConfigError, FileError, FixerError, LintError};
pub use fixers::{Fixer, FixerConfig, FixerRegistry};
pub use linter::{Linter, MagoLinter, NullLinter};
pub use runner::{FileReport, FileStatus, Runner, RunnerConfig};

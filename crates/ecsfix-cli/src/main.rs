//! ecsfix CLI - token-based PHP coding standard fixer
//!
//! Checks files by default and exits with 2 when any file would change;
//! `--fix` writes the fixed content back.

mod config;
mod output;
mod process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use ecsfix_fixer::{FileStatus, FixerRegistry, Runner};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use config::EcsConfig;
use output::{FileResult, OutputFormat, Reporter};
use process::{collect_files, process_file, write_file, ProcessResult};

#[derive(Parser)]
#[command(name = "ecsfix")]
#[command(version)]
#[command(about = "Token-based PHP coding standard fixer")]
struct Cli {
    /// Files or directories to process
    #[arg(required_unless_present = "list_fixers")]
    paths: Vec<PathBuf>,

    /// Apply fixes to files (default is check only)
    #[arg(long)]
    fix: bool,

    /// Path to config file (default: search ecsfix.toml upward)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// Rules to run (can be specified multiple times). Overrides config file.
    #[arg(long, short = 'r', value_name = "NAME")]
    rule: Vec<String>,

    /// Output format: text, json, diff
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    format: String,

    /// Maximum fixer passes per file
    #[arg(long, value_name = "N")]
    max_passes: Option<usize>,

    /// List available fixers and exit
    #[arg(long)]
    list_fixers: bool,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

/// `--verbose` forces debug output, otherwise `RUST_LOG` or warnings only
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(cli: &Cli, format: OutputFormat) -> Result<EcsConfig> {
    if cli.no_config {
        return Ok(EcsConfig::default());
    }
    let found = match &cli.config {
        Some(path) => Some((EcsConfig::load_path(path)?, path.clone())),
        None => EcsConfig::load()?,
    };
    Ok(match found {
        Some((config, path)) => {
            if cli.verbose && format == OutputFormat::Text {
                println!("{}: {}", "Using config".bold(), path.display());
            }
            config
        }
        None => EcsConfig::default(),
    })
}

fn list_fixers(registry: &FixerRegistry, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&registry.list())?);
        return Ok(());
    }
    println!("{}", "Available fixers:".bold());
    for info in registry.list() {
        let risky = if info.is_risky { " (risky)".red().to_string() } else { String::new() };
        println!("  {} - {}{}", info.name.green(), info.description, risky);
    }
    Ok(())
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let registry = FixerRegistry::new();

    let output_format = OutputFormat::from_str(&cli.format).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid output format '{}'. Valid options: text, json, diff",
            cli.format
        )
    })?;

    if cli.list_fixers {
        list_fixers(&registry, output_format)?;
        return Ok(ExitCode::SUCCESS);
    }

    let config = load_config(&cli, output_format)?;

    let fixers = config
        .effective_rules(&cli.rule)
        .resolve(&registry)
        .context("Invalid rule configuration")?;
    if fixers.is_empty() {
        eprintln!("{}: No rules enabled", "Error".red());
        return Ok(ExitCode::from(1));
    }

    let mut runner_config = config.runner.clone();
    if let Some(max_passes) = cli.max_passes {
        runner_config.max_passes = max_passes;
    }

    let fix_mode = cli.fix;
    let check_mode = !fix_mode;

    if cli.verbose && output_format == OutputFormat::Text {
        println!("{}: {}", "Mode".bold(), if fix_mode { "fix" } else { "check" });
        println!("{}: {}", "Rules".bold(), fixers.names().join(", "));
        println!();
    }

    let runner = Runner::new(fixers, runner_config);
    let (file_paths, missing_paths) = collect_files(&cli.paths, &config);

    // Files are independent; results keep the sorted path order
    let results: Vec<Result<ProcessResult>> = file_paths
        .par_iter()
        .map(|path| process_file(path, &runner))
        .collect();

    let mut reporter = Reporter::new(output_format, cli.verbose);

    for path in &missing_paths {
        if output_format == OutputFormat::Text {
            eprintln!("{}: Path does not exist: {}", "Warning".yellow(), path.display());
        }
    }

    for (path, result) in file_paths.iter().zip(results) {
        report_result(path, result, &runner, fix_mode, &mut reporter);
    }

    let summary = reporter.summary();
    let exit_code = if summary.errors > 0 {
        ExitCode::from(1)
    } else if check_mode && summary.files_with_changes > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish(check_mode)?;

    Ok(exit_code)
}

/// Report a file result and write it back in fix mode
///
/// Read and write failures are recorded against the file; the run goes on.
fn report_result(
    path: &Path,
    result: Result<ProcessResult>,
    runner: &Runner,
    fix_mode: bool,
    reporter: &mut Reporter,
) {
    let ProcessResult { report, old_source } = match result {
        Ok(processed) => processed,
        Err(e) => {
            reporter.report_failed(path, FileResult::error(path, format!("{:#}", e)));
            return;
        }
    };

    match &report.status {
        FileStatus::Unchanged => reporter.report_unchanged(path, &report),
        FileStatus::Fixed(new_source) => {
            if fix_mode {
                match write_file(path, new_source) {
                    Ok(()) => reporter.report_fix(path, &report),
                    Err(e) => {
                        reporter.report_failed(path, FileResult::error(path, format!("{:#}", e)))
                    }
                }
            } else {
                let diff = runner.diff(&old_source, new_source, &path.display().to_string());
                reporter.report_check(path, &report, &old_source, &diff);
            }
        }
        FileStatus::Error(_) => reporter.report_failed(path, FileResult::from_report(path, &report)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecsfix_fixer::{FixerRegistry, RuleSetConfig, RunnerConfig};
    use std::fs;
    use tempfile::TempDir;

    fn runner(rules: &[&str]) -> Runner {
        let set = RuleSetConfig::with_rules(rules.iter().copied())
            .resolve(&FixerRegistry::new())
            .unwrap();
        Runner::new(set, RunnerConfig::default())
    }

    #[test]
    fn test_write_failure_does_not_stop_the_run() {
        let temp = TempDir::new().unwrap();
        let blocked = temp.path().join("a.php");
        let writable = temp.path().join("b.php");
        fs::write(&blocked, "<?php
ECHO 1;
").unwrap();
        fs::write(&writable, "<?php
ECHO 2;
").unwrap();

        let runner = runner(&["lowercase_keywords"]);
        let results = vec![
            process_file(&blocked, &runner),
            process_file(&writable, &runner),
        ];
        // A directory in place of the file makes the write fail, even for root
        fs::remove_file(&blocked).unwrap();
        fs::create_dir(&blocked).unwrap();

        let mut reporter = Reporter::new(OutputFormat::Json, false);
        for (path, result) in [blocked.clone(), writable.clone()].iter().zip(results) {
            report_result(path, result, &runner, true, &mut reporter);
        }

        assert_eq!(fs::read_to_string(&writable).unwrap(), "<?php\necho 2;\n");
        let summary = reporter.summary();
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.files_with_changes, 1);
        assert_eq!(summary.errors, 1);
    }
}

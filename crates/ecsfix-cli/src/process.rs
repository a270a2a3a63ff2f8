//! File discovery and per-file processing

use anyhow::{Context, Result};
use ecsfix_fixer::{FileReport, Runner};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::EcsConfig;

/// Result of processing a single file
pub struct ProcessResult {
    pub report: FileReport,
    /// Source as read from disk
    pub old_source: String,
}

/// Files to process and paths that do not exist
pub fn collect_files(paths: &[PathBuf], config: &EcsConfig) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut file_paths: Vec<PathBuf> = Vec::new();
    let mut missing_paths: Vec<PathBuf> = Vec::new();

    for path in paths {
        if path.is_file() {
            file_paths.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| e.path().extension().is_some_and(|ext| ext == "php"))
            {
                let file_path = entry.path();
                if config.should_exclude(file_path) {
                    debug!(path = %file_path.display(), "excluded");
                } else {
                    file_paths.push(file_path.to_path_buf());
                }
            }
        } else {
            missing_paths.push(path.clone());
        }
    }

    file_paths.sort();
    file_paths.dedup();
    (file_paths, missing_paths)
}

/// Read and fix a single PHP file without writing anything
pub fn process_file(path: &Path, runner: &Runner) -> Result<ProcessResult> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let report = runner.fix(&path.display().to_string(), &source);
    Ok(ProcessResult {
        report,
        old_source: source,
    })
}

/// Write the processed result to the file
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathsConfig;
    use ecsfix_fixer::{FileStatus, FixerRegistry, RuleSetConfig, RunnerConfig};
    use std::fs;
    use tempfile::TempDir;

    fn runner(rules: &[&str]) -> Runner {
        let set = RuleSetConfig::with_rules(rules.iter().copied())
            .resolve(&FixerRegistry::new())
            .unwrap();
        Runner::new(set, RunnerConfig::default())
    }

    #[test]
    fn test_collect_files() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let vendor = temp.path().join("vendor");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&vendor).unwrap();
        fs::write(src.join("b.php"), "<?php\n").unwrap();
        fs::write(src.join("a.php"), "<?php\n").unwrap();
        fs::write(src.join("notes.txt"), "").unwrap();
        fs::write(vendor.join("lib.php"), "<?php\n").unwrap();

        let config = EcsConfig {
            paths: PathsConfig {
                exclude: vec!["vendor/".to_string()],
            },
            ..Default::default()
        };
        let missing = temp.path().join("missing");
        let (files, not_found) = collect_files(&[temp.path().to_path_buf(), missing.clone()], &config);

        assert_eq!(files, vec![src.join("a.php"), src.join("b.php")]);
        assert_eq!(not_found, vec![missing]);
    }

    #[test]
    fn test_process_does_not_write() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.php");
        fs::write(&path, "<?php\nECHO 1;\n").unwrap();

        let result = process_file(&path, &runner(&["lowercase_keywords"])).unwrap();
        assert_eq!(result.old_source, "<?php\nECHO 1;\n");
        assert_eq!(result.report.fixed_content(), Some("<?php\necho 1;\n"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<?php\nECHO 1;\n");

        write_file(&path, result.report.fixed_content().unwrap()).unwrap();
        let again = process_file(&path, &runner(&["lowercase_keywords"])).unwrap();
        assert_eq!(again.report.status, FileStatus::Unchanged);
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = process_file(&temp.path().join("gone.php"), &runner(&["lowercase_keywords"]));
        assert!(result.is_err());
    }
}

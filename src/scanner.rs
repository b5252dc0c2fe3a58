//! Project directory scanning.
//!
//! Walks a project tree and collects every `.rb` source file. Hidden directories and the
//! `vendor` tree (bundled gems) are not descended into. Files are returned in a stable,
//! sorted order so repeated runs register records in the same sequence.

use anyhow::Result;
use log::{debug, warn};
use std::path::PathBuf;
use walkdir::WalkDir;

/// Directory names that are never scanned.
const SKIPPED_DIRS: &[&str] = &["vendor"];

pub struct FileScanner {
    root_path: PathBuf,
}

pub struct ScanResult {
    /// Ruby source files, sorted by path
    pub ruby_files: Vec<PathBuf>,
    /// Paths that could not be read during the walk
    pub warnings: Vec<String>,
}

impl FileScanner {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    pub fn scan(&self) -> Result<ScanResult> {
        let mut ruby_files = Vec::new();
        let mut warnings = Vec::new();

        for entry in WalkDir::new(&self.root_path)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                if e.path() == self.root_path {
                    return true;
                }
                let file_name = e.file_name().to_string_lossy();
                let is_hidden = file_name.starts_with('.');
                let is_skipped = e.file_type().is_dir() && SKIPPED_DIRS.contains(&file_name.as_ref());
                !is_hidden && !is_skipped
            })
        {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("rb") {
                        ruby_files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    let warning = format!("Failed to access path: {}", e);
                    warn!("{}", warning);
                    warnings.push(warning);
                }
            }
        }

        debug!(
            "Scanned {}: {} Ruby files",
            self.root_path.display(),
            ruby_files.len()
        );

        Ok(ScanResult {
            ruby_files,
            warnings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn file_names(result: &ScanResult) -> Vec<String> {
        result
            .ruby_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect()
    }

    #[test]
    fn test_scan_normal_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("app.rb"), "class App\nend\n").unwrap();
        fs::write(root.join("boot.rb"), "require 'padrino'\n").unwrap();
        fs::write(root.join("readme.md"), "# README").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(file_names(&result), vec!["app.rb", "boot.rb"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let scanner = FileScanner::new(temp_dir.path().to_path_buf());
        let result = scanner.scan().unwrap();

        assert!(result.ruby_files.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_nested_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("app/controllers")).unwrap();
        fs::create_dir(root.join("config")).unwrap();

        fs::write(root.join("app/app.rb"), "class App\nend\n").unwrap();
        fs::write(root.join("app/controllers/users.rb"), "App.controllers :users do\nend\n").unwrap();
        fs::write(root.join("config/boot.rb"), "").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(result.ruby_files.len(), 3);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_scan_skips_vendor_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir_all(root.join("vendor/bundle")).unwrap();
        fs::write(root.join("vendor/bundle/gem.rb"), "module Gem\nend\n").unwrap();
        fs::write(root.join("app.rb"), "class App\nend\n").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(file_names(&result), vec!["app.rb"]);
    }

    #[test]
    fn test_scan_skips_hidden_directories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::create_dir(root.join(".bundle")).unwrap();
        fs::write(root.join(".bundle/config.rb"), "# config").unwrap();
        fs::write(root.join("app.rb"), "class App\nend\n").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(file_names(&result), vec!["app.rb"]);
    }

    #[test]
    fn test_scan_filters_non_ruby_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        fs::write(root.join("app.rb"), "class App\nend\n").unwrap();
        fs::write(root.join("Gemfile"), "source 'https://rubygems.org'").unwrap();
        fs::write(root.join("index.erb"), "<%= 1 %>").unwrap();
        fs::write(root.join("script.sh"), "#!/bin/bash").unwrap();

        let scanner = FileScanner::new(root.to_path_buf());
        let result = scanner.scan().unwrap();

        assert_eq!(file_names(&result), vec!["app.rb"]);
    }
}

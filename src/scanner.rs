//! JavaScript and TypeScript source scanner.
//!
//! Recursively walks a directory to collect source files, skipping
//! `node_modules` and `.git` by default. Each file's text is matched against
//! line-anchored `import` and `require` patterns to pull out the quoted module
//! references.

use anyhow::{Context, Result};
use colored::Colorize;
use glob::Pattern;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use walkdir::{DirEntry, WalkDir};

/// File extensions that are scanned for imports.
pub const SOURCE_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

/// Directory names pruned unless default excludes are disabled.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &["node_modules", ".git"];

/// `import x from "m"`, `import { a, b } from "m"` (bindings may span lines)
/// and side-effect `import "m"`.
static IMPORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(?:[^"']+?\bfrom\s*)?["']([^"'\r\n]+)["']"#).unwrap()
});

/// `require("m")` as a statement or as the initializer of `const|let|var`.
static REQUIRE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?m)^\s*(?:(?:const|let|var)\s+[^=;"']+?\s*=\s*)?require\(\s*["']([^"'\r\n]+)["']\s*\)"#,
    )
    .unwrap()
});

/// A file or directory entry that could not be read during a scan.
#[derive(Debug, Clone, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub error: String,
}

impl SkippedFile {
    /// Prints a `warn:` line for the entry and records it.
    pub fn report(path: impl Into<PathBuf>, error: impl Display) -> Self {
        let path = path.into();
        let error = error.to_string();
        eprintln!(
            "{} {} scan failed: {}",
            "warn:".yellow().bold(),
            path.display(),
            error
        );
        Self { path, error }
    }
}

/// Decides which walk entries are pruned.
#[derive(Debug, Clone)]
pub struct FileFilter {
    /// User supplied glob patterns, matched against the entry name and its
    /// path relative to the scan root.
    pub excludes: Vec<Pattern>,
    /// Skip [`DEFAULT_EXCLUDED_DIRS`]. Hidden config files are scanned.
    pub default_excludes: bool,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            excludes: Vec::new(),
            default_excludes: true,
        }
    }
}

impl FileFilter {
    fn is_excluded(&self, entry: &DirEntry, root: &Path) -> bool {
        // The root is always walked, whatever its name.
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();
        if self.default_excludes
            && entry.file_type().is_dir()
            && DEFAULT_EXCLUDED_DIRS.contains(&&*name)
        {
            return true;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        self.excludes
            .iter()
            .any(|p| p.matches(&name) || p.matches_path(relative))
    }
}

/// Result of walking a directory for source files.
#[derive(Debug, Default)]
pub struct SourceFiles {
    /// Eligible files in walk order, each real file at most once.
    pub files: Vec<PathBuf>,
    /// Entries that could not be visited.
    pub skipped: Vec<SkippedFile>,
}

/// Collects every source file under `root`.
///
/// Directory symlinks are never followed. Symlinks to files are resolved and
/// deduplicated against the files they point to; broken ones are reported as
/// skipped. Walk errors below the root are reported and skipped as well;
/// failing to read the root itself is an error.
pub fn collect_source_files(root: &Path, filter: &FileFilter) -> Result<SourceFiles> {
    let mut result = SourceFiles::default();
    let mut seen = HashSet::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !filter.is_excluded(e, root));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(e)
                    .with_context(|| format!("Failed to read scan root {}", root.display()));
            }
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                result.skipped.push(SkippedFile::report(path, e));
                continue;
            }
        };

        if entry.file_type().is_dir() || !is_source_file(entry.path()) {
            continue;
        }

        match entry.path().canonicalize() {
            Ok(real) => {
                if real.is_file() && seen.insert(real) {
                    result.files.push(entry.into_path());
                }
            }
            Err(e) => result.skipped.push(SkippedFile::report(entry.into_path(), e)),
        }
    }

    Ok(result)
}

/// Whether `path` has one of the [`SOURCE_EXTENSIONS`].
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext))
}

/// Reads `file` and extracts its raw module references.
pub fn read_references(file: &Path) -> Result<Vec<String>> {
    let source = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    Ok(extract_references(&source))
}

/// Extracts every quoted module path from `import` and `require` statements.
///
/// Only statements that begin a line (after indentation) are recognized, so
/// commented-out imports and `require` calls nested in expressions are ignored.
/// Duplicates are kept.
pub fn extract_references(source: &str) -> Vec<String> {
    IMPORT
        .captures_iter(source)
        .chain(REQUIRE.captures_iter(source))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::tempdir;

    fn sorted(mut refs: Vec<String>) -> Vec<String> {
        refs.sort();
        refs
    }

    #[test]
    fn extracts_default_and_named_imports() {
        let source = r#"
            import React from "react";
            import { useState, useEffect } from 'react';
            import * as path from "path";
            import type { Props } from "./types";
        "#;
        assert_eq!(
            sorted(extract_references(source)),
            vec!["./types", "path", "react", "react"]
        );
    }

    #[test]
    fn extracts_side_effect_imports() {
        let source = "import \"./styles.css\";\nimport 'polyfill';\n";
        assert_eq!(
            sorted(extract_references(source)),
            vec!["./styles.css", "polyfill"]
        );
    }

    #[test]
    fn extracts_imports_without_space_before_from() {
        let source = "import {a}from 'x';\nimport b from\"y\";\n";
        assert_eq!(sorted(extract_references(source)), vec!["x", "y"]);
    }

    #[test]
    fn extracts_multiline_named_imports() {
        let source = "import {\n  a,\n  b,\n} from \"@scope/pkg/deep\";\n";
        assert_eq!(extract_references(source), vec!["@scope/pkg/deep"]);
    }

    #[test]
    fn extracts_require_forms() {
        let source = r#"
const fs = require("fs");
let express = require('express');
var { join, resolve } = require("path");
require("dotenv");
        "#;
        assert_eq!(
            sorted(extract_references(source)),
            vec!["dotenv", "express", "fs", "path"]
        );
    }

    #[test]
    fn ignores_statements_not_at_line_start() {
        let source = r#"
// import hidden from "commented-out";
const s = "import x from 'in-a-string'";
foo(require("nested"));
const lazy = () => import("dynamic");
        "#;
        assert!(extract_references(source).is_empty());
    }

    #[test]
    fn ignores_identifiers_starting_with_import() {
        let source = "importer.run('x');\nrequirement('y');\n";
        assert!(extract_references(source).is_empty());
    }

    #[test]
    fn recognizes_source_extensions() {
        for name in ["a.js", "a.jsx", "a.ts", "a.tsx", "a.mjs", "a.cjs", "a.mts", "a.cts"] {
            assert!(is_source_file(Path::new(name)), "{name}");
        }
        for name in ["a.css", "a.json", "README.md", "Makefile", "a.d"] {
            assert!(!is_source_file(Path::new(name)), "{name}");
        }
    }

    #[test]
    fn collects_nested_source_files() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("src").join("components").join("deep");
        fs::create_dir_all(&nested).unwrap();
        File::create(dir.path().join("index.js")).unwrap();
        File::create(nested.join("Button.tsx")).unwrap();
        File::create(nested.join("style.css")).unwrap();

        let result = collect_source_files(dir.path(), &FileFilter::default()).unwrap();
        assert_eq!(result.files.len(), 2);
        assert!(result.files.iter().any(|f| f.ends_with("index.js")));
        assert!(result.files.iter().any(|f| f.ends_with("deep/Button.tsx")));
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn default_excludes_skip_node_modules_and_git_only() {
        let dir = tempdir().unwrap();
        let node_modules = dir.path().join("node_modules").join("left-pad");
        fs::create_dir_all(&node_modules).unwrap();
        File::create(node_modules.join("index.js")).unwrap();
        let git_hooks = dir.path().join(".git").join("hooks");
        fs::create_dir_all(&git_hooks).unwrap();
        File::create(git_hooks.join("pre-commit.js")).unwrap();
        let storybook = dir.path().join(".storybook");
        fs::create_dir_all(&storybook).unwrap();
        File::create(storybook.join("main.js")).unwrap();
        File::create(dir.path().join(".eslintrc.js")).unwrap();
        File::create(dir.path().join("app.ts")).unwrap();

        let result = collect_source_files(dir.path(), &FileFilter::default()).unwrap();
        assert_eq!(result.files.len(), 3);
        assert!(result.files.iter().any(|f| f.ends_with(".eslintrc.js")));
        assert!(result.files.iter().any(|f| f.ends_with(".storybook/main.js")));
        assert!(result.files.iter().any(|f| f.ends_with("app.ts")));

        let all = FileFilter {
            excludes: Vec::new(),
            default_excludes: false,
        };
        let result = collect_source_files(dir.path(), &all).unwrap();
        assert_eq!(result.files.len(), 5);
    }

    #[test]
    fn hidden_entries_can_be_excluded_with_a_pattern() {
        let dir = tempdir().unwrap();
        let storybook = dir.path().join(".storybook");
        fs::create_dir_all(&storybook).unwrap();
        File::create(storybook.join("main.js")).unwrap();
        File::create(dir.path().join(".eslintrc.js")).unwrap();
        File::create(dir.path().join("app.ts")).unwrap();

        let filter = FileFilter {
            excludes: vec![Pattern::new(".*").unwrap()],
            default_excludes: true,
        };
        let result = collect_source_files(dir.path(), &filter).unwrap();
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("app.ts"));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_root_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        File::create(locked.join("index.js")).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users can still list the directory.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let err = collect_source_files(&locked, &FileFilter::default()).unwrap_err();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        assert!(err.to_string().contains("Failed to read scan root"));
    }

    #[test]
    fn user_excludes_match_names_and_relative_paths() {
        let dir = tempdir().unwrap();
        let vendor = dir.path().join("vendor");
        let generated = dir.path().join("src").join("generated");
        fs::create_dir_all(&vendor).unwrap();
        fs::create_dir_all(&generated).unwrap();
        File::create(vendor.join("jquery.js")).unwrap();
        File::create(generated.join("api.ts")).unwrap();
        File::create(dir.path().join("bundle.min.js")).unwrap();
        File::create(dir.path().join("main.js")).unwrap();

        let filter = FileFilter {
            excludes: vec![
                Pattern::new("vendor").unwrap(),
                Pattern::new("src/generated").unwrap(),
                Pattern::new("*.min.js").unwrap(),
            ],
            default_excludes: true,
        };
        let result = collect_source_files(dir.path(), &filter).unwrap();
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("main.js"));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_files_are_visited_once_and_broken_links_skipped() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let real = dir.path().join("real.js");
        fs::write(&real, "import a from 'a';\n").unwrap();
        symlink(&real, dir.path().join("alias.js")).unwrap();
        symlink(dir.path().join("missing.js"), dir.path().join("broken.js")).unwrap();

        let result = collect_source_files(dir.path(), &FileFilter::default()).unwrap();
        assert_eq!(result.files.len(), 1);
        assert_eq!(result.skipped.len(), 1);
        assert!(result.skipped[0].path.ends_with("broken.js"));
    }

    #[test]
    fn read_references_fails_on_invalid_utf8() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("binary.js");
        fs::write(&file, [0xff, 0xfe, 0x00, 0x69]).unwrap();
        assert!(read_references(&file).is_err());
    }
}

//! Module collection over a source tree.
//!
//! Drives the scan: discovers source files, extracts their raw references,
//! classifies each one and accumulates the accepted package names into a
//! sorted, deduplicated set.

use crate::classifier::{self, Policy};
use crate::scanner::{self, FileFilter, SkippedFile, SourceFiles};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

/// Options for a single scan.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    pub policy: Policy,
    pub filter: FileFilter,
    /// Print an `info:` line for every scanned file.
    pub verbose: bool,
}

/// Summary statistics from a scan.
#[derive(Debug, Default, Serialize)]
pub struct Diagnostics {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub total_refs: usize,
    pub accepted_refs: usize,
    pub rejected_refs: usize,
    pub modules: usize,
}

/// Complete scan results.
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub policy: Policy,
    /// Canonical package names in lexicographic order.
    pub modules: Vec<String>,
    pub skipped: Vec<SkippedFile>,
    pub diagnostics: Diagnostics,
}

/// Fails unless `root` exists and is a directory.
pub fn ensure_root(root: &Path) -> Result<()> {
    if !root.exists() {
        anyhow::bail!("scan root {} does not exist", root.display());
    }
    if !root.is_dir() {
        anyhow::bail!("scan root {} is not a directory", root.display());
    }
    Ok(())
}

/// Scans `root` and returns every external package it imports.
///
/// Files that cannot be read are reported with a warning and skipped; only a
/// missing, non-directory or unreadable root is an error.
pub fn collect_modules(root: &Path, options: &ScanOptions) -> Result<ScanReport> {
    ensure_root(root)?;

    let SourceFiles { files, mut skipped } = scanner::collect_source_files(root, &options.filter)?;
    let mut modules = BTreeSet::new();
    let mut diagnostics = Diagnostics::default();

    for file in &files {
        let refs = match scanner::read_references(file) {
            Ok(refs) => refs,
            Err(err) => {
                skipped.push(SkippedFile::report(file, err.root_cause()));
                continue;
            }
        };

        diagnostics.files_scanned += 1;
        if options.verbose {
            eprintln!(
                "{} {} ({} references)",
                "info:".blue().bold(),
                file.display(),
                refs.len()
            );
        }

        for raw in &refs {
            diagnostics.total_refs += 1;
            match classifier::classify(raw, options.policy) {
                Some(name) => {
                    diagnostics.accepted_refs += 1;
                    modules.insert(name);
                }
                None => diagnostics.rejected_refs += 1,
            }
        }
    }

    let modules: Vec<String> = modules.into_iter().collect();
    diagnostics.files_skipped = skipped.len();
    diagnostics.modules = modules.len();

    Ok(ScanReport {
        policy: options.policy,
        modules,
        skipped,
        diagnostics,
    })
}

//! Command-line interface definitions.
//!
//! Defines the argument parser and subcommands using clap's derive API.
//! Each subcommand corresponds to a distinct operation: generating the
//! manifest, printing the detected packages, or listing scan targets.

use clap::{Parser, Subcommand};
use glob::Pattern;
use recover_json::manifest::{DEFAULT_NAME, DEFAULT_OUTPUT, DEFAULT_VERSION};
use recover_json::scanner::FileFilter;
use recover_json::{Policy, ProjectType, ScanOptions};
use std::path::PathBuf;

/// Rebuild a package.json from the imports in a JavaScript/TypeScript tree.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that walks the source tree.
#[derive(Debug, clap::Args)]
pub struct ScanArgs {
    /// Directory to scan.
    #[arg(short, long, default_value = ".")]
    pub path: PathBuf,

    /// Glob patterns for directories/files to exclude (e.g., "vendor", "*.min.js", ".*").
    /// By default, `node_modules` and `.git` are excluded.
    #[arg(short, long, value_parser = parse_pattern)]
    pub exclude: Vec<Pattern>,

    /// Disable default exclusion of `node_modules` and `.git`.
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Which references count as external packages.
    #[arg(long, value_enum, default_value_t = Policy::Strict)]
    pub policy: Policy,

    /// Print additional diagnostics to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ScanArgs {
    pub fn options(&self) -> ScanOptions {
        ScanOptions {
            policy: self.policy,
            filter: FileFilter {
                excludes: self.exclude.clone(),
                default_excludes: !self.no_default_excludes,
            },
            verbose: self.verbose,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan sources and write a package.json declaring every external package.
    Generate {
        #[command(flatten)]
        scan: ScanArgs,

        /// Manifest file to write.
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Value of the manifest's `name` field.
        #[arg(long, default_value = DEFAULT_NAME)]
        name: String,

        /// Value of the manifest's `version` field.
        #[arg(long, default_value = DEFAULT_VERSION)]
        pkg_version: String,

        /// Add `private`, `type` and a `scripts` table for this kind of project.
        #[arg(long, value_enum)]
        project_type: Option<ProjectType>,

        /// Print the manifest to stdout instead of writing it.
        #[arg(long)]
        dry_run: bool,

        /// Overwrite an existing manifest without asking.
        #[arg(short, long)]
        yes: bool,
    },

    /// Scan sources and print the external packages found.
    Detect {
        #[command(flatten)]
        scan: ScanArgs,

        /// Emit JSON instead of human-readable output.
        #[arg(long)]
        json: bool,
    },

    /// List files that would be scanned without processing them.
    Scan {
        #[command(flatten)]
        scan: ScanArgs,
    },
}

fn parse_pattern(s: &str) -> Result<Pattern, String> {
    Pattern::new(s).map_err(|e| format!("Invalid exclude pattern '{}': {}", s, e))
}

//! recover-json: rebuild a package.json from JavaScript/TypeScript imports.
//!
//! Scans a source tree for `import` and `require` statements, keeps the ones
//! that name published packages, and writes a manifest declaring them.

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Commands, ScanArgs};
use colored::Colorize;
use dialoguer::Confirm;
use recover_json::{Manifest, ProjectType, ScanReport, collector, scanner};
use std::path::Path;

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            scan,
            output,
            name,
            pkg_version,
            project_type,
            dry_run,
            yes,
        } => cmd_generate(
            &scan,
            &output,
            &name,
            &pkg_version,
            project_type,
            dry_run,
            yes,
        ),
        Commands::Detect { scan, json } => cmd_detect(&scan, json),
        Commands::Scan { scan } => cmd_scan(&scan),
    }
}

fn cmd_generate(
    scan: &ScanArgs,
    output: &Path,
    name: &str,
    version: &str,
    project_type: Option<ProjectType>,
    dry_run: bool,
    yes: bool,
) -> Result<()> {
    let report = collector::collect_modules(&scan.path, &scan.options())?;
    if scan.verbose {
        print_diagnostics(&report);
    }

    let manifest = Manifest::new(name, version, &report.modules, project_type);

    if dry_run {
        print!("{}", manifest.to_json()?);
        return Ok(());
    }

    println!("found modules: {:?}", report.modules);

    if output.exists() && !yes && !confirm_overwrite(output)? {
        println!("{} Left {} untouched", "info:".blue().bold(), output.display());
        println!("{} Use --yes to overwrite", "hint:".cyan().bold());
        return Ok(());
    }

    manifest.write(output)?;
    println!("{} {} generated", "ok:".green().bold(), output.display());

    Ok(())
}

fn cmd_detect(scan: &ScanArgs, json_output: bool) -> Result<()> {
    let report = collector::collect_modules(&scan.path, &scan.options())?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if scan.verbose {
        print_diagnostics(&report);
    }

    if report.modules.is_empty() {
        println!("{} No external packages found", "ok:".green().bold());
        return Ok(());
    }

    println!(
        "\n{} {} external package(s):\n",
        "Found".green().bold(),
        report.modules.len()
    );
    for module in &report.modules {
        println!("  {}", module);
    }

    Ok(())
}

fn cmd_scan(scan: &ScanArgs) -> Result<()> {
    collector::ensure_root(&scan.path)?;
    let options = scan.options();
    let found = scanner::collect_source_files(&scan.path, &options.filter)?;

    println!("Would scan {} files:", found.files.len());
    for file in found.files {
        println!("  {}", file.display());
    }

    Ok(())
}

fn confirm_overwrite(output: &Path) -> Result<bool> {
    let confirmed = Confirm::new()
        .with_prompt(format!("{} already exists. Overwrite?", output.display()))
        .default(false)
        .interact()?;
    Ok(confirmed)
}

fn print_diagnostics(report: &ScanReport) {
    let d = &report.diagnostics;
    eprintln!(
        "\n{} Files: {} scanned, {} skipped",
        "Diagnostics:".bold(),
        d.files_scanned,
        d.files_skipped
    );
    eprintln!(
        "             Refs: {} ({} accepted, {} rejected), Packages: {}",
        d.total_refs, d.accepted_refs, d.rejected_refs, d.modules
    );
}

//! `cqt import` command - bulk import components from CSV
//!
//! Rows are imported individually with per-row success/failure accounting;
//! a malformed row fails the import unless --skip-errors is set.

use console::style;
use csv::ReaderBuilder;
use miette::{IntoDiagnostic, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::catalog::{Component, Lifecycle};
use crate::cli::GlobalOpts;
use crate::core::config::Config;
use crate::core::loader;
use crate::core::project::Project;

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// CSV file with a header row (part_number, manufacturer, category, ...)
    pub file: PathBuf,

    /// Author recorded on imported entries (default: from config)
    #[arg(long)]
    pub author: Option<String>,

    /// Continue past malformed rows instead of aborting
    #[arg(long)]
    pub skip_errors: bool,

    /// Parse and report without writing files
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Default)]
struct ImportStats {
    rows_processed: usize,
    imported: usize,
    errors: usize,
}

pub fn run(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();
    let author = args.author.clone().unwrap_or_else(|| config.author());

    let file = File::open(&args.file).into_diagnostic()?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(BufReader::new(file));

    let headers = reader.headers().into_diagnostic()?.clone();
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_lowercase(), idx))
        .collect();

    let mut stats = ImportStats::default();

    for (row_idx, result) in reader.records().enumerate() {
        let row_num = row_idx + 2;
        stats.rows_processed += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                eprintln!(
                    "{} Row {}: CSV parse error: {}",
                    style("✗").red(),
                    row_num,
                    e
                );
                stats.errors += 1;
                if !args.skip_errors {
                    return Err(miette::miette!("CSV parse error at row {}: {}", row_num, e));
                }
                continue;
            }
        };

        let field = |name: &str| -> Option<String> {
            header_map
                .get(name)
                .and_then(|idx| record.get(*idx))
                .map(str::to_string)
                .filter(|v| !v.is_empty())
        };

        let part_number = field("part_number").unwrap_or_default();
        let manufacturer = field("manufacturer").unwrap_or_default();
        if part_number.is_empty() || manufacturer.is_empty() {
            eprintln!(
                "{} Row {}: Missing required field 'part_number' or 'manufacturer'",
                style("✗").red(),
                row_num
            );
            stats.errors += 1;
            if !args.skip_errors {
                return Err(miette::miette!("Missing required field at row {}", row_num));
            }
            continue;
        }

        let category = field("category")
            .or_else(|| field("primary_category"))
            .unwrap_or_else(|| "uncategorized".to_string());

        let mut component = Component::new(part_number, manufacturer, category, author.clone());

        if let Some(secondary) = field("secondary_category") {
            component.secondary_category = secondary;
        }
        if let Some(package) = field("package") {
            component.package = package;
        }
        if let Some(quality) = field("quality_level") {
            component.quality_level = quality;
        }
        if let Some(lifecycle) = field("lifecycle") {
            component.lifecycle = lifecycle.parse::<Lifecycle>().unwrap_or_default();
        }
        if let Some(description) = field("description") {
            component.description = description;
        }
        if let Some(price) = field("reference_price").and_then(|v| v.parse::<f64>().ok()) {
            if price > 0.0 {
                component.reference_price = price;
            }
        }
        if let Some(dose) = field("total_dose_krad").and_then(|v| v.parse::<f64>().ok()) {
            component.total_dose_krad = Some(dose);
        }

        if args.dry_run {
            stats.imported += 1;
            continue;
        }

        match loader::write_entity(&project.catalog_dir(), &component) {
            Ok(_) => {
                stats.imported += 1;
                if global.verbose {
                    println!(
                        "{} Row {}: imported {}",
                        style("✓").green(),
                        row_num,
                        component.part_number
                    );
                }
            }
            Err(e) => {
                eprintln!("{} Row {}: {}", style("✗").red(), row_num, e);
                stats.errors += 1;
                if !args.skip_errors {
                    return Err(miette::miette!("Failed to write row {}: {}", row_num, e));
                }
            }
        }
    }

    // Imported files invalidate the cache through the mtime auto-sync on
    // next open; a bulk re-import over existing data still needs an
    // explicit `cqt cache rebuild`.
    if !global.quiet {
        let verb = if args.dry_run { "Parsed" } else { "Imported" };
        println!(
            "{} {} {} of {} row(s), {} error(s)",
            style("✓").green(),
            verb,
            style(stats.imported).cyan(),
            stats.rows_processed,
            if stats.errors > 0 {
                style(stats.errors).red()
            } else {
                style(stats.errors).green()
            }
        );
    }

    Ok(())
}

//! `cqt cache` command - catalog cache management
//!
//! The cache is stale only until an explicit invalidation signal: `clear`
//! and `rebuild` are the operator-triggered signals used after bulk
//! re-imports.

use console::style;
use dialoguer::Confirm;
use miette::{IntoDiagnostic, Result};

use crate::cli::GlobalOpts;
use crate::core::cache::CatalogCache;
use crate::core::project::Project;

#[derive(clap::Subcommand, Debug)]
pub enum CacheCommands {
    /// Show cache statistics
    Status,

    /// Drop every cached row (explicit invalidation)
    Clear(ClearArgs),

    /// Rebuild the cache from the filesystem
    Rebuild,
}

#[derive(clap::Args, Debug)]
pub struct ClearArgs {
    /// Skip the confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

pub fn run(cmd: CacheCommands, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;

    match cmd {
        CacheCommands::Status => {
            let cache = CatalogCache::open(&project)?;
            let stats = cache.statistics()?;

            println!("{}", style("Catalog Cache").bold());
            println!("{}", style("─".repeat(40)).dim());
            println!("Components:  {}", style(stats.total_components).cyan());
            println!("Records:     {}", style(stats.total_records).cyan());
            println!(
                "Size:        {} KiB",
                style(stats.db_size_bytes / 1024).cyan()
            );

            if !stats.by_category.is_empty() {
                println!();
                let mut categories: Vec<_> = stats.by_category.iter().collect();
                categories.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
                for (category, count) in categories {
                    println!("  {:<30} {}", category, count);
                }
            }
        }
        CacheCommands::Clear(args) => {
            if !args.yes {
                let confirmed = Confirm::new()
                    .with_prompt("Drop all cached catalog rows?")
                    .default(false)
                    .interact()
                    .into_diagnostic()?;
                if !confirmed {
                    println!("Aborted.");
                    return Ok(());
                }
            }

            let mut cache = CatalogCache::open_without_sync(&project)?;
            cache.clear()?;
            if !global.quiet {
                println!("{} Cache cleared", style("✓").green());
            }
        }
        CacheCommands::Rebuild => {
            let mut cache = CatalogCache::open_without_sync(&project)?;
            let stats = cache.rebuild()?;
            if !global.quiet {
                println!(
                    "{} Rebuilt cache: {} file(s) scanned, {} entry(ies) cached in {}ms",
                    style("✓").green(),
                    style(stats.files_scanned).cyan(),
                    style(stats.entries_added).cyan(),
                    stats.duration_ms
                );
            }
        }
    }

    Ok(())
}

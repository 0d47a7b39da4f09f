//! `cqt cmp` command - component catalog management

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::catalog::{Component, Lifecycle};
use crate::cli::helpers::{display_or_missing, opt_or_missing, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::cache::CatalogCache;
use crate::core::config::Config;
use crate::core::loader;
use crate::core::project::Project;

#[derive(clap::Subcommand, Debug)]
pub enum CmpCommands {
    /// Create a new catalog entry
    New(NewArgs),

    /// List catalog entries (cache-backed)
    List(ListArgs),

    /// Show a catalog entry by part number or ID
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Part number
    #[arg(long, short = 'p')]
    pub part_number: String,

    /// Manufacturer name
    #[arg(long, short = 'm')]
    pub manufacturer: String,

    /// Primary category
    #[arg(long, short = 'c')]
    pub category: String,

    /// Secondary category
    #[arg(long)]
    pub secondary_category: Option<String>,

    /// Package designation
    #[arg(long)]
    pub package: Option<String>,

    /// Quality level label
    #[arg(long)]
    pub quality_level: Option<String>,

    /// Lifecycle state
    #[arg(long, default_value = "producing")]
    pub lifecycle: String,

    /// Reference price (omit when no quote is available)
    #[arg(long)]
    pub price: Option<f64>,

    /// Short description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// Technical parameter as key=value (repeatable)
    #[arg(long = "param")]
    pub params: Vec<String>,

    /// Author (default: from config)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by category (either level)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Filter by manufacturer
    #[arg(long, short = 'm')]
    pub manufacturer: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Part number (or a unique fragment of one), or a CMP- entity ID
    pub part: String,
}

pub fn run(cmd: CmpCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        CmpCommands::New(args) => run_new(args),
        CmpCommands::List(args) => run_list(args, global),
        CmpCommands::Show(args) => run_show(args, global),
    }
}

fn run_new(args: NewArgs) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let config = Config::load();

    let lifecycle: Lifecycle = args
        .lifecycle
        .parse()
        .map_err(|e: String| miette::miette!("{}", e))?;

    let mut component = Component::new(
        args.part_number,
        args.manufacturer,
        args.category,
        args.author.unwrap_or_else(|| config.author()),
    );
    component.lifecycle = lifecycle;
    if let Some(secondary) = args.secondary_category {
        component.secondary_category = secondary;
    }
    if let Some(package) = args.package {
        component.package = package;
    }
    if let Some(quality) = args.quality_level {
        component.quality_level = quality;
    }
    if let Some(price) = args.price {
        if price < 0.0 {
            return Err(miette::miette!("reference price cannot be negative"));
        }
        component.reference_price = price;
    }
    if let Some(description) = args.description {
        component.description = description;
    }
    for pair in &args.params {
        let Some((key, value)) = pair.split_once('=') else {
            return Err(miette::miette!(
                "invalid --param '{}': expected key=value",
                pair
            ));
        };
        component
            .parameters
            .insert(key.trim().to_string(), value.trim().to_string());
    }

    let path = loader::write_entity(&project.catalog_dir(), &component)?;
    println!(
        "{} Created component {} ({})",
        style("✓").green(),
        style(&component.part_number).cyan(),
        style(path.display()).dim()
    );

    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let cache = CatalogCache::open(&project)?;

    let components = cache.list_components(
        args.category.as_deref(),
        args.manufacturer.as_deref(),
        args.limit,
    );

    if components.is_empty() {
        println!("No components found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = components
                .iter()
                .map(|c| {
                    serde_json::json!({
                        "id": c.id,
                        "part_number": c.part_number,
                        "manufacturer": c.manufacturer,
                        "primary_category": c.primary_category,
                        "lifecycle": c.lifecycle,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for component in &components {
                println!("{}", component.id);
            }
        }
        OutputFormat::Csv => {
            println!("part_number,manufacturer,primary_category,lifecycle,reference_price");
            for c in &components {
                println!(
                    "{},{},{},{},{}",
                    crate::cli::helpers::escape_csv(&c.part_number),
                    crate::cli::helpers::escape_csv(&c.manufacturer),
                    crate::cli::helpers::escape_csv(&c.primary_category),
                    c.lifecycle,
                    c.reference_price
                );
            }
        }
        _ => {
            println!(
                "{:<20} {:<18} {:<22} {:<14}",
                style("PART NUMBER").bold(),
                style("MANUFACTURER").bold(),
                style("CATEGORY").bold(),
                style("LIFECYCLE").bold()
            );
            println!("{}", "-".repeat(76));
            for c in &components {
                println!(
                    "{:<20} {:<18} {:<22} {:<14}",
                    truncate_str(&c.part_number, 18),
                    truncate_str(&c.manufacturer, 16),
                    truncate_str(&c.primary_category, 20),
                    c.lifecycle
                );
            }
            println!();
            println!("{} component(s)", style(components.len()).cyan());
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;

    // Resolve via the cache first, then read the full YAML entity
    let cache = CatalogCache::open(&project)?;
    let cached = cache
        .get_component(&args.part)
        .ok_or_else(|| miette::miette!("Component '{}' not found", args.part))?;

    let (_, component): (_, Component) =
        loader::load_entity(&project.catalog_dir(), &cached.id)?
            .ok_or_else(|| miette::miette!("Component file for '{}' missing", cached.id))?;

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&component).into_diagnostic()?
            );
        }
        OutputFormat::Yaml | OutputFormat::Auto => {
            println!("{}", serde_yaml::to_string(&component).into_diagnostic()?);
        }
        _ => {
            println!(
                "{} {}",
                style(&component.part_number).cyan().bold(),
                style(&component.manufacturer).dim()
            );
            println!("Category:  {}", component.primary_category);
            println!("Package:   {}", display_or_missing(&component.package));
            println!(
                "Quality:   {}",
                display_or_missing(&component.quality_level)
            );
            println!("Lifecycle: {}", component.lifecycle);
            println!("Price:     {}", opt_or_missing(component.quoted_price()));
        }
    }

    Ok(())
}

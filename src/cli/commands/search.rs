//! `cqt search` command - faceted catalog search
//!
//! Filter values, page, and limit arrive as strings and are parsed and
//! clamped by the core, so stale bookmarked query state degrades to a
//! broader result set instead of failing.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::catalog::{run_query, suggest, CorpusProvider, QueryParams, YamlCorpus};
use crate::cli::helpers::{display_or_missing, opt_or_missing, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;

#[derive(clap::Args, Debug)]
pub struct SearchArgs {
    /// Search term (case-insensitive substring over part number,
    /// manufacturer, description, and categories)
    pub query: Option<String>,

    /// Exact category filter (matches either category level)
    #[arg(long, short = 'c')]
    pub category: Option<String>,

    /// Exact manufacturer filter
    #[arg(long, short = 'm')]
    pub manufacturer: Option<String>,

    /// Exact quality level filter
    #[arg(long)]
    pub quality_level: Option<String>,

    /// Lifecycle filter (producing, engineering_sample, discontinued)
    #[arg(long)]
    pub lifecycle: Option<String>,

    /// Minimum reference price (inclusive)
    #[arg(long)]
    pub price_min: Option<String>,

    /// Maximum reference price (inclusive)
    #[arg(long)]
    pub price_max: Option<String>,

    /// Minimum total dose rating in krad (inclusive)
    #[arg(long)]
    pub dose_min: Option<String>,

    /// Maximum total dose rating in krad (inclusive)
    #[arg(long)]
    pub dose_max: Option<String>,

    /// 1-indexed result page
    #[arg(long, default_value = "1")]
    pub page: String,

    /// Page size
    #[arg(long, short = 'n')]
    pub limit: Option<String>,

    /// Sort field (partNumber, manufacturer, referencePrice, qualityLevel, created)
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction (asc, desc)
    #[arg(long)]
    pub sort_order: Option<String>,

    /// Show typeahead suggestions for the term instead of results
    #[arg(long)]
    pub suggest: bool,

    /// Show only the filtered count
    #[arg(long)]
    pub count: bool,
}

/// Run the search command
pub fn run(args: SearchArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let corpus = YamlCorpus::new(project.catalog_dir());
    let components = corpus
        .list(&Default::default())
        .map_err(|e| miette::miette!("{}", e))?;

    if args.suggest {
        let term = args.query.as_deref().unwrap_or("");
        let suggestions = suggest(&components, term, 10);
        match global.format {
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&suggestions).into_diagnostic()?
                );
            }
            _ => {
                for suggestion in &suggestions {
                    println!("{}\t{}", suggestion.value, suggestion.label);
                }
            }
        }
        return Ok(());
    }

    let mut params = QueryParams::new();
    params.set_opt("keyword", args.query.clone());
    params.set_opt("category", args.category.clone());
    params.set_opt("manufacturer", args.manufacturer.clone());
    params.set_opt("qualityLevel", args.quality_level.clone());
    params.set_opt("lifecycle", args.lifecycle.clone());
    params.set_opt("priceMin", args.price_min.clone());
    params.set_opt("priceMax", args.price_max.clone());
    params.set_opt("totalDoseMin", args.dose_min.clone());
    params.set_opt("totalDoseMax", args.dose_max.clone());
    params.set("page", args.page.clone());
    params.set_opt("limit", args.limit.clone());
    params.set_opt("sortBy", args.sort_by.clone());
    params.set_opt("sortOrder", args.sort_order.clone());

    let criteria = params.criteria();
    let page_request = params.page_request();
    let sort = params.sort();

    let page = run_query(&components, &criteria, page_request, sort);

    if args.count {
        println!("{}", page.total);
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "items": page.items.iter().map(component_json).collect::<Vec<_>>(),
                "total": page.total,
                "page": page.page,
                "page_size": page.page_size,
                "total_pages": page.total_pages(),
                "facets": page.facets,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut buffer = Vec::new();
            crate::catalog::export::write_csv(&mut buffer, &page.items).into_diagnostic()?;
            print!("{}", String::from_utf8_lossy(&buffer));
        }
        OutputFormat::Id => {
            for item in &page.items {
                println!("{}", item.id);
            }
        }
        OutputFormat::Yaml => {
            println!("{}", serde_yaml::to_string(&page.items).into_diagnostic()?);
        }
        _ => print_table(&page, args.query.as_deref()),
    }

    Ok(())
}

fn component_json(component: &crate::catalog::Component) -> serde_json::Value {
    serde_json::json!({
        "id": component.id.to_string(),
        "part_number": component.part_number,
        "manufacturer": component.manufacturer,
        "primary_category": component.primary_category,
        "secondary_category": component.secondary_category,
        "quality_level": component.quality_level,
        "lifecycle": component.lifecycle.to_string(),
        "reference_price": component.quoted_price(),
    })
}

fn print_table(page: &crate::catalog::QueryPage, query: Option<&str>) {
    if page.items.is_empty() {
        match query {
            Some(q) => println!("No results found for '{}'.", style(q).yellow()),
            None => println!("No components matched."),
        }
        return;
    }

    println!(
        "{} of {} result(s), page {}/{}:",
        style(page.items.len()).cyan(),
        style(page.total).cyan(),
        page.page,
        page.total_pages().max(1)
    );
    println!();
    println!(
        "{:<20} {:<18} {:<22} {:<12} {:<10}",
        style("PART NUMBER").bold(),
        style("MANUFACTURER").bold(),
        style("CATEGORY").bold(),
        style("QUALITY").bold(),
        style("PRICE").bold()
    );
    println!("{}", "-".repeat(86));

    for item in &page.items {
        println!(
            "{:<20} {:<18} {:<22} {:<12} {:<10}",
            truncate_str(&item.part_number, 18),
            truncate_str(&item.manufacturer, 16),
            truncate_str(&item.primary_category, 20),
            display_or_missing(&item.quality_level),
            opt_or_missing(item.quoted_price())
        );
    }

    println!();
    if !page.facets.manufacturers.is_empty() {
        println!(
            "Manufacturers: {}",
            style(page.facets.manufacturers.join(", ")).dim()
        );
    }
    if !page.facets.categories.is_empty() {
        println!(
            "Categories:    {}",
            style(page.facets.categories.join(", ")).dim()
        );
    }
}

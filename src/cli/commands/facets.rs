//! `cqt facets` command - distinct filter options over the corpus
//!
//! Distinct values come from the cache; the observed price range is
//! computed from the full corpus since the cache stores prices but not
//! quote-sentinel semantics.

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::catalog::{filter_options, CorpusProvider, YamlCorpus};
use crate::cli::helpers::opt_or_missing;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::cache::CatalogCache;
use crate::core::project::Project;

#[derive(clap::Args, Debug)]
pub struct FacetsArgs {
    /// Show a single field only (manufacturer, category, quality-level)
    #[arg(long)]
    pub field: Option<String>,
}

pub fn run(args: FacetsArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let cache = CatalogCache::open(&project)?;

    let manufacturers = cache.distinct_component_values("manufacturer");
    let categories = cache.distinct_component_values("primary_category");
    let quality_levels = cache.distinct_component_values("quality_level");

    if let Some(field) = args.field.as_deref() {
        let values = match field {
            "manufacturer" | "manufacturers" => manufacturers,
            "category" | "categories" => categories,
            "quality-level" | "quality_level" => quality_levels,
            other => {
                return Err(miette::miette!(
                    "Unknown facet field '{}'. Use manufacturer, category, or quality-level",
                    other
                ))
            }
        };
        for value in values {
            println!("{}", value);
        }
        return Ok(());
    }

    let corpus = YamlCorpus::new(project.catalog_dir());
    let components = corpus
        .list(&Default::default())
        .map_err(|e| miette::miette!("{}", e))?;
    let options = filter_options(&components);

    match global.format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "manufacturers": manufacturers,
                "categories": categories,
                "quality_levels": quality_levels,
                "price_min": options.price_min,
                "price_max": options.price_max,
            });
            println!("{}", serde_json::to_string_pretty(&json).into_diagnostic()?);
        }
        _ => {
            print_group("Manufacturers", &manufacturers);
            print_group("Categories", &categories);
            print_group("Quality levels", &quality_levels);
            println!(
                "{} {} .. {}",
                style("Price range").bold(),
                opt_or_missing(options.price_min),
                opt_or_missing(options.price_max)
            );
        }
    }

    Ok(())
}

fn print_group(label: &str, values: &[String]) {
    println!("{} ({})", style(label).bold(), values.len());
    for value in values {
        println!("  {}", value);
    }
    println!();
}

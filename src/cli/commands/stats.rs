//! `cqt stats` command - per-category catalog statistics

use miette::{IntoDiagnostic, Result};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::catalog::{category_stats, CorpusProvider, YamlCorpus};
use crate::cli::helpers::opt_or_missing;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    /// Include secondary-category breakdowns
    #[arg(long)]
    pub subcategories: bool,
}

#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "CATEGORY")]
    category: String,
    #[tabled(rename = "COUNT")]
    count: usize,
    #[tabled(rename = "AVG PRICE")]
    avg_price: String,
}

pub fn run(args: StatsArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let corpus = YamlCorpus::new(project.catalog_dir());
    let components = corpus
        .list(&Default::default())
        .map_err(|e| miette::miette!("{}", e))?;

    let stats = category_stats(&components);

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats).into_diagnostic()?);
        }
        _ => {
            let mut rows = Vec::new();
            for group in &stats {
                rows.push(StatsRow {
                    category: group.category.clone(),
                    count: group.count,
                    avg_price: opt_or_missing(group.avg_price.map(|p| format!("{:.2}", p))),
                });
                if args.subcategories {
                    for sub in &group.subcategories {
                        rows.push(StatsRow {
                            category: format!("  {}", sub.name),
                            count: sub.count,
                            avg_price: opt_or_missing(
                                sub.avg_price.map(|p| format!("{:.2}", p)),
                            ),
                        });
                    }
                }
            }

            let mut table = Table::new(rows);
            table.with(Style::sharp());
            println!("{}", table);
        }
    }

    Ok(())
}

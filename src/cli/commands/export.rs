//! `cqt export` command - export a filtered result set as CSV

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::catalog::{export, CorpusProvider, QueryParams, YamlCorpus};
use crate::cli::GlobalOpts;
use crate::core::project::Project;

#[derive(clap::Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: stdout)
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Filter as key=value (keyword, category, manufacturer, qualityLevel,
    /// lifecycle, priceMin, priceMax, totalDoseMin, totalDoseMax; repeatable)
    #[arg(long = "where", short = 'w')]
    pub filters: Vec<String>,
}

pub fn run(args: ExportArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let corpus = YamlCorpus::new(project.catalog_dir());

    let params = QueryParams::from_pairs(args.filters.iter().map(String::as_str));
    let criteria = params.criteria();

    let components = corpus
        .list(&criteria)
        .map_err(|e| miette::miette!("{}", e))?;

    match args.output {
        Some(path) => {
            let file = std::fs::File::create(&path).into_diagnostic()?;
            export::write_csv(file, &components).into_diagnostic()?;
            if !global.quiet {
                println!(
                    "{} Exported {} component(s) to {}",
                    style("✓").green(),
                    style(components.len()).cyan(),
                    style(path.display()).cyan()
                );
            }
        }
        None => {
            let mut buffer = Vec::new();
            export::write_csv(&mut buffer, &components).into_diagnostic()?;
            print!("{}", String::from_utf8_lossy(&buffer));
        }
    }

    Ok(())
}

//! `cqt validate` command - validate project files against schemas

use console::style;
use miette::Result;

use crate::cli::GlobalOpts;
use crate::core::identity::EntityPrefix;
use crate::core::project::Project;
use crate::schema::Validator;

#[derive(clap::Args, Debug)]
pub struct ValidateArgs {
    /// Only validate one entity type (cmp, trc)
    #[arg(long, short = 't')]
    pub entity_type: Option<String>,
}

pub fn run(args: ValidateArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let validator = Validator::new();

    let type_filter: Option<EntityPrefix> = match args.entity_type.as_deref() {
        Some(t) => Some(
            t.parse()
                .map_err(|e: crate::core::IdParseError| miette::miette!("{}", e))?,
        ),
        None => None,
    };

    let mut files_checked = 0usize;
    let mut files_failed = 0usize;

    for prefix in EntityPrefix::all() {
        if let Some(filter) = type_filter {
            if *prefix != filter {
                continue;
            }
        }

        for path in project.iter_entity_files(*prefix) {
            files_checked += 1;

            let content = match std::fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) => {
                    files_failed += 1;
                    eprintln!("{} {}: {}", style("✗").red(), path.display(), e);
                    continue;
                }
            };

            let result = validator.validate(&content, *prefix);
            if result.valid {
                if global.verbose {
                    println!("{} {}", style("✓").green(), path.display());
                }
            } else {
                files_failed += 1;
                println!("{} {}", style("✗").red(), style(path.display()).cyan());
                for issue in &result.errors {
                    if issue.path.is_empty() {
                        println!("    {}", issue.message);
                    } else {
                        println!("    {}: {}", style(&issue.path).dim(), issue.message);
                    }
                }
            }
        }
    }

    println!();
    if files_failed == 0 {
        println!(
            "{} {} file(s) valid",
            style("✓").green().bold(),
            style(files_checked).cyan()
        );
        Ok(())
    } else {
        println!(
            "{} {} of {} file(s) failed validation",
            style("✗").red().bold(),
            style(files_failed).red(),
            files_checked
        );
        Err(miette::miette!("{} file(s) failed validation", files_failed))
    }
}

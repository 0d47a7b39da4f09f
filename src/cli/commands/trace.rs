//! `cqt trace` command - traceability record queries and reports

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::{opt_or_missing, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::cache::CatalogCache;
use crate::core::entity::RiskLevel;
use crate::core::project::Project;
use crate::trace::record::ComplianceStatus;
use crate::trace::{build_chain, score, RecordStore, TraceabilityRecord, YamlRecordStore};

#[derive(clap::Subcommand, Debug)]
pub enum TraceCommands {
    /// List stored traceability records
    List(ListArgs),

    /// Show a full record by traceability ID
    Show(ShowArgs),

    /// Assemble and display the life-cycle chain for a record
    Chain(ChainArgs),

    /// Compute completeness, risk, and compliance for a record
    Score(ScoreArgs),

    /// Import a record YAML file into the store
    Import(ImportArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by target value (substring)
    #[arg(long, short = 't')]
    pub target: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Traceability ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ChainArgs {
    /// Traceability ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    /// Traceability ID
    pub id: String,
}

#[derive(clap::Args, Debug)]
pub struct ImportArgs {
    /// Record YAML file to add to the store
    pub file: PathBuf,
}

#[derive(Tabled)]
struct ChainRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "STAGE")]
    stage: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "LOCATION")]
    location: String,
    #[tabled(rename = "OPERATOR")]
    operator: String,
    #[tabled(rename = "SECTION")]
    section: String,
}

pub fn run(cmd: TraceCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TraceCommands::List(args) => run_list(args, global),
        TraceCommands::Show(args) => run_show(args, global),
        TraceCommands::Chain(args) => run_chain(args, global),
        TraceCommands::Score(args) => run_score(args, global),
        TraceCommands::Import(args) => run_import(args, global),
    }
}

fn open_store(project: &Project) -> YamlRecordStore {
    YamlRecordStore::new(project.records_dir())
}

/// Fetch a record, treating "not found" as an explicit empty business
/// state with a friendly message
fn fetch(store: &YamlRecordStore, id: &str) -> Result<Option<TraceabilityRecord>> {
    store.get(id).map_err(|e| miette::miette!("{}", e))
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let cache = CatalogCache::open(&project)?;
    let records = cache.list_records(args.target.as_deref());

    if records.is_empty() {
        println!("No traceability records found.");
        return Ok(());
    }

    match global.format {
        OutputFormat::Json => {
            let rows: Vec<serde_json::Value> = records
                .iter()
                .map(|r| {
                    serde_json::json!({
                        "traceability_id": r.traceability_id,
                        "target_type": r.target_type,
                        "target_value": r.target_value,
                        "query_by": r.query_by,
                        "query_date": r.query_date.to_rfc3339(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for record in &records {
                println!("{}", record.traceability_id);
            }
        }
        _ => {
            println!(
                "{:<18} {:<14} {:<22} {:<14} {:<12}",
                style("TRACE ID").bold(),
                style("TARGET TYPE").bold(),
                style("TARGET").bold(),
                style("QUERIED BY").bold(),
                style("DATE").bold()
            );
            println!("{}", "-".repeat(82));
            for r in &records {
                println!(
                    "{:<18} {:<14} {:<22} {:<14} {:<12}",
                    truncate_str(&r.traceability_id, 16),
                    r.target_type,
                    truncate_str(&r.target_value, 20),
                    truncate_str(&r.query_by, 12),
                    r.query_date.format("%Y-%m-%d")
                );
            }
            println!();
            println!("{} record(s)", style(records.len()).cyan());
        }
    }

    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = open_store(&project);

    let Some(record) = fetch(&store, &args.id)? else {
        println!(
            "No traceability record for '{}' yet.",
            style(&args.id).yellow()
        );
        return Ok(());
    };

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&record).into_diagnostic()?
            );
        }
        _ => {
            println!("{}", serde_yaml::to_string(&record).into_diagnostic()?);
        }
    }

    Ok(())
}

fn run_chain(args: ChainArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = open_store(&project);

    let Some(record) = fetch(&store, &args.id)? else {
        println!(
            "No traceability record for '{}' yet.",
            style(&args.id).yellow()
        );
        return Ok(());
    };

    let chain = build_chain(&record);

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&chain).into_diagnostic()?);
        }
        _ => {
            println!(
                "{} Traceability chain for {} ({} {})",
                style("→").blue(),
                style(&record.traceability_id).cyan(),
                record.query_target.target_type,
                record.query_target.target_value
            );
            println!();

            if chain.is_empty() {
                println!("  {}", style("(no life-cycle events recorded)").dim());
                return Ok(());
            }

            let rows: Vec<ChainRow> = chain
                .iter()
                .enumerate()
                .map(|(idx, stage)| ChainRow {
                    index: idx + 1,
                    stage: truncate_str(&stage.stage_name, 36),
                    date: opt_or_missing(stage.date),
                    location: truncate_str(&stage.location, 24),
                    operator: truncate_str(&stage.operator, 16),
                    section: stage.source_section.to_string(),
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::sharp());
            println!("{}", table);
            println!();
            println!("{} stage(s)", style(chain.len()).cyan());
        }
    }

    Ok(())
}

fn run_score(args: ScoreArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = open_store(&project);

    let Some(record) = fetch(&store, &args.id)? else {
        println!(
            "No traceability record for '{}' yet.",
            style(&args.id).yellow()
        );
        return Ok(());
    };

    let scored = score(&record);

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&scored).into_diagnostic()?
            );
        }
        _ => {
            println!(
                "{} Traceability score for {}",
                style("→").blue(),
                style(&record.traceability_id).cyan()
            );
            println!();

            let completeness = format!("{}%", scored.completeness);
            let completeness_styled = if scored.completeness >= 80 {
                style(completeness).green()
            } else if scored.completeness >= 40 {
                style(completeness).yellow()
            } else {
                style(completeness).red()
            };
            println!("Completeness: {}", completeness_styled);

            if !scored.missing_sections.is_empty() {
                println!(
                    "Missing:      {}",
                    style(scored.missing_sections.join(", ")).dim()
                );
            }

            let risk_label = if scored.risk_assessed {
                scored.risk_level.to_string()
            } else {
                format!("{} (default)", scored.risk_level)
            };
            let risk_styled = match scored.risk_level {
                RiskLevel::Low => style(risk_label).green(),
                RiskLevel::Medium => style(risk_label).yellow(),
                RiskLevel::High | RiskLevel::Critical => style(risk_label).red(),
            };
            println!("Risk level:   {}", risk_styled);
            println!("Confidence:   {}%", scored.confidence);

            let compliance_styled = match scored.compliance {
                ComplianceStatus::Compliant => style(scored.compliance.to_string()).green(),
                ComplianceStatus::NonCompliant => style(scored.compliance.to_string()).red(),
                _ => style(scored.compliance.to_string()).yellow(),
            };
            println!("Compliance:   {}", compliance_styled);
        }
    }

    Ok(())
}

fn run_import(args: ImportArgs, global: &GlobalOpts) -> Result<()> {
    let project = Project::discover().map_err(|e| miette::miette!("{}", e))?;
    let store = open_store(&project);

    let content = std::fs::read_to_string(&args.file).into_diagnostic()?;
    let record: TraceabilityRecord = serde_yaml::from_str(&content)
        .map_err(|e| miette::miette!("Failed to parse {}: {}", args.file.display(), e))?;

    store
        .put(&record)
        .map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        println!(
            "{} Stored traceability record {}",
            style("✓").green(),
            style(&record.traceability_id).cyan()
        );
    }

    Ok(())
}

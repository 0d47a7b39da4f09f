//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    cache::CacheCommands, cmp::CmpCommands, completions::CompletionsArgs, export::ExportArgs,
    facets::FacetsArgs, import::ImportArgs, init::InitArgs, search::SearchArgs, stats::StatsArgs,
    trace::TraceCommands, validate::ValidateArgs,
};

#[derive(Parser)]
#[command(name = "cqt")]
#[command(author, version, about = "Component Quality Toolkit")]
#[command(
    long_about = "A Unix-style toolkit for managing an electronic component catalog and its quality traceability records as plain text files under git version control."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .cqt/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new cqt project
    Init(InitArgs),

    /// Component catalog management
    #[command(subcommand)]
    Cmp(CmpCommands),

    /// Faceted catalog search
    Search(SearchArgs),

    /// Show distinct filter options over the corpus
    Facets(FacetsArgs),

    /// Per-category catalog statistics
    Stats(StatsArgs),

    /// Import components from CSV
    Import(ImportArgs),

    /// Export a filtered result set as CSV
    Export(ExportArgs),

    /// Traceability record queries and reports
    #[command(subcommand)]
    Trace(TraceCommands),

    /// Validate project files against schemas
    Validate(ValidateArgs),

    /// Catalog cache management
    #[command(subcommand)]
    Cache(CacheCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

use clap::Parser;
use cqt::cli::{Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    // Install miette's fancy error handler for beautiful diagnostics
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    match cli.command {
        Commands::Init(args) => cqt::cli::commands::init::run(args),
        Commands::Cmp(cmd) => cqt::cli::commands::cmp::run(cmd, &global),
        Commands::Search(args) => cqt::cli::commands::search::run(args, &global),
        Commands::Facets(args) => cqt::cli::commands::facets::run(args, &global),
        Commands::Stats(args) => cqt::cli::commands::stats::run(args, &global),
        Commands::Import(args) => cqt::cli::commands::import::run(args, &global),
        Commands::Export(args) => cqt::cli::commands::export::run(args, &global),
        Commands::Trace(cmd) => cqt::cli::commands::trace::run(cmd, &global),
        Commands::Validate(args) => cqt::cli::commands::validate::run(args, &global),
        Commands::Cache(cmd) => cqt::cli::commands::cache::run(cmd, &global),
        Commands::Completions(args) => cqt::cli::commands::completions::run(args),
    }
}

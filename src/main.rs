use anyhow::Result;
use clap::{Parser, Subcommand};
use openscience_stats::{query, report};

#[derive(Parser)]
#[command(name = "openscience-stats")]
#[command(about = "Open science statistics over an institution's publications")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Query(query::Query),
    /// Write author statistics for every author as JSON Lines
    Report(report::ReportArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }

    match cli.command {
        Commands::Query(q) => query::run(q),
        Commands::Report(args) => report::run(args).map(|_| ()),
    }
}

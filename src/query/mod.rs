use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::logging;
use crate::stats::{StatsConfig, StatsService};
use crate::store::SourceArgs;
use crate::StatsError;

#[derive(Args, Clone, Debug)]
pub struct CommonArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write the JSON result here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct LabArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Lab name as it appears in author fields, e.g. "Lee, Amy"
    #[arg(short, long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct AnnualArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Restrict to the author with this email (whole institution if omitted)
    #[arg(short, long)]
    pub email: Option<String>,

    /// Start of the aggregation window, YYYY-MM-DD
    #[arg(short, long)]
    pub since: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct AuthorArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(short, long)]
    pub enid: u64,

    /// Start of the aggregation window, YYYY-MM-DD
    #[arg(short, long)]
    pub since: Option<NaiveDate>,
}

#[derive(Args, Debug)]
pub struct HistogramArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(short, long)]
    pub enid: u64,

    /// Start of the aggregation window, YYYY-MM-DD
    #[arg(short, long)]
    pub since: Option<NaiveDate>,

    /// Upper bound on bins per histogram
    #[arg(short, long, default_value = "10")]
    pub max_bins: usize,
}

#[derive(Args, Debug)]
pub struct LinksArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    #[arg(short, long)]
    pub enid: u64,

    /// One link per line instead of a JSON array
    #[arg(short, long)]
    pub jsonl: bool,
}

#[derive(Subcommand, Debug)]
pub enum Query {
    /// Publication and citation totals for a lab
    Lab(LabArgs),
    /// Supplementary resources per year, institution-wide or for one author
    Annual(AnnualArgs),
    /// Rankings, percentiles and scatter data for one author
    Author(AuthorArgs),
    /// Contribution histograms with the author's bin flagged
    Histogram(HistogramArgs),
    /// Every supplementary link on an author's publications
    Links(LinksArgs),
}

pub fn run(query: Query) -> Result<()> {
    logging::init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_async(query))
}

pub async fn run_async(query: Query) -> Result<()> {
    match query {
        Query::Lab(args) => {
            let service = open_service(&args.common, StatsConfig::default())?;
            let result = service.lab_stats(&args.name).await;
            emit(&args.common.output, result)
        }
        Query::Annual(args) => {
            let config = StatsConfig::default().with_since(args.since);
            let service = open_service(&args.common, config)?;
            let result = match &args.email {
                Some(email) => service.author_annual_supplementary(email).await,
                None => service.institution_annual_supplementary().await,
            };
            emit(&args.common.output, result)
        }
        Query::Author(args) => {
            let config = StatsConfig::default().with_since(args.since);
            let service = open_service(&args.common, config)?;
            let result = service.author_stats(args.enid).await;
            emit(&args.common.output, result)
        }
        Query::Histogram(args) => {
            let mut config = StatsConfig::default().with_since(args.since);
            config.max_bins = args.max_bins;
            let service = open_service(&args.common, config)?;
            let result = service.author_histogram(args.enid).await;
            emit(&args.common.output, result)
        }
        Query::Links(args) => {
            let service = open_service(&args.common, StatsConfig::default())?;
            let links = service.export_author_links(args.enid).await;
            match links {
                Ok(links) if args.jsonl => {
                    info!("Exporting {} links", links.len());
                    let mut writer = open_output(&args.common.output)?;
                    for link in &links {
                        serde_json::to_writer(&mut writer, link)?;
                        writer.write_all(b"\n")?;
                    }
                    writer.flush()?;
                    Ok(())
                }
                other => emit(&args.common.output, other),
            }
        }
    }
}

fn open_service(common: &CommonArgs, config: StatsConfig) -> Result<StatsService> {
    let store = common
        .source
        .open()
        .context("Failed to open data source")?;
    Ok(StatsService::new(store, config))
}

/// Unknown authors and authors without publications are reported as
/// `null`; every other error fails the command.
fn emit<T: Serialize>(output: &Option<PathBuf>, result: Result<T, StatsError>) -> Result<()> {
    let value = match result {
        Ok(value) => serde_json::to_value(value)?,
        Err(e) if e.is_not_found() || e.is_no_contributions() => {
            warn!("{}", e);
            serde_json::Value::Null
        }
        Err(e) => return Err(e.into()),
    };

    let mut writer = open_output(output)?;
    serde_json::to_writer_pretty(&mut writer, &value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn open_output(output: &Option<PathBuf>) -> Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

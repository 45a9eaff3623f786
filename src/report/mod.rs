use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use crossbeam_channel::bounded;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::info;

use crate::logging;
use crate::stats::{AuthorIndex, AuthorStats, Rankings, StatsConfig};
use crate::store::SourceArgs;

#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Directory for author_stats.jsonl and author_stats.skipped.jsonl
    #[arg(short, long)]
    pub output: PathBuf,

    /// Start of the aggregation window, YYYY-MM-DD
    #[arg(short, long)]
    pub since: Option<NaiveDate>,

    /// Number of threads (0 = auto)
    #[arg(short, long, default_value = "0")]
    pub threads: usize,

    /// Authors per batch sent to the writer
    #[arg(short, long, default_value = "200")]
    pub batch_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedAuthor {
    pub enid: u64,
    pub name: String,
    pub error: String,
}

enum ReportLine {
    Stats(Box<AuthorStats>),
    Skipped(SkippedAuthor),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub written: u64,
    pub skipped: u64,
}

pub fn run(args: ReportArgs) -> Result<ReportSummary> {
    logging::init();

    fs::create_dir_all(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
        .ok();
    info!("Using {} threads", num_threads);

    let store = args.source.open().context("Failed to open data source")?;
    let rt = tokio::runtime::Runtime::new()?;
    let corpus = rt.block_on(store.corpus())?;

    let config = StatsConfig::default().with_since(args.since);
    let index = AuthorIndex::build(&corpus.authors, &corpus.publications)?;
    let rankings = Rankings::compute(&index, &config);
    let total = rankings.total_authors();
    if total == 0 {
        info!("No authors to report");
    }

    let progress = ProgressBar::new(total as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let (tx, rx) = bounded::<Vec<ReportLine>>(num_threads * 4);

    let stats_path = args.output.join("author_stats.jsonl");
    let skipped_path = args.output.join("author_stats.skipped.jsonl");
    let writer_handle = std::thread::spawn(move || -> Result<ReportSummary> {
        let mut stats_writer = BufWriter::new(File::create(&stats_path)?);
        let mut skipped_writer = BufWriter::new(File::create(&skipped_path)?);
        let mut summary = ReportSummary::default();

        while let Ok(batch) = rx.recv() {
            for line in batch {
                match line {
                    ReportLine::Stats(stats) => {
                        serde_json::to_writer(&mut stats_writer, &stats)?;
                        stats_writer.write_all(b"\n")?;
                        summary.written += 1;
                    }
                    ReportLine::Skipped(skipped) => {
                        serde_json::to_writer(&mut skipped_writer, &skipped)?;
                        skipped_writer.write_all(b"\n")?;
                        summary.skipped += 1;
                    }
                }
            }
        }

        stats_writer.flush()?;
        skipped_writer.flush()?;
        Ok(summary)
    });

    let indices: Vec<usize> = (0..total).collect();
    let batch_size = args.batch_size.max(1);
    indices
        .par_chunks(batch_size)
        .for_each_with(tx.clone(), |tx, chunk| {
            let batch: Vec<ReportLine> = chunk
                .iter()
                .map(|&idx| match rankings.stats_at(idx) {
                    Ok(stats) => ReportLine::Stats(Box::new(stats)),
                    Err(e) => {
                        let author = rankings.tallies()[idx].author;
                        ReportLine::Skipped(SkippedAuthor {
                            enid: author.enid,
                            name: author.display_name(),
                            error: e.to_string(),
                        })
                    }
                })
                .collect();
            progress.inc(batch.len() as u64);
            let _ = tx.send(batch);
        });

    drop(tx);
    let summary = writer_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Report writer thread panicked"))??;
    progress.finish();

    info!(
        "Wrote stats for {} authors, skipped {}",
        summary.written, summary.skipped
    );
    info!("Output: {}", args.output.display());

    Ok(summary)
}

//! Statistics over the publication corpus: per-year supplementary counts,
//! author rankings, contribution histograms and link export.
//!
//! Every operation reads fresh data from the [`Store`] and recomputes from
//! scratch; nothing is cached between calls.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StatsError};
use crate::store::Store;
use crate::taxonomy::classify;
use crate::{ExportedLink, Publication};

pub mod annual;
pub mod chart;
pub mod counter;
pub mod histogram;
pub mod matcher;
pub mod ranking;
pub mod resolver;

pub use chart::{AnnualChart, Bin, ChartSeries, HistogramChart, HistogramSeries, ScatterPoint, ScatterSeries};
pub use matcher::{AuthorIndex, NamePattern};
pub use ranking::{AuthorStats, CategoryStats, RankEntry, Rankings};

pub const DEFAULT_MAX_BINS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsConfig {
    /// First day of the aggregation window (inclusive)
    pub since: NaiveDate,
    pub max_bins: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            since: NaiveDate::from_ymd_opt(2018, 1, 1).unwrap_or_default(),
            max_bins: DEFAULT_MAX_BINS,
        }
    }
}

impl StatsConfig {
    pub fn with_since(mut self, since: Option<NaiveDate>) -> Self {
        if let Some(since) = since {
            self.since = since;
        }
        self
    }

    pub fn in_window(&self, publication: &Publication) -> bool {
        publication
            .published_on()
            .is_some_and(|date| date >= self.since)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabStats {
    pub publications: usize,
    pub citations: u64,
}

pub struct StatsService {
    store: Store,
    config: StatsConfig,
}

impl StatsService {
    pub fn new(store: Store, config: StatsConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    /// Publication count and citation sum for publications whose author
    /// field mentions `lab`.
    pub async fn lab_stats(&self, lab: &str) -> Result<LabStats> {
        let pattern = NamePattern::new(lab)?;
        let publications = self.store.publications().await?;
        let matched = pattern.select(&publications);

        Ok(LabStats {
            publications: matched.len(),
            citations: matched.iter().map(|p| p.citations).sum(),
        })
    }

    pub async fn institution_annual_supplementary(&self) -> Result<AnnualChart> {
        let publications = self.store.publications().await?;
        Ok(annual::aggregate(&publications, &self.config))
    }

    pub async fn author_annual_supplementary(&self, email: &str) -> Result<AnnualChart> {
        let author = resolver::resolve_by_email(&self.store, email).await?;
        let pattern = NamePattern::for_author(&author)?;
        let publications = self.store.publications().await?;
        let matched = pattern.select(&publications);
        debug!("{} matched {} publications", pattern.name(), matched.len());

        Ok(annual::aggregate(matched, &self.config))
    }

    pub async fn author_stats(&self, enid: u64) -> Result<AuthorStats> {
        let corpus = self.store.corpus().await?;
        let index = AuthorIndex::build(&corpus.authors, &corpus.publications)?;
        let rankings = Rankings::compute(&index, &self.config);
        let stats = rankings.author_stats(enid)?;

        info!(
            "Computed stats for {} over {} authors",
            stats.author.name,
            rankings.total_authors()
        );
        Ok(stats)
    }

    pub async fn author_histogram(&self, enid: u64) -> Result<HistogramChart> {
        let corpus = self.store.corpus().await?;
        if resolver::find_by_enid(&corpus.authors, enid).is_none() {
            return Err(StatsError::AuthorNotFound(enid.to_string()));
        }

        let index = AuthorIndex::build(&corpus.authors, &corpus.publications)?;
        let rankings = Rankings::compute(&index, &self.config);

        Ok(histogram::author_histogram(
            &rankings.contributions_map(),
            enid,
            self.config.max_bins,
        ))
    }

    /// Every link of every supplementary category across the author's
    /// publications, regardless of date.
    pub async fn export_author_links(&self, enid: u64) -> Result<Vec<ExportedLink>> {
        let author = resolver::resolve_by_enid(&self.store, enid).await?;
        let pattern = NamePattern::for_author(&author)?;
        let publications = self.store.publications().await?;
        let scientist = author.display_name();

        Ok(pattern
            .select(&publications)
            .into_iter()
            .flat_map(|publication| flatten_links(publication, &scientist))
            .collect())
    }
}

pub fn flatten_links(publication: &Publication, scientist: &str) -> Vec<ExportedLink> {
    let mut links = Vec::new();
    for (category, subcategories) in &publication.supplementary {
        for (subcategory, values) in subcategories {
            let resource_type = classify(category, subcategory)
                .map(|t| t.name().to_string())
                .unwrap_or_else(|| category.clone());

            for link in values {
                links.push(ExportedLink {
                    link: link.clone(),
                    resource_type: resource_type.clone(),
                    resource: subcategory.clone(),
                    publication_title: publication.name.clone(),
                    publication_doi: publication.doi.clone(),
                    date: publication.date.clone(),
                    scientist: scientist.to_string(),
                });
            }
        }
    }
    links
}

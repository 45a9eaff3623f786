use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::chart::{ScatterPoint, ScatterSeries};
use super::histogram::ContributionsMap;
use super::matcher::AuthorIndex;
use super::{counter, StatsConfig};
use crate::error::{Result, StatsError};
use crate::taxonomy::{ResourceType, HIGHLIGHT_COLOR};
use crate::Author;

const TYPE_COUNT: usize = ResourceType::ALL.len();
const USER_RADIUS: u32 = 8;
const DEFAULT_RADIUS: u32 = 4;
const ANONYMOUS_LABEL: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub enid: u64,
    pub name: String,
    pub contributions: u64,
    pub rank: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub enid: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub author_contributions: u64,
    /// Sum over every author in the population
    pub total_contributions: u64,
    pub rank: usize,
    pub total_authors: usize,
    /// "Top X%": ceil(rank / totalAuthors * 100)
    pub percentage: u32,
    /// ceil(authorContributions / totalPublications * 100); absent when the
    /// author has no contribution of this type
    pub open_science_percentage: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStats {
    pub author: AuthorSummary,
    pub total_citations: u64,
    pub total_publications: usize,
    pub category_stats: BTreeMap<ResourceType, CategoryStats>,
    pub platform_rankings: BTreeMap<ResourceType, Vec<RankEntry>>,
    pub scatter_data: Vec<ScatterSeries>,
}

/// Per-author totals over the publications inside the window.
#[derive(Debug, Clone)]
pub struct AuthorTally<'a> {
    pub author: &'a Author,
    pub publications: usize,
    pub citations: u64,
    pub counts: [u64; TYPE_COUNT],
}

/// Ranking of the whole author population, one ordering per resource type.
pub struct Rankings<'a> {
    tallies: Vec<AuthorTally<'a>>,
    totals: [u64; TYPE_COUNT],
    /// Per type: tally indices, best first
    order: [Vec<usize>; TYPE_COUNT],
    /// Per type: 1-based rank of each tally
    ranks: [Vec<usize>; TYPE_COUNT],
}

impl<'a> Rankings<'a> {
    pub fn compute(index: &AuthorIndex<'a>, config: &StatsConfig) -> Self {
        let tallies: Vec<AuthorTally<'a>> = index
            .iter()
            .map(|(author, publications)| {
                let in_window: Vec<_> = publications
                    .iter()
                    .copied()
                    .filter(|p| config.in_window(p))
                    .collect();
                AuthorTally {
                    author,
                    publications: in_window.len(),
                    citations: in_window.iter().map(|p| p.citations).sum(),
                    counts: counter::tally(in_window.iter().copied()),
                }
            })
            .collect();

        let mut totals = [0u64; TYPE_COUNT];
        for tally in &tallies {
            for (total, count) in totals.iter_mut().zip(tally.counts) {
                *total += count;
            }
        }

        let order: [Vec<usize>; TYPE_COUNT] = std::array::from_fn(|t| {
            let mut order: Vec<usize> = (0..tallies.len()).collect();
            // Stable: equal counts keep author iteration order, ranks are never shared
            order.sort_by(|&a, &b| tallies[b].counts[t].cmp(&tallies[a].counts[t]));
            order
        });

        let ranks: [Vec<usize>; TYPE_COUNT] = std::array::from_fn(|t| {
            let mut ranks = vec![0; tallies.len()];
            for (position, &idx) in order[t].iter().enumerate() {
                ranks[idx] = position + 1;
            }
            ranks
        });

        debug!("Ranked {} authors across {} types", tallies.len(), TYPE_COUNT);

        Self {
            tallies,
            totals,
            order,
            ranks,
        }
    }

    pub fn tallies(&self) -> &[AuthorTally<'a>] {
        &self.tallies
    }

    pub fn total_authors(&self) -> usize {
        self.tallies.len()
    }

    pub fn total_contributions(&self, resource_type: ResourceType) -> u64 {
        self.totals[resource_type.index()]
    }

    /// Authors sorted by contributions of `resource_type`, best first.
    pub fn ranking(&self, resource_type: ResourceType) -> Vec<RankEntry> {
        let t = resource_type.index();
        self.order[t]
            .iter()
            .enumerate()
            .map(|(position, &idx)| {
                let tally = &self.tallies[idx];
                RankEntry {
                    enid: tally.author.enid,
                    name: tally.author.display_name(),
                    contributions: tally.counts[t],
                    rank: position + 1,
                }
            })
            .collect()
    }

    pub fn contributions_map(&self) -> ContributionsMap {
        ResourceType::ALL
            .iter()
            .map(|rt| {
                let per_author = self
                    .tallies
                    .iter()
                    .map(|tally| (tally.author.enid, tally.counts[rt.index()]))
                    .collect();
                (*rt, per_author)
            })
            .collect()
    }

    fn position_of(&self, enid: u64) -> Option<usize> {
        self.tallies.iter().position(|t| t.author.enid == enid)
    }

    pub fn author_stats(&self, enid: u64) -> Result<AuthorStats> {
        let idx = self
            .position_of(enid)
            .ok_or_else(|| StatsError::AuthorNotFound(enid.to_string()))?;
        self.stats_at(idx)
    }

    pub(crate) fn stats_at(&self, idx: usize) -> Result<AuthorStats> {
        let tally = &self.tallies[idx];
        if tally.publications == 0 {
            return Err(StatsError::NoContributions {
                enid: tally.author.enid,
            });
        }

        let total_authors = self.total_authors();
        let mut category_stats = BTreeMap::new();
        let mut platform_rankings = BTreeMap::new();
        let mut scatter_data = Vec::with_capacity(TYPE_COUNT);

        for rt in ResourceType::ALL {
            let t = rt.index();
            let author_contributions = tally.counts[t];
            let rank = self.ranks[t][idx];

            category_stats.insert(
                rt,
                CategoryStats {
                    author_contributions,
                    total_contributions: self.totals[t],
                    rank,
                    total_authors,
                    percentage: ceil_percent(rank as u64, total_authors as u64),
                    open_science_percentage: (author_contributions > 0).then(|| {
                        ceil_percent(author_contributions, tally.publications as u64)
                    }),
                },
            );

            let ranking = self.ranking(rt);
            scatter_data.push(scatter_series(rt, &ranking, tally.author));
            platform_rankings.insert(rt, ranking);
        }

        Ok(AuthorStats {
            author: AuthorSummary {
                enid: tally.author.enid,
                name: tally.author.display_name(),
                email: tally.author.email.clone(),
            },
            total_citations: tally.citations,
            total_publications: tally.publications,
            category_stats,
            platform_rankings,
            scatter_data,
        })
    }
}

/// Rank vs contributions, one point per author. Only the queried author's
/// point carries a name.
fn scatter_series(rt: ResourceType, ranking: &[RankEntry], target: &Author) -> ScatterSeries {
    let data = ranking
        .iter()
        .map(|entry| {
            let is_user = entry.enid == target.enid;
            ScatterPoint {
                x: entry.rank,
                y: entry.contributions,
                label: if is_user {
                    entry.name.clone()
                } else {
                    ANONYMOUS_LABEL.to_string()
                },
                is_user,
                radius: if is_user { USER_RADIUS } else { DEFAULT_RADIUS },
                color: if is_user { HIGHLIGHT_COLOR } else { rt.color() }.to_string(),
            }
        })
        .collect();

    ScatterSeries {
        label: rt,
        data,
        background_color: rt.color().to_string(),
    }
}

/// ceil(numerator / denominator * 100) in integer arithmetic.
fn ceil_percent(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    (numerator * 100).div_ceil(denominator) as u32
}

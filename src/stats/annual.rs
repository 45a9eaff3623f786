use chrono::Datelike;
use std::collections::BTreeMap;
use tracing::debug;

use super::chart::{AnnualChart, ChartSeries};
use super::counter;
use super::StatsConfig;
use crate::taxonomy::ResourceType;
use crate::Publication;

/// Year x type contribution matrix for publications inside the window.
/// Publications without a parseable date are skipped.
pub fn aggregate<'a, I>(publications: I, config: &StatsConfig) -> AnnualChart
where
    I: IntoIterator<Item = &'a Publication>,
{
    let mut by_year: BTreeMap<i32, [u64; ResourceType::ALL.len()]> = BTreeMap::new();
    let mut skipped = 0usize;
    let mut before_window = 0usize;

    for publication in publications {
        let Some(date) = publication.published_on() else {
            skipped += 1;
            continue;
        };
        if date < config.since {
            before_window += 1;
            continue;
        }

        let counts = by_year
            .entry(date.year())
            .or_insert([0; ResourceType::ALL.len()]);
        for (slot, t) in counts.iter_mut().zip(ResourceType::ALL) {
            if counter::contains(publication, t) {
                *slot += 1;
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} publications with unparseable dates", skipped);
    }
    if before_window > 0 {
        debug!(
            "Excluded {} publications dated before {}",
            before_window, config.since
        );
    }

    let labels = by_year.keys().map(|y| y.to_string()).collect();
    let datasets = ResourceType::ALL
        .iter()
        .map(|t| ChartSeries {
            label: *t,
            data: by_year.values().map(|counts| counts[t.index()]).collect(),
            background_color: t.color().to_string(),
        })
        .collect();

    AnnualChart { labels, datasets }
}

use std::collections::BTreeMap;

use super::chart::{Bin, HistogramChart, HistogramSeries};
use crate::taxonomy::ResourceType;

/// `authorContributionsMap`: type -> ENID -> contribution count
pub type ContributionsMap = BTreeMap<ResourceType, BTreeMap<u64, u64>>;

/// Equal-width bins over `[0, max]`. At most `max_bins` bins, and never more
/// than `max + 1`, so sparse counts collapse to fewer bins. A count equal to
/// the upper edge is clamped into the last bin.
pub fn bin_counts<I>(counts: I, target: u64, max_bins: usize) -> (Vec<Bin>, u64)
where
    I: IntoIterator<Item = u64>,
    I::IntoIter: Clone,
{
    let counts = counts.into_iter();
    let max_contribution = counts.clone().max().unwrap_or(0);

    let bin_count = (max_bins.max(1) as u64).min(max_contribution + 1);
    let bin_size = max_contribution.div_ceil(bin_count).max(1);
    let index_of = |count: u64| (count / bin_size).min(bin_count - 1) as usize;

    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| {
            let start = i * bin_size;
            let end = (i + 1) * bin_size - 1;
            Bin {
                start,
                end,
                count: 0,
                is_user_bin: false,
                label: format!("{}-{}", start, end),
            }
        })
        .collect();

    for count in counts {
        bins[index_of(count)].count += 1;
    }
    bins[index_of(target)].is_user_bin = true;

    (bins, max_contribution)
}

/// One histogram per resource type for the author `enid`. An author absent
/// from a type's map is binned with a count of 0.
pub fn author_histogram(contributions: &ContributionsMap, enid: u64, max_bins: usize) -> HistogramChart {
    let empty = BTreeMap::new();
    let datasets = ResourceType::ALL
        .iter()
        .map(|t| {
            let per_author = contributions.get(t).unwrap_or(&empty);
            let user_contribution = per_author.get(&enid).copied().unwrap_or(0);
            let (bins, max_contribution) =
                bin_counts(per_author.values().copied(), user_contribution, max_bins);

            HistogramSeries {
                label: *t,
                bins,
                user_contribution,
                max_contribution,
                background_color: t.color().to_string(),
            }
        })
        .collect();

    HistogramChart { datasets }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_counts_collapse_to_one_bin() {
        let (bins, max) = bin_counts(vec![0; 30], 0, 10);

        assert_eq!(max, 0);
        assert_eq!(bins.len(), 1);
        assert_eq!(bins[0].label, "0-0");
        assert_eq!(bins[0].count, 30);
        assert!(bins[0].is_user_bin);
    }

    #[test]
    fn sparse_counts_use_unit_bins() {
        let (bins, max) = bin_counts(vec![0, 1, 1, 5], 1, 10);

        assert_eq!(max, 5);
        assert_eq!(bins.len(), 6);
        assert!(bins.iter().all(|b| b.end == b.start));
        assert_eq!(bins[1].count, 2);
        assert_eq!(bins[5].count, 1);
        assert!(bins[1].is_user_bin);
        assert_eq!(bins.iter().filter(|b| b.is_user_bin).count(), 1);
    }

    #[test]
    fn wide_range_uses_ten_bins() {
        let counts = vec![0, 3, 7, 12, 25];
        let (bins, max) = bin_counts(counts.clone(), 25, 10);

        assert_eq!(max, 25);
        assert_eq!(bins.len(), 10);
        assert_eq!((bins[0].start, bins[0].end), (0, 2));
        assert_eq!((bins[9].start, bins[9].end), (27, 29));
        assert_eq!(bins.iter().map(|b| b.count).sum::<u64>(), counts.len() as u64);
        assert!(bins[8].is_user_bin);
    }

    #[test]
    fn max_count_is_clamped_into_last_bin() {
        let (bins, _) = bin_counts(vec![0, 10], 10, 10);

        assert_eq!(bins.len(), 10);
        assert_eq!(bins[9].label, "9-9");
        assert_eq!(bins[9].count, 1);
        assert!(bins[9].is_user_bin);
    }

    #[test]
    fn histogram_covers_every_author() {
        let mut contributions = ContributionsMap::new();
        let code = contributions.entry(ResourceType::Code).or_default();
        for enid in 1..=12u64 {
            code.insert(enid, enid % 4);
        }

        let chart = author_histogram(&contributions, 3, 10);

        assert_eq!(chart.datasets.len(), ResourceType::ALL.len());
        let series = &chart.datasets[ResourceType::Code.index()];
        assert_eq!(series.user_contribution, 3);
        assert_eq!(series.max_contribution, 3);
        assert_eq!(series.bins.iter().map(|b| b.count).sum::<u64>(), 12);

        let data = &chart.datasets[ResourceType::Data.index()];
        assert_eq!(data.bins.len(), 1);
        assert_eq!(data.bins[0].count, 0);
    }
}

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::types::{KeyMode, ListingFailure, PartialMap, StatsMap, TallyReport, TallyTotals};

/// Folds partial maps into the global map for one run
///
/// Owned by the thread that joins the workers; `merge` takes `&mut self`, so
/// the global map is never touched concurrently.
#[derive(Debug, Default)]
pub struct Aggregator {
    global: StatsMap,
    directories_merged: AtomicU64,
    failures: Vec<ListingFailure>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one worker's partial map into the global map
    pub fn merge(&mut self, partial: PartialMap) {
        let merged = partial.len() as u64;

        for (key, stats) in &partial.directories {
            self.global.entry(key.clone()).or_default().absorb(stats);
        }
        self.failures.extend(partial.failures);

        self.directories_merged.fetch_add(merged, Ordering::Relaxed);
    }

    pub fn global(&self) -> &StatsMap {
        &self.global
    }

    pub fn directories_merged(&self) -> u64 {
        self.directories_merged.load(Ordering::Relaxed)
    }

    pub fn totals(&self) -> TallyTotals {
        self.global.values().fold(
            TallyTotals {
                directories: self.directories_merged(),
                ..TallyTotals::default()
            },
            |mut totals, stats| {
                totals.files += stats.file_count;
                totals.bytes = totals.bytes.saturating_add(stats.total_bytes);
                totals
            },
        )
    }

    /// Close the run and hand the merged result to the reporter
    pub fn finish(
        self,
        root: PathBuf,
        key_mode: KeyMode,
        workers: usize,
        entries: usize,
        elapsed: Duration,
    ) -> TallyReport {
        let totals = self.totals();
        TallyReport {
            root,
            key_mode,
            directories: self.global,
            totals,
            failures: self.failures,
            workers,
            entries,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tally::types::DirectoryStats;

    fn partial(entries: &[(&str, u64, u64)]) -> PartialMap {
        PartialMap {
            directories: entries
                .iter()
                .map(|(key, files, bytes)| (key.to_string(), DirectoryStats::new(*files, *bytes)))
                .collect(),
            failures: Vec::new(),
        }
    }

    #[test]
    fn test_merge_sums_repeated_keys() {
        let mut aggregator = Aggregator::new();
        aggregator.merge(partial(&[("src", 2, 200), ("docs", 1, 10)]));
        aggregator.merge(partial(&[("src", 3, 50)]));

        assert_eq!(aggregator.global()["src"], DirectoryStats::new(5, 250));
        assert_eq!(aggregator.global()["docs"], DirectoryStats::new(1, 10));
    }

    #[test]
    fn test_counter_advances_by_partial_key_count() {
        let mut aggregator = Aggregator::new();
        aggregator.merge(partial(&[("a", 0, 0), ("b", 1, 1)]));
        aggregator.merge(partial(&[("a", 1, 1)]));
        aggregator.merge(PartialMap::default());

        // Keys are counted per partial map, so "a" counts twice
        assert_eq!(aggregator.directories_merged(), 3);
        assert_eq!(aggregator.global().len(), 2);
    }

    #[test]
    fn test_totals_and_failures_reach_the_report() {
        let mut aggregator = Aggregator::new();
        let mut with_failure = partial(&[("x", 4, 40)]);
        with_failure.failures.push(ListingFailure {
            directory: PathBuf::from("/r/x"),
            message: "denied".to_string(),
        });
        aggregator.merge(with_failure);
        aggregator.merge(partial(&[("y", 0, 0)]));

        let report = aggregator.finish(PathBuf::from("/r"), KeyMode::Name, 2, 9, Duration::ZERO);

        assert_eq!(
            report.totals,
            TallyTotals {
                files: 4,
                bytes: 40,
                directories: 2,
            }
        );
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.directories["y"], DirectoryStats::default());
    }
}

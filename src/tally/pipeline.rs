use std::cell::Cell;
use std::path::Path;
use std::time::Instant;

use crate::parallel::{ChunkExecutor, ChunkPlan};

use super::aggregator::Aggregator;
use super::collector::collect_entries;
use super::fs::{DirectoryLister, LocalFs};
use super::summarizer::summarize_chunk;
use super::types::{KeyMode, TallyReport};

/// Where a run currently is
///
/// ```text
/// Idle → Collecting → Partitioned → Summarizing → Merging → Reported
/// ```
///
/// There is no failure state: worker problems shrink their contribution but
/// every run reaches `Reported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Collecting,
    Partitioned,
    Summarizing,
    Merging,
    Reported,
}

/// The traversal and aggregation engine
///
/// Takes a root that is already known to be a directory, and produces a
/// [`TallyReport`]. Every call to [`Tally::run`] works on a fresh aggregator.
///
/// # Example
/// ```rust,no_run
/// use dirtally::tally::{KeyMode, Tally};
/// use std::path::Path;
///
/// let report = Tally::new(KeyMode::Name).run(Path::new("/var/log"));
/// println!("{} files, {} bytes", report.totals.files, report.totals.bytes);
/// ```
pub struct Tally<L = LocalFs> {
    key_mode: KeyMode,
    plan: ChunkPlan,
    executor: ChunkExecutor,
    lister: L,
    stage: Cell<Stage>,
}

impl Tally<LocalFs> {
    /// Engine over the local disk, sized to this machine
    pub fn new(key_mode: KeyMode) -> Self {
        Self::with_lister(key_mode, LocalFs)
    }
}

impl<L: DirectoryLister> Tally<L> {
    pub fn with_lister(key_mode: KeyMode, lister: L) -> Self {
        Self {
            key_mode,
            plan: ChunkPlan::detect(),
            executor: ChunkExecutor::default(),
            lister,
            stage: Cell::new(Stage::Idle),
        }
    }

    /// Override the detected hardware concurrency
    pub fn with_plan(mut self, plan: ChunkPlan) -> Self {
        self.plan = plan;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage.get()
    }

    fn advance(&self, next: Stage) {
        tracing::debug!("Tally stage {:?} -> {:?}", self.stage.get(), next);
        self.stage.set(next);
    }

    /// Collect, partition, summarize and merge everything below `root`
    pub fn run(&self, root: &Path) -> TallyReport {
        let start_time = Instant::now();

        self.advance(Stage::Collecting);
        let entries = collect_entries(root);

        self.advance(Stage::Partitioned);
        let chunks = self.plan.split(&entries);
        tracing::info!(
            "Tallying {} entries with {} workers (chunk size {})",
            entries.len(),
            chunks.len(),
            self.plan.chunk_size(entries.len())
        );

        self.advance(Stage::Summarizing);
        let mut aggregator = Aggregator::new();
        let key_mode = self.key_mode;
        let lister = &self.lister;

        self.executor.execute(
            chunks,
            |_worker_id, chunk: &[std::path::PathBuf]| summarize_chunk(chunk, root, key_mode, lister),
            |worker_id, partial| {
                if self.stage.get() != Stage::Merging {
                    self.advance(Stage::Merging);
                }
                tracing::trace!(
                    "Merging worker {} ({} directories, {} failures)",
                    worker_id,
                    partial.len(),
                    partial.failures.len()
                );
                aggregator.merge(partial);
            },
        );

        let report = aggregator.finish(
            root.to_path_buf(),
            key_mode,
            self.plan.workers(),
            entries.len(),
            start_time.elapsed(),
        );

        self.advance(Stage::Reported);
        report
    }
}

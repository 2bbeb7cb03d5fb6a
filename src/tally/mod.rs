//! Per-directory file counting over a whole tree
//!
//! A run walks the root once, splits the flat entry list into one chunk per
//! worker, lets each worker count the regular files directly inside the
//! directories of its chunk, and folds the per-worker maps into one global map.
//!
//! ```text
//! root ─▶ collector ─▶ entries ─▶ ChunkPlan ─▶ chunk 0 ─▶ summarizer ─┐
//!                                           ├▶ chunk 1 ─▶ summarizer ─┼▶ Aggregator ─▶ TallyReport
//!                                           └▶ chunk N ─▶ summarizer ─┘
//! ```

pub mod aggregator;
pub mod collector;
pub mod fs;
pub mod pipeline;
pub mod summarizer;
pub mod types;

// Re-export main types for easier access
pub use aggregator::Aggregator;
pub use collector::collect_entries;
pub use fs::{DirectoryLister, LocalFs};
pub use pipeline::{Stage, Tally};
pub use summarizer::summarize_chunk;
pub use types::{DirectoryStats, KeyMode, ListingFailure, PartialMap, StatsMap, TallyReport, TallyTotals};

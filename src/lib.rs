//! # dirtally - per-directory file counts, in parallel
//!
//! dirtally walks a directory tree once, splits the entries it found across
//! one worker thread per spare CPU core, and reports, for every directory
//! below the root, how many regular files it holds directly and how many
//! bytes they take.
//!
//! ## Quick Start
//!
//! ```bash
//! # Prompt for a root on stdin
//! dirtally
//!
//! # Or pass it directly
//! dirtally ~/projects --key-by path --format json
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use dirtally::tally::{KeyMode, Tally};
//! use std::path::Path;
//!
//! let report = Tally::new(KeyMode::Name).run(Path::new("src/"));
//! for (dir, stats) in report.non_empty() {
//!     println!("{dir}: {} files {} bytes", stats.file_count, stats.total_bytes);
//! }
//! ```
//!
//! ## Features
//!
//! - **Thread-per-chunk counting** with launch-order merging
//! - **Partial failure tolerance**: unreadable directories shrink the totals, never abort the run
//! - **Two key modes**: bare directory name, or path relative to the root
//! - **Layered configuration** via TOML files, environment and CLI flags

pub mod cli;
pub mod config;
pub mod parallel;
pub mod tally;

pub use cli::{Cli, Output};
pub use config::TallyConfig;

/// Result type alias for dirtally operations
pub type Result<T> = anyhow::Result<T>;

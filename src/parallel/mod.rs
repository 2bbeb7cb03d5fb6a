//! Chunked parallel execution
//!
//! This module owns the **system resource** side of a tally: how many workers
//! run, which slice of the work list each one gets, and how their results come
//! back. It knows nothing about directories or file sizes.
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Client        │    │   Parallel       │    │   System        │
//! │   (Tally)       │───▶│   Module         │───▶│   Resources     │
//! │                 │    │                  │    │                 │
//! │ • Entry list    │    │ • CPU cores      │    │ • Hardware      │
//! │ • Summarizing   │    │ • Chunking       │    │ • OS threads    │
//! │ • Merging       │    │ • Launch / join  │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use dirtally::parallel::{ChunkExecutor, ChunkPlan};
//!
//! let items: Vec<u64> = (1..=10).collect();
//! let plan = ChunkPlan::new(3);
//!
//! let mut total = 0;
//! ChunkExecutor::default().execute(
//!     plan.split(&items),
//!     |_worker_id, chunk: &[u64]| chunk.iter().sum::<u64>(),
//!     |_worker_id, partial| total += partial,
//! );
//! assert_eq!(total, 55);
//! ```

pub mod core;

// Re-export main types for easier access
pub use core::{ChunkExecutor, ChunkPlan};

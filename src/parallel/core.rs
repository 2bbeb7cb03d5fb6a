use crossbeam::thread::ScopedJoinHandle;
use std::ops::Range;

/// Static split of a fully materialized work list into one chunk per worker
///
/// # Algorithm
/// ```text
/// hardware_threads = max(1, detected cores)
/// workers          = max(1, hardware_threads - 1)
/// chunk_size       = total / hardware_threads        (floor)
/// chunk i          = [i * chunk_size, (i + 1) * chunk_size)
/// last chunk       = [(workers - 1) * chunk_size, total)
/// ```
///
/// The chunk size divides by the hardware thread count while only
/// `hardware_threads - 1` workers run, so the last chunk always picks up the
/// share of the missing worker plus the division remainder.
///
/// # Example
/// ```rust
/// use dirtally::parallel::ChunkPlan;
///
/// let plan = ChunkPlan::new(4);
/// assert_eq!(plan.workers(), 3);
/// assert_eq!(plan.ranges(10), vec![0..2, 2..4, 4..10]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    hardware_threads: usize,
    workers: usize,
}

impl ChunkPlan {
    pub fn new(hardware_threads: usize) -> Self {
        let hardware_threads = hardware_threads.max(1);
        // A single core still gets one worker; zero workers would drop every entry
        let workers = hardware_threads.saturating_sub(1).max(1);
        Self {
            hardware_threads,
            workers,
        }
    }

    /// Plan from the number of logical CPUs on this machine
    pub fn detect() -> Self {
        Self::new(num_cpus::get())
    }

    pub fn hardware_threads(&self) -> usize {
        self.hardware_threads
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn chunk_size(&self, total: usize) -> usize {
        total / self.hardware_threads
    }

    /// Exactly `workers()` contiguous ranges covering `0..total`
    pub fn ranges(&self, total: usize) -> Vec<Range<usize>> {
        let chunk_size = self.chunk_size(total);
        (0..self.workers)
            .map(|index| {
                let start = index * chunk_size;
                let end = if index + 1 == self.workers {
                    total
                } else {
                    start + chunk_size
                };
                start..end
            })
            .collect()
    }

    /// Borrow `items` as one slice per worker
    pub fn split<'a, T>(&self, items: &'a [T]) -> Vec<&'a [T]> {
        self.ranges(items.len())
            .into_iter()
            .map(|range| &items[range])
            .collect()
    }
}

/// One launched worker, or the stand-in for a worker that never started
pub(crate) enum WorkerSlot<'scope, R> {
    Running(ScopedJoinHandle<'scope, R>),
    Fallback,
}

impl<R: Default> WorkerSlot<'_, R> {
    /// Block until the worker is done; panics and launch failures yield `R::default()`
    pub(crate) fn join(self, worker_id: usize) -> R {
        match self {
            WorkerSlot::Running(handle) => handle.join().unwrap_or_else(|_| {
                tracing::error!("Worker {} panicked; its chunk contributes nothing", worker_id);
                R::default()
            }),
            WorkerSlot::Fallback => R::default(),
        }
    }
}

/// Thread-per-chunk executor: launch everything, then join in launch order
///
/// Unlike a pooled executor there is no work queue. Every chunk gets its own
/// thread, all threads start before the first join, and results are handed
/// back one at a time in the order the threads were launched. A slow first
/// worker therefore holds back already finished later ones.
#[derive(Debug, Clone)]
pub struct ChunkExecutor {
    thread_prefix: String,
}

impl Default for ChunkExecutor {
    fn default() -> Self {
        Self::new("dirtally-worker")
    }
}

impl ChunkExecutor {
    pub fn new(thread_prefix: impl Into<String>) -> Self {
        Self {
            thread_prefix: thread_prefix.into(),
        }
    }

    /// Run `worker` once per chunk in parallel and pass each result to `on_joined`
    ///
    /// `on_joined` runs on the calling thread, strictly sequentially, with the
    /// worker index and its result. It is called exactly once per chunk, even
    /// when a thread cannot be spawned or panics.
    pub fn execute<T, R, F, J>(&self, chunks: Vec<&[T]>, worker: F, mut on_joined: J)
    where
        T: Sync,
        R: Send + Default,
        F: Fn(usize, &[T]) -> R + Sync,
        J: FnMut(usize, R),
    {
        let worker = &worker;

        let outcome = crossbeam::thread::scope(|s| {
            let mut slots = Vec::with_capacity(chunks.len());

            for (worker_id, chunk) in chunks.iter().copied().enumerate() {
                let spawned = s
                    .builder()
                    .name(format!("{}-{}", self.thread_prefix, worker_id))
                    .spawn(move |_| worker(worker_id, chunk));

                match spawned {
                    Ok(handle) => slots.push(WorkerSlot::Running(handle)),
                    Err(e) => {
                        tracing::error!("Failed to launch worker {}: {}", worker_id, e);
                        slots.push(WorkerSlot::Fallback);
                    }
                }
            }

            tracing::debug!("Launched {} workers", slots.len());

            for (worker_id, slot) in slots.into_iter().enumerate() {
                on_joined(worker_id, slot.join(worker_id));
            }
        });

        if outcome.is_err() {
            // Every handle is joined above, so this only fires if joining itself went wrong
            tracing::error!("Worker scope reported an unjoined panic");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_worker_count_leaves_one_core_free() {
        assert_eq!(ChunkPlan::new(8).workers(), 7);
        assert_eq!(ChunkPlan::new(2).workers(), 1);
    }

    #[test]
    fn test_single_core_still_gets_one_worker() {
        let plan = ChunkPlan::new(1);
        assert_eq!(plan.workers(), 1);
        assert_eq!(plan.ranges(5), vec![0..5]);
    }

    #[test]
    fn test_zero_reported_cores_is_treated_as_one() {
        let plan = ChunkPlan::new(0);
        assert_eq!(plan.hardware_threads(), 1);
        assert_eq!(plan.workers(), 1);
    }

    #[test]
    fn test_last_chunk_absorbs_remainder() {
        let plan = ChunkPlan::new(4);
        assert_eq!(plan.chunk_size(11), 2);
        assert_eq!(plan.ranges(11), vec![0..2, 2..4, 4..11]);
    }

    #[test]
    fn test_fewer_entries_than_threads_gives_empty_chunks() {
        let plan = ChunkPlan::new(8);
        let ranges = plan.ranges(3);
        assert_eq!(ranges.len(), 7);
        assert!(ranges[..6].iter().all(|r| r.is_empty()));
        assert_eq!(ranges[6], 0..3);
    }

    #[test]
    fn test_no_entries_gives_empty_in_range_chunks() {
        let plan = ChunkPlan::new(6);
        let ranges = plan.ranges(0);
        assert_eq!(ranges.len(), 5);
        assert!(ranges.iter().all(|r| *r == (0..0)));
    }

    #[test]
    fn test_chunks_concatenate_to_original() {
        let items: Vec<usize> = (0..97).collect();
        for threads in 1..=16 {
            let plan = ChunkPlan::new(threads);
            let chunks = plan.split(&items);
            assert_eq!(chunks.len(), plan.workers());
            let rebuilt: Vec<usize> = chunks.concat();
            assert_eq!(rebuilt, items, "threads = {}", threads);
        }
    }

    #[test]
    fn test_results_are_joined_in_launch_order() {
        let items: Vec<u64> = vec![30, 1, 15, 0];
        let chunks: Vec<&[u64]> = items.chunks(1).collect();
        let mut joined = Vec::new();

        ChunkExecutor::default().execute(
            chunks,
            |_worker_id, chunk: &[u64]| {
                // Earlier workers sleep longer, so finish order differs from launch order
                std::thread::sleep(Duration::from_millis(chunk[0]));
                chunk[0]
            },
            |worker_id, result| joined.push((worker_id, result)),
        );

        assert_eq!(joined, vec![(0, 30), (1, 1), (2, 15), (3, 0)]);
    }

    #[test]
    fn test_panicking_worker_contributes_default() {
        let items: Vec<u32> = (1..=6).collect();
        let chunks: Vec<&[u32]> = items.chunks(2).collect();
        let mut joined = Vec::new();

        ChunkExecutor::new("test-worker").execute(
            chunks,
            |worker_id, chunk: &[u32]| {
                if worker_id == 1 {
                    panic!("worker failure");
                }
                chunk.iter().sum::<u32>()
            },
            |worker_id, result| joined.push((worker_id, result)),
        );

        assert_eq!(joined, vec![(0, 3), (1, 0), (2, 11)]);
    }

    #[test]
    fn test_fallback_slot_yields_default() {
        let slot: WorkerSlot<'static, Vec<u8>> = WorkerSlot::Fallback;
        assert!(slot.join(0).is_empty());
    }
}

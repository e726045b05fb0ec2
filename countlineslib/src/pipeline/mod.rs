//! The concurrent counting pipeline.
//!
//! ```text
//! Walker ──► work queue ──► Worker 0 ─┐
//!                      ├──► Worker 1 ─┼──► results queue ──► Aggregator
//!                      └──► Worker N ─┘
//! ```
//!
//! Both queues are bounded, so a slow aggregator throttles the workers and
//! the workers throttle the walker. Shutdown follows the queues: the walker
//! drops the work sender when traversal ends, workers exit once the work
//! queue is closed and empty, and the results queue closes when the last
//! worker drops its sender. The aggregator runs on the calling thread.

pub mod aggregate;
pub mod pool;

use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::bounded;
use tracing::{info, warn};

use crate::cancel::CancelToken;
use crate::error::CountlinesError;
use crate::source::{walk, FilterConfig, FilterSummary, Walker};
use crate::stats::{CountResult, FileRecord};
use crate::Result;

pub use aggregate::{Aggregate, Aggregator};
pub use pool::WorkerStats;

use pool::WorkerPool;

/// Default capacity of each queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Options for one counting run.
#[derive(Debug, Clone)]
pub struct CountOptions {
    /// Include/exclude rules
    pub filter: FilterConfig,
    /// Worker count; `None` uses the number of logical CPUs
    pub jobs: Option<usize>,
    /// Capacity of the work and results queues
    pub queue_capacity: usize,
    /// Stop flag observed by the walker
    pub cancel: CancelToken,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            filter: FilterConfig::new(),
            jobs: None,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            cancel: CancelToken::new(),
        }
    }
}

impl CountOptions {
    /// Create new default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set file filter.
    pub fn filter(mut self, filter: FilterConfig) -> Self {
        self.filter = filter;
        self
    }

    /// Set worker count.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    /// Set queue capacity (minimum 1).
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Share a cancellation token with the run.
    pub fn cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Effective worker count.
    pub fn worker_count(&self) -> usize {
        self.jobs.unwrap_or_else(num_cpus::get).max(1)
    }
}

/// Count every file below `root` accepted by the options' filter.
///
/// # Example
///
/// ```rust
/// use countlineslib::{count_directory, CountOptions, FilterConfig};
/// use std::fs;
/// use tempfile::tempdir;
///
/// let dir = tempdir().unwrap();
/// fs::write(dir.path().join("a.go"), "package a\n\nfunc A() {}\n").unwrap();
/// fs::write(dir.path().join("Makefile"), "all:\n\tgo build\n").unwrap();
///
/// let result = count_directory(dir.path(), &CountOptions::new()).unwrap();
/// assert_eq!(result.totals.files, 2);
/// assert_eq!(result.totals.lines, 5);
/// assert_eq!(result.bucket(".go").unwrap().lines, 3);
/// ```
pub fn count_directory(root: impl AsRef<Path>, options: &CountOptions) -> Result<CountResult> {
    count_directory_with_progress(root, options, |_: &Path, _: u64| {})
}

/// Like [`count_directory`], calling `progress` from the worker threads with
/// each counted file's path (relative to `root`) and line count.
pub fn count_directory_with_progress<P>(
    root: impl AsRef<Path>,
    options: &CountOptions,
    progress: P,
) -> Result<CountResult>
where
    P: Fn(&Path, u64) + Sync,
{
    let root = root.as_ref();
    if !root.exists() {
        return Err(CountlinesError::PathNotFound(root.to_path_buf()));
    }

    let jobs = options.worker_count();
    info!(root = %root.display(), workers = jobs, "counting lines");

    let (work_tx, work_rx) = bounded::<PathBuf>(options.queue_capacity);
    let (result_tx, result_rx) = bounded::<FileRecord>(options.queue_capacity);
    let walker = Walker::new(root, options.filter.clone());
    let cancel = &options.cancel;
    let progress = &progress;

    let (aggregate, walk_stats, worker_stats) = thread::scope(|scope| -> Result<_> {
        let walk_handle = thread::Builder::new()
            .name("countlines-walker".to_string())
            .spawn_scoped(scope, move || walk(walker, work_tx, cancel))?;
        let pool = WorkerPool::spawn(scope, jobs, root, work_rx, result_tx, progress)?;

        let mut aggregator = Aggregator::new();
        aggregator.consume(&result_rx);

        let walk_stats = walk_handle
            .join()
            .map_err(|_| CountlinesError::WorkerPanicked("countlines-walker".to_string()))?;
        let worker_stats = pool.join()?;
        Ok((aggregator.finish(), walk_stats, worker_stats))
    })?;

    let mut result = CountResult::new(root);
    result.totals = aggregate.totals;
    result.buckets = aggregate.buckets;
    result.duplicates = aggregate.duplicates;
    result.skipped = worker_stats.failed;
    result.walk = walk_stats;
    result.workers = jobs;
    result.filter = FilterSummary::from(&options.filter);
    result.cancelled = cancel.is_cancelled();

    if result.cancelled {
        warn!(
            files = result.totals.files,
            "run cancelled, totals are partial"
        );
    }
    info!(
        files = result.totals.files,
        lines = result.totals.lines,
        skipped = result.skipped,
        "counting finished"
    );

    Ok(result)
}

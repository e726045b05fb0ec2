//! Fixed pool of counting workers.
//!
//! Every worker pulls paths from the shared work queue until it is closed and
//! drained, counts each file, and pushes a [`FileRecord`] to the results
//! queue. Each worker owns one results sender, so the results queue closes
//! by itself once the last worker exits.

use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::thread::{self, Scope, ScopedJoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::debug;

use crate::counter::count_lines;
use crate::error::CountlinesError;
use crate::stats::FileRecord;
use crate::Result;

/// Per-worker counters, summed over the pool on join.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Files counted and forwarded
    pub counted: u64,
    /// Files that could not be opened or read
    pub failed: u64,
}

impl AddAssign for WorkerStats {
    fn add_assign(&mut self, other: Self) {
        self.counted += other.counted;
        self.failed += other.failed;
    }
}

/// Running workers inside a thread scope.
pub(crate) struct WorkerPool<'scope> {
    handles: Vec<ScopedJoinHandle<'scope, WorkerStats>>,
}

impl<'scope> WorkerPool<'scope> {
    /// Start `size` workers (at least one).
    ///
    /// `work_rx` and `result_tx` are cloned into every worker and the
    /// originals are dropped before this returns.
    pub(crate) fn spawn<'env, P>(
        scope: &'scope Scope<'scope, 'env>,
        size: usize,
        root: &'env Path,
        work_rx: Receiver<PathBuf>,
        result_tx: Sender<FileRecord>,
        progress: &'env P,
    ) -> Result<Self>
    where
        P: Fn(&Path, u64) + Sync,
    {
        let size = size.max(1);
        let mut handles = Vec::with_capacity(size);

        for id in 0..size {
            let work_rx = work_rx.clone();
            let result_tx = result_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("countlines-worker-{id}"))
                .spawn_scoped(scope, move || {
                    worker_loop(root, &work_rx, &result_tx, progress)
                })?;
            handles.push(handle);
        }

        Ok(Self { handles })
    }

    pub(crate) fn size(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker and sum their counters.
    pub(crate) fn join(self) -> Result<WorkerStats> {
        let mut total = WorkerStats::default();
        for handle in self.handles {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            total += handle
                .join()
                .map_err(|_| CountlinesError::WorkerPanicked(name))?;
        }
        Ok(total)
    }
}

fn worker_loop<P>(
    root: &Path,
    work_rx: &Receiver<PathBuf>,
    result_tx: &Sender<FileRecord>,
    progress: &P,
) -> WorkerStats
where
    P: Fn(&Path, u64),
{
    let mut stats = WorkerStats::default();

    for path in work_rx.iter() {
        match count_lines(&path) {
            Ok(lines) => {
                progress(relative_to(&path, root), lines);
                if result_tx.send(FileRecord::new(path, lines)).is_err() {
                    debug!("results queue closed, worker exiting");
                    break;
                }
                stats.counted += 1;
            }
            Err(e) => {
                debug!(error = %e, "skipping unreadable file");
                stats.failed += 1;
            }
        }
    }

    stats
}

/// `path` relative to `root`, or `path` itself when it is not below `root`.
pub(crate) fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel,
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::tempdir;

    #[test]
    fn test_relative_to() {
        let root = Path::new("/repo");

        assert_eq!(relative_to(Path::new("/repo/src/a.rs"), root), Path::new("src/a.rs"));
        assert_eq!(relative_to(Path::new("/other/b.rs"), root), Path::new("/other/b.rs"));
        assert_eq!(relative_to(Path::new("/repo"), root), Path::new("/repo"));
    }

    #[test]
    fn test_pool_counts_and_skips() {
        let temp = tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("a.txt"), "1\n2\n").unwrap();
        fs::write(root.join("b.txt"), "1").unwrap();

        let (work_tx, work_rx) = bounded(4);
        let (result_tx, result_rx) = bounded(4);
        let seen = Mutex::new(Vec::new());
        let progress = |rel: &Path, lines: u64| {
            seen.lock().unwrap().push((rel.to_path_buf(), lines));
        };

        let (mut records, stats) = thread::scope(|scope| {
            let pool = WorkerPool::spawn(scope, 3, root, work_rx, result_tx, &progress).unwrap();
            assert_eq!(pool.size(), 3);

            work_tx.send(root.join("a.txt")).unwrap();
            work_tx.send(root.join("b.txt")).unwrap();
            work_tx.send(root.join("missing.txt")).unwrap();
            drop(work_tx);

            let records: Vec<FileRecord> = result_rx.iter().collect();
            (records, pool.join().unwrap())
        });
        records.sort_by(|a, b| a.path.cmp(&b.path));

        assert_eq!(
            records,
            vec![
                FileRecord::new(root.join("a.txt"), 2),
                FileRecord::new(root.join("b.txt"), 1),
            ]
        );
        assert_eq!(stats, WorkerStats { counted: 2, failed: 1 });

        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(
            seen,
            vec![(PathBuf::from("a.txt"), 2), (PathBuf::from("b.txt"), 1)]
        );
    }

    #[test]
    fn test_zero_size_pool_still_runs_one_worker() {
        let (work_tx, work_rx) = bounded::<PathBuf>(1);
        let (result_tx, result_rx) = bounded(1);
        let progress = |_: &Path, _: u64| {};

        let stats = thread::scope(|scope| {
            let pool =
                WorkerPool::spawn(scope, 0, Path::new("/"), work_rx, result_tx, &progress).unwrap();
            assert_eq!(pool.size(), 1);
            drop(work_tx);
            assert!(result_rx.iter().next().is_none());
            pool.join().unwrap()
        });

        assert_eq!(stats, WorkerStats::default());
    }
}

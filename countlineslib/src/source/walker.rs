//! Depth-first discovery of files to count.
//!
//! [`Walker`] is a lazy, single-pass iterator over the files below a root
//! that pass a [`FilterConfig`]. Excluded directories are pruned without
//! being read. [`walk`] drives a walker into the pipeline's work queue.

use std::fs;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use serde::Serialize;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::filter::{base_name, FilterConfig};
use crate::cancel::CancelToken;

/// Traversal counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    /// Entries read from the filesystem, root included
    pub visited: u64,
    /// Files handed to the consumer
    pub emitted: u64,
    /// Entries skipped by an exclude pattern (a pruned directory counts once)
    pub pruned: u64,
    /// Entries that could not be read and were skipped
    pub errors: u64,
}

/// Lazy iterator over the files below `root` accepted by a filter.
///
/// A root directory is never tested against the exclude list; a root that is
/// a file is filtered like any other file. Below the root, every entry whose
/// base name matches an exclude pattern is skipped, and an excluded directory
/// is not descended into. Files are yielded when their base name matches an
/// include pattern. Unreadable entries are counted in
/// [`WalkStats::errors`] and skipped.
pub struct Walker {
    entries: walkdir::IntoIter,
    filter: FilterConfig,
    stats: WalkStats,
}

impl Walker {
    pub fn new(root: impl AsRef<Path>, filter: FilterConfig) -> Self {
        Self {
            entries: WalkDir::new(root).follow_links(false).into_iter(),
            filter,
            stats: WalkStats::default(),
        }
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> WalkStats {
        self.stats
    }

    /// Whether a non-directory entry should be treated as a regular file.
    ///
    /// Symlinks are resolved once: links to files count, links to
    /// directories are not followed, dangling links are errors.
    fn is_countable(&mut self, entry: &DirEntry) -> bool {
        let file_type = entry.file_type();
        if file_type.is_file() {
            return true;
        }
        if !file_type.is_symlink() {
            return false;
        }
        match fs::metadata(entry.path()) {
            Ok(meta) => meta.is_file(),
            Err(e) => {
                debug!(path = %entry.path().display(), error = %e, "skipping broken symlink");
                self.stats.errors += 1;
                false
            }
        }
    }
}

impl Iterator for Walker {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable entry");
                    self.stats.errors += 1;
                    continue;
                }
            };
            self.stats.visited += 1;

            let name = base_name(entry.path());
            let is_dir = entry.file_type().is_dir();

            if (entry.depth() > 0 || !is_dir) && self.filter.should_exclude(&name) {
                if is_dir {
                    self.entries.skip_current_dir();
                }
                self.stats.pruned += 1;
                continue;
            }

            if is_dir || !self.is_countable(&entry) {
                continue;
            }

            if self.filter.should_include(&name) {
                self.stats.emitted += 1;
                return Some(entry.into_path());
            }
        }
    }
}

/// Push every file the walker yields into `tx`.
///
/// Stops early when `cancel` is set or every receiver is gone. `tx` is
/// dropped on return, which closes the queue for the workers.
pub fn walk(mut walker: Walker, tx: Sender<PathBuf>, cancel: &CancelToken) -> WalkStats {
    while !cancel.is_cancelled() {
        let Some(path) = walker.next() else {
            break;
        };
        if tx.send(path).is_err() {
            debug!("work queue closed before traversal finished");
            break;
        }
    }
    drop(tx);
    walker.stats()
}

/// Collect every file the walker would emit, sorted.
///
/// Convenience for callers that want the file list without counting.
pub fn discover_files(root: impl AsRef<Path>, filter: &FilterConfig) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Walker::new(root, filter.clone()).collect();
    files.sort();
    files
}

//! Fan-in of worker results into per-extension totals.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crossbeam_channel::Receiver;
use tracing::debug;

use crate::stats::{ExtensionBucket, FileRecord, RunTotals};

/// Single-owner accumulator for one run.
///
/// Records are deduplicated by path before anything is counted, so a path
/// delivered twice contributes once.
#[derive(Debug, Default)]
pub struct Aggregator {
    seen: HashSet<PathBuf>,
    buckets: HashMap<String, ExtensionBucket>,
    totals: RunTotals,
    duplicates: u64,
}

/// Final, read-only output of an [`Aggregator`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregate {
    pub totals: RunTotals,
    /// Sorted by label
    pub buckets: Vec<ExtensionBucket>,
    pub duplicates: u64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one record in. Returns `false` if its path was already counted.
    pub fn add(&mut self, record: FileRecord) -> bool {
        if self.seen.contains(&record.path) {
            debug!(path = %record.path.display(), "ignoring duplicate record");
            self.duplicates += 1;
            return false;
        }

        let label = record.label();
        self.totals.record(record.lines);
        self.buckets
            .entry(label)
            .or_insert_with_key(|label| ExtensionBucket::new(label.clone()))
            .add_file(record.lines);
        self.seen.insert(record.path);
        true
    }

    /// Drain `rx` until every sender has been dropped.
    pub fn consume(&mut self, rx: &Receiver<FileRecord>) {
        for record in rx.iter() {
            self.add(record);
        }
    }

    /// Running totals.
    pub fn totals(&self) -> RunTotals {
        self.totals
    }

    pub fn finish(self) -> Aggregate {
        let mut buckets: Vec<ExtensionBucket> = self.buckets.into_values().collect();
        buckets.sort_by(|a, b| a.label.cmp(&b.label));
        Aggregate {
            totals: self.totals,
            buckets,
            duplicates: self.duplicates,
        }
    }
}

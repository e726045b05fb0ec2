//! Core data structures for line count results.
//!
//! The pipeline produces one [`FileRecord`] per successfully read file. The
//! aggregator folds those into [`RunTotals`] and a set of [`ExtensionBucket`]s,
//! and the finished run is reported as a [`CountResult`].

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use std::path::{Path, PathBuf};

use crate::source::{FilterSummary, WalkStats};

/// Line count for a single file, produced by a worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path as discovered by the walker (root-joined)
    pub path: PathBuf,
    /// Number of lines in the file
    pub lines: u64,
}

impl FileRecord {
    pub fn new(path: impl Into<PathBuf>, lines: u64) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    /// Bucket label for this record's path.
    pub fn label(&self) -> String {
        bucket_label(&self.path)
    }
}

/// Grand totals for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunTotals {
    /// Number of files counted
    pub files: u64,
    /// Number of lines across all counted files
    pub lines: u64,
}

impl RunTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one more file with `lines` lines.
    pub fn record(&mut self, lines: u64) {
        self.files += 1;
        self.lines += lines;
    }
}

impl Add for RunTotals {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            files: self.files + other.files,
            lines: self.lines + other.lines,
        }
    }
}

impl AddAssign for RunTotals {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.lines += other.lines;
    }
}

/// Totals for every file sharing a bucket label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionBucket {
    /// Extension with its leading dot (`.rs`), or the bare file name when the
    /// file has no extension (`Makefile`)
    pub label: String,
    /// Lines across all files in the bucket
    pub lines: u64,
    /// Number of files in the bucket
    pub files: u64,
}

impl ExtensionBucket {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            lines: 0,
            files: 0,
        }
    }

    /// Add one file to the bucket.
    pub fn add_file(&mut self, lines: u64) {
        self.files += 1;
        self.lines += lines;
    }
}

/// Compute the bucket label for a path.
///
/// Only the final extension is used, so `archive.tar.gz` buckets as `.gz`.
/// Names without an extension (including dotfiles such as `.gitignore`)
/// bucket under the full file name.
pub fn bucket_label(path: &Path) -> String {
    match path.extension() {
        Some(ext) => format!(".{}", ext.to_string_lossy()),
        None => path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned()),
    }
}

/// Result of counting a tree.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CountResult {
    /// Root that was walked
    pub root: PathBuf,
    /// Grand totals over deduplicated files
    pub totals: RunTotals,
    /// Per-label totals, sorted by label
    pub buckets: Vec<ExtensionBucket>,
    /// Files that matched the filter but could not be read
    pub skipped: u64,
    /// Records dropped because their path had already been counted
    pub duplicates: u64,
    /// Traversal counters
    pub walk: WalkStats,
    /// Number of counting workers used
    pub workers: usize,
    /// Patterns the run was filtered with
    pub filter: FilterSummary,
    /// Whether the run stopped early because it was cancelled
    pub cancelled: bool,
}

impl CountResult {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Look up a bucket by label.
    pub fn bucket(&self, label: &str) -> Option<&ExtensionBucket> {
        self.buckets
            .binary_search_by(|b| b.label.as_str().cmp(label))
            .ok()
            .map(|idx| &self.buckets[idx])
    }

    /// Width of the longest bucket label, for column alignment.
    pub fn max_label_width(&self) -> usize {
        self.buckets
            .iter()
            .map(|b| b.label.chars().count())
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_label_uses_extension() {
        assert_eq!(bucket_label(Path::new("notes.txt")), ".txt");
        assert_eq!(bucket_label(Path::new("src/main.rs")), ".rs");
    }

    #[test]
    fn test_bucket_label_without_extension() {
        assert_eq!(bucket_label(Path::new("Makefile")), "Makefile");
        assert_eq!(bucket_label(Path::new("docs/README")), "README");
    }

    #[test]
    fn test_bucket_label_only_final_extension() {
        assert_eq!(bucket_label(Path::new("archive.tar.gz")), ".gz");
    }

    #[test]
    fn test_bucket_label_dotfile() {
        assert_eq!(bucket_label(Path::new(".gitignore")), ".gitignore");
    }

    #[test]
    fn test_run_totals_accumulate() {
        let mut totals = RunTotals::new();
        totals.record(10);
        totals.record(0);
        totals += RunTotals { files: 1, lines: 5 };

        assert_eq!(totals, RunTotals { files: 3, lines: 15 });
    }

    #[test]
    fn test_bucket_lookup() {
        let mut result = CountResult::new("/tmp");
        result.buckets = vec![
            ExtensionBucket {
                label: ".go".to_string(),
                lines: 10,
                files: 1,
            },
            ExtensionBucket {
                label: "README".to_string(),
                lines: 0,
                files: 1,
            },
        ];

        assert_eq!(result.bucket(".go").map(|b| b.lines), Some(10));
        assert!(result.bucket(".rs").is_none());
        assert_eq!(result.max_label_width(), 6);
    }
}

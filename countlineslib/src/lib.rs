//! # countlineslib
//!
//! A concurrent line counter that groups totals by file extension.
//!
//! ## Overview
//!
//! Counting runs as a three-stage pipeline:
//!
//! - **Walker**: depth-first traversal applying include/exclude glob patterns
//!   to base names, pruning excluded directories
//! - **Workers**: a fixed pool of threads counting `\n` bytes in each file
//!   with a fixed-size buffer
//! - **Aggregator**: deduplicates results by path and buckets them by
//!   extension (or by file name when there is none)
//!
//! The stages are connected by bounded channels, so a slow consumer throttles
//! its producers. Files that cannot be read are left out of the totals and
//! reported as a skipped count. Nothing in the pipeline understands language
//! syntax: a line is a line.
//!
//! ## Example
//!
//! ```rust
//! use countlineslib::{count_directory, CountOptions, FilterConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("node_modules")).unwrap();
//! fs::write(dir.path().join("node_modules/dep.js"), "x\n".repeat(1000)).unwrap();
//! fs::write(dir.path().join("main.js"), "console.log(1)\n").unwrap();
//!
//! let filter = FilterConfig::new().include("*.js").exclude("node_modules");
//! let result = count_directory(dir.path(), &CountOptions::new().filter(filter)).unwrap();
//!
//! assert_eq!(result.totals.files, 1);
//! assert_eq!(result.totals.lines, 1);
//! assert_eq!(result.bucket(".js").unwrap().files, 1);
//! ```

pub mod cancel;
pub mod counter;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod repo;
pub mod source;
pub mod stats;

pub use cancel::CancelToken;
pub use counter::{count_lines, count_reader};
pub use error::CountlinesError;
pub use pipeline::{
    count_directory, count_directory_with_progress, Aggregate, Aggregator, CountOptions,
    WorkerStats,
};
pub use repo::{clone_repository, is_github_url, ClonedRepo, RepoSpec};
pub use source::{discover_files, FilterConfig, WalkStats, Walker};
pub use stats::{bucket_label, CountResult, ExtensionBucket, FileRecord, RunTotals};

/// Result type for countlineslib operations
pub type Result<T> = std::result::Result<T, CountlinesError>;

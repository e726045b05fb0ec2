//! Source discovery: find files to count.
//!
//! This module handles the first stage of the pipeline, deciding which files
//! get counted. It provides:
//!
//! - **Filtering**: include/exclude glob patterns matched against base names
//! - **Walking**: depth-first traversal that prunes excluded directories
//!
//! ## Example
//!
//! ```rust
//! use countlineslib::source::{discover_files, FilterConfig};
//! use std::fs;
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! fs::create_dir(dir.path().join("target")).unwrap();
//! fs::write(dir.path().join("target/build.log"), "noise\n").unwrap();
//! fs::write(dir.path().join("main.go"), "package main\n").unwrap();
//!
//! let filter = FilterConfig::new().exclude("target");
//! let files = discover_files(dir.path(), &filter);
//! assert_eq!(files.len(), 1);
//! ```

pub mod filter;
pub mod walker;

pub use filter::{FilterConfig, FilterSummary};
pub use walker::{discover_files, walk, WalkStats, Walker};

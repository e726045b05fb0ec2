//! Error types for countlineslib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while acquiring a tree or counting it.
///
/// Only errors that abort a run live here. Per-entry traversal errors and
/// per-file read errors are recovered inside the pipeline and show up as
/// counters on [`CountResult`](crate::CountResult) instead.
#[derive(Error, Debug)]
pub enum CountlinesError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Root path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// The `git` executable could not be started
    #[error("failed to run git: {0}")]
    GitUnavailable(std::io::Error),

    /// `git clone` exited unsuccessfully
    #[error("failed to clone repository '{url}': {message}")]
    Clone { url: String, message: String },

    /// `git checkout` exited unsuccessfully
    #[error("failed to checkout '{reference}': {message}")]
    Checkout { reference: String, message: String },

    /// A walker or worker thread panicked
    #[error("pipeline thread '{0}' panicked")]
    WorkerPanicked(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

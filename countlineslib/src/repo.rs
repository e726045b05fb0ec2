//! Remote repository acquisition.
//!
//! A GitHub URL is cloned with the `git` executable into a fresh temporary
//! directory. The directory is owned by [`ClonedRepo`] and removed when it is
//! dropped, whether the run succeeded or not. A failed clone or checkout
//! removes the partially populated directory before the error is returned.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use tracing::{debug, info};

use crate::error::CountlinesError;
use crate::Result;

const GITHUB_PREFIX: &str = "https://github.com/";

/// What to clone and which revision to check out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoSpec {
    pub url: String,
    pub branch: Option<String>,
    pub commit: Option<String>,
}

impl RepoSpec {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    pub fn commit(mut self, commit: impl Into<String>) -> Self {
        self.commit = Some(commit.into());
        self
    }

    /// History is only needed when a specific commit must be checked out.
    pub fn is_shallow(&self) -> bool {
        self.commit.is_none()
    }

    /// Arguments for `git clone` into `dest`.
    fn clone_args(&self, dest: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["clone".into()];
        if self.is_shallow() {
            args.push("--depth".into());
            args.push("1".into());
            if let Some(branch) = &self.branch {
                args.push("-b".into());
                args.push(branch.into());
                args.push("--single-branch".into());
            }
        }
        args.push(self.url.as_str().into());
        args.push(dest.as_os_str().to_os_string());
        args
    }

    /// References to `git checkout`, in order, after a full clone.
    fn checkouts(&self) -> Vec<&str> {
        match (&self.branch, &self.commit) {
            (Some(branch), Some(commit)) => vec![branch.as_str(), commit.as_str()],
            (None, Some(commit)) => vec![commit.as_str()],
            _ => Vec::new(),
        }
    }
}

/// True for inputs of the form `https://github.com/<owner>/<repo>...`.
pub fn is_github_url(input: &str) -> bool {
    let Some(rest) = input.strip_prefix(GITHUB_PREFIX) else {
        return false;
    };
    match rest.split_once('/') {
        Some((owner, repo)) => !owner.is_empty() && !repo.is_empty(),
        None => false,
    }
}

/// A checked-out repository in a temporary directory.
#[derive(Debug)]
pub struct ClonedRepo {
    dir: TempDir,
    spec: RepoSpec,
}

impl ClonedRepo {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn spec(&self) -> &RepoSpec {
        &self.spec
    }

    /// Remove the checkout now, reporting any error instead of ignoring it.
    pub fn close(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}

/// Clone `spec.url` and check out the requested revision.
pub fn clone_repository(spec: &RepoSpec) -> Result<ClonedRepo> {
    let dir = tempfile::Builder::new().prefix("countlines-").tempdir()?;
    info!(url = %spec.url, dest = %dir.path().display(), "cloning repository");

    run_git(&spec.clone_args(dir.path())).map_err(|e| match e {
        GitFailure::Spawn(err) => CountlinesError::GitUnavailable(err),
        GitFailure::Exit(message) => CountlinesError::Clone {
            url: spec.url.clone(),
            message,
        },
    })?;

    for reference in spec.checkouts() {
        let args: Vec<OsString> = vec![
            "-C".into(),
            dir.path().as_os_str().to_os_string(),
            "checkout".into(),
            reference.into(),
        ];
        run_git(&args).map_err(|e| match e {
            GitFailure::Spawn(err) => CountlinesError::GitUnavailable(err),
            GitFailure::Exit(message) => CountlinesError::Checkout {
                reference: reference.to_string(),
                message,
            },
        })?;
    }

    Ok(ClonedRepo {
        dir,
        spec: spec.clone(),
    })
}

enum GitFailure {
    Spawn(std::io::Error),
    Exit(String),
}

fn run_git(args: &[OsString]) -> std::result::Result<(), GitFailure> {
    debug!(?args, "running git");
    let output = Command::new("git")
        .args(args)
        .output()
        .map_err(GitFailure::Spawn)?;

    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(GitFailure::Exit(if stderr.is_empty() {
        format!("git exited with {}", output.status)
    } else {
        stderr
    }))
}

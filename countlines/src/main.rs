//! # countlines
//!
//! Count source lines in a directory tree or a GitHub repository, grouped by
//! file extension.
//!
//! ## Usage
//!
//! ```bash
//! # Count everything below the current directory
//! countlines .
//!
//! # Only Go and Rust files, skipping vendored code
//! countlines . '*.go' '*.rs' --blacklist vendor,node_modules
//!
//! # Clone a repository at a branch and count it
//! countlines https://github.com/owner/repo --branch main
//!
//! # Write the summary to output.csv
//! countlines ./src --output-csv --no-color
//! ```
//!
//! Patterns, positional and `--blacklist` alike, are shell-style globs matched
//! against file and directory base names. A blacklisted directory is skipped
//! entirely.

mod render;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use countlineslib::output::{write_csv_file, CSV_FILE_NAME};
use countlineslib::{
    clone_repository, count_directory_with_progress, is_github_url, CancelToken, ClonedRepo,
    CountOptions, FilterConfig, RepoSpec,
};
use tracing_subscriber::EnvFilter;

use render::Palette;

/// Exit status for a run stopped by Ctrl-C.
const EXIT_INTERRUPTED: u8 = 130;

/// Build the clap Command structure
fn build_command() -> Command {
    Command::new("countlines")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Count source lines in a directory or GitHub repository, grouped by file extension")
        .arg(
            Arg::new("input")
                .value_name("DIRECTORY|URL")
                .required(true)
                .help("Directory to scan, or https://github.com/<owner>/<repo> to clone and scan"),
        )
        .arg(
            Arg::new("patterns")
                .value_name("PATTERN")
                .num_args(0..)
                .action(ArgAction::Append)
                .help("Only count files whose name matches one of these globs (default: *)"),
        )
        .arg(
            Arg::new("blacklist")
                .long("blacklist")
                .value_name("PATTERN[,PATTERN...]")
                .action(ArgAction::Append)
                .value_delimiter(',')
                .help("Exclude files and directories matching these globs (can be repeated)"),
        )
        .arg(
            Arg::new("branch")
                .long("branch")
                .value_name("NAME")
                .help("Branch to clone (repository URLs only)"),
        )
        .arg(
            Arg::new("commit")
                .long("commit")
                .value_name("SHA")
                .help("Commit to check out after cloning (repository URLs only)"),
        )
        .arg(
            Arg::new("output-csv")
                .long("output-csv")
                .action(ArgAction::SetTrue)
                .help("Write the summary to output.csv"),
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .action(ArgAction::SetTrue)
                .help("Disable colored output"),
        )
        .arg(
            Arg::new("jobs")
                .short('j')
                .long("jobs")
                .value_name("N")
                .value_parser(clap::value_parser!(u64).range(1..))
                .help("Number of counting workers (default: logical CPUs)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .action(ArgAction::SetTrue)
                .help("Print the result as JSON instead of the text summary"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Do not print a line per counted file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Enable debug logging on stderr"),
        )
}

/// Exclude patterns from `--blacklist`, trimmed, empty entries dropped.
fn extract_blacklist(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("blacklist")
        .map(|values| {
            values
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}

/// Build filter config from matches plus any extra exclude patterns
fn build_filter(matches: &ArgMatches, extra_excludes: &[&str]) -> FilterConfig {
    let patterns: Vec<String> = matches
        .get_many::<String>("patterns")
        .map(|v| v.cloned().collect())
        .unwrap_or_default();

    FilterConfig::new()
        .include_many(&patterns)
        .exclude_many(&extract_blacklist(matches))
        .exclude_many(extra_excludes)
}

/// Build count options from matches
fn build_options(matches: &ArgMatches, filter: FilterConfig, cancel: CancelToken) -> CountOptions {
    let mut options = CountOptions::new().filter(filter).cancel_token(cancel);
    if let Some(jobs) = matches.get_one::<u64>("jobs") {
        options = options.jobs(*jobs as usize);
    }
    options
}

/// Clone the repository named by `url` using `--branch`/`--commit`.
fn acquire_repository(matches: &ArgMatches, url: &str, palette: &Palette) -> Result<ClonedRepo> {
    let mut spec = RepoSpec::new(url);
    if let Some(branch) = matches.get_one::<String>("branch") {
        spec = spec.branch(branch);
    }
    if let Some(commit) = matches.get_one::<String>("commit") {
        spec = spec.commit(commit);
    }

    println!("{}", palette.muted(format!("Cloning '{url}'...")));
    let repo = clone_repository(&spec).with_context(|| format!("Failed to clone {url}"))?;
    tracing::debug!(shallow = repo.spec().is_shallow(), "clone finished");
    println!(
        "{}",
        palette.muted(format!("Cloned into '{}'", repo.path().display()))
    );
    Ok(repo)
}

/// Handler for a counting run. Returns whether the run completed.
fn count_handler(matches: &ArgMatches, palette: &Palette, cancel: CancelToken) -> Result<bool> {
    let input = matches
        .get_one::<String>("input")
        .context("missing directory or repository argument")?;

    let cloned = if is_github_url(input) {
        Some(acquire_repository(matches, input, palette)?)
    } else {
        None
    };

    let (root, filter) = match &cloned {
        Some(repo) => (repo.path().to_path_buf(), build_filter(matches, &[".git"])),
        None => (PathBuf::from(input), build_filter(matches, &[])),
    };
    let options = build_options(matches, filter, cancel);

    let json = matches.get_flag("json");
    let show_progress = !json && !matches.get_flag("quiet");

    let result = count_directory_with_progress(&root, &options, |relative: &Path, lines| {
        if show_progress {
            println!("{}", render::progress_line(palette, relative, lines));
        }
    })
    .with_context(|| format!("Failed to count lines in {}", root.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render::summary(palette, &result));
    }

    if matches.get_flag("output-csv") {
        write_csv_file(&result, CSV_FILE_NAME)
            .with_context(|| format!("Failed to write {CSV_FILE_NAME}"))?;
        println!("Output saved to {CSV_FILE_NAME}");
    }

    if let Some(repo) = cloned {
        repo.close().context("Failed to remove cloned repository")?;
        println!("{}", palette.muted("Cloned repo has been deleted."));
    }

    Ok(!result.cancelled)
}

fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("countlines=debug,countlineslib=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}

fn main() -> ExitCode {
    let matches = match build_command().try_get_matches() {
        Ok(matches) => matches,
        Err(e) => {
            // --help and --version are not failures
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    setup_logging(matches.get_flag("verbose"));
    let palette = Palette::new(!matches.get_flag("no-color"));

    let cancel = CancelToken::new();
    let handler_cancel = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        eprintln!("\nInterrupt received, finishing up...");
        handler_cancel.cancel();
    }) {
        tracing::warn!(error = %e, "failed to set signal handler");
    }

    match count_handler(&matches, &palette, cancel) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            eprintln!("{}", palette.error(format!("Error: {e:#}")));
            ExitCode::FAILURE
        }
    }
}

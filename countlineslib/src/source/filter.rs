//! Base-name filtering with shell-style glob patterns.
//!
//! Patterns are matched against the final path component only (`main.rs`,
//! `node_modules`), never against the full path. A pattern with invalid
//! syntax never matches anything; it is not an error.

use std::path::Path;

use glob::Pattern;
use serde::Serialize;
use tracing::debug;

/// A glob pattern together with its source text.
///
/// `compiled` is `None` when the source text is not a valid glob.
#[derive(Debug, Clone)]
struct NamePattern {
    source: String,
    compiled: Option<Pattern>,
}

impl NamePattern {
    fn new(source: &str) -> Self {
        let compiled = match Pattern::new(source) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                debug!(pattern = source, error = %e, "ignoring invalid glob pattern");
                None
            }
        };
        Self {
            source: source.to_string(),
            compiled,
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.compiled
            .as_ref()
            .is_some_and(|pattern| pattern.matches(name))
    }
}

/// Include/exclude rules for one run.
///
/// The exclude list is checked in order and the first match wins. An empty
/// include list behaves like a single `*`.
#[derive(Debug, Clone, Default)]
pub struct FilterConfig {
    include: Vec<NamePattern>,
    exclude: Vec<NamePattern>,
}

impl FilterConfig {
    /// Create a filter that includes every name and excludes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an include pattern.
    pub fn include(mut self, pattern: &str) -> Self {
        self.include.push(NamePattern::new(pattern));
        self
    }

    /// Add an exclude pattern.
    pub fn exclude(mut self, pattern: &str) -> Self {
        self.exclude.push(NamePattern::new(pattern));
        self
    }

    /// Add multiple include patterns.
    pub fn include_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        for pattern in patterns {
            self = self.include(pattern.as_ref());
        }
        self
    }

    /// Add multiple exclude patterns.
    pub fn exclude_many<S: AsRef<str>>(mut self, patterns: &[S]) -> Self {
        for pattern in patterns {
            self = self.exclude(pattern.as_ref());
        }
        self
    }

    /// Include patterns as given, `["*"]` when none were added.
    pub fn include_patterns(&self) -> Vec<&str> {
        if self.include.is_empty() {
            return vec!["*"];
        }
        self.include.iter().map(|p| p.source.as_str()).collect()
    }

    /// Exclude patterns in the order they were added.
    pub fn exclude_patterns(&self) -> Vec<&str> {
        self.exclude.iter().map(|p| p.source.as_str()).collect()
    }

    /// True if `name` matches any exclude pattern.
    pub fn should_exclude(&self, name: &str) -> bool {
        self.exclude.iter().any(|pattern| pattern.matches(name))
    }

    /// True if `name` matches at least one include pattern.
    pub fn should_include(&self, name: &str) -> bool {
        if self.include.is_empty() {
            return true;
        }
        self.include.iter().any(|pattern| pattern.matches(name))
    }

    /// Apply both predicates to the base name of `path`.
    pub fn accepts(&self, path: &Path) -> bool {
        let name = base_name(path);
        !self.should_exclude(&name) && self.should_include(&name)
    }
}

/// Serializable view of the configured patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl From<&FilterConfig> for FilterSummary {
    fn from(filter: &FilterConfig) -> Self {
        Self {
            include: filter
                .include_patterns()
                .into_iter()
                .map(String::from)
                .collect(),
            exclude: filter
                .exclude_patterns()
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

/// Final component of `path` as a string, or the whole path when it has none
/// (e.g. `/` or `..`).
pub(crate) fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_includes_everything() {
        let filter = FilterConfig::new();

        assert!(filter.should_include("main.rs"));
        assert!(filter.should_include("Makefile"));
        assert!(filter.should_include(".hidden"));
        assert!(!filter.should_exclude("main.rs"));
        assert_eq!(filter.include_patterns(), vec!["*"]);
    }

    #[test]
    fn test_include_patterns() {
        let filter = FilterConfig::new().include_many(&["*.go", "*.rs"]);

        assert!(filter.should_include("main.go"));
        assert!(filter.should_include("lib.rs"));
        assert!(!filter.should_include("README.md"));
    }

    #[test]
    fn test_exclude_patterns() {
        let filter = FilterConfig::new().exclude("node_modules").exclude("*.lock");

        assert!(filter.should_exclude("node_modules"));
        assert!(filter.should_exclude("Cargo.lock"));
        assert!(!filter.should_exclude("Cargo.toml"));
    }

    #[test]
    fn test_question_mark_and_class() {
        let filter = FilterConfig::new().exclude("?.txt").exclude("[abc]*.md");

        assert!(filter.should_exclude("a.txt"));
        assert!(!filter.should_exclude("ab.txt"));
        assert!(filter.should_exclude("beta.md"));
        assert!(!filter.should_exclude("delta.md"));
    }

    #[test]
    fn test_invalid_pattern_never_matches() {
        let filter = FilterConfig::new().exclude("[invalid").include("[oops");

        assert!(!filter.should_exclude("[invalid"));
        assert!(!filter.should_include("anything"));
        assert_eq!(filter.exclude_patterns(), vec!["[invalid"]);
    }

    #[test]
    fn test_matches_base_name_only() {
        let filter = FilterConfig::new().exclude("src");

        assert!(!filter.accepts(Path::new("src")));
        assert!(filter.accepts(Path::new("src/main.rs")));
        assert!(!filter.should_exclude("src/main.rs"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = FilterConfig::new().include("*.go").exclude("b.go");

        assert!(filter.accepts(Path::new("a.go")));
        assert!(!filter.accepts(Path::new("b.go")));
    }

    #[test]
    fn test_filter_summary() {
        let filter = FilterConfig::new().exclude(".git");
        let summary = FilterSummary::from(&filter);

        assert_eq!(summary.include, vec!["*".to_string()]);
        assert_eq!(summary.exclude, vec![".git".to_string()]);
    }
}

//! Table-ready summary of a counting run.
//!
//! `SummaryTable` is the last step before presentation: every value is
//! already a string, and renderers (console, CSV, templates) only lay it out.

use serde::{Deserialize, Serialize};

use super::format_number;
use crate::CountResult;

/// One bucket row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    /// Bucket label (`.rs`, `Makefile`)
    pub label: String,
    /// Line count with thousands separators
    pub lines: String,
    /// Number of files in the bucket
    pub files: u64,
}

/// Presentation-ready view of a [`CountResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTable {
    /// Total file count with thousands separators
    pub total_files: String,
    /// Total line count with thousands separators
    pub total_lines: String,
    /// One row per bucket, in label order
    pub rows: Vec<TableRow>,
    /// Width of the widest label
    pub label_width: usize,
}

impl SummaryTable {
    pub fn from_count(result: &CountResult) -> Self {
        let rows = result
            .buckets
            .iter()
            .map(|bucket| TableRow {
                label: bucket.label.clone(),
                lines: format_number(bucket.lines),
                files: bucket.files,
            })
            .collect();

        SummaryTable {
            total_files: format_number(result.totals.files),
            total_lines: format_number(result.totals.lines),
            rows,
            label_width: result.max_label_width(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtensionBucket, RunTotals};

    #[test]
    fn test_from_count() {
        let mut result = CountResult::new("/repo");
        result.totals = RunTotals {
            files: 1201,
            lines: 1_234_567,
        };
        result.buckets = vec![
            ExtensionBucket {
                label: ".rs".to_string(),
                lines: 1_234_000,
                files: 1200,
            },
            ExtensionBucket {
                label: "Makefile".to_string(),
                lines: 567,
                files: 1,
            },
        ];

        let table = SummaryTable::from_count(&result);

        assert_eq!(table.total_files, "1,201");
        assert_eq!(table.total_lines, "1,234,567");
        assert_eq!(table.label_width, 8);
        assert_eq!(table.rows[0].lines, "1,234,000");
        assert_eq!(table.rows[1].label, "Makefile");
        assert_eq!(table.rows[1].files, 1);
    }

    #[test]
    fn test_empty_result() {
        let table = SummaryTable::from_count(&CountResult::new("."));

        assert_eq!(table.total_files, "0");
        assert!(table.rows.is_empty());
        assert_eq!(table.label_width, 0);
    }
}

//! Output formatting: present a finished run.
//!
//! This module handles the last stage, after aggregation. It provides:
//!
//! - **SummaryTable**: table-ready strings for console renderers
//! - **CSV export**: the summary written as comma-separated rows
//! - **format_number**: thousands separators for counts
//!
//! Nothing here feeds back into the pipeline.
//!
//! ## Example
//!
//! ```rust
//! use countlineslib::output::{format_number, SummaryTable};
//! use countlineslib::CountResult;
//!
//! let table = SummaryTable::from_count(&CountResult::new("."));
//! assert_eq!(table.total_lines, "0");
//! assert_eq!(format_number(1234567), "1,234,567");
//! ```

pub mod csv;
pub mod table;

pub use csv::{write_csv, write_csv_file, CSV_FILE_NAME};
pub use table::{SummaryTable, TableRow};

/// Format `n` with `,` between groups of three digits.
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

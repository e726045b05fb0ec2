//! CSV summary export.
//!
//! Layout:
//!
//! ```text
//! Total Files,"1,201"
//! Total Lines,"1,234,567"
//!
//! Extension/File,Line Count,File Count
//! .rs,1234000,1200
//! Makefile,567,1
//! ```

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::format_number;
use crate::CountResult;
use crate::Result;

/// File name the CLI writes the summary to.
pub const CSV_FILE_NAME: &str = "output.csv";

/// Write the summary for `result` to `out`.
pub fn write_csv<W: Write>(result: &CountResult, out: &mut W) -> std::io::Result<()> {
    write_record(out, &["Total Files", &format_number(result.totals.files)])?;
    write_record(out, &["Total Lines", &format_number(result.totals.lines)])?;
    writeln!(out)?;
    write_record(out, &["Extension/File", "Line Count", "File Count"])?;
    for bucket in &result.buckets {
        write_record(
            out,
            &[
                &bucket.label,
                &bucket.lines.to_string(),
                &bucket.files.to_string(),
            ],
        )?;
    }
    Ok(())
}

/// Write the summary for `result` to a file at `path`, replacing it.
pub fn write_csv_file(result: &CountResult, path: impl AsRef<Path>) -> Result<()> {
    let mut out = BufWriter::new(File::create(path.as_ref())?);
    write_csv(result, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_record<W: Write>(out: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line: Vec<Cow<'_, str>> = fields.iter().map(|f| escape_field(f)).collect();
    writeln!(out, "{}", line.join(","))
}

/// Quote a field when it contains a delimiter, quote, or line break.
fn escape_field(field: &str) -> Cow<'_, str> {
    let needs_quotes = field.starts_with(' ')
        || field
            .chars()
            .any(|c| matches!(c, ',' | '"' | '\n' | '\r'));
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExtensionBucket, RunTotals};
    use std::fs;
    use tempfile::tempdir;

    fn sample_result() -> CountResult {
        let mut result = CountResult::new("/repo");
        result.totals = RunTotals {
            files: 2,
            lines: 1010,
        };
        result.buckets = vec![
            ExtensionBucket {
                label: ".go".to_string(),
                lines: 1010,
                files: 1,
            },
            ExtensionBucket {
                label: "README".to_string(),
                lines: 0,
                files: 1,
            },
        ];
        result
    }

    #[test]
    fn test_csv_layout() {
        let mut out = Vec::new();
        write_csv(&sample_result(), &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Total Files,2\n\
             Total Lines,\"1,010\"\n\
             \n\
             Extension/File,Line Count,File Count\n\
             .go,1010,1\n\
             README,0,1\n"
        );
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field(" lead"), "\" lead\"");
    }

    #[test]
    fn test_write_csv_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(CSV_FILE_NAME);

        write_csv_file(&sample_result(), &path).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("Total Files,2\n"));
        assert!(content.ends_with("README,0,1\n"));
    }
}

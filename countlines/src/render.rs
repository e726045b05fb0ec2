//! Console rendering for progress lines and the final summary.

use std::path::Path;

use console::{Style, StyledObject};
use countlineslib::output::{format_number, SummaryTable};
use countlineslib::CountResult;

/// Styles for everything the CLI prints.
///
/// Built once from `--no-color`; a disabled palette never emits escape codes,
/// an enabled one still defers to the terminal detection in `console`.
#[derive(Debug, Clone)]
pub struct Palette {
    label: Style,
    count: Style,
    totals: Style,
    muted: Style,
    warning: Style,
    error: Style,
}

impl Palette {
    pub fn new(color: bool) -> Self {
        let styled = |style: Style| if color { style } else { style.force_styling(false) };
        Self {
            label: styled(Style::new().cyan()),
            count: styled(Style::new().yellow()),
            totals: styled(Style::new().blue().bold()),
            muted: styled(Style::new().black().bright()),
            warning: styled(Style::new().yellow()),
            error: styled(Style::new().red().bright()),
        }
    }

    /// A palette that never styles.
    pub fn plain() -> Self {
        Self::new(false)
    }

    pub fn muted<D>(&self, text: D) -> StyledObject<D> {
        self.muted.apply_to(text)
    }

    pub fn warning<D>(&self, text: D) -> StyledObject<D> {
        self.warning.apply_to(text)
    }

    pub fn error<D>(&self, text: D) -> StyledObject<D> {
        self.error.apply_to(text)
    }
}

/// `Read file: src/main.rs - (1,024)`
pub fn progress_line(palette: &Palette, relative: &Path, lines: u64) -> String {
    format!(
        "{} {} - {}",
        palette.label.apply_to("Read file:"),
        relative.display(),
        palette.count.apply_to(format!("({})", format_number(lines))),
    )
}

/// Totals, then one row per bucket with labels padded to a common width.
pub fn summary(palette: &Palette, result: &CountResult) -> String {
    let table = SummaryTable::from_count(result);
    let width = table.label_width;
    let mut out = String::new();

    out.push_str(&format!(
        "{}\n",
        palette
            .totals
            .apply_to(format!("File Count: {}", table.total_files))
    ));
    out.push_str(&format!(
        "{}\n",
        palette
            .totals
            .apply_to(format!("Line Count: {}", table.total_lines))
    ));

    out.push_str("\nLines by file extension:\n");
    for row in &table.rows {
        out.push_str(&format!(
            "  {} : {:<12} {}\n",
            palette.label.apply_to(format!("{:<width$}", row.label)),
            row.lines,
            palette.count.apply_to(format!("({} files)", row.files)),
        ));
    }

    if result.skipped > 0 {
        out.push_str(&format!(
            "\n{}\n",
            palette.warning.apply_to(format!(
                "Skipped {} unreadable file(s); they are not included in the totals.",
                format_number(result.skipped)
            ))
        ));
    }
    if result.cancelled {
        out.push_str(&format!(
            "\n{}\n",
            palette
                .warning
                .apply_to("Interrupted: totals cover only the files counted before the stop.")
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use countlineslib::{ExtensionBucket, RunTotals};

    fn sample() -> CountResult {
        let mut result = CountResult::new("/repo");
        result.totals = RunTotals {
            files: 2,
            lines: 1500,
        };
        result.buckets = vec![
            ExtensionBucket {
                label: ".go".to_string(),
                lines: 1500,
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
    fn test_progress_line_plain() {
        let line = progress_line(&Palette::plain(), Path::new("src/a.go"), 12345);

        assert_eq!(line, "Read file: src/a.go - (12,345)");
    }

    #[test]
    fn test_summary_plain() {
        let text = summary(&Palette::plain(), &sample());

        assert_eq!(
            text,
            "File Count: 2\n\
             Line Count: 1,500\n\
             \n\
             Lines by file extension:\n  \
             .go    : 1,500        (1 files)\n  \
             README : 0            (1 files)\n"
        );
    }

    #[test]
    fn test_summary_reports_skipped_files() {
        let mut result = sample();
        result.skipped = 3;

        let text = summary(&Palette::plain(), &result);

        assert!(text.contains("Skipped 3 unreadable file(s)"));
    }

    #[test]
    fn test_plain_palette_has_no_escape_codes() {
        let mut result = sample();
        result.skipped = 1;
        result.cancelled = true;
        let palette = Palette::plain();

        let text = summary(&palette, &result) + &progress_line(&palette, Path::new("x"), 1);

        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_forced_color_palette_styles_output() {
        let palette = Palette {
            label: Style::new().cyan().force_styling(true),
            ..Palette::plain()
        };

        let line = progress_line(&palette, Path::new("x"), 1);

        assert!(line.contains('\u{1b}'));
    }
}

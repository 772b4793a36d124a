//! Plain-text attendance preview
//!
//! Fixed-width table for terminals. Descriptive columns are limited to a
//! short subset so the date grid stays readable:
//!
//! ```text
//! Guest | Hotel | In    | Out   | N | 01 | 02 | 03 | 04
//! ------+-------+-------+-------+---+----+----+----+---
//! Ali   | Grand | 01.01 | 03.01 | 2 | ✓  | ✓  | .  | .
//! ```

use puantaj_core::{
    AttendanceReport, DateFormatter, EngineConfig, PatternFormatter, RenderError, Renderer,
};

use crate::columns::{Column, ColumnSpec};

/// Text table renderer
#[derive(Clone, Debug)]
pub struct TextRenderer<F = PatternFormatter> {
    pub columns: ColumnSpec,
    pub marker: String,
    /// Shown for days the guest is not in
    pub absent: String,
    /// Formatter for date column headers
    pub day_formatter: PatternFormatter,
    /// Formats check-in/check-out cells and the footer range
    date_formatter: F,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            columns: ColumnSpec {
                columns: vec![
                    Column::GuestName,
                    Column::Hotel,
                    Column::CheckIn,
                    Column::CheckOut,
                    Column::Nights,
                ],
                ..ColumnSpec::full()
            },
            marker: "✓".into(),
            absent: ".".into(),
            day_formatter: PatternFormatter::new("%d"),
            date_formatter: PatternFormatter::new("%d.%m"),
        }
    }
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marker and date pattern from the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            marker: config.marker.clone(),
            date_formatter: PatternFormatter::new(config.date_format.clone()),
            ..Self::default()
        }
    }
}

impl<F: DateFormatter> TextRenderer<F> {
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn columns(mut self, spec: ColumnSpec) -> Self {
        self.columns = spec;
        self
    }

    pub fn formatter<G: DateFormatter>(self, formatter: G) -> TextRenderer<G> {
        TextRenderer {
            columns: self.columns,
            marker: self.marker,
            absent: self.absent,
            day_formatter: self.day_formatter,
            date_formatter: formatter,
        }
    }

    fn header_label(column: Column) -> &'static str {
        match column {
            Column::CheckIn => "In",
            Column::CheckOut => "Out",
            Column::Nights => "N",
            other => other.header(),
        }
    }
}

impl<F: DateFormatter> Renderer for TextRenderer<F> {
    type Output = String;

    fn render(&self, report: &AttendanceReport) -> Result<String, RenderError> {
        if report.rows.is_empty() {
            return Ok("(no records)\n".to_string());
        }

        let mut table: Vec<Vec<String>> = Vec::with_capacity(report.rows.len() + 1);
        table.push(
            self.columns
                .columns
                .iter()
                .map(|c| Self::header_label(*c).to_string())
                .chain(report.dates.iter().map(|d| self.day_formatter.format_date(*d)))
                .collect(),
        );
        for row in &report.rows {
            // One cell per date column even if the row's attendance is short
            let marks = (0..report.dates.len()).map(|j| {
                if row.attendance.get(j).copied().unwrap_or(false) {
                    self.marker.clone()
                } else {
                    self.absent.clone()
                }
            });
            table.push(
                self.columns
                    .columns
                    .iter()
                    .map(|c| c.value(row).display(&self.date_formatter))
                    .chain(marks)
                    .collect(),
            );
        }

        let widths: Vec<usize> = (0..table[0].len())
            .map(|col| {
                table
                    .iter()
                    .filter_map(|r| r.get(col))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = String::new();
        for (i, cells) in table.iter().enumerate() {
            let line: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, width)| pad(cell, *width))
                .collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');

            if i == 0 {
                let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
                out.push_str(&rule.join("-+-"));
                out.push('\n');
            }
        }

        let first = report.dates.first().map(|d| self.date_formatter.format_date(*d));
        let last = report.dates.last().map(|d| self.date_formatter.format_date(*d));
        if let (Some(first), Some(last)) = (first, last) {
            out.push_str(&format!(
                "{} records, {} days ({first} - {last})\n",
                report.rows.len(),
                report.dates.len()
            ));
        }
        Ok(out)
    }
}

fn pad(cell: &str, width: usize) -> String {
    let len = cell.chars().count();
    format!("{cell}{}", " ".repeat(width.saturating_sub(len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use puantaj_core::{AttendanceRow, Scope, StayRecord};
    use rust_decimal::Decimal;

    #[test]
    fn empty_report_placeholder() {
        let out = TextRenderer::new().render(&AttendanceReport::empty(Scope::All)).unwrap();
        assert_eq!(out, "(no records)\n");
    }

    fn short_row_report() -> AttendanceReport {
        let d = |day| chrono::NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        AttendanceReport {
            dates: vec![d(1), d(2), d(3)],
            rows: vec![AttendanceRow {
                record: StayRecord::new("a", d(1), d(3)).guest("Ali").hotel("Grand"),
                nights: 2,
                total_rate: Decimal::ZERO,
                attendance: vec![true],
            }],
            ..AttendanceReport::default()
        }
    }

    #[test]
    fn short_attendance_renders_as_absent() {
        let out = TextRenderer::new().render(&short_row_report()).unwrap();
        let row = out.lines().nth(2).unwrap();
        assert!(row.ends_with("| ✓  | .  | ."), "{row}");
    }

    #[test]
    fn from_config_uses_configured_pattern_and_marker() {
        let config = EngineConfig {
            date_format: "%Y-%m-%d".into(),
            marker: "X".into(),
            ..EngineConfig::default()
        };
        let out = TextRenderer::from_config(&config).render(&short_row_report()).unwrap();
        assert!(out.contains("| 2024-01-01 | 2024-01-03 |"), "{out}");
        assert!(out.ends_with("1 records, 3 days (2024-01-01 - 2024-01-03)\n"), "{out}");
        assert!(out.lines().nth(2).unwrap().contains("| X "));
    }

    #[test]
    fn pad_counts_chars_not_bytes() {
        assert_eq!(pad("ş", 3), "ş  ");
        assert_eq!(pad("abcd", 2), "abcd");
    }
}

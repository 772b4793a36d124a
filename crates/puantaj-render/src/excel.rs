//! Excel attendance report renderer
//!
//! Generates a single-sheet XLSX workbook:
//!
//! ```text
//! | Guest | Title | ... | Check-in   | Check-out  | Nights | 01.01.2024 | 02.01.2024 | ...
//! |-------|-------|-----|------------|------------|--------|------------|------------|
//! | Ali   | Mr    | ... | 01.01.2024 | 03.01.2024 | 2      | ✓          | ✓          |
//! ```
//!
//! The header row and the descriptive columns are frozen so the date grid
//! scrolls under them. Rows alternate white/light blue for readability.
//! An empty report still produces a workbook with the header row.

use puantaj_core::{
    AttendanceReport, DateFormatter, EngineConfig, PatternFormatter, RenderError, Renderer,
};
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::columns::{CellValue, ColumnSpec};
use crate::{naming, ExportArtifact};

/// Excel's column limit per worksheet
const MAX_COLUMNS: usize = 16_384;

/// Excel attendance report renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer<F = PatternFormatter> {
    /// Currency label in money number formats
    pub currency: String,
    /// Text written in attended cells
    pub marker: String,
    /// Overrides the scope-derived column layout
    pub columns: Option<ColumnSpec>,
    /// Formats date headers and check-in/check-out cells
    formatter: F,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            currency: "TL".into(),
            marker: "✓".into(),
            columns: None,
            formatter: PatternFormatter::default(),
        }
    }
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take currency, marker and date pattern from the engine configuration
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            currency: config.currency.clone(),
            marker: config.marker.clone(),
            columns: None,
            formatter: PatternFormatter::new(config.date_format.clone()),
        }
    }
}

impl<F: DateFormatter> ExcelRenderer<F> {
    /// Set currency label
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Set attended-cell marker
    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Use a fixed column layout instead of deriving it from the scope
    pub fn columns(mut self, spec: ColumnSpec) -> Self {
        self.columns = Some(spec);
        self
    }

    /// Swap the date formatter
    pub fn formatter<G: DateFormatter>(self, formatter: G) -> ExcelRenderer<G> {
        ExcelRenderer {
            currency: self.currency,
            marker: self.marker,
            columns: self.columns,
            formatter,
        }
    }

    /// Render and name the artifact
    pub fn export(&self, report: &AttendanceReport) -> Result<ExportArtifact, RenderError> {
        Ok(ExportArtifact {
            file_name: naming::file_name(report, "xlsx"),
            sheet_name: naming::sheet_name(report),
            bytes: self.render_to_bytes(report)?,
        })
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, report: &AttendanceReport) -> Result<Vec<u8>, RenderError> {
        let spec = self
            .columns
            .clone()
            .unwrap_or_else(|| ColumnSpec::for_scope(&report.scope));

        let total_columns = spec.len() + report.dates.len();
        if total_columns > MAX_COLUMNS {
            return Err(RenderError::InvalidData(format!(
                "{total_columns} columns exceed the worksheet limit of {MAX_COLUMNS}"
            )));
        }

        let mut workbook = Workbook::new();
        let formats = self.create_formats();

        let sheet = workbook.add_worksheet();
        sheet
            .set_name(naming::sheet_name(report))
            .map_err(|e| RenderError::Format(e.to_string()))?;

        self.write_headers(sheet, report, &spec, &formats)?;
        self.write_rows(sheet, report, &spec, &formats)?;

        // Keep headers and guest details visible while scrolling the grid
        sheet.set_freeze_panes(1, spec.len() as u16).ok();

        workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))
    }

    /// Create reusable formats
    fn create_formats(&self) -> ExcelFormats {
        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap()
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let date_header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_rotation(90)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let money_pattern = format!("#,##0.00 \"{}\"", self.currency);

        let band = |odd: bool| {
            let f = Format::new().set_border(FormatBorder::Thin);
            if odd {
                f.set_background_color(0xDDEBF7) // Light blue
            } else {
                f
            }
        };

        let row_formats = |odd: bool| RowFormats {
            text: band(odd),
            money: band(odd).set_num_format(&money_pattern),
            integer: band(odd).set_num_format("0").set_align(FormatAlign::Center),
            date: band(odd).set_align(FormatAlign::Center),
            mark: band(odd).set_bold().set_align(FormatAlign::Center),
            empty: band(odd),
        };

        ExcelFormats {
            header,
            date_header,
            even: row_formats(false),
            odd: row_formats(true),
        }
    }

    fn write_headers(
        &self,
        sheet: &mut Worksheet,
        report: &AttendanceReport,
        spec: &ColumnSpec,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        for (col, column) in spec.columns.iter().enumerate() {
            let col = col as u16;
            sheet
                .write_with_format(0, col, column.header(), &formats.header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet.set_column_width(col, column.width()).ok();
        }

        let first_date_col = spec.len();
        for (i, date) in report.dates.iter().enumerate() {
            let col = (first_date_col + i) as u16;
            let label = self.formatter.format_date(*date);
            sheet
                .write_with_format(0, col, label.as_str(), &formats.date_header)
                .map_err(|e| RenderError::Format(e.to_string()))?;
            sheet.set_column_width(col, spec.date_width).ok();
        }

        // Rotated date labels need a taller header
        if !report.dates.is_empty() {
            sheet.set_row_height(0, 70).ok();
        }
        Ok(())
    }

    fn write_rows(
        &self,
        sheet: &mut Worksheet,
        report: &AttendanceReport,
        spec: &ColumnSpec,
        formats: &ExcelFormats,
    ) -> Result<(), RenderError> {
        let first_date_col = spec.len();

        for (i, row) in report.rows.iter().enumerate() {
            let excel_row = (i + 1) as u32;
            let f = if i % 2 == 1 { &formats.odd } else { &formats.even };

            for (col, column) in spec.columns.iter().enumerate() {
                let col = col as u16;
                let result = match column.value(row) {
                    CellValue::Text(s) => sheet.write_with_format(excel_row, col, s.as_str(), &f.text),
                    CellValue::Money(amount) => {
                        let value = amount.to_f64().ok_or_else(|| {
                            RenderError::InvalidData(format!("amount {amount} is not representable"))
                        })?;
                        sheet.write_with_format(excel_row, col, value, &f.money)
                    }
                    CellValue::Integer(n) => sheet.write_with_format(excel_row, col, n as f64, &f.integer),
                    CellValue::Date(d) => {
                        let label = self.formatter.format_date(d);
                        sheet.write_with_format(excel_row, col, label.as_str(), &f.date)
                    }
                };
                result.map_err(|e| RenderError::Format(e.to_string()))?;
            }

            for (j, attended) in row.attendance.iter().enumerate() {
                let col = (first_date_col + j) as u16;
                let result = if *attended {
                    sheet.write_with_format(excel_row, col, self.marker.as_str(), &f.mark)
                } else {
                    sheet.write_blank(excel_row, col, &f.empty)
                };
                result.map_err(|e| RenderError::Format(e.to_string()))?;
            }
        }
        Ok(())
    }
}

/// Reusable Excel formats
struct ExcelFormats {
    header: Format,
    date_header: Format,
    // Alternating row banding
    even: RowFormats,
    odd: RowFormats,
}

struct RowFormats {
    text: Format,
    money: Format,
    integer: Format,
    date: Format,
    mark: Format,
    empty: Format,
}

impl<F: DateFormatter> Renderer for ExcelRenderer<F> {
    type Output = Vec<u8>;

    fn render(&self, report: &AttendanceReport) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(report)
    }
}

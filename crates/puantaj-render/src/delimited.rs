//! CSV attendance report renderer
//!
//! Same layout as the XLSX export, flattened to text. Money is written with
//! two decimals and no currency label; dates go through the formatter.

use puantaj_core::{
    AttendanceReport, DateFormatter, EngineConfig, PatternFormatter, RenderError, Renderer,
};

use crate::columns::ColumnSpec;
use crate::{naming, ExportArtifact};

/// CSV renderer
#[derive(Clone, Debug)]
pub struct CsvRenderer<F = PatternFormatter> {
    /// Field separator; `;` suits spreadsheet apps in comma-decimal locales
    pub delimiter: u8,
    pub marker: String,
    pub columns: Option<ColumnSpec>,
    formatter: F,
}

impl Default for CsvRenderer {
    fn default() -> Self {
        Self {
            delimiter: b',',
            marker: "✓".into(),
            columns: None,
            formatter: PatternFormatter::default(),
        }
    }
}

impl CsvRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            marker: config.marker.clone(),
            formatter: PatternFormatter::new(config.date_format.clone()),
            ..Self::default()
        }
    }
}

impl<F: DateFormatter> CsvRenderer<F> {
    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn columns(mut self, spec: ColumnSpec) -> Self {
        self.columns = Some(spec);
        self
    }

    pub fn formatter<G: DateFormatter>(self, formatter: G) -> CsvRenderer<G> {
        CsvRenderer {
            delimiter: self.delimiter,
            marker: self.marker,
            columns: self.columns,
            formatter,
        }
    }

    pub fn export(&self, report: &AttendanceReport) -> Result<ExportArtifact, RenderError> {
        Ok(ExportArtifact {
            file_name: naming::file_name(report, "csv"),
            sheet_name: naming::sheet_name(report),
            bytes: self.render_to_bytes(report)?,
        })
    }

    pub fn render_to_bytes(&self, report: &AttendanceReport) -> Result<Vec<u8>, RenderError> {
        let spec = self
            .columns
            .clone()
            .unwrap_or_else(|| ColumnSpec::for_scope(&report.scope));

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        let header: Vec<String> = spec
            .headers()
            .map(str::to_string)
            .chain(report.dates.iter().map(|d| self.formatter.format_date(*d)))
            .collect();
        writer
            .write_record(&header)
            .map_err(|e| RenderError::Format(e.to_string()))?;

        for row in &report.rows {
            let fields: Vec<String> = spec
                .columns
                .iter()
                .map(|c| c.value(row).display(&self.formatter))
                .chain(row.attendance.iter().map(|attended| {
                    if *attended {
                        self.marker.clone()
                    } else {
                        String::new()
                    }
                }))
                .collect();
            writer
                .write_record(&fields)
                .map_err(|e| RenderError::Format(e.to_string()))?;
        }

        writer
            .into_inner()
            .map_err(|e| RenderError::Format(e.to_string()))
    }
}

impl<F: DateFormatter> Renderer for CsvRenderer<F> {
    type Output = Vec<u8>;

    fn render(&self, report: &AttendanceReport) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(report)
    }
}

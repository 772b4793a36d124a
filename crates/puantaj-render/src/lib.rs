//! # puantaj-render
//!
//! Export backends for attendance reports.
//!
//! This crate provides:
//! - Excel workbooks (the format back-office users download)
//! - CSV for spreadsheet imports and diffing
//! - A plain-text preview for terminals
//! - The shared column layout ([`columns`]) and deterministic naming ([`naming`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use puantaj_core::Renderer;
//! use puantaj_render::{CsvRenderer, ExcelRenderer, TextRenderer};
//!
//! // Excel workbook plus its file and sheet names
//! let artifact = ExcelRenderer::new().currency("EUR").export(&report)?;
//! std::fs::write(&artifact.file_name, &artifact.bytes)?;
//!
//! // CSV with a semicolon separator
//! let csv = CsvRenderer::new().delimiter(b';').render(&report)?;
//!
//! // Terminal preview
//! println!("{}", TextRenderer::new().render(&report)?);
//! ```

pub mod columns;
pub mod delimited;
pub mod excel;
pub mod naming;
pub mod text;

pub use columns::{CellValue, Column, ColumnSpec};
pub use delimited::CsvRenderer;
pub use excel::ExcelRenderer;
pub use text::TextRenderer;

/// A rendered report, ready to hand to a download or file writer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Deterministic file name derived from scope and window
    pub file_name: String,
    /// Worksheet title (also useful as a display title)
    pub sheet_name: String,
    pub bytes: Vec<u8>,
}

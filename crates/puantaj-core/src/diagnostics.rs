//! Per-record diagnostics
//!
//! A report never fails because of one bad record. Problems found while
//! validating, selecting or assembling are collected as [`Diagnostic`]s and
//! returned next to the report so the caller can show them.
//!
//! | Code | Severity | Record dropped |
//! |------|----------|----------------|
//! | W001 | Warning  | yes (unparseable date) |
//! | W002 | Warning  | yes (check-out before check-in) |
//! | W003 | Warning  | yes (duplicate id) |
//! | H001 | Hint     | no (supplied nights differ) |
//! | H002 | Hint     | no (supplied total differs) |
//! | I001 | Info     | n/a (empty selection) |

use serde::{Deserialize, Serialize};

use crate::RecordId;

/// How serious a diagnostic is
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Hint,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Hint => "hint",
            Severity::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable diagnostic codes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    W001UnparseableDate,
    W002InvertedStay,
    W003DuplicateRecordId,
    /// `nightly_rate × nights` does not fit a decimal
    W004RateOverflow,
    W005NegativeRate,
    H001NightsMismatch,
    H002TotalRateMismatch,
    I001EmptySelection,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::W001UnparseableDate => "W001",
            DiagnosticCode::W002InvertedStay => "W002",
            DiagnosticCode::W003DuplicateRecordId => "W003",
            DiagnosticCode::W004RateOverflow => "W004",
            DiagnosticCode::W005NegativeRate => "W005",
            DiagnosticCode::H001NightsMismatch => "H001",
            DiagnosticCode::H002TotalRateMismatch => "H002",
            DiagnosticCode::I001EmptySelection => "I001",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticCode::W001UnparseableDate
            | DiagnosticCode::W002InvertedStay
            | DiagnosticCode::W003DuplicateRecordId
            | DiagnosticCode::W004RateOverflow
            | DiagnosticCode::W005NegativeRate => Severity::Warning,
            DiagnosticCode::H001NightsMismatch | DiagnosticCode::H002TotalRateMismatch => {
                Severity::Hint
            }
            DiagnosticCode::I001EmptySelection => Severity::Info,
        }
    }

    /// Whether the affected record was left out of the report
    pub fn drops_record(&self) -> bool {
        matches!(self.severity(), Severity::Warning | Severity::Error)
    }
}

/// One finding about one record (or about the selection as a whole)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub record_id: Option<RecordId>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: code.severity(),
            record_id: None,
            message: message.into(),
        }
    }

    pub fn for_record(code: DiagnosticCode, record_id: impl Into<RecordId>, message: impl Into<String>) -> Self {
        Self {
            record_id: Some(record_id.into()),
            ..Self::new(code, message)
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: ", self.severity, self.code.as_str())?;
        if let Some(id) = &self.record_id {
            write!(f, "record '{}': ", id)?;
        }
        f.write_str(&self.message)
    }
}

//! # puantaj-core
//!
//! Core domain model and traits for the puantaj occupancy reporting engine.
//!
//! This crate provides:
//! - Domain types: `StayRecord`, `ReportRequest`, `Scope`, `AttendanceReport`
//! - Raw input parsing: `RecordInput` → `StayRecord`
//! - Calendar-day utilities and the `DateFormatter` seam ([`dates`])
//! - Per-record diagnostics ([`diagnostics`]) and engine configuration ([`config`])
//! - The `Renderer` trait and error types
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use puantaj_core::{ReportRequest, StayRecord};
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
//! let stay = StayRecord::new("r1", d(1), d(3))
//!     .guest("Ayşe Yılmaz")
//!     .organization("Acme Corp")
//!     .hotel("Grand Hotel");
//! assert_eq!(stay.nights(), 2);
//!
//! let request = ReportRequest::new().organization_filter("acme");
//! assert!(request.matches_organization(&stay));
//! ```

pub mod config;
pub mod dates;
pub mod diagnostics;

pub use config::{ConfigError, EngineConfig};
pub use dates::{DateFormatter, DateWindow, PatternFormatter};
pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a stay record
pub type RecordId = String;

// ============================================================================
// Stay Record
// ============================================================================

/// One guest's hotel stay, validated and typed.
///
/// Owned by the record store; the engine only reads it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayRecord {
    pub id: RecordId,
    pub guest_name: String,
    pub title: String,
    /// Billing counterpart
    pub institution: Option<String>,
    pub organization_id: Option<String>,
    /// Absent for individual (unaffiliated) stays
    pub organization: Option<String>,
    pub hotel_name: String,
    pub room_type: String,
    pub board_type: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nightly_rate: Decimal,
    pub total_rate: Option<Decimal>,
    /// Nights as stored upstream; the engine recomputes its own value
    pub stored_nights: Option<i64>,
    /// Displayed verbatim
    pub invoiced: String,
}

impl StayRecord {
    pub fn new(id: impl Into<RecordId>, check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self {
            id: id.into(),
            guest_name: String::new(),
            title: String::new(),
            institution: None,
            organization_id: None,
            organization: None,
            hotel_name: String::new(),
            room_type: String::new(),
            board_type: String::new(),
            check_in,
            check_out,
            nightly_rate: Decimal::ZERO,
            total_rate: None,
            stored_nights: None,
            invoiced: String::new(),
        }
    }

    pub fn guest(mut self, name: impl Into<String>) -> Self {
        self.guest_name = name.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn institution(mut self, name: impl Into<String>) -> Self {
        self.institution = Some(name.into());
        self
    }

    pub fn organization(mut self, name: impl Into<String>) -> Self {
        self.organization = Some(name.into());
        self
    }

    pub fn organization_id(mut self, id: impl Into<String>) -> Self {
        self.organization_id = Some(id.into());
        self
    }

    pub fn hotel(mut self, name: impl Into<String>) -> Self {
        self.hotel_name = name.into();
        self
    }

    pub fn room(mut self, room_type: impl Into<String>, board_type: impl Into<String>) -> Self {
        self.room_type = room_type.into();
        self.board_type = board_type.into();
        self
    }

    pub fn nightly_rate(mut self, rate: Decimal) -> Self {
        self.nightly_rate = rate;
        self
    }

    pub fn total_rate(mut self, total: Decimal) -> Self {
        self.total_rate = Some(total);
        self
    }

    pub fn stored_nights(mut self, nights: i64) -> Self {
        self.stored_nights = Some(nights);
        self
    }

    pub fn invoiced(mut self, flag: impl Into<String>) -> Self {
        self.invoiced = flag.into();
        self
    }

    /// Nights occupied: `max(0, check_out - check_in)`
    pub fn nights(&self) -> i64 {
        dates::days_between(self.check_in, self.check_out).max(0)
    }

    /// Whether the guest occupies the room on the night of `date`.
    ///
    /// Half-open: the check-in day counts, the check-out day does not.
    pub fn occupies(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }

    /// Reject inverted stays and negative rates.
    pub fn validate(&self) -> Result<(), RecordIssue> {
        if self.check_out < self.check_in {
            return Err(RecordIssue::InvertedStay {
                check_in: self.check_in,
                check_out: self.check_out,
            });
        }
        if self.nightly_rate < Decimal::ZERO {
            return Err(RecordIssue::NegativeRate {
                field: "nightlyRate",
                value: self.nightly_rate,
            });
        }
        if let Some(total) = self.total_rate.filter(|t| *t < Decimal::ZERO) {
            return Err(RecordIssue::NegativeRate {
                field: "totalRate",
                value: total,
            });
        }
        Ok(())
    }
}

// ============================================================================
// Raw Input
// ============================================================================

/// A stay record as it arrives from the record store, dates still text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordInput {
    pub id: String,
    pub guest_name: String,
    pub title: String,
    #[serde(alias = "institutionOrAccountName")]
    pub institution: Option<String>,
    pub organization_id: Option<String>,
    #[serde(alias = "organizationName")]
    pub organization: Option<String>,
    pub hotel_name: String,
    pub room_type: String,
    pub board_type: String,
    pub check_in: String,
    pub check_out: String,
    pub nightly_rate: Decimal,
    pub total_rate: Option<Decimal>,
    pub nights: Option<i64>,
    pub invoiced: String,
}

impl RecordInput {
    /// Parse the date fields, producing a typed record.
    ///
    /// Blank optional text fields are normalised to `None`.
    pub fn parse(self) -> Result<StayRecord, RecordIssue> {
        let check_in = parse_field("checkIn", &self.check_in)?;
        let check_out = parse_field("checkOut", &self.check_out)?;

        Ok(StayRecord {
            id: self.id,
            guest_name: self.guest_name,
            title: self.title,
            institution: non_blank(self.institution),
            organization_id: non_blank(self.organization_id),
            organization: non_blank(self.organization),
            hotel_name: self.hotel_name,
            room_type: self.room_type,
            board_type: self.board_type,
            check_in,
            check_out,
            nightly_rate: self.nightly_rate,
            total_rate: self.total_rate,
            stored_nights: self.nights,
            invoiced: self.invoiced,
        })
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<NaiveDate, RecordIssue> {
    dates::parse_date(value).ok_or_else(|| RecordIssue::UnparseableDate {
        field,
        value: value.to_string(),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

// ============================================================================
// Request
// ============================================================================

/// Which slice of the tenant's records the caller handed over.
///
/// The engine is scope-agnostic; the scope only drives labelling (column
/// set, file name, sheet name) and lets callers pre-filter with [`Scope::admits`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    #[default]
    All,
    ByOrganization { id: String, name: String },
    /// Stays with no organization ("individual" stays)
    Unaffiliated,
}

impl Scope {
    pub fn organization(id: impl Into<String>, name: impl Into<String>) -> Self {
        Scope::ByOrganization {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            Scope::All => "All",
            Scope::ByOrganization { name, .. } => name,
            Scope::Unaffiliated => "Individual",
        }
    }

    /// Whether records in this scope can carry differing organizations
    pub fn shows_organization(&self) -> bool {
        matches!(self, Scope::All)
    }

    /// Scope pre-filter for callers that hold the whole tenant's records.
    pub fn admits(&self, record: &StayRecord) -> bool {
        self.admits_organization(record.organization_id.as_deref(), record.organization.as_deref())
    }

    /// Scope test on bare organization fields, for records not yet parsed.
    ///
    /// Blank values count as absent. An organization id, when present,
    /// takes precedence over the name.
    pub fn admits_organization(&self, org_id: Option<&str>, org_name: Option<&str>) -> bool {
        let org_id = org_id.map(str::trim).filter(|s| !s.is_empty());
        let org_name = org_name.map(str::trim).filter(|s| !s.is_empty());
        match self {
            Scope::All => true,
            Scope::Unaffiliated => org_id.is_none() && org_name.is_none(),
            Scope::ByOrganization { id, name } => match org_id {
                Some(record_org) => record_org == id,
                None => org_name == Some(name.as_str()),
            },
        }
    }
}

/// What the caller asks for
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    /// Case-insensitive substring of the organization name
    pub organization_filter: Option<String>,
    pub window_start: Option<NaiveDate>,
    pub window_end: Option<NaiveDate>,
    pub scope: Scope,
    /// Bound the date columns by the effective window instead of the data union
    pub clip_to_window: bool,
}

impl ReportRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn organization_filter(mut self, filter: impl Into<String>) -> Self {
        self.organization_filter = Some(filter.into());
        self
    }

    pub fn window(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.window_start = Some(start);
        self.window_end = Some(end);
        self
    }

    pub fn window_start(mut self, start: NaiveDate) -> Self {
        self.window_start = Some(start);
        self
    }

    pub fn window_end(mut self, end: NaiveDate) -> Self {
        self.window_end = Some(end);
        self
    }

    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn clip_to_window(mut self) -> Self {
        self.clip_to_window = true;
        self
    }

    /// The filter, trimmed and case-folded; `None` when absent or blank.
    pub fn normalized_filter(&self) -> Option<String> {
        self.organization_filter
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_lowercase)
    }

    /// Organization filter test. Records without an organization never
    /// match a non-empty filter.
    pub fn matches_organization(&self, record: &StayRecord) -> bool {
        match self.normalized_filter() {
            None => true,
            Some(needle) => record
                .organization
                .as_deref()
                .is_some_and(|org| org.to_lowercase().contains(&needle)),
        }
    }
}

// ============================================================================
// Report
// ============================================================================

/// One matrix row: a selected record plus its derived fields
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    pub record: StayRecord,
    pub nights: i64,
    /// Supplied total when positive, otherwise `nightly_rate × nights`
    pub total_rate: Decimal,
    /// Aligned with [`AttendanceReport::dates`]
    pub attendance: Vec<bool>,
}

impl AttendanceRow {
    /// Dates this row is marked attended on
    pub fn attended_dates<'a>(&'a self, dates: &'a [NaiveDate]) -> impl Iterator<Item = NaiveDate> + 'a {
        dates
            .iter()
            .zip(&self.attendance)
            .filter_map(|(date, attended)| attended.then_some(*date))
    }
}

/// The computed attendance matrix
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReport {
    pub scope: Scope,
    /// Effective window; `None` when there was no data to infer it from
    pub window: Option<DateWindow>,
    /// Date universe, ascending and de-duplicated
    pub dates: Vec<NaiveDate>,
    /// Sorted by check-in, then id
    pub rows: Vec<AttendanceRow>,
    /// Normalised organization filter the rows were selected with
    #[serde(default)]
    pub organization_filter: Option<String>,
}

impl AttendanceReport {
    pub fn empty(scope: Scope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows attended on each date column
    ///
    /// A row whose attendance vector is shorter than `dates` counts as
    /// absent on the missing columns.
    pub fn occupancy_per_date(&self) -> Vec<usize> {
        (0..self.dates.len())
            .map(|col| {
                self.rows
                    .iter()
                    .filter(|r| r.attendance.get(col).copied().unwrap_or(false))
                    .count()
            })
            .collect()
    }

    /// Sum of row totals; `None` if it does not fit a decimal
    pub fn total_amount(&self) -> Option<Decimal> {
        self.rows
            .iter()
            .try_fold(Decimal::ZERO, |acc, r| acc.checked_add(r.total_rate))
    }
}

/// A report plus everything that went wrong on the way
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    pub report: AttendanceReport,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReportOutcome {
    /// Diagnostics for records that were left out
    pub fn dropped(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.code.drops_record())
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Output rendering
pub trait Renderer {
    type Output;

    /// Render a report to the output format
    fn render(&self, report: &AttendanceReport) -> Result<Self::Output, RenderError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Why a single record was excluded
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RecordIssue {
    #[error("{field} '{value}' is not a valid date")]
    UnparseableDate { field: &'static str, value: String },

    #[error("check-out {check_out} is before check-in {check_in}")]
    InvertedStay {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },

    #[error("nightly rate {nightly_rate} × {nights} nights overflows")]
    RateOverflow { nightly_rate: Decimal, nights: i64 },

    #[error("{field} {value} is negative")]
    NegativeRate { field: &'static str, value: Decimal },
}

impl RecordIssue {
    pub fn code(&self) -> DiagnosticCode {
        match self {
            RecordIssue::UnparseableDate { .. } => DiagnosticCode::W001UnparseableDate,
            RecordIssue::InvertedStay { .. } => DiagnosticCode::W002InvertedStay,
            RecordIssue::RateOverflow { .. } => DiagnosticCode::W004RateOverflow,
            RecordIssue::NegativeRate { .. } => DiagnosticCode::W005NegativeRate,
        }
    }

    pub fn into_diagnostic(self, record_id: impl Into<RecordId>) -> Diagnostic {
        Diagnostic::for_record(self.code(), record_id, self.to_string())
    }
}

/// Request-level failure: the whole report is rejected
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("Report spans {span_days} days, above the ceiling of {ceiling} days")]
    UnboundedWindow { span_days: i64, ceiling: u32 },

    #[error("Report would contain {count} records, above the ceiling of {ceiling}")]
    TooManyRecords { count: usize, ceiling: usize },

    #[error("Window start {start} is after window end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}

/// Rendering error
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Format error: {0}")]
    Format(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

// ============================================================================
// Tests
// ============================================================================

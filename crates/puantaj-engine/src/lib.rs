//! # puantaj-engine
//!
//! Occupancy attendance-matrix ("puantaj") computation.
//!
//! This crate provides:
//! - Record selection with window inference ([`selector`])
//! - Date universe construction ([`universe`])
//! - Attendance matrix assembly ([`matrix`])
//! - [`ReportEngine`], which runs the pipeline under the configured ceilings
//!
//! The engine is pure: it reads a caller-supplied record collection and
//! returns an in-memory report. Per-record problems become diagnostics;
//! only request-level problems fail the call.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use puantaj_core::{ReportRequest, StayRecord};
//! use puantaj_engine::ReportEngine;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
//! let records = vec![
//!     StayRecord::new("1", d(1), d(3)),
//!     StayRecord::new("2", d(2), d(4)),
//! ];
//!
//! let outcome = ReportEngine::default().run(&records, &ReportRequest::new()).unwrap();
//! assert_eq!(outcome.report.dates.len(), 4);
//! assert_eq!(outcome.report.rows[0].attendance, vec![true, true, false, false]);
//! ```

pub mod matrix;
pub mod selector;
pub mod universe;

pub use matrix::{assemble, resolve_total_rate};
pub use selector::{select, Selection};
pub use universe::build_date_universe;

use puantaj_core::{
    AttendanceReport, DateWindow, Diagnostic, DiagnosticCode, EngineConfig, RecordInput,
    ReportError, ReportOutcome, ReportRequest, StayRecord,
};
use tracing::{debug, warn};

/// Attendance report engine
#[derive(Clone, Debug, Default)]
pub struct ReportEngine {
    config: EngineConfig,
}

impl ReportEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parse raw records, then run the report.
    ///
    /// Records with unparseable dates are dropped with a `W001` diagnostic.
    pub fn run_inputs(
        &self,
        inputs: Vec<RecordInput>,
        request: &ReportRequest,
    ) -> Result<ReportOutcome, ReportError> {
        let mut records = Vec::with_capacity(inputs.len());
        let mut diagnostics = Vec::new();

        for input in inputs {
            let id = input.id.clone();
            match input.parse() {
                Ok(record) => records.push(record),
                Err(issue) => {
                    warn!(record_id = %id, %issue, "dropping stay record");
                    diagnostics.push(issue.into_diagnostic(id));
                }
            }
        }

        let mut outcome = self.run(&records, request)?;
        diagnostics.append(&mut outcome.diagnostics);
        outcome.diagnostics = diagnostics;
        Ok(outcome)
    }

    /// Compute the attendance report for a pre-scoped record collection.
    pub fn run(
        &self,
        records: &[StayRecord],
        request: &ReportRequest,
    ) -> Result<ReportOutcome, ReportError> {
        let selection = select(records, request)?;
        let mut diagnostics = selection.diagnostics;

        if let Some(window) = &selection.window {
            self.check_span(window)?;
        }
        if selection.records.len() > self.config.max_records {
            return Err(ReportError::TooManyRecords {
                count: selection.records.len(),
                ceiling: self.config.max_records,
            });
        }

        if selection.records.is_empty() {
            diagnostics.push(Diagnostic::new(
                DiagnosticCode::I001EmptySelection,
                "no records match the scope, filter and window",
            ));
            let report = AttendanceReport {
                window: selection.window,
                organization_filter: request.normalized_filter(),
                ..AttendanceReport::empty(request.scope.clone())
            };
            return Ok(ReportOutcome {
                report,
                diagnostics,
            });
        }

        // Stays overlapping the window edges can reach past it
        let clip = selection.window.filter(|_| request.clip_to_window);
        let span = universe::universe_span(&selection.records).and_then(|span| match &clip {
            Some(w) => DateWindow::new(span.start.max(w.start), span.end.min(w.end)),
            None => Some(span),
        });
        if let Some(span) = &span {
            self.check_span(span)?;
        }

        let mut dates = build_date_universe(&selection.records);
        if let Some(window) = &clip {
            dates = universe::clip_to_window(dates, window);
        }

        let assembly = assemble(&selection.records, &dates);
        diagnostics.extend(assembly.diagnostics);

        debug!(
            rows = assembly.rows.len(),
            columns = dates.len(),
            diagnostics = diagnostics.len(),
            "attendance report assembled"
        );

        Ok(ReportOutcome {
            report: AttendanceReport {
                scope: request.scope.clone(),
                window: selection.window,
                dates,
                rows: assembly.rows,
                organization_filter: request.normalized_filter(),
            },
            diagnostics,
        })
    }

    fn check_span(&self, window: &DateWindow) -> Result<(), ReportError> {
        let span_days = window.span_days();
        if span_days > i64::from(self.config.max_window_days) {
            return Err(ReportError::UnboundedWindow {
                span_days,
                ceiling: self.config.max_window_days,
            });
        }
        Ok(())
    }
}

//! Attendance matrix assembly
//!
//! ## Inclusion rule
//!
//! A record is marked attended on date `d` iff `check_in <= d < check_out`.
//! The check-out day is never attended because the guest does not occupy
//! the room that night. A zero-night stay (`check_in == check_out`) is
//! attended on no date. This rule is applied to every scope.
//!
//! ## Derived fields
//!
//! - `nights = max(0, check_out - check_in)`
//! - `total_rate` = supplied total when positive, else `nightly_rate × nights`
//!
//! A record whose rate product does not fit a `Decimal` is rejected with
//! `W004` instead of aborting the report.

use chrono::NaiveDate;
use puantaj_core::{AttendanceRow, Diagnostic, DiagnosticCode, RecordIssue, StayRecord};
use rust_decimal::Decimal;
use tracing::warn;

/// Rows plus what was noticed while building them
#[derive(Clone, Debug, Default)]
pub struct Assembly {
    pub rows: Vec<AttendanceRow>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Build one row per record against the date universe.
///
/// Records are assumed sorted; row order follows record order. Invalid
/// records are rejected and reported, never coerced.
pub fn assemble(records: &[&StayRecord], dates: &[NaiveDate]) -> Assembly {
    let mut assembly = Assembly::default();

    for record in records {
        match build_row(record, dates) {
            Ok((row, hints)) => {
                assembly.rows.push(row);
                assembly.diagnostics.extend(hints);
            }
            Err(issue) => {
                warn!(record_id = %record.id, %issue, "rejecting stay record");
                assembly.diagnostics.push(issue.into_diagnostic(record.id.clone()));
            }
        }
    }

    assembly
}

/// Build a single row, returning hint diagnostics for suspicious values.
pub fn build_row(
    record: &StayRecord,
    dates: &[NaiveDate],
) -> Result<(AttendanceRow, Vec<Diagnostic>), RecordIssue> {
    record.validate()?;

    let nights = record.nights();
    let computed = computed_total(record, nights)?;
    let total_rate = match record.total_rate {
        Some(total) if total > Decimal::ZERO => total,
        _ => computed,
    };
    let attendance = dates.iter().map(|d| record.occupies(*d)).collect();

    let mut hints = Vec::new();
    if let Some(stored) = record.stored_nights {
        if stored != nights {
            hints.push(Diagnostic::for_record(
                DiagnosticCode::H001NightsMismatch,
                record.id.clone(),
                format!("stored nights {stored} differ from computed {nights}"),
            ));
        }
    }
    if let Some(supplied) = record.total_rate {
        if supplied > Decimal::ZERO && record.nightly_rate > Decimal::ZERO && supplied != computed {
            hints.push(Diagnostic::for_record(
                DiagnosticCode::H002TotalRateMismatch,
                record.id.clone(),
                format!("total {supplied} differs from nightly rate × nights = {computed}"),
            ));
        }
    }

    let row = AttendanceRow {
        record: record.clone(),
        nights,
        total_rate,
        attendance,
    };
    Ok((row, hints))
}

/// Supplied total when positive, otherwise `nightly_rate × nights`.
pub fn resolve_total_rate(record: &StayRecord, nights: i64) -> Result<Decimal, RecordIssue> {
    match record.total_rate {
        Some(total) if total > Decimal::ZERO => Ok(total),
        _ => computed_total(record, nights),
    }
}

fn computed_total(record: &StayRecord, nights: i64) -> Result<Decimal, RecordIssue> {
    record
        .nightly_rate
        .checked_mul(Decimal::from(nights))
        .ok_or(RecordIssue::RateOverflow {
            nightly_rate: record.nightly_rate,
            nights,
        })
}

//! Date universe construction
//!
//! The column set of a report is the union of every calendar day touched by
//! a selected stay, check-in through check-out inclusive. Days no record
//! touches never become columns, so a sparse report has no blank runs at
//! either end.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use puantaj_core::dates::day_range;
use puantaj_core::{DateWindow, StayRecord};

/// Sorted, de-duplicated union of every stay's `[check_in, check_out]` days.
pub fn build_date_universe(records: &[&StayRecord]) -> Vec<NaiveDate> {
    let mut days = BTreeSet::new();
    for record in records {
        days.extend(day_range(record.check_in, record.check_out));
    }
    days.into_iter().collect()
}

/// Bounding interval of the universe, without enumerating it.
///
/// Used to enforce the size ceiling before [`build_date_universe`] runs.
pub fn universe_span(records: &[&StayRecord]) -> Option<DateWindow> {
    let start = records.iter().map(|r| r.check_in).min()?;
    let end = records.iter().map(|r| r.check_out).max()?;
    DateWindow::new(start, end)
}

/// Keep only dates inside `window`.
pub fn clip_to_window(dates: Vec<NaiveDate>, window: &DateWindow) -> Vec<NaiveDate> {
    dates.into_iter().filter(|d| window.contains(*d)).collect()
}

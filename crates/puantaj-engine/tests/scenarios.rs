//! End-to-end report scenarios
//!
//! Each test feeds a small record set through `ReportEngine::run` and checks
//! the date universe, row order and attendance matrix.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use puantaj_core::{DateWindow, DiagnosticCode, ReportRequest, Scope, StayRecord};
use puantaj_engine::ReportEngine;
use rust_decimal_macros::dec;

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn jan(day: u32) -> NaiveDate {
    date(2024, 1, day)
}

// =============================================================================
// Overlapping stays
// =============================================================================

#[test]
fn two_overlapping_stays_without_filter_or_window() {
    let records = vec![
        StayRecord::new("1", jan(1), jan(3)),
        StayRecord::new("2", jan(2), jan(4)),
    ];

    let outcome = ReportEngine::default()
        .run(&records, &ReportRequest::new())
        .unwrap();
    let report = outcome.report;

    assert_eq!(report.dates, vec![jan(1), jan(2), jan(3), jan(4)]);
    assert_eq!(report.window, DateWindow::new(jan(1), jan(4)));
    assert_eq!(report.rows[0].record.id, "1");
    assert_eq!(report.rows[0].attendance, vec![true, true, false, false]);
    assert_eq!(report.rows[1].record.id, "2");
    assert_eq!(report.rows[1].attendance, vec![false, true, true, false]);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn occupancy_and_totals_over_the_matrix() {
    let records = vec![
        StayRecord::new("1", jan(1), jan(3)).nightly_rate(dec!(100)),
        StayRecord::new("2", jan(2), jan(4)).nightly_rate(dec!(150)),
    ];
    let report = ReportEngine::default()
        .run(&records, &ReportRequest::new())
        .unwrap()
        .report;

    assert_eq!(report.occupancy_per_date(), vec![1, 2, 1, 0]);
    assert_eq!(report.total_amount(), Some(dec!(500)));
    let attended: Vec<_> = report.rows[1].attended_dates(&report.dates).collect();
    assert_eq!(attended, vec![jan(2), jan(3)]);
}

// =============================================================================
// Organization filter
// =============================================================================

#[test]
fn organization_filter_selects_only_matching_name() {
    let records = vec![
        StayRecord::new("acme", jan(1), jan(2)).organization("Acme Corp"),
        StayRecord::new("other", jan(1), jan(2)).organization("Other"),
        StayRecord::new("none", jan(1), jan(2)),
    ];
    let request = ReportRequest::new().organization_filter("acme");

    let outcome = ReportEngine::default().run(&records, &request).unwrap();
    let ids: Vec<_> = outcome.report.rows.iter().map(|r| r.record.id.as_str()).collect();

    assert_eq!(ids, vec!["acme"]);
    assert!(outcome.diagnostics.is_empty());
}

#[test]
fn filter_matching_nothing_is_an_empty_report() {
    let records = vec![StayRecord::new("1", jan(1), jan(2)).organization("Other")];
    let request = ReportRequest::new().organization_filter("zzz");

    let outcome = ReportEngine::default().run(&records, &request).unwrap();
    assert!(outcome.report.rows.is_empty());
    assert!(outcome.report.dates.is_empty());
    assert_eq!(outcome.dropped().count(), 0);
}

// =============================================================================
// Invalid records
// =============================================================================

#[test]
fn inverted_stay_is_excluded_with_one_diagnostic() {
    let records = vec![
        StayRecord::new("good", jan(1), jan(3)),
        StayRecord::new("bad", jan(5), jan(2)),
        StayRecord::new("also-good", jan(2), jan(3)),
    ];

    let outcome = ReportEngine::default()
        .run(&records, &ReportRequest::new())
        .unwrap();

    let ids: Vec<_> = outcome.report.rows.iter().map(|r| r.record.id.as_str()).collect();
    assert_eq!(ids, vec!["good", "also-good"]);
    assert_eq!(outcome.report.dates, vec![jan(1), jan(2), jan(3)]);

    assert_eq!(outcome.diagnostics.len(), 1);
    let diag = &outcome.diagnostics[0];
    assert_eq!(diag.code, DiagnosticCode::W002InvertedStay);
    assert_eq!(diag.record_id.as_deref(), Some("bad"));
}

// =============================================================================
// Empty input
// =============================================================================

#[test]
fn empty_input_is_an_empty_report() {
    let outcome = ReportEngine::default()
        .run(&[], &ReportRequest::new().scope(Scope::All))
        .unwrap();

    assert!(outcome.report.dates.is_empty());
    assert!(outcome.report.rows.is_empty());
    assert_eq!(outcome.report.window, None);
    assert_eq!(outcome.diagnostics[0].code, DiagnosticCode::I001EmptySelection);
}

// =============================================================================
// Windows
// =============================================================================

#[test]
fn window_wider_than_data_keeps_data_columns() {
    let records = vec![StayRecord::new("1", jan(10), jan(12))];
    let request = ReportRequest::new().window(jan(1), jan(31));

    let report = ReportEngine::default().run(&records, &request).unwrap().report;
    assert_eq!(report.window, DateWindow::new(jan(1), jan(31)));
    assert_eq!(report.dates, vec![jan(10), jan(11), jan(12)]);
}

#[test]
fn stays_crossing_a_month_boundary() {
    let records = vec![
        StayRecord::new("1", jan(30), date(2024, 2, 2)),
        StayRecord::new("2", date(2024, 2, 1), date(2024, 2, 3)),
    ];
    let request = ReportRequest::new().window(date(2024, 2, 1), date(2024, 2, 29));

    let report = ReportEngine::default().run(&records, &request).unwrap().report;
    assert_eq!(
        report.dates,
        vec![jan(30), jan(31), date(2024, 2, 1), date(2024, 2, 2), date(2024, 2, 3)]
    );
    assert_eq!(report.rows[0].attendance, vec![true, true, true, false, false]);
    assert_eq!(report.rows[1].attendance, vec![false, false, true, true, false]);
}

#[test]
fn zero_night_stay_has_a_column_but_no_mark() {
    let records = vec![StayRecord::new("day-use", jan(5), jan(5)).nightly_rate(dec!(80))];
    let report = ReportEngine::default()
        .run(&records, &ReportRequest::new())
        .unwrap()
        .report;

    assert_eq!(report.dates, vec![jan(5)]);
    assert_eq!(report.rows[0].attendance, vec![false]);
    assert_eq!(report.rows[0].nights, 0);
    assert_eq!(report.rows[0].total_rate, dec!(0));
}

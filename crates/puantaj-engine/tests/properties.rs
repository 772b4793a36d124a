//! Property-based tests for selection, date universe and attendance rules

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use puantaj_core::dates::day_range;
use puantaj_core::{DateWindow, ReportRequest, StayRecord};
use puantaj_engine::{build_date_universe, select, ReportEngine};

fn base() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn day(offset: i64) -> NaiveDate {
    base() + Duration::days(offset)
}

/// Up to 20 stays starting within ~two months, 0-14 nights each.
/// Ids are unique; check-in collisions are frequent on purpose.
fn stays() -> impl Strategy<Value = Vec<StayRecord>> {
    prop::collection::vec((0i64..60, 0i64..15), 0..20).prop_map(|spans| {
        spans
            .into_iter()
            .enumerate()
            .map(|(i, (start, nights))| {
                StayRecord::new(format!("r{i:02}"), day(start), day(start + nights))
            })
            .collect()
    })
}

proptest! {
    /// Without a supplied window the effective window is [min check-in, max check-out]
    #[test]
    fn prop_window_inferred_from_data(records in stays()) {
        let selection = select(&records, &ReportRequest::new()).unwrap();
        let expected = match (
            records.iter().map(|r| r.check_in).min(),
            records.iter().map(|r| r.check_out).max(),
        ) {
            (Some(start), Some(end)) => DateWindow::new(start, end),
            _ => None,
        };
        prop_assert_eq!(selection.window, expected);
        // an inferred window covers every record
        prop_assert_eq!(selection.records.len(), records.len());
    }

    /// r is selected iff r.check_in <= w.end && r.check_out >= w.start
    #[test]
    fn prop_overlap_selection(
        records in stays(),
        start in -5i64..80,
        len in 0i64..30,
    ) {
        let window = DateWindow::new(day(start), day(start + len)).unwrap();
        let request = ReportRequest::new().window(window.start, window.end);
        let selection = select(&records, &request).unwrap();

        let selected: BTreeSet<_> = selection.records.iter().map(|r| r.id.clone()).collect();
        let expected: BTreeSet<_> = records
            .iter()
            .filter(|r| r.check_in <= window.end && r.check_out >= window.start)
            .map(|r| r.id.clone())
            .collect();
        prop_assert_eq!(selected, expected);
    }

    /// The universe is the sorted, duplicate-free union of every stay's days
    #[test]
    fn prop_universe_is_union_of_stay_days(records in stays()) {
        let refs: Vec<&StayRecord> = records.iter().collect();
        let universe = build_date_universe(&refs);

        let expected: Vec<NaiveDate> = records
            .iter()
            .flat_map(|r| day_range(r.check_in, r.check_out))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        prop_assert_eq!(&universe, &expected);
        prop_assert!(universe.windows(2).all(|w| w[0] < w[1]));
    }

    /// Attendance is marked iff check_in <= date < check_out
    #[test]
    fn prop_attendance_is_half_open(records in stays()) {
        let outcome = ReportEngine::default().run(&records, &ReportRequest::new()).unwrap();
        let report = outcome.report;

        for row in &report.rows {
            let r = &row.record;
            prop_assert_eq!(row.attendance.len(), report.dates.len());
            prop_assert_eq!(row.nights, (r.check_out - r.check_in).num_days());
            for (date, attended) in report.dates.iter().zip(&row.attendance) {
                prop_assert_eq!(*attended, r.check_in <= *date && *date < r.check_out);
                if *date == r.check_out {
                    prop_assert!(!attended);
                }
                if *date == r.check_in && r.check_out > r.check_in {
                    prop_assert!(attended);
                }
            }
            if r.check_in == r.check_out {
                prop_assert!(row.attendance.iter().all(|a| !a));
                prop_assert!(report.dates.contains(&r.check_in));
            }
        }
    }

    /// Same inputs give the same report, regardless of input order
    #[test]
    fn prop_report_is_deterministic(records in stays()) {
        let engine = ReportEngine::default();
        let first = engine.run(&records, &ReportRequest::new()).unwrap();
        let second = engine.run(&records, &ReportRequest::new()).unwrap();
        prop_assert_eq!(&first, &second);

        let mut reversed = records.clone();
        reversed.reverse();
        let third = engine.run(&reversed, &ReportRequest::new()).unwrap();
        prop_assert_eq!(&first.report, &third.report);

        let keys: Vec<_> = first.report.rows.iter().map(|r| (r.record.check_in, r.record.id.clone())).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }
}

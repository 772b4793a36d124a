//! Record selection
//!
//! Turns the caller's pre-scoped record collection into the ordered set of
//! records a report covers:
//!
//! 1. Drop invalid records (inverted stays, duplicate ids) with a diagnostic
//! 2. Resolve the effective window, inferring missing bounds from the data
//! 3. Keep records overlapping the window (closed interval, boundary-touching counts)
//! 4. Apply the organization filter
//! 5. Sort by check-in, ties broken by id

use std::collections::HashSet;

use puantaj_core::{
    DateWindow, Diagnostic, DiagnosticCode, ReportError, ReportRequest, StayRecord,
};
use tracing::{debug, warn};

/// Records in scope for a report
#[derive(Clone, Debug, Default)]
pub struct Selection<'a> {
    /// Sorted by `(check_in, id)`
    pub records: Vec<&'a StayRecord>,
    /// `None` when there was nothing to infer a window from
    pub window: Option<DateWindow>,
    /// Records dropped during validation
    pub diagnostics: Vec<Diagnostic>,
}

/// Select the records a report covers.
///
/// Only a caller-supplied window with `start > end` is a request-level
/// error; everything else degrades to a smaller (possibly empty) selection.
pub fn select<'a>(
    records: &'a [StayRecord],
    request: &ReportRequest,
) -> Result<Selection<'a>, ReportError> {
    let (valid, diagnostics) = validate(records);

    let Some(window) = effective_window(&valid, request)? else {
        debug!(records = valid.len(), "no effective window; selection is empty");
        return Ok(Selection {
            records: Vec::new(),
            window: None,
            diagnostics,
        });
    };

    let mut selected: Vec<&StayRecord> = valid
        .into_iter()
        .filter(|r| window.overlaps(r.check_in, r.check_out))
        .filter(|r| request.matches_organization(r))
        .collect();
    sort_records(&mut selected);

    debug!(%window, selected = selected.len(), "records selected");

    Ok(Selection {
        records: selected,
        window: Some(window),
        diagnostics,
    })
}

/// Split records into usable ones and diagnostics for the rest.
///
/// The first record with a given id wins; later duplicates are dropped.
pub fn validate(records: &[StayRecord]) -> (Vec<&StayRecord>, Vec<Diagnostic>) {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut valid = Vec::with_capacity(records.len());
    let mut diagnostics = Vec::new();

    for record in records {
        if let Err(issue) = record.validate() {
            warn!(record_id = %record.id, %issue, "dropping stay record");
            diagnostics.push(issue.into_diagnostic(record.id.clone()));
            continue;
        }
        if !seen.insert(record.id.as_str()) {
            warn!(record_id = %record.id, "dropping stay record with duplicate id");
            diagnostics.push(Diagnostic::for_record(
                DiagnosticCode::W003DuplicateRecordId,
                record.id.clone(),
                "another record with this id was already selected",
            ));
            continue;
        }
        valid.push(record);
    }

    (valid, diagnostics)
}

/// Resolve the window a report covers.
///
/// Supplied bounds are used verbatim; a missing bound is inferred as the
/// earliest check-in / latest check-out over `records`. Returns `Ok(None)`
/// when a bound is missing and there is no data, or when an inferred bound
/// falls on the wrong side of a supplied one.
pub fn effective_window(
    records: &[&StayRecord],
    request: &ReportRequest,
) -> Result<Option<DateWindow>, ReportError> {
    if let (Some(start), Some(end)) = (request.window_start, request.window_end) {
        return DateWindow::new(start, end)
            .map(Some)
            .ok_or(ReportError::InvalidWindow { start, end });
    }

    let start = request
        .window_start
        .or_else(|| records.iter().map(|r| r.check_in).min());
    let end = request
        .window_end
        .or_else(|| records.iter().map(|r| r.check_out).max());

    let window = match (start, end) {
        (Some(start), Some(end)) => DateWindow::new(start, end),
        _ => None,
    };
    if let Some(w) = &window {
        debug!(window = %w, "inferred report window");
    }
    Ok(window)
}

/// Ascending by check-in; same-day check-ins ordered by id
pub fn sort_records(records: &mut [&StayRecord]) {
    records.sort_by(|a, b| a.check_in.cmp(&b.check_in).then_with(|| a.id.cmp(&b.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn stay(id: &str, check_in: NaiveDate, check_out: NaiveDate) -> StayRecord {
        StayRecord::new(id, check_in, check_out)
    }

    fn ids(selection: &Selection<'_>) -> Vec<String> {
        selection.records.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn window_inferred_from_all_records() {
        let records = vec![
            stay("a", date(1, 5), date(1, 7)),
            stay("b", date(1, 2), date(1, 3)),
            stay("c", date(1, 4), date(1, 10)),
        ];
        let selection = select(&records, &ReportRequest::new()).unwrap();
        assert_eq!(selection.window, DateWindow::new(date(1, 2), date(1, 10)));
        assert_eq!(ids(&selection), vec!["b", "c", "a"]);
    }

    #[test]
    fn window_inferred_before_filter() {
        let records = vec![
            stay("a", date(1, 1), date(1, 3)).organization("Acme"),
            stay("b", date(1, 10), date(1, 20)).organization("Other"),
        ];
        let request = ReportRequest::new().organization_filter("acme");
        let selection = select(&records, &request).unwrap();
        assert_eq!(selection.window, DateWindow::new(date(1, 1), date(1, 20)));
        assert_eq!(ids(&selection), vec!["a"]);
    }

    #[test]
    fn supplied_window_used_verbatim() {
        let records = vec![
            stay("before", date(1, 1), date(1, 4)),
            stay("touch-start", date(1, 3), date(1, 5)),
            stay("inside", date(1, 6), date(1, 7)),
            stay("touch-end", date(1, 10), date(1, 12)),
            stay("after", date(1, 11), date(1, 12)),
        ];
        let request = ReportRequest::new().window(date(1, 5), date(1, 10));
        let selection = select(&records, &request).unwrap();
        assert_eq!(selection.window, DateWindow::new(date(1, 5), date(1, 10)));
        assert_eq!(ids(&selection), vec!["touch-start", "inside", "touch-end"]);
    }

    #[test]
    fn half_supplied_window_infers_the_other_side() {
        let records = vec![
            stay("a", date(1, 1), date(1, 3)),
            stay("b", date(1, 8), date(1, 12)),
        ];
        let request = ReportRequest::new().window_start(date(1, 5));
        let selection = select(&records, &request).unwrap();
        assert_eq!(selection.window, DateWindow::new(date(1, 5), date(1, 12)));
        assert_eq!(ids(&selection), vec!["b"]);
    }

    #[test]
    fn half_supplied_window_past_the_data_is_empty() {
        let records = vec![stay("a", date(1, 1), date(1, 3))];
        let request = ReportRequest::new().window_start(date(2, 1));
        let selection = select(&records, &request).unwrap();
        assert_eq!(selection.window, None);
        assert!(selection.records.is_empty());
    }

    #[test]
    fn inverted_supplied_window_is_rejected() {
        let request = ReportRequest::new().window(date(2, 1), date(1, 1));
        let err = select(&[], &request).unwrap_err();
        assert_eq!(
            err,
            ReportError::InvalidWindow {
                start: date(2, 1),
                end: date(1, 1)
            }
        );
    }

    #[test]
    fn empty_input_without_window() {
        let selection = select(&[], &ReportRequest::new()).unwrap();
        assert_eq!(selection.window, None);
        assert!(selection.records.is_empty());
        assert!(selection.diagnostics.is_empty());
    }

    #[test]
    fn same_day_check_ins_sorted_by_id() {
        let records = vec![
            stay("r3", date(1, 1), date(1, 2)),
            stay("r1", date(1, 1), date(1, 5)),
            stay("r2", date(1, 1), date(1, 3)),
        ];
        let selection = select(&records, &ReportRequest::new()).unwrap();
        assert_eq!(ids(&selection), vec!["r1", "r2", "r3"]);
    }

    #[test]
    fn inverted_and_duplicate_records_dropped() {
        let records = vec![
            stay("ok", date(1, 1), date(1, 3)),
            stay("bad", date(1, 5), date(1, 2)),
            stay("ok", date(1, 2), date(1, 4)),
        ];
        let selection = select(&records, &ReportRequest::new()).unwrap();
        assert_eq!(ids(&selection), vec!["ok"]);
        // the inverted stay does not stretch the inferred window
        assert_eq!(selection.window, DateWindow::new(date(1, 1), date(1, 3)));

        let codes: Vec<_> = selection.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::W002InvertedStay, DiagnosticCode::W003DuplicateRecordId]
        );
    }
}

//! Report column layout
//!
//! Every export format shares the same layout: a fixed run of descriptive
//! columns followed by one column per date in the universe.

use chrono::NaiveDate;
use puantaj_core::{AttendanceRow, DateFormatter, Scope};
use rust_decimal::Decimal;

/// Default width hint for date columns
pub const DATE_COLUMN_WIDTH: f64 = 5.0;

/// A descriptive (non-date) column
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    GuestName,
    Title,
    Institution,
    Organization,
    Hotel,
    RoomType,
    BoardType,
    Invoiced,
    NightlyRate,
    TotalRate,
    CheckIn,
    CheckOut,
    Nights,
}

impl Column {
    pub fn header(&self) -> &'static str {
        match self {
            Column::GuestName => "Guest",
            Column::Title => "Title",
            Column::Institution => "Institution / Account",
            Column::Organization => "Organization",
            Column::Hotel => "Hotel",
            Column::RoomType => "Room Type",
            Column::BoardType => "Board",
            Column::Invoiced => "Invoiced",
            Column::NightlyRate => "Nightly Rate",
            Column::TotalRate => "Total",
            Column::CheckIn => "Check-in",
            Column::CheckOut => "Check-out",
            Column::Nights => "Nights",
        }
    }

    /// Display width hint, in spreadsheet character units
    pub fn width(&self) -> f64 {
        match self {
            Column::GuestName | Column::Institution | Column::Organization => 25.0,
            Column::Hotel => 22.0,
            Column::Title => 8.0,
            Column::RoomType => 12.0,
            Column::BoardType => 10.0,
            Column::Invoiced => 9.0,
            Column::NightlyRate => 13.0,
            Column::TotalRate => 14.0,
            Column::CheckIn | Column::CheckOut => 12.0,
            Column::Nights => 8.0,
        }
    }

    pub fn value(&self, row: &AttendanceRow) -> CellValue {
        let r = &row.record;
        let text = |s: &str| CellValue::Text(s.to_string());
        match self {
            Column::GuestName => text(&r.guest_name),
            Column::Title => text(&r.title),
            Column::Institution => text(r.institution.as_deref().unwrap_or_default()),
            Column::Organization => text(r.organization.as_deref().unwrap_or_default()),
            Column::Hotel => text(&r.hotel_name),
            Column::RoomType => text(&r.room_type),
            Column::BoardType => text(&r.board_type),
            Column::Invoiced => text(&r.invoiced),
            Column::NightlyRate => CellValue::Money(r.nightly_rate),
            Column::TotalRate => CellValue::Money(row.total_rate),
            Column::CheckIn => CellValue::Date(r.check_in),
            Column::CheckOut => CellValue::Date(r.check_out),
            Column::Nights => CellValue::Integer(row.nights),
        }
    }
}

/// Typed cell content, so each backend can pick its own representation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Money(Decimal),
    Integer(i64),
    Date(NaiveDate),
}

impl CellValue {
    pub fn display(&self, formatter: &impl DateFormatter) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Money(amount) => format!("{amount:.2}"),
            CellValue::Integer(n) => n.to_string(),
            CellValue::Date(d) => formatter.format_date(*d),
        }
    }
}

/// Ordered descriptive columns plus the date column width
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnSpec {
    pub columns: Vec<Column>,
    pub date_width: f64,
}

impl ColumnSpec {
    /// Full layout including the organization column
    pub fn full() -> Self {
        Self {
            columns: vec![
                Column::GuestName,
                Column::Title,
                Column::Institution,
                Column::Organization,
                Column::Hotel,
                Column::RoomType,
                Column::BoardType,
                Column::Invoiced,
                Column::NightlyRate,
                Column::TotalRate,
                Column::CheckIn,
                Column::CheckOut,
                Column::Nights,
            ],
            date_width: DATE_COLUMN_WIDTH,
        }
    }

    /// Layout for a scope; the organization column only appears when rows
    /// can belong to different organizations.
    pub fn for_scope(scope: &Scope) -> Self {
        let mut spec = Self::full();
        if !scope.shows_organization() {
            spec.columns.retain(|c| *c != Column::Organization);
        }
        spec
    }

    pub fn date_width(mut self, width: f64) -> Self {
        self.date_width = width;
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(Column::header)
    }
}

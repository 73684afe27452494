//! Record normalizer: turns a [`RawTable`] into cleaned [`AttendanceRecord`]s.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, warn};

use crate::analyzers::calendar::display_year;
use crate::analyzers::classify::classify;
use crate::analyzers::types::{AttendanceRecord, MonthPeriod};
use crate::config::DashboardConfig;
use crate::parser::{Cell, RawTable};

/// Largest serial Excel can represent (9999-12-31).
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

/// Column positions resolved once per table.
struct ColumnIndex {
    employee_name: Option<usize>,
    department: Option<usize>,
    date: Option<usize>,
    check_in: Option<usize>,
    check_out: Option<usize>,
    exception: Option<usize>,
}

impl ColumnIndex {
    fn resolve(table: &RawTable, config: &DashboardConfig) -> Self {
        let columns = &config.columns;
        Self {
            employee_name: table.column(&columns.employee_name),
            department: table.column(&columns.department),
            date: table.column(&columns.date),
            check_in: table.column(&columns.check_in),
            check_out: table.column(&columns.check_out),
            exception: table.column(&columns.exception),
        }
    }
}

/// Cleans every row and derives year, month and category columns.
///
/// Rows whose date cell is unparsable or ambiguous are dropped; the caller
/// can compare lengths to count them. When the table has no date column at
/// all, every row is kept with `date = None`.
pub fn normalize(table: &RawTable, config: &DashboardConfig) -> Vec<AttendanceRecord> {
    let index = ColumnIndex::resolve(table, config);
    let vocab = &config.vocabulary;

    if index.date.is_none() {
        warn!(column = %config.columns.date, "Date column missing, date filters disabled");
    }
    if index.employee_name.is_none() {
        warn!(column = %config.columns.employee_name, "Employee name column missing");
    }

    let records: Vec<AttendanceRecord> = table
        .rows
        .iter()
        .filter_map(|row| {
            let cell = |col: Option<usize>| col.and_then(|i| row.get(i)).unwrap_or(&Cell::Empty);

            let date = match index.date {
                Some(_) => Some(parse_date(cell(index.date))?),
                None => None,
            };

            let employee_name = clean_or_placeholder(cell(index.employee_name), config);
            let department = clean_or_placeholder(cell(index.department), config);
            let exception_label = cell(index.exception)
                .to_text()
                .map(|s| collapse_whitespace(&s))
                .filter(|s| !vocab.is_missing(s))
                .unwrap_or_default();

            Some(AttendanceRecord {
                counts: classify(&exception_label, vocab),
                year: date.map(|d| display_year(d.year(), &config.calendar)),
                month_period: date.map(MonthPeriod::from_date),
                employee_name,
                department,
                date,
                check_in_time: parse_time(cell(index.check_in)),
                check_out_time: parse_time(cell(index.check_out)),
                exception_label,
            })
        })
        .collect();

    let dropped = table.rows.len() - records.len();
    if dropped > 0 {
        warn!(dropped, "Dropped rows with unparsable dates");
    }
    debug!(kept = records.len(), dropped, "Normalized attendance rows");

    records
}

/// Trims and collapses every whitespace run into a single space.
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn clean_or_placeholder(cell: &Cell, config: &DashboardConfig) -> String {
    let vocab = &config.vocabulary;
    cell.to_text()
        .map(|s| collapse_whitespace(&s))
        .filter(|s| !vocab.is_missing(s))
        .unwrap_or_else(|| vocab.unspecified.clone())
}

/// Permissive date parser. Returns `None` for unparsable or ambiguous input.
///
/// Accepts spreadsheet date cells, Excel serial numbers, `YYYY-MM-DD` and
/// `YYYY/MM/DD` (optionally followed by a time), and day-month-year forms
/// whose order can be told from the values (`25/03/2024` but not
/// `03/04/2024`, unless day and month are equal).
pub fn parse_date(cell: &Cell) -> Option<NaiveDate> {
    match cell {
        Cell::Empty => None,
        Cell::DateTime(dt) => Some(dt.date()),
        Cell::Number(serial) => from_excel_serial(*serial).map(|dt| dt.date()),
        Cell::Text(text) => parse_date_text(text.trim()),
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    // Drop a trailing time part: "2024-03-10 08:15:00", "2024-03-10T08:15:00".
    let date_part = text
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(text);

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date);
        }
    }

    let parts: Vec<&str> = date_part.split(['/', '-', '.']).collect();
    if parts.len() != 3 || parts[2].len() != 4 {
        return None;
    }
    let a: u32 = parts[0].parse().ok()?;
    let b: u32 = parts[1].parse().ok()?;
    let year: i32 = parts[2].parse().ok()?;

    let (day, month) = match (a > 12, b > 12) {
        (true, false) => (a, b),
        (false, true) => (b, a),
        (false, false) if a == b => (a, b),
        _ => return None,
    };
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parses a clock time, falling back to `00:00` when unparsable.
///
/// Accepts spreadsheet time cells, Excel day fractions, then `HH:MM:SS`,
/// then `HH:MM`.
pub fn parse_time(cell: &Cell) -> NaiveTime {
    let parsed = match cell {
        Cell::Empty => None,
        Cell::DateTime(dt) => Some(dt.time()),
        Cell::Number(fraction) if (0.0..1.0).contains(fraction) => {
            from_excel_serial(*fraction).map(|dt| dt.time())
        }
        Cell::Number(_) => None,
        Cell::Text(text) => {
            let text = text.trim();
            NaiveTime::parse_from_str(text, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
                .ok()
        }
    };
    parsed.unwrap_or(NaiveTime::MIN)
}

fn from_excel_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let seconds = (serial * 86_400.0).round() as i64;
    epoch.checked_add_signed(Duration::seconds(seconds))
}

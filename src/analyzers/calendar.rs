//! Regional calendar formatting for dates, years and month periods.

use chrono::{Datelike, NaiveDate};

use crate::analyzers::types::MonthPeriod;
use crate::config::CalendarConfig;

/// Civil year shifted into the configured era.
pub fn display_year(civil_year: i32, calendar: &CalendarConfig) -> i32 {
    civil_year + calendar.year_offset
}

/// `dd/mm/YYYY` with the era-shifted year, e.g. `10/03/2567`.
pub fn format_date(date: NaiveDate, calendar: &CalendarConfig) -> String {
    format!(
        "{:02}/{:02}/{}",
        date.day(),
        date.month(),
        display_year(date.year(), calendar)
    )
}

/// Month name followed by the era-shifted year, e.g. `มีนาคม 2567`.
pub fn format_month(period: MonthPeriod, calendar: &CalendarConfig) -> String {
    let name = (period.month as usize)
        .checked_sub(1)
        .and_then(|i| calendar.month_names.get(i))
        .map(String::as_str)
        .unwrap_or("?");
    format!("{} {}", name, display_year(period.year, calendar))
}

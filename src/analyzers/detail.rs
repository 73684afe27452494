use std::cmp::Reverse;

use crate::analyzers::types::{AttendanceRecord, Category, DetailRow, DetailView};
use crate::config::Vocabulary;

/// Placeholder clock time shown for full-day leave and absence.
const NO_CLOCK: &str = "00:00";

/// Lists one employee's records in `category`, newest first.
///
/// Records match when their label is in the category's label set. Full-day
/// leave and absence show `00:00 - 00:00` whatever times were stored. The
/// total sums day weights (or counts occurrences for tardiness).
pub fn detail<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
    employee_name: &str,
    category: Category,
    vocab: &Vocabulary,
) -> DetailView {
    let labels = vocab.labels_for(category);

    let mut matched: Vec<&AttendanceRecord> = records
        .into_iter()
        .filter(|r| r.employee_name == employee_name)
        .filter(|r| labels.contains(&r.exception_label.as_str()))
        .collect();
    matched.sort_by_key(|r| Reverse(r.date));

    let total = matched.iter().map(|r| r.counts.get(category)).sum();

    let rows = matched
        .into_iter()
        .map(|r| {
            let (check_in, check_out) = if vocab.is_full_day_leave(&r.exception_label) {
                (NO_CLOCK.to_string(), NO_CLOCK.to_string())
            } else {
                (
                    r.check_in_time.format("%H:%M").to_string(),
                    r.check_out_time.format("%H:%M").to_string(),
                )
            };
            DetailRow {
                date: r.date,
                check_in,
                check_out,
                exception_label: r.exception_label.clone(),
            }
        })
        .collect();

    DetailView {
        employee_name: employee_name.to_string(),
        category,
        rows,
        total,
    }
}

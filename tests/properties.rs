//! Property-based tests over randomly generated attendance tables.
//!
//! Properties covered:
//! 1. Every record lands in at most one category with a valid weight
//! 2. Summary totals equal the per-record totals
//! 3. Department filters partition the records
//! 4. Filters are idempotent and compose like a conjunction
//! 5. Rankings are stable and non-increasing
//! 6. Proportions add up to 100 within rounding

use attendance_dashboard::analyzers::aggregate::{Filters, aggregate};
use attendance_dashboard::analyzers::normalize::normalize;
use attendance_dashboard::analyzers::proportion::proportions;
use attendance_dashboard::analyzers::rank::rank;
use attendance_dashboard::analyzers::types::{AttendanceRecord, Category};
use attendance_dashboard::config::DashboardConfig;
use attendance_dashboard::parser::{Cell, RawTable};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["Anan Boon", " Anan  Boon", "Chai Dee", "Dara Em"];
const DEPARTMENTS: [&str; 4] = ["HR", "IT", "", "nan"];
const LABELS: [&str; 10] = [
    "",
    "sick-leave",
    "personal-leave-half-day",
    "sick-leave-half-day",
    "absent",
    "absent-half-day",
    "tardy",
    "vacation",
    "overtime",
    "missing",
];

fn row_strategy() -> impl Strategy<Value = Vec<Cell>> {
    (
        0..NAMES.len(),
        0..DEPARTMENTS.len(),
        2023i32..=2024,
        1u32..=12,
        1u32..=28,
        0..LABELS.len(),
    )
        .prop_map(|(name, dept, year, month, day, label)| {
            let text = |s: &str| {
                if s.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.to_string())
                }
            };
            vec![
                text(NAMES[name]),
                text(DEPARTMENTS[dept]),
                Cell::Text(format!("{year}-{month:02}-{day:02}")),
                text("08:00"),
                text("17:00"),
                text(LABELS[label]),
            ]
        })
}

fn records_strategy() -> impl Strategy<Value = Vec<AttendanceRecord>> {
    prop::collection::vec(row_strategy(), 0..40).prop_map(|rows| {
        let config = DashboardConfig::default();
        let table = RawTable {
            headers: ["employee_name", "department", "date", "check_in", "check_out", "exception"]
                .into_iter()
                .map(String::from)
                .collect(),
            rows,
        };
        normalize(&table, &config)
    })
}

fn total(records: &[AttendanceRecord], category: Category) -> f64 {
    records.iter().map(|r| r.counts.get(category)).sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_single_category_per_record(records in records_strategy()) {
        for record in &records {
            prop_assert!(record.counts.nonzero_categories() <= 1);
            for category in Category::ALL {
                let value = record.counts.get(category);
                prop_assert!(value == 0.0 || value == 0.5 || value == 1.0);
                if !category.is_day_based() {
                    prop_assert!(value != 0.5);
                }
            }
        }
    }

    #[test]
    fn prop_summary_totals_match_records(records in records_strategy()) {
        let aggregation = aggregate(&records, &Filters::default());

        for category in Category::ALL {
            let summed: f64 = aggregation.summary.iter().map(|s| s.counts.get(category)).sum();
            prop_assert_eq!(summed, total(&records, category));
        }
    }

    #[test]
    fn prop_department_filters_partition(records in records_strategy()) {
        let departments: std::collections::BTreeSet<&str> =
            records.iter().map(|r| r.department.as_str()).collect();

        let mut seen = 0;
        for department in departments {
            let filters = Filters::default().with_department(department);
            seen += aggregate(&records, &filters).records.len();
        }
        prop_assert_eq!(seen, records.len());
    }

    #[test]
    fn prop_filters_compose(records in records_strategy(), year in 2023i32..=2024) {
        let by_year = Filters::default().with_year(year);
        let by_department = Filters::default().with_department("IT");
        let both = Filters::default().with_year(year).with_department("IT");

        let first: Vec<AttendanceRecord> =
            aggregate(&records, &by_year).records.into_iter().cloned().collect();
        let chained = aggregate(&first, &by_department);
        let combined = aggregate(&records, &both);
        prop_assert_eq!(&chained.summary, &combined.summary);

        let reversed: Vec<AttendanceRecord> =
            aggregate(&records, &by_department).records.into_iter().cloned().collect();
        let swapped = aggregate(&reversed, &by_year);
        prop_assert_eq!(&swapped.summary, &combined.summary);

        let again = aggregate(&first, &by_year);
        prop_assert_eq!(again.records.len(), first.len());
    }

    #[test]
    fn prop_ranking_is_stable(records in records_strategy()) {
        let summary = aggregate(&records, &Filters::default()).summary;

        for category in Category::ALL {
            let ranked = rank(&summary, category);
            prop_assert_eq!(ranked.len(), summary.len());

            for (i, pair) in ranked.windows(2).enumerate() {
                prop_assert!(pair[0].value >= pair[1].value);
                prop_assert_eq!(pair[0].rank, i + 1);

                if pair[0].value == pair[1].value {
                    let position = |name: &str, dept: &str| {
                        summary
                            .iter()
                            .position(|s| s.employee_name == name && s.department == dept)
                    };
                    prop_assert!(
                        position(&pair[0].employee_name, &pair[0].department)
                            < position(&pair[1].employee_name, &pair[1].department)
                    );
                }
            }
        }
    }

    #[test]
    fn prop_proportions_sum_to_hundred(records in records_strategy()) {
        let summary = aggregate(&records, &Filters::default()).summary;
        let rows = proportions(&summary, &Category::ALL);

        let overall: f64 = Category::ALL.iter().map(|&c| total(&records, c)).sum();
        if overall == 0.0 {
            prop_assert!(rows.is_empty());
        } else {
            // Each share is rounded to one decimal, so the sum drifts by at
            // most 0.05 per category.
            let sum: f64 = rows.iter().map(|r| r.percentage).sum();
            let tolerance = 0.05 * rows.len() as f64 + 1e-9;
            prop_assert!((sum - 100.0).abs() <= tolerance, "sum was {}", sum);
            prop_assert!(rows.iter().all(|r| r.total > 0.0));
        }
    }
}

use crate::analyzers::types::{
    AttendanceRecord, CategoryCounts, EmployeeDepartmentSummary, MonthPeriod,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Equality filters over cleaned records. `None` passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    /// Era-shifted year, as stored in [`AttendanceRecord::year`].
    pub year: Option<i32>,
    pub month: Option<MonthPeriod>,
    pub department: Option<String>,
    pub employee_name: Option<String>,
}

impl Filters {
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_month(mut self, month: MonthPeriod) -> Self {
        self.month = Some(month);
        self
    }

    pub fn with_department(mut self, department: &str) -> Self {
        self.department = Some(department.to_string());
        self
    }

    pub fn with_employee(mut self, employee_name: &str) -> Self {
        self.employee_name = Some(employee_name.to_string());
        self
    }

    fn year_matches(&self, record: &AttendanceRecord) -> bool {
        self.year.is_none_or(|y| record.year == Some(y))
    }

    fn month_matches(&self, record: &AttendanceRecord) -> bool {
        self.month.is_none_or(|m| record.month_period == Some(m))
    }

    fn department_matches(&self, record: &AttendanceRecord) -> bool {
        self.department
            .as_deref()
            .is_none_or(|d| record.department == d)
    }

    fn employee_matches(&self, record: &AttendanceRecord) -> bool {
        self.employee_name
            .as_deref()
            .is_none_or(|e| record.employee_name == e)
    }

    /// Conjunction of every set filter, checked year → month → department → employee.
    pub fn matches(&self, record: &AttendanceRecord) -> bool {
        self.year_matches(record)
            && self.month_matches(record)
            && self.department_matches(record)
            && self.employee_matches(record)
    }
}

/// Filtered records and their per-(employee, department) summary.
#[derive(Debug, Clone)]
pub struct Aggregation<'a> {
    pub records: Vec<&'a AttendanceRecord>,
    pub summary: Vec<EmployeeDepartmentSummary>,
}

/// Restricts `records` to `filters` and summarizes the result.
///
/// Always recomputed from scratch; an empty selection yields an empty summary.
pub fn aggregate<'a>(records: &'a [AttendanceRecord], filters: &Filters) -> Aggregation<'a> {
    let filtered: Vec<&AttendanceRecord> = records.iter().filter(|r| filters.matches(r)).collect();
    let summary = summarize(filtered.iter().copied());

    debug!(
        total = records.len(),
        matched = filtered.len(),
        groups = summary.len(),
        "Aggregated attendance records"
    );

    Aggregation {
        records: filtered,
        summary,
    }
}

/// Groups records by (employee, department) and sums the four categories.
///
/// Groups come out ordered by employee name, then department.
pub fn summarize<'a>(
    records: impl IntoIterator<Item = &'a AttendanceRecord>,
) -> Vec<EmployeeDepartmentSummary> {
    let mut groups: BTreeMap<(&str, &str), CategoryCounts> = BTreeMap::new();

    for record in records {
        groups
            .entry((record.employee_name.as_str(), record.department.as_str()))
            .or_default()
            .add(&record.counts);
    }

    groups
        .into_iter()
        .map(|((employee_name, department), counts)| EmployeeDepartmentSummary {
            employee_name: employee_name.to_string(),
            department: department.to_string(),
            counts,
        })
        .collect()
}

/// Values offered by each filter given the filters selected before it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Newest first.
    pub years: Vec<i32>,
    /// Months of the selected year, oldest first.
    pub months: Vec<MonthPeriod>,
    /// Departments within the selected year and month.
    pub departments: Vec<String>,
    /// Employees within the selected year, month and department.
    pub employees: Vec<String>,
}

/// Computes cascading filter options: each level only lists values that
/// survive the filters above it.
pub fn filter_options(records: &[AttendanceRecord], filters: &Filters) -> FilterOptions {
    let years: BTreeSet<i32> = records.iter().filter_map(|r| r.year).collect();

    let by_year: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| filters.year_matches(r))
        .collect();
    let months: BTreeSet<MonthPeriod> = by_year.iter().filter_map(|r| r.month_period).collect();

    let by_month: Vec<&AttendanceRecord> = by_year
        .into_iter()
        .filter(|r| filters.month_matches(r))
        .collect();
    let departments: BTreeSet<&str> = by_month.iter().map(|r| r.department.as_str()).collect();

    let employees: BTreeSet<&str> = by_month
        .iter()
        .filter(|r| filters.department_matches(r))
        .map(|r| r.employee_name.as_str())
        .collect();

    FilterOptions {
        years: years.into_iter().rev().collect(),
        months: months.into_iter().collect(),
        departments: departments.into_iter().map(String::from).collect(),
        employees: employees.into_iter().map(String::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::Category;
    use chrono::{Datelike, NaiveDate, NaiveTime};

    fn record(
        name: &str,
        dept: &str,
        date: (i32, u32, u32),
        counts: CategoryCounts,
    ) -> AttendanceRecord {
        let date = NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap();
        AttendanceRecord {
            employee_name: name.to_string(),
            department: dept.to_string(),
            date: Some(date),
            check_in_time: NaiveTime::MIN,
            check_out_time: NaiveTime::MIN,
            exception_label: String::new(),
            year: Some(date.year()),
            month_period: Some(MonthPeriod::from_date(date)),
            counts,
        }
    }

    fn tardy() -> CategoryCounts {
        CategoryCounts::only(Category::Tardy, 1.0)
    }

    fn sample() -> Vec<AttendanceRecord> {
        vec![
            record("Somchai", "IT", (2024, 3, 1), tardy()),
            record("Anan", "HR", (2024, 3, 2), CategoryCounts::only(Category::Absent, 0.5)),
            record("Somchai", "IT", (2024, 4, 1), tardy()),
            record("Anan", "HR", (2023, 12, 5), CategoryCounts::only(Category::SickPersonal, 1.0)),
            record("Malee", "IT", (2024, 4, 9), CategoryCounts::default()),
        ]
    }

    #[test]
    fn test_tardy_rows_collapse_into_one_group() {
        let records = vec![
            record("Somchai", "IT", (2024, 3, 1), tardy()),
            record("Somchai", "IT", (2024, 3, 2), tardy()),
        ];
        let result = aggregate(&records, &Filters::default());

        assert_eq!(result.summary.len(), 1);
        assert_eq!(result.summary[0].counts.tardy_count, 2.0);
    }

    #[test]
    fn test_summary_ordered_by_key() {
        let records = sample();
        let result = aggregate(&records, &Filters::default());
        let names: Vec<_> = result.summary.iter().map(|s| s.employee_name.as_str()).collect();
        assert_eq!(names, vec!["Anan", "Malee", "Somchai"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let records = sample();
        let filters = Filters::default().with_year(2024).with_department("IT");
        let result = aggregate(&records, &filters);

        assert_eq!(result.records.len(), 3);
        assert!(result.records.iter().all(|r| r.department == "IT"));
    }

    #[test]
    fn test_month_filter() {
        let records = sample();
        let filters = Filters::default().with_month(MonthPeriod::new(2024, 3));
        let result = aggregate(&records, &filters);
        assert_eq!(result.records.len(), 2);
    }

    #[test]
    fn test_unknown_department_gives_empty_summary() {
        let records = sample();
        let result = aggregate(&records, &Filters::default().with_department("Finance"));
        assert!(result.records.is_empty());
        assert!(result.summary.is_empty());
    }

    #[test]
    fn test_year_filter_excludes_undated_records() {
        let mut records = sample();
        records[0].date = None;
        records[0].year = None;
        records[0].month_period = None;
        let result = aggregate(&records, &Filters::default().with_year(2024));
        assert_eq!(result.records.len(), 3);
        assert!(result.records.iter().all(|r| r.date.is_some()));
    }

    #[test]
    fn test_summary_sums_half_days() {
        let records = vec![
            record("Anan", "HR", (2024, 3, 2), CategoryCounts::only(Category::Absent, 0.5)),
            record("Anan", "HR", (2024, 3, 3), CategoryCounts::only(Category::Absent, 1.0)),
        ];
        let result = aggregate(&records, &Filters::default());
        assert_eq!(result.summary[0].counts.absent_days, 1.5);
    }

    #[test]
    fn test_cascading_filter_options() {
        let records = sample();

        let all = filter_options(&records, &Filters::default());
        assert_eq!(all.years, vec![2024, 2023]);
        assert_eq!(all.months.len(), 3);
        assert_eq!(all.departments, vec!["HR", "IT"]);
        assert_eq!(all.employees, vec!["Anan", "Malee", "Somchai"]);

        let narrowed = filter_options(
            &records,
            &Filters::default().with_year(2024).with_department("IT"),
        );
        assert_eq!(
            narrowed.months,
            vec![MonthPeriod::new(2024, 3), MonthPeriod::new(2024, 4)]
        );
        assert_eq!(narrowed.departments, vec!["HR", "IT"]);
        assert_eq!(narrowed.employees, vec!["Malee", "Somchai"]);
    }
}

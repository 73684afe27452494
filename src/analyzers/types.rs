//! Data types used by the aggregation pipeline.

use anyhow::{Context, bail};
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four exception categories tracked by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SickPersonal,
    Absent,
    Tardy,
    Vacation,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::SickPersonal,
        Category::Absent,
        Category::Tardy,
        Category::Vacation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SickPersonal => "sick_personal",
            Category::Absent => "absent",
            Category::Tardy => "tardy",
            Category::Vacation => "vacation",
        }
    }

    /// Day-based categories total day weights; tardiness counts occurrences.
    pub fn is_day_based(&self) -> bool {
        !matches!(self, Category::Tardy)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "sick_personal" | "sick" | "personal" => Ok(Category::SickPersonal),
            "absent" | "absence" => Ok(Category::Absent),
            "tardy" | "late" => Ok(Category::Tardy),
            "vacation" => Ok(Category::Vacation),
            other => bail!(
                "Unknown category: {}. Expected sick_personal, absent, tardy or vacation",
                other
            ),
        }
    }
}

/// Per-category values. A single record holds at most one nonzero value;
/// summaries hold sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub sick_personal_days: f64,
    pub absent_days: f64,
    pub tardy_count: f64,
    pub vacation_count: f64,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::SickPersonal => self.sick_personal_days,
            Category::Absent => self.absent_days,
            Category::Tardy => self.tardy_count,
            Category::Vacation => self.vacation_count,
        }
    }

    pub fn only(category: Category, value: f64) -> Self {
        let mut counts = Self::default();
        match category {
            Category::SickPersonal => counts.sick_personal_days = value,
            Category::Absent => counts.absent_days = value,
            Category::Tardy => counts.tardy_count = value,
            Category::Vacation => counts.vacation_count = value,
        }
        counts
    }

    pub fn add(&mut self, other: &CategoryCounts) {
        self.sick_personal_days += other.sick_personal_days;
        self.absent_days += other.absent_days;
        self.tardy_count += other.tardy_count;
        self.vacation_count += other.vacation_count;
    }

    pub fn nonzero_categories(&self) -> usize {
        Category::ALL.iter().filter(|c| self.get(**c) != 0.0).count()
    }
}

/// Year and month key used for monthly grouping (civil calendar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthPeriod {
    pub year: i32,
    pub month: u32,
}

impl MonthPeriod {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for MonthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthPeriod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .with_context(|| format!("Invalid month '{s}'. Expected YYYY-MM"))?;
        let year: i32 = year.parse().with_context(|| format!("Invalid year in '{s}'"))?;
        let month: u32 = month.parse().with_context(|| format!("Invalid month in '{s}'"))?;
        if !(1..=12).contains(&month) {
            bail!("Month out of range in '{}'", s);
        }
        Ok(Self { year, month })
    }
}

impl Serialize for MonthPeriod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthPeriod {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One cleaned attendance row with its derived columns.
///
/// Derived fields are computed once by the normalizer and never updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttendanceRecord {
    pub employee_name: String,
    pub department: String,
    /// `None` only when the dataset has no date column at all.
    pub date: Option<NaiveDate>,
    pub check_in_time: NaiveTime,
    pub check_out_time: NaiveTime,
    pub exception_label: String,

    /// Civil year shifted by the calendar offset.
    pub year: Option<i32>,
    pub month_period: Option<MonthPeriod>,
    pub counts: CategoryCounts,
}

/// Totals for one (employee, department) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeDepartmentSummary {
    pub employee_name: String,
    pub department: String,
    pub counts: CategoryCounts,
}

/// A summary row positioned by one category's total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    /// 1-based position after sorting.
    pub rank: usize,
    pub employee_name: String,
    pub department: String,
    pub value: f64,
}

/// Share of one category in the overall exception total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProportionRow {
    pub category: Category,
    pub total: f64,
    pub percentage: f64,
}

/// One line of an employee's detail view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRow {
    pub date: Option<NaiveDate>,
    pub check_in: String,
    pub check_out: String,
    pub exception_label: String,
}

impl DetailRow {
    pub fn time_period(&self) -> String {
        format!("{} - {}", self.check_in, self.check_out)
    }
}

/// All records of one employee in one category, newest first, with a total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailView {
    pub employee_name: String,
    pub category: Category,
    pub rows: Vec<DetailRow>,
    /// Sum of day weights, or the occurrence count for tardiness.
    pub total: f64,
}

//! Dashboard report: every projection the presentation layer needs for one
//! filter selection, bundled into a single serializable value.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::analyzers::aggregate::{FilterOptions, Filters, aggregate, filter_options};
use crate::analyzers::calendar::{format_date, format_month};
use crate::analyzers::detail::detail;
use crate::analyzers::normalize::normalize;
use crate::analyzers::proportion::proportions;
use crate::analyzers::rank::rank;
use crate::analyzers::types::{
    AttendanceRecord, Category, DetailView, EmployeeDepartmentSummary, MonthPeriod, ProportionRow,
    RankedRow,
};
use crate::config::DashboardConfig;
use crate::parser::RawTable;

/// Cleaned records of one loaded dataset.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<AttendanceRecord>,
    /// Rows present in the source.
    pub raw_rows: usize,
}

impl Dataset {
    pub fn from_table(table: &RawTable, config: &DashboardConfig) -> Self {
        Self {
            records: normalize(table, config),
            raw_rows: table.rows.len(),
        }
    }

    /// Rows excluded for an unparsable or ambiguous date.
    pub fn dropped_rows(&self) -> usize {
        self.raw_rows.saturating_sub(self.records.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReportStatus {
    Ready,
    /// The source could not be loaded or held no usable rows.
    NoData { message: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthOption {
    pub period: MonthPeriod,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryRanking {
    pub category: Category,
    pub title: String,
    pub rows: Vec<RankedRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProportionSlice {
    #[serde(flatten)]
    pub row: ProportionRow,
    /// `"<category name> (<percentage>%)"`
    pub label: String,
}

/// Everything the dashboard renders for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub schema_version: u8,
    pub generated_at: DateTime<Utc>,
    /// Generation date in the configured calendar.
    pub generated_on: String,
    pub status: ReportStatus,
    pub filters: Filters,
    pub options: FilterOptions,
    pub month_labels: Vec<MonthOption>,
    pub records_total: usize,
    pub records_matched: usize,
    pub rows_dropped: usize,
    pub summary: Vec<EmployeeDepartmentSummary>,
    pub rankings: Vec<CategoryRanking>,
    pub proportions: Vec<ProportionSlice>,
    /// Filled only when an employee is selected; one view per category with entries.
    pub details: Vec<DetailView>,
}

impl DashboardReport {
    /// A valid report carrying a guidance message instead of data.
    pub fn no_data(message: &str, filters: &Filters, config: &DashboardConfig) -> Self {
        warn!(message, "Building empty dashboard report");
        let now = Utc::now();
        Self {
            schema_version: 1,
            generated_at: now,
            generated_on: format_date(now.date_naive(), &config.calendar),
            status: ReportStatus::NoData {
                message: message.to_string(),
            },
            filters: filters.clone(),
            options: FilterOptions::default(),
            month_labels: Vec::new(),
            records_total: 0,
            records_matched: 0,
            rows_dropped: 0,
            summary: Vec::new(),
            rankings: Vec::new(),
            proportions: Vec::new(),
            details: Vec::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == ReportStatus::Ready
    }
}

/// Runs every projection over `dataset` under `filters`.
#[tracing::instrument(skip_all, fields(records = dataset.records.len()))]
pub fn build_report(
    dataset: &Dataset,
    filters: &Filters,
    config: &DashboardConfig,
) -> DashboardReport {
    if dataset.records.is_empty() {
        let message = if dataset.raw_rows == 0 {
            "The attendance dataset is empty".to_string()
        } else {
            format!("None of the {} rows had a usable date", dataset.raw_rows)
        };
        let mut report = DashboardReport::no_data(&message, filters, config);
        report.rows_dropped = dataset.dropped_rows();
        return report;
    }

    let vocab = &config.vocabulary;
    let aggregation = aggregate(&dataset.records, filters);
    let options = filter_options(&dataset.records, filters);

    let month_labels = options
        .months
        .iter()
        .map(|&period| MonthOption {
            period,
            label: format_month(period, &config.calendar),
        })
        .collect();

    let rankings = Category::ALL
        .iter()
        .map(|&category| CategoryRanking {
            category,
            title: vocab.category_name(category).to_string(),
            rows: rank(&aggregation.summary, category),
        })
        .collect();

    let slices = proportions(&aggregation.summary, &Category::ALL)
        .into_iter()
        .map(|row| ProportionSlice {
            label: format!("{} ({:.1}%)", vocab.category_name(row.category), row.percentage),
            row,
        })
        .collect();

    let details = match filters.employee_name.as_deref() {
        Some(employee) => Category::ALL
            .iter()
            .map(|&category| {
                detail(aggregation.records.iter().copied(), employee, category, vocab)
            })
            .filter(|view| !view.rows.is_empty())
            .collect(),
        None => Vec::new(),
    };

    let now = Utc::now();
    info!(
        matched = aggregation.records.len(),
        groups = aggregation.summary.len(),
        "Dashboard report built"
    );

    DashboardReport {
        schema_version: 1,
        generated_at: now,
        generated_on: format_date(now.date_naive(), &config.calendar),
        status: ReportStatus::Ready,
        filters: filters.clone(),
        options,
        month_labels,
        records_total: dataset.records.len(),
        records_matched: aggregation.records.len(),
        rows_dropped: dataset.dropped_rows(),
        summary: aggregation.summary,
        rankings,
        proportions: slices,
        details,
    }
}

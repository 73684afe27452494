//! Output formatting and persistence for pipeline results.
//!
//! Supports JSON files and CSV exports of the cleaned records, the summary
//! table and rankings.

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::analyzers::types::{AttendanceRecord, EmployeeDepartmentSummary, RankedRow};
use crate::config::ColumnNames;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Flat CSV shape of an [`EmployeeDepartmentSummary`].
#[derive(Debug, Serialize)]
struct SummaryRow<'a> {
    employee_name: &'a str,
    department: &'a str,
    sick_personal_days: f64,
    absent_days: f64,
    tardy_count: f64,
    vacation_count: f64,
}

impl<'a> From<&'a EmployeeDepartmentSummary> for SummaryRow<'a> {
    fn from(s: &'a EmployeeDepartmentSummary) -> Self {
        Self {
            employee_name: &s.employee_name,
            department: &s.department,
            sick_personal_days: s.counts.sick_personal_days,
            absent_days: s.counts.absent_days,
            tardy_count: s.counts.tardy_count,
            vacation_count: s.counts.vacation_count,
        }
    }
}

/// Writes a value as pretty-printed JSON to `path`, creating parent directories.
pub fn write_json_file(path: &str, value: &impl Serialize) -> Result<()> {
    let file = create_file(path)?;
    serde_json::to_writer_pretty(file, value)?;
    debug!(path, "Wrote JSON file");
    Ok(())
}

/// Writes the summary table as CSV with a header row.
pub fn write_summary_csv<W: Write>(writer: W, summary: &[EmployeeDepartmentSummary]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in summary {
        writer.serialize(SummaryRow::from(row))?;
    }
    if summary.is_empty() {
        writer.write_record([
            "employee_name",
            "department",
            "sick_personal_days",
            "absent_days",
            "tardy_count",
            "vacation_count",
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes ranked rows as CSV.
pub fn write_ranking_csv<W: Write>(writer: W, rows: &[RankedRow]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in rows {
        writer.serialize(row)?;
    }
    if rows.is_empty() {
        writer.write_record(["rank", "employee_name", "department", "value"])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes cleaned records under the configured input headers followed by the
/// derived columns, so the export can be read back by the normalizer.
///
/// The date, year and month columns are left out when no record has a date,
/// so a dateless dataset reads back dateless instead of losing every row.
pub fn write_cleaned_csv<W: Write>(
    writer: W,
    records: &[AttendanceRecord],
    columns: &ColumnNames,
) -> Result<()> {
    let mut writer = WriterBuilder::new().from_writer(writer);
    let dated = records.iter().any(|r| r.date.is_some());

    let mut header = vec![columns.employee_name.as_str(), columns.department.as_str()];
    if dated {
        header.push(columns.date.as_str());
    }
    header.extend([
        columns.check_in.as_str(),
        columns.check_out.as_str(),
        columns.exception.as_str(),
    ]);
    if dated {
        header.extend(["year", "month"]);
    }
    header.extend(["sick_personal_days", "absent_days", "tardy_count", "vacation_count"]);
    writer.write_record(&header)?;

    for r in records {
        let mut row = vec![r.employee_name.clone(), r.department.clone()];
        if dated {
            row.push(r.date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default());
        }
        row.extend([
            r.check_in_time.format("%H:%M:%S").to_string(),
            r.check_out_time.format("%H:%M:%S").to_string(),
            r.exception_label.clone(),
        ]);
        if dated {
            row.extend([
                r.year.map(|y| y.to_string()).unwrap_or_default(),
                r.month_period.map(|m| m.to_string()).unwrap_or_default(),
            ]);
        }
        row.extend([
            r.counts.sick_personal_days.to_string(),
            r.counts.absent_days.to_string(),
            r.counts.tardy_count.to_string(),
            r.counts.vacation_count.to_string(),
        ]);
        writer.write_record(&row)?;
    }

    writer.flush()?;
    debug!(records = records.len(), dated, "Wrote cleaned records");
    Ok(())
}

/// Creates `path` for writing, along with any missing parent directories.
pub fn create_file(path: &str) -> Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(File::create(path)?)
}

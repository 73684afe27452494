//! Attendance aggregation pipeline.
//!
//! Raw spreadsheet rows are normalized into cleaned records, classified into
//! exception categories with half-day weighting, filtered, grouped per
//! (employee, department), and projected into rankings, detail views and
//! proportions for the dashboard report.

pub mod aggregate;
pub mod calendar;
pub mod classify;
pub mod detail;
pub mod normalize;
pub mod proportion;
pub mod rank;
pub mod report;
pub mod types;
pub mod utility;
pub mod writetos3;

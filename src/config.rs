//! Dashboard configuration: spreadsheet header names, exception-label
//! vocabulary and calendar formatting.
//!
//! Stored as a JSON object on disk. Every field is optional and falls back to
//! the English preset:
//! ```json
//! {
//!   "columns": { "employee_name": "ชื่อ-สกุล", "date": "วันที่" },
//!   "vocabulary": { "half_day_marker": "ครึ่งวัน" },
//!   "calendar": { "year_offset": 543 }
//! }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::analyzers::types::Category;

/// Header names of the six logical input columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub employee_name: String,
    pub department: String,
    pub date: String,
    pub check_in: String,
    pub check_out: String,
    pub exception: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            employee_name: "employee_name".into(),
            department: "department".into(),
            date: "date".into(),
            check_in: "check_in".into(),
            check_out: "check_out".into(),
            exception: "exception".into(),
        }
    }
}

impl ColumnNames {
    /// Headers used by the HR attendance export.
    pub fn thai() -> Self {
        Self {
            employee_name: "ชื่อ-สกุล".into(),
            department: "แผนก".into(),
            date: "วันที่".into(),
            check_in: "เข้างาน".into(),
            check_out: "ออกงาน".into(),
            exception: "ข้อยกเว้น".into(),
        }
    }
}

/// Display names for the four exception categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryNames {
    pub sick_personal: String,
    pub absent: String,
    pub tardy: String,
    pub vacation: String,
}

impl Default for CategoryNames {
    fn default() -> Self {
        Self {
            sick_personal: "Sick/Personal leave".into(),
            absent: "Absent".into(),
            tardy: "Tardy".into(),
            vacation: "Vacation".into(),
        }
    }
}

/// Exception labels recognised by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    pub sick_personal_labels: Vec<String>,
    pub absent_labels: Vec<String>,
    pub tardy_label: String,
    pub vacation_label: String,
    /// Substring that turns a sick/personal or absence label into a half day.
    pub half_day_marker: String,
    /// Placeholder for a missing employee name or department.
    pub unspecified: String,
    /// Cell values treated as missing after trimming (compared case-insensitively).
    pub missing_markers: Vec<String>,
    pub category_names: CategoryNames,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            sick_personal_labels: vec![
                "sick-leave".into(),
                "personal-leave".into(),
                "sick-leave-half-day".into(),
                "personal-leave-half-day".into(),
            ],
            absent_labels: vec!["absent".into(), "absent-half-day".into()],
            tardy_label: "tardy".into(),
            vacation_label: "vacation".into(),
            half_day_marker: "half-day".into(),
            unspecified: "unspecified".into(),
            missing_markers: vec!["nan".into(), "missing".into()],
            category_names: CategoryNames::default(),
        }
    }
}

impl Vocabulary {
    pub fn thai() -> Self {
        Self {
            sick_personal_labels: vec![
                "ลาป่วย".into(),
                "ลากิจ".into(),
                "ลาป่วยครึ่งวัน".into(),
                "ลากิจครึ่งวัน".into(),
            ],
            absent_labels: vec!["ขาด".into(), "ขาดครึ่งวัน".into()],
            tardy_label: "สาย".into(),
            vacation_label: "พักผ่อน".into(),
            half_day_marker: "ครึ่งวัน".into(),
            unspecified: "ไม่ระบุ".into(),
            missing_markers: vec!["nan".into(), "missing".into()],
            category_names: CategoryNames {
                sick_personal: "ลาป่วย/ลากิจ".into(),
                absent: "ขาด".into(),
                tardy: "สาย".into(),
                vacation: "พักผ่อน".into(),
            },
        }
    }

    /// Every label that belongs to `category`.
    pub fn labels_for(&self, category: Category) -> Vec<&str> {
        match category {
            Category::SickPersonal => self
                .sick_personal_labels
                .iter()
                .map(String::as_str)
                .collect(),
            Category::Absent => self.absent_labels.iter().map(String::as_str).collect(),
            Category::Tardy => vec![self.tardy_label.as_str()],
            Category::Vacation => vec![self.vacation_label.as_str()],
        }
    }

    pub fn category_name(&self, category: Category) -> &str {
        match category {
            Category::SickPersonal => &self.category_names.sick_personal,
            Category::Absent => &self.category_names.absent,
            Category::Tardy => &self.category_names.tardy,
            Category::Vacation => &self.category_names.vacation,
        }
    }

    pub fn is_half_day(&self, label: &str) -> bool {
        !self.half_day_marker.is_empty() && label.contains(self.half_day_marker.as_str())
    }

    /// Full-day leave or absence: no clock events are expected on that day.
    pub fn is_full_day_leave(&self, label: &str) -> bool {
        let listed = self.sick_personal_labels.iter().any(|l| l == label)
            || self.absent_labels.iter().any(|l| l == label);
        listed && !self.is_half_day(label)
    }

    pub fn is_missing(&self, value: &str) -> bool {
        value.is_empty()
            || self
                .missing_markers
                .iter()
                .any(|m| m.eq_ignore_ascii_case(value))
    }
}

/// Regional calendar used when displaying years and months.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Added to the civil year (543 for the Buddhist era).
    pub year_offset: i32,
    pub month_names: Vec<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            year_offset: 0,
            month_names: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl CalendarConfig {
    pub fn thai() -> Self {
        Self {
            year_offset: 543,
            month_names: [
                "มกราคม",
                "กุมภาพันธ์",
                "มีนาคม",
                "เมษายน",
                "พฤษภาคม",
                "มิถุนายน",
                "กรกฎาคม",
                "สิงหาคม",
                "กันยายน",
                "ตุลาคม",
                "พฤศจิกายน",
                "ธันวาคม",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub columns: ColumnNames,
    pub vocabulary: Vocabulary,
    pub calendar: CalendarConfig,
}

impl DashboardConfig {
    pub fn thai() -> Self {
        Self {
            columns: ColumnNames::thai(),
            vocabulary: Vocabulary::thai(),
            calendar: CalendarConfig::thai(),
        }
    }

    /// Looks up a built-in preset by name (`english` or `thai`).
    pub fn preset(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Self::default()),
            "thai" | "th" => Ok(Self::thai()),
            other => bail!("Unknown config preset: {}. Expected english or thai", other),
        }
    }

    /// Loads the config from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("Invalid config file '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        if config.calendar.month_names.len() != 12 {
            bail!(
                "calendar.month_names must list 12 months, got {}",
                config.calendar.month_names.len()
            );
        }
        Ok(config)
    }
}

//! Tabular parser for attendance exports (CSV or Excel workbook).
//!
//! Produces a loosely typed [`RawTable`]; interpreting the cells is the
//! normalizer's job.

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDateTime;
use std::io::Cursor;
use tracing::debug;

/// A single spreadsheet cell before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Renders the cell as text. Whole numbers drop their fraction.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// Header row plus data rows. Rows may be shorter than the header.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Index of the column whose header matches `name` after trimming.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name.trim())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Parses a dataset, sniffing the format from its leading bytes.
///
/// # Errors
///
/// Returns an error if the bytes are neither a readable workbook nor CSV.
pub fn parse_table(bytes: &[u8]) -> Result<RawTable> {
    if is_workbook(bytes) {
        parse_workbook(bytes)
    } else {
        parse_csv(bytes)
    }
}

/// Zip container (xlsx, ods) or OLE compound document (xls).
fn is_workbook(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04") || bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0])
}

pub fn parse_csv(bytes: &[u8]) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let headers = rdr
        .headers()
        .context("Failed to read CSV header row")?
        .iter()
        .map(clean_header)
        .collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    debug!(rows = rows.len(), "Parsed CSV dataset");
    Ok(RawTable { headers, rows })
}

/// Reads the first worksheet of an Excel or OpenDocument workbook.
pub fn parse_workbook(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .context("Failed to open workbook")?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.context("Failed to read first worksheet")?,
        None => bail!("Workbook has no worksheets"),
    };

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|c| clean_header(&cell_from_workbook(c).to_text().unwrap_or_default()))
            .collect(),
        None => Vec::new(),
    };

    let rows: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(cell_from_workbook).collect())
        .collect();

    debug!(rows = rows.len(), "Parsed workbook dataset");
    Ok(RawTable { headers, rows })
}

fn cell_from_workbook(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.trim().is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => dt.as_datetime().map(Cell::DateTime).unwrap_or(Cell::Empty),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        _ => Cell::Empty,
    }
}

fn clean_header(name: &str) -> String {
    name.trim_start_matches('\u{feff}').trim().to_string()
}

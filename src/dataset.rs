//! Dataset loading: CSV text → typed population records.
use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::RaceError;
use crate::schema::source;

/// One parsed `(year, country, population)` observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub year: i32,
    pub country: String,
    pub population: u64,
}

impl Record {
    pub fn new(year: i32, country: impl Into<String>, population: u64) -> Self {
        Self {
            year,
            country: country.into(),
            population,
        }
    }
}

/// Parse CSV text into records.
///
/// The header row must name the `Year`, `Country name` and `Population`
/// columns; any other column is ignored. Rows with a blank country, a
/// non-integer year or a non-numeric, negative or non-finite population are
/// dropped, as are rows with more fields than the header. Decimal
/// populations are rounded to the nearest integer.
pub fn parse_csv(text: &str) -> Result<Vec<Record>, RaceError> {
    let (text, ragged) = drop_ragged_rows(text);
    if ragged > 0 {
        tracing::debug!(ragged, "skipped rows with extra fields");
    }
    let raw = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()?;
    records_from_frame(raw)
}

/// Remove data rows that carry more fields than the header, returning the
/// remaining text and the number of rows removed. Commas and line breaks
/// inside quoted fields do not count.
fn drop_ragged_rows(text: &str) -> (String, usize) {
    let mut kept = String::with_capacity(text.len());
    let mut header_fields: Option<usize> = None;
    let mut dropped = 0;

    let mut row = String::new();
    let mut fields = 1;
    let mut quoted = false;

    let mut finish = |row: &mut String, fields: usize| {
        match header_fields {
            None => {
                header_fields = Some(fields);
                kept.push_str(row);
            }
            Some(n) if fields > n => dropped += 1,
            Some(_) => kept.push_str(row),
        }
        row.clear();
    };

    for ch in text.chars() {
        row.push(ch);
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => fields += 1,
            '\n' if !quoted => {
                finish(&mut row, fields);
                fields = 1;
            }
            _ => {}
        }
    }
    if !row.is_empty() {
        finish(&mut row, fields);
    }
    (kept, dropped)
}

/// Read and parse a CSV file. A missing file is reported as `NotFound`.
pub fn load_csv_file(path: impl AsRef<Path>) -> Result<Vec<Record>, RaceError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => RaceError::NotFound(path.display().to_string()),
        _ => RaceError::Io(e),
    })?;
    parse_csv(&text)
}

fn records_from_frame(mut raw: DataFrame) -> Result<Vec<Record>, RaceError> {
    // Trim whitespace from column names
    let trimmed: Vec<String> = raw
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    raw.set_column_names(trimmed.as_slice())?;

    for &col_name in &source::REQUIRED {
        if raw.column(col_name).is_err() {
            return Err(RaceError::MissingColumn(col_name.to_string()));
        }
    }

    let total = raw.height();
    let df = raw
        .lazy()
        .select(
            source::REQUIRED
                .iter()
                .map(|&name| col(name).str().strip_chars(lit(" \t\r\n")).alias(name))
                .collect::<Vec<_>>(),
        )
        .collect()?;

    let years = df.column(source::YEAR)?.str()?;
    let countries = df.column(source::COUNTRY)?.str()?;
    let populations = df.column(source::POPULATION)?.str()?;

    let mut records = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = (
            years.get(i).and_then(parse_year),
            countries.get(i).filter(|c| !c.is_empty()),
            populations.get(i).and_then(parse_population),
        );
        if let (Some(year), Some(country), Some(population)) = row {
            records.push(Record::new(year, country, population));
        }
    }

    let dropped = total - records.len();
    if dropped > 0 {
        tracing::debug!(dropped, "skipped malformed rows");
    }
    tracing::info!(rows = total, records = records.len(), "parsed population CSV");
    Ok(records)
}

fn parse_year(raw: &str) -> Option<i32> {
    raw.parse::<i32>().ok()
}

fn parse_population(raw: &str) -> Option<u64> {
    if let Ok(n) = raw.parse::<u64>() {
        return Some(n);
    }
    let f = raw.parse::<f64>().ok()?;
    if !f.is_finite() || f < 0.0 || f > u64::MAX as f64 {
        return None;
    }
    Some(f.round() as u64)
}

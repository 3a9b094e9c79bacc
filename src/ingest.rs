//! Reads a sales CSV file into a cleaned `TransactionTable`.
//!
//! The steps are, in order:
//! - parse the delimited text
//! - normalize the headers and resolve the required fields
//! - coerce the date, quantity and price of each row, dropping rows where any of them fails
//! - drop rows that exactly repeat an earlier row
//! - derive `month` and `revenue`
//!
//! An empty result is not an error.

use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{
    Amount, Field, LoadReport, Mapping, MissingFields, TransactionRecord, TransactionTable,
};
use crate::Result;
use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, trace, warn};

/// Date-only formats tried first, in order. Month-first is preferred over day-first for
/// ambiguous slash dates.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-and-time formats; the time of day is discarded.
const DATETIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Settings that change how cells are coerced.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct LoadOptions {
    date_formats: Vec<String>,
}

impl LoadOptions {
    /// Adds `chrono` format strings that are tried after the built-in date formats. A format may
    /// describe a date or a date and time.
    pub fn with_date_formats<S, I>(mut self, formats: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        self.date_formats.extend(formats.into_iter().map(Into::into));
        self
    }

    pub fn date_formats(&self) -> &[String] {
        &self.date_formats
    }
}

/// Loads a table from CSV text using the default `LoadOptions`.
pub fn load<R: Read>(reader: R) -> Result<TransactionTable> {
    load_with(reader, &LoadOptions::default())
}

/// Loads a table from the CSV file at `path`.
///
/// # Errors
/// - `ErrorType::Io` if the file cannot be opened.
/// - `ErrorType::Parse` if the file is not a well-formed CSV table.
/// - `ErrorType::Schema` if any required column is missing.
pub fn load_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<TransactionTable> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Unable to open {}", path.display()))
        .pub_result(ErrorType::Io)?;
    let table = load_with(file, options)
        .map_err(|e| e.context(format!("Unable to load {}", path.display())))?;
    debug!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

/// Loads a table from CSV text.
pub fn load_with<R: Read>(reader: R, options: &LoadOptions) -> Result<TransactionTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .context("Unable to read the header row")
        .pub_result(ErrorType::Parse)?
        .clone();
    if headers.iter().all(str::is_empty) {
        return Err(Error::msg(ErrorType::Parse, "The source has no header row"));
    }

    let mapping = Mapping::new(headers.iter()).map_err(|e| {
        if e.is::<MissingFields>() {
            Error::new(ErrorType::Schema, e)
        } else {
            Error::new(ErrorType::Parse, e)
        }
    })?;
    trace!("Column mapping: {mapping:?}");

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result
            .context("Unable to parse a row")
            .pub_result(ErrorType::Parse)?;
        report.rows_read += 1;
        match coerce_row(&row, &mapping, options) {
            Ok(record) => records.push(record),
            Err(e) => {
                let line = row.position().map(|p| p.line()).unwrap_or_default();
                trace!("Dropping line {line}: {e:#}");
                report.invalid_rows += 1;
            }
        }
    }

    let (records, duplicates) = drop_duplicates(records);
    report.duplicate_rows = duplicates;

    if report.rows_dropped() > 0 {
        warn!(
            "Dropped {} of {} rows ({} with an invalid date, quantity or price, {} duplicates)",
            report.rows_dropped(),
            report.rows_read,
            report.invalid_rows,
            report.duplicate_rows
        );
    }
    debug!("Retained {} rows", records.len());

    TransactionTable::new(mapping.columns().to_vec(), records, report)
}

fn coerce_row(
    row: &StringRecord,
    mapping: &Mapping,
    options: &LoadOptions,
) -> anyhow::Result<TransactionRecord> {
    let get = |field: Field| cell(row, mapping, field);

    let date = parse_date(get(Field::Date), options.date_formats())
        .with_context(|| format!("Invalid {}", Field::Date))?;
    let quantity_sold = Amount::from_str(get(Field::QuantitySold))
        .with_context(|| format!("Invalid {}", Field::QuantitySold))?;
    let unit_price = Amount::from_str(get(Field::UnitPrice))
        .with_context(|| format!("Invalid {}", Field::UnitPrice))?;

    let other_fields: BTreeMap<String, String> = mapping
        .extras()
        .iter()
        .map(|&ix| {
            (
                mapping.columns()[ix].to_string(),
                row.get(ix).unwrap_or_default().to_string(),
            )
        })
        .collect();

    TransactionRecord::new_with_other_fields(
        date,
        get(Field::Product),
        quantity_sold,
        unit_price,
        other_fields,
    )
    .with_context(|| format!("Invalid {} times {}", Field::QuantitySold, Field::UnitPrice))
}

fn cell<'a>(row: &'a StringRecord, mapping: &Mapping, field: Field) -> &'a str {
    mapping
        .index(field)
        .and_then(|ix| row.get(ix))
        .unwrap_or_default()
}

/// Removes records that repeat an earlier record, keeping the first. Returns the retained
/// records and the number removed.
fn drop_duplicates(records: Vec<TransactionRecord>) -> (Vec<TransactionRecord>, usize) {
    let keep: Vec<bool> = {
        let mut seen = HashSet::with_capacity(records.len());
        records.iter().map(|r| seen.insert(r.identity())).collect()
    };
    let before = records.len();
    let retained: Vec<TransactionRecord> = records
        .into_iter()
        .zip(keep)
        .filter_map(|(r, keep)| keep.then_some(r))
        .collect();
    let removed = before - retained.len();
    (retained, removed)
}

/// Coerces a cell to a calendar date. Date-times are accepted and truncated to their date.
pub fn parse_date(s: &str, extra_formats: &[String]) -> anyhow::Result<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        bail!("an empty value is not a date");
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Ok(d);
        }
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }
    for format in extra_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, format) {
            return Ok(d);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt.date());
        }
    }
    bail!("'{s}' is not a recognized date")
}

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

use crate::record::{ActivityRecord, RecordSet};

/// Header columns every upload must carry
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "date",
    "developer",
    "status",
    "new_tasks",
    "completed_tasks",
    "effort_hours",
];

/// Errors produced while turning uploaded bytes into a record set
///
/// Ingestion is all-or-nothing: any failure discards the whole upload and the
/// caller keeps whatever dataset it had before.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The bytes were not UTF-8, not well-formed CSV, or a row held an
    /// unparseable date or numeric value
    #[error("could not parse upload: {0}")]
    ParseFailure(String),

    /// The header row lacks a required column
    #[error("missing required column `{0}`")]
    MissingColumn(String),
}

/// Resolved positions of the required columns within the header row
struct ColumnIndex {
    date: usize,
    developer: usize,
    status: usize,
    new_tasks: usize,
    completed_tasks: usize,
    effort_hours: usize,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord) -> Result<Self, IngestError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or_else(|| IngestError::MissingColumn(name.to_string()))
        };
        Ok(Self {
            date: find("date")?,
            developer: find("developer")?,
            status: find("status")?,
            new_tasks: find("new_tasks")?,
            completed_tasks: find("completed_tasks")?,
            effort_hours: find("effort_hours")?,
        })
    }
}

/// Parse an uploaded CSV file into a record set
///
/// The input is expected to be UTF-8 CSV text with a header row naming at
/// least the columns in [`REQUIRED_COLUMNS`]; extra columns are ignored.
/// Column presence is validated eagerly so a bad upload is reported at the
/// upload boundary instead of surfacing later as an opaque aggregation
/// failure. A header-only file is a valid, empty record set.
///
/// # Examples
/// ```
/// use devdash::ingest::ingest;
///
/// let csv = "date,developer,status,new_tasks,completed_tasks,effort_hours\n\
///            2024-01-01,alice,open,3,1,4.5\n";
/// let records = ingest(csv.as_bytes()).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].developer, "alice");
/// ```
pub fn ingest(raw: &[u8]) -> Result<RecordSet, IngestError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| IngestError::ParseFailure(format!("file is not valid UTF-8: {e}")))?;

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| IngestError::ParseFailure(e.to_string()))?
        .clone();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        // Header is line 1, first data row is line 2
        let line = i + 2;
        let row = row.map_err(|e| IngestError::ParseFailure(e.to_string()))?;
        records.push(parse_row(&row, &columns, line)?);
    }

    Ok(records)
}

fn parse_row(
    row: &StringRecord,
    columns: &ColumnIndex,
    line: usize,
) -> Result<ActivityRecord, IngestError> {
    let field = |index: usize, name: &str| {
        row.get(index)
            .ok_or_else(|| IngestError::ParseFailure(format!("line {line}: missing `{name}` field")))
    };

    let date = parse_date(field(columns.date, "date")?).ok_or_else(|| {
        IngestError::ParseFailure(format!(
            "line {line}: `{}` is not a calendar date",
            row.get(columns.date).unwrap_or_default()
        ))
    })?;

    Ok(ActivityRecord {
        date,
        developer: field(columns.developer, "developer")?.to_string(),
        status: field(columns.status, "status")?.to_string(),
        new_tasks: parse_number(field(columns.new_tasks, "new_tasks")?, "new_tasks", line)?,
        completed_tasks: parse_number(
            field(columns.completed_tasks, "completed_tasks")?,
            "completed_tasks",
            line,
        )?,
        effort_hours: parse_hours(field(columns.effort_hours, "effort_hours")?, line)?,
    })
}

/// Accept ISO dates with either `-` or `/` separators
fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(value, "%Y/%m/%d"))
        .ok()
}

fn parse_number(value: &str, name: &str, line: usize) -> Result<i64, IngestError> {
    value.parse::<i64>().map_err(|_| {
        IngestError::ParseFailure(format!("line {line}: `{value}` is not a valid `{name}` count"))
    })
}

fn parse_hours(value: &str, line: usize) -> Result<f64, IngestError> {
    value.parse::<f64>().map_err(|_| {
        IngestError::ParseFailure(format!(
            "line {line}: `{value}` is not a valid `effort_hours` number"
        ))
    })
}

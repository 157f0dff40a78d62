use csv::WriterBuilder;
use thiserror::Error;

use crate::ingest::REQUIRED_COLUMNS;
use crate::record::ActivityRecord;

/// Errors produced while serializing records back to CSV
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize records: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush export buffer: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize a record set to CSV text
///
/// The output carries the standard header row even when the record set is
/// empty, and dates are written as `YYYY-MM-DD`, so the result round-trips
/// through [`crate::ingest::ingest`].
///
/// # Examples
/// ```
/// use devdash::export::to_csv;
///
/// let csv = to_csv(&[]).unwrap();
/// assert_eq!(
///     csv,
///     "date,developer,status,new_tasks,completed_tasks,effort_hours\n"
/// );
/// ```
pub fn to_csv(records: &[ActivityRecord]) -> Result<String, ExportError> {
    // Header is written by hand so that an empty record set still exports a
    // well-formed file
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(REQUIRED_COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes).expect("csv output is always UTF-8"))
}

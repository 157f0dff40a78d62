use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single row of uploaded development-activity data
///
/// One record describes the activity of one developer on one calendar day:
/// how many tasks were opened and closed, how many hours were spent, and the
/// status label attached to the work. Duplicate records are permitted and
/// treated as independent events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Calendar date of the activity (day granularity)
    pub date: NaiveDate,

    /// Developer identifier (free text)
    pub developer: String,

    /// Status label, e.g. "open", "in-progress", "done" - whatever the
    /// uploaded data contains, no fixed enumeration is enforced
    pub status: String,

    /// Number of tasks opened on this date
    pub new_tasks: i64,

    /// Number of tasks completed on this date
    pub completed_tasks: i64,

    /// Effort spent, in hours
    pub effort_hours: f64,
}

/// The in-memory dataset: an ordered sequence of activity records
///
/// Insertion order is irrelevant to every computation - all aggregations are
/// order-independent group-bys.
pub type RecordSet = Vec<ActivityRecord>;

/// Metadata about the most recent successful upload
#[derive(Clone, Debug, Serialize)]
pub struct UploadMeta {
    /// Original filename of the uploaded CSV
    pub filename: String,

    /// Number of data rows in the upload
    pub rows: usize,

    /// When the upload was accepted
    pub uploaded_at: DateTime<Utc>,
}

/// Holds the currently uploaded dataset for the lifetime of the server
///
/// The store is replaced wholesale on every successful ingestion and never
/// partially mutated, so a reader always observes either the previous upload
/// or the new one, never a mix. There is no persistence across restarts.
///
/// # Examples
/// ```
/// use devdash::record::RecordStore;
///
/// let store = RecordStore::new();
/// assert!(store.is_empty());
/// assert!(store.meta().is_none());
/// ```
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RecordSet,
    meta: Option<UploadMeta>,
}

impl RecordStore {
    /// Create an empty store (no upload yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire dataset with a freshly ingested one
    ///
    /// The previous dataset is dropped in full; there is no incremental
    /// append or partial update.
    pub fn replace(&mut self, records: RecordSet, filename: &str) {
        self.meta = Some(UploadMeta {
            filename: filename.to_string(),
            rows: records.len(),
            uploaded_at: Utc::now(),
        });
        self.records = records;
    }

    /// The current dataset, possibly empty
    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    /// Metadata for the current upload, if any
    pub fn meta(&self) -> Option<&UploadMeta> {
        self.meta.as_ref()
    }

    /// Number of records currently held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no upload has been accepted yet or the upload had no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

use chrono::Days;

use crate::record::ActivityRecord;

/// Keep only the records inside a trailing window of days
///
/// The window is anchored at the most recent date present in the data, not at
/// the wall clock: `cutoff = max(date) - window_days`, and every record with
/// `date >= cutoff` survives, so the boundary date is inclusive. A window of
/// `0` means "all data", and a window too large for the calendar to represent
/// places the cutoff before every record, so everything survives. The input
/// is never mutated and an empty input yields an empty output.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use devdash::filter::filter_window;
/// use devdash::record::ActivityRecord;
///
/// let record = |d: &str| ActivityRecord {
///     date: d.parse::<NaiveDate>().unwrap(),
///     developer: "alice".into(),
///     status: "open".into(),
///     new_tasks: 1,
///     completed_tasks: 0,
///     effort_hours: 1.0,
/// };
/// let records = vec![record("2024-01-01"), record("2024-01-20")];
///
/// assert_eq!(filter_window(&records, 0).len(), 2);
/// assert_eq!(filter_window(&records, 7).len(), 1);
/// ```
pub fn filter_window(records: &[ActivityRecord], window_days: u32) -> Vec<ActivityRecord> {
    if window_days == 0 {
        return records.to_vec();
    }

    let Some(latest) = records.iter().map(|r| r.date).max() else {
        return Vec::new();
    };
    // The window comes straight from the query string; a value that underflows
    // the calendar means the cutoff precedes every record
    let Some(cutoff) = latest.checked_sub_days(Days::new(window_days as u64)) else {
        return records.to_vec();
    };

    records.iter().filter(|r| r.date >= cutoff).cloned().collect()
}

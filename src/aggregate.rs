use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::ActivityRecord;

/// Errors produced while aggregating a record set
#[derive(Debug, Error)]
pub enum AggregationError {
    /// A required numeric column cannot be summed (non-finite values)
    #[error("column `{0}` is missing or not numeric")]
    InvalidColumn(String),
}

/// Granularity of the time-series buckets
///
/// Records are grouped by the first calendar day of the period containing
/// their date. Day granularity is the default; the coarser levels back the
/// period dropdown in the dashboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Bucket {
    /// First calendar day of the bucket containing `date`
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use devdash::aggregate::Bucket;
    ///
    /// let date = "2024-05-17".parse::<NaiveDate>().unwrap();
    /// assert_eq!(Bucket::Day.floor(date), date);
    /// assert_eq!(Bucket::Month.floor(date), "2024-05-01".parse().unwrap());
    /// assert_eq!(Bucket::Quarter.floor(date), "2024-04-01".parse().unwrap());
    /// assert_eq!(Bucket::Year.floor(date), "2024-01-01".parse().unwrap());
    /// ```
    pub fn floor(self, date: NaiveDate) -> NaiveDate {
        match self {
            Bucket::Day => date,
            Bucket::Week => {
                date - Duration::days(date.weekday().num_days_from_monday() as i64)
            }
            Bucket::Month => NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
            Bucket::Quarter => {
                let month = (date.month0() / 3) * 3 + 1;
                NaiveDate::from_ymd_opt(date.year(), month, 1).unwrap_or(date)
            }
            Bucket::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        }
    }
}

/// One point of the new-vs-completed time series
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub bucket: NaiveDate,
    pub new_tasks: i64,
    pub completed_tasks: i64,
}

/// One slice of the status frequency table
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Per-developer effort totals
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeveloperEffort {
    pub developer: String,
    pub effort_hours: f64,
    /// Completed-task total, used as a secondary visual dimension
    pub completed_tasks: i64,
}

/// Scalar KPI totals and ratios over a record set
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct KpiSummary {
    pub total_new_tasks: i64,
    pub total_completed_tasks: i64,
    pub total_effort_hours: f64,
    /// `total_effort_hours / max(total_new_tasks, 1)`
    pub mean_hours_per_task: f64,
    /// `total_completed_tasks / max(total_new_tasks, 1) * 100`
    pub completion_ratio_pct: f64,
}

impl KpiSummary {
    /// The explicit empty state rendered before any upload
    pub fn empty() -> Self {
        Self {
            total_new_tasks: 0,
            total_completed_tasks: 0,
            total_effort_hours: 0.0,
            mean_hours_per_task: 0.0,
            completion_ratio_pct: 0.0,
        }
    }
}

/// Group records by date bucket, summing new and completed task counts
///
/// Buckets come back in chronological order. Dates absent from the data are
/// not synthesized - gaps stay gaps.
pub fn time_series(records: &[ActivityRecord], bucket: Bucket) -> Vec<TimeSeriesPoint> {
    let mut buckets: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for record in records {
        let entry = buckets.entry(bucket.floor(record.date)).or_default();
        entry.0 += record.new_tasks;
        entry.1 += record.completed_tasks;
    }

    buckets
        .into_iter()
        .map(|(bucket, (new_tasks, completed_tasks))| TimeSeriesPoint {
            bucket,
            new_tasks,
            completed_tasks,
        })
        .collect()
}

/// Count records per distinct status value
///
/// Statuses are whatever appears in the data; the result is ordered
/// alphabetically so repeated computations are deterministic.
pub fn status_distribution(records: &[ActivityRecord]) -> Vec<StatusCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for record in records {
        *counts.entry(record.status.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .map(|(status, count)| StatusCount {
            status: status.to_string(),
            count,
        })
        .collect()
}

/// Sum effort hours (and completed tasks) per developer
pub fn developer_effort(
    records: &[ActivityRecord],
) -> Result<Vec<DeveloperEffort>, AggregationError> {
    check_summable(records)?;

    let mut totals: BTreeMap<&str, (f64, i64)> = BTreeMap::new();
    for record in records {
        let entry = totals.entry(record.developer.as_str()).or_default();
        entry.0 += record.effort_hours;
        entry.1 += record.completed_tasks;
    }

    Ok(totals
        .into_iter()
        .map(|(developer, (effort_hours, completed_tasks))| DeveloperEffort {
            developer: developer.to_string(),
            effort_hours,
            completed_tasks,
        })
        .collect())
}

/// Compute the scalar KPI totals and ratios
///
/// An empty record set yields [`KpiSummary::empty`] rather than an error; the
/// ratio denominators are floored at one task to guard divide-by-zero.
pub fn kpi_summary(records: &[ActivityRecord]) -> Result<KpiSummary, AggregationError> {
    check_summable(records)?;

    let total_new_tasks: i64 = records.iter().map(|r| r.new_tasks).sum();
    let total_completed_tasks: i64 = records.iter().map(|r| r.completed_tasks).sum();
    let total_effort_hours: f64 = records.iter().map(|r| r.effort_hours).sum();

    let denominator = total_new_tasks.max(1) as f64;
    Ok(KpiSummary {
        total_new_tasks,
        total_completed_tasks,
        total_effort_hours,
        mean_hours_per_task: total_effort_hours / denominator,
        completion_ratio_pct: total_completed_tasks as f64 / denominator * 100.0,
    })
}

/// Effort hours must be finite for any sum over them to be meaningful
fn check_summable(records: &[ActivityRecord]) -> Result<(), AggregationError> {
    if records.iter().any(|r| !r.effort_hours.is_finite()) {
        return Err(AggregationError::InvalidColumn("effort_hours".to_string()));
    }
    Ok(())
}

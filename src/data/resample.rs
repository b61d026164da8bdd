use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use super::model::Table;

// ---------------------------------------------------------------------------
// Bucket size
// ---------------------------------------------------------------------------

/// Calendar-aligned aggregation period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BucketSize {
    #[default]
    Hourly,
    Daily,
    Monthly,
    Yearly,
}

impl BucketSize {
    pub const ALL: [BucketSize; 4] = [
        BucketSize::Hourly,
        BucketSize::Daily,
        BucketSize::Monthly,
        BucketSize::Yearly,
    ];

    /// Start of the bucket containing `ts`.
    pub fn floor(self, ts: NaiveDateTime) -> NaiveDateTime {
        let date = ts.date();
        match self {
            BucketSize::Hourly => date.and_time(
                NaiveTime::from_hms_opt(ts.hour(), 0, 0).unwrap_or(NaiveTime::MIN),
            ),
            BucketSize::Daily => date.and_time(NaiveTime::MIN),
            BucketSize::Monthly => first_of(date.year(), date.month()),
            BucketSize::Yearly => first_of(date.year(), 1),
        }
    }

    /// `strftime` pattern matching the bucket granularity.
    pub fn label_format(self) -> &'static str {
        match self {
            BucketSize::Hourly => "%Y-%m-%d %H:00",
            BucketSize::Daily => "%Y-%m-%d",
            BucketSize::Monthly => "%Y-%m",
            BucketSize::Yearly => "%Y",
        }
    }
}

impl fmt::Display for BucketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BucketSize::Hourly => "Hourly",
            BucketSize::Daily => "Daily",
            BucketSize::Monthly => "Monthly",
            BucketSize::Yearly => "Yearly",
        };
        f.write_str(name)
    }
}

fn first_of(year: i32, month: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
}

// ---------------------------------------------------------------------------
// Chart artifact
// ---------------------------------------------------------------------------

/// Ordered (bucket start, mean confidence) series plus its presentation hints.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartArtifact {
    pub title: String,
    pub bucket_size: BucketSize,
    pub points: Vec<(NaiveDateTime, f64)>,
    /// Height of the horizontal reference line.
    pub threshold: f64,
    /// Fixed y-axis range.
    pub y_range: (f64, f64),
}

/// Output of the aggregation stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    Chart(ChartArtifact),
    NoData,
}

/// Group `table` into calendar-aligned buckets and average the confidence of
/// each non-empty bucket. Empty buckets are left out of the series.
pub fn aggregate_and_render(table: &Table, bucket_size: BucketSize, threshold: f64) -> Aggregation {
    if table.is_empty() {
        return Aggregation::NoData;
    }

    let mut buckets: BTreeMap<NaiveDateTime, (f64, usize)> = BTreeMap::new();
    for record in &table.records {
        let slot = buckets.entry(bucket_size.floor(record.timestamp)).or_default();
        slot.0 += record.confidence;
        slot.1 += 1;
    }

    let points = buckets
        .into_iter()
        .map(|(start, (sum, n))| (start, sum / n as f64))
        .collect();

    Aggregation::Chart(ChartArtifact {
        title: format!("Mean Confidence Scores: {bucket_size}"),
        bucket_size,
        points,
        threshold,
        y_range: (0.0, 1.0),
    })
}

// Weekly time windows
// Author: Gabriel Demetrios Lafis

use chrono::{Duration, NaiveDateTime};

use crate::data::{Column, Record, Value, DATE_FORMAT};
use super::FilteredView;

/// Stride between bucket starts
pub fn bucket_stride() -> Duration {
    Duration::days(7)
}

/// Length of a full bucket: 6 days 23:59:59
pub fn bucket_span() -> Duration {
    Duration::days(7) - Duration::seconds(1)
}

/// One weekly bucket of trips
#[derive(Debug, Clone, PartialEq)]
pub struct WeekBucket {
    pub week_start: NaiveDateTime,
    pub week_end: NaiveDateTime,
    pub num_trips: usize,
    pub total_amount: f64,
}

impl WeekBucket {
    pub fn to_record(&self) -> Record {
        Record::new()
            .with("week_start", self.week_start.format(DATE_FORMAT).to_string())
            .with("week_end", self.week_end.format(DATE_FORMAT).to_string())
            .with("num_trips", self.num_trips)
            .with("total_amount", self.total_amount)
    }
}

impl From<WeekBucket> for Value {
    fn from(bucket: WeekBucket) -> Self {
        Value::Map(bucket.to_record())
    }
}

/// Partitions a time range into consecutive weekly buckets
///
/// Buckets start at `start` and every 7 days after it. Each covers pickups in
/// `[bucket_start, min(bucket_start + 6d 23:59:59, end)]`, both ends
/// inclusive, so only the last bucket can be truncated. An inverted range
/// yields no buckets.
pub struct WeeklyWindower {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl WeeklyWindower {
    /// Create a new windower over `[start, end]`
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        WeeklyWindower { start, end }
    }

    /// Bucket boundaries, without counting anything
    pub fn boundaries(&self) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        let mut bounds = Vec::new();
        let mut current = self.start;

        while current <= self.end {
            let bucket_end = current
                .checked_add_signed(bucket_span())
                .map_or(self.end, |full_end| std::cmp::min(full_end, self.end));
            bounds.push((current, bucket_end));

            match current.checked_add_signed(bucket_stride()) {
                Some(next) => current = next,
                None => break,
            }
        }

        bounds
    }

    /// Count trips and sum `total_amount` for each bucket
    pub fn process(&self, view: &FilteredView<'_>) -> Vec<WeekBucket> {
        self.boundaries()
            .into_iter()
            .map(|(week_start, week_end)| {
                let week = view.filter(|record| {
                    record
                        .pickup_datetime
                        .map_or(false, |pickup| pickup >= week_start && pickup <= week_end)
                });

                WeekBucket {
                    week_start,
                    week_end,
                    num_trips: week.len(),
                    total_amount: week.sum(Column::TotalAmount),
                }
            })
            .collect()
    }
}

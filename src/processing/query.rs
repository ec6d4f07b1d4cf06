// Trip query operations
// Author: Gabriel Demetrios Lafis

use std::sync::Arc;

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::data::{Column, Dataset, Record, Value};
use super::{
    above_threshold, counts_to_value, groups_to_map, groups_to_records, mean_ratio,
    normalized_counts, rows_to_value, sanitize, top_n, top_values, value_counts,
    DatasetSummary, FilteredView, GroupByProcessor, GroupKey, Measure, PredicateBuilder,
    ProcessingError, QuerySpec, TimeBound, WeeklyWindower, DEFAULT_ROW_LIMIT,
};

/// Limits and defaults applied by query operations
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    /// Cap on rows returned by threshold selections
    pub row_limit: usize,
    /// Rows shown by the trip duration preview
    pub preview_limit: usize,
    /// Fixed seed for `sample`; `None` draws from entropy
    pub sample_seed: Option<u64>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            row_limit: DEFAULT_ROW_LIMIT,
            preview_limit: 10,
            sample_seed: None,
        }
    }
}

/// Every operation the engine answers
#[derive(Debug, Clone, PartialEq)]
pub enum TripQuery {
    TripSummary(QuerySpec),
    WeeklyTrips(QuerySpec),
    DatasetSummary,
    Sample { n: usize },
    FilteredByPassengerCount { passenger_count: i64 },
    TripDurationPreview { limit: Option<usize> },
    DailyTrips,
    TopPickupLocations { top: i64 },
    RevenueByVendor,
    AvgFarePerMile,
    PeakHours,
    PaymentSplit,
    AirportTrips { limit: Option<usize> },
    PassengerDistribution,
    HighTips { min_tip: f64, limit: Option<usize> },
    LongestTrips { top: i64 },
    CongestionImpact,
    AvgDurationVendor,
    MonthlyRevenue,
}

impl TripQuery {
    /// Short operation name for logs
    pub fn name(&self) -> &'static str {
        match self {
            TripQuery::TripSummary(_) => "trip_summary",
            TripQuery::WeeklyTrips(_) => "weekly_trips",
            TripQuery::DatasetSummary => "dataset_summary",
            TripQuery::Sample { .. } => "sample",
            TripQuery::FilteredByPassengerCount { .. } => "filtered_by_passenger_count",
            TripQuery::TripDurationPreview { .. } => "trip_duration_preview",
            TripQuery::DailyTrips => "daily_trips",
            TripQuery::TopPickupLocations { .. } => "top_pickup_locations",
            TripQuery::RevenueByVendor => "revenue_by_vendor",
            TripQuery::AvgFarePerMile => "avg_fare_per_mile",
            TripQuery::PeakHours => "peak_hours",
            TripQuery::PaymentSplit => "payment_split",
            TripQuery::AirportTrips { .. } => "airport_trips",
            TripQuery::PassengerDistribution => "passenger_distribution",
            TripQuery::HighTips { .. } => "high_tips",
            TripQuery::LongestTrips { .. } => "longest_trips",
            TripQuery::CongestionImpact => "congestion_impact",
            TripQuery::AvgDurationVendor => "avg_duration_vendor",
            TripQuery::MonthlyRevenue => "monthly_revenue",
        }
    }
}

/// Answers trip queries over a shared, read-only dataset
///
/// Each operation is a pure function of the dataset and its arguments. The
/// individual operations return raw results, which may still hold NaN
/// markers; [`TripService::execute`] is the entry point that sanitizes.
#[derive(Debug, Clone)]
pub struct TripService {
    dataset: Arc<Dataset>,
    options: QueryOptions,
}

impl TripService {
    /// Create a new service over a dataset
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self::with_options(dataset, QueryOptions::default())
    }

    pub fn with_options(dataset: Arc<Dataset>, options: QueryOptions) -> Self {
        TripService { dataset, options }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// Run one query and sanitize its result
    pub fn execute(&self, query: &TripQuery) -> Result<Value, ProcessingError> {
        debug!("Executing {} over {} rows", query.name(), self.dataset.len());

        let result = match query {
            TripQuery::TripSummary(spec) => self.trip_summary(spec)?,
            TripQuery::WeeklyTrips(spec) => self.weekly_trips(spec)?,
            TripQuery::DatasetSummary => self.dataset_summary(),
            TripQuery::Sample { n } => self.sample(*n)?,
            TripQuery::FilteredByPassengerCount { passenger_count } => {
                self.filtered_by_passenger_count(*passenger_count)
            }
            TripQuery::TripDurationPreview { limit } => {
                self.trip_duration_preview(limit.unwrap_or(self.options.preview_limit))
            }
            TripQuery::DailyTrips => self.daily_trips()?,
            TripQuery::TopPickupLocations { top } => self.top_pickup_locations(*top)?,
            TripQuery::RevenueByVendor => self.revenue_by_vendor()?,
            TripQuery::AvgFarePerMile => self.avg_fare_per_mile(),
            TripQuery::PeakHours => self.peak_hours()?,
            TripQuery::PaymentSplit => self.payment_split()?,
            TripQuery::AirportTrips { limit } => {
                self.airport_trips(limit.unwrap_or(self.options.row_limit))?
            }
            TripQuery::PassengerDistribution => self.passenger_distribution()?,
            TripQuery::HighTips { min_tip, limit } => {
                self.high_tips(*min_tip, limit.unwrap_or(self.options.row_limit))?
            }
            TripQuery::LongestTrips { top } => self.longest_trips(*top),
            TripQuery::CongestionImpact => self.congestion_impact()?,
            TripQuery::AvgDurationVendor => self.avg_duration_vendor()?,
            TripQuery::MonthlyRevenue => self.monthly_revenue()?,
        };

        Ok(sanitize(result))
    }

    fn all_rows(&self) -> FilteredView<'_> {
        FilteredView::all(&self.dataset)
    }

    /// Trips that start and end inside the range: `{num_trips, total_amount}`
    pub fn trip_summary(&self, spec: &QuerySpec) -> Result<Value, ProcessingError> {
        let view = PredicateBuilder::new(spec, TimeBound::Trip)
            .build(&self.dataset)
            .apply(&self.dataset)?;

        Ok(Record::new()
            .with("num_trips", view.len())
            .with("total_amount", view.sum(Column::TotalAmount))
            .into())
    }

    /// Trips picked up in the range, bucketed by week
    pub fn weekly_trips(&self, spec: &QuerySpec) -> Result<Value, ProcessingError> {
        let view = PredicateBuilder::new(spec, TimeBound::Pickup)
            .build(&self.dataset)
            .apply(&self.dataset)?;

        let buckets = WeeklyWindower::new(spec.start, spec.end).process(&view);
        Ok(buckets.into())
    }

    /// Columns, row count, distinct vendors and null counts
    pub fn dataset_summary(&self) -> Value {
        DatasetSummary::compute(&self.dataset).to_record().into()
    }

    /// `n` rows drawn at random without replacement
    pub fn sample(&self, n: usize) -> Result<Value, ProcessingError> {
        let len = self.dataset.len();
        if n > len {
            return Err(ProcessingError::InvalidArgument(format!(
                "Cannot take a sample of {} rows from {} rows",
                n, len
            )));
        }

        let mut rng = match self.options.sample_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let picked = rand::seq::index::sample(&mut rng, len, n);
        Ok(rows_to_value(
            picked.into_iter().filter_map(|i| self.dataset.get_row(i)),
        ))
    }

    /// Every trip with exactly `passenger_count` passengers
    pub fn filtered_by_passenger_count(&self, passenger_count: i64) -> Value {
        let view = self
            .all_rows()
            .filter(|record| record.passenger_count == Some(passenger_count));
        rows_to_value(view.iter())
    }

    /// Pickup, dropoff and duration in minutes for the first `limit` rows
    pub fn trip_duration_preview(&self, limit: usize) -> Value {
        self.all_rows()
            .head(limit)
            .iter()
            .map(|record| {
                Value::Map(
                    Record::new()
                        .with(Column::PickupDatetime.name(), record.pickup_datetime)
                        .with(Column::DropoffDatetime.name(), record.dropoff_datetime)
                        .with("trip_duration_minutes", record.duration_minutes()),
                )
            })
            .collect::<Vec<Value>>()
            .into()
    }

    /// Trips per pickup date: `[{date, trip_count}]`
    pub fn daily_trips(&self) -> Result<Value, ProcessingError> {
        let groups = GroupByProcessor::new(GroupKey::PickupDate).process(&self.all_rows())?;
        Ok(groups_to_records(groups, "date", "trip_count"))
    }

    /// Busiest pickup zones: `[{location_id, count}]`
    pub fn top_pickup_locations(&self, top: i64) -> Result<Value, ProcessingError> {
        let counts = top_values(&self.all_rows(), Column::PuLocationId, top)?;
        Ok(counts_to_value(counts, "location_id"))
    }

    /// `[{vendor_id, total_amount}]`, ascending vendor id
    pub fn revenue_by_vendor(&self) -> Result<Value, ProcessingError> {
        let groups = GroupByProcessor::new(GroupKey::Column(Column::VendorId))
            .sum(Measure::Column(Column::TotalAmount))
            .process(&self.all_rows())?;
        Ok(groups_to_records(groups, "vendor_id", "total_amount"))
    }

    /// Mean per-trip fare per mile over trips with a positive distance
    pub fn avg_fare_per_mile(&self) -> Value {
        let avg = mean_ratio(&self.all_rows(), Column::FareAmount, Column::TripDistance);
        Record::new().with("avg_fare_per_mile", avg).into()
    }

    /// Trips per pickup hour: `{hour: count}`
    pub fn peak_hours(&self) -> Result<Value, ProcessingError> {
        let groups = GroupByProcessor::new(GroupKey::HourOfDay).process(&self.all_rows())?;
        Ok(groups_to_map(groups))
    }

    /// Share of trips per payment type in percent, most common first
    pub fn payment_split(&self) -> Result<Value, ProcessingError> {
        let counts = value_counts(&self.all_rows(), GroupKey::Column(Column::PaymentType))?;
        Ok(groups_to_map(normalized_counts(&counts)))
    }

    /// Trips that paid an airport fee
    pub fn airport_trips(&self, limit: usize) -> Result<Value, ProcessingError> {
        let view = above_threshold(&self.all_rows(), Column::AirportFee, 0.0, limit)?;
        Ok(rows_to_value(view.iter()))
    }

    /// Trips per passenger count: `{passenger_count: count}`
    pub fn passenger_distribution(&self) -> Result<Value, ProcessingError> {
        let groups = GroupByProcessor::new(GroupKey::Column(Column::PassengerCount))
            .process(&self.all_rows())?;
        Ok(groups_to_map(groups))
    }

    /// Trips tipping strictly more than `min_tip`, capped at `limit`
    pub fn high_tips(&self, min_tip: f64, limit: usize) -> Result<Value, ProcessingError> {
        let view = above_threshold(&self.all_rows(), Column::TipAmount, min_tip, limit)?;
        Ok(rows_to_value(view.iter()))
    }

    /// The `top` longest trips by distance
    pub fn longest_trips(&self, top: i64) -> Value {
        rows_to_value(top_n(&self.all_rows(), Column::TripDistance, top))
    }

    /// Congestion surcharge collected per pickup date: `{date: sum}`
    pub fn congestion_impact(&self) -> Result<Value, ProcessingError> {
        let groups = GroupByProcessor::new(GroupKey::PickupDate)
            .sum(Measure::Column(Column::CongestionSurcharge))
            .process(&self.all_rows())?;
        Ok(groups_to_map(groups))
    }

    /// Mean trip duration in minutes per vendor: `{vendor_id: minutes}`
    pub fn avg_duration_vendor(&self) -> Result<Value, ProcessingError> {
        let groups = GroupByProcessor::new(GroupKey::Column(Column::VendorId))
            .mean(Measure::TripDurationMinutes)
            .process(&self.all_rows())?;
        Ok(groups_to_map(groups))
    }

    /// Revenue per pickup month: `[{month, total_amount}]`
    pub fn monthly_revenue(&self) -> Result<Value, ProcessingError> {
        let groups = GroupByProcessor::new(GroupKey::PickupMonth)
            .sum(Measure::Column(Column::TotalAmount))
            .process(&self.all_rows())?;
        Ok(groups_to_records(groups, "month", "total_amount"))
    }
}

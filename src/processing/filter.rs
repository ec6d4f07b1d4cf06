// Row predicates and filtered views
// Author: Gabriel Demetrios Lafis

use chrono::NaiveDateTime;
use log::debug;

use crate::data::{Column, Dataset, TripRecord};
use super::ProcessingError;

/// Time range and optional location filters for a query
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub pu_location_id: Option<i64>,
    pub do_location_id: Option<i64>,
}

impl QuerySpec {
    /// Create a query over a time range with no location filters
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        QuerySpec {
            start,
            end,
            pu_location_id: None,
            do_location_id: None,
        }
    }

    /// Restrict to a pickup zone
    pub fn with_pickup_location(mut self, location_id: i64) -> Self {
        self.pu_location_id = Some(location_id);
        self
    }

    /// Restrict to a dropoff zone
    pub fn with_dropoff_location(mut self, location_id: i64) -> Self {
        self.do_location_id = Some(location_id);
        self
    }
}

/// Which timestamps the time range is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBound {
    /// `pickup >= start && dropoff <= end`
    Trip,
    /// `pickup >= start && pickup <= end`
    Pickup,
}

/// Builds row masks for a query
pub struct PredicateBuilder<'a> {
    spec: &'a QuerySpec,
    bound: TimeBound,
}

impl<'a> PredicateBuilder<'a> {
    /// Create a new predicate builder
    pub fn new(spec: &'a QuerySpec, bound: TimeBound) -> Self {
        PredicateBuilder { spec, bound }
    }

    /// Check a single row
    ///
    /// Rows with an absent timestamp or location never match a bound on it.
    pub fn matches(&self, record: &TripRecord) -> bool {
        let upper = match self.bound {
            TimeBound::Trip => record.dropoff_datetime,
            TimeBound::Pickup => record.pickup_datetime,
        };

        let in_range = match (record.pickup_datetime, upper) {
            (Some(pickup), Some(upper)) => pickup >= self.spec.start && upper <= self.spec.end,
            _ => false,
        };

        in_range
            && location_matches(record.pu_location_id, self.spec.pu_location_id)
            && location_matches(record.do_location_id, self.spec.do_location_id)
    }

    /// Build the mask over a whole dataset
    pub fn build(&self, dataset: &Dataset) -> RowMask {
        let mask = RowMask::from_predicate(dataset, |record| self.matches(record));

        debug!(
            "Mask for {:?} bound selects {} of {} rows",
            self.bound,
            mask.count(),
            dataset.len()
        );
        mask
    }
}

fn location_matches(value: Option<i64>, filter: Option<i64>) -> bool {
    match filter {
        Some(wanted) => value == Some(wanted),
        None => true,
    }
}

/// A boolean mask with one entry per dataset row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMask(Vec<bool>);

impl RowMask {
    /// Build a mask from an arbitrary row predicate
    pub fn from_predicate<F>(dataset: &Dataset, predicate: F) -> Self
    where
        F: Fn(&TripRecord) -> bool,
    {
        RowMask(dataset.records().iter().map(predicate).collect())
    }

    /// Number of selected rows
    pub fn count(&self) -> usize {
        self.0.iter().filter(|selected| **selected).count()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Select the masked rows of a dataset
    pub fn apply<'a>(&self, dataset: &'a Dataset) -> Result<FilteredView<'a>, ProcessingError> {
        if self.0.len() != dataset.len() {
            return Err(ProcessingError::InvalidArgument(format!(
                "Mask has {} entries, dataset has {} rows",
                self.0.len(),
                dataset.len()
            )));
        }

        let rows = self
            .0
            .iter()
            .enumerate()
            .filter(|(_, selected)| **selected)
            .map(|(i, _)| i)
            .collect();

        Ok(FilteredView { dataset, rows })
    }
}

/// A read-only selection of dataset rows, in original row order
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a Dataset,
    rows: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// View over every row of a dataset
    pub fn all(dataset: &'a Dataset) -> Self {
        FilteredView {
            dataset,
            rows: (0..dataset.len()).collect(),
        }
    }

    /// Row indices into the underlying dataset
    pub fn row_indices(&self) -> &[usize] {
        &self.rows
    }

    /// Iterate over the selected records
    pub fn iter(&self) -> impl Iterator<Item = &'a TripRecord> + '_ {
        let dataset = self.dataset;
        self.rows.iter().filter_map(move |&i| dataset.get_row(i))
    }

    /// Narrow the view to rows matching a predicate, keeping order
    pub fn filter<F>(&self, predicate: F) -> FilteredView<'a>
    where
        F: Fn(&TripRecord) -> bool,
    {
        let dataset = self.dataset;
        let rows = self
            .rows
            .iter()
            .copied()
            .filter(|&i| dataset.get_row(i).map_or(false, &predicate))
            .collect();

        FilteredView { dataset, rows }
    }

    /// Keep only the first `limit` rows
    pub fn head(&self, limit: usize) -> FilteredView<'a> {
        FilteredView {
            dataset: self.dataset,
            rows: self.rows.iter().copied().take(limit).collect(),
        }
    }

    /// Sum a numeric column, skipping absent values
    pub fn sum(&self, column: Column) -> f64 {
        self.iter().filter_map(|record| record.float(column)).sum()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

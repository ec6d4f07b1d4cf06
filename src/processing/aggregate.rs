// Aggregate operations for trip queries
// Author: Gabriel Demetrios Lafis

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate, Timelike};

use crate::data::{Column, DataType, Record, TripRecord, Value};
use super::{FilteredView, ProcessingError};

/// Round to 2 decimal places, half away from zero
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Represents an aggregation function
pub trait AggregateFunction {
    /// Update the aggregation state with the measure of one row
    fn update(&mut self, value: Option<f64>);

    /// Finalize the aggregation and return the result
    fn finalize(&self) -> Value;
}

/// Count aggregation function; counts rows whatever their measure
#[derive(Debug, Default)]
pub struct CountFunction {
    count: usize,
}

impl AggregateFunction for CountFunction {
    fn update(&mut self, _value: Option<f64>) {
        self.count += 1;
    }

    fn finalize(&self) -> Value {
        Value::from(self.count)
    }
}

/// Sum aggregation function; absent values add nothing
#[derive(Debug, Default)]
pub struct SumFunction {
    sum: f64,
}

impl AggregateFunction for SumFunction {
    fn update(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
        }
    }

    fn finalize(&self) -> Value {
        Value::Float(self.sum)
    }
}

/// Mean aggregation function, rounded to 2 decimals
///
/// A group without any present value finalizes to NaN.
#[derive(Debug, Default)]
pub struct MeanFunction {
    sum: f64,
    count: usize,
}

impl AggregateFunction for MeanFunction {
    fn update(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn finalize(&self) -> Value {
        if self.count == 0 {
            Value::Float(f64::NAN)
        } else {
            Value::Float(round2(self.sum / self.count as f64))
        }
    }
}

/// Named reducers a group can be folded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Sum,
    Mean,
    Count,
}

impl Reducer {
    /// Fresh aggregation state for one group
    pub fn accumulator(&self) -> Box<dyn AggregateFunction> {
        match self {
            Reducer::Sum => Box::new(SumFunction::default()),
            Reducer::Mean => Box::new(MeanFunction::default()),
            Reducer::Count => Box::new(CountFunction::default()),
        }
    }
}

/// The per-row quantity a reducer folds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Only the row itself; used with `Reducer::Count`
    Rows,
    Column(Column),
    TripDurationMinutes,
}

impl Measure {
    pub fn eval(&self, record: &TripRecord) -> Option<f64> {
        match self {
            Measure::Rows => None,
            Measure::Column(column) => record.float(*column),
            Measure::TripDurationMinutes => record.duration_minutes(),
        }
    }
}

/// How rows are assigned to groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// An integer categorical column such as the vendor or payment type
    Column(Column),
    /// Pickup hour, 0 to 23
    HourOfDay,
    /// Calendar date of the pickup
    PickupDate,
    /// Calendar month of the pickup
    PickupMonth,
}

impl GroupKey {
    /// Check the key can be computed over the trip schema
    pub fn validate(&self) -> Result<(), ProcessingError> {
        match self {
            GroupKey::Column(column) if column.data_type() != DataType::Integer => {
                Err(ProcessingError::InvalidArgument(format!(
                    "Column '{}' cannot be used as a group key",
                    column
                )))
            }
            _ => Ok(()),
        }
    }

    /// The key of one row; `None` drops the row from the grouping
    pub fn extract(&self, record: &TripRecord) -> Option<KeyValue> {
        match self {
            GroupKey::Column(column) => record.integer(*column).map(KeyValue::Integer),
            GroupKey::HourOfDay => record
                .pickup_datetime
                .map(|ts| KeyValue::Integer(i64::from(ts.hour()))),
            GroupKey::PickupDate => record.pickup_datetime.map(|ts| KeyValue::Date(ts.date())),
            GroupKey::PickupMonth => record.pickup_datetime.map(|ts| KeyValue::Month {
                year: ts.year(),
                month: ts.month(),
            }),
        }
    }
}

/// A computed group key, ordered naturally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyValue {
    Integer(i64),
    Date(NaiveDate),
    Month { year: i32, month: u32 },
}

impl KeyValue {
    /// String form, used for map-shaped results
    pub fn label(&self) -> String {
        match self {
            KeyValue::Integer(i) => i.to_string(),
            KeyValue::Date(date) => date.format("%Y-%m-%d").to_string(),
            KeyValue::Month { year, month } => format!("{:04}-{:02}", year, month),
        }
    }

    /// Value form, used for record-shaped results
    pub fn to_value(&self) -> Value {
        match self {
            KeyValue::Integer(i) => Value::Integer(*i),
            _ => Value::String(self.label()),
        }
    }
}

/// One reduced group
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub key: KeyValue,
    pub value: Value,
}

/// Render groups as `[{key_name: key, value_name: value}]`
pub fn groups_to_records(groups: Vec<Group>, key_name: &str, value_name: &str) -> Value {
    groups
        .into_iter()
        .map(|group| {
            Value::Map(
                Record::new()
                    .with(key_name, group.key.to_value())
                    .with(value_name, group.value),
            )
        })
        .collect::<Vec<Value>>()
        .into()
}

/// Render groups as `{key: value}`, keeping group order
pub fn groups_to_map(groups: Vec<Group>) -> Value {
    Value::Map(
        groups
            .into_iter()
            .map(|group| (group.key.label(), group.value))
            .collect(),
    )
}

/// Group by processor for aggregating trips
///
/// Groups come out in ascending key order. Derived keys and measures are
/// computed per call and never stored on the dataset.
#[derive(Debug, Clone)]
pub struct GroupByProcessor {
    key: GroupKey,
    reducer: Reducer,
    measure: Measure,
}

impl GroupByProcessor {
    /// Create a group by processor that counts rows per key
    pub fn new(key: GroupKey) -> Self {
        GroupByProcessor {
            key,
            reducer: Reducer::Count,
            measure: Measure::Rows,
        }
    }

    /// Count rows per group
    pub fn count(mut self) -> Self {
        self.reducer = Reducer::Count;
        self.measure = Measure::Rows;
        self
    }

    /// Sum a measure per group
    pub fn sum(mut self, measure: Measure) -> Self {
        self.reducer = Reducer::Sum;
        self.measure = measure;
        self
    }

    /// Mean a measure per group
    pub fn mean(mut self, measure: Measure) -> Self {
        self.reducer = Reducer::Mean;
        self.measure = measure;
        self
    }

    pub fn process(&self, view: &FilteredView<'_>) -> Result<Vec<Group>, ProcessingError> {
        self.key.validate()?;

        let mut groups: BTreeMap<KeyValue, Box<dyn AggregateFunction>> = BTreeMap::new();

        for record in view.iter() {
            let key = match self.key.extract(record) {
                Some(key) => key,
                None => continue,
            };

            groups
                .entry(key)
                .or_insert_with(|| self.reducer.accumulator())
                .update(self.measure.eval(record));
        }

        Ok(groups
            .into_iter()
            .map(|(key, state)| Group {
                key,
                value: state.finalize(),
            })
            .collect())
    }
}

/// Frequency of each key, most frequent first
///
/// Ties keep the order in which keys first appear. Rows without a key are
/// not counted.
pub fn value_counts(
    view: &FilteredView<'_>,
    key: GroupKey,
) -> Result<Vec<(KeyValue, usize)>, ProcessingError> {
    key.validate()?;

    let mut order: Vec<KeyValue> = Vec::new();
    let mut counts: HashMap<KeyValue, usize> = HashMap::new();

    for record in view.iter() {
        if let Some(k) = key.extract(record) {
            let count = counts.entry(k).or_insert(0);
            if *count == 0 {
                order.push(k);
            }
            *count += 1;
        }
    }

    let mut ranked: Vec<(KeyValue, usize)> = order
        .into_iter()
        .map(|k| (k, counts.get(&k).copied().unwrap_or(0)))
        .collect();

    // Stable, so equal counts stay in first-appearance order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(ranked)
}

/// Share of each key as a percentage of all counted rows, rounded to 2 places
pub fn normalized_counts(counts: &[(KeyValue, usize)]) -> Vec<Group> {
    let total: usize = counts.iter().map(|(_, count)| count).sum();

    counts
        .iter()
        .map(|(key, count)| Group {
            key: *key,
            value: Value::Float(round2(*count as f64 * 100.0 / total as f64)),
        })
        .collect()
}

/// Mean of `numerator / denominator` over rows with a positive denominator
///
/// Returns NaN when no row qualifies.
pub fn mean_ratio(view: &FilteredView<'_>, numerator: Column, denominator: Column) -> f64 {
    let mut mean = MeanFunction::default();

    for record in view.iter() {
        match record.float(denominator) {
            Some(d) if d > 0.0 => mean.update(record.float(numerator).map(|n| n / d)),
            _ => {}
        }
    }

    mean.finalize().as_f64().unwrap_or(f64::NAN)
}

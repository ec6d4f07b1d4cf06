// Ranking and threshold selection
// Author: Gabriel Demetrios Lafis

use std::cmp::Ordering;

use crate::data::{Column, DataType, Record, TripRecord, Value};
use super::{value_counts, FilteredView, GroupKey, KeyValue, ProcessingError};

/// Row cap applied to threshold selections unless a caller sets one
pub const DEFAULT_ROW_LIMIT: usize = 100;

/// Order two optional keys descending, with absent keys last
fn descending_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Top `n` rows by a column, largest first
///
/// The sort is stable, so ties keep original row order. `n <= 0` selects
/// nothing and `n` past the row count selects everything.
pub fn top_n<'a>(view: &FilteredView<'a>, column: Column, n: i64) -> Vec<&'a TripRecord> {
    if n <= 0 {
        return Vec::new();
    }

    let mut rows: Vec<&'a TripRecord> = view.iter().collect();
    rows.sort_by(|a, b| descending_nulls_last(a.ordinal(column), b.ordinal(column)));
    rows.truncate(usize::try_from(n).unwrap_or(usize::MAX));
    rows
}

/// Most frequent values of a column with their counts
pub fn top_values(
    view: &FilteredView<'_>,
    column: Column,
    n: i64,
) -> Result<Vec<(i64, usize)>, ProcessingError> {
    if n <= 0 {
        return Ok(Vec::new());
    }

    let counts = value_counts(view, GroupKey::Column(column))?;
    Ok(counts
        .into_iter()
        .take(usize::try_from(n).unwrap_or(usize::MAX))
        .filter_map(|(key, count)| match key {
            KeyValue::Integer(i) => Some((i, count)),
            _ => None,
        })
        .collect())
}

/// Rows whose column is strictly greater than `bound`, in original order
///
/// At most `limit` rows are returned.
pub fn above_threshold<'a>(
    view: &FilteredView<'a>,
    column: Column,
    bound: f64,
    limit: usize,
) -> Result<FilteredView<'a>, ProcessingError> {
    if column.data_type() == DataType::Timestamp {
        return Err(ProcessingError::InvalidArgument(format!(
            "Column '{}' is not numeric",
            column
        )));
    }

    Ok(view
        .filter(|record| record.float(column).map_or(false, |v| v > bound))
        .head(limit))
}

/// Render rows as records with canonical column names
pub fn rows_to_value<'a, I>(rows: I) -> Value
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    rows.into_iter()
        .map(|record| Value::Map(record.to_record()))
        .collect::<Vec<Value>>()
        .into()
}

/// Render `(value, count)` pairs as `[{key_name: value, "count": count}]`
pub fn counts_to_value(counts: Vec<(i64, usize)>, key_name: &str) -> Value {
    counts
        .into_iter()
        .map(|(key, count)| Value::Map(Record::new().with(key_name, key).with("count", count)))
        .collect::<Vec<Value>>()
        .into()
}

// Null sanitization of results
// Author: Gabriel Demetrios Lafis

use crate::data::{Record, Value};

/// Check whether a scalar is a missing-value marker
pub fn is_missing(value: &Value) -> bool {
    matches!(value, Value::Float(f) if f.is_nan())
}

/// Replace every missing-value marker in a result with `Value::Null`
///
/// Walks records and arrays recursively; all other scalars pass through
/// unchanged. Sanitizing a sanitized value is a no-op.
pub fn sanitize(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize).collect()),
        Value::Map(record) => Value::Map(sanitize_record(record)),
        scalar if is_missing(&scalar) => Value::Null,
        scalar => scalar,
    }
}

/// Sanitize every field of a record, keeping field order
pub fn sanitize_record(record: Record) -> Record {
    record
        .into_iter()
        .map(|(key, value)| (key, sanitize(value)))
        .collect()
}

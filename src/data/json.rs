// JSON trip data source
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde_json::{Map, Value as JsonValue};

use super::{Column, DataError, DataSource, Dataset, TripRecord, Value};

/// JSON data source
///
/// Reads a top-level array of objects keyed by column name, the shape the
/// records endpoint of most dataframe exports produce. Missing keys and
/// `null` load as absent values.
pub struct JsonSource {
    path: String,
}

impl JsonSource {
    /// Create a new JSON data source
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonSource {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    /// Read trip records from any reader
    pub fn read_from<R: Read>(reader: R) -> Result<Dataset, DataError> {
        let json: JsonValue = serde_json::from_reader(reader)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let rows = json
            .as_array()
            .ok_or_else(|| DataError::ParseError("Expected a JSON array of trips".to_string()))?;

        rows.iter()
            .enumerate()
            .map(|(row_idx, row)| {
                let obj = row.as_object().ok_or_else(|| {
                    DataError::ParseError(format!("row {}: expected an object", row_idx + 1))
                })?;
                Self::record_from_object(obj).map_err(|e| {
                    DataError::ParseError(format!("row {}: {}", row_idx + 1, e))
                })
            })
            .collect()
    }

    fn record_from_object(obj: &Map<String, JsonValue>) -> Result<TripRecord, DataError> {
        let mut record = TripRecord::default();

        for (key, json) in obj {
            // Unknown keys are not part of the trip schema
            let column = match key.parse::<Column>() {
                Ok(column) => column,
                Err(_) => continue,
            };
            record.set(column, Self::json_to_value(json))?;
        }

        Ok(record)
    }

    /// Convert a JSON scalar to a data value
    fn json_to_value(json: &JsonValue) -> Value {
        match json {
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => Value::Null,
        }
    }
}

impl DataSource for JsonSource {
    fn read(&self) -> Result<Dataset, DataError> {
        let file = File::open(&self.path)?;
        let dataset = Self::read_from(BufReader::new(file))?;

        info!("Loaded {} trips from JSON file {}", dataset.len(), self.path);
        Ok(dataset)
    }

    fn name(&self) -> &str {
        &self.path
    }
}

// CSV trip data source
// Author: Gabriel Demetrios Lafis

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};

use super::{Column, DataError, DataSource, DataType, Dataset, TripRecord, Value};

/// CSV data source
///
/// The file must have a header row naming every trip column. Header names
/// match ignoring ASCII case, extra columns are skipped and empty cells load
/// as absent values.
pub struct CsvSource {
    path: String,
    delimiter: char,
}

impl CsvSource {
    /// Create a new CSV data source
    pub fn new<P: AsRef<Path>>(path: P, delimiter: char) -> Self {
        CsvSource {
            path: path.as_ref().to_string_lossy().to_string(),
            delimiter,
        }
    }

    /// Read trip records from any reader
    pub fn read_from<R: Read>(reader: R, delimiter: char) -> Result<Dataset, DataError> {
        let mut csv_reader = ::csv::ReaderBuilder::new()
            .delimiter(delimiter as u8)
            .has_headers(true)
            .trim(::csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| DataError::ParseError(e.to_string()))?
            .clone();

        // Position of each schema column in the file
        let positions = Column::ALL
            .iter()
            .map(|column| {
                headers
                    .iter()
                    .position(|header| header.eq_ignore_ascii_case(column.name()))
                    .map(|i| (*column, i))
                    .ok_or_else(|| DataError::MissingColumn(column.name().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut records = Vec::new();

        for (row_idx, result) in csv_reader.records().enumerate() {
            let row = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            let mut record = TripRecord::default();

            for &(column, i) in &positions {
                let cell = row.get(i).unwrap_or("");
                parse_cell(cell, column)
                    .and_then(|value| record.set(column, value))
                    .map_err(|e| {
                        DataError::ParseError(format!("row {}, column '{}': {}", row_idx + 1, column, e))
                    })?;
            }

            records.push(record);
        }

        debug!("Parsed {} CSV rows", records.len());
        Ok(Dataset::new(records))
    }
}

/// Convert a raw CSV cell into a value for the column
fn parse_cell(cell: &str, column: Column) -> Result<Value, DataError> {
    if cell.is_empty() || cell.eq_ignore_ascii_case("nan") {
        return Ok(Value::Null);
    }

    match column.data_type() {
        DataType::Timestamp => Ok(Value::String(cell.to_string())),
        DataType::Integer => cell
            .parse::<i64>()
            .map(Value::Integer)
            .or_else(|_| cell.parse::<f64>().map(Value::Float))
            .map_err(|_| DataError::ParseError(format!("Invalid integer '{}'", cell))),
        DataType::Float => cell
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| DataError::ParseError(format!("Invalid number '{}'", cell))),
    }
}

impl DataSource for CsvSource {
    fn read(&self) -> Result<Dataset, DataError> {
        let file = File::open(&self.path)?;
        let dataset = Self::read_from(BufReader::new(file), self.delimiter)?;

        info!("Loaded {} trips from CSV file {}", dataset.len(), self.path);
        Ok(dataset)
    }

    fn name(&self) -> &str {
        &self.path
    }
}

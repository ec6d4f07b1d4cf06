// Data module for trip records and the shared dataset
// Author: Gabriel Demetrios Lafis

mod csv;
mod json;
mod schema;
mod value;

pub use self::csv::*;
pub use self::json::*;
pub use schema::*;
pub use value::*;

use std::path::Path;

use thiserror::Error;

/// Represents a source the dataset can be loaded from
pub trait DataSource {
    /// Read all trip records from the source
    fn read(&self) -> Result<Dataset, DataError>;

    /// Get the source name
    fn name(&self) -> &str;
}

/// Pick a source for a path based on its extension
///
/// `.json` files are read as JSON, everything else as CSV.
pub fn source_for_path<P: AsRef<Path>>(path: P, delimiter: char) -> Box<dyn DataSource> {
    let path = path.as_ref();
    if path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json")) {
        Box::new(JsonSource::new(path))
    } else {
        Box::new(CsvSource::new(path, delimiter))
    }
}

/// The immutable, ordered collection of trip records every query reads
///
/// Row order is the load order and breaks ties in every ranking operation.
/// There is no mutable access: once built, a dataset is shared as
/// `Arc<Dataset>` between requests.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<TripRecord>,
}

impl Dataset {
    /// Create a dataset from records in load order
    pub fn new(records: Vec<TripRecord>) -> Self {
        Dataset { records }
    }

    /// Get the number of rows in the dataset
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get a reference to a row by index
    pub fn get_row(&self, index: usize) -> Option<&TripRecord> {
        self.records.get(index)
    }

    /// All rows in load order
    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    /// Column names in schema order
    pub fn columns(&self) -> Vec<&'static str> {
        Column::ALL.iter().map(|column| column.name()).collect()
    }

    /// Count absent values in a column
    pub fn null_count(&self, column: Column) -> usize {
        self.records
            .iter()
            .filter(|record| record.is_null(column))
            .count()
    }
}

impl FromIterator<TripRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = TripRecord>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

/// Represents an error in the data module
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),
}

// Dataset-level statistics
// Author: Gabriel Demetrios Lafis

use std::collections::HashSet;

use crate::data::{Column, Dataset, Record, Value};

/// Shape and completeness of a dataset
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSummary {
    pub columns: Vec<&'static str>,
    pub row_count: usize,
    /// Distinct vendor ids in order of first appearance
    pub unique_vendors: Vec<i64>,
    /// Absent values per column, in schema order
    pub null_counts: Vec<(&'static str, usize)>,
}

impl DatasetSummary {
    /// Summarize a dataset in a single pass per column
    pub fn compute(dataset: &Dataset) -> Self {
        let mut seen = HashSet::new();
        let unique_vendors = dataset
            .records()
            .iter()
            .filter_map(|record| record.vendor_id)
            .filter(|vendor| seen.insert(*vendor))
            .collect();

        let null_counts = Column::ALL
            .iter()
            .map(|column| (column.name(), dataset.null_count(*column)))
            .collect();

        DatasetSummary {
            columns: dataset.columns(),
            row_count: dataset.len(),
            unique_vendors,
            null_counts,
        }
    }

    pub fn to_record(&self) -> Record {
        let null_counts: Record = self
            .null_counts
            .iter()
            .map(|(name, count)| (name.to_string(), Value::from(*count)))
            .collect();

        Record::new()
            .with("columns", self.columns.clone())
            .with("row_count", self.row_count)
            .with("unique_vendors", self.unique_vendors.clone())
            .with("null_counts", null_counts)
    }
}

// Storage module for the process-wide dataset
// Author: Gabriel Demetrios Lafis

mod memory;

pub use memory::*;

use thiserror::Error;

use crate::data::DataError;

/// Represents an error in the storage module
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Data error: {0}")]
    DataError(#[from] DataError),

    #[error("Dataset is not initialized")]
    NotInitialized,

    #[error("Dataset is already initialized")]
    AlreadyInitialized,

    #[error("Error: {0}")]
    Other(String),
}

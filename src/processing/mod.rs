// Processing module for trip queries
// Author: Gabriel Demetrios Lafis

mod aggregate;
mod filter;
mod query;
mod rank;
mod sanitize;
mod stats;
mod window;

pub use aggregate::*;
pub use filter::*;
pub use query::*;
pub use rank::*;
pub use sanitize::*;
pub use stats::*;
pub use window::*;

use thiserror::Error;

use crate::data::DataError;

/// Represents an error in the processing module
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Data error: {0}")]
    DataError(#[from] DataError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

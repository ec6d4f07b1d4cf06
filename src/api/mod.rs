// API module for exposing trip queries via HTTP
// Author: Gabriel Demetrios Lafis

mod handlers;
mod models;
mod routes;
mod server;

pub use handlers::*;
pub use models::*;
pub use routes::*;
pub use server::*;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use log::error;
use serde_json::json;
use thiserror::Error;

use crate::data::DataError;
use crate::processing::ProcessingError;
use crate::storage::StorageError;

/// Represents an error in the API module
///
/// This is the one place faults from the engine become the `{"error": ...}`
/// response shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    ProcessingError(#[from] ProcessingError),

    #[error("{0}")]
    StorageError(#[from] StorageError),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl From<DataError> for ApiError {
    fn from(err: DataError) -> Self {
        ApiError::ProcessingError(ProcessingError::DataError(err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::ValidationError(_) => StatusCode::BAD_REQUEST,
            ApiError::ProcessingError(ProcessingError::InvalidArgument(_)) => StatusCode::BAD_REQUEST,
            ApiError::ProcessingError(ProcessingError::DataError(
                DataError::ParseError(_) | DataError::UnknownColumn(_),
            )) => StatusCode::BAD_REQUEST,
            ApiError::StorageError(StorageError::NotInitialized) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        error!("Request failed: {}", self);
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.to_string(),
        }))
    }
}

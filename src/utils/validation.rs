// Validation utilities for query parameters
// Author: Gabriel Demetrios Lafis

/// Validate that a count parameter is not negative
pub fn validate_non_negative(value: i64, name: &str) -> Result<usize, String> {
    usize::try_from(value).map_err(|_| format!("'{}' must not be negative", name))
}

/// Validate that a float parameter is a finite number
pub fn validate_finite(value: f64, name: &str) -> Result<f64, String> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{}' must be a finite number", name))
    }
}


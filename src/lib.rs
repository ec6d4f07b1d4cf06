// Taxi Trip Analytics
// Author: Gabriel Demetrios Lafis

//! # Taxi Trip Analytics
//!
//! An in-memory analytical query engine over taxi trip records.
//!
//! ## Features
//!
//! - Loading trips from CSV or JSON into an immutable, shared dataset
//! - Time-ranged trip summaries and weekly bucketing
//! - Group-by aggregation by vendor, hour, payment type, date and month
//! - Top-N rankings and threshold selections with stable tie-breaking
//! - Null sanitization of every result before it leaves the engine
//! - REST API for remote access
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use chrono::NaiveDate;
//! use taxi_trip_analytics::{
//!     data::{Dataset, TripRecord},
//!     processing::{QuerySpec, TripQuery, TripService},
//! };
//!
//! let pickup = NaiveDate::from_ymd_opt(2024, 1, 2)
//!     .unwrap()
//!     .and_hms_opt(8, 30, 0)
//!     .unwrap();
//!
//! let dataset = Dataset::new(vec![TripRecord {
//!     pickup_datetime: Some(pickup),
//!     total_amount: Some(25.0),
//!     ..TripRecord::default()
//! }]);
//!
//! let service = TripService::new(Arc::new(dataset));
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(0, 0, 0).unwrap();
//!
//! let weeks = service
//!     .execute(&TripQuery::WeeklyTrips(QuerySpec::new(start, end)))
//!     .unwrap();
//!
//! assert_eq!(weeks.as_array().unwrap().len(), 5);
//! ```

pub mod api;
pub mod data;
pub mod processing;
pub mod storage;
pub mod utils;

// Re-export main types
pub use api::Server;
pub use data::{Column, Dataset, Record, TripRecord, Value};
pub use processing::{QuerySpec, TripQuery, TripService};
pub use storage::DatasetSlot;
pub use utils::Config;

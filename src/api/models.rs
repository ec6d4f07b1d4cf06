// API request models
// Author: Gabriel Demetrios Lafis

use serde::Deserialize;

use crate::data::parse_timestamp;
use crate::processing::QuerySpec;
use super::ApiError;

/// Body of the time-ranged trip queries
#[derive(Debug, Clone, Deserialize)]
pub struct TripQueryRequest {
    pub start: String,
    pub end: String,
    pub pu_location_id: Option<i64>,
    pub do_location_id: Option<i64>,
}

impl TryFrom<TripQueryRequest> for QuerySpec {
    type Error = ApiError;

    fn try_from(req: TripQueryRequest) -> Result<Self, Self::Error> {
        Ok(QuerySpec {
            start: parse_timestamp(&req.start)?,
            end: parse_timestamp(&req.end)?,
            pu_location_id: req.pu_location_id,
            do_location_id: req.do_location_id,
        })
    }
}

/// `?n=` for sampling
#[derive(Debug, Clone, Deserialize)]
pub struct SampleParams {
    pub n: i64,
}

/// `?passenger_count=`
#[derive(Debug, Clone, Deserialize)]
pub struct PassengerParams {
    pub passenger_count: i64,
}

/// `?top=` for ranking queries
#[derive(Debug, Clone, Deserialize)]
pub struct TopParams {
    pub top: i64,
}

/// `?min_tip=`
#[derive(Debug, Clone, Deserialize)]
pub struct TipParams {
    pub min_tip: f64,
}

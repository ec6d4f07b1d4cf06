// API request handlers
// Author: Gabriel Demetrios Lafis

use actix_web::{web, HttpResponse};

use crate::processing::{QuerySpec, TripQuery};
use crate::utils::{validate_finite, validate_non_negative};
use super::{models::*, ApiError, AppState};

/// Run a query against the installed dataset and render its result
async fn respond(state: web::Data<AppState>, query: TripQuery) -> Result<HttpResponse, ApiError> {
    let service = state.service()?;
    let result = service.execute(&query)?;

    Ok(HttpResponse::Ok().json(result))
}

/// Trips starting and ending inside a time range
pub async fn trips_summary(
    state: web::Data<AppState>,
    payload: web::Json<TripQueryRequest>,
) -> Result<HttpResponse, ApiError> {
    let spec = QuerySpec::try_from(payload.into_inner())?;
    respond(state, TripQuery::TripSummary(spec)).await
}

/// Trips picked up inside a time range, by week
pub async fn weekly_trips(
    state: web::Data<AppState>,
    payload: web::Json<TripQueryRequest>,
) -> Result<HttpResponse, ApiError> {
    let spec = QuerySpec::try_from(payload.into_inner())?;
    respond(state, TripQuery::WeeklyTrips(spec)).await
}

/// Dataset shape and null counts
pub async fn summary(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::DatasetSummary).await
}

/// Random rows
pub async fn sample(
    state: web::Data<AppState>,
    params: web::Query<SampleParams>,
) -> Result<HttpResponse, ApiError> {
    let n = validate_non_negative(params.n, "n").map_err(ApiError::ValidationError)?;
    respond(state, TripQuery::Sample { n }).await
}

/// Trips with an exact passenger count
pub async fn filtered_passengers(
    state: web::Data<AppState>,
    params: web::Query<PassengerParams>,
) -> Result<HttpResponse, ApiError> {
    let passenger_count = params.passenger_count;
    respond(state, TripQuery::FilteredByPassengerCount { passenger_count }).await
}

pub async fn trip_duration_preview(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::TripDurationPreview { limit: None }).await
}

pub async fn daily_trips(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::DailyTrips).await
}

/// Busiest pickup zones
pub async fn top_pickup_locations(
    state: web::Data<AppState>,
    params: web::Query<TopParams>,
) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::TopPickupLocations { top: params.top }).await
}

pub async fn revenue_by_vendor(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::RevenueByVendor).await
}

pub async fn avg_fare_per_mile(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::AvgFarePerMile).await
}

pub async fn peak_hours(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::PeakHours).await
}

pub async fn payment_split(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::PaymentSplit).await
}

pub async fn airport_trips(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::AirportTrips { limit: None }).await
}

pub async fn passenger_distribution(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::PassengerDistribution).await
}

/// Trips tipping more than a bound
pub async fn high_tips(
    state: web::Data<AppState>,
    params: web::Query<TipParams>,
) -> Result<HttpResponse, ApiError> {
    let min_tip = validate_finite(params.min_tip, "min_tip").map_err(ApiError::ValidationError)?;
    respond(state, TripQuery::HighTips { min_tip, limit: None }).await
}

/// Longest trips by distance
pub async fn longest_trips(
    state: web::Data<AppState>,
    params: web::Query<TopParams>,
) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::LongestTrips { top: params.top }).await
}

pub async fn congestion_impact(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::CongestionImpact).await
}

pub async fn avg_duration_vendor(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::AvgDurationVendor).await
}

pub async fn monthly_revenue(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    respond(state, TripQuery::MonthlyRevenue).await
}

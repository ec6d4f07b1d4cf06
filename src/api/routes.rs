// API routes configuration
// Author: Gabriel Demetrios Lafis

use actix_web::{web, HttpResponse, Responder};

use super::{handlers, ApiError};

/// Configure API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Malformed parameters get the same error body as engine faults
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                ApiError::ValidationError(err.to_string()).into()
            }))
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                ApiError::ValidationError(err.to_string()).into()
            }))

            // Health check
            .route("/health", web::get().to(health_check))

            // Time-ranged queries
            .route("/trips_summary", web::post().to(handlers::trips_summary))
            .route("/weekly_trips", web::post().to(handlers::weekly_trips))

            // Dataset inspection
            .route("/summary", web::get().to(handlers::summary))
            .route("/sample", web::get().to(handlers::sample))
            .route("/filtered_passengers", web::get().to(handlers::filtered_passengers))
            .route("/trip_duration_preview", web::get().to(handlers::trip_duration_preview))

            // Aggregations
            .route("/daily_trips", web::get().to(handlers::daily_trips))
            .route("/revenue_by_vendor", web::get().to(handlers::revenue_by_vendor))
            .route("/avg_fare_per_mile", web::get().to(handlers::avg_fare_per_mile))
            .route("/peak_hours", web::get().to(handlers::peak_hours))
            .route("/payment_split", web::get().to(handlers::payment_split))
            .route("/passenger_distribution", web::get().to(handlers::passenger_distribution))
            .route("/congestion_impact", web::get().to(handlers::congestion_impact))
            .route("/avg_duration_vendor", web::get().to(handlers::avg_duration_vendor))
            .route("/monthly_revenue", web::get().to(handlers::monthly_revenue))

            // Rankings and selections
            .route("/top_pickup_locations", web::get().to(handlers::top_pickup_locations))
            .route("/airport_trips", web::get().to(handlers::airport_trips))
            .route("/high_tips", web::get().to(handlers::high_tips))
            .route("/longest_trips", web::get().to(handlers::longest_trips)),
    );
}

/// Health check handler
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

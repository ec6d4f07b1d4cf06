// HTTP API tests
// Author: Gabriel Demetrios Lafis

use actix_web::{http::StatusCode, test, web, App};
use serde_json::{json, Value as JsonValue};

use taxi_trip_analytics::{
    api::{configure, AppState},
    data::{parse_timestamp, Dataset, TripRecord},
    processing::QueryOptions,
    storage::DatasetSlot,
};

fn trip(vendor: i64, pickup: &str, dropoff: &str, total: f64, tip: f64) -> TripRecord {
    TripRecord {
        vendor_id: Some(vendor),
        pickup_datetime: Some(parse_timestamp(pickup).unwrap()),
        dropoff_datetime: Some(parse_timestamp(dropoff).unwrap()),
        passenger_count: Some(1),
        trip_distance: Some(2.0),
        pu_location_id: Some(100 + vendor),
        do_location_id: Some(200),
        payment_type: Some(1),
        fare_amount: Some(total - tip),
        tip_amount: Some(tip),
        total_amount: Some(total),
        ..TripRecord::default()
    }
}

fn loaded_state() -> web::Data<AppState> {
    let dataset = Dataset::new(vec![
        trip(1, "2024-01-01 09:00:00", "2024-01-01 09:30:00", 10.0, 1.0),
        trip(2, "2024-01-08 09:00:00", "2024-01-08 09:30:00", 20.0, 25.0),
        trip(1, "2024-01-20 09:00:00", "2024-01-20 09:30:00", 30.0, 3.0),
    ]);
    web::Data::new(AppState::new(
        DatasetSlot::with_dataset(dataset),
        QueryOptions::default(),
    ))
}

#[actix_web::test]
async fn test_health_check() {
    let app = test::init_service(App::new().configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_weekly_trips() {
    let app = test::init_service(App::new().app_data(loaded_state()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/weekly_trips")
        .set_json(json!({"start": "2024-01-01", "end": "2024-01-21"}))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        json!([
            {"week_start": "2024-01-01", "week_end": "2024-01-07", "num_trips": 1, "total_amount": 10.0},
            {"week_start": "2024-01-08", "week_end": "2024-01-14", "num_trips": 1, "total_amount": 20.0},
            {"week_start": "2024-01-15", "week_end": "2024-01-21", "num_trips": 1, "total_amount": 30.0},
        ])
    );
}

#[actix_web::test]
async fn test_trips_summary_with_location() {
    let app = test::init_service(App::new().app_data(loaded_state()).configure(configure)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/trips_summary")
        .set_json(json!({
            "start": "2024-01-01 00:00:00",
            "end": "2024-02-01 00:00:00",
            "pu_location_id": 101,
        }))
        .to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({"num_trips": 2, "total_amount": 40.0}));
}

#[actix_web::test]
async fn test_get_queries() {
    let app = test::init_service(App::new().app_data(loaded_state()).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/v1/revenue_by_vendor").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!([
            {"vendor_id": 1, "total_amount": 40.0},
            {"vendor_id": 2, "total_amount": 20.0},
        ])
    );

    let req = test::TestRequest::get().uri("/api/v1/high_tips?min_tip=20").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["VendorID"], 2);
    assert_eq!(body[0]["tpep_pickup_datetime"], "2024-01-08T09:00:00");
    assert!(body[0]["Airport_fee"].is_null());

    let req = test::TestRequest::get().uri("/api/v1/top_pickup_locations?top=1").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([{"location_id": 101, "count": 2}]));

    let req = test::TestRequest::get().uri("/api/v1/avg_duration_vendor").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"1": 30.0, "2": 30.0}));

    let req = test::TestRequest::get().uri("/api/v1/summary").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["row_count"], 3);
    assert_eq!(body["unique_vendors"], json!([1, 2]));
}

#[actix_web::test]
async fn test_empty_mean_renders_null() {
    let dataset = Dataset::new(vec![TripRecord {
        fare_amount: Some(8.0),
        trip_distance: Some(0.0),
        ..TripRecord::default()
    }]);
    let state = web::Data::new(AppState::new(
        DatasetSlot::with_dataset(dataset),
        QueryOptions::default(),
    ));
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/v1/avg_fare_per_mile").to_request();
    let body: JsonValue = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({"avg_fare_per_mile": null}));
}

#[actix_web::test]
async fn test_not_initialized() {
    let state = web::Data::new(AppState::default());
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;

    let req = test::TestRequest::get().uri("/api/v1/peak_hours").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: JsonValue = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().contains("not initialized"));
}

#[actix_web::test]
async fn test_bad_requests() {
    let app = test::init_service(App::new().app_data(loaded_state()).configure(configure)).await;

    // Unparseable timestamp
    let req = test::TestRequest::post()
        .uri("/api/v1/trips_summary")
        .set_json(json!({"start": "last tuesday", "end": "2024-02-01"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: JsonValue = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    // Negative sample size
    let req = test::TestRequest::get().uri("/api/v1/sample?n=-1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // More rows than the dataset holds
    let req = test::TestRequest::get().uri("/api/v1/sample?n=10").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: JsonValue = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    // Missing query parameter
    let req = test::TestRequest::get().uri("/api/v1/longest_trips").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: JsonValue = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}

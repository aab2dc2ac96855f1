//! HTTP-level tests: drive the router directly with an in-memory database.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::util::ServiceExt;

use forecourt_db::{Database, DbConfig};

async fn test_app() -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    forecourt_api::router(forecourt_api::AppState::new(db))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Station with one petrol nozzle, one employee, and a price of ₹100/L from
/// 2025-11-01. Returns (station_id, nozzle_id, employee_id).
async fn seed(app: &Router) -> (String, String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/stations",
        Some(json!({"name": "Highway 8 Pumps"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let station_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        "POST",
        &format!("/stations/{station_id}/nozzles"),
        Some(json!({"fuel_type": "petrol", "label": "P1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let nozzle_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        "POST",
        &format!("/stations/{station_id}/employees"),
        Some(json!({"name": "Ravi Kumar"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let employee_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        app,
        "POST",
        &format!("/stations/{station_id}/prices"),
        Some(json!({
            "fuel_type": "petrol",
            "price": 100.0,
            "effective_from": "2025-11-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    (station_id, nozzle_id, employee_id)
}

fn reading_body(nozzle_id: &str, employee_id: &str, date: &str, meter: f64, cash: f64) -> Value {
    json!({
        "nozzle_id": nozzle_id,
        "employee_id": employee_id,
        "reading_date": date,
        "meter_litres": meter,
        "cash": cash,
    })
}

#[tokio::test]
async fn test_health() {
    let app = test_app().await;
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn test_record_reading_envelope() {
    let app = test_app().await;
    let (_, nozzle_id, employee_id) = seed(&app).await;

    // First reading is the initial one (counts from zero): 100 L × ₹100
    let (status, body) = send(
        &app,
        "POST",
        "/readings",
        Some(reading_body(&nozzle_id, &employee_id, "2025-12-01", 100.0, 10_000.0)),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["litres_sold_millilitres"], json!(100_000));
    assert_eq!(body["data"]["price_paise_per_litre"], json!(10_000));
    assert_eq!(body["data"]["total_amount_paise"], json!(1_000_000));
    assert_eq!(body["data"]["is_initial"], json!(true));
}

#[tokio::test]
async fn test_duplicate_reading_is_409() {
    let app = test_app().await;
    let (_, nozzle_id, employee_id) = seed(&app).await;

    let body = reading_body(&nozzle_id, &employee_id, "2025-12-01", 100.0, 10_000.0);
    let (status, _) = send(&app, "POST", "/readings", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, response) = send(&app, "POST", "/readings", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(response["success"], json!(false));
    assert!(response["error"].as_str().unwrap().contains("2025-12-01"));
}

#[tokio::test]
async fn test_payment_mismatch_is_422() {
    let app = test_app().await;
    let (_, nozzle_id, employee_id) = seed(&app).await;

    // 100 L × ₹100 = ₹10,000 but only ₹9,000 allocated
    let (status, body) = send(
        &app,
        "POST",
        "/readings",
        Some(reading_body(&nozzle_id, &employee_id, "2025-12-01", 100.0, 9_000.0)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_missing_price_is_422() {
    let app = test_app().await;
    let (station_id, _, employee_id) = seed(&app).await;

    // Diesel nozzle has no price history
    let (status, body) = send(
        &app,
        "POST",
        &format!("/stations/{station_id}/nozzles"),
        Some(json!({"fuel_type": "diesel", "label": "D1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let diesel_nozzle = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        "/readings",
        Some(reading_body(&diesel_nozzle, &employee_id, "2025-12-01", 50.0, 0.0)),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("no price"));
}

#[tokio::test]
async fn test_unknown_nozzle_is_404() {
    let app = test_app().await;
    let (_, _, employee_id) = seed(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/readings",
        Some(reading_body("no-such-nozzle", &employee_id, "2025-12-01", 50.0, 0.0)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_effective_price_resolution() {
    let app = test_app().await;
    let (station_id, _, _) = seed(&app).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/stations/{station_id}/prices/effective?fuel_type=petrol&date=2025-12-15"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price_paise_per_litre"], json!(10_000));

    // Before the first effective date: no price, loud failure
    let (status, _) = send(
        &app,
        "GET",
        &format!("/stations/{station_id}/prices/effective?fuel_type=petrol&date=2025-10-01"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_settlement_flow_with_meta() {
    let app = test_app().await;
    let (station_id, nozzle_id, employee_id) = seed(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/readings",
        Some(reading_body(&nozzle_id, &employee_id, "2025-12-01", 100.0, 10_000.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // ₹2 short
    let (status, body) = send(
        &app,
        "POST",
        &format!("/stations/{station_id}/settlements"),
        Some(json!({"date": "2025-12-01", "actual_cash": 9_998.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["already_settled"], json!(false));
    assert_eq!(body["data"]["settlement"]["variance_paise"], json!(-200));
    assert_eq!(
        body["data"]["shortfalls"][0]["shortfall_paise"],
        json!(200)
    );

    // Re-settle: replaced, flagged
    let (status, body) = send(
        &app,
        "POST",
        &format!("/stations/{station_id}/settlements"),
        Some(json!({"date": "2025-12-01", "actual_cash": 10_000.0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["already_settled"], json!(true));
    assert_eq!(body["data"]["settlement"]["variance_paise"], json!(0));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/stations/{station_id}/settlements?date=2025-12-01"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["settlement"]["variance_paise"], json!(0));
}

#[tokio::test]
async fn test_settlement_not_found_is_404() {
    let app = test_app().await;
    let (station_id, _, _) = seed(&app).await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/stations/{station_id}/settlements?date=2025-12-01"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_daily_sales_exact_date() {
    let app = test_app().await;
    let (station_id, nozzle_id, employee_id) = seed(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/readings",
        Some(reading_body(&nozzle_id, &employee_id, "2025-12-01", 100.0, 10_000.0)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        "GET",
        &format!("/stations/{station_id}/daily-sales?date=2025-12-01"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["revenue_paise"], json!(1_000_000));

    let (_, body) = send(
        &app,
        "GET",
        &format!("/stations/{station_id}/daily-sales?date=2025-12-02"),
        None,
    )
    .await;
    assert_eq!(body["data"]["revenue_paise"], json!(0));

    // Timestamps are not dates
    let (status, _) = send(
        &app,
        "GET",
        &format!("/stations/{station_id}/daily-sales?date=2025-12-01T00:00:00Z"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_bad_date_range_is_422() {
    let app = test_app().await;
    let (station_id, _, _) = seed(&app).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!(
            "/stations/{station_id}/sales-summary?start_date=2025-12-10&end_date=2025-12-01"
        ),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], json!(false));
}

//! # HTTP Routes
//!
//! Route definitions and the response envelope.
//!
//! ## Route Map
//! ```text
//! POST /stations                                     create station
//! GET  /stations                                     list stations
//! POST /stations/{id}/nozzles                        create nozzle
//! POST /stations/{id}/employees                      create employee
//! POST /stations/{id}/prices                         append price row
//! GET  /stations/{id}/prices?fuel_type=              price history
//! GET  /stations/{id}/prices/effective?fuel_type=&date=  resolve price
//! POST /readings                                     record a reading
//! GET  /stations/{id}/daily-sales?date=              daily report
//! GET  /stations/{id}/sales-summary?start_date=&end_date=  range report
//! POST /stations/{id}/settlements                    settle a day
//! GET  /stations/{id}/settlements?date=              fetch a settlement
//! GET  /stations/{id}/employee-shortfalls?start_date=&end_date=
//! GET  /health
//! ```
//!
//! Every success is `{"success": true, "data": …}` (plus optional `"meta"`);
//! every failure is `{"success": false, "error": "…"}` with the status code
//! carrying the category (422 validation, 409 conflict, 404 missing).

pub mod prices;
pub mod readings;
pub mod reports;
pub mod settlements;
pub mod stations;

use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};

use crate::state::AppState;

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/stations",
            post(stations::create_station).get(stations::list_stations),
        )
        .route("/stations/{id}/nozzles", post(stations::create_nozzle))
        .route("/stations/{id}/employees", post(stations::create_employee))
        .route(
            "/stations/{id}/prices",
            post(prices::set_price).get(prices::price_history),
        )
        .route("/stations/{id}/prices/effective", get(prices::effective_price))
        .route("/readings", post(readings::record_reading))
        .route("/stations/{id}/daily-sales", get(reports::daily_sales))
        .route("/stations/{id}/sales-summary", get(reports::sales_summary))
        .route(
            "/stations/{id}/settlements",
            post(settlements::settle).get(settlements::get_settlement),
        )
        .route(
            "/stations/{id}/employee-shortfalls",
            get(reports::employee_shortfalls),
        )
        .with_state(state)
}

async fn health(axum::extract::State(state): axum::extract::State<AppState>) -> Response {
    if state.db.health_check().await {
        ok(json!({"status": "ok"})).into_response()
    } else {
        (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"success": false, "error": "database unavailable"})),
        )
            .into_response()
    }
}

/// Success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Value> {
    Json(json!({"success": true, "data": data}))
}

/// Success envelope with a meta object.
pub fn ok_with_meta<T: Serialize>(data: T, meta: Value) -> Json<Value> {
    Json(json!({"success": true, "data": data, "meta": meta}))
}

/// 201 Created wrapper around the success envelope.
pub fn created<T: Serialize>(data: T) -> impl IntoResponse {
    (axum::http::StatusCode::CREATED, ok(data))
}

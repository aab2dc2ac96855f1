//! Station, nozzle, and employee handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;

use forecourt_core::FuelType;

use crate::error::ApiResult;
use crate::routes::{created, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateStationRequest {
    pub name: String,
}

pub async fn create_station(
    State(state): State<AppState>,
    Json(req): Json<CreateStationRequest>,
) -> ApiResult<impl IntoResponse> {
    let station = state.db.stations().create_station(&req.name).await?;
    Ok(created(station))
}

pub async fn list_stations(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let stations = state.db.stations().list_stations().await?;
    Ok(ok(stations))
}

#[derive(Debug, Deserialize)]
pub struct CreateNozzleRequest {
    pub fuel_type: String,
    pub label: String,
}

pub async fn create_nozzle(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Json(req): Json<CreateNozzleRequest>,
) -> ApiResult<impl IntoResponse> {
    let fuel_type = FuelType::from_str(&req.fuel_type)?;
    let nozzle = state
        .db
        .stations()
        .create_nozzle(&station_id, fuel_type, &req.label)
        .await?;
    Ok(created(nozzle))
}

#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    pub name: String,
}

pub async fn create_employee(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Json(req): Json<CreateEmployeeRequest>,
) -> ApiResult<impl IntoResponse> {
    let employee = state
        .db
        .stations()
        .create_employee(&station_id, &req.name)
        .await?;
    Ok(created(employee))
}

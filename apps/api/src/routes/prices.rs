//! Fuel price handlers.
//!
//! Prices arrive as rupee decimals (`"price": 95.50`) and are converted to
//! integer paise exactly once, here at the boundary. Everything past this
//! file is integer arithmetic.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::str::FromStr;

use forecourt_core::validation::parse_business_date;
use forecourt_core::{FuelType, Money, ValidationError};

use crate::error::{ApiError, ApiResult};
use crate::routes::{created, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetPriceRequest {
    pub fuel_type: String,
    /// Per-litre price in rupees, e.g. 95.50
    pub price: f64,
    /// First date this price applies, "YYYY-MM-DD"
    pub effective_from: String,
}

pub async fn set_price(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Json(req): Json<SetPriceRequest>,
) -> ApiResult<impl IntoResponse> {
    let fuel_type = FuelType::from_str(&req.fuel_type)?;
    let effective_from = parse_business_date("effective_from", &req.effective_from)?;
    let price = Money::from_rupees_f64(req.price).ok_or_else(|| {
        ApiError::from(ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: "not a representable amount".to_string(),
        })
    })?;

    // Station existence is enforced here; the insert itself only sees the FK
    state.db.stations().require_station(&station_id).await?;

    let row = state
        .db
        .prices()
        .set_price(&station_id, fuel_type, price, effective_from)
        .await?;
    Ok(created(row))
}

#[derive(Debug, Deserialize)]
pub struct PriceHistoryQuery {
    pub fuel_type: String,
}

pub async fn price_history(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(query): Query<PriceHistoryQuery>,
) -> ApiResult<impl IntoResponse> {
    let fuel_type = FuelType::from_str(&query.fuel_type)?;
    state.db.stations().require_station(&station_id).await?;
    let rows = state.db.prices().history(&station_id, fuel_type).await?;
    Ok(ok(rows))
}

#[derive(Debug, Deserialize)]
pub struct EffectivePriceQuery {
    pub fuel_type: String,
    pub date: String,
}

pub async fn effective_price(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(query): Query<EffectivePriceQuery>,
) -> ApiResult<impl IntoResponse> {
    let fuel_type = FuelType::from_str(&query.fuel_type)?;
    let date = parse_business_date("date", &query.date)?;
    let row = state.db.prices().resolve(&station_id, fuel_type, date).await?;
    Ok(ok(row))
}

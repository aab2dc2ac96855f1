//! Settlement handlers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use forecourt_core::validation::parse_business_date;
use forecourt_core::{CoreError, Money, ValidationError};

use crate::error::{ApiError, ApiResult};
use crate::routes::{ok, ok_with_meta};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SettleRequest {
    /// Settlement date, "YYYY-MM-DD"
    pub date: String,
    /// Physical cash count in rupees
    pub actual_cash: f64,
    pub notes: Option<String>,
}

pub async fn settle(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Json(req): Json<SettleRequest>,
) -> ApiResult<impl IntoResponse> {
    let date = parse_business_date("date", &req.date)?;
    let actual_cash = Money::from_rupees_f64(req.actual_cash).ok_or_else(|| {
        ApiError::from(ValidationError::InvalidFormat {
            field: "actual_cash".to_string(),
            reason: "not a representable amount".to_string(),
        })
    })?;

    let outcome = state
        .db
        .settlements()
        .settle(&station_id, date, actual_cash, req.notes)
        .await?;

    Ok(ok_with_meta(
        json!({
            "settlement": outcome.settlement,
            "shortfalls": outcome.shortfalls,
        }),
        json!({"already_settled": outcome.already_settled}),
    ))
}

#[derive(Debug, Deserialize)]
pub struct SettlementQuery {
    pub date: String,
}

pub async fn get_settlement(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(query): Query<SettlementQuery>,
) -> ApiResult<impl IntoResponse> {
    let date = parse_business_date("date", &query.date)?;
    state.db.stations().require_station(&station_id).await?;

    let (settlement, shortfalls) = state
        .db
        .settlements()
        .get(&station_id, date)
        .await?
        .ok_or(CoreError::SettlementNotFound {
            station_id: station_id.clone(),
            date,
        })
        .map_err(ApiError::from)?;

    Ok(ok(json!({
        "settlement": settlement,
        "shortfalls": shortfalls,
    })))
}

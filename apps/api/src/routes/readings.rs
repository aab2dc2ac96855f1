//! Reading recording handler.
//!
//! The request carries the raw operator inputs: meter value in litres and the
//! payment split in rupees. Litres sold, the effective price, and the sale
//! amount are computed server-side inside the recording transaction; a client
//! cannot submit its own valuation.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use forecourt_core::validation::parse_business_date;
use forecourt_core::{Money, PaymentAllocation, ValidationError, Volume};
use forecourt_db::NewReading;

use crate::error::{ApiError, ApiResult};
use crate::routes::created;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordReadingRequest {
    pub nozzle_id: String,
    pub employee_id: String,
    /// Business date, "YYYY-MM-DD"
    pub reading_date: String,
    /// Cumulative meter value in litres, e.g. 10542.75
    pub meter_litres: f64,
    /// Payment split in rupees; must sum to the computed sale amount
    #[serde(default)]
    pub cash: f64,
    #[serde(default)]
    pub online: f64,
    #[serde(default)]
    pub credit: f64,
    #[serde(default)]
    pub is_sample: bool,
}

fn rupees(field: &'static str, value: f64) -> Result<Money, ApiError> {
    Money::from_rupees_f64(value).ok_or_else(|| {
        ApiError::from(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "not a representable amount".to_string(),
        })
    })
}

pub async fn record_reading(
    State(state): State<AppState>,
    Json(req): Json<RecordReadingRequest>,
) -> ApiResult<impl IntoResponse> {
    let reading_date = parse_business_date("reading_date", &req.reading_date)?;
    let meter = Volume::from_litres_f64(req.meter_litres).ok_or_else(|| {
        ApiError::from(ValidationError::InvalidFormat {
            field: "meter_litres".to_string(),
            reason: "not a representable volume".to_string(),
        })
    })?;
    let allocation = PaymentAllocation::new(
        rupees("cash", req.cash)?,
        rupees("online", req.online)?,
        rupees("credit", req.credit)?,
    );

    let reading = state
        .db
        .readings()
        .record(NewReading {
            nozzle_id: req.nozzle_id,
            employee_id: req.employee_id,
            reading_date,
            meter,
            allocation,
            is_sample: req.is_sample,
        })
        .await?;

    Ok(created(reading))
}

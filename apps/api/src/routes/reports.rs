//! Reporting handlers.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::Deserialize;

use forecourt_core::validation::parse_business_date;

use crate::error::ApiResult;
use crate::routes::ok;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: String,
}

pub async fn daily_sales(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> ApiResult<impl IntoResponse> {
    let date = parse_business_date("date", &query.date)?;
    let summary = state.db.reports().daily_sales(&station_id, date).await?;
    Ok(ok(summary))
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_date: String,
    pub end_date: String,
}

impl RangeQuery {
    fn parse(&self) -> ApiResult<(chrono::NaiveDate, chrono::NaiveDate)> {
        let start = parse_business_date("start_date", &self.start_date)?;
        let end = parse_business_date("end_date", &self.end_date)?;
        Ok((start, end))
    }
}

pub async fn sales_summary(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<impl IntoResponse> {
    let (start, end) = query.parse()?;
    let summary = state.db.reports().range_sales(&station_id, start, end).await?;
    Ok(ok(summary))
}

pub async fn employee_shortfalls(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<impl IntoResponse> {
    let (start, end) = query.parse()?;
    let summary = state
        .db
        .reports()
        .employee_shortfalls(&station_id, start, end)
        .await?;
    Ok(ok(summary))
}

//! # Report Repository
//!
//! Read-only aggregation queries.
//!
//! ## Valuation Rule
//! Revenue is recomputed from each reading's STORED price snapshot via
//! [`forecourt_core::reporting::summarize_readings`]; these queries never
//! join `fuel_prices`, so a price change after the fact cannot move a
//! historical total.
//!
//! ## Date Matching
//! `reading_date` is a TEXT `YYYY-MM-DD` column and all filters are plain
//! equality or lexicographic BETWEEN on that column. A "today" query for
//! 2026-01-25 can never pick up a 2026-01-26 row stored as a midnight
//! timestamp, because no timestamps are involved at all.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::{DbError, DbResult};
use forecourt_core::reporting::{summarize_readings, EmployeeShortfallSummary, SalesSummary};
use forecourt_core::validation::validate_date_range;
use forecourt_core::{CoreError, NozzleReading};

/// Repository for read-only reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Daily sales for a station: totals plus fuel-type and payment-mode
    /// breakdowns, for that exact calendar date only.
    pub async fn daily_sales(&self, station_id: &str, date: NaiveDate) -> DbResult<SalesSummary> {
        self.range_sales(station_id, date, date).await
    }

    /// Sales summary over an inclusive date range.
    pub async fn range_sales(
        &self,
        station_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<SalesSummary> {
        validate_date_range(start, end).map_err(CoreError::from)?;
        self.require_station(station_id).await?;

        let readings = sqlx::query_as::<_, NozzleReading>(
            r#"
            SELECT id, nozzle_id, station_id, fuel_type, employee_id,
                   reading_date, meter_millilitres, litres_sold_millilitres,
                   price_paise_per_litre, total_amount_paise,
                   cash_paise, online_paise, credit_paise,
                   is_sample, is_initial, created_at
            FROM nozzle_readings
            WHERE station_id = ?1
              AND reading_date BETWEEN ?2 AND ?3
              AND is_sample = 0
              AND (is_initial = 0 OR litres_sold_millilitres > 0)
            ORDER BY reading_date, created_at
            "#,
        )
        .bind(station_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(summarize_readings(&readings))
    }

    /// Per-employee shortfall totals over a settlement date range.
    pub async fn employee_shortfalls(
        &self,
        station_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> DbResult<Vec<EmployeeShortfallSummary>> {
        validate_date_range(start, end).map_err(CoreError::from)?;
        self.require_station(station_id).await?;

        let rows = sqlx::query_as::<_, EmployeeShortfallSummary>(
            r#"
            SELECT sf.employee_id,
                   sf.employee_name,
                   COALESCE(SUM(sf.shortfall_paise), 0) AS total_shortfall_paise,
                   COUNT(DISTINCT sf.settlement_id) AS settlement_count,
                   COALESCE(SUM(sf.reading_count), 0) AS reading_count
            FROM settlement_shortfalls sf
            JOIN settlements s ON s.id = sf.settlement_id
            WHERE s.station_id = ?1
              AND s.settlement_date BETWEEN ?2 AND ?3
            GROUP BY sf.employee_id, sf.employee_name
            ORDER BY total_shortfall_paise DESC
            "#,
        )
        .bind(station_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn require_station(&self, station_id: &str) -> DbResult<()> {
        let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stations WHERE id = ?1")
            .bind(station_id)
            .fetch_one(&self.pool)
            .await?;
        if exists == 0 {
            return Err(DbError::not_found("Station", station_id));
        }
        Ok(())
    }
}

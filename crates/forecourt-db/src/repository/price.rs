//! # Fuel Price Repository
//!
//! The append-only price history.
//!
//! ## Append-Only Log
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  set_price() INSERTs a new row. There is no update_price() and no       │
//! │  delete_price() - superseded rows stay forever so that historical      │
//! │  lookups (and therefore historical sale valuations) stay correct       │
//! │  after every later price change.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Resolution fetches the `(station, fuel_type)` rows and delegates to
//! [`forecourt_core::pricing`], so the repository and the core unit tests
//! exercise the same selection logic.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use forecourt_core::pricing::require_effective_price;
use forecourt_core::validation::validate_price;
use forecourt_core::{FuelPrice, FuelType, Money};

/// Repository for fuel price history.
#[derive(Debug, Clone)]
pub struct FuelPriceRepository {
    pool: SqlitePool,
}

impl FuelPriceRepository {
    /// Creates a new FuelPriceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FuelPriceRepository { pool }
    }

    /// Appends a price row effective from the given date.
    ///
    /// ## Errors
    /// - `UniqueViolation` when a price already exists for this exact
    ///   (station, fuel type, effective date)
    /// - Validation failure for non-positive prices
    pub async fn set_price(
        &self,
        station_id: &str,
        fuel_type: FuelType,
        price: Money,
        effective_from: NaiveDate,
    ) -> DbResult<FuelPrice> {
        validate_price(price).map_err(forecourt_core::CoreError::from)?;

        let row = FuelPrice {
            id: new_id(),
            station_id: station_id.to_string(),
            fuel_type,
            price_paise_per_litre: price.paise(),
            effective_from,
            created_at: Utc::now(),
        };

        debug!(
            station_id,
            %fuel_type,
            price = %price,
            effective_from = %effective_from,
            "appending fuel price"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO fuel_prices (
                id, station_id, fuel_type, price_paise_per_litre,
                effective_from, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&row.id)
        .bind(&row.station_id)
        .bind(row.fuel_type)
        .bind(row.price_paise_per_litre)
        .bind(row.effective_from)
        .bind(row.created_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(row),
            Err(e) => match DbError::from(e) {
                DbError::UniqueViolation { .. } => Err(DbError::duplicate(
                    "fuel price effective date",
                    format!("{station_id}/{fuel_type}/{effective_from}"),
                )),
                other => Err(other),
            },
        }
    }

    /// Full price history for (station, fuel type), newest first.
    pub async fn history(
        &self,
        station_id: &str,
        fuel_type: FuelType,
    ) -> DbResult<Vec<FuelPrice>> {
        let rows = sqlx::query_as::<_, FuelPrice>(
            r#"
            SELECT id, station_id, fuel_type, price_paise_per_litre,
                   effective_from, created_at
            FROM fuel_prices
            WHERE station_id = ?1 AND fuel_type = ?2
            ORDER BY effective_from DESC
            "#,
        )
        .bind(station_id)
        .bind(fuel_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Resolves the price in effect on `date`.
    ///
    /// ## Errors
    /// `CoreError::NoPriceConfigured` (via `DbError::Domain`) when no row has
    /// `effective_from <= date`. Callers must surface this; defaulting to a
    /// zero price is the one historical defect this module exists to
    /// prevent.
    pub async fn resolve(
        &self,
        station_id: &str,
        fuel_type: FuelType,
        date: NaiveDate,
    ) -> DbResult<FuelPrice> {
        let history = self.history(station_id, fuel_type).await?;
        let hit = require_effective_price(&history, station_id, &fuel_type.to_string(), date)?;
        Ok(hit.clone())
    }
}

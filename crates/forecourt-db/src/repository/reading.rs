//! # Reading Repository
//!
//! Transactional recording of nozzle meter readings.
//!
//! ## Recording Pipeline (ONE transaction)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    1. Load nozzle (station + fuel type)        → 404 if unknown        │
//! │    2. Check employee exists                    → 404 if unknown        │
//! │    3. Check (nozzle, date) has no reading      → 409 if it does        │
//! │    4. Fetch previous meter value (none = initial reading)              │
//! │    5. Fetch price history, resolve effective   → 422 if no price       │
//! │    6. value_reading(): litres + amount         → 422 on rollback       │
//! │    7. check_allocation(): cash+online+credit   → 422 on mismatch       │
//! │    8. INSERT with the captured price snapshot                          │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any rejection drops the transaction unwritten - no partial writes.    │
//! │  A concurrent price change cannot land between steps 5 and 8.          │
//! │  The UNIQUE(nozzle_id, reading_date) index backstops step 3 under      │
//! │  concurrent submission.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::new_id;
use forecourt_core::pricing::require_effective_price;
use forecourt_core::validation::validate_non_negative;
use forecourt_core::valuation::{check_allocation, value_reading};
use forecourt_core::{
    CoreError, FuelPrice, Money, Nozzle, NozzleReading, PaymentAllocation, Volume,
};

/// Input for recording a reading. The valuation fields (litres, amount,
/// price) are computed, never accepted from the caller.
#[derive(Debug, Clone)]
pub struct NewReading {
    pub nozzle_id: String,
    pub employee_id: String,
    pub reading_date: NaiveDate,
    /// Cumulative meter value.
    pub meter: Volume,
    pub allocation: PaymentAllocation,
    /// Test/demo flag: persisted but excluded from every aggregate.
    pub is_sample: bool,
}

/// Repository for nozzle readings.
#[derive(Debug, Clone)]
pub struct ReadingRepository {
    pool: SqlitePool,
}

impl ReadingRepository {
    /// Creates a new ReadingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReadingRepository { pool }
    }

    /// Records a reading, computing and freezing its valuation.
    ///
    /// See the module docs for the transactional pipeline. The returned
    /// reading carries the captured price and computed amount.
    ///
    /// Readings must be entered in date order per nozzle: the previous
    /// meter value is always the nozzle's latest reading, so a backfilled
    /// reading dated before an existing one compares against the later
    /// (higher) meter and is rejected as a rollback.
    pub async fn record(&self, new: NewReading) -> DbResult<NozzleReading> {
        for (field, paise) in [
            ("cash", new.allocation.cash_paise),
            ("online", new.allocation.online_paise),
            ("credit", new.allocation.credit_paise),
        ] {
            validate_non_negative(field, Money::from_paise(paise)).map_err(CoreError::from)?;
        }

        let mut tx = self.pool.begin().await?;

        // 1. Nozzle gives us the station and fuel type
        let nozzle = sqlx::query_as::<_, Nozzle>(
            r#"
            SELECT id, station_id, fuel_type, label, is_active, created_at
            FROM nozzles
            WHERE id = ?1
            "#,
        )
        .bind(&new.nozzle_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::NozzleNotFound(new.nozzle_id.clone()))?;

        // 2. Employee must exist
        let employee_exists: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM employees WHERE id = ?1 AND station_id = ?2",
        )
        .bind(&new.employee_id)
        .bind(&nozzle.station_id)
        .fetch_one(&mut *tx)
        .await?;
        if employee_exists == 0 {
            return Err(CoreError::EmployeeNotFound(new.employee_id.clone()).into());
        }

        // 3. One reading per nozzle per date
        let already: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM nozzle_readings WHERE nozzle_id = ?1 AND reading_date = ?2",
        )
        .bind(&new.nozzle_id)
        .bind(new.reading_date)
        .fetch_one(&mut *tx)
        .await?;
        if already > 0 {
            return Err(CoreError::DuplicateReading {
                nozzle_id: new.nozzle_id.clone(),
                date: new.reading_date,
            }
            .into());
        }

        // 4. Previous meter value: latest reading by date, meter as tiebreak
        let previous: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT meter_millilitres
            FROM nozzle_readings
            WHERE nozzle_id = ?1
            ORDER BY reading_date DESC, meter_millilitres DESC
            LIMIT 1
            "#,
        )
        .bind(&new.nozzle_id)
        .fetch_optional(&mut *tx)
        .await?;

        // 5. Effective price on the reading date, inside this transaction
        let history = sqlx::query_as::<_, FuelPrice>(
            r#"
            SELECT id, station_id, fuel_type, price_paise_per_litre,
                   effective_from, created_at
            FROM fuel_prices
            WHERE station_id = ?1 AND fuel_type = ?2
            "#,
        )
        .bind(&nozzle.station_id)
        .bind(nozzle.fuel_type)
        .fetch_all(&mut *tx)
        .await?;
        let price = require_effective_price(
            &history,
            &nozzle.station_id,
            &nozzle.fuel_type.to_string(),
            new.reading_date,
        )?
        .price();

        // 6. Litres and amount
        let valuation = value_reading(
            &new.nozzle_id,
            previous.map(Volume::from_millilitres),
            new.meter,
            price,
        )
        .map_err(CoreError::from)?;

        // 7. Payment split must cover the amount
        check_allocation(new.allocation.total(), valuation.total_amount)
            .map_err(CoreError::from)?;

        // 8. Persist the frozen valuation
        let reading = NozzleReading {
            id: new_id(),
            nozzle_id: new.nozzle_id,
            station_id: nozzle.station_id,
            fuel_type: nozzle.fuel_type,
            employee_id: new.employee_id,
            reading_date: new.reading_date,
            meter_millilitres: new.meter.millilitres(),
            litres_sold_millilitres: valuation.litres_sold.millilitres(),
            price_paise_per_litre: price.paise(),
            total_amount_paise: valuation.total_amount.paise(),
            cash_paise: new.allocation.cash_paise,
            online_paise: new.allocation.online_paise,
            credit_paise: new.allocation.credit_paise,
            is_sample: new.is_sample,
            is_initial: valuation.is_initial,
            created_at: Utc::now(),
        };

        debug!(
            id = %reading.id,
            nozzle_id = %reading.nozzle_id,
            date = %reading.reading_date,
            litres = %reading.litres_sold(),
            amount = %reading.total_amount(),
            "recording reading"
        );

        let insert = sqlx::query(
            r#"
            INSERT INTO nozzle_readings (
                id, nozzle_id, station_id, fuel_type, employee_id,
                reading_date, meter_millilitres, litres_sold_millilitres,
                price_paise_per_litre, total_amount_paise,
                cash_paise, online_paise, credit_paise,
                is_sample, is_initial, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5,
                ?6, ?7, ?8,
                ?9, ?10,
                ?11, ?12, ?13,
                ?14, ?15, ?16
            )
            "#,
        )
        .bind(&reading.id)
        .bind(&reading.nozzle_id)
        .bind(&reading.station_id)
        .bind(reading.fuel_type)
        .bind(&reading.employee_id)
        .bind(reading.reading_date)
        .bind(reading.meter_millilitres)
        .bind(reading.litres_sold_millilitres)
        .bind(reading.price_paise_per_litre)
        .bind(reading.total_amount_paise)
        .bind(reading.cash_paise)
        .bind(reading.online_paise)
        .bind(reading.credit_paise)
        .bind(reading.is_sample)
        .bind(reading.is_initial)
        .bind(reading.created_at)
        .execute(&mut *tx)
        .await;

        // The UNIQUE index backstops the duplicate check under races
        if let Err(e) = insert {
            return Err(match DbError::from(e) {
                DbError::UniqueViolation { .. } => CoreError::DuplicateReading {
                    nozzle_id: reading.nozzle_id.clone(),
                    date: reading.reading_date,
                }
                .into(),
                other => other,
            });
        }

        tx.commit().await?;

        Ok(reading)
    }

    /// Gets a reading by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<NozzleReading>> {
        let reading = sqlx::query_as::<_, NozzleReading>(
            r#"
            SELECT id, nozzle_id, station_id, fuel_type, employee_id,
                   reading_date, meter_millilitres, litres_sold_millilitres,
                   price_paise_per_litre, total_amount_paise,
                   cash_paise, online_paise, credit_paise,
                   is_sample, is_initial, created_at
            FROM nozzle_readings
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(reading)
    }

    /// Lists a nozzle's readings, newest first.
    pub async fn list_for_nozzle(&self, nozzle_id: &str) -> DbResult<Vec<NozzleReading>> {
        let readings = sqlx::query_as::<_, NozzleReading>(
            r#"
            SELECT id, nozzle_id, station_id, fuel_type, employee_id,
                   reading_date, meter_millilitres, litres_sold_millilitres,
                   price_paise_per_litre, total_amount_paise,
                   cash_paise, online_paise, credit_paise,
                   is_sample, is_initial, created_at
            FROM nozzle_readings
            WHERE nozzle_id = ?1
            ORDER BY reading_date DESC
            "#,
        )
        .bind(nozzle_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }
}

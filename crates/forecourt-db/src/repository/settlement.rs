//! # Settlement Repository
//!
//! Transactional daily cash settlement.
//!
//! ## Settle Pipeline (ONE transaction)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    1. Station must exist                      → 404 if unknown         │
//! │    2. Aggregate the day's reportable readings:                         │
//! │         expected cash = Σ cash_paise                                   │
//! │         per-employee reading counts (+ names)                          │
//! │    3. reconcile(): variance + shortfall apportionment (core math)      │
//! │    4. Upsert settlement row keyed (station, date);                     │
//! │       replace shortfall rows wholesale                                 │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Reading the aggregate and writing the settlement in one transaction   │
//! │  means a late-arriving reading or a concurrent re-settle cannot        │
//! │  produce a settlement that disagrees with its own inputs.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Re-submission is an upsert: the previous settlement for the day is
//! replaced and the caller is told via the `already_settled` flag.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use crate::repository::new_id;
use forecourt_core::reconciliation::{reconcile, EmployeeDayCount};
use forecourt_core::validation::validate_non_negative;
use forecourt_core::{CoreError, EmployeeShortfall, Money, Settlement};

/// The outcome of settling a station-day.
#[derive(Debug, Clone)]
pub struct SettlementOutcome {
    pub settlement: Settlement,
    pub shortfalls: Vec<EmployeeShortfall>,
    /// True when this day had already been settled and was replaced.
    pub already_settled: bool,
}

/// Per-employee aggregate row for one station-day.
#[derive(Debug, Clone, sqlx::FromRow)]
struct EmployeeAggRow {
    employee_id: String,
    employee_name: String,
    reading_count: i64,
    cash_paise: i64,
}

/// Repository for settlements.
#[derive(Debug, Clone)]
pub struct SettlementRepository {
    pool: SqlitePool,
}

impl SettlementRepository {
    /// Creates a new SettlementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettlementRepository { pool }
    }

    /// Computes the expected cash and per-employee tallies for a
    /// station-day, without writing anything.
    ///
    /// Exposed so managers can preview a day before committing the count.
    pub async fn compute_expected(
        &self,
        station_id: &str,
        date: NaiveDate,
    ) -> DbResult<(Money, Vec<EmployeeDayCount>)> {
        let rows = Self::aggregate_day(&self.pool, station_id, date).await?;
        Ok(Self::split_aggregate(rows))
    }

    /// Settles a station-day against the manager's physical cash count.
    pub async fn settle(
        &self,
        station_id: &str,
        date: NaiveDate,
        actual_cash: Money,
        notes: Option<String>,
    ) -> DbResult<SettlementOutcome> {
        validate_non_negative("actual cash", actual_cash).map_err(CoreError::from)?;

        let mut tx = self.pool.begin().await?;

        // 1. Station must exist
        let station_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stations WHERE id = ?1")
            .bind(station_id)
            .fetch_one(&mut *tx)
            .await?;
        if station_exists == 0 {
            return Err(CoreError::StationNotFound(station_id.to_string()).into());
        }

        // 2. The day's aggregate, inside this transaction
        let rows = Self::aggregate_day(&mut *tx, station_id, date).await?;
        let (expected_cash, counts) = Self::split_aggregate(rows);

        // 3. Core math
        let reconciliation = reconcile(expected_cash, actual_cash, &counts);

        // 4. Upsert keyed (station, date)
        let existing: Option<String> = sqlx::query_scalar(
            "SELECT id FROM settlements WHERE station_id = ?1 AND settlement_date = ?2",
        )
        .bind(station_id)
        .bind(date)
        .fetch_optional(&mut *tx)
        .await?;

        let now = Utc::now();
        let already_settled = existing.is_some();
        let (settlement_id, created_at) = match existing {
            Some(id) => {
                debug!(settlement_id = %id, "replacing existing settlement");
                let created_at: chrono::DateTime<Utc> =
                    sqlx::query_scalar("SELECT created_at FROM settlements WHERE id = ?1")
                        .bind(&id)
                        .fetch_one(&mut *tx)
                        .await?;
                sqlx::query(
                    r#"
                    UPDATE settlements SET
                        expected_cash_paise = ?2,
                        actual_cash_paise = ?3,
                        variance_paise = ?4,
                        notes = ?5,
                        updated_at = ?6
                    WHERE id = ?1
                    "#,
                )
                .bind(&id)
                .bind(reconciliation.expected_cash.paise())
                .bind(reconciliation.actual_cash.paise())
                .bind(reconciliation.variance.paise())
                .bind(&notes)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                // Shortfall rows are replaced wholesale
                sqlx::query("DELETE FROM settlement_shortfalls WHERE settlement_id = ?1")
                    .bind(&id)
                    .execute(&mut *tx)
                    .await?;

                (id, created_at)
            }
            None => {
                let id = new_id();
                sqlx::query(
                    r#"
                    INSERT INTO settlements (
                        id, station_id, settlement_date,
                        expected_cash_paise, actual_cash_paise, variance_paise,
                        notes, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)
                    "#,
                )
                .bind(&id)
                .bind(station_id)
                .bind(date)
                .bind(reconciliation.expected_cash.paise())
                .bind(reconciliation.actual_cash.paise())
                .bind(reconciliation.variance.paise())
                .bind(&notes)
                .bind(now)
                .execute(&mut *tx)
                .await?;
                (id, now)
            }
        };

        for s in &reconciliation.shortfalls {
            sqlx::query(
                r#"
                INSERT INTO settlement_shortfalls (
                    id, settlement_id, employee_id, employee_name,
                    shortfall_paise, reading_count
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(new_id())
            .bind(&settlement_id)
            .bind(&s.employee_id)
            .bind(&s.employee_name)
            .bind(s.shortfall_paise)
            .bind(s.reading_count)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            station_id,
            date = %date,
            expected = %reconciliation.expected_cash,
            actual = %reconciliation.actual_cash,
            variance = %reconciliation.variance,
            already_settled,
            "settlement recorded"
        );

        Ok(SettlementOutcome {
            settlement: Settlement {
                id: settlement_id,
                station_id: station_id.to_string(),
                settlement_date: date,
                expected_cash_paise: reconciliation.expected_cash.paise(),
                actual_cash_paise: reconciliation.actual_cash.paise(),
                variance_paise: reconciliation.variance.paise(),
                notes,
                created_at,
                updated_at: now,
            },
            shortfalls: reconciliation.shortfalls,
            already_settled,
        })
    }

    /// Gets the settlement for a station-day, with its shortfall rows.
    pub async fn get(
        &self,
        station_id: &str,
        date: NaiveDate,
    ) -> DbResult<Option<(Settlement, Vec<EmployeeShortfall>)>> {
        let settlement = sqlx::query_as::<_, Settlement>(
            r#"
            SELECT id, station_id, settlement_date,
                   expected_cash_paise, actual_cash_paise, variance_paise,
                   notes, created_at, updated_at
            FROM settlements
            WHERE station_id = ?1 AND settlement_date = ?2
            "#,
        )
        .bind(station_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        let Some(settlement) = settlement else {
            return Ok(None);
        };

        let shortfalls = sqlx::query_as::<_, EmployeeShortfall>(
            r#"
            SELECT employee_id, employee_name, shortfall_paise, reading_count
            FROM settlement_shortfalls
            WHERE settlement_id = ?1
            ORDER BY employee_name
            "#,
        )
        .bind(&settlement.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some((settlement, shortfalls)))
    }

    /// Aggregates a station-day's reportable readings per employee.
    ///
    /// Reportable = not a sample, and not a zero-litre initial reading.
    /// The same filter the reporting queries use.
    async fn aggregate_day<'c, E>(
        executor: E,
        station_id: &str,
        date: NaiveDate,
    ) -> DbResult<Vec<EmployeeAggRow>>
    where
        E: sqlx::Executor<'c, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query_as::<_, EmployeeAggRow>(
            r#"
            SELECT r.employee_id,
                   e.name AS employee_name,
                   COUNT(*) AS reading_count,
                   COALESCE(SUM(r.cash_paise), 0) AS cash_paise
            FROM nozzle_readings r
            JOIN employees e ON e.id = r.employee_id
            WHERE r.station_id = ?1
              AND r.reading_date = ?2
              AND r.is_sample = 0
              AND (r.is_initial = 0 OR r.litres_sold_millilitres > 0)
            GROUP BY r.employee_id, e.name
            ORDER BY e.name
            "#,
        )
        .bind(station_id)
        .bind(date)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    fn split_aggregate(rows: Vec<EmployeeAggRow>) -> (Money, Vec<EmployeeDayCount>) {
        let expected = Money::from_paise(rows.iter().map(|r| r.cash_paise).sum());
        let counts = rows
            .into_iter()
            .map(|r| EmployeeDayCount {
                employee_id: r.employee_id,
                employee_name: r.employee_name,
                reading_count: r.reading_count,
            })
            .collect();
        (expected, counts)
    }
}

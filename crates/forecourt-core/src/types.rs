//! # Domain Types
//!
//! Core domain types used throughout Forecourt.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    FuelPrice    │   │  NozzleReading  │   │   Settlement    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  station_id     │   │  nozzle_id      │   │  station_id     │       │
//! │  │  fuel_type      │   │  reading_date   │   │  settlement_date│       │
//! │  │  price (paise)  │──►│  price snapshot │──►│  expected cash  │       │
//! │  │  effective_from │   │  litres, amount │   │  variance       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  Station ──► Nozzle (fuel_type) ──► readings                           │
//! │  Station ──► Employee ──► readings, shortfalls                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Price Snapshot Pattern
//! A `NozzleReading` carries the per-litre price that was in force on its
//! reading date, captured once at creation. Reports recompute revenue from
//! this snapshot; they NEVER re-resolve the current price for historical
//! rows. Later price changes cannot alter a recorded sale.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Money, Volume};

// =============================================================================
// Fuel Type
// =============================================================================

/// The fuel grades a station dispenses.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    Petrol,
    Diesel,
    Cng,
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Cng => "cng",
        };
        f.write_str(s)
    }
}

impl FromStr for FuelType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "petrol" => Ok(FuelType::Petrol),
            "diesel" => Ok(FuelType::Diesel),
            "cng" => Ok(FuelType::Cng),
            other => Err(ValidationError::InvalidFormat {
                field: "fuel_type".to_string(),
                reason: format!("unknown fuel type '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Station / Nozzle / Employee
// =============================================================================

/// A fuel station.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Station {
    /// Unique identifier (UUID v4).
    pub id: String,
    /// Display name.
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A dispensing nozzle attached to a station pump.
///
/// Each nozzle dispenses exactly one fuel type; its meter is cumulative, so
/// litres sold on a date is the difference between consecutive readings.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Nozzle {
    pub id: String,
    pub station_id: String,
    pub fuel_type: FuelType,
    /// Operator-facing label, e.g. "P1-N2".
    pub label: String,
    /// Soft delete flag.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A station employee who records readings.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Employee {
    pub id: String,
    pub station_id: String,
    pub name: String,
    /// Soft delete flag.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Fuel Price
// =============================================================================

/// One row of the append-only fuel price history.
///
/// ## Invariants
/// - At most one row per (station, fuel_type, effective_from)
/// - Rows are never updated or deleted; a price change appends a new row
/// - "Price in effect on date D" = row with greatest effective_from <= D
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FuelPrice {
    pub id: String,
    pub station_id: String,
    pub fuel_type: FuelType,
    /// Per-litre price in paise.
    pub price_paise_per_litre: i64,
    /// First calendar date this price applies to.
    pub effective_from: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl FuelPrice {
    /// Returns the per-litre price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise_per_litre)
    }
}

// =============================================================================
// Payment Allocation
// =============================================================================

/// How a reading's sale amount was collected, split across payment modes.
///
/// The three parts must sum to the reading's total amount (within 1 paisa);
/// violating inputs are rejected at recording time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentAllocation {
    pub cash_paise: i64,
    pub online_paise: i64,
    pub credit_paise: i64,
}

impl PaymentAllocation {
    pub fn new(cash: Money, online: Money, credit: Money) -> Self {
        PaymentAllocation {
            cash_paise: cash.paise(),
            online_paise: online.paise(),
            credit_paise: credit.paise(),
        }
    }

    /// Sum of all three modes.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_paise(self.cash_paise + self.online_paise + self.credit_paise)
    }

    /// The cash component (what settlement reconciliation counts).
    #[inline]
    pub fn cash(&self) -> Money {
        Money::from_paise(self.cash_paise)
    }

    #[inline]
    pub fn online(&self) -> Money {
        Money::from_paise(self.online_paise)
    }

    #[inline]
    pub fn credit(&self) -> Money {
        Money::from_paise(self.credit_paise)
    }
}

// =============================================================================
// Nozzle Reading
// =============================================================================

/// A daily meter reading for one nozzle, with the valuation computed and
/// frozen at recording time.
///
/// ## Invariants
/// - `litres_sold = meter − previous meter` (>= 0)
/// - `total_amount = litres_sold × price_paise_per_litre` (integer formula)
/// - `cash + online + credit = total_amount` (±1 paisa, checked on create)
/// - `price_paise_per_litre` is the price in force on `reading_date`,
///   captured once and never recomputed
/// - Immutable after creation; corrections append new readings
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NozzleReading {
    pub id: String,
    pub nozzle_id: String,
    pub station_id: String,
    pub fuel_type: FuelType,
    pub employee_id: String,
    /// Business date of the reading (exact calendar date, no time part).
    pub reading_date: NaiveDate,
    /// Cumulative meter value in millilitres.
    pub meter_millilitres: i64,
    /// Millilitres dispensed since the previous reading.
    pub litres_sold_millilitres: i64,
    /// Price snapshot: paise per litre in force on reading_date.
    pub price_paise_per_litre: i64,
    /// litres_sold × price, in paise.
    pub total_amount_paise: i64,
    pub cash_paise: i64,
    pub online_paise: i64,
    pub credit_paise: i64,
    /// Test/demo reading, excluded from all real aggregates.
    pub is_sample: bool,
    /// First-ever reading of a nozzle (no previous meter value).
    pub is_initial: bool,
    pub created_at: DateTime<Utc>,
}

impl NozzleReading {
    /// Returns the dispensed volume.
    #[inline]
    pub fn litres_sold(&self) -> Volume {
        Volume::from_millilitres(self.litres_sold_millilitres)
    }

    /// Returns the captured per-litre price.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_paise(self.price_paise_per_litre)
    }

    /// Returns the frozen sale amount.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_paise(self.total_amount_paise)
    }

    /// Returns the payment split.
    #[inline]
    pub fn allocation(&self) -> PaymentAllocation {
        PaymentAllocation {
            cash_paise: self.cash_paise,
            online_paise: self.online_paise,
            credit_paise: self.credit_paise,
        }
    }

    /// Whether this reading counts towards reports and expected cash.
    ///
    /// Sample readings never count. Initial readings only count when they
    /// carry actual litres (a nozzle migrated mid-life with a real delta).
    #[inline]
    pub fn is_reportable(&self) -> bool {
        !self.is_sample && (!self.is_initial || self.litres_sold_millilitres > 0)
    }
}

// =============================================================================
// Settlement
// =============================================================================

/// A day's cash reconciliation for one station.
///
/// ## Invariant
/// `variance = actual_cash − expected_cash`; negative variance is a
/// shortfall, apportioned across that day's employees (see
/// [`crate::reconciliation`]).
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub id: String,
    pub station_id: String,
    pub settlement_date: NaiveDate,
    /// Sum of cash allocations across the day's reportable readings.
    pub expected_cash_paise: i64,
    /// Manager-entered physical cash count.
    pub actual_cash_paise: i64,
    /// actual − expected. Negative = shortfall.
    pub variance_paise: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Settlement {
    #[inline]
    pub fn expected_cash(&self) -> Money {
        Money::from_paise(self.expected_cash_paise)
    }

    #[inline]
    pub fn actual_cash(&self) -> Money {
        Money::from_paise(self.actual_cash_paise)
    }

    #[inline]
    pub fn variance(&self) -> Money {
        Money::from_paise(self.variance_paise)
    }

    /// Whether the day came up short.
    #[inline]
    pub fn is_shortfall(&self) -> bool {
        self.variance_paise < 0
    }
}

/// One employee's share of a day's cash shortfall.
///
/// A typed list, not a JSON map keyed by employee ID: reporting code gets
/// named fields instead of duck-typed lookups.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeShortfall {
    pub employee_id: String,
    pub employee_name: String,
    /// This employee's apportioned share of the shortfall, in paise.
    pub shortfall_paise: i64,
    /// Number of cash-bearing readings the employee recorded that day.
    pub reading_count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(is_sample: bool, is_initial: bool, litres_ml: i64) -> NozzleReading {
        NozzleReading {
            id: "r-1".to_string(),
            nozzle_id: "n-1".to_string(),
            station_id: "st-1".to_string(),
            fuel_type: FuelType::Petrol,
            employee_id: "e-1".to_string(),
            reading_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            meter_millilitres: 1_000_000,
            litres_sold_millilitres: litres_ml,
            price_paise_per_litre: 9500,
            total_amount_paise: 0,
            cash_paise: 0,
            online_paise: 0,
            credit_paise: 0,
            is_sample,
            is_initial,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_fuel_type_round_trip() {
        for ft in [FuelType::Petrol, FuelType::Diesel, FuelType::Cng] {
            assert_eq!(ft.to_string().parse::<FuelType>().unwrap(), ft);
        }
        assert!("kerosene".parse::<FuelType>().is_err());
    }

    #[test]
    fn test_allocation_total() {
        let alloc = PaymentAllocation {
            cash_paise: 500_000,
            online_paise: 300_000,
            credit_paise: 150_000,
        };
        assert_eq!(alloc.total().paise(), 950_000);
        assert_eq!(alloc.cash().paise(), 500_000);
    }

    #[test]
    fn test_reportable_excludes_samples() {
        assert!(!reading(true, false, 50_000).is_reportable());
    }

    #[test]
    fn test_reportable_excludes_zero_litre_initial() {
        assert!(!reading(false, true, 0).is_reportable());
        // Initial reading with real litres still counts
        assert!(reading(false, true, 50_000).is_reportable());
    }

    #[test]
    fn test_settlement_shortfall_flag() {
        let s = Settlement {
            id: "s-1".to_string(),
            station_id: "st-1".to_string(),
            settlement_date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
            expected_cash_paise: 500_000,
            actual_cash_paise: 450_000,
            variance_paise: -50_000,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(s.is_shortfall());
        assert_eq!(s.variance().paise(), -50_000);
    }
}

//! # Reporting & Aggregation
//!
//! Pure folds over persisted readings producing sales summaries.
//!
//! ## The One Rule That Matters
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  revenue = Σ litres_sold × STORED per-reading price                     │
//! │                                                                         │
//! │  NEVER the current price  (prices change; history must not)            │
//! │  NEVER the payment total  (what was collected != what was sold         │
//! │                            when credit is outstanding)                  │
//! │                                                                         │
//! │  Dec 1: 100 L @ ₹95   Dec 2: 150 L @ ₹100   Dec 3: 120 L @ ₹105        │
//! │  3-day revenue = 9,500 + 15,000 + 12,600 = ₹37,100                     │
//! │  (not 370 L × ₹105 = ₹38,850)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Filtering: sample readings never count; initial readings only count when
//! they carry nonzero litres. Date filtering happens in SQL by exact
//! calendar-date equality on the TEXT `reading_date` column, so a "today"
//! query can never admit a neighbouring day through a timezone artifact.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{FuelType, NozzleReading, PaymentAllocation};

// =============================================================================
// Summary Types
// =============================================================================

/// Per-fuel-type slice of a sales summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FuelBreakdown {
    pub fuel_type: FuelType,
    pub litres_sold_millilitres: i64,
    pub revenue_paise: i64,
    pub reading_count: i64,
}

/// Aggregated sales over a station and date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub litres_sold_millilitres: i64,
    /// Σ litres × stored price, recomputed per reading.
    pub revenue_paise: i64,
    pub reading_count: i64,
    /// Slices ordered petrol, diesel, cng; empty slices omitted.
    pub by_fuel: Vec<FuelBreakdown>,
    /// Collection totals by payment mode.
    pub payments: PaymentAllocation,
}

impl SalesSummary {
    pub fn empty() -> Self {
        SalesSummary {
            litres_sold_millilitres: 0,
            revenue_paise: 0,
            reading_count: 0,
            by_fuel: Vec::new(),
            payments: PaymentAllocation::default(),
        }
    }

    #[inline]
    pub fn revenue(&self) -> Money {
        Money::from_paise(self.revenue_paise)
    }
}

/// Per-employee shortfall totals over a settlement date range.
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EmployeeShortfallSummary {
    pub employee_id: String,
    pub employee_name: String,
    pub total_shortfall_paise: i64,
    /// Settlements in the range that charged this employee.
    pub settlement_count: i64,
    /// Readings backing those charges.
    pub reading_count: i64,
}

// =============================================================================
// Folds
// =============================================================================

/// Folds readings into a sales summary.
///
/// Non-reportable rows (samples, zero-litre initial readings) are skipped
/// here as a second line of defence; repository queries already exclude
/// them.
pub fn summarize_readings(readings: &[NozzleReading]) -> SalesSummary {
    let mut summary = SalesSummary::empty();
    // Fixed order keeps the breakdown stable across runs
    let fuel_order = [FuelType::Petrol, FuelType::Diesel, FuelType::Cng];

    for fuel_type in fuel_order {
        let mut slice = FuelBreakdown {
            fuel_type,
            litres_sold_millilitres: 0,
            revenue_paise: 0,
            reading_count: 0,
        };

        for r in readings
            .iter()
            .filter(|r| r.fuel_type == fuel_type && r.is_reportable())
        {
            let revenue = r.litres_sold().times_price(r.price());

            slice.litres_sold_millilitres += r.litres_sold_millilitres;
            slice.revenue_paise += revenue.paise();
            slice.reading_count += 1;

            summary.litres_sold_millilitres += r.litres_sold_millilitres;
            summary.revenue_paise += revenue.paise();
            summary.reading_count += 1;
            summary.payments.cash_paise += r.cash_paise;
            summary.payments.online_paise += r.online_paise;
            summary.payments.credit_paise += r.credit_paise;
        }

        if slice.reading_count > 0 {
            summary.by_fuel.push(slice);
        }
    }

    summary
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn reading(
        fuel_type: FuelType,
        day: u32,
        litres_ml: i64,
        price_paise: i64,
        cash_paise: i64,
    ) -> NozzleReading {
        let total = crate::money::Volume::from_millilitres(litres_ml)
            .times_price(Money::from_paise(price_paise));
        NozzleReading {
            id: format!("r-{day}-{fuel_type}"),
            nozzle_id: "n-1".to_string(),
            station_id: "st-1".to_string(),
            fuel_type,
            employee_id: "e-1".to_string(),
            reading_date: NaiveDate::from_ymd_opt(2025, 12, day).unwrap(),
            meter_millilitres: 0,
            litres_sold_millilitres: litres_ml,
            price_paise_per_litre: price_paise,
            total_amount_paise: total.paise(),
            cash_paise,
            online_paise: total.paise() - cash_paise,
            credit_paise: 0,
            is_sample: false,
            is_initial: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_revenue_uses_stored_prices_not_latest() {
        // Petrol at 95 (Dec 1), 100 (Dec 2), 105 (Dec 3); 100/150/120 L
        let readings = vec![
            reading(FuelType::Petrol, 1, 100_000, 9500, 0),
            reading(FuelType::Petrol, 2, 150_000, 10_000, 0),
            reading(FuelType::Petrol, 3, 120_000, 10_500, 0),
        ];

        let summary = summarize_readings(&readings);

        // 100×95 + 150×100 + 120×105 = ₹37,100
        assert_eq!(summary.revenue_paise, 3_710_000);
        // NOT 370 × 105 = ₹38,850
        assert_ne!(summary.revenue_paise, 3_885_000);
        assert_eq!(summary.litres_sold_millilitres, 370_000);
        assert_eq!(summary.reading_count, 3);
    }

    #[test]
    fn test_fuel_breakdown() {
        let readings = vec![
            reading(FuelType::Petrol, 1, 100_000, 9500, 0),
            reading(FuelType::Diesel, 1, 200_000, 9000, 0),
            reading(FuelType::Petrol, 1, 50_000, 9500, 0),
        ];

        let summary = summarize_readings(&readings);

        assert_eq!(summary.by_fuel.len(), 2);
        let petrol = &summary.by_fuel[0];
        assert_eq!(petrol.fuel_type, FuelType::Petrol);
        assert_eq!(petrol.litres_sold_millilitres, 150_000);
        assert_eq!(petrol.reading_count, 2);
        let diesel = &summary.by_fuel[1];
        assert_eq!(diesel.fuel_type, FuelType::Diesel);
        assert_eq!(diesel.revenue_paise, 1_800_000);
    }

    #[test]
    fn test_payment_breakdown_totals() {
        let readings = vec![
            reading(FuelType::Petrol, 1, 100_000, 9500, 500_000),
            reading(FuelType::Petrol, 2, 100_000, 9500, 950_000),
        ];

        let summary = summarize_readings(&readings);

        assert_eq!(summary.payments.cash_paise, 1_450_000);
        assert_eq!(summary.payments.online_paise, 450_000);
        assert_eq!(summary.payments.total().paise(), 1_900_000);
    }

    #[test]
    fn test_samples_and_zero_initials_excluded() {
        let mut sample = reading(FuelType::Petrol, 1, 100_000, 9500, 0);
        sample.is_sample = true;
        let mut zero_initial = reading(FuelType::Petrol, 1, 0, 9500, 0);
        zero_initial.is_initial = true;

        let summary = summarize_readings(&[sample, zero_initial]);

        assert_eq!(summary.reading_count, 0);
        assert_eq!(summary.revenue_paise, 0);
        assert!(summary.by_fuel.is_empty());
    }

    #[test]
    fn test_empty_input() {
        let summary = summarize_readings(&[]);
        assert_eq!(summary, SalesSummary::empty());
    }
}

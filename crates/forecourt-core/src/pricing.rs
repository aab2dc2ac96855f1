//! # Price Resolution
//!
//! Pure resolution of "the price in effect on date D" over the append-only
//! fuel price history.
//!
//! ## Resolution Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Price history for (station, petrol):                                   │
//! │                                                                         │
//! │    effective_from   price                                               │
//! │    2025-12-01       ₹95.00                                              │
//! │    2025-12-02       ₹100.00                                             │
//! │    2025-12-03       ₹105.00                                             │
//! │                                                                         │
//! │  resolve(2025-12-02) → ₹100.00   (greatest effective_from <= date)     │
//! │  resolve(2025-12-15) → ₹105.00   (latest row still in force)           │
//! │  resolve(2025-11-30) → None      (before any price existed)            │
//! │                                                                         │
//! │  Later appends with FUTURE effective dates never change what          │
//! │  resolve() returns for past dates.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The repository layer fetches the `(station, fuel_type)` rows and delegates
//! here, so production lookups and unit tests exercise one code path. A
//! missing price is an error at the call site, NEVER a default of zero.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::types::FuelPrice;

/// Picks the price row in force on `date`: the row with the greatest
/// `effective_from <= date`.
///
/// Rows may arrive in any order; ties on `effective_from` cannot occur
/// because the store enforces uniqueness per (station, fuel_type, date).
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use forecourt_core::pricing::resolve_effective_price;
/// # use forecourt_core::types::{FuelPrice, FuelType};
/// # use chrono::Utc;
/// # fn row(day: u32, paise: i64) -> FuelPrice {
/// #     FuelPrice {
/// #         id: format!("p-{day}"),
/// #         station_id: "st-1".into(),
/// #         fuel_type: FuelType::Petrol,
/// #         price_paise_per_litre: paise,
/// #         effective_from: NaiveDate::from_ymd_opt(2025, 12, day).unwrap(),
/// #         created_at: Utc::now(),
/// #     }
/// # }
/// let history = vec![row(1, 9500), row(3, 10_500)];
/// let hit = resolve_effective_price(&history, NaiveDate::from_ymd_opt(2025, 12, 2).unwrap());
/// assert_eq!(hit.unwrap().price_paise_per_litre, 9500);
/// ```
pub fn resolve_effective_price(history: &[FuelPrice], date: NaiveDate) -> Option<&FuelPrice> {
    history
        .iter()
        .filter(|p| p.effective_from <= date)
        .max_by_key(|p| p.effective_from)
}

/// Like [`resolve_effective_price`] but produces the domain error used when
/// a reading must be rejected because no price is configured.
pub fn require_effective_price<'a>(
    history: &'a [FuelPrice],
    station_id: &str,
    fuel_type: &str,
    date: NaiveDate,
) -> Result<&'a FuelPrice, CoreError> {
    resolve_effective_price(history, date).ok_or_else(|| CoreError::NoPriceConfigured {
        station_id: station_id.to_string(),
        fuel_type: fuel_type.to_string(),
        date,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FuelType;
    use chrono::Utc;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(effective: NaiveDate, paise: i64) -> FuelPrice {
        FuelPrice {
            id: format!("p-{effective}"),
            station_id: "st-1".to_string(),
            fuel_type: FuelType::Petrol,
            price_paise_per_litre: paise,
            effective_from: effective,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_picks_greatest_effective_from_at_or_before_date() {
        let history = vec![
            row(d(2025, 12, 1), 9500),
            row(d(2025, 12, 2), 10_000),
            row(d(2025, 12, 3), 10_500),
        ];

        assert_eq!(
            resolve_effective_price(&history, d(2025, 12, 1)).unwrap().price_paise_per_litre,
            9500
        );
        assert_eq!(
            resolve_effective_price(&history, d(2025, 12, 2)).unwrap().price_paise_per_litre,
            10_000
        );
        // Exact match on the latest row
        assert_eq!(
            resolve_effective_price(&history, d(2025, 12, 3)).unwrap().price_paise_per_litre,
            10_500
        );
        // Well past the last change: latest row still in force
        assert_eq!(
            resolve_effective_price(&history, d(2026, 1, 15)).unwrap().price_paise_per_litre,
            10_500
        );
    }

    #[test]
    fn test_none_before_first_price() {
        let history = vec![row(d(2025, 12, 1), 9500)];
        assert!(resolve_effective_price(&history, d(2025, 11, 30)).is_none());
    }

    #[test]
    fn test_empty_history_resolves_nothing() {
        assert!(resolve_effective_price(&[], d(2025, 12, 1)).is_none());
    }

    #[test]
    fn test_unsorted_history_still_resolves() {
        let history = vec![
            row(d(2025, 12, 3), 10_500),
            row(d(2025, 12, 1), 9500),
            row(d(2025, 12, 2), 10_000),
        ];
        assert_eq!(
            resolve_effective_price(&history, d(2025, 12, 2)).unwrap().price_paise_per_litre,
            10_000
        );
    }

    #[test]
    fn test_stable_under_future_appends() {
        // Resolving a past date must not change when prices for LATER
        // dates are appended afterwards
        let mut history = vec![row(d(2025, 12, 1), 9500)];
        let before = resolve_effective_price(&history, d(2025, 12, 1))
            .unwrap()
            .price_paise_per_litre;

        history.push(row(d(2026, 1, 1), 12_000));
        let after = resolve_effective_price(&history, d(2025, 12, 1))
            .unwrap()
            .price_paise_per_litre;

        assert_eq!(before, after);
    }

    #[test]
    fn test_require_effective_price_error() {
        let err = require_effective_price(&[], "st-1", "petrol", d(2025, 12, 1)).unwrap_err();
        assert!(matches!(err, CoreError::NoPriceConfigured { .. }));
    }
}

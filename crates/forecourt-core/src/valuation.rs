//! # Reading Valuation
//!
//! Pure computation of a reading's litres sold, sale amount, and payment
//! allocation check.
//!
//! ## Recording Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record reading (one transaction, see forecourt-db)                     │
//! │                                                                         │
//! │  previous meter ──┐                                                     │
//! │                   ▼                                                     │
//! │  new meter ──► value_reading() ── litres sold + amount                  │
//! │                   ▲                        │                            │
//! │  effective price ─┘                        ▼                            │
//! │                          check_allocation(alloc, amount)                │
//! │                                            │                            │
//! │                                 ok ────────┴──────── mismatch           │
//! │                                 │                       │               │
//! │                              persist               reject (422)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is deterministic integer math; the transaction wrapper
//! and persistence live in `forecourt-db`.

use crate::error::ValidationError;
use crate::money::{Money, Volume};

/// Exact integer tolerance on the payment-allocation sum: one paisa.
pub const ALLOCATION_TOLERANCE_PAISE: i64 = 1;

/// The outcome of valuing a meter reading against its previous value and the
/// effective price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Valuation {
    /// Millilitres dispensed since the previous reading.
    pub litres_sold: Volume,
    /// litres_sold × price, rounded to the paisa.
    pub total_amount: Money,
    /// True when there was no previous reading for the nozzle.
    pub is_initial: bool,
}

/// Values a new meter reading.
///
/// `previous` is `None` for a nozzle's first-ever reading: litres are counted
/// from zero and the result is flagged initial.
///
/// ## Errors
/// [`ValidationError::MeterRollback`] when the new meter value is below the
/// previous one (typo or unflagged meter replacement); nothing is persisted.
///
/// ## Example
/// ```rust
/// use forecourt_core::money::{Money, Volume};
/// use forecourt_core::valuation::value_reading;
///
/// let v = value_reading(
///     "n-1",
///     Some(Volume::from_litres(1000)),
///     Volume::from_litres(1100),
///     Money::from_paise(9500),
/// )
/// .unwrap();
/// assert_eq!(v.litres_sold, Volume::from_litres(100));
/// assert_eq!(v.total_amount, Money::from_paise(950_000)); // ₹9,500
/// ```
pub fn value_reading(
    nozzle_id: &str,
    previous: Option<Volume>,
    meter: Volume,
    price_per_litre: Money,
) -> Result<Valuation, ValidationError> {
    let is_initial = previous.is_none();
    let previous = previous.unwrap_or(Volume::zero());

    if meter < previous {
        return Err(ValidationError::MeterRollback {
            nozzle_id: nozzle_id.to_string(),
            meter_millilitres: meter.millilitres(),
            previous_millilitres: previous.millilitres(),
        });
    }

    let litres_sold = meter - previous;
    let total_amount = litres_sold.times_price(price_per_litre);

    Ok(Valuation {
        litres_sold,
        total_amount,
        is_initial,
    })
}

/// Checks that an allocation sums to the sale amount within one paisa.
///
/// Violating inputs are rejected, never silently corrected: a mismatch means
/// the operator mistyped either the meter or a payment figure, and only they
/// know which.
pub fn check_allocation(
    allocated: Money,
    total_amount: Money,
) -> Result<(), ValidationError> {
    if (allocated - total_amount).abs().paise() > ALLOCATION_TOLERANCE_PAISE {
        return Err(ValidationError::PaymentMismatch {
            expected_paise: total_amount.paise(),
            allocated_paise: allocated.paise(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_valuation() {
        let v = value_reading(
            "n-1",
            Some(Volume::from_litres(1000)),
            Volume::from_litres(1150),
            Money::from_paise(10_000), // ₹100/L
        )
        .unwrap();

        assert_eq!(v.litres_sold, Volume::from_litres(150));
        assert_eq!(v.total_amount, Money::from_paise(1_500_000)); // ₹15,000
        assert!(!v.is_initial);
    }

    #[test]
    fn test_first_reading_counts_from_zero() {
        let v = value_reading(
            "n-1",
            None,
            Volume::from_litres(42),
            Money::from_paise(9500),
        )
        .unwrap();

        assert!(v.is_initial);
        assert_eq!(v.litres_sold, Volume::from_litres(42));
    }

    #[test]
    fn test_meter_rollback_rejected() {
        let err = value_reading(
            "n-1",
            Some(Volume::from_litres(1000)),
            Volume::from_litres(999),
            Money::from_paise(9500),
        )
        .unwrap_err();

        assert!(matches!(err, ValidationError::MeterRollback { .. }));
    }

    #[test]
    fn test_unchanged_meter_is_zero_litres() {
        let v = value_reading(
            "n-1",
            Some(Volume::from_litres(1000)),
            Volume::from_litres(1000),
            Money::from_paise(9500),
        )
        .unwrap();

        assert!(v.litres_sold.is_zero());
        assert!(v.total_amount.is_zero());
    }

    #[test]
    fn test_amount_matches_litres_times_price() {
        // The persisted invariant: total == litres × price for every reading
        for (prev_ml, meter_ml, price) in [
            (0_i64, 100_000_i64, 9500_i64),
            (123_456, 234_567, 10_050),
            (1, 2, 1),
        ] {
            let v = value_reading(
                "n-1",
                Some(Volume::from_millilitres(prev_ml)),
                Volume::from_millilitres(meter_ml),
                Money::from_paise(price),
            )
            .unwrap();
            assert_eq!(
                v.total_amount,
                v.litres_sold.times_price(Money::from_paise(price))
            );
        }
    }

    #[test]
    fn test_allocation_exact_match() {
        assert!(check_allocation(Money::from_paise(950_000), Money::from_paise(950_000)).is_ok());
    }

    #[test]
    fn test_allocation_within_one_paisa() {
        assert!(check_allocation(Money::from_paise(950_001), Money::from_paise(950_000)).is_ok());
        assert!(check_allocation(Money::from_paise(949_999), Money::from_paise(950_000)).is_ok());
    }

    #[test]
    fn test_allocation_mismatch_rejected() {
        let err =
            check_allocation(Money::from_paise(900_000), Money::from_paise(950_000)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::PaymentMismatch {
                expected_paise: 950_000,
                allocated_paise: 900_000,
            }
        ));
    }
}

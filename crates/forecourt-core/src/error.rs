//! # Error Types
//!
//! Domain-specific error types for forecourt-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  forecourt-core errors (this file)                                     │
//! │  ├── CoreError        - Domain-rule violations                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  forecourt-db errors (separate crate)                                  │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What clients see (status + envelope)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (nozzle ID, dates, amounts)
//! 3. Errors are enum variants, never String
//! 4. Every domain-rule violation is rejected BEFORE persistence

use chrono::NaiveDate;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They are caught by the API layer and translated into the failure envelope.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No fuel price is configured on or before the requested date.
    ///
    /// ## When This Occurs
    /// - A reading is submitted before the first price was ever set
    /// - A new fuel type was added without a price row
    ///
    /// The reading MUST be rejected. Defaulting the price to zero would mask
    /// the configuration gap and poison every report that touches the row.
    #[error("no price configured for {fuel_type} at station {station_id} on {date}")]
    NoPriceConfigured {
        station_id: String,
        fuel_type: String,
        date: NaiveDate,
    },

    /// A reading already exists for this nozzle and date.
    ///
    /// ## When This Occurs
    /// - Double-submission of the same daily reading form
    /// - Two operators entering the same nozzle concurrently
    #[error("reading already recorded for nozzle {nozzle_id} on {date}")]
    DuplicateReading {
        nozzle_id: String,
        date: NaiveDate,
    },

    /// Station cannot be found.
    #[error("station not found: {0}")]
    StationNotFound(String),

    /// Nozzle cannot be found.
    #[error("nozzle not found: {0}")]
    NozzleNotFound(String),

    /// Employee cannot be found.
    #[error("employee not found: {0}")]
    EmployeeNotFound(String),

    /// Settlement cannot be found.
    #[error("no settlement for station {station_id} on {date}")]
    SettlementNotFound {
        station_id: String,
        date: NaiveDate,
    },

    /// Validation error (wraps ValidationError).
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when submitted data doesn't meet domain requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// New meter value is below the previous one.
    ///
    /// ## When This Occurs
    /// - Typo in the meter entry (12345 instead of 123456)
    /// - Meter replaced/reset without flagging an initial reading
    ///
    /// Litres sold would come out negative, so the reading is rejected.
    #[error(
        "meter rollback on nozzle {nozzle_id}: new value {meter_millilitres}ml \
         is below previous {previous_millilitres}ml"
    )]
    MeterRollback {
        nozzle_id: String,
        meter_millilitres: i64,
        previous_millilitres: i64,
    },

    /// Payment allocation does not sum to the sale amount.
    ///
    /// The tolerance is 1 paisa. Inputs are rejected, never silently
    /// corrected.
    #[error(
        "payment allocation {allocated_paise}p does not match sale amount \
         {expected_paise}p"
    )]
    PaymentMismatch {
        expected_paise: i64,
        allocated_paise: i64,
    },

    /// Monetary value must not be negative.
    #[error("{field} must not be negative")]
    NegativeAmount { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., unparseable date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// A date range where start is after end.
    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NoPriceConfigured {
            station_id: "st-1".to_string(),
            fuel_type: "petrol".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "no price configured for petrol at station st-1 on 2025-12-01"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::PaymentMismatch {
            expected_paise: 950_000,
            allocated_paise: 900_000,
        };
        assert_eq!(
            err.to_string(),
            "payment allocation 900000p does not match sale amount 950000p"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "station name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}

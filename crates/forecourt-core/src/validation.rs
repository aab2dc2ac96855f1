//! # Validation Module
//!
//! Input validation utilities for Forecourt.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (axum)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: field and business-rule validation                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Repository transaction                                       │
//! │  ├── Duplicate/conflict checks                                         │
//! │  └── Valuation + allocation checks (forecourt_core::valuation)         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / UNIQUE constraints                                     │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (station, employee, nozzle label).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(name.to_string())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` business date.
///
/// Aggregation queries match on this exact string form, so anything that
/// isn't a plain calendar date (timestamps, offsets) is rejected up front.
///
/// ## Example
/// ```rust
/// use forecourt_core::validation::parse_business_date;
///
/// assert!(parse_business_date("date", "2026-01-25").is_ok());
/// assert!(parse_business_date("date", "2026-01-25T00:00:00Z").is_err());
/// assert!(parse_business_date("date", "25/01/2026").is_err());
/// ```
pub fn parse_business_date(field: &str, raw: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("'{raw}' is not a YYYY-MM-DD date"),
        }
    })
}

/// Validates that a date range runs forwards.
///
/// A malformed range fails loudly here; it must never reach a query where it
/// would quietly aggregate zero rows.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::InvalidDateRange { start, end });
    }
    Ok(())
}

// =============================================================================
// Money Validators
// =============================================================================

/// Validates a per-litre fuel price.
///
/// ## Rules
/// - Must be positive (a zero price is always a configuration mistake)
/// - Sanity-capped at ₹10,000/L
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::OutOfRange {
            field: "price_per_litre".to_string(),
            min: 1,
            max: 1_000_000,
        });
    }
    if price.paise() > 1_000_000 {
        return Err(ValidationError::OutOfRange {
            field: "price_per_litre".to_string(),
            min: 1,
            max: 1_000_000,
        });
    }
    Ok(())
}

/// Validates a money amount that must not be negative (payment allocations,
/// actual cash counts).
pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::NegativeAmount {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

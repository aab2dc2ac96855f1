//! # Money & Volume Module
//!
//! Provides the `Money` and `Volume` types for handling monetary values and
//! fuel volumes safely.
//!
//! ## Why Integer Units?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A fuel sale is litres × price. Do it in floats and a 3-day report     │
//! │  drifts by paise that a manager will spend an evening hunting for.     │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise + Integer Millilitres                      │
//! │    Money  = i64 paise        (₹95.00 = 9500)                           │
//! │    Volume = i64 millilitres  (100 L  = 100_000)                        │
//! │    amount = round(ml × paise_per_litre / 1000), computed in i128       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use forecourt_core::money::{Money, Volume};
//!
//! let price = Money::from_paise(9500);          // ₹95.00 per litre
//! let litres = Volume::from_millilitres(100_000); // 100 L
//!
//! let amount = litres.times_price(price);
//! assert_eq!(amount.paise(), 950_000); // ₹9,500.00
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in paise (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for variance/shortfalls
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// EVERY monetary value in the system flows through this type: fuel prices,
/// sale amounts, payment allocations, expected cash, variance, shortfalls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use forecourt_core::money::Money;
    ///
    /// let price = Money::from_paise(9550); // ₹95.50
    /// assert_eq!(price.paise(), 9550);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (paise) portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Converts a JSON-number rupee amount into paise, rounding to the
    /// nearest paisa.
    ///
    /// This is a BOUNDARY-ONLY constructor: the HTTP layer accepts rupee
    /// amounts as JSON numbers and must convert exactly once, here. Returns
    /// `None` for NaN/infinite inputs or values outside the representable
    /// range.
    ///
    /// ## Example
    /// ```rust
    /// use forecourt_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees_f64(95.50), Some(Money::from_paise(9550)));
    /// assert_eq!(Money::from_rupees_f64(f64::NAN), None);
    /// ```
    pub fn from_rupees_f64(rupees: f64) -> Option<Self> {
        if !rupees.is_finite() {
            return None;
        }
        let paise = (rupees * 100.0).round();
        if paise.abs() > 9e15 {
            return None;
        }
        Some(Money(paise as i64))
    }

    /// Returns the value as fractional rupees, for DTOs only.
    #[inline]
    pub fn as_rupees_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and debugging. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

// =============================================================================
// Volume Type
// =============================================================================

/// A fuel volume in millilitres.
///
/// Meter readings on a dispenser show litres to two or three decimal places;
/// millilitres cover both without ever touching floating point in the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Volume(i64);

impl Volume {
    /// Creates a Volume from millilitres.
    #[inline]
    pub const fn from_millilitres(ml: i64) -> Self {
        Volume(ml)
    }

    /// Creates a Volume from whole litres.
    #[inline]
    pub const fn from_litres(litres: i64) -> Self {
        Volume(litres * 1000)
    }

    /// Returns the volume in millilitres.
    #[inline]
    pub const fn millilitres(&self) -> i64 {
        self.0
    }

    /// Zero volume.
    #[inline]
    pub const fn zero() -> Self {
        Volume(0)
    }

    /// Checks if the volume is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the volume is negative (meter rollback territory).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Converts a JSON-number litre value into millilitres, rounding to the
    /// nearest millilitre. Boundary-only, like [`Money::from_rupees_f64`].
    pub fn from_litres_f64(litres: f64) -> Option<Self> {
        if !litres.is_finite() {
            return None;
        }
        let ml = (litres * 1000.0).round();
        if ml.abs() > 9e15 {
            return None;
        }
        Some(Volume(ml as i64))
    }

    /// Returns the volume as fractional litres, for DTOs only.
    #[inline]
    pub fn as_litres_f64(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Computes the sale amount for this volume at a per-litre price.
    ///
    /// ## Implementation
    /// Integer math in i128 with half-up rounding:
    /// `(ml × paise_per_litre + 500) / 1000`
    ///
    /// The +500 provides rounding (500/1000 = 0.5). i128 prevents overflow
    /// even for absurd meter values × prices.
    ///
    /// ## Example
    /// ```rust
    /// use forecourt_core::money::{Money, Volume};
    ///
    /// // 12.345 L at ₹95.00/L = ₹1,172.775 → ₹1,172.78
    /// let amount = Volume::from_millilitres(12_345).times_price(Money::from_paise(9500));
    /// assert_eq!(amount.paise(), 117_278);
    /// ```
    pub fn times_price(&self, price_per_litre: Money) -> Money {
        let numerator = self.0 as i128 * price_per_litre.paise() as i128;
        // Round half away from zero so negative volumes (never persisted,
        // but reachable mid-computation) stay symmetric
        let paise = if numerator >= 0 {
            (numerator + 500) / 1000
        } else {
            (numerator - 500) / 1000
        };
        Money::from_paise(paise as i64)
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:03} L", sign, (self.0 / 1000).abs(), (self.0 % 1000).abs())
    }
}

impl Default for Volume {
    fn default() -> Self {
        Volume::zero()
    }
}

impl Add for Volume {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Volume(self.0 + other.0)
    }
}

impl AddAssign for Volume {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Volume {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Volume(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(9550);
        assert_eq!(money.paise(), 9550);
        assert_eq!(money.rupees(), 95);
        assert_eq!(money.paise_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(9550)), "₹95.50");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
    }

    #[test]
    fn test_from_rupees_f64() {
        assert_eq!(Money::from_rupees_f64(95.50), Some(Money::from_paise(9550)));
        assert_eq!(Money::from_rupees_f64(0.01), Some(Money::from_paise(1)));
        // Classic float trap: 0.1 + 0.2
        assert_eq!(Money::from_rupees_f64(0.1 + 0.2), Some(Money::from_paise(30)));
        assert_eq!(Money::from_rupees_f64(f64::NAN), None);
        assert_eq!(Money::from_rupees_f64(f64::INFINITY), None);
    }

    #[test]
    fn test_volume_from_litres_f64() {
        assert_eq!(
            Volume::from_litres_f64(12.345),
            Some(Volume::from_millilitres(12_345))
        );
        assert_eq!(Volume::from_litres_f64(100.0), Some(Volume::from_litres(100)));
        assert_eq!(Volume::from_litres_f64(f64::NAN), None);
    }

    #[test]
    fn test_times_price_exact() {
        // 100 L at ₹95.00 = ₹9,500.00 exactly
        let amount = Volume::from_litres(100).times_price(Money::from_paise(9500));
        assert_eq!(amount.paise(), 950_000);
    }

    #[test]
    fn test_times_price_rounds_half_up() {
        // 12.345 L × ₹95.00 = 1,172.775 → 1,172.78
        let amount = Volume::from_millilitres(12_345).times_price(Money::from_paise(9500));
        assert_eq!(amount.paise(), 117_278);

        // 1 ml × ₹95.00/L = 9.5 paise → 10
        let amount = Volume::from_millilitres(1).times_price(Money::from_paise(9500));
        assert_eq!(amount.paise(), 10);
    }

    #[test]
    fn test_times_price_zero_volume() {
        let amount = Volume::zero().times_price(Money::from_paise(10_500));
        assert!(amount.is_zero());
    }

    #[test]
    fn test_volume_display() {
        assert_eq!(format!("{}", Volume::from_millilitres(12_345)), "12.345 L");
        assert_eq!(format!("{}", Volume::from_litres(100)), "100.000 L");
        assert_eq!(format!("{}", Volume::from_millilitres(-500)), "-0.500 L");
    }
}

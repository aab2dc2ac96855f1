//! # Settlement Reconciliation
//!
//! Pure math for the daily cash settlement: expected vs actual cash,
//! variance, and employee-wise shortfall apportionment.
//!
//! ## The Day-End Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Settlement for (station, date)                                         │
//! │                                                                         │
//! │  expected cash = Σ cash allocation over the day's reportable readings  │
//! │  actual cash   = manager's physical count                              │
//! │  variance      = actual − expected                                     │
//! │                                                                         │
//! │  variance >= 0 ──► record, no shortfall rows                           │
//! │  variance <  0 ──► apportion |variance| across employees by their      │
//! │                    share of the day's reading COUNT (equal weight per  │
//! │                    reading, not per litre or per rupee)                │
//! │                                                                         │
//! │  Example: A=5 readings, B=5 readings, variance = -₹500                 │
//! │           → A owes ₹250, B owes ₹250                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exactness
//! Apportioned paise must sum EXACTLY to the absolute shortfall. Integer
//! division alone leaks remainder paise, so the split uses largest-remainder
//! rounding: floor every share, then hand the leftover paise to the largest
//! fractional parts (ties broken by employee ID for determinism).

use crate::money::Money;
use crate::types::EmployeeShortfall;

/// Per-employee reading tally for one station-day, the apportionment input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeDayCount {
    pub employee_id: String,
    pub employee_name: String,
    /// Reportable readings this employee recorded that day.
    pub reading_count: i64,
}

/// The computed reconciliation for one station-day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub expected_cash: Money,
    pub actual_cash: Money,
    /// actual − expected. Negative = shortfall.
    pub variance: Money,
    /// Empty unless the variance is negative.
    pub shortfalls: Vec<EmployeeShortfall>,
}

/// Reconciles a day's expected cash against the manager's count.
///
/// Shortfall rows are produced only for a negative variance, and only for
/// employees with a nonzero reading count. An over-count (positive variance)
/// or an empty day is recorded as-is with no apportionment.
pub fn reconcile(
    expected_cash: Money,
    actual_cash: Money,
    counts: &[EmployeeDayCount],
) -> Reconciliation {
    let variance = actual_cash - expected_cash;

    let shortfalls = if variance.is_negative() {
        apportion_shortfall(variance.abs(), counts)
    } else {
        Vec::new()
    };

    Reconciliation {
        expected_cash,
        actual_cash,
        variance,
        shortfalls,
    }
}

/// Splits `shortfall` across employees in proportion to reading count,
/// summing exactly via largest-remainder rounding.
///
/// ## Example
/// ```rust
/// use forecourt_core::money::Money;
/// use forecourt_core::reconciliation::{apportion_shortfall, EmployeeDayCount};
///
/// let counts = vec![
///     EmployeeDayCount { employee_id: "a".into(), employee_name: "Asha".into(), reading_count: 5 },
///     EmployeeDayCount { employee_id: "b".into(), employee_name: "Bilal".into(), reading_count: 5 },
/// ];
/// let parts = apportion_shortfall(Money::from_paise(50_000), &counts);
/// assert_eq!(parts[0].shortfall_paise, 25_000);
/// assert_eq!(parts[1].shortfall_paise, 25_000);
/// ```
pub fn apportion_shortfall(
    shortfall: Money,
    counts: &[EmployeeDayCount],
) -> Vec<EmployeeShortfall> {
    let total_paise = shortfall.paise();
    debug_assert!(total_paise >= 0, "apportion over absolute shortfall");

    let total_count: i64 = counts.iter().map(|c| c.reading_count).sum();
    if total_paise == 0 || total_count == 0 {
        return Vec::new();
    }

    // Floor division first; track the remainder numerator for each employee
    let mut parts: Vec<(usize, i64, i64)> = Vec::with_capacity(counts.len());
    let mut allocated: i64 = 0;
    for (idx, c) in counts.iter().enumerate() {
        if c.reading_count <= 0 {
            continue;
        }
        let numerator = total_paise as i128 * c.reading_count as i128;
        let floor = (numerator / total_count as i128) as i64;
        let remainder = (numerator % total_count as i128) as i64;
        allocated += floor;
        parts.push((idx, floor, remainder));
    }

    // Hand leftover paise to the largest remainders, employee ID as the
    // deterministic tie-break
    let mut leftover = total_paise - allocated;
    parts.sort_by(|a, b| {
        b.2.cmp(&a.2)
            .then_with(|| counts[a.0].employee_id.cmp(&counts[b.0].employee_id))
    });
    for part in parts.iter_mut() {
        if leftover == 0 {
            break;
        }
        part.1 += 1;
        leftover -= 1;
    }

    // Restore input order for stable output
    parts.sort_by_key(|p| p.0);
    parts
        .into_iter()
        .map(|(idx, paise, _)| EmployeeShortfall {
            employee_id: counts[idx].employee_id.clone(),
            employee_name: counts[idx].employee_name.clone(),
            shortfall_paise: paise,
            reading_count: counts[idx].reading_count,
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn count(id: &str, n: i64) -> EmployeeDayCount {
        EmployeeDayCount {
            employee_id: id.to_string(),
            employee_name: format!("Employee {id}"),
            reading_count: n,
        }
    }

    #[test]
    fn test_even_split() {
        // A=5, B=5 readings, ₹500 short → ₹250 each
        let r = reconcile(
            Money::from_paise(500_000),
            Money::from_paise(450_000),
            &[count("a", 5), count("b", 5)],
        );

        assert_eq!(r.variance.paise(), -50_000);
        assert_eq!(r.shortfalls.len(), 2);
        assert_eq!(r.shortfalls[0].shortfall_paise, 25_000);
        assert_eq!(r.shortfalls[1].shortfall_paise, 25_000);
    }

    #[test]
    fn test_proportional_split() {
        // A=3, B=1 → A carries 3/4 of the shortfall
        let r = reconcile(
            Money::from_paise(100_000),
            Money::from_paise(60_000),
            &[count("a", 3), count("b", 1)],
        );

        assert_eq!(r.variance.paise(), -40_000);
        assert_eq!(r.shortfalls[0].shortfall_paise, 30_000);
        assert_eq!(r.shortfalls[1].shortfall_paise, 10_000);
    }

    #[test]
    fn test_parts_sum_exactly() {
        // 1000 paise over 3 equal employees does not divide evenly
        let parts = apportion_shortfall(
            Money::from_paise(1000),
            &[count("a", 1), count("b", 1), count("c", 1)],
        );

        let total: i64 = parts.iter().map(|p| p.shortfall_paise).sum();
        assert_eq!(total, 1000);
        // 334/333/333 with the extra paisa going to the lowest employee ID
        assert_eq!(parts[0].shortfall_paise, 334);
        assert_eq!(parts[1].shortfall_paise, 333);
        assert_eq!(parts[2].shortfall_paise, 333);
    }

    #[test]
    fn test_parts_sum_exactly_many_cases() {
        for (paise, a, b, c) in [(7, 1, 2, 4), (99, 5, 3, 1), (100_001, 7, 11, 13)] {
            let parts = apportion_shortfall(
                Money::from_paise(paise),
                &[count("a", a), count("b", b), count("c", c)],
            );
            let total: i64 = parts.iter().map(|p| p.shortfall_paise).sum();
            assert_eq!(total, paise, "paise={paise} a={a} b={b} c={c}");
        }
    }

    #[test]
    fn test_positive_variance_no_shortfalls() {
        // Zero readings that day: any actual cash is a pure positive variance
        let r = reconcile(Money::zero(), Money::from_paise(50_000), &[]);

        assert_eq!(r.expected_cash.paise(), 0);
        assert_eq!(r.variance.paise(), 50_000);
        assert!(r.shortfalls.is_empty());
    }

    #[test]
    fn test_exact_match_no_shortfalls() {
        let r = reconcile(
            Money::from_paise(500_000),
            Money::from_paise(500_000),
            &[count("a", 5)],
        );
        assert!(r.variance.is_zero());
        assert!(r.shortfalls.is_empty());
    }

    #[test]
    fn test_zero_count_employees_skipped() {
        let parts = apportion_shortfall(
            Money::from_paise(1000),
            &[count("a", 2), count("b", 0)],
        );
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].employee_id, "a");
        assert_eq!(parts[0].shortfall_paise, 1000);
    }
}

//! # Repository Implementations
//!
//! One repository per aggregate:
//!
//! - [`station`] - stations, nozzles, employees (reference data)
//! - [`price`] - append-only fuel price history
//! - [`reading`] - transactional reading recording
//! - [`settlement`] - transactional daily settlement upsert
//! - [`report`] - read-only aggregation queries
//!
//! Repositories own SQL and transactions; all business math is delegated to
//! `forecourt_core` so tests and production share one arithmetic path.

pub mod price;
pub mod reading;
pub mod report;
pub mod settlement;
pub mod station;

use uuid::Uuid;

/// Generates a new entity ID (UUID v4, string form).
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}

//! # forecourt-core: Pure Business Logic for Forecourt
//!
//! This crate is the **heart** of Forecourt. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Forecourt Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React PWA)                         │   │
//! │  │   Reading entry ──► Settlement screen ──► Dashboards           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP/JSON                              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum handlers)                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ forecourt-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌─────────┐ ┌───────────┐ ┌────────────────────┐ │   │
//! │  │  │  money  │ │ pricing │ │ valuation │ │  reconciliation    │ │   │
//! │  │  │ Money   │ │ resolve │ │ litres ×  │ │  variance +        │ │   │
//! │  │  │ Volume  │ │ history │ │ price     │ │  apportionment     │ │   │
//! │  │  └─────────┘ └─────────┘ └───────────┘ └────────────────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  forecourt-db (Database Layer)                  │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (FuelPrice, NozzleReading, Settlement, ...)
//! - [`money`] - Money (paise) and Volume (millilitres), integer arithmetic
//! - [`pricing`] - Effective-price resolution over the append-only history
//! - [`valuation`] - Reading valuation and payment-allocation checks
//! - [`reconciliation`] - Settlement variance and shortfall apportionment
//! - [`reporting`] - Sales summary folds
//! - [`validation`] - Field validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Units**: Money in paise, volume in millilitres, no floats
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//! 5. **Write-time capture**: a reading freezes its price; reports only ever
//!    read the frozen value

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod reconciliation;
pub mod reporting;
pub mod types;
pub mod validation;
pub mod valuation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use forecourt_core::Money` instead of
// `use forecourt_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Volume};
pub use types::*;

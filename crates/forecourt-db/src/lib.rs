//! # forecourt-db: Database Layer for Forecourt
//!
//! This crate provides database access for the Forecourt station backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Forecourt Data Flow                               │
//! │                                                                         │
//! │  HTTP Handler (POST /readings)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   forecourt-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (reading.rs)   │    │  (embedded)  │  │   │
//! │  │   │               │    │                │    │              │  │   │
//! │  │   │ SqlitePool    │    │ PriceRepo      │    │ 001_initial_ │  │   │
//! │  │   │ Connection    │◄───│ ReadingRepo    │    │ schema.sql   │  │   │
//! │  │   │ Management    │    │ SettlementRepo │    │              │  │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Pure math (pricing, valuation, reconciliation) lives in      │   │
//! │  │   forecourt-core; this crate wraps it in transactions.         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │        /var/lib/forecourt/forecourt.db (WAL mode)               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (price, reading, settlement, ...)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use forecourt_db::{Database, DbConfig};
//!
//! // Create database with default config
//! let config = DbConfig::new("path/to/forecourt.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let price = db.prices().resolve(&station_id, FuelType::Petrol, today).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::price::FuelPriceRepository;
pub use repository::reading::{NewReading, ReadingRepository};
pub use repository::report::ReportRepository;
pub use repository::settlement::{SettlementOutcome, SettlementRepository};
pub use repository::station::StationRepository;

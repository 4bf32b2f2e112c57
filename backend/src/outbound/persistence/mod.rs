//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each adapter implements one driven port over a shared [`DbPool`]. Row
//! structs (`models.rs`) and the table definitions (`schema.rs`) stay private
//! to this module; adapters translate them into domain types and map Diesel
//! failures onto the port's error enum.
//!
//! Multi-step writes (vote transitions, payout requests, settlements) run
//! inside a single transaction and lock the rows they derive state from.
//!
//! # Example
//!
//! ```ignore
//! use vidhub::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/vidhub")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_block_repository;
mod diesel_catalogue_repository;
mod diesel_engagement_repository;
mod diesel_listing;
mod diesel_moderation_repository;
mod diesel_payout_ledger;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_block_repository::DieselBlockRepository;
pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_engagement_repository::DieselEngagementRepository;
pub use diesel_moderation_repository::DieselModerationRepository;
pub use diesel_payout_ledger::DieselPayoutLedger;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

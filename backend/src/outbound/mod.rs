//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL repositories using Diesel ORM
//! - **memory**: a seeded in-process store used when no database is
//!   configured and by handler tests
//! - **dedupe**: the concurrent per-viewer recent-views map
//!
//! Adapters translate between domain types and storage representations. They
//! hold no business rules beyond the atomicity each port promises.

pub mod dedupe;
pub mod memory;
pub mod persistence;

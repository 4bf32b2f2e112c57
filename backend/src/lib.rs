//! vidhub backend library.
//!
//! Hexagonal layout: [`domain`] holds the engagement, moderation and payout
//! rules behind ports, [`inbound::http`] exposes them over Actix Web, and
//! [`outbound`] implements the driven ports with Diesel or an in-memory
//! store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

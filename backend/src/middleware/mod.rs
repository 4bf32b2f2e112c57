//! Request middleware.
//!
//! Request-wide concerns live here. The admin authorization guard sits with
//! the HTTP adapter in [`crate::inbound::http::guard`] because it reads the
//! session.

pub mod trace;

pub use trace::Trace;

//! Application settings loaded via OrthoConfig.
//!
//! Values come from `VIDHUB_*` environment variables, an optional
//! configuration file, and command-line flags, in OrthoConfig's usual
//! precedence. Session cookie settings are read separately by
//! [`crate::inbound::http::session_config`].

use std::net::SocketAddr;

use chrono::Duration;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{
    DEFAULT_PAYOUT_MINIMUM_CENTS, DEFAULT_VIEW_DEDUPE_CAPACITY, DEFAULT_VIEW_DEDUPE_MAX_VIEWERS,
    DEFAULT_VIEW_DEDUPE_TTL_HOURS, PayoutPolicy, ViewDedupePolicy, ViewDedupePolicyError,
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_PURGE_INTERVAL_SECS: u64 = 300;

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "VIDHUB")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. The seeded in-memory store is used when
    /// absent.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Recent views remembered per viewer.
    pub view_dedupe_capacity: Option<usize>,
    /// Lifetime of a viewer's recent-view set, in hours.
    pub view_dedupe_ttl_hours: Option<i64>,
    /// Most viewers whose recent-view sets are kept in memory at once.
    pub view_dedupe_max_viewers: Option<usize>,
    /// Smallest payout a creator may request, in cents.
    pub payout_minimum_cents: Option<i64>,
    /// Seconds between sweeps of expired recent-view sets.
    pub dedupe_purge_interval_secs: Option<u64>,
}

/// Raised when a setting holds an unusable value.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error(transparent)]
    ViewDedupe(#[from] ViewDedupePolicyError),
    #[error("payout minimum must be positive, got {0}")]
    PayoutMinimum(i64),
    #[error("database pool needs at least one connection")]
    DbMaxConnections,
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Pool size for the database adapter.
    ///
    /// # Errors
    /// Returns [`SettingsError::DbMaxConnections`] for zero.
    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::DbMaxConnections),
            size => Ok(size),
        }
    }

    /// View dedupe bounds.
    ///
    /// # Errors
    /// Propagates [`ViewDedupePolicyError`] for a zero capacity, a
    /// non-positive lifetime or a zero viewer cap.
    pub fn view_dedupe_policy(&self) -> Result<ViewDedupePolicy, SettingsError> {
        let capacity = self
            .view_dedupe_capacity
            .unwrap_or(DEFAULT_VIEW_DEDUPE_CAPACITY);
        let hours = self
            .view_dedupe_ttl_hours
            .unwrap_or(DEFAULT_VIEW_DEDUPE_TTL_HOURS);
        let max_viewers = self
            .view_dedupe_max_viewers
            .unwrap_or(DEFAULT_VIEW_DEDUPE_MAX_VIEWERS);
        let policy = ViewDedupePolicy::new(capacity, Duration::hours(hours))?;
        Ok(policy.with_max_viewers(max_viewers)?)
    }

    /// Payout threshold.
    ///
    /// # Errors
    /// Returns [`SettingsError::PayoutMinimum`] unless the minimum is
    /// positive.
    pub fn payout_policy(&self) -> Result<PayoutPolicy, SettingsError> {
        match self
            .payout_minimum_cents
            .unwrap_or(DEFAULT_PAYOUT_MINIMUM_CENTS)
        {
            cents if cents > 0 => Ok(PayoutPolicy::new(cents)),
            cents => Err(SettingsError::PayoutMinimum(cents)),
        }
    }

    /// Interval between dedupe purges.
    #[must_use]
    pub fn dedupe_purge_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(
            self.dedupe_purge_interval_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_PURGE_INTERVAL_SECS),
        )
    }
}

#[cfg(test)]
mod tests {
    //! Settings parsing and validation.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 8] = [
        "VIDHUB_BIND_ADDR",
        "VIDHUB_DATABASE_URL",
        "VIDHUB_DB_MAX_CONNECTIONS",
        "VIDHUB_VIEW_DEDUPE_CAPACITY",
        "VIDHUB_VIEW_DEDUPE_TTL_HOURS",
        "VIDHUB_VIEW_DEDUPE_MAX_VIEWERS",
        "VIDHUB_PAYOUT_MINIMUM_CENTS",
        "VIDHUB_DEDUPE_PURGE_INTERVAL_SECS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("vidhub")]).expect("config should load")
    }

    fn cleared_except(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr"),
            "0.0.0.0:8080".parse::<SocketAddr>().expect("literal")
        );
        assert!(settings.database_url.is_none());
        assert_eq!(settings.db_max_connections().expect("pool size"), 10);
        let policy = settings.view_dedupe_policy().expect("policy");
        assert_eq!(policy.capacity(), 100);
        assert_eq!(policy.ttl(), Duration::hours(24));
        assert_eq!(policy.max_viewers(), 100_000);
        assert_eq!(
            settings.payout_policy().expect("payout policy"),
            PayoutPolicy::new(10_000)
        );
        assert_eq!(
            settings.dedupe_purge_interval(),
            std::time::Duration::from_secs(300)
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let overrides = [
            ("VIDHUB_BIND_ADDR", "127.0.0.1:9000"),
            ("VIDHUB_DATABASE_URL", "postgres://localhost/vidhub"),
            ("VIDHUB_VIEW_DEDUPE_CAPACITY", "5"),
            ("VIDHUB_VIEW_DEDUPE_TTL_HOURS", "1"),
            ("VIDHUB_VIEW_DEDUPE_MAX_VIEWERS", "50"),
            ("VIDHUB_PAYOUT_MINIMUM_CENTS", "2500"),
        ];
        let _guard = lock_env(cleared_except(&overrides));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("bind addr").port(),
            9000
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/vidhub")
        );
        let policy = settings.view_dedupe_policy().expect("policy");
        assert_eq!(policy.capacity(), 5);
        assert_eq!(policy.ttl(), Duration::hours(1));
        assert_eq!(policy.max_viewers(), 50);
        assert_eq!(
            settings.payout_policy().expect("payout policy"),
            PayoutPolicy::new(2_500)
        );
    }

    #[rstest]
    #[case("VIDHUB_BIND_ADDR", "not-an-address")]
    #[case("VIDHUB_VIEW_DEDUPE_CAPACITY", "0")]
    #[case("VIDHUB_VIEW_DEDUPE_TTL_HOURS", "0")]
    #[case("VIDHUB_VIEW_DEDUPE_MAX_VIEWERS", "0")]
    #[case("VIDHUB_PAYOUT_MINIMUM_CENTS", "-1")]
    #[case("VIDHUB_DB_MAX_CONNECTIONS", "0")]
    fn unusable_values_are_rejected(#[case] name: &str, #[case] value: &str) {
        let overrides = [(name, value)];
        let _guard = lock_env(cleared_except(&overrides));

        let settings = load_from_empty_args();
        let failed = settings.bind_addr().is_err()
            || settings.view_dedupe_policy().is_err()
            || settings.payout_policy().is_err()
            || settings.db_max_connections().is_err();
        assert!(failed, "{name}={value} should be rejected");
    }
}

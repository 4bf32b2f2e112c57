//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use vidhub::domain::{PayoutPolicy, ViewDedupePolicy};
use vidhub::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl_hours: i64,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) view_dedupe: ViewDedupePolicy,
    pub(crate) payout_policy: PayoutPolicy,
    pub(crate) purge_interval: std::time::Duration,
}

impl ServerConfig {
    /// Construct a server configuration with default engagement policies.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            session_ttl_hours: 2,
            bind_addr,
            db_pool: None,
            view_dedupe: ViewDedupePolicy::default(),
            payout_policy: PayoutPolicy::default(),
            purge_interval: std::time::Duration::from_secs(300),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server runs against the seeded in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Lifetime of the persistent session cookie.
    #[must_use]
    pub fn with_session_ttl_hours(mut self, hours: i64) -> Self {
        self.session_ttl_hours = hours;
        self
    }

    /// Override the view dedupe bounds.
    #[must_use]
    pub fn with_view_dedupe(mut self, policy: ViewDedupePolicy) -> Self {
        self.view_dedupe = policy;
        self
    }

    /// Override the payout threshold.
    #[must_use]
    pub fn with_payout_policy(mut self, policy: PayoutPolicy) -> Self {
        self.payout_policy = policy;
        self
    }

    /// Interval between sweeps of expired recent-view sets.
    #[must_use]
    pub fn with_purge_interval(mut self, interval: std::time::Duration) -> Self {
        self.purge_interval = interval;
        self
    }
}

//! vidhub entry-point: loads settings, wires adapters and serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use vidhub::inbound::http::health::HealthState;
use vidhub::inbound::http::session_config::{BuildMode, session_settings_from_env};
use vidhub::outbound::persistence::{DbPool, PoolConfig};
use vidhub::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load application settings")?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    info!(
        fingerprint = %session.key_fingerprint(),
        cookie_secure = session.cookie_secure,
        "session key loaded"
    );

    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_session_ttl_hours(session.ttl_hours)
    .with_view_dedupe(settings.view_dedupe_policy()?)
    .with_payout_policy(settings.payout_policy()?)
    .with_purge_interval(settings.dedupe_purge_interval());

    if let Some(url) = settings.database_url.as_deref() {
        let max_size = settings.db_max_connections()?;
        let pool_config = PoolConfig::new(url)
            .with_max_size(max_size)
            .with_min_idle(Some(max_size.min(2)));
        info!(database = %pool_config.redacted_url(), "connecting to PostgreSQL");
        let pool = DbPool::new(pool_config)
            .await
            .wrap_err("failed to create database pool")?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("server terminated with an error")
}

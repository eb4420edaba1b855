//! ClickBeard entry-point: loads configuration, prepares storage and serves
//! the REST API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use clickbeard::inbound::http::health::HealthState;
use clickbeard::outbound::auth::{BuildMode, secret_fingerprint, token_settings_from_env};
use clickbeard::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use ortho_config::OrthoConfig;

use server::{ServerConfig, ServerSettings, bootstrap_admin, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load().map_err(std::io::Error::other)?;
    let env = DefaultEnv::new();
    let tokens = token_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(
        fingerprint = %secret_fingerprint(&tokens.secret),
        ttl_secs = tokens.ttl.as_secs(),
        "token signing configured"
    );

    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let mut config = ServerConfig::new(bind_addr, tokens);
    if let Some(database_url) = settings.database_url(&env) {
        if settings.migrations_enabled() {
            run_migrations(&database_url)
                .await
                .map_err(std::io::Error::other)?;
        }
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections),
        )
        .await
        .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let http_state = build_http_state(&config);
    bootstrap_admin(&http_state, &settings)
        .await
        .map_err(|err| std::io::Error::other(err.message().to_owned()))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, http_state, &config)?;
    info!(%bind_addr, "ClickBeard API listening");
    server.await
}

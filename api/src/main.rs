use actix_web::{web, HttpServer};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use tg_api::{create_app, telemetry, AppState};
use tg_core::repositories::{RevocationRepository, UserDirectory};
use tg_core::services::{
    spawn_sweeper, AuthGate, AuthGateConfig, SessionRegistry, SweeperConfig, TokenCodec,
    TokenCodecConfig,
};
use tg_infra::{FileRevocationStore, InMemoryUserDirectory};
use tg_shared::config::{AppConfig, Environment};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables; the environment-specific file wins
    let environment = Environment::from_env();
    dotenvy::from_filename(environment.env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::load(Some(Path::new(environment.config_file())))
        .context("failed to load configuration")?;

    telemetry::init_tracing(&config.logging)?;

    info!(environment = %config.environment, "Starting TokenGate API server");

    if config.auth.jwt.is_using_default_secret() {
        if config.environment.is_production() {
            anyhow::bail!("JWT secret must be configured in production");
        }
        warn!("Using the built-in development JWT secret");
    }

    let codec_config = TokenCodecConfig::try_from(&config.auth.jwt)
        .context("invalid token configuration")?;
    let codec = TokenCodec::new(codec_config).context("failed to build token codec")?;

    let store = Arc::new(
        FileRevocationStore::from_config(&config.auth.revocation)
            .context("invalid revocation store configuration")?,
    );
    let revocations: Arc<dyn RevocationRepository> = store.clone();
    let sessions = Arc::new(SessionRegistry::new(revocations));

    let sweeper_config =
        SweeperConfig::try_from(&config.auth.session).context("invalid sweeper configuration")?;
    let gate_config =
        AuthGateConfig::try_from(&config.auth.session).context("invalid session configuration")?;

    let sweeper = spawn_sweeper(sessions.clone(), sweeper_config);

    // No external account service is wired in; every user counts as active
    warn!("No user directory configured, accepting all user ids");
    let users: Arc<dyn UserDirectory> = Arc::new(InMemoryUserDirectory::permissive());

    let gate = AuthGate::new(
        codec,
        sessions,
        users,
        gate_config,
    );

    let mut app_state = AppState::new(gate).with_blacklist_path(store.path());
    app_state.cookie_name = config.auth.session.cookie_name.clone();
    let state = web::Data::new(app_state);

    let bind_address = config.server.bind_address();
    info!(%bind_address, "Server will bind to address");

    let mut server = HttpServer::new({
        let state = state.clone();
        move || create_app(state.clone())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let result = server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await;

    info!("Server stopped, shutting down background tasks");
    sweeper.shutdown().await;
    if let Err(e) = store.flush() {
        error!(error = %e, "Failed to flush revocation store on shutdown");
    }

    result.context("server error")
}

//! Backend entry-point: loads settings, wires adapters and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use campus_backend::domain::ports::BootstrapOutcome;
use campus_backend::inbound::http::health::HealthState;
use campus_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use campus_backend::outbound::persistence::{DbPool, migrate};

use server::{AppSettings, BackendPorts, ServerConfig, build_backend_ports, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let principal = settings.principal_bootstrap().map_err(io::Error::other)?;
    let env = DefaultEnv::new();
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;

    let db_pool = match settings.pool_config() {
        Some(pool_config) => {
            migrate(pool_config.database_url().to_owned())
                .await
                .map_err(io::Error::other)?;
            Some(DbPool::new(pool_config).await.map_err(io::Error::other)?)
        }
        None => None,
    };

    let BackendPorts { http, bootstrap } = build_backend_ports(db_pool.as_ref());
    if let Some(request) = principal {
        let outcome = bootstrap
            .ensure_principal(request)
            .await
            .map_err(|error| io::Error::other(format!("principal bootstrap: {error}")))?;
        match outcome {
            BootstrapOutcome::Created(id) => info!(principal = %id, "principal created"),
            BootstrapOutcome::AlreadyExists(id) => info!(principal = %id, "principal present"),
        }
    }

    let config = ServerConfig::new(session, bind_addr);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::make_metrics());

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "campus backend listening");
    create_server(health_state, http, config)?.await
}

//! Subcommand implementations.

use std::net::SocketAddr;

use anyhow::Context;
use openfga_backend_plugin::{OpenFgaClient, OpenFgaConfig};

use crate::api;
use crate::config::{AppConfig, ENV_PREFIX};
use crate::state::AppState;

/// Serve the HTTP API until Ctrl-C.
///
/// # Errors
///
/// Fails on invalid configuration, an unreachable `OpenFGA` backend at
/// startup, or a bind error.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    cfg.validate()?;
    let addr: SocketAddr = cfg
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("invalid server.bind_addr '{}'", cfg.server.bind_addr))?;
    let cors = cfg.server.cors.clone();
    let state = AppState::from_config(cfg)?;

    if let Some(fga) = &state.fga {
        let model = fga
            .read_latest_authorization_model()
            .await
            .context("OpenFGA readiness check failed")?;
        match model {
            Some(id) => tracing::info!(model_id = %id, "OpenFGA backend ready"),
            None => tracing::warn!("OpenFGA store has no authorization model; run setup-fga"),
        }
    }

    let app = api::router(state, &cors)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server bound on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!(e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("HTTP server shutting down gracefully");
}

/// Create a store, write the authorization model into it and print the
/// settings to use.
///
/// # Errors
///
/// Fails if any `OpenFGA` call fails.
pub async fn setup_fga(cfg: OpenFgaConfig, store_name: &str) -> anyhow::Result<()> {
    let client = OpenFgaClient::new(cfg);
    let store_id = client.create_store(store_name).await?;
    let client = client.with_store(store_id.clone(), None);
    let model_id = client.write_authorization_model().await?;

    println!("{ENV_PREFIX}OPENFGA__STORE_ID={store_id}");
    println!("{ENV_PREFIX}OPENFGA__AUTHORIZATION_MODEL_ID={model_id}");
    Ok(())
}

/// Validate the configuration and print a short summary.
///
/// # Errors
///
/// Fails on the first inconsistency.
pub fn check_config(cfg: &AppConfig) -> anyhow::Result<()> {
    cfg.validate()?;
    println!(
        "configuration OK: backend={}, bind_addr={}, roles={}, assignments={}",
        cfg.backend,
        cfg.server.bind_addr,
        cfg.hybrid_authz.roles.len(),
        cfg.hybrid_authz.assignments.len()
    );
    Ok(())
}

// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `hubdesk serve` command implementation.
//!
//! Wires the full pipeline: SQLite storage, the Graph API client (profile
//! resolver + outbound dispatcher), the realtime hub, the threading engine,
//! and the HTTP gateway. Supports graceful shutdown via Ctrl-C.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use hubdesk_config::HubdeskConfig;
use hubdesk_core::HubdeskError;
use hubdesk_engine::ThreadingEngine;
use hubdesk_gateway::{start_server, AuthConfig, GatewayState, ServerConfig};
use hubdesk_messenger::GraphClient;
use hubdesk_realtime::RealtimeHub;
use hubdesk_storage::Database;

/// Runs the `hubdesk serve` command.
pub async fn run_serve(config: HubdeskConfig) -> Result<(), HubdeskError> {
    init_tracing(&config.service.log_level);

    info!(service = %config.service.name, "starting hubdesk serve");

    // Fail-closed: an API surface with no way to verify tokens is a
    // misconfiguration, not a mode.
    if config.gateway.auth_secret.is_none() {
        return Err(HubdeskError::Config(
            "gateway.auth_secret is required; set it in hubdesk.toml or HUBDESK_GATEWAY_AUTH_SECRET"
                .to_string(),
        ));
    }
    if config.messenger.webhook_verify_token.is_none() {
        info!("messenger.webhook_verify_token not set; webhook verification will reject all attempts");
    }

    let db = Database::open(&config.storage).await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let graph = Arc::new(match &config.messenger.api_base_url {
        Some(base) => GraphClient::with_base_url(base.clone())?,
        None => GraphClient::new(&config.messenger.graph_api_version)?,
    });

    let hub = Arc::new(RealtimeHub::new());

    let engine = Arc::new(ThreadingEngine::new(
        db.clone(),
        graph.clone(),
        graph.clone(),
        hub.clone(),
    ));

    let state = GatewayState {
        engine,
        db: db.clone(),
        graph,
        hub,
        auth: AuthConfig {
            secret: config.gateway.auth_secret.clone(),
        },
        webhook_verify_token: config.messenger.webhook_verify_token.clone(),
    };

    // Install the shutdown signal handler.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("shutdown signal received");
                cancel.cancel();
            }
        });
    }

    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };
    start_server(&server_config, state, cancel).await?;

    db.close().await?;
    info!("hubdesk serve shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hubdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook ingress: provider subscription verification and event receipt.
//!
//! The provider enforces delivery timeouts and retries anything it does not
//! consider acknowledged promptly. `POST /webhook` therefore acknowledges
//! unconditionally and immediately; parsing and threading run in a
//! background task whose failures are logged, never surfaced to the provider
//! (which would trigger redelivery storms).

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{debug, warn};

use hubdesk_messenger::webhook::{normalize, WebhookPayload};

use crate::server::GatewayState;

/// Query parameters of the provider's subscription verification request.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /webhook
///
/// Subscription verification: echo the challenge when the mode is
/// `subscribe` and the verify token matches configuration.
pub async fn verify_webhook(
    State(state): State<GatewayState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let expected = state.webhook_verify_token.as_deref();
    let mode_ok = params.mode.as_deref() == Some("subscribe");
    let token_ok = expected.is_some() && params.verify_token.as_deref() == expected;

    if mode_ok && token_ok {
        debug!("webhook verified");
        (StatusCode::OK, params.challenge.unwrap_or_default()).into_response()
    } else {
        warn!("webhook verification failed");
        StatusCode::FORBIDDEN.into_response()
    }
}

/// POST /webhook
///
/// Acknowledges receipt immediately, then parses and threads the delivery
/// in the background.
pub async fn receive_webhook(State(state): State<GatewayState>, body: Bytes) -> impl IntoResponse {
    let engine = state.engine.clone();
    tokio::spawn(async move {
        let payload: WebhookPayload = match serde_json::from_slice(&body) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, "discarding unparseable webhook payload");
                return;
            }
        };
        let events = normalize(payload);
        debug!(count = events.len(), "processing webhook events");
        engine.ingest_batch(events).await;
    });

    (StatusCode::OK, "EVENT_RECEIVED")
}

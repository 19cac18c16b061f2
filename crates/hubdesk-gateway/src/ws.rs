// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WebSocket handler for live agent sessions.
//!
//! Sessions authenticate during the handshake with the same bearer token the
//! REST surface uses (`/ws?token=...`), join the realtime hub under their
//! account id, and receive `new_message` frames:
//!
//! ```json
//! {"type": "new_message", "conversation": {...}, "message": {...}}
//! ```
//!
//! The socket is push-only; anything the client sends besides close frames
//! is ignored. Missed frames are not replayed — the REST read path is the
//! source of truth.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info};

use crate::server::GatewayState;

#[derive(Debug, Deserialize)]
pub struct WsParams {
    #[serde(default)]
    pub token: Option<String>,
}

/// WebSocket upgrade handler.
///
/// The token is verified before the upgrade completes; an invalid or
/// missing token never joins the hub.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<GatewayState>,
) -> Response {
    let Some(account_id) = params
        .token
        .as_deref()
        .and_then(|token| state.auth.verify(token))
    else {
        return StatusCode::UNAUTHORIZED.into_response();
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, account_id))
}

/// Handle an individual live session.
///
/// Registers with the hub, forwards pushed frames to the socket, and
/// unregisters on disconnect.
async fn handle_socket(socket: WebSocket, state: GatewayState, account_id: String) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let (session_id, mut rx) = state.hub.subscribe(&account_id);
    info!(account_id, session_id, "live session connected");

    let sender_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Close(_) => break,
            _ => {
                debug!(session_id, "ignoring client frame on push-only socket");
            }
        }
    }

    state.hub.unsubscribe(&account_id, &session_id);
    sender_task.abort();
    info!(account_id, session_id, "live session disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ws_params_deserialize_with_token() {
        let params: WsParams = serde_json::from_str(r#"{"token": "acct-1.abc"}"#).unwrap();
        assert_eq!(params.token.as_deref(), Some("acct-1.abc"));
    }

    #[test]
    fn ws_params_tolerate_missing_token() {
        let params: WsParams = serde_json::from_str("{}").unwrap();
        assert!(params.token.is_none());
    }
}

// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;

use hubdesk_core::HubdeskError;
use hubdesk_engine::ThreadingEngine;
use hubdesk_messenger::GraphClient;
use hubdesk_realtime::RealtimeHub;
use hubdesk_storage::Database;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;
use crate::webhook;
use crate::ws;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The conversation threading engine.
    pub engine: Arc<ThreadingEngine>,
    /// Database handle for the read paths.
    pub db: Database,
    /// Graph API client, used by the page-connect subscription call.
    pub graph: Arc<GraphClient>,
    /// Live-session registry.
    pub hub: Arc<RealtimeHub>,
    /// Authentication configuration.
    pub auth: AuthConfig,
    /// Expected webhook verification token.
    pub webhook_verify_token: Option<String>,
}

/// Gateway server configuration (mirrors `GatewayConfig` from
/// `hubdesk-config` to avoid a config-crate dependency here).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

/// Assemble the gateway router.
///
/// - Public: `GET /health`, webhook verification and receipt, `/ws`
///   (token-authenticated during handshake, not via middleware).
/// - Authenticated: the `/api` surface behind the bearer-token middleware.
pub fn build_router(state: GatewayState) -> Router {
    let auth_state = state.auth.clone();

    let public_routes = Router::new()
        .route("/health", get(handlers::get_public_health))
        .route(
            "/webhook",
            get(webhook::verify_webhook).post(webhook::receive_webhook),
        )
        .with_state(state.clone());

    let api_routes = Router::new()
        .route("/api/pages", get(handlers::list_pages))
        .route("/api/pages/connect", post(handlers::connect_page))
        .route("/api/pages/{page_id}", delete(handlers::disconnect_page))
        .route(
            "/api/pages/{page_id}/conversations",
            get(handlers::list_conversations),
        )
        .route(
            "/api/conversations/{conversation_id}/messages",
            get(handlers::conversation_messages).post(handlers::send_message),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
        .with_state(state.clone());

    let ws_routes = Router::new()
        .route("/ws", get(ws::ws_handler))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .merge(ws_routes)
        .layer(CorsLayer::permissive())
}

/// Start the gateway HTTP/WebSocket server and serve until cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), HubdeskError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| HubdeskError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .map_err(|e| HubdeskError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use hubdesk_config::model::StorageConfig;
    use hubdesk_core::types::{PageLink, PageStatus};
    use hubdesk_storage::queries::{conversations, messages, pages};
    use tower::ServiceExt;

    const SECRET: &str = "0123456789abcdef0123";

    async fn test_state() -> (GatewayState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir.path().join("test.db").to_str().unwrap().to_string(),
            wal_mode: true,
        };
        let db = Database::open(&config).await.unwrap();
        // Points at a closed port: profile lookups fall back, dispatch fails.
        let graph = Arc::new(GraphClient::with_base_url("http://127.0.0.1:9").unwrap());
        let hub = Arc::new(RealtimeHub::new());
        let engine = Arc::new(ThreadingEngine::new(
            db.clone(),
            graph.clone(),
            graph.clone(),
            hub.clone(),
        ));
        let state = GatewayState {
            engine,
            db,
            graph,
            hub,
            auth: AuthConfig {
                secret: Some(SECRET.to_string()),
            },
            webhook_verify_token: Some("verify-me".to_string()),
        };
        (state, dir)
    }

    fn token(state: &GatewayState, account_id: &str) -> String {
        state.auth.mint(account_id).unwrap()
    }

    async fn seed_page(state: &GatewayState, page_id: &str, owner: &str) {
        pages::insert_page_link(
            &state.db,
            &PageLink {
                id: format!("link-{page_id}"),
                owner_account_id: owner.to_string(),
                page_id: page_id.to_string(),
                page_name: "Acme Support".to_string(),
                access_token: "tok".to_string(),
                status: PageStatus::Connected,
                created_at: 0,
            },
        )
        .await
        .unwrap();
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_is_public_and_ok() {
        let (state, _dir) = test_state().await;
        let app = build_router(state);
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("\"status\":\"ok\""));
    }

    #[tokio::test]
    async fn webhook_verification_echoes_challenge() {
        let (state, _dir) = test_state().await;
        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=verify-me&hub.challenge=1234")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "1234");
    }

    #[tokio::test]
    async fn webhook_verification_rejects_wrong_token() {
        let (state, _dir) = test_state().await;
        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/webhook?hub.mode=subscribe&hub.verify_token=wrong&hub.challenge=1234")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn webhook_post_acknowledges_even_garbage() {
        let (state, _dir) = test_state().await;
        let app = build_router(state);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .body(Body::from("this is not json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "EVENT_RECEIVED");
    }

    #[tokio::test]
    async fn webhook_delivery_is_threaded_in_the_background() {
        let (state, _dir) = test_state().await;
        seed_page(&state, "page-1", "acct-a").await;
        let db = state.db.clone();
        let app = build_router(state);

        let payload = serde_json::json!({
            "object": "page",
            "entry": [{
                "id": "page-1",
                "time": 1_700_000_000_000_i64,
                "messaging": [{
                    "sender": {"id": "cust-1"},
                    "timestamp": 1_700_000_000_000_i64,
                    "message": {"mid": "m1", "text": "hi"}
                }]
            }]
        });
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/webhook")
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // The ack returns before processing; poll for the background result.
        let mut threads = Vec::new();
        for _ in 0..100 {
            threads = conversations::list_for_page(&db, "page-1").await.unwrap();
            if !threads.is_empty() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        }
        assert_eq!(threads.len(), 1);
        // Resolver fallback: the mock Graph endpoint is unreachable.
        assert_eq!(threads[0].customer_name, "Facebook User");
        let msgs = messages::list_for_conversation(&db, &threads[0].id)
            .await
            .unwrap();
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].message_id, "m1");
    }

    #[tokio::test]
    async fn api_requires_a_valid_token() {
        let (state, _dir) = test_state().await;
        let app = build_router(state.clone());

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/pages")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/pages")
                    .header("authorization", "Bearer acct-1.deadbeef")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn list_pages_returns_owned_connected_pages() {
        let (state, _dir) = test_state().await;
        seed_page(&state, "page-1", "acct-a").await;
        seed_page(&state, "page-2", "acct-b").await;
        let bearer = format!("Bearer {}", token(&state, "acct-a"));
        let app = build_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/pages")
                    .header("authorization", bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("page-1"));
        assert!(!body.contains("page-2"));
        assert!(!body.contains("\"tok\""), "token must never leak");
    }

    #[tokio::test]
    async fn conversations_of_foreign_pages_are_not_found() {
        let (state, _dir) = test_state().await;
        seed_page(&state, "page-1", "acct-a").await;
        let bearer = format!("Bearer {}", token(&state, "acct-b"));
        let app = build_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/pages/page-1/conversations")
                    .header("authorization", bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn fetching_messages_marks_them_read() {
        let (state, _dir) = test_state().await;
        seed_page(&state, "page-1", "acct-a").await;
        state
            .engine
            .ingest(hubdesk_core::types::InboundEvent {
                page_id: "page-1".to_string(),
                customer_id: "cust-1".to_string(),
                message_id: "m1".to_string(),
                text: "hi".to_string(),
                occurred_at: 100,
            })
            .await
            .unwrap();
        let conv = conversations::list_for_page(&state.db, "page-1")
            .await
            .unwrap()
            .remove(0);
        let bearer = format!("Bearer {}", token(&state, "acct-a"));
        let db = state.db.clone();
        let app = build_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/conversations/{}/messages", conv.id))
                    .header("authorization", bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"m1\""));

        let msgs = messages::list_for_conversation(&db, &conv.id).await.unwrap();
        assert!(msgs.iter().all(|m| m.read));
    }

    #[tokio::test]
    async fn send_message_from_non_owner_is_forbidden() {
        let (state, _dir) = test_state().await;
        seed_page(&state, "page-1", "acct-a").await;
        state
            .engine
            .ingest(hubdesk_core::types::InboundEvent {
                page_id: "page-1".to_string(),
                customer_id: "cust-1".to_string(),
                message_id: "m1".to_string(),
                text: "hi".to_string(),
                occurred_at: 100,
            })
            .await
            .unwrap();
        let conv = conversations::list_for_page(&state.db, "page-1")
            .await
            .unwrap()
            .remove(0);
        let bearer = format!("Bearer {}", token(&state, "acct-intruder"));
        let app = build_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/conversations/{}/messages", conv.id))
                    .header("authorization", bearer)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"content": "hello"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn connect_then_disconnect_page_round_trip() {
        let (state, _dir) = test_state().await;
        let bearer = format!("Bearer {}", token(&state, "acct-a"));
        let db = state.db.clone();
        let app = build_router(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/pages/connect")
                    .header("authorization", bearer.clone())
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"page_id": "page-9", "page_name": "New Page", "access_token": "tok-9"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        // Created even though the webhook subscription endpoint is down.
        assert_eq!(response.status(), StatusCode::CREATED);
        let link = pages::get_connected(&db, "page-9").await.unwrap().unwrap();
        assert_eq!(link.owner_account_id, "acct-a");

        // Reconnecting while connected is rejected.
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/pages/connect")
                    .header("authorization", bearer.clone())
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"page_id": "page-9", "page_name": "New Page", "access_token": "tok-9"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/api/pages/page-9")
                    .header("authorization", bearer)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(pages::get_connected(&db, "page-9").await.unwrap().is_none());
    }
}

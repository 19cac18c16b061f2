// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Responses carry a `success` flag plus payload or a human-readable
//! message. Internal errors are logged server-side and surface as a generic
//! message.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use hubdesk_core::types::{Conversation, Message, PageLink, PageStatus};
use hubdesk_core::HubdeskError;
use hubdesk_storage::queries::{conversations, messages, pages};

use crate::auth::AuthedAccount;
use crate::server::GatewayState;

/// Public view of a page link. The access token never leaves the server.
#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub id: String,
    pub page_id: String,
    pub page_name: String,
    pub status: PageStatus,
}

impl From<&PageLink> for PageSummary {
    fn from(link: &PageLink) -> Self {
        Self {
            id: link.id.clone(),
            page_id: link.page_id.clone(),
            page_name: link.page_name.clone(),
            status: link.status,
        }
    }
}

/// Request body for POST /api/pages/connect.
#[derive(Debug, Deserialize)]
pub struct ConnectPageRequest {
    pub page_id: String,
    pub page_name: String,
    pub access_token: String,
}

/// Request body for POST /api/conversations/{id}/messages.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct PagesResponse {
    pub success: bool,
    pub pages: Vec<PageSummary>,
}

#[derive(Debug, Serialize)]
pub struct ConnectPageResponse {
    pub success: bool,
    pub message: String,
    pub page: PageSummary,
}

#[derive(Debug, Serialize)]
pub struct ConversationsResponse {
    pub success: bool,
    pub conversations: Vec<Conversation>,
}

#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    pub success: bool,
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub message: String,
    pub data: Message,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorBody {
            success: false,
            message: message.into(),
        }),
    )
        .into_response()
}

/// Map an engine/storage error onto a REST response without leaking
/// internals.
fn error_response(err: HubdeskError) -> Response {
    match &err {
        HubdeskError::InvalidInput(msg) => error_body(StatusCode::BAD_REQUEST, msg.clone()),
        HubdeskError::Unauthorized => error_body(
            StatusCode::FORBIDDEN,
            "Unauthorized access to this conversation",
        ),
        HubdeskError::NotFound { entity, .. } => {
            error_body(StatusCode::NOT_FOUND, format!("{entity} not found"))
        }
        HubdeskError::DeliveryFailed { .. } => {
            warn!(error = %err, "outbound delivery failed");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while sending the message",
            )
        }
        _ => {
            error!(error = %err, "request failed");
            error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred",
            )
        }
    }
}

/// GET /health
///
/// Unauthenticated liveness probe; degrades when the database stops
/// answering.
pub async fn get_public_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let status = match state.db.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            error!(error = %e, "health check failed");
            "degraded"
        }
    };
    Json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/pages
///
/// Connected pages for the authenticated account.
pub async fn list_pages(
    State(state): State<GatewayState>,
    Extension(AuthedAccount(account_id)): Extension<AuthedAccount>,
) -> Response {
    match pages::list_connected_for_account(&state.db, &account_id).await {
        Ok(links) => Json(PagesResponse {
            success: true,
            pages: links.iter().map(PageSummary::from).collect(),
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// POST /api/pages/connect
///
/// Connect a new page or reconnect a previously disconnected one (rotating
/// its access token). The webhook subscription call is best-effort: the
/// link is kept even when the Graph API call fails, and the failure is
/// logged for the operator.
pub async fn connect_page(
    State(state): State<GatewayState>,
    Extension(AuthedAccount(account_id)): Extension<AuthedAccount>,
    Json(body): Json<ConnectPageRequest>,
) -> Response {
    if body.page_id.trim().is_empty()
        || body.page_name.trim().is_empty()
        || body.access_token.trim().is_empty()
    {
        return error_body(
            StatusCode::BAD_REQUEST,
            "page_id, page_name and access_token are required",
        );
    }

    let existing = match pages::get_by_page_id(&state.db, &body.page_id).await {
        Ok(existing) => existing,
        Err(e) => return error_response(e),
    };

    match existing {
        Some(link) if link.owner_account_id != account_id => {
            error_body(StatusCode::BAD_REQUEST, "This page is already connected")
        }
        Some(link) if link.status == PageStatus::Connected => {
            error_body(StatusCode::BAD_REQUEST, "This page is already connected")
        }
        Some(link) => {
            if let Err(e) = pages::reconnect(&state.db, &body.page_id, &body.access_token).await {
                return error_response(e);
            }
            subscribe_best_effort(&state, &body.page_id, &body.access_token).await;
            info!(page_id = %body.page_id, "page reconnected");
            let mut summary = PageSummary::from(&link);
            summary.status = PageStatus::Connected;
            (
                StatusCode::OK,
                Json(ConnectPageResponse {
                    success: true,
                    message: "Page reconnected successfully".to_string(),
                    page: summary,
                }),
            )
                .into_response()
        }
        None => {
            let link = PageLink {
                id: uuid::Uuid::new_v4().to_string(),
                owner_account_id: account_id,
                page_id: body.page_id.clone(),
                page_name: body.page_name.clone(),
                access_token: body.access_token.clone(),
                status: PageStatus::Connected,
                created_at: chrono::Utc::now().timestamp_millis(),
            };
            if let Err(e) = pages::insert_page_link(&state.db, &link).await {
                return error_response(e);
            }
            subscribe_best_effort(&state, &body.page_id, &body.access_token).await;
            info!(page_id = %body.page_id, "page connected");
            (
                StatusCode::CREATED,
                Json(ConnectPageResponse {
                    success: true,
                    message: "Page connected successfully".to_string(),
                    page: PageSummary::from(&link),
                }),
            )
                .into_response()
        }
    }
}

async fn subscribe_best_effort(state: &GatewayState, page_id: &str, access_token: &str) {
    if let Err(e) = state.graph.subscribe_page(page_id, access_token).await {
        warn!(error = %e, page_id, "webhook subscription failed; connect anyway");
    }
}

/// DELETE /api/pages/{page_id}
///
/// Disconnect a page. The link is retained so history stays reachable and a
/// later reconnect can rotate the credential.
pub async fn disconnect_page(
    State(state): State<GatewayState>,
    Extension(AuthedAccount(account_id)): Extension<AuthedAccount>,
    Path(page_id): Path<String>,
) -> Response {
    let link = match pages::get_by_page_id(&state.db, &page_id).await {
        Ok(link) => link,
        Err(e) => return error_response(e),
    };

    match link {
        Some(link) if link.owner_account_id == account_id => {
            if let Err(e) = pages::set_status(&state.db, &page_id, PageStatus::Disconnected).await {
                return error_response(e);
            }
            info!(page_id, "page disconnected");
            Json(StatusResponse {
                success: true,
                message: "Page disconnected successfully".to_string(),
            })
            .into_response()
        }
        _ => error_body(StatusCode::NOT_FOUND, "Page not found"),
    }
}

/// GET /api/pages/{page_id}/conversations
///
/// Conversations for a page, newest activity first. The page must be
/// connected and owned by the caller.
pub async fn list_conversations(
    State(state): State<GatewayState>,
    Extension(AuthedAccount(account_id)): Extension<AuthedAccount>,
    Path(page_id): Path<String>,
) -> Response {
    match pages::get_connected(&state.db, &page_id).await {
        Ok(Some(link)) if link.owner_account_id == account_id => {}
        Ok(_) => return error_body(StatusCode::NOT_FOUND, "Page not found or not connected"),
        Err(e) => return error_response(e),
    }

    match conversations::list_for_page(&state.db, &page_id).await {
        Ok(list) => Json(ConversationsResponse {
            success: true,
            conversations: list,
        })
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/conversations/{conversation_id}/messages
///
/// A conversation with its messages in chronological order. Fetching marks
/// the unread inbound messages read; the returned rows show their state as
/// fetched.
pub async fn conversation_messages(
    State(state): State<GatewayState>,
    Extension(AuthedAccount(account_id)): Extension<AuthedAccount>,
    Path(conversation_id): Path<String>,
) -> Response {
    let conversation = match conversations::get(&state.db, &conversation_id).await {
        Ok(Some(conversation)) => conversation,
        Ok(None) => return error_body(StatusCode::NOT_FOUND, "Conversation not found"),
        Err(e) => return error_response(e),
    };

    match pages::get_connected(&state.db, &conversation.page_id).await {
        Ok(Some(link)) if link.owner_account_id == account_id => {}
        Ok(_) => {
            return error_body(
                StatusCode::FORBIDDEN,
                "Unauthorized access to this conversation",
            )
        }
        Err(e) => return error_response(e),
    }

    let message_list = match messages::list_for_conversation(&state.db, &conversation_id).await {
        Ok(list) => list,
        Err(e) => return error_response(e),
    };

    if let Err(e) = messages::mark_read(&state.db, &conversation_id).await {
        return error_response(e);
    }

    Json(MessagesResponse {
        success: true,
        conversation,
        messages: message_list,
    })
    .into_response()
}

/// POST /api/conversations/{conversation_id}/messages
///
/// Send an agent reply through the threading engine.
pub async fn send_message(
    State(state): State<GatewayState>,
    Extension(AuthedAccount(account_id)): Extension<AuthedAccount>,
    Path(conversation_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Response {
    match state
        .engine
        .send_reply(&conversation_id, &account_id, &body.content)
        .await
    {
        Ok(message) => (
            StatusCode::CREATED,
            Json(SendMessageResponse {
                success: true,
                message: "Message sent successfully".to_string(),
                data: message,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

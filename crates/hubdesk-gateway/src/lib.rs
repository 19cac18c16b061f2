// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP/WebSocket gateway for the Hubdesk helpdesk service.
//!
//! Three surfaces share one axum server:
//! - the webhook ingress (public; acknowledges first, threads in the
//!   background),
//! - the authenticated REST API for agent clients,
//! - the WebSocket endpoint live sessions attach to for realtime pushes.

pub mod auth;
pub mod handlers;
pub mod server;
pub mod webhook;
pub mod ws;

pub use auth::AuthConfig;
pub use server::{build_router, start_server, GatewayState, ServerConfig};

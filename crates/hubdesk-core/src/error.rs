// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Hubdesk helpdesk service.

use thiserror::Error;

/// The primary error type used across all Hubdesk crates.
#[derive(Debug, Error)]
pub enum HubdeskError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Gateway transport errors (bind failure, server error, socket failure).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Messaging-provider API errors (profile lookup, webhook subscription).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Inbound event arrived for a page that is unknown or disconnected.
    /// The event is dropped: without a credential there is nothing to act on.
    #[error("page {page_id} is not connected")]
    PageNotConnected { page_id: String },

    /// The acting account does not own the page behind this conversation.
    #[error("not authorized to access this conversation")]
    Unauthorized,

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Outbound dispatch to the messaging provider failed. Nothing was
    /// persisted; the caller may retry.
    #[error("delivery failed: {message}")]
    DeliveryFailed {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Rejected before dispatch (empty or malformed input).
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

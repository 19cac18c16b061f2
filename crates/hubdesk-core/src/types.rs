// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Hubdesk crates.
//!
//! Timestamps are epoch milliseconds throughout, matching the Messenger
//! webhook wire format.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Connection state of a [`PageLink`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Connected,
    Disconnected,
}

/// Lifecycle state of a [`Conversation`]. Conversations are never deleted,
/// only closed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConversationStatus {
    Open,
    Closed,
}

/// Direction of a [`Message`] relative to the helpdesk.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Inbound,
    Outbound,
}

/// A Facebook Page linked to an agent account.
///
/// One external page maps to exactly one owner account at a time (the store
/// enforces uniqueness on `page_id`). The access token rotates on reconnect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLink {
    pub id: String,
    pub owner_account_id: String,
    pub page_id: String,
    pub page_name: String,
    /// Page access token. Never exposed through the REST surface.
    pub access_token: String,
    pub status: PageStatus,
    pub created_at: i64,
}

/// A windowed session of messages between one page and one customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub page_id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_picture: Option<String>,
    /// Epoch ms of the newest message. Advances monotonically.
    pub last_message_at: i64,
    pub status: ConversationStatus,
    pub created_at: i64,
}

/// A single message within a conversation. Append-only; only the read flag
/// mutates after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    /// Provider-assigned message id (`mid`). Globally unique; the
    /// idempotency key for webhook redelivery.
    pub message_id: String,
    pub direction: MessageDirection,
    pub sender_id: String,
    pub content: String,
    pub occurred_at: i64,
    pub read: bool,
}

/// A normalized inbound webhook event, ready for the threading engine.
/// Echo events are filtered out before this type is constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEvent {
    pub page_id: String,
    pub customer_id: String,
    pub message_id: String,
    pub text: String,
    pub occurred_at: i64,
}

/// Display name and avatar for an external customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerProfile {
    pub name: String,
    pub picture: Option<String>,
}

impl CustomerProfile {
    /// Placeholder profile used when the provider lookup fails. Ingestion
    /// never blocks on profile resolution.
    pub fn fallback() -> Self {
        Self {
            name: "Facebook User".to_string(),
            picture: None,
        }
    }
}

/// The result of threading one inbound message: the conversation it landed
/// in and the persisted message. This is also the realtime fanout payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageUpdate {
    pub conversation: Conversation,
    pub message: Message,
}

/// Outcome of an idempotent write: whether the row was created by this call
/// or already existed. Duplicate webhook redelivery yields `Existing`, which
/// is not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert<T> {
    Created(T),
    Existing(T),
}

impl<T> Upsert<T> {
    /// Unwraps the value regardless of outcome.
    pub fn into_inner(self) -> T {
        match self {
            Self::Created(v) | Self::Existing(v) => v,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

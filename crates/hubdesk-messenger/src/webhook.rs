// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messenger webhook payload wire types and normalization.
//!
//! A single webhook delivery may carry several entries, each with several
//! messaging events. Normalization flattens the payload into independent
//! [`InboundEvent`]s and filters out everything the threading engine must
//! never see: non-page objects, non-message events, and echoes of our own
//! outbound sends.

use serde::Deserialize;
use tracing::{debug, warn};

use hubdesk_core::types::InboundEvent;

/// Top-level webhook payload.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    /// Subscription object type; only `"page"` payloads are processed.
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

/// One entry within a delivery, scoped to a single page.
#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    /// The page id the events belong to.
    pub id: String,
    /// Entry timestamp (epoch ms). Fallback when an event carries none.
    #[serde(default)]
    pub time: Option<i64>,
    #[serde(default)]
    pub messaging: Vec<MessagingEvent>,
}

/// A single messaging event. Non-message events (delivery receipts, read
/// receipts, postbacks) deserialize with `message: None` and are skipped.
#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
    pub sender: Participant,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub message: Option<EventMessage>,
}

#[derive(Debug, Deserialize)]
pub struct Participant {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct EventMessage {
    /// Provider-assigned message id.
    pub mid: String,
    /// Message text. Absent for attachment-only messages; normalized to an
    /// empty string, which ingestion allows.
    #[serde(default)]
    pub text: Option<String>,
    /// Set on events echoing the page's own outbound sends.
    #[serde(default)]
    pub is_echo: bool,
}

/// Flatten a webhook payload into normalized inbound events.
pub fn normalize(payload: WebhookPayload) -> Vec<InboundEvent> {
    if payload.object != "page" {
        debug!(object = %payload.object, "ignoring non-page webhook payload");
        return Vec::new();
    }

    let mut events = Vec::new();
    for entry in payload.entry {
        for event in entry.messaging {
            let Some(message) = event.message else {
                debug!(page_id = %entry.id, "skipping non-message webhook event");
                continue;
            };
            if message.is_echo {
                debug!(page_id = %entry.id, mid = %message.mid, "skipping echo event");
                continue;
            }
            let Some(occurred_at) = event.timestamp.or(entry.time) else {
                warn!(
                    page_id = %entry.id,
                    mid = %message.mid,
                    "skipping event with no usable timestamp"
                );
                continue;
            };
            events.push(InboundEvent {
                page_id: entry.id.clone(),
                customer_id: event.sender.id,
                message_id: message.mid,
                text: message.text.unwrap_or_default(),
                occurred_at,
            });
        }
    }
    events
}

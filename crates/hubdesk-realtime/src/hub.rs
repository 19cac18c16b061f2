// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Live-session registry and fanout.
//!
//! Each connected agent session registers an mpsc sender under its account
//! id; publishing serializes the update once and pushes it to every live
//! session of that account. Delivery is fire-and-forget: a slow or
//! disconnected session misses the push and catches up through the REST read
//! path, which stays the source of truth.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use hubdesk_core::traits::UpdatePublisher;
use hubdesk_core::types::MessageUpdate;

/// Frames buffered per session before pushes start dropping.
const SESSION_BUFFER: usize = 64;

/// Per-account registry of live agent sessions.
#[derive(Default)]
pub struct RealtimeHub {
    sessions: DashMap<String, DashMap<String, mpsc::Sender<String>>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a live session for an account.
    ///
    /// Returns the session id (for later [`unsubscribe`]) and the receiving
    /// end the session forwards frames from.
    ///
    /// [`unsubscribe`]: RealtimeHub::unsubscribe
    pub fn subscribe(&self, account_id: &str) -> (String, mpsc::Receiver<String>) {
        let session_id = uuid::Uuid::new_v4().to_string();
        let (tx, rx) = mpsc::channel(SESSION_BUFFER);
        self.sessions
            .entry(account_id.to_string())
            .or_default()
            .insert(session_id.clone(), tx);
        debug!(account_id, session_id, "live session registered");
        (session_id, rx)
    }

    /// Remove a session from the registry.
    pub fn unsubscribe(&self, account_id: &str, session_id: &str) {
        if let Some(sessions) = self.sessions.get(account_id) {
            sessions.remove(session_id);
        }
        self.sessions
            .remove_if(account_id, |_, sessions| sessions.is_empty());
        debug!(account_id, session_id, "live session removed");
    }

    /// Number of live sessions for an account.
    pub fn session_count(&self, account_id: &str) -> usize {
        self.sessions
            .get(account_id)
            .map(|sessions| sessions.len())
            .unwrap_or(0)
    }
}

impl UpdatePublisher for RealtimeHub {
    fn publish(&self, account_id: &str, update: &MessageUpdate) {
        let Some(sessions) = self.sessions.get(account_id) else {
            debug!(account_id, "no live sessions, skipping push");
            return;
        };

        let frame = serde_json::json!({
            "type": "new_message",
            "conversation": update.conversation,
            "message": update.message,
        })
        .to_string();

        for session in sessions.iter() {
            // Non-blocking, at-most-once: a full buffer or closed session
            // drops the push rather than stalling ingestion.
            if let Err(e) = session.value().try_send(frame.clone()) {
                debug!(session_id = %session.key(), "dropping realtime push: {e}");
            }
        }
    }
}

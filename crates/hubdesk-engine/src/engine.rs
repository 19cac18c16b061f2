// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The conversation threading engine.
//!
//! Takes normalized inbound webhook events, resolves or opens the right
//! conversation thread under the 24-hour session windowing rule, persists
//! the message idempotently, and hands the result to the realtime publisher.
//! The outbound path (`send_reply`) shares the same persistence and
//! authorization invariants.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use hubdesk_core::traits::{OutboundDispatcher, ProfileResolver, UpdatePublisher};
use hubdesk_core::types::{
    InboundEvent, Message, MessageDirection, MessageUpdate, Upsert,
};
use hubdesk_core::HubdeskError;
use hubdesk_storage::queries::{conversations, messages, pages};
use hubdesk_storage::Database;

/// Gap after which a new conversation thread opens for a (page, customer)
/// pair. Strictly greater-than: a message landing at exactly the window
/// boundary still reuses the thread.
pub const SESSION_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

/// Threading engine with its collaborators injected at construction.
pub struct ThreadingEngine {
    db: Database,
    resolver: Arc<dyn ProfileResolver>,
    dispatcher: Arc<dyn OutboundDispatcher>,
    publisher: Arc<dyn UpdatePublisher>,
}

impl ThreadingEngine {
    pub fn new(
        db: Database,
        resolver: Arc<dyn ProfileResolver>,
        dispatcher: Arc<dyn OutboundDispatcher>,
        publisher: Arc<dyn UpdatePublisher>,
    ) -> Self {
        Self {
            db,
            resolver,
            dispatcher,
            publisher,
        }
    }

    /// Thread one inbound event into a conversation and persist it.
    ///
    /// Returns the conversation and the persisted message. Redelivered
    /// events (same provider message id) are a no-op: the existing message
    /// comes back, nothing is re-persisted, and no push goes out.
    pub async fn ingest(&self, event: InboundEvent) -> Result<MessageUpdate, HubdeskError> {
        // No connected link means no credential to act on: drop, don't retry.
        let link = pages::get_connected(&self.db, &event.page_id)
            .await?
            .ok_or_else(|| HubdeskError::PageNotConnected {
                page_id: event.page_id.clone(),
            })?;

        // Infallible by contract: failures inside the resolver fall back to
        // a placeholder so ingestion never blocks on the lookup.
        let profile = self
            .resolver
            .resolve(&event.customer_id, &link.access_token)
            .await;

        let mut conversation = conversations::find_or_create(
            &self.db,
            &event.page_id,
            &event.customer_id,
            &profile,
            event.occurred_at,
            SESSION_WINDOW_MS,
        )
        .await?;

        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation.id.clone(),
            message_id: event.message_id.clone(),
            direction: MessageDirection::Inbound,
            sender_id: event.customer_id.clone(),
            content: event.text.clone(),
            occurred_at: event.occurred_at,
            read: false,
        };

        match messages::append_idempotent(&self.db, &message).await? {
            Upsert::Existing(existing) => {
                debug!(
                    mid = %event.message_id,
                    conversation_id = %existing.conversation_id,
                    "duplicate delivery, reusing stored message"
                );
                // The stored message may live in an older thread than the
                // one the windowing rule resolved to; report its own.
                if existing.conversation_id != conversation.id {
                    if let Some(owning) =
                        conversations::get(&self.db, &existing.conversation_id).await?
                    {
                        conversation = owning;
                    }
                }
                Ok(MessageUpdate {
                    conversation,
                    message: existing,
                })
            }
            Upsert::Created(created) => {
                conversations::advance_last_message(&self.db, &conversation.id, event.occurred_at)
                    .await?;
                if event.occurred_at > conversation.last_message_at {
                    conversation.last_message_at = event.occurred_at;
                }

                info!(
                    page_id = %event.page_id,
                    customer_id = %event.customer_id,
                    conversation_id = %conversation.id,
                    "inbound message threaded"
                );

                let update = MessageUpdate {
                    conversation,
                    message: created,
                };
                self.publisher.publish(&link.owner_account_id, &update);
                Ok(update)
            }
        }
    }

    /// Process the events of one webhook delivery independently.
    ///
    /// A failing event is logged and never aborts its siblings; partial
    /// success is acceptable because redelivery is idempotent.
    pub async fn ingest_batch(&self, events: Vec<InboundEvent>) {
        for event in events {
            let mid = event.message_id.clone();
            match self.ingest(event).await {
                Ok(_) => {}
                Err(HubdeskError::PageNotConnected { page_id }) => {
                    warn!(page_id, mid, "dropping event for unconnected page");
                }
                Err(e) => {
                    error!(error = %e, mid, "failed to process webhook event");
                }
            }
        }
    }

    /// Send an agent reply into a conversation.
    ///
    /// Verifies the acting account owns the conversation's page, dispatches
    /// through the provider, and persists the outbound message only after
    /// the provider accepted it. No partial state on failure.
    pub async fn send_reply(
        &self,
        conversation_id: &str,
        account_id: &str,
        content: &str,
    ) -> Result<Message, HubdeskError> {
        let conversation = conversations::get(&self.db, conversation_id)
            .await?
            .ok_or_else(|| HubdeskError::NotFound {
                entity: "conversation",
                id: conversation_id.to_string(),
            })?;

        let link = pages::get_connected(&self.db, &conversation.page_id)
            .await?
            .ok_or(HubdeskError::Unauthorized)?;
        if link.owner_account_id != account_id {
            return Err(HubdeskError::Unauthorized);
        }

        if content.trim().is_empty() {
            return Err(HubdeskError::InvalidInput(
                "reply content cannot be empty".to_string(),
            ));
        }

        let provider_mid = self
            .dispatcher
            .dispatch(
                &conversation.page_id,
                &link.access_token,
                &conversation.customer_id,
                content,
            )
            .await?;

        let now = chrono::Utc::now().timestamp_millis();
        let message = Message {
            id: uuid::Uuid::new_v4().to_string(),
            conversation_id: conversation.id.clone(),
            message_id: provider_mid,
            direction: MessageDirection::Outbound,
            sender_id: account_id.to_string(),
            content: content.to_string(),
            occurred_at: now,
            read: true,
        };

        let stored = messages::append_idempotent(&self.db, &message)
            .await?
            .into_inner();
        conversations::advance_last_message(&self.db, &conversation.id, now).await?;

        info!(
            conversation_id = %conversation.id,
            account_id,
            "reply delivered and persisted"
        );
        Ok(stored)
    }
}

// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation CRUD operations, including the session-windowing
//! find-or-create.

use hubdesk_core::types::CustomerProfile;
use hubdesk_core::HubdeskError;
use rusqlite::{params, OptionalExtension};

use crate::database::Database;
use crate::models::{Conversation, ConversationStatus};

fn row_to_conversation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Conversation> {
    let status: String = row.get(6)?;
    Ok(Conversation {
        id: row.get(0)?,
        page_id: row.get(1)?,
        customer_id: row.get(2)?,
        customer_name: row.get(3)?,
        customer_picture: row.get(4)?,
        last_message_at: row.get(5)?,
        status: status.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?,
        created_at: row.get(7)?,
    })
}

const CONVERSATION_COLUMNS: &str =
    "id, page_id, customer_id, customer_name, customer_picture, last_message_at, status, created_at";

/// Resolve or open the conversation for a (page, customer) pair using the
/// session windowing rule.
///
/// The newest thread for the pair is reused while the gap between the event
/// and its `last_message_at` is at most `window_ms`; a strictly greater gap
/// (or no thread at all) opens a new one. The boundary is exclusive: an
/// event landing at exactly `window_ms` reuses the thread. Older threads are
/// left untouched.
///
/// The read-check-write runs as one transaction on the single writer thread,
/// so two concurrent events for the same pair cannot both open a thread.
pub async fn find_or_create(
    db: &Database,
    page_id: &str,
    customer_id: &str,
    profile: &CustomerProfile,
    occurred_at: i64,
    window_ms: i64,
) -> Result<Conversation, HubdeskError> {
    let page_id = page_id.to_string();
    let customer_id = customer_id.to_string();
    let profile = profile.clone();
    // Candidate identity for the new-thread branch; unused when reusing.
    let candidate_id = uuid::Uuid::new_v4().to_string();

    db.connection()
        .call(move |conn| -> Result<Conversation, rusqlite::Error> {
            let tx = conn.transaction()?;

            let existing = {
                let mut stmt = tx.prepare(&format!(
                    "SELECT {CONVERSATION_COLUMNS} FROM conversations
                     WHERE page_id = ?1 AND customer_id = ?2
                     ORDER BY last_message_at DESC LIMIT 1"
                ))?;
                stmt.query_row(params![page_id, customer_id], row_to_conversation)
                    .optional()?
            };

            let conversation = match existing {
                Some(conv) if occurred_at - conv.last_message_at <= window_ms => conv,
                _ => {
                    let conv = Conversation {
                        id: candidate_id,
                        page_id,
                        customer_id,
                        customer_name: profile.name,
                        customer_picture: profile.picture,
                        last_message_at: occurred_at,
                        status: ConversationStatus::Open,
                        created_at: occurred_at,
                    };
                    tx.execute(
                        "INSERT INTO conversations
                         (id, page_id, customer_id, customer_name, customer_picture, last_message_at, status, created_at)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                        params![
                            conv.id,
                            conv.page_id,
                            conv.customer_id,
                            conv.customer_name,
                            conv.customer_picture,
                            conv.last_message_at,
                            conv.status.to_string(),
                            conv.created_at,
                        ],
                    )?;
                    conv
                }
            };

            tx.commit()?;
            Ok(conversation)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a conversation by id.
pub async fn get(db: &Database, id: &str) -> Result<Option<Conversation>, HubdeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<Option<Conversation>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = ?1"
            ))?;
            let result = stmt.query_row(params![id], row_to_conversation);
            match result {
                Ok(conv) => Ok(Some(conv)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all conversations for a page, newest activity first.
pub async fn list_for_page(
    db: &Database,
    page_id: &str,
) -> Result<Vec<Conversation>, HubdeskError> {
    let page_id = page_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Conversation>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {CONVERSATION_COLUMNS} FROM conversations
                 WHERE page_id = ?1 ORDER BY last_message_at DESC"
            ))?;
            let rows = stmt.query_map(params![page_id], row_to_conversation)?;
            let mut conversations = Vec::new();
            for row in rows {
                conversations.push(row?);
            }
            Ok(conversations)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Advance a conversation's `last_message_at` to `occurred_at`.
///
/// Monotonic: an older timestamp (out-of-order delivery) leaves the stored
/// value unchanged.
pub async fn advance_last_message(
    db: &Database,
    id: &str,
    occurred_at: i64,
) -> Result<(), HubdeskError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE conversations SET last_message_at = ?1
                 WHERE id = ?2 AND last_message_at < ?1",
                params![occurred_at, id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

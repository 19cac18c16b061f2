// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message CRUD operations with idempotent append.

use hubdesk_core::types::Upsert;
use hubdesk_core::HubdeskError;
use rusqlite::params;

use crate::database::Database;
use crate::models::Message;

fn row_to_message(row: &rusqlite::Row<'_>) -> rusqlite::Result<Message> {
    let direction: String = row.get(3)?;
    Ok(Message {
        id: row.get(0)?,
        conversation_id: row.get(1)?,
        message_id: row.get(2)?,
        direction: direction.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?,
        sender_id: row.get(4)?,
        content: row.get(5)?,
        occurred_at: row.get(6)?,
        read: row.get(7)?,
    })
}

const MESSAGE_COLUMNS: &str =
    "id, conversation_id, message_id, direction, sender_id, content, occurred_at, read";

/// Append a message, idempotent on the provider-assigned `message_id`.
///
/// At-least-once webhook redelivery makes duplicate appends routine, so this
/// is modeled as an explicit upsert: `Created` when this call inserted the
/// row, `Existing` with the previously stored row when it was already there.
/// `Existing` is not an error.
pub async fn append_idempotent(
    db: &Database,
    msg: &Message,
) -> Result<Upsert<Message>, HubdeskError> {
    let msg = msg.clone();
    db.connection()
        .call(move |conn| -> Result<Upsert<Message>, rusqlite::Error> {
            let inserted = conn.execute(
                "INSERT INTO messages
                 (id, conversation_id, message_id, direction, sender_id, content, occurred_at, read)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                 ON CONFLICT(message_id) DO NOTHING",
                params![
                    msg.id,
                    msg.conversation_id,
                    msg.message_id,
                    msg.direction.to_string(),
                    msg.sender_id,
                    msg.content,
                    msg.occurred_at,
                    msg.read,
                ],
            )?;

            if inserted == 1 {
                Ok(Upsert::Created(msg))
            } else {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = ?1"
                ))?;
                let existing = stmt.query_row(params![msg.message_id], row_to_message)?;
                Ok(Upsert::Existing(existing))
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List a conversation's messages in chronological order.
///
/// Ordered by `occurred_at`, tie-broken by insertion order.
pub async fn list_for_conversation(
    db: &Database,
    conversation_id: &str,
) -> Result<Vec<Message>, HubdeskError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<Message>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE conversation_id = ?1
                 ORDER BY occurred_at ASC, rowid ASC"
            ))?;
            let rows = stmt.query_map(params![conversation_id], row_to_message)?;
            let mut messages = Vec::new();
            for row in rows {
                messages.push(row?);
            }
            Ok(messages)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Mark a conversation's unread inbound messages as read.
///
/// Returns the number of messages transitioned. Outbound messages are
/// persisted read and never transition.
pub async fn mark_read(db: &Database, conversation_id: &str) -> Result<usize, HubdeskError> {
    let conversation_id = conversation_id.to_string();
    db.connection()
        .call(move |conn| -> Result<usize, rusqlite::Error> {
            let updated = conn.execute(
                "UPDATE messages SET read = 1
                 WHERE conversation_id = ?1 AND read = 0 AND direction = 'inbound'",
                params![conversation_id],
            )?;
            Ok(updated)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

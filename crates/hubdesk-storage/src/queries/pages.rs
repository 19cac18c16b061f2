// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page link CRUD operations.

use hubdesk_core::HubdeskError;
use rusqlite::params;

use crate::database::Database;
use crate::models::{PageLink, PageStatus};

fn row_to_page_link(row: &rusqlite::Row<'_>) -> rusqlite::Result<PageLink> {
    let status: String = row.get(5)?;
    Ok(PageLink {
        id: row.get(0)?,
        owner_account_id: row.get(1)?,
        page_id: row.get(2)?,
        page_name: row.get(3)?,
        access_token: row.get(4)?,
        status: status.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?,
        created_at: row.get(6)?,
    })
}

const PAGE_LINK_COLUMNS: &str =
    "id, owner_account_id, page_id, page_name, access_token, status, created_at";

/// Create a new page link. Fails if the page is already linked (UNIQUE on
/// `page_id` — one page maps to exactly one owner account).
pub async fn insert_page_link(db: &Database, link: &PageLink) -> Result<(), HubdeskError> {
    let link = link.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO page_links (id, owner_account_id, page_id, page_name, access_token, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    link.id,
                    link.owner_account_id,
                    link.page_id,
                    link.page_name,
                    link.access_token,
                    link.status.to_string(),
                    link.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a page link by its external page id, regardless of status.
pub async fn get_by_page_id(
    db: &Database,
    page_id: &str,
) -> Result<Option<PageLink>, HubdeskError> {
    let page_id = page_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PAGE_LINK_COLUMNS} FROM page_links WHERE page_id = ?1"
            ))?;
            let result = stmt.query_row(params![page_id], row_to_page_link);
            match result {
                Ok(link) => Ok(Some(link)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get a page link by external page id, only if it is currently connected.
///
/// This is the sole authorization path from an inbound event to an agent
/// account: no connected link, no credential, no ingestion.
pub async fn get_connected(
    db: &Database,
    page_id: &str,
) -> Result<Option<PageLink>, HubdeskError> {
    let page_id = page_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PAGE_LINK_COLUMNS} FROM page_links
                 WHERE page_id = ?1 AND status = 'connected'"
            ))?;
            let result = stmt.query_row(params![page_id], row_to_page_link);
            match result {
                Ok(link) => Ok(Some(link)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// List all connected pages owned by an account.
pub async fn list_connected_for_account(
    db: &Database,
    account_id: &str,
) -> Result<Vec<PageLink>, HubdeskError> {
    let account_id = account_id.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<PageLink>, rusqlite::Error> {
            let mut stmt = conn.prepare(&format!(
                "SELECT {PAGE_LINK_COLUMNS} FROM page_links
                 WHERE owner_account_id = ?1 AND status = 'connected'
                 ORDER BY created_at DESC"
            ))?;
            let rows = stmt.query_map(params![account_id], row_to_page_link)?;
            let mut links = Vec::new();
            for row in rows {
                links.push(row?);
            }
            Ok(links)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Flip a page link's connection status.
pub async fn set_status(
    db: &Database,
    page_id: &str,
    status: PageStatus,
) -> Result<(), HubdeskError> {
    let page_id = page_id.to_string();
    let status = status.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE page_links SET status = ?1 WHERE page_id = ?2",
                params![status, page_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Reconnect a previously disconnected page, rotating its access token.
pub async fn reconnect(
    db: &Database,
    page_id: &str,
    access_token: &str,
) -> Result<(), HubdeskError> {
    let page_id = page_id.to_string();
    let access_token = access_token.to_string();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "UPDATE page_links SET status = 'connected', access_token = ?1
                 WHERE page_id = ?2",
                params![access_token, page_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

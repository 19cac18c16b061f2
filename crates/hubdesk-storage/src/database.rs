// SPDX-FileCopyrightText: 2026 Hubdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use hubdesk_core::HubdeskError;

use crate::migrations;

/// Handle to the SQLite database.
///
/// Cheap to clone; every clone talks to the same single background writer
/// thread. Query modules accept `&Database` and call through
/// [`Database::connection`].
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at the configured path and run pending
    /// migrations.
    ///
    /// Migrations run on a short-lived blocking connection before the async
    /// handle opens; the journal mode PRAGMA persists in the database file.
    pub async fn open(config: &hubdesk_config::model::StorageConfig) -> Result<Self, HubdeskError> {
        let path = config.database_path.as_str();
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| HubdeskError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let mut bootstrap = rusqlite::Connection::open(path).map_err(|e| HubdeskError::Storage {
            source: Box::new(e),
        })?;
        if config.wal_mode {
            bootstrap
                .pragma_update(None, "journal_mode", "WAL")
                .map_err(|e| HubdeskError::Storage {
                    source: Box::new(e),
                })?;
        }
        migrations::run_migrations(&mut bootstrap)?;
        drop(bootstrap);

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(map_tr_err)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(
                "PRAGMA foreign_keys=ON; PRAGMA busy_timeout=5000; PRAGMA synchronous=NORMAL;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        tracing::debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// Returns the underlying async connection handle.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Verify the database answers queries.
    pub async fn health_check(&self) -> Result<(), HubdeskError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    /// Checkpoint the WAL, flushing pending pages into the main file.
    pub async fn close(&self) -> Result<(), HubdeskError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        tracing::debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Map a connection-layer error into the crate error type.
pub(crate) fn map_tr_err<E>(e: E) -> HubdeskError
where
    E: std::error::Error + Send + Sync + 'static,
{
    HubdeskError::Storage {
        source: Box::new(e),
    }
}

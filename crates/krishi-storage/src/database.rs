// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use krishi_core::KrishiError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// Converts a tokio-rusqlite error into a storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> KrishiError {
    KrishiError::storage(e)
}

/// An open, migrated SQLite database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs and run migrations.
    ///
    /// Missing parent directories are created.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, KrishiError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(KrishiError::storage)?;
        }

        let conn = Connection::open(path).await.map_err(KrishiError::storage)?;

        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.execute_batch(
                "PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA foreign_keys = ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| crate::migrations::run_migrations(conn))
            .await
            .map_err(KrishiError::storage)?;

        debug!(path, wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The underlying async connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the connection.
    pub async fn close(self) -> Result<(), KrishiError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(map_tr_err)
    }
}

// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the TransactionStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use krishi_config::model::StorageConfig;
use krishi_core::types::{QueryOutcome, TransactionRecord};
use krishi_core::{AdapterType, HealthStatus, KrishiError, PluginAdapter, TransactionStore};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed transaction store.
///
/// The database is opened lazily by [`TransactionStore::initialize`].
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    /// Create a new store. No connection is opened until `initialize`.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, KrishiError> {
        self.db.get().ok_or_else(|| KrishiError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(db: &Database) -> Result<(), KrishiError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, KrishiError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KrishiError> {
        if let Some(db) = self.db.get() {
            Self::checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for SqliteStore {
    async fn initialize(&self) -> Result<(), KrishiError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| KrishiError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite transaction store initialized");
        Ok(())
    }

    async fn insert_query(&self, record: &TransactionRecord) -> Result<(), KrishiError> {
        queries::transactions::insert_query(self.db()?, record).await
    }

    async fn complete_query(&self, id: &str, outcome: &QueryOutcome) -> Result<(), KrishiError> {
        queries::transactions::complete_query(self.db()?, id, outcome).await
    }

    async fn fail_query(&self, id: &str, error: &str) -> Result<(), KrishiError> {
        queries::transactions::fail_query(self.db()?, id, error).await
    }

    async fn get_query(&self, id: &str) -> Result<Option<TransactionRecord>, KrishiError> {
        queries::transactions::get_query(self.db()?, id).await
    }
}

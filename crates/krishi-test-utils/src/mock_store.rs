// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory transaction store with switchable write faults.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;

use krishi_core::types::{
    AdapterType, HealthStatus, QueryOutcome, QueryStatus, TransactionRecord,
};
use krishi_core::{KrishiError, PluginAdapter, TransactionStore};

/// A `TransactionStore` backed by a `DashMap`.
///
/// Honors the same finalize-once rule as the SQLite store.
#[derive(Default)]
pub struct MockStore {
    records: DashMap<String, TransactionRecord>,
    fail_inserts: AtomicBool,
    fail_completes: AtomicBool,
    fail_fails: AtomicBool,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `insert_query` fail.
    pub fn fail_inserts(&self, on: bool) {
        self.fail_inserts.store(on, Ordering::SeqCst);
    }

    /// Make `complete_query` fail.
    pub fn fail_completes(&self, on: bool) {
        self.fail_completes.store(on, Ordering::SeqCst);
    }

    /// Make `fail_query` fail.
    pub fn fail_fails(&self, on: bool) {
        self.fail_fails.store(on, Ordering::SeqCst);
    }

    /// Snapshot of a stored record.
    pub async fn get(&self, id: &str) -> Option<TransactionRecord> {
        self.records.get(id).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn injected(flag: &AtomicBool, op: &str) -> Result<(), KrishiError> {
        if flag.load(Ordering::SeqCst) {
            return Err(KrishiError::Storage {
                source: format!("injected {op} failure").into(),
            });
        }
        Ok(())
    }

    fn finalize(
        &self,
        id: &str,
        apply: impl FnOnce(&mut TransactionRecord),
    ) -> Result<(), KrishiError> {
        let mut record = self.records.get_mut(id).ok_or_else(|| KrishiError::NotFound {
            entity: "query",
            id: id.to_string(),
        })?;
        if record.status != QueryStatus::Processing {
            return Err(KrishiError::Conflict(format!(
                "query {id} is already {}",
                record.status
            )));
        }
        apply(record.value_mut());
        Ok(())
    }
}

#[async_trait]
impl PluginAdapter for MockStore {
    fn name(&self) -> &str {
        "mock-store"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, KrishiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KrishiError> {
        Ok(())
    }
}

#[async_trait]
impl TransactionStore for MockStore {
    async fn initialize(&self) -> Result<(), KrishiError> {
        Ok(())
    }

    async fn insert_query(&self, record: &TransactionRecord) -> Result<(), KrishiError> {
        Self::injected(&self.fail_inserts, "insert")?;
        if self.records.contains_key(&record.id) {
            return Err(KrishiError::Conflict(format!("duplicate query id {}", record.id)));
        }
        self.records.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn complete_query(&self, id: &str, outcome: &QueryOutcome) -> Result<(), KrishiError> {
        Self::injected(&self.fail_completes, "complete")?;
        self.finalize(id, |record| record.complete(outcome))
    }

    async fn fail_query(&self, id: &str, error: &str) -> Result<(), KrishiError> {
        Self::injected(&self.fail_fails, "fail")?;
        self.finalize(id, |record| record.fail(error))
    }

    async fn get_query(&self, id: &str) -> Result<Option<TransactionRecord>, KrishiError> {
        Ok(self.get(id).await)
    }
}

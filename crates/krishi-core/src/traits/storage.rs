// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transaction store trait for query persistence.

use async_trait::async_trait;

use crate::error::KrishiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{QueryOutcome, TransactionRecord};

/// Persistence for farmer query transaction records.
///
/// Records are inserted once in the `processing` state and finalized once.
/// Finalizing a record that is not `processing` fails with
/// [`KrishiError::Conflict`]; an unknown id fails with [`KrishiError::NotFound`].
/// Distinct ids may be written concurrently.
#[async_trait]
pub trait TransactionStore: PluginAdapter {
    /// Initializes the backend (connection, migrations).
    async fn initialize(&self) -> Result<(), KrishiError>;

    /// Inserts a freshly submitted record.
    async fn insert_query(&self, record: &TransactionRecord) -> Result<(), KrishiError>;

    /// Finalizes a record as `completed` with the pipeline outcome.
    async fn complete_query(&self, id: &str, outcome: &QueryOutcome) -> Result<(), KrishiError>;

    /// Finalizes a record as `error` with the captured fault detail.
    async fn fail_query(&self, id: &str, error: &str) -> Result<(), KrishiError>;

    /// Fetches a record by id.
    async fn get_query(&self, id: &str) -> Result<Option<TransactionRecord>, KrishiError>;
}

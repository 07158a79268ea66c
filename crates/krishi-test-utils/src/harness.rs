// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles the full pipeline with a scripted provider and a
//! temp SQLite database.

use std::sync::Arc;

use krishi_agent::{LexicalTranslator, Orchestrator};
use krishi_config::model::{ModelConfig, StorageConfig};
use krishi_core::types::{FarmerQuery, QueryResponse};
use krishi_core::{KrishiError, TransactionStore};
use krishi_storage::SqliteStore;

use crate::mock_provider::MockProvider;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    model: ModelConfig,
    vocabulary: Option<Vec<(String, String)>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            model: ModelConfig {
                api_key: Some("test-key".to_string()),
                ..ModelConfig::default()
            },
            vocabulary: None,
        }
    }

    /// Set scripted provider replies, consumed two per query.
    pub fn with_mock_responses(mut self, responses: Vec<String>) -> Self {
        self.responses = responses;
        self
    }

    /// Override the model settings (timeout, token limit).
    pub fn with_model_config(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Replace the built-in vocabulary.
    pub fn with_vocabulary(mut self, vocabulary: Vec<(String, String)>) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    /// Build the harness, opening a fresh SQLite database.
    pub async fn build(self) -> Result<TestHarness, KrishiError> {
        let temp_dir = tempfile::TempDir::new().map_err(KrishiError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let store = SqliteStore::new(StorageConfig {
            database_path: db_path.to_string_lossy().into_owned(),
            wal_mode: true,
        });
        store.initialize().await?;
        let store: Arc<dyn TransactionStore> = Arc::new(store);

        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));
        let translator = Arc::new(match self.vocabulary {
            Some(vocabulary) => LexicalTranslator::with_vocabulary(vocabulary),
            None => LexicalTranslator::new(),
        });
        let orchestrator = Orchestrator::new(
            translator,
            krishi_agent::IntentClassifier::new(mock_provider.clone(), &self.model),
            krishi_agent::AgricultureAdvisor::new(mock_provider.clone(), &self.model),
            store.clone(),
        );

        Ok(TestHarness {
            mock_provider,
            store,
            orchestrator: Arc::new(orchestrator),
            model: self.model,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete test environment with a mock provider and temp storage.
pub struct TestHarness {
    /// The scripted model provider.
    pub mock_provider: Arc<MockProvider>,
    /// SQLite store (temp DB, cleaned up on drop).
    pub store: Arc<dyn TransactionStore>,
    /// The assembled pipeline.
    pub orchestrator: Arc<Orchestrator>,
    /// Model settings the agents were built with.
    pub model: ModelConfig,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Submit a query with only text set.
    pub async fn submit(&self, text: &str) -> Result<QueryResponse, KrishiError> {
        self.orchestrator.process(FarmerQuery::new(text)).await
    }
}

// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential query pipeline: translate, classify, advise, persist.
//!
//! Each query runs start to finish on the calling task. The record is
//! persisted as `processing` before any model call and finalized once.

use std::sync::Arc;
use std::time::Instant;

use krishi_config::model::ModelConfig;
use krishi_core::types::{
    AgentResponses, FarmerQuery, QueryOutcome, QueryResponse, TransactionRecord,
};
use krishi_core::{KrishiError, ModelProvider, TransactionStore};
use tracing::{debug, error, info, warn};

use crate::advisor::AgricultureAdvisor;
use crate::classifier::IntentClassifier;
use crate::translator::LexicalTranslator;

/// Timestamp format used for `created_at`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Current UTC time in the stored timestamp format.
pub fn now_timestamp() -> String {
    chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Coordinates the three agents and the transaction store.
pub struct Orchestrator {
    translator: Arc<LexicalTranslator>,
    classifier: IntentClassifier,
    advisor: AgricultureAdvisor,
    store: Arc<dyn TransactionStore>,
}

impl Orchestrator {
    pub fn new(
        translator: Arc<LexicalTranslator>,
        classifier: IntentClassifier,
        advisor: AgricultureAdvisor,
        store: Arc<dyn TransactionStore>,
    ) -> Self {
        Self {
            translator,
            classifier,
            advisor,
            store,
        }
    }

    /// Builds the pipeline with the built-in vocabulary and one shared provider.
    pub fn from_config(
        provider: Arc<dyn ModelProvider>,
        store: Arc<dyn TransactionStore>,
        config: &ModelConfig,
    ) -> Self {
        Self::new(
            Arc::new(LexicalTranslator::new()),
            IntentClassifier::new(provider.clone(), config),
            AgricultureAdvisor::new(provider, config),
            store,
        )
    }

    pub fn translator(&self) -> &Arc<LexicalTranslator> {
        &self.translator
    }

    pub fn store(&self) -> &Arc<dyn TransactionStore> {
        &self.store
    }

    /// Run one query through the pipeline.
    ///
    /// Returns `Err` only when the record cannot be written at all: the initial
    /// insert, or recording the error status after a failed finalize.
    pub async fn process(&self, query: FarmerQuery) -> Result<QueryResponse, KrishiError> {
        let started = Instant::now();
        let record = TransactionRecord::submitted(
            uuid::Uuid::new_v4().to_string(),
            now_timestamp(),
            &query,
        );
        self.store.insert_query(&record).await?;
        info!(query_id = %record.id, query_type = %record.query_type, "farmer query received");

        let outcome = self.run_agents(&record.id, &query.text).await;

        match self.store.complete_query(&record.id, &outcome).await {
            Ok(()) => {
                info!(
                    query_id = %record.id,
                    intent = %outcome.intent,
                    confidence = outcome.confidence,
                    recommendations = outcome.recommendations.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "farmer query completed"
                );
                Ok(QueryResponse::completed(&record, outcome))
            }
            Err(e) => {
                error!(query_id = %record.id, error = %e, "query processing error");
                self.store.fail_query(&record.id, &e.to_string()).await?;
                Ok(QueryResponse::failed(&record))
            }
        }
    }

    async fn run_agents(&self, query_id: &str, text: &str) -> QueryOutcome {
        let translation = self.translator.translate(text);
        let translation_fallback = !translation.success || translation.fallback;
        let translated = translation
            .translated_text
            .clone()
            .unwrap_or_else(|| text.to_string());
        if !translation.success {
            warn!(query_id, translation_fallback, "translation failed, classifying raw text");
        } else if translation.fallback {
            warn!(
                query_id,
                translation_fallback,
                translated = %translated,
                "no vocabulary match, classifying templated text"
            );
        } else {
            debug!(query_id, translated = %translated, "translation step done");
        }

        let analysis = self.classifier.classify(text, &translated).await;
        debug!(
            query_id,
            intent = %analysis.intent,
            confidence = analysis.confidence,
            "classification step done"
        );

        let advice = self.advisor.advise(&analysis, &translated).await;
        debug!(query_id, success = advice.success, "advisory step done");

        let recommendations = if advice.success {
            vec![advice.advice.clone()]
        } else {
            Vec::new()
        };

        QueryOutcome {
            translated_text: Some(translated),
            intent: analysis.intent.clone(),
            confidence: analysis.confidence,
            agent_responses: AgentResponses {
                translation: Some(translation),
                analysis: Some(analysis),
                advice: Some(advice),
            },
            recommendations,
        }
    }
}

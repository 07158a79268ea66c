// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock model provider for deterministic testing.
//!
//! `MockProvider` implements `ModelProvider` with a FIFO queue of scripted
//! replies and records every request it receives.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use krishi_core::types::{AdapterType, HealthStatus, ModelRequest, ModelResponse, TokenUsage};
use krishi_core::{KrishiError, ModelProvider, PluginAdapter};

/// A mock provider that replays scripted replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty,
/// a default "mock response" text is returned.
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<Result<String, KrishiError>>>>,
    requests: Arc<Mutex<Vec<ModelRequest>>>,
    delay: Option<Duration>,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            delay: None,
        }
    }

    /// Create a mock provider pre-loaded with successful replies.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(responses.into_iter().map(Ok).collect())),
            ..Self::new()
        }
    }

    /// Sleep before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful reply.
    pub async fn add_response(&self, text: String) {
        self.replies.lock().await.push_back(Ok(text));
    }

    /// Queue a failed reply.
    pub async fn add_error(&self, error: KrishiError) {
        self.replies.lock().await.push_back(Err(error));
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().await.clone()
    }

    async fn next_reply(&self) -> Result<String, KrishiError> {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, KrishiError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), KrishiError> {
        Ok(())
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    async fn complete(&self, request: ModelRequest) -> Result<ModelResponse, KrishiError> {
        let model = request.model.clone();
        self.requests.lock().await.push(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let text = self.next_reply().await?;
        Ok(ModelResponse {
            id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
            content: text,
            model,
            usage: TokenUsage {
                input_tokens: 10,
                output_tokens: 20,
            },
        })
    }
}

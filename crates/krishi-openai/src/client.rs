// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for OpenAI-compatible chat completions endpoints.
//!
//! Provides [`OpenAiClient`] which handles request construction, bearer
//! authentication, and error mapping. Failures are not retried: callers
//! fall back to neutral defaults instead.

use std::time::Duration;

use krishi_core::KrishiError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{ApiErrorResponse, ChatRequest, ChatResponse};

/// HTTP client for chat completions.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl OpenAiClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// * `api_key` - Bearer token for the `Authorization` header
    /// * `base_url` - API root, e.g. `https://api.openai.com/v1`
    /// * `timeout` - Upper bound on one request, connect included
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, KrishiError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| KrishiError::Config(format!("invalid API key header value: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| KrishiError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    /// The full URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a non-streaming request and returns the full response.
    pub async fn complete_chat(&self, request: &ChatRequest) -> Result<ChatResponse, KrishiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        debug!(status = %status, model = %request.model, "completion response received");

        let body = response
            .text()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            return Err(KrishiError::Provider {
                message,
                source: None,
            });
        }

        serde_json::from_str(&body).map_err(|e| KrishiError::Provider {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> KrishiError {
        if e.is_timeout() {
            return KrishiError::Timeout {
                duration: self.timeout,
            };
        }
        KrishiError::Provider {
            message: format!("HTTP request failed: {e}"),
            source: Some(Box::new(e)),
        }
    }
}

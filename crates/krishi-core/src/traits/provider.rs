// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Language model provider trait.

use async_trait::async_trait;

use crate::error::KrishiError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ModelRequest, ModelResponse};

/// Adapter for a remote language model.
///
/// One call is one request: a system instruction plus a single user message
/// in, free text out. Implementations hold no conversation state.
#[async_trait]
pub trait ModelProvider: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ModelRequest) -> Result<ModelResponse, KrishiError>;
}

// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-backed agricultural advice.

use std::sync::Arc;
use std::time::Duration;

use krishi_config::model::ModelConfig;
use krishi_core::types::{AdvisoryResult, Classification, ModelRequest};
use krishi_core::{KrishiError, ModelProvider};
use tracing::warn;

/// Display name of the advisory agent, reported in successful results.
pub const AGENT_NAME: &str = "Agriculture Advisor Agent";

/// System instruction for advice generation.
const ADVISOR_PROMPT: &str = "You are an expert agricultural advisor specializing in Kerala and South Indian farming practices.
Provide practical, actionable advice for farmers. Consider local climate, crops, and farming methods.

Focus on:
1. Organic and sustainable practices when possible
2. Cost-effective solutions for small farmers
3. Local resources and materials
4. Seasonal considerations
5. Traditional knowledge combined with modern techniques

Keep advice simple, practical, and culturally appropriate for Malayalam-speaking farmers.";

/// Advisory generator backed by a [`ModelProvider`].
pub struct AgricultureAdvisor {
    provider: Arc<dyn ModelProvider>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl AgricultureAdvisor {
    pub fn new(provider: Arc<dyn ModelProvider>, config: &ModelConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: config.request_timeout(),
        }
    }

    /// Draft advice for a classified query. Failures yield the fixed apology.
    pub async fn advise(&self, analysis: &Classification, translated: &str) -> AdvisoryResult {
        let request = ModelRequest {
            model: self.model.clone(),
            system_prompt: ADVISOR_PROMPT.to_string(),
            message: advice_prompt(analysis, translated),
            max_tokens: self.max_tokens,
        };

        let outcome = tokio::time::timeout(self.timeout, self.provider.complete(request))
            .await
            .unwrap_or(Err(KrishiError::Timeout {
                duration: self.timeout,
            }));

        match outcome {
            Ok(response) => AdvisoryResult::advised(response.content, AGENT_NAME, &analysis.intent),
            Err(e) => {
                warn!(error = %e, "agriculture advisor error");
                AdvisoryResult::unavailable(e.to_string())
            }
        }
    }
}

/// The user prompt embedding the query and its classification.
pub fn advice_prompt(analysis: &Classification, translated: &str) -> String {
    let crop = analysis
        .crop
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or("Not specified");
    format!(
        "Farmer's Query: {translated}
Detected Intent: {intent}
Crop: {crop}
Urgency Level: {urgency}/5

Provide specific agricultural advice for this farmer's situation. Include:
1. Immediate actions (if urgent)
2. Practical solutions
3. Resources needed
4. Timeline for implementation
5. Expected outcomes",
        intent = analysis.intent,
        urgency = analysis.urgency,
    )
}

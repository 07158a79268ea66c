// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-backed intent classification of farmer queries.
//!
//! One model request per call. The answer is expected to be a JSON object;
//! anything unparseable degrades to a neutral classification instead of an
//! error.

use std::sync::Arc;
use std::time::Duration;

use krishi_config::model::ModelConfig;
use krishi_core::ModelProvider;
use krishi_core::types::{Classification, ModelRequest};
use tracing::{debug, warn};

/// Display name of the classification agent.
pub const AGENT_NAME: &str = "Query Understanding Agent";

/// System instruction for intent analysis.
const CLASSIFIER_PROMPT: &str = r#"You are an agricultural expert AI that analyzes farmer queries.
Given a Malayalam farmer's query (and its English translation), analyze and extract:
1. Intent: crop_query, pest_disease, weather, finance_scheme, market_info, general
2. Crop mentioned (if any)
3. Location context (if mentioned)
4. Urgency level (1-5, 5 being emergency)
5. Key agricultural concepts

Respond only in JSON format with these fields:
{
    "intent": "string",
    "crop": "string or null",
    "location": "string or null",
    "urgency": number,
    "concepts": ["list of key concepts"],
    "confidence": number (0-1)
}"#;

/// Intent classifier backed by a [`ModelProvider`].
pub struct IntentClassifier {
    provider: Arc<dyn ModelProvider>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl IntentClassifier {
    pub fn new(provider: Arc<dyn ModelProvider>, config: &ModelConfig) -> Self {
        Self {
            provider,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            timeout: config.request_timeout(),
        }
    }

    /// Classify a query given its raw text and translated form.
    ///
    /// Transport failures and timeouts yield [`Classification::unreachable`];
    /// unparseable answers yield [`Classification::fallback`].
    pub async fn classify(&self, text: &str, translated: &str) -> Classification {
        let request = ModelRequest {
            model: self.model.clone(),
            system_prompt: CLASSIFIER_PROMPT.to_string(),
            message: user_message(text, translated),
            max_tokens: self.max_tokens,
        };

        let response = match tokio::time::timeout(self.timeout, self.provider.complete(request)).await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(error = %e, "query analysis error");
                return Classification::unreachable(e.to_string());
            }
            Err(_) => {
                let e = krishi_core::KrishiError::Timeout {
                    duration: self.timeout,
                };
                warn!(error = %e, "query analysis timed out");
                return Classification::unreachable(e.to_string());
            }
        };

        parse_classification(&response.content).unwrap_or_else(|| {
            debug!(raw = %response.content, "falling back to default classification");
            Classification::fallback()
        })
    }
}

/// The user message sent alongside [`CLASSIFIER_PROMPT`].
pub fn user_message(text: &str, translated: &str) -> String {
    format!(
        "Malayalam Query: {text}\nEnglish Translation: {translated}\n\nAnalyze this agricultural query:"
    )
}

/// Parse a model answer into a [`Classification`].
///
/// The JSON object is located by its outermost braces, which strips Markdown
/// fences and surrounding prose. Returns `None` when no object parses.
pub fn parse_classification(response: &str) -> Option<Classification> {
    let trimmed = response.trim();
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end < start {
        warn!("model answer has no JSON object");
        return None;
    }

    match serde_json::from_str::<Classification>(&trimmed[start..=end]) {
        Ok(classification) => Some(classification),
        Err(e) => {
            warn!("failed to parse classification response: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_core::KrishiError;
    use krishi_test_utils::MockProvider;

    fn classifier(provider: Arc<MockProvider>) -> IntentClassifier {
        IntentClassifier::new(provider, &ModelConfig::default())
    }

    #[test]
    fn parses_plain_object() {
        let c = parse_classification(
            r#"{"intent":"pest_disease","crop":"rice","location":null,"urgency":4,"concepts":["pest"],"confidence":0.85}"#,
        )
        .unwrap();
        assert_eq!(c.intent, "pest_disease");
        assert_eq!(c.crop.as_deref(), Some("rice"));
        assert_eq!(c.urgency, 4);
        assert_eq!(c.concepts, vec!["pest"]);
        assert_eq!(c.confidence, 0.85);
        assert!(c.error.is_none());
    }

    #[test]
    fn parses_object_inside_code_fence() {
        let raw = "```json\n{\"intent\": \"weather\", \"urgency\": 2, \"confidence\": 0.7}\n```";
        let c = parse_classification(raw).unwrap();
        assert_eq!(c.intent, "weather");
        assert_eq!(c.urgency, 2);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let c = parse_classification(r#"Here you go: {"intent": "market_info"} hope it helps"#)
            .unwrap();
        assert_eq!(c.intent, "market_info");
        assert!(c.crop.is_none());
        assert_eq!(c.urgency, 3);
        assert!(c.concepts.is_empty());
        assert_eq!(c.confidence, 0.5);
    }

    #[test]
    fn out_of_range_values_are_kept_verbatim() {
        let c = parse_classification(r#"{"urgency": 11, "confidence": 1.7}"#).unwrap();
        assert_eq!(c.urgency, 11);
        assert_eq!(c.confidence, 1.7);
    }

    #[test]
    fn whole_float_urgency_is_accepted() {
        let c = parse_classification(
            r#"{"intent":"pest_disease","crop":"rice","location":null,"urgency":4.0,"concepts":["pest"],"confidence":0.85}"#,
        )
        .unwrap();
        assert_eq!(c.intent, "pest_disease");
        assert_eq!(c.urgency, 4);
        assert_eq!(c.confidence, 0.85);
    }

    #[test]
    fn null_fields_take_defaults() {
        let c = parse_classification(
            r#"{"intent":null,"crop":"coconut","urgency":null,"confidence":null}"#,
        )
        .unwrap();
        assert_eq!(c.intent, "general");
        assert_eq!(c.crop.as_deref(), Some("coconut"));
        assert_eq!(c.urgency, 3);
        assert_eq!(c.confidence, 0.5);
    }

    #[test]
    fn fractional_urgency_does_not_parse() {
        assert!(parse_classification(r#"{"intent":"weather","urgency":2.5}"#).is_none());
    }

    #[test]
    fn prose_and_wrong_types_do_not_parse() {
        assert!(parse_classification("I think this is about rice.").is_none());
        assert!(parse_classification(r#"{"urgency": "high"}"#).is_none());
        assert!(parse_classification("} backwards {").is_none());
        assert!(parse_classification("[1, 2, 3]").is_none());
    }

    #[test]
    fn user_message_format() {
        assert_eq!(
            user_message("നെല്ല്", "rice"),
            "Malayalam Query: നെല്ല്\nEnglish Translation: rice\n\nAnalyze this agricultural query:"
        );
    }

    #[tokio::test]
    async fn classify_sends_one_request_with_prompt() {
        let provider = Arc::new(MockProvider::with_responses(vec![
            r#"{"intent":"crop_query","crop":"rice","urgency":2,"concepts":[],"confidence":0.9}"#
                .to_string(),
        ]));
        let c = classifier(provider.clone()).classify("നെല്ല്", "rice").await;
        assert_eq!(c.intent, "crop_query");
        assert_eq!(c.confidence, 0.9);

        let requests = provider.requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system_prompt, CLASSIFIER_PROMPT);
        assert!(requests[0].message.contains("English Translation: rice"));
        assert_eq!(requests[0].model, "gpt-4o-mini");
    }

    #[tokio::test]
    async fn malformed_answer_falls_back_to_half_confidence() {
        let provider = Arc::new(MockProvider::with_responses(vec!["not json".to_string()]));
        let c = classifier(provider).classify("x", "y").await;
        assert_eq!(c, Classification::fallback());
        assert_eq!(c.confidence, 0.5);
        assert!(c.error.is_none());
    }

    #[tokio::test]
    async fn transport_failure_zeroes_confidence() {
        let provider = Arc::new(MockProvider::new());
        provider
            .add_error(KrishiError::Provider {
                message: "connection refused".into(),
                source: None,
            })
            .await;
        let c = classifier(provider).classify("x", "y").await;
        assert_eq!(c.intent, "general");
        assert_eq!(c.confidence, 0.0);
        assert!(c.error.unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn slow_provider_times_out() {
        let provider = Arc::new(
            MockProvider::with_responses(vec!["{}".to_string()])
                .with_delay(Duration::from_millis(200)),
        );
        let config = ModelConfig {
            request_timeout_secs: 0,
            ..ModelConfig::default()
        };
        let c = IntentClassifier::new(provider, &config)
            .classify("x", "y")
            .await;
        assert_eq!(c.confidence, 0.0);
        assert!(c.error.unwrap().contains("timed out"));
    }
}

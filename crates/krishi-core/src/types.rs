// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared by the pipeline, the store, and the HTTP gateway.

use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Advice text returned whenever the advisory step cannot produce real advice.
pub const ADVICE_UNAVAILABLE: &str =
    "Unable to provide advice at this time. Please try again later.";

/// Intent label used when the classifier has nothing better to offer.
pub const DEFAULT_INTENT: &str = "general";

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a trait object.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Provider,
    Storage,
}

/// Lifecycle of a farmer query. Created as `Processing`, finalized exactly once.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QueryStatus {
    Processing,
    Completed,
    Error,
}

impl QueryStatus {
    /// Returns true for the two terminal states.
    pub fn is_terminal(self) -> bool {
        matches!(self, QueryStatus::Completed | QueryStatus::Error)
    }
}

// --- Inbound ---

/// A query submitted by a farmer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FarmerQuery {
    /// Malayalam text from the farmer.
    pub text: String,
    /// Free-form query category.
    #[serde(default = "default_query_type")]
    pub query_type: String,
    /// Farm location, if given.
    #[serde(default)]
    pub location: Option<String>,
    /// Identifier of the submitting farmer, if given.
    #[serde(default, alias = "farmer_submitter_id")]
    pub farmer_id: Option<String>,
}

impl FarmerQuery {
    /// Creates a query with only text set.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            query_type: default_query_type(),
            location: None,
            farmer_id: None,
        }
    }
}

fn default_query_type() -> String {
    "general".to_string()
}

// --- Agent outputs ---

/// Output of the lexical translator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub success: bool,
    pub original_text: String,
    pub translated_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// True when no vocabulary term matched and the text was wrapped in the
    /// fallback template instead of being translated.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub fallback: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TranslationResult {
    /// A successful translation produced by the given method.
    pub fn translated(original: &str, translated: String, method: &str) -> Self {
        Self {
            success: true,
            original_text: original.to_string(),
            translated_text: Some(translated),
            method: Some(method.to_string()),
            fallback: false,
            error: None,
        }
    }

    /// Untranslated text wrapped in the fallback template.
    pub fn templated(original: &str, templated: String, method: &str) -> Self {
        Self {
            fallback: true,
            ..Self::translated(original, templated, method)
        }
    }

    /// A translation that faulted internally.
    pub fn failed(original: &str, error: String) -> Self {
        Self {
            success: false,
            original_text: original.to_string(),
            translated_text: None,
            method: None,
            fallback: false,
            error: Some(error),
        }
    }
}

/// Structured intent analysis of a farmer query.
///
/// Fields missing from a model answer, or given as `null`, take the neutral
/// defaults. `urgency` also accepts whole-number floats such as `4.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    #[serde(default = "default_intent", deserialize_with = "intent_or_default")]
    pub intent: String,
    #[serde(default)]
    pub crop: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_urgency", deserialize_with = "urgency_or_default")]
    pub urgency: i64,
    #[serde(default)]
    pub concepts: Vec<String>,
    #[serde(default = "default_confidence", deserialize_with = "confidence_or_default")]
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Classification {
    /// Default used when the model answered but the answer was not parseable.
    pub fn fallback() -> Self {
        Self {
            intent: default_intent(),
            crop: None,
            location: None,
            urgency: default_urgency(),
            concepts: Vec::new(),
            confidence: default_confidence(),
            error: None,
        }
    }

    /// Default used when the model could not be reached at all.
    pub fn unreachable(error: String) -> Self {
        Self {
            confidence: 0.0,
            error: Some(error),
            ..Self::fallback()
        }
    }
}

impl Default for Classification {
    fn default() -> Self {
        Self::fallback()
    }
}

fn default_intent() -> String {
    DEFAULT_INTENT.to_string()
}

fn default_urgency() -> i64 {
    3
}

fn default_confidence() -> f64 {
    0.5
}

fn intent_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_intent))
}

fn confidence_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_else(default_confidence))
}

/// Models often emit JSON numbers as floats; whole values are accepted.
fn urgency_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Urgency {
        Whole(i64),
        Float(f64),
    }

    match Option::<Urgency>::deserialize(deserializer)? {
        None => Ok(default_urgency()),
        Some(Urgency::Whole(n)) => Ok(n),
        Some(Urgency::Float(f)) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        Some(Urgency::Float(f)) => Err(D::Error::custom(format!(
            "urgency must be a whole number, got {f}"
        ))),
    }
}

/// Output of the advisory generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvisoryResult {
    pub success: bool,
    pub advice: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent_handled: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AdvisoryResult {
    /// Advice successfully drafted by the named agent.
    pub fn advised(advice: String, agent: &str, intent: &str) -> Self {
        Self {
            success: true,
            advice,
            agent: Some(agent.to_string()),
            intent_handled: Some(intent.to_string()),
            error: None,
        }
    }

    /// The fixed apology returned when advice could not be drafted.
    pub fn unavailable(error: String) -> Self {
        Self {
            success: false,
            advice: ADVICE_UNAVAILABLE.to_string(),
            agent: None,
            intent_handled: None,
            error: Some(error),
        }
    }
}

/// Per-agent outputs recorded for a query. Serializes as `{}` when empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResponses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation: Option<TranslationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<Classification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<AdvisoryResult>,
}

// --- Persistence ---

/// Fields written when a query completes.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOutcome {
    pub translated_text: Option<String>,
    pub intent: String,
    pub confidence: f64,
    pub agent_responses: AgentResponses,
    pub recommendations: Vec<String>,
}

/// The persisted lifecycle document of one farmer query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    pub original_text: String,
    pub query_type: String,
    pub location: Option<String>,
    pub farmer_id: Option<String>,
    pub created_at: String,
    pub status: QueryStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_responses: Option<AgentResponses>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TransactionRecord {
    /// Creates the initial `processing` record for a submitted query.
    pub fn submitted(id: String, created_at: String, query: &FarmerQuery) -> Self {
        Self {
            id,
            original_text: query.text.clone(),
            query_type: query.query_type.clone(),
            location: query.location.clone(),
            farmer_id: query.farmer_id.clone(),
            created_at,
            status: QueryStatus::Processing,
            translated_text: None,
            intent: None,
            confidence: None,
            agent_responses: None,
            recommendations: None,
            error: None,
        }
    }

    /// Applies a completion outcome, as the store does on finalize.
    pub fn complete(&mut self, outcome: &QueryOutcome) {
        self.status = QueryStatus::Completed;
        self.translated_text = outcome.translated_text.clone();
        self.intent = Some(outcome.intent.clone());
        self.confidence = Some(outcome.confidence);
        self.agent_responses = Some(outcome.agent_responses.clone());
        self.recommendations = Some(outcome.recommendations.clone());
    }

    /// Marks the record failed with the captured fault detail.
    pub fn fail(&mut self, error: &str) {
        self.status = QueryStatus::Error;
        self.error = Some(error.to_string());
    }
}

// --- Outbound ---

/// Response envelope returned for a submitted query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub id: String,
    pub original_text: String,
    pub translated_text: Option<String>,
    pub intent: Option<String>,
    pub confidence: Option<f64>,
    #[serde(default)]
    pub agent_responses: AgentResponses,
    #[serde(default)]
    pub recommendations: Vec<String>,
    pub created_at: String,
    pub status: QueryStatus,
}

impl QueryResponse {
    /// Full response for a completed query.
    pub fn completed(record: &TransactionRecord, outcome: QueryOutcome) -> Self {
        Self {
            id: record.id.clone(),
            original_text: record.original_text.clone(),
            translated_text: outcome.translated_text,
            intent: Some(outcome.intent),
            confidence: Some(outcome.confidence),
            agent_responses: outcome.agent_responses,
            recommendations: outcome.recommendations,
            created_at: record.created_at.clone(),
            status: QueryStatus::Completed,
        }
    }

    /// Minimal response for a query that hit a pipeline fault.
    pub fn failed(record: &TransactionRecord) -> Self {
        Self {
            id: record.id.clone(),
            original_text: record.original_text.clone(),
            translated_text: None,
            intent: None,
            confidence: None,
            agent_responses: AgentResponses::default(),
            recommendations: Vec::new(),
            created_at: record.created_at.clone(),
            status: QueryStatus::Error,
        }
    }
}

// --- Model provider ---

/// A single-turn request to a language model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelRequest {
    /// Model identifier (e.g., "gpt-4o-mini").
    pub model: String,
    /// Fixed system instruction.
    pub system_prompt: String,
    /// The single user message.
    pub message: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

/// Token accounting reported by a provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A complete language model answer.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub usage: TokenUsage,
}

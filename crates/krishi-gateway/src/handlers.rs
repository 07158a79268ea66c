// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use krishi_agent::orchestrator::now_timestamp;
use krishi_agent::translator::{SOURCE_LANG, TARGET_LANG};
use krishi_core::types::{FarmerQuery, QueryResponse, TransactionRecord};

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error description.
    pub detail: String,
}

/// An error rendered as `{"detail": ...}` with the given status.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                detail: self.detail,
            }),
        )
            .into_response()
    }
}

/// Response body for GET /.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub health: String,
}

/// Response body for GET /api/health.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy": dependencies are not probed.
    pub status: String,
    pub service: String,
    /// ISO 8601 timestamp.
    pub timestamp: String,
    pub agents: AgentStatus,
}

/// Per-agent liveness flags.
#[derive(Debug, Serialize, Deserialize)]
pub struct AgentStatus {
    pub translation: String,
    pub query_understanding: String,
    pub agriculture_advisor: String,
}

/// Request body for POST /api/translate.
#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

fn default_source_lang() -> String {
    SOURCE_LANG.to_string()
}

fn default_target_lang() -> String {
    TARGET_LANG.to_string()
}

/// Response body for POST /api/translate.
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub success: bool,
    pub original_text: String,
    pub translated_text: Option<String>,
    pub error: Option<String>,
}

/// GET /
pub async fn get_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Digital Krishi Officer - Multi-Agent Agricultural Support System".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        health: "/api/health".to_string(),
    })
}

/// GET /api/health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let active = || "active".to_string();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.service_name.clone(),
        timestamp: now_timestamp(),
        agents: AgentStatus {
            translation: active(),
            query_understanding: active(),
            agriculture_advisor: active(),
        },
    })
}

/// POST /api/farmer-query
///
/// Runs the full pipeline. A query that hit a fault mid-pipeline still
/// returns 200 with `status: "error"`; 500 means nothing could be recorded.
pub async fn post_farmer_query(
    State(state): State<GatewayState>,
    Json(query): Json<FarmerQuery>,
) -> Result<Json<QueryResponse>, ApiError> {
    if query.text.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Query text must not be empty",
        ));
    }

    state.orchestrator.process(query).await.map(Json).map_err(|e| {
        error!(error = %e, "API error");
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error processing query: {e}"),
        )
    })
}

/// POST /api/translate
///
/// The language fields are accepted for compatibility; the vocabulary is
/// always applied.
pub async fn post_translate(
    State(state): State<GatewayState>,
    Json(body): Json<TranslateRequest>,
) -> Json<TranslateResponse> {
    if !body.source_lang.eq_ignore_ascii_case(SOURCE_LANG)
        || !body.target_lang.eq_ignore_ascii_case(TARGET_LANG)
    {
        warn!(
            source_lang = %body.source_lang,
            target_lang = %body.target_lang,
            "language pair outside the vocabulary, translating as ml -> en"
        );
    }

    let result = state.translator.translate(&body.text);
    Json(TranslateResponse {
        success: result.success,
        original_text: result.original_text,
        translated_text: result.translated_text,
        error: result.error,
    })
}

/// GET /api/queries/{id}
pub async fn get_query(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionRecord>, ApiError> {
    match state.store.get_query(&id).await {
        Ok(Some(record)) => Ok(Json(record)),
        Ok(None) => Err(ApiError::new(StatusCode::NOT_FOUND, "Query not found")),
        Err(e) => {
            error!(query_id = %id, error = %e, "get query error");
            Err(ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error retrieving query: {e}"),
            ))
        }
    }
}

// SPDX-FileCopyrightText: 2026 Krishi Officer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the complete Krishi Officer pipeline.
//!
//! Each test assembles an isolated pipeline (scripted provider, temp SQLite
//! or in-memory store) behind the HTTP router. Tests are order-insensitive.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use tower::ServiceExt;

use krishi_agent::Orchestrator;
use krishi_core::types::{ADVICE_UNAVAILABLE, DEFAULT_INTENT, QueryResponse, TransactionRecord};
use krishi_core::{KrishiError, QueryStatus};
use krishi_gateway::{GatewayState, build_router};
use krishi_test_utils::{MockProvider, MockStore, TestHarness};

const RICE_ANALYSIS: &str = r#"{"intent":"crop_query","crop":"rice","location":null,"urgency":2,"concepts":["rice","good"],"confidence":0.92}"#;
const RICE_ADVICE: &str = "Rice looks healthy. Keep 5 cm of standing water during tillering.";

fn router_for(orchestrator: Arc<Orchestrator>) -> Router {
    build_router(GatewayState::new(orchestrator, "Digital Krishi Officer API"))
}

async fn harness_app(responses: Vec<String>) -> (Router, TestHarness) {
    let harness = TestHarness::builder()
        .with_mock_responses(responses)
        .build()
        .await
        .unwrap();
    (router_for(harness.orchestrator.clone()), harness)
}

async fn submit(app: &Router, body: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/farmer-query")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    call(app, request).await
}

async fn fetch(app: &Router, id: &str) -> (StatusCode, Vec<u8>) {
    let request = Request::builder()
        .uri(format!("/api/queries/{id}"))
        .body(Body::empty())
        .unwrap();
    call(app, request).await
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

// ---- Happy path ----

#[tokio::test]
async fn rice_query_completes_with_one_recommendation() {
    let (app, harness) =
        harness_app(vec![RICE_ANALYSIS.to_string(), RICE_ADVICE.to_string()]).await;

    let (status, body) = submit(&app, r#"{"text": "നെല്ല് നല്ലതാണ്"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let response: QueryResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.status, QueryStatus::Completed);
    assert_eq!(response.original_text, "നെല്ല് നല്ലതാണ്");
    assert!(response.translated_text.as_deref().unwrap().contains("rice"));
    assert_eq!(response.intent.as_deref(), Some("crop_query"));
    assert_eq!(response.confidence, Some(0.92));
    assert_eq!(response.recommendations, vec![RICE_ADVICE.to_string()]);

    let stored = harness.store.get_query(&response.id).await.unwrap().unwrap();
    assert_eq!(stored.status, QueryStatus::Completed);
    assert_eq!(stored.recommendations, Some(vec![RICE_ADVICE.to_string()]));
}

#[tokio::test]
async fn classifier_and_advisor_each_make_one_model_call() {
    let (app, harness) =
        harness_app(vec![RICE_ANALYSIS.to_string(), RICE_ADVICE.to_string()]).await;

    submit(&app, r#"{"text": "നെല്ല്"}"#).await;

    let requests = harness.mock_provider.requests().await;
    assert_eq!(requests.len(), 2);
    assert!(requests[0].message.contains("English Translation: rice"));
    assert!(requests[1].message.contains("crop_query"));
}

// ---- Absorbed agent faults ----

#[tokio::test]
async fn malformed_classification_defaults_to_half_confidence() {
    let (app, _harness) = harness_app(vec![
        "I think this is about rice, probably.".to_string(),
        RICE_ADVICE.to_string(),
    ])
    .await;

    let (status, body) = submit(&app, r#"{"text": "നെല്ല്"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let response: QueryResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.status, QueryStatus::Completed);
    assert_eq!(response.intent.as_deref(), Some(DEFAULT_INTENT));
    assert_eq!(response.confidence, Some(0.5));
    let analysis = response.agent_responses.analysis.unwrap();
    assert!(analysis.error.is_none());
}

#[tokio::test]
async fn unreachable_classifier_yields_zero_confidence() {
    let (app, harness) = harness_app(vec![]).await;
    harness
        .mock_provider
        .add_error(KrishiError::Provider {
            message: "connection refused".to_string(),
            source: None,
        })
        .await;
    harness.mock_provider.add_response(RICE_ADVICE.to_string()).await;

    let (status, body) = submit(&app, r#"{"text": "നെല്ല്"}"#).await;
    assert_eq!(status, StatusCode::OK);

    let response: QueryResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.status, QueryStatus::Completed);
    assert_eq!(response.intent.as_deref(), Some(DEFAULT_INTENT));
    assert_eq!(response.confidence, Some(0.0));
    let analysis = response.agent_responses.analysis.unwrap();
    assert!(analysis.error.unwrap().contains("connection refused"));
}

#[tokio::test]
async fn advisor_failure_completes_without_recommendations() {
    let (app, harness) = harness_app(vec![RICE_ANALYSIS.to_string()]).await;
    harness
        .mock_provider
        .add_error(KrishiError::Provider {
            message: "HTTP 503".to_string(),
            source: None,
        })
        .await;

    let (_, body) = submit(&app, r#"{"text": "നെല്ല്"}"#).await;
    let response: QueryResponse = serde_json::from_slice(&body).unwrap();

    assert_eq!(response.status, QueryStatus::Completed);
    assert!(response.recommendations.is_empty());
    let advice = response.agent_responses.advice.unwrap();
    assert!(!advice.success);
    assert_eq!(advice.advice, ADVICE_UNAVAILABLE);
}

// ---- Pipeline faults ----

#[tokio::test]
async fn finalize_failure_marks_record_as_error() {
    let store = Arc::new(MockStore::new());
    store.fail_completes(true);
    let provider = Arc::new(MockProvider::with_responses(vec![
        RICE_ANALYSIS.to_string(),
        RICE_ADVICE.to_string(),
    ]));
    let orchestrator = Arc::new(Orchestrator::from_config(
        provider,
        store.clone(),
        &Default::default(),
    ));
    let app = router_for(orchestrator);

    let (status, body) = submit(&app, r#"{"text": "നെല്ല്"}"#).await;
    assert_eq!(status, StatusCode::OK);
    let response: QueryResponse = serde_json::from_slice(&body).unwrap();
    assert_eq!(response.status, QueryStatus::Error);
    assert!(response.recommendations.is_empty());

    let stored = store.get(&response.id).await.unwrap();
    assert_eq!(stored.status, QueryStatus::Error);
    assert!(stored.error.unwrap().contains("injected"));
    assert!(stored.intent.is_none());
}

#[tokio::test]
async fn unwritable_store_returns_500() {
    let store = Arc::new(MockStore::new());
    store.fail_inserts(true);
    let orchestrator = Arc::new(Orchestrator::from_config(
        Arc::new(MockProvider::new()),
        store.clone(),
        &Default::default(),
    ));
    let app = router_for(orchestrator);

    let (status, body) = submit(&app, r#"{"text": "നെല്ല്"}"#).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(json["detail"].as_str().unwrap().starts_with("Error processing query:"));
    assert!(store.is_empty());
}

// ---- Retrieval and validation ----

#[tokio::test]
async fn completed_query_fetch_is_idempotent() {
    let (app, _harness) =
        harness_app(vec![RICE_ANALYSIS.to_string(), RICE_ADVICE.to_string()]).await;
    let (_, body) = submit(&app, r#"{"text": "നെല്ല് നല്ലതാണ്"}"#).await;
    let response: QueryResponse = serde_json::from_slice(&body).unwrap();

    let (first_status, first) = fetch(&app, &response.id).await;
    let (second_status, second) = fetch(&app, &response.id).await;
    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first, second);

    let record: TransactionRecord = serde_json::from_slice(&first).unwrap();
    assert_eq!(record.id, response.id);
    assert_eq!(record.status, QueryStatus::Completed);
}

#[tokio::test]
async fn empty_text_is_rejected_without_model_calls() {
    let (app, harness) = harness_app(vec![]).await;

    let (status, body) = submit(&app, r#"{"text": ""}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["detail"], "Query text must not be empty");
    assert!(harness.mock_provider.requests().await.is_empty());
}

#[tokio::test]
async fn unknown_query_id_is_404_without_side_effects() {
    let (app, harness) = harness_app(vec![]).await;

    let (status, body) = fetch(&app, "does-not-exist").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["detail"], "Query not found");
    assert!(harness.store.get_query("does-not-exist").await.unwrap().is_none());
}

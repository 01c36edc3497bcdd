//! Integration tests for resolution HTTP endpoints.
//!
//! These tests drive the full router with a mock generator:
//! 1. The archetype flow from quiz answers to a landed outcome
//! 2. Fallback when the generator is unusable
//! 3. Single-flight behavior and session reset
//! 4. The prophecy flow keyed by the resolved category

use std::sync::Arc;
use std::time::Duration;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use archetype_engine::adapters::ai::{MockAIProvider, MockError};
use archetype_engine::adapters::http::app_router;
use archetype_engine::application::resolution::{ResolutionSettings, SessionRegistry};
use archetype_engine::domain::archetype::Category;
use archetype_engine::domain::foundation::SessionId;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn app(provider: &MockAIProvider) -> Router {
    let settings =
        ResolutionSettings::default().with_policy(Duration::from_millis(150), Duration::ZERO);
    app_router(SessionRegistry::new(Arc::new(provider.clone()), settings))
}

fn post(uri: String, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: String) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn warrior_answers() -> Value {
    json!({
        "answers": [
            {"questionId": 1, "answerText": "Иду напролом", "weight": {"Воин": 3}},
            {"questionId": 2, "answerText": "Ищу знания", "weight": {"mage": 1}},
            {"questionId": 3, "answerText": "Сражаюсь до конца", "weight": {"warrior": 2}}
        ]
    })
}

// =============================================================================
// Archetype
// =============================================================================

#[tokio::test]
async fn archetype_from_json_embedded_in_prose() {
    let provider = MockAIProvider::new().with_response(
        "Вот результат: {\"type\": \"Искатель\", \"description\": \"Путник\", \"CTA\": \"Иди\"} Удачи!",
    );
    let app = app(&provider);

    let (status, json) = send(
        &app,
        post(format!("/api/sessions/{}/archetype", SessionId::new()), warrior_answers()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "Искатель");
    assert_eq!(json["description"], "Путник");
    assert_eq!(json["callToAction"], "Иди");
    assert_eq!(json["strategyUsed"], "regex_extraction");
    assert_eq!(json["attempts"], 1);
}

#[tokio::test]
async fn unusable_generator_falls_back_to_score_leader() {
    let provider = MockAIProvider::new()
        .with_error(MockError::Unavailable { message: "down".into() })
        .with_response(r#"{"type":"Бард"}"#);
    let app = app(&provider);

    let (status, json) = send(
        &app,
        post(format!("/api/sessions/{}/archetype", SessionId::new()), warrior_answers()),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], Category::Warrior.label());
    assert_eq!(json["description"], Category::Warrior.profile().description);
    assert_eq!(json["strategyUsed"], "local_fallback");
    assert_eq!(json["attempts"], 2);
    assert_eq!(json["failures"][0]["kind"], "transport_error");
    assert_eq!(json["failures"][1]["kind"], "invalid_category");
    assert_eq!(provider.call_count(), 2);
}

#[tokio::test]
async fn repeated_request_returns_landed_outcome() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"type":"Маг"}"#)
        .with_response(r#"{"type":"Тень"}"#);
    let app = app(&provider);
    let session = SessionId::new();

    let (_, first) = send(
        &app,
        post(format!("/api/sessions/{}/archetype", session), warrior_answers()),
    )
    .await;
    let (_, second) = send(
        &app,
        post(format!("/api/sessions/{}/archetype", session), json!({"answers": []})),
    )
    .await;

    assert_eq!(first, second);
    assert_eq!(second["type"], "Маг");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn reset_allows_fresh_resolution() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"type":"Маг"}"#)
        .with_response(r#"{"type":"Тень"}"#);
    let app = app(&provider);
    let session = SessionId::new();
    let uri = format!("/api/sessions/{}/archetype", session);

    send(&app, post(uri.clone(), warrior_answers())).await;
    let (status, _) = send(&app, delete(format!("/api/sessions/{}", session))).await;
    let (_, json) = send(&app, post(uri, warrior_answers())).await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(json["type"], "Тень");
    assert_eq!(provider.call_count(), 2);
}

// =============================================================================
// Prophecy
// =============================================================================

#[tokio::test]
async fn prophecy_follows_resolved_archetype() {
    let provider = MockAIProvider::new()
        .with_response(r#"{"type":"Тень","description":"d","CTA":"c"}"#)
        .with_response("«Во тьме ты найдёшь свой путь.»");
    let app = app(&provider);
    let session = SessionId::new();

    let (_, archetype) = send(
        &app,
        post(format!("/api/sessions/{}/archetype", session), warrior_answers()),
    )
    .await;
    let (status, prophecy) = send(
        &app,
        post(
            format!("/api/sessions/{}/prophecy", session),
            json!({"category": archetype["type"]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(prophecy["category"], "Тень");
    assert_eq!(prophecy["text"], "Во тьме ты найдёшь свой путь.");
    assert_eq!(prophecy["source"], "remote");
}

#[tokio::test]
async fn prophecy_timeouts_fall_back_to_fixed_narrative() {
    let provider = MockAIProvider::new().with_delay(Duration::from_millis(400));
    let app = app(&provider);

    let (status, json) = send(
        &app,
        post(
            format!("/api/sessions/{}/prophecy", SessionId::new()),
            json!({"category": "Маг"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["text"], Category::Mage.profile().prophecy);
    assert_eq!(json["source"], "local_fallback");
    assert_eq!(json["failures"][0]["kind"], "network_timeout");
}

#[tokio::test]
async fn unknown_category_is_rejected() {
    let provider = MockAIProvider::new();
    let app = app(&provider);

    let (status, json) = send(
        &app,
        post(
            format!("/api/sessions/{}/prophecy", SessionId::new()),
            json!({"category": "warrior"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "UNKNOWN_CATEGORY");
    assert_eq!(provider.call_count(), 0);
}

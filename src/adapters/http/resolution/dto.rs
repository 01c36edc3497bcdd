//! HTTP DTOs for resolution endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::archetype::{
    ArchetypeResult, AttemptFailure, Category, ProphecyOutcome, ProphecySource, QuizAnswer,
    ResolutionOutcome, StrategyUsed,
};
use crate::domain::foundation::{Timestamp, ValidationError};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to resolve a session's archetype.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveArchetypeRequest {
    #[serde(default)]
    pub answers: Vec<QuizAnswer>,
}

/// Request to resolve a session's prophecy. `category` is a category label.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolveProphecyRequest {
    pub category: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Resolved archetype plus how it was obtained.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeResponse {
    #[serde(flatten)]
    pub result: ArchetypeResult,
    pub strategy_used: StrategyUsed,
    pub attempts: u32,
    pub failures: Vec<AttemptFailure>,
    pub resolved_at: Timestamp,
}

impl From<ResolutionOutcome> for ArchetypeResponse {
    fn from(outcome: ResolutionOutcome) -> Self {
        Self {
            result: outcome.result,
            strategy_used: outcome.strategy_used,
            attempts: outcome.attempts,
            failures: outcome.failures,
            resolved_at: outcome.resolved_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProphecyResponse {
    pub category: Category,
    pub text: String,
    pub source: ProphecySource,
    pub attempts: u32,
    pub failures: Vec<AttemptFailure>,
}

impl From<ProphecyOutcome> for ProphecyResponse {
    fn from(outcome: ProphecyOutcome) -> Self {
        Self {
            category: outcome.category,
            text: outcome.text,
            source: outcome.source,
            attempts: outcome.attempts,
            failures: outcome.failures,
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// Request-level failures. Resolution itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid session id: {0}")]
    InvalidSessionId(ValidationError),

    #[error("{0}")]
    UnknownCategory(ValidationError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidSessionId(_) => StatusCode::BAD_REQUEST,
            ApiError::UnknownCategory(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidSessionId(_) => "BAD_REQUEST",
            ApiError::UnknownCategory(_) => "UNKNOWN_CATEGORY",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::new(self.code(), self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

//! HTTP routes for resolution endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{health, reset_session, resolve_archetype, resolve_prophecy};
use crate::application::resolution::SessionRegistry;

/// Creates the resolution router with all endpoints.
pub fn resolution_routes(registry: SessionRegistry) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sessions/:session_id/archetype", post(resolve_archetype))
        .route("/api/sessions/:session_id/prophecy", post(resolve_prophecy))
        .route("/api/sessions/:session_id", delete(reset_session))
        .with_state(registry)
}

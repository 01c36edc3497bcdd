//! HTTP adapters - REST API implementations.

pub mod resolution;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::application::resolution::SessionRegistry;

pub use resolution::resolution_routes;

/// The full application router with request tracing.
pub fn app_router(registry: SessionRegistry) -> Router {
    resolution_routes(registry).layer(TraceLayer::new_for_http())
}

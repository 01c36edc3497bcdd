//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the resolution engine to external systems:
//! - `ai` - text-generation providers (OpenAI-compatible relay, mock)
//! - `http` - the axum REST surface

pub mod ai;
pub mod http;

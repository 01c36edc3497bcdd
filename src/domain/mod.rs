//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine trait)
//! - `archetype` - Categories, scoring, response parsing, validation and local fallback

pub mod archetype;
pub mod foundation;

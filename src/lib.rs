//! Archetype Engine - archetype and prophecy resolution for gamified onboarding
//!
//! Classifies a player's quiz answers into one of four archetypes using a
//! remote text generator, and produces a short prophecy for the result.
//! Both resolutions always land: unusable generator output falls back to a
//! deterministic local classifier and fixed narratives.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

//! Resolution deadlines, retry delay and the local fallback table

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::resolution::{ResolutionSettings, RetryPolicy};
use crate::domain::archetype::FallbackRules;

/// Resolver timing. The retry count is fixed at one and not configurable.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolutionConfig {
    /// Per-attempt deadline for archetype classification
    #[serde(default = "default_timeout_secs")]
    pub archetype_timeout_secs: u64,

    /// Per-attempt deadline for prophecy generation
    #[serde(default = "default_timeout_secs")]
    pub prophecy_timeout_secs: u64,

    /// Pause before the single retry
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Idle time after which a session and its landed results are dropped
    #[serde(default = "default_session_idle_ttl_secs")]
    pub session_idle_ttl_secs: u64,

    /// Tie-break priority and keyword table for the local classifier
    #[serde(default)]
    pub fallback: FallbackRules,
}

impl ResolutionConfig {
    pub fn archetype_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_secs(self.archetype_timeout_secs),
            Duration::from_millis(self.retry_delay_ms),
        )
    }

    pub fn prophecy_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_secs(self.prophecy_timeout_secs),
            Duration::from_millis(self.retry_delay_ms),
        )
    }

    /// Validate resolution configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.archetype_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("resolution.archetype_timeout_secs"));
        }
        if self.prophecy_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout("resolution.prophecy_timeout_secs"));
        }
        if self.session_idle_ttl_secs == 0 {
            return Err(ValidationError::InvalidTimeout("resolution.session_idle_ttl_secs"));
        }
        self.fallback
            .validate()
            .map_err(|e| ValidationError::InvalidFallbackRules(e.to_string()))
    }

    /// Builds resolver settings; sampling parameters come from the AI section.
    pub fn settings(&self, temperature: f32, max_tokens: u32) -> ResolutionSettings {
        ResolutionSettings {
            archetype: self.archetype_policy(),
            prophecy: self.prophecy_policy(),
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
            fallback_rules: self.fallback.clone(),
            session_idle_ttl: Duration::from_secs(self.session_idle_ttl_secs),
        }
    }
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            archetype_timeout_secs: default_timeout_secs(),
            prophecy_timeout_secs: default_timeout_secs(),
            retry_delay_ms: default_retry_delay_ms(),
            session_idle_ttl_secs: default_session_idle_ttl_secs(),
            fallback: FallbackRules::default(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_retry_delay_ms() -> u64 {
    1500
}

fn default_session_idle_ttl_secs() -> u64 {
    30 * 60
}

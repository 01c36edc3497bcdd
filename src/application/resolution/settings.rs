//! Settings shared by every resolver of a registry.

use std::time::Duration;

use super::RetryPolicy;
use crate::domain::archetype::FallbackRules;

/// Per-process resolution settings, built once from configuration.
#[derive(Debug, Clone)]
pub struct ResolutionSettings {
    pub archetype: RetryPolicy,
    pub prophecy: RetryPolicy,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub fallback_rules: FallbackRules,
    /// Sessions untouched for this long are dropped from the registry.
    pub session_idle_ttl: Duration,
}

impl Default for ResolutionSettings {
    fn default() -> Self {
        Self {
            archetype: RetryPolicy::default(),
            prophecy: RetryPolicy::default(),
            temperature: Some(0.7),
            max_tokens: Some(400),
            fallback_rules: FallbackRules::default(),
            session_idle_ttl: Duration::from_secs(30 * 60),
        }
    }
}

impl ResolutionSettings {
    /// Uses the same deadline and retry delay for both resolvers.
    pub fn with_policy(mut self, attempt_timeout: Duration, retry_delay: Duration) -> Self {
        let policy = RetryPolicy::new(attempt_timeout, retry_delay);
        self.archetype = policy;
        self.prophecy = policy;
        self
    }

    pub fn with_session_idle_ttl(mut self, ttl: Duration) -> Self {
        self.session_idle_ttl = ttl;
        self
    }
}

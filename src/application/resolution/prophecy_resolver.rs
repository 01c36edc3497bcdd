//! ProphecyResolver - narrative text keyed by an already-resolved category.
//!
//! Same retry/fallback shape as the archetype resolver: one retry after a
//! fixed delay, then the category's fixed narrative. Its guard is separate
//! from the archetype guard.

use std::sync::Arc;

use super::retry::timed_completion;
use super::{ResolutionSettings, RetryPolicy, SingleFlightGuard};
use crate::domain::archetype::{prompts, AttemptFailure, Category, ProphecyOutcome, ProphecySource};
use crate::domain::foundation::SessionId;
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Characters stripped from both ends of generated prophecy text.
const QUOTE_CHARS: &[char] = &['"', '\'', '«', '»', '“', '”', '„'];

pub struct ProphecyResolver {
    session_id: SessionId,
    provider: Arc<dyn AIProvider>,
    settings: Arc<ResolutionSettings>,
    guard: SingleFlightGuard<ProphecyOutcome>,
}

impl ProphecyResolver {
    pub fn new(
        session_id: SessionId,
        provider: Arc<dyn AIProvider>,
        settings: Arc<ResolutionSettings>,
    ) -> Self {
        Self {
            session_id,
            provider,
            settings,
            guard: SingleFlightGuard::new(),
        }
    }

    /// The landed prophecy, if any.
    pub fn outcome(&self) -> Option<&ProphecyOutcome> {
        self.guard.landed()
    }

    /// Resolves the prophecy for `category`. Never fails.
    ///
    /// Once landed, the stored prophecy is returned for any category.
    pub async fn resolve(&mut self, category: Category) -> ProphecyOutcome {
        if let Some(outcome) = self.guard.landed() {
            tracing::debug!(session_id = %self.session_id, "prophecy already resolved");
            return outcome.clone();
        }
        self.guard.begin();

        let policy = self.settings.prophecy;
        let mut failures = Vec::new();

        for attempt in 1..=RetryPolicy::MAX_ATTEMPTS {
            let request = self.build_request(category, attempt);
            let text = timed_completion(self.provider.as_ref(), request, policy.attempt_timeout)
                .await
                .and_then(|text| clean_prophecy(&text).ok_or(AttemptFailure::EmptyResponse));

            match text {
                Ok(text) => {
                    return self.land(category, text, ProphecySource::Remote, attempt, failures);
                }
                Err(failure) => {
                    tracing::warn!(
                        session_id = %self.session_id,
                        attempt,
                        kind = failure.kind(),
                        error = %failure,
                        "prophecy attempt failed"
                    );
                    failures.push(failure);
                    if policy.allows_retry_after(attempt) {
                        tokio::time::sleep(policy.retry_delay).await;
                    }
                }
            }
        }

        let text = category.profile().prophecy.to_string();
        self.land(
            category,
            text,
            ProphecySource::LocalFallback,
            RetryPolicy::MAX_ATTEMPTS,
            failures,
        )
    }

    /// Clears the guard.
    pub fn reset(&mut self) {
        self.guard.reset();
    }

    fn build_request(&self, category: Category, attempt: u32) -> CompletionRequest {
        let metadata = RequestMetadata::new(
            self.session_id,
            format!("prophecy-{}-{}", self.session_id, attempt),
        );
        let mut request = CompletionRequest::new(metadata)
            .with_system_prompt(prompts::PROPHECY_SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompts::prophecy_user_prompt(category));
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    fn land(
        &mut self,
        category: Category,
        text: String,
        source: ProphecySource,
        attempts: u32,
        failures: Vec<AttemptFailure>,
    ) -> ProphecyOutcome {
        tracing::info!(
            session_id = %self.session_id,
            category = %category,
            source = ?source,
            attempts,
            "prophecy resolved"
        );
        let outcome = ProphecyOutcome {
            category,
            text,
            source,
            attempts,
            failures,
        };
        self.guard.land(outcome.clone());
        outcome
    }
}

/// Trims whitespace and wrapping quotes; `None` if nothing is left.
fn clean_prophecy(raw: &str) -> Option<String> {
    let text = raw.trim().trim_matches(QUOTE_CHARS).trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

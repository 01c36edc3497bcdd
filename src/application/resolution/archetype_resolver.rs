//! ArchetypeResolver - drives one archetype resolution for a session.
//!
//! `Idle -> Requesting -> Parsing -> Validating -> Success`, with one retry
//! after a fixed delay and a local fallback once the remote budget is spent.
//! Every failure (timeout, transport, empty text, unparseable text, unknown
//! category) counts as one failed attempt; none of them escape to the caller.

use std::sync::Arc;

use super::retry::timed_completion;
use super::{ResolutionSettings, RetryPolicy, SingleFlightGuard};
use crate::domain::archetype::{
    aggregate, parse, prompts, validate, ArchetypeResult, AttemptFailure, LocalFallbackClassifier,
    ParseStrategy, QuizAnswer, ResolutionOutcome, ResolutionPhase, ScoreVector, StrategyUsed,
};
use crate::domain::foundation::{SessionId, StateMachine, Timestamp};
use crate::ports::{AIProvider, CompletionRequest, MessageRole, RequestMetadata};

/// Resolution orchestrator for one session.
pub struct ArchetypeResolver {
    session_id: SessionId,
    provider: Arc<dyn AIProvider>,
    settings: Arc<ResolutionSettings>,
    classifier: LocalFallbackClassifier,
    guard: SingleFlightGuard<ResolutionOutcome>,
    phase: ResolutionPhase,
}

impl ArchetypeResolver {
    pub fn new(
        session_id: SessionId,
        provider: Arc<dyn AIProvider>,
        settings: Arc<ResolutionSettings>,
    ) -> Self {
        let classifier = LocalFallbackClassifier::new(settings.fallback_rules.clone());
        Self {
            session_id,
            provider,
            settings,
            classifier,
            guard: SingleFlightGuard::new(),
            phase: ResolutionPhase::Idle,
        }
    }

    /// Current phase of the state machine.
    pub fn phase(&self) -> ResolutionPhase {
        self.phase
    }

    /// The landed outcome, if resolution already succeeded.
    pub fn outcome(&self) -> Option<&ResolutionOutcome> {
        self.guard.landed()
    }

    /// Resolves the archetype for `answers`.
    ///
    /// Always returns an outcome. Once an outcome has landed, later calls
    /// return it unchanged without touching the provider.
    pub async fn resolve(&mut self, answers: &[QuizAnswer]) -> ResolutionOutcome {
        if let Some(outcome) = self.guard.landed() {
            tracing::debug!(session_id = %self.session_id, "archetype already resolved");
            return outcome.clone();
        }
        self.guard.begin();
        self.phase = ResolutionPhase::Idle;

        let policy = self.settings.archetype;
        let scores = aggregate(answers);
        let mut failures = Vec::new();

        for attempt in 1..=RetryPolicy::MAX_ATTEMPTS {
            self.advance(ResolutionPhase::Requesting);
            match self.attempt(answers, &scores, attempt, &policy).await {
                Ok((result, strategy)) => {
                    self.advance(ResolutionPhase::Success);
                    return self.land(result, strategy.into(), attempt, failures);
                }
                Err(failure) => {
                    tracing::warn!(
                        session_id = %self.session_id,
                        attempt,
                        kind = failure.kind(),
                        error = %failure,
                        "archetype attempt failed"
                    );
                    failures.push(failure);
                    if policy.allows_retry_after(attempt) {
                        self.advance(ResolutionPhase::RetryPending);
                        tokio::time::sleep(policy.retry_delay).await;
                    }
                }
            }
        }

        self.advance(ResolutionPhase::FallbackAnalysis);
        let result = self.classifier.classify(answers, &scores);
        self.advance(ResolutionPhase::Success);
        self.land(result, StrategyUsed::LocalFallback, RetryPolicy::MAX_ATTEMPTS, failures)
    }

    /// Clears the guard and all intermediate state.
    pub fn reset(&mut self) {
        self.guard.reset();
        self.phase = ResolutionPhase::Idle;
    }

    async fn attempt(
        &mut self,
        answers: &[QuizAnswer],
        scores: &ScoreVector,
        attempt: u32,
        policy: &RetryPolicy,
    ) -> Result<(ArchetypeResult, ParseStrategy), AttemptFailure> {
        let request = self.build_request(answers, scores, attempt);
        let text = timed_completion(self.provider.as_ref(), request, policy.attempt_timeout).await?;

        self.advance(ResolutionPhase::Parsing);
        let parsed = parse(&text).ok_or(AttemptFailure::ParseFailure)?;

        self.advance(ResolutionPhase::Validating);
        let rejected_type = parsed.candidate.category.clone();
        let result = validate(parsed.candidate)
            .map_err(|_| AttemptFailure::InvalidCategory(rejected_type))?;

        Ok((result, parsed.strategy))
    }

    fn build_request(
        &self,
        answers: &[QuizAnswer],
        scores: &ScoreVector,
        attempt: u32,
    ) -> CompletionRequest {
        let metadata = RequestMetadata::new(
            self.session_id,
            format!("archetype-{}-{}", self.session_id, attempt),
        );
        let mut request = CompletionRequest::new(metadata)
            .with_system_prompt(prompts::ARCHETYPE_SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompts::archetype_user_prompt(answers, scores));
        if let Some(temperature) = self.settings.temperature {
            request = request.with_temperature(temperature);
        }
        if let Some(max_tokens) = self.settings.max_tokens {
            request = request.with_max_tokens(max_tokens);
        }
        request
    }

    fn advance(&mut self, next: ResolutionPhase) {
        debug_assert!(
            self.phase.can_transition_to(&next),
            "invalid phase transition {:?} -> {:?}",
            self.phase,
            next
        );
        tracing::debug!(session_id = %self.session_id, from = ?self.phase, to = ?next, "archetype phase");
        self.phase = next;
    }

    fn land(
        &mut self,
        result: ArchetypeResult,
        strategy_used: StrategyUsed,
        attempts: u32,
        failures: Vec<AttemptFailure>,
    ) -> ResolutionOutcome {
        let outcome = ResolutionOutcome {
            result,
            strategy_used,
            attempts,
            failures,
            resolved_at: Timestamp::now(),
        };
        tracing::info!(
            session_id = %self.session_id,
            category = %outcome.result.category(),
            term = outcome.result.category().term(),
            strategy = outcome.strategy_used.as_str(),
            attempts,
            "archetype resolved"
        );
        self.guard.land(outcome.clone());
        outcome
    }
}

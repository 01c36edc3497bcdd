//! Retry policy and the time-bounded remote call shared by both resolvers.

use std::time::Duration;

use crate::domain::archetype::AttemptFailure;
use crate::ports::{AIProvider, CompletionRequest};

/// Deadline and back-off for one resolver.
///
/// The attempt count is fixed: one initial call plus at most one retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Deadline for a single remote round trip.
    pub attempt_timeout: Duration,
    /// Pause before the retry.
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Initial call plus one retry.
    pub const MAX_ATTEMPTS: u32 = 2;

    pub fn new(attempt_timeout: Duration, retry_delay: Duration) -> Self {
        Self {
            attempt_timeout,
            retry_delay,
        }
    }

    /// True if another attempt may follow `attempt` (1-based).
    pub fn allows_retry_after(&self, attempt: u32) -> bool {
        attempt < Self::MAX_ATTEMPTS
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(15),
            retry_delay: Duration::from_millis(1500),
        }
    }
}

/// Issues one completion under `timeout`.
///
/// On expiry the provider future is dropped, which cancels the in-flight
/// HTTP request, and the attempt is reported as an ordinary failure.
pub(crate) async fn timed_completion(
    provider: &dyn AIProvider,
    request: CompletionRequest,
    timeout: Duration,
) -> Result<String, AttemptFailure> {
    let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

    match tokio::time::timeout(timeout, provider.complete(request)).await {
        Err(_elapsed) => Err(AttemptFailure::NetworkTimeout { timeout_ms }),
        Ok(Err(err)) if err.is_timeout() => Err(AttemptFailure::NetworkTimeout { timeout_ms }),
        Ok(Err(err)) => Err(AttemptFailure::TransportError(err.to_string())),
        Ok(Ok(response)) if response.content.trim().is_empty() => {
            Err(AttemptFailure::EmptyResponse)
        }
        Ok(Ok(response)) => Ok(response.content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::foundation::SessionId;
    use crate::ports::RequestMetadata;

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new(SessionId::new(), "trace"))
    }

    #[test]
    fn policy_allows_exactly_one_retry() {
        let policy = RetryPolicy::default();
        assert!(policy.allows_retry_after(1));
        assert!(!policy.allows_retry_after(2));
    }

    #[test]
    fn default_policy_uses_fifteen_second_budget() {
        assert_eq!(RetryPolicy::default().attempt_timeout, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn returns_text_on_success() {
        let provider = MockAIProvider::new().with_response("hello");
        let text = timed_completion(&provider, request(), Duration::from_secs(1))
            .await
            .unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn deadline_expiry_is_network_timeout() {
        let provider = MockAIProvider::new()
            .with_response("late")
            .with_delay(Duration::from_millis(200));
        let err = timed_completion(&provider, request(), Duration::from_millis(20))
            .await
            .unwrap_err();
        assert_eq!(err, AttemptFailure::NetworkTimeout { timeout_ms: 20 });
    }

    #[tokio::test]
    async fn provider_timeout_is_network_timeout() {
        let provider = MockAIProvider::new().with_error(MockError::Timeout { timeout_secs: 1 });
        let err = timed_completion(&provider, request(), Duration::from_millis(500))
            .await
            .unwrap_err();
        assert!(matches!(err, AttemptFailure::NetworkTimeout { .. }));
    }

    #[tokio::test]
    async fn other_errors_are_transport_errors() {
        let provider = MockAIProvider::new().with_error(MockError::Unavailable {
            message: "down".into(),
        });
        let err = timed_completion(&provider, request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AttemptFailure::TransportError("provider unavailable: down".into())
        );
    }

    #[tokio::test]
    async fn whitespace_is_empty_response() {
        let provider = MockAIProvider::new().with_response("  \n ");
        let err = timed_completion(&provider, request(), Duration::from_secs(1))
            .await
            .unwrap_err();
        assert_eq!(err, AttemptFailure::EmptyResponse);
    }
}

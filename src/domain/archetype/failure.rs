//! AttemptFailure - why a single remote resolution attempt was discarded.
//!
//! None of these reach the end user. They feed the retry/fallback policy and
//! are kept on the outcome for diagnostics.

use serde::Serialize;

/// Failure of one remote round trip.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum AttemptFailure {
    /// The remote call exceeded its deadline and was cancelled.
    #[error("remote call exceeded its {timeout_ms}ms deadline")]
    NetworkTimeout { timeout_ms: u64 },

    /// Non-timeout network or HTTP failure.
    #[error("transport error: {0}")]
    TransportError(String),

    /// The call succeeded but returned no usable text.
    #[error("remote call returned an empty response")]
    EmptyResponse,

    /// Every parsing strategy failed.
    #[error("no parsing strategy produced a candidate")]
    ParseFailure,

    /// The parsed `type` is outside the whitelist.
    #[error("'{0}' is not a known category")]
    InvalidCategory(String),
}

impl AttemptFailure {
    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptFailure::NetworkTimeout { .. } => "network_timeout",
            AttemptFailure::TransportError(_) => "transport_error",
            AttemptFailure::EmptyResponse => "empty_response",
            AttemptFailure::ParseFailure => "parse_failure",
            AttemptFailure::InvalidCategory(_) => "invalid_category",
        }
    }
}

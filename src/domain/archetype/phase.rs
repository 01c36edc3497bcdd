//! ResolutionPhase - states of one archetype resolution.
//!
//! ```text
//! Idle -> Requesting -> Parsing -> Validating -> Success
//!            |            |           |
//!            +------------+-----------+--> RetryPending -> Requesting
//!            +------------+-----------+--> FallbackAnalysis -> Success
//! ```
//!
//! `Success` is terminal. Only an explicit session reset returns to `Idle`.

use serde::Serialize;

use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPhase {
    #[default]
    Idle,
    Requesting,
    Parsing,
    Validating,
    RetryPending,
    FallbackAnalysis,
    Success,
}

impl ResolutionPhase {
    /// Phases in which an attempt can fail.
    pub fn is_attempt_phase(&self) -> bool {
        matches!(
            self,
            ResolutionPhase::Requesting | ResolutionPhase::Parsing | ResolutionPhase::Validating
        )
    }
}

impl StateMachine for ResolutionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ResolutionPhase::*;
        match (self, target) {
            (Idle, Requesting) => true,
            (Requesting, Parsing) | (Parsing, Validating) | (Validating, Success) => true,
            (from, RetryPending) | (from, FallbackAnalysis) => from.is_attempt_phase(),
            (RetryPending, Requesting) => true,
            (FallbackAnalysis, Success) => true,
            _ => false,
        }
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use ResolutionPhase::*;
        match self {
            Idle => vec![Requesting],
            Requesting => vec![Parsing, RetryPending, FallbackAnalysis],
            Parsing => vec![Validating, RetryPending, FallbackAnalysis],
            Validating => vec![Success, RetryPending, FallbackAnalysis],
            RetryPending => vec![Requesting],
            FallbackAnalysis => vec![Success],
            Success => vec![],
        }
    }
}

//! Archetype Domain Module
//!
//! Turns a handful of weighted quiz answers into one of four closed
//! categories and a short narrative, tolerating an unreliable text generator.
//!
//! # Architecture
//!
//! - **ScoreVector**: folds answer weights into per-category totals
//! - **Parser**: four-strategy cascade over free-form generator output
//! - **Validator**: whitelist check plus narrative defaults
//! - **LocalFallbackClassifier**: total, offline classification
//! - **ResolutionPhase**: the orchestrator's state machine
//!
//! Everything here is pure. Remote calls, retries and single-flight
//! guarding live in `application::resolution`.

mod answer;
mod category;
mod failure;
mod fallback;
mod outcome;
mod parser;
mod phase;
mod profile;
pub mod prompts;
mod score;
mod validator;

pub use answer::QuizAnswer;
pub use category::Category;
pub use failure::AttemptFailure;
pub use fallback::{FallbackRules, LocalFallbackClassifier};
pub use outcome::{ArchetypeResult, ProphecyOutcome, ProphecySource, ResolutionOutcome, StrategyUsed};
pub use parser::{
    direct_parse, field_extraction, keyword_analysis, parse, regex_extraction,
    ArchetypeCandidate, ParseStrategy, ParsedResponse,
};
pub use phase::ResolutionPhase;
pub use profile::CategoryProfile;
pub use score::{aggregate, ScoreVector};
pub use validator::validate;

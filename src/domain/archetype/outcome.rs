//! Resolution results handed back to the onboarding flow.

use serde::Serialize;

use super::{AttemptFailure, Category, ParseStrategy};
use crate::domain::foundation::Timestamp;

/// A whitelisted archetype with non-empty narrative fields.
///
/// Only constructible through [`ArchetypeResult::new`] or
/// [`ArchetypeResult::from_defaults`], both of which guarantee the
/// non-empty invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeResult {
    #[serde(rename = "type")]
    category: Category,
    description: String,
    call_to_action: String,
}

impl ArchetypeResult {
    /// Builds a result, substituting category defaults for blank fields.
    pub fn new(
        category: Category,
        description: Option<String>,
        call_to_action: Option<String>,
    ) -> Self {
        let profile = category.profile();
        let pick = |value: Option<String>, default: &str| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        Self {
            category,
            description: pick(description, profile.description),
            call_to_action: pick(call_to_action, profile.call_to_action),
        }
    }

    /// A result made entirely of category defaults.
    pub fn from_defaults(category: Category) -> Self {
        Self::new(category, None, None)
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn call_to_action(&self) -> &str {
        &self.call_to_action
    }
}

/// Which path produced the final archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyUsed {
    DirectParse,
    RegexExtraction,
    FieldExtraction,
    KeywordAnalysis,
    LocalFallback,
}

impl StrategyUsed {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyUsed::DirectParse => "direct_parse",
            StrategyUsed::RegexExtraction => "regex_extraction",
            StrategyUsed::FieldExtraction => "field_extraction",
            StrategyUsed::KeywordAnalysis => "keyword_analysis",
            StrategyUsed::LocalFallback => "local_fallback",
        }
    }
}

impl From<ParseStrategy> for StrategyUsed {
    fn from(strategy: ParseStrategy) -> Self {
        match strategy {
            ParseStrategy::DirectParse => StrategyUsed::DirectParse,
            ParseStrategy::RegexExtraction => StrategyUsed::RegexExtraction,
            ParseStrategy::FieldExtraction => StrategyUsed::FieldExtraction,
            ParseStrategy::KeywordAnalysis => StrategyUsed::KeywordAnalysis,
        }
    }
}

/// Final archetype resolution for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutcome {
    pub result: ArchetypeResult,
    pub strategy_used: StrategyUsed,
    /// Remote attempts made (0 is never reported; fallback reports the full budget).
    pub attempts: u32,
    /// Failed attempts in order, for debugging.
    pub failures: Vec<AttemptFailure>,
    pub resolved_at: Timestamp,
}

/// Where the prophecy text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProphecySource {
    Remote,
    LocalFallback,
}

/// Final prophecy resolution for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProphecyOutcome {
    pub category: Category,
    pub text: String,
    pub source: ProphecySource,
    pub attempts: u32,
    pub failures: Vec<AttemptFailure>,
}

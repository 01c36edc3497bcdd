//! Result validator - whitelist check plus narrative defaults.

use super::{ArchetypeCandidate, ArchetypeResult, Category};
use crate::domain::foundation::ValidationError;

/// Validates a parsed candidate.
///
/// An unknown `type` is a hard rejection. Missing or blank narrative fields
/// are filled from the category's defaults.
pub fn validate(candidate: ArchetypeCandidate) -> Result<ArchetypeResult, ValidationError> {
    let category = candidate.category.parse::<Category>()?;
    Ok(ArchetypeResult::new(
        category,
        candidate.description,
        candidate.call_to_action,
    ))
}

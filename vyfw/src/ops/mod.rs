//! Mutation operations.
//!
//! One module per entity. Every operation follows the same contract:
//! load the current document (migrating on read), validate the input,
//! apply exactly one change, re-sort any affected rule order, persist,
//! and report success or a specific failure. A rejected input never
//! reaches the store.

pub mod chains;
pub mod extras;
pub mod filters;
pub mod flowtables;
pub mod groups;
pub mod interfaces;

use crate::error::ValidationError;

/// Rule numbers are non-negative integers kept as strings in the
/// document. Trims and validates; rejects everything else.
pub(crate) fn validated_rule_number(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField("rule number"));
    }
    if trimmed.parse::<u64>().is_err() {
        return Err(ValidationError::InvalidRuleNumber(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

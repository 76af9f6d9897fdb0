use crate::id::ModelId;
use thiserror::Error;

/// Errors raised by domain-type constructors and invariants.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("invalid model identifier '{value}': {reason}")]
    InvalidIdentifier { value: String, reason: &'static str },

    #[error("duplicate model in bundle: {id}")]
    DuplicateModel { id: ModelId },
}

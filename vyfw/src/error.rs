use thiserror::Error;

use crate::store::StoreError;

/// A mutation input rejected before any write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("IP version of the rule must match the IP version of the referenced group")]
    IpVersionMismatch,
    #[error("old and new rule numbers must be different")]
    SameRuleNumber,
    #[error("rule number '{0}' is not a non-negative integer")]
    InvalidRuleNumber(String),
    #[error("rule number {0} already exists")]
    RuleNumberInUse(String),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
    #[error("snapshot labels must differ")]
    SameSnapshot,
    #[error("a jump rule requires {0}")]
    MissingJumpField(&'static str),
    #[error("an offload rule requires a target flowtable")]
    MissingOffloadTarget,
}

/// Any failure an operation can report. Operations never panic and never
/// leave a partial write behind.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },
    #[error("stored document for '{name}' could not be decoded: {source}")]
    Decode {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("document could not be serialized: {0}")]
    Encode(#[source] serde_json::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    pub fn not_found(kind: &'static str, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

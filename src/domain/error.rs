//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the unit hierarchy rules.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("unsupported operation on leaf unit '{label}': {operation}")]
    UnsupportedOperation { label: String, operation: String },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cycle detected: '{child}' is an ancestor of '{parent}'")]
    CycleDetected { parent: String, child: String },

    #[error("unit '{child}' is already attached to '{parent}'")]
    AlreadyAttached { child: String, parent: String },

    #[error("duplicate unit name: {0}")]
    DuplicateUnit(String),

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("unit label '{label}' is ambiguous ({matches} units), use the unit name")]
    AmbiguousUnit { label: String, matches: usize },

    #[error("attaching '{child}' below '{parent}' exceeds the maximum depth of {max} levels")]
    DepthExceeded {
        parent: String,
        child: String,
        max: usize,
    },

    #[error("invalid chart definition: {message}")]
    InvalidChart { message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a local, synchronous validation failure. Nothing here is
/// retryable; storage and transport failures belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The action is not in the allowed set for the entity's current status.
    #[error("action '{action}' is not allowed while status is '{status}'")]
    InvalidTransition { status: String, action: String },

    /// A "mark" action was submitted without its measurement payload.
    #[error("missing measurement: {0}")]
    MissingMeasurement(&'static str),

    /// A measurement value was negative, NaN or infinite.
    #[error("malformed dimension: {0}")]
    MalformedDimension(String),

    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found")]
    NotFound,

    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn invalid_transition(status: impl core::fmt::Display, action: impl core::fmt::Display) -> Self {
        Self::InvalidTransition {
            status: status.to_string(),
            action: action.to_string(),
        }
    }

    pub fn missing_measurement(field: &'static str) -> Self {
        Self::MissingMeasurement(field)
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDimension(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_status_and_action() {
        let err = DomainError::invalid_transition("cut", "markDressed");
        assert_eq!(
            err.to_string(),
            "action 'markDressed' is not allowed while status is 'cut'"
        );
    }

    #[test]
    fn missing_measurement_names_the_field() {
        let err = DomainError::missing_measurement("dressDimensions");
        assert_eq!(err.to_string(), "missing measurement: dressDimensions");
    }
}

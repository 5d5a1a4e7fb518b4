//! Domain errors for the auth policy gate.

/// Errors raised while assembling a gate. Evaluation itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("invalid gate configuration: {0}")]
    InvalidConfig(String),
}

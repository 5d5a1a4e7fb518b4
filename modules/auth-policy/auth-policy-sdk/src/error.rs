//! Error types for auth policy collaborators.

/// Failure reported by a gate collaborator.
///
/// The gate never forwards these to its caller. Any variant turns into a
/// retryable denial attributed to the policy that made the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthPolicyError {
    /// The backing service could not be reached or is not ready.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// The backing store answered with an error (query failure, bad row).
    #[error("backend error: {0}")]
    Backend(String),

    /// Unexpected failure inside the collaborator.
    #[error("internal error: {0}")]
    Internal(String),
}

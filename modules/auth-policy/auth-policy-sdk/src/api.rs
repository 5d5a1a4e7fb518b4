//! Public API trait for the auth policy gate.

use async_trait::async_trait;

use crate::models::{CheckRequest, PolicyDecision};

/// Public API trait for the auth policy gate.
///
/// Consumed by authentication endpoints before any auth business logic
/// runs:
///
/// ```ignore
/// let decision = gate.check(request).await;
/// if !decision.allowed {
///     return Err(map_denial(&decision));
/// }
/// ```
///
/// The call is infallible: every collaborator failure is already folded
/// into a denied [`PolicyDecision`].
#[async_trait]
pub trait AuthPolicyGatewayClient: Send + Sync {
    /// Evaluate all policies for an auth action, in order, stopping at the
    /// first denial.
    async fn check(&self, request: CheckRequest) -> PolicyDecision;
}

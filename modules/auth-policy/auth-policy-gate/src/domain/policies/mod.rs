//! The four policies of the gate, in evaluation order.

pub mod abuse;
pub mod account_status;
pub mod feature_flag;
pub mod rate_limit;

use async_trait::async_trait;
use auth_policy_sdk::{AuthSettings, CheckRequest, PolicyKind};

use super::outcome::PolicyOutcome;

pub use abuse::AbusePolicy;
pub use account_status::AccountStatusPolicy;
pub use feature_flag::FeatureFlagPolicy;
pub use rate_limit::RateLimitPolicy;

/// Per-call state shared by every policy of one `check()`.
#[derive(Debug, Clone)]
pub struct PolicyContext {
    /// Snapshot loaded by the feature-flag policy for this call only.
    pub settings: AuthSettings,
}

/// One step of the gate chain.
#[async_trait]
pub trait PolicyEvaluator: Send + Sync {
    fn kind(&self) -> PolicyKind;

    /// Evaluate the policy. Never fails: collaborator errors and panics
    /// come back as [`PolicyOutcome::DenyEvaluationFailed`].
    async fn evaluate(&self, request: &CheckRequest, ctx: &PolicyContext) -> PolicyOutcome;
}

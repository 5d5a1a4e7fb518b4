//! Per-policy outcomes and their mapping to a [`PolicyDecision`].
//!
//! Retryability is a property of the outcome variant, never of the call
//! site that produced it.

use auth_policy_sdk::{DecisionMetadata, PolicyDecision, PolicyKind};

pub const UNSUPPORTED_ACTION_REASON: &str = "Unsupported auth action";
pub const ACCOUNT_SUSPENDED_REASON: &str = "Account has been suspended";
pub const ACCOUNT_INACTIVE_REASON: &str = "Account is inactive";
pub const RATE_LIMITED_REASON: &str = "Too many attempts. Please try again later.";
pub const ABUSE_DETECTED_REASON: &str = "Request blocked due to suspicious activity";

/// A denial a policy confirmed on the basis of data it could read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Denial {
    /// The action is switched off in settings.
    FeatureDisabled { reason: String },
    /// The action name is not one the gate knows.
    UnsupportedAction,
    AccountSuspended { reason: Option<String> },
    AccountInactive,
    RateLimited {
        retry_after_secs: u64,
        blocked_until: Option<i64>,
    },
    AbuseDetected,
}

impl Denial {
    /// Settings can be flipped back and rate-limit blocks expire; nothing
    /// else changes by waiting.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::FeatureDisabled { .. } | Self::RateLimited { .. })
    }

    #[must_use]
    pub fn reason(&self) -> String {
        match self {
            Self::FeatureDisabled { reason } => reason.clone(),
            Self::UnsupportedAction => UNSUPPORTED_ACTION_REASON.to_owned(),
            Self::AccountSuspended { reason } => reason
                .clone()
                .unwrap_or_else(|| ACCOUNT_SUSPENDED_REASON.to_owned()),
            Self::AccountInactive => ACCOUNT_INACTIVE_REASON.to_owned(),
            Self::RateLimited { .. } => RATE_LIMITED_REASON.to_owned(),
            Self::AbuseDetected => ABUSE_DETECTED_REASON.to_owned(),
        }
    }

    fn metadata(&self) -> Option<DecisionMetadata> {
        match self {
            Self::AccountSuspended { reason } => Some(DecisionMetadata {
                suspended: Some(true),
                suspended_reason: reason.clone(),
                ..DecisionMetadata::default()
            }),
            Self::AccountInactive => Some(DecisionMetadata {
                active: Some(false),
                ..DecisionMetadata::default()
            }),
            Self::RateLimited {
                blocked_until: Some(until),
                ..
            } => Some(DecisionMetadata {
                blocked_until: Some(*until),
                ..DecisionMetadata::default()
            }),
            Self::FeatureDisabled { .. }
            | Self::UnsupportedAction
            | Self::RateLimited {
                blocked_until: None,
                ..
            }
            | Self::AbuseDetected => None,
        }
    }

    fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Self::RateLimited {
                retry_after_secs, ..
            } => Some(*retry_after_secs),
            _ => None,
        }
    }
}

/// Result of evaluating one policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyOutcome {
    /// Continue with the next policy.
    Allow,
    /// Settings could not be loaded.
    DenyConfigUnavailable,
    DenyConfirmed(Denial),
    /// The collaborator errored or panicked.
    DenyEvaluationFailed,
}

impl PolicyOutcome {
    #[must_use]
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Allow => false,
            Self::DenyConfigUnavailable | Self::DenyEvaluationFailed => true,
            Self::DenyConfirmed(denial) => denial.is_retryable(),
        }
    }

    /// Shape a denial decision attributed to `kind`. `None` for `Allow`.
    #[must_use]
    pub fn into_decision(self, kind: PolicyKind) -> Option<PolicyDecision> {
        let retryable = self.is_retryable();
        match self {
            Self::Allow => None,
            Self::DenyConfigUnavailable | Self::DenyEvaluationFailed => {
                Some(failure_decision(kind))
            }
            Self::DenyConfirmed(denial) => Some(PolicyDecision {
                allowed: false,
                policy: Some(kind),
                reason: Some(denial.reason()),
                retryable,
                retry_after_seconds: denial.retry_after_secs(),
                metadata: denial.metadata(),
            }),
        }
    }
}

/// Retryable denial for a policy that could not reach a verdict.
#[must_use]
pub fn failure_decision(kind: PolicyKind) -> PolicyDecision {
    PolicyDecision {
        allowed: false,
        policy: Some(kind),
        reason: Some(failure_reason(kind).to_owned()),
        retryable: true,
        retry_after_seconds: None,
        metadata: None,
    }
}

/// Reason reported when a policy could not reach a verdict.
#[must_use]
pub fn failure_reason(kind: PolicyKind) -> &'static str {
    match kind {
        PolicyKind::FeatureFlag => "Unable to verify feature availability",
        PolicyKind::AccountStatus => "Unable to verify account status",
        PolicyKind::RateLimit => "Unable to verify rate limit",
        PolicyKind::Abuse => "Unable to verify request safety",
    }
}

//! Policy 3: record the attempt and enforce the per-identity budget.

use std::sync::Arc;

use async_trait::async_trait;
use auth_policy_sdk::{
    AuthAction, CheckRequest, Clock, FeatureFlag, PolicyKind, RateLimitBucket, RateLimitStatus,
    RateLimiter,
};
use tracing::{debug, error};

use super::{PolicyContext, PolicyEvaluator};
use crate::domain::fail_closed::call_sync;
use crate::domain::outcome::{Denial, PolicyOutcome};

const ANONYMOUS: &str = "anonymous";
const REDACTED_PREFIX_CHARS: usize = 10;

pub struct RateLimitPolicy {
    limiter: Arc<dyn RateLimiter>,
    clock: Arc<dyn Clock>,
    default_retry_after_secs: u64,
}

impl RateLimitPolicy {
    #[must_use]
    pub fn new(
        limiter: Arc<dyn RateLimiter>,
        clock: Arc<dyn Clock>,
        default_retry_after_secs: u64,
    ) -> Self {
        Self {
            limiter,
            clock,
            default_retry_after_secs,
        }
    }

    fn retry_after_secs(&self, status: &RateLimitStatus) -> u64 {
        let Some(until) = status.blocked_until else {
            return self.default_retry_after_secs;
        };
        let remaining_ms = until.saturating_sub(self.clock.now_millis());
        u64::try_from(remaining_ms)
            .unwrap_or(0)
            .div_ceil(1000)
            .max(1)
    }
}

/// Limiter bucket an action is recorded under. `None` means the action
/// is not rate limited.
#[must_use]
pub fn bucket_for(action: AuthAction) -> Option<RateLimitBucket> {
    match action {
        // Unknown actions get the strictest bucket rather than none.
        AuthAction::Login | AuthAction::Unrecognized => Some(RateLimitBucket::Login),
        AuthAction::Register => Some(RateLimitBucket::Signup),
        AuthAction::MagicLink => Some(RateLimitBucket::MagicLink),
        AuthAction::PasswordRecovery => Some(RateLimitBucket::PasswordReset),
        AuthAction::Logout | AuthAction::TokenRefresh => None,
    }
}

/// Counter key: email, then ip, then user id, then `anonymous`.
#[must_use]
pub fn identity_key(request: &CheckRequest) -> &str {
    request
        .email
        .as_deref()
        .or(request.ip.as_deref())
        .or(request.user_id.as_deref())
        .unwrap_or(ANONYMOUS)
}

/// Log-safe form of an identity: the first ten characters and `...`.
#[must_use]
pub fn redact_identity(identity: &str) -> String {
    let mut redacted: String = identity.chars().take(REDACTED_PREFIX_CHARS).collect();
    redacted.push_str("...");
    redacted
}

#[async_trait]
impl PolicyEvaluator for RateLimitPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::RateLimit
    }

    async fn evaluate(&self, request: &CheckRequest, ctx: &PolicyContext) -> PolicyOutcome {
        let Some(bucket) = bucket_for(request.action) else {
            return PolicyOutcome::Allow;
        };
        if !ctx
            .settings
            .feature_flags
            .is_enabled(FeatureFlag::EnableRateLimit)
        {
            debug!(
                policy = %self.kind(),
                flag = FeatureFlag::EnableRateLimit.key(),
                "rate limiting disabled by flag"
            );
            return PolicyOutcome::Allow;
        }

        let identity = identity_key(request);
        let status = match call_sync(|| self.limiter.record_attempt(bucket, identity)) {
            Ok(status) => status,
            Err(e) => {
                error!(
                    policy = %self.kind(),
                    %bucket,
                    identity = %redact_identity(identity),
                    error = %e,
                    "rate limiter failed"
                );
                return PolicyOutcome::DenyEvaluationFailed;
            }
        };

        debug!(
            %bucket,
            identity = %redact_identity(identity),
            allowed = status.allowed,
            remaining = status.remaining,
            "rate limit attempt recorded"
        );

        if status.allowed {
            PolicyOutcome::Allow
        } else {
            PolicyOutcome::DenyConfirmed(Denial::RateLimited {
                retry_after_secs: self.retry_after_secs(&status),
                blocked_until: status.blocked_until,
            })
        }
    }
}

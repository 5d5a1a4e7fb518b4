//! The gate: runs the policy chain and shapes the decision.

use std::sync::Arc;

use auth_policy_sdk::{CheckRequest, Clock, Collaborators, PolicyDecision, PolicyKind, SystemClock};
use tracing::{debug, error, warn};

use super::outcome::{PolicyOutcome, failure_decision};
use super::policies::{
    AbusePolicy, AccountStatusPolicy, FeatureFlagPolicy, PolicyEvaluator, RateLimitPolicy,
};
use crate::config::AuthPolicyGateConfig;

/// Ordered, fail-closed auth policy gate.
///
/// Policies run strictly in sequence: feature flags, account status, rate
/// limit, abuse. The first denial ends the evaluation; later policies
/// never see the request. The gate keeps no state between calls.
pub struct AuthPolicyGate {
    feature_flags: Arc<FeatureFlagPolicy>,
    chain: Vec<Arc<dyn PolicyEvaluator>>,
}

impl AuthPolicyGate {
    #[must_use]
    pub fn new(collaborators: Collaborators, config: &AuthPolicyGateConfig) -> Self {
        Self::with_clock(collaborators, config, Arc::new(SystemClock))
    }

    /// Build a gate that reads time from `clock` when computing
    /// `retry_after_seconds`.
    #[must_use]
    pub fn with_clock(
        collaborators: Collaborators,
        config: &AuthPolicyGateConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let Collaborators {
            settings,
            accounts,
            rate_limiter,
            abuse_detector,
        } = collaborators;

        let feature_flags = Arc::new(FeatureFlagPolicy::new(
            settings,
            config.unrecognized_actions,
        ));
        let chain: Vec<Arc<dyn PolicyEvaluator>> = vec![
            feature_flags.clone(),
            Arc::new(AccountStatusPolicy::new(accounts)),
            Arc::new(RateLimitPolicy::new(
                rate_limiter,
                clock,
                config.default_retry_after_secs,
            )),
            Arc::new(AbusePolicy::new(abuse_detector)),
        ];

        Self {
            feature_flags,
            chain,
        }
    }

    /// Policy kinds in evaluation order.
    #[must_use]
    pub fn policy_order(&self) -> Vec<PolicyKind> {
        self.chain.iter().map(|p| p.kind()).collect()
    }

    /// Evaluate `request` against every policy. Never fails; any problem
    /// becomes a denial.
    #[tracing::instrument(skip_all, fields(action))]
    pub async fn check(&self, request: &CheckRequest) -> PolicyDecision {
        tracing::Span::current().record("action", request.action.as_str());
        debug!(
            has_ip = request.ip.is_some(),
            has_email = request.email.is_some(),
            has_user_id = request.user_id.is_some(),
            "evaluating auth policies"
        );

        let ctx = match self.feature_flags.load_context().await {
            Ok(ctx) => ctx,
            Err(outcome) => return deny(PolicyKind::FeatureFlag, outcome),
        };

        for policy in &self.chain {
            let outcome = policy.evaluate(request, &ctx).await;
            if !outcome.is_allow() {
                return deny(policy.kind(), outcome);
            }
        }

        debug!("all auth policies passed");
        PolicyDecision::allow()
    }
}

impl std::fmt::Debug for AuthPolicyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPolicyGate")
            .field("policies", &self.policy_order())
            .finish_non_exhaustive()
    }
}

fn deny(kind: PolicyKind, outcome: PolicyOutcome) -> PolicyDecision {
    let decision = outcome.into_decision(kind).unwrap_or_else(|| {
        error!(policy = %kind, "allow outcome reached the denial path");
        failure_decision(kind)
    });
    warn!(
        policy = %kind,
        reason = decision.reason.as_deref().unwrap_or_default(),
        retryable = decision.retryable,
        "auth action denied"
    );
    decision
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use auth_policy_sdk::{
        AbuseDetector, AbuseSignal, AccountQuery, AccountStatus, AccountStatusLookup, AuthAction,
        AuthPolicyError, AuthSettings, RateLimitBucket, RateLimitStatus, RateLimiter,
        SettingsProvider,
    };

    struct AllowAllMock;

    #[async_trait]
    impl SettingsProvider for AllowAllMock {
        async fn load_settings(&self) -> Result<AuthSettings, AuthPolicyError> {
            Ok(AuthSettings::all_enabled())
        }
    }

    #[async_trait]
    impl AccountStatusLookup for AllowAllMock {
        async fn find_account(
            &self,
            _query: &AccountQuery,
        ) -> Result<Option<AccountStatus>, AuthPolicyError> {
            Ok(None)
        }
    }

    impl RateLimiter for AllowAllMock {
        fn record_attempt(
            &self,
            _bucket: RateLimitBucket,
            _identity: &str,
        ) -> Result<RateLimitStatus, AuthPolicyError> {
            Ok(RateLimitStatus {
                allowed: true,
                remaining: 1,
                blocked_until: None,
            })
        }
    }

    #[async_trait]
    impl AbuseDetector for AllowAllMock {
        async fn check_request(&self, _signal: &AbuseSignal) -> Result<bool, AuthPolicyError> {
            Ok(false)
        }
    }

    fn gate() -> AuthPolicyGate {
        let mock = Arc::new(AllowAllMock);
        AuthPolicyGate::new(
            Collaborators {
                settings: mock.clone(),
                accounts: mock.clone(),
                rate_limiter: mock.clone(),
                abuse_detector: mock,
            },
            &AuthPolicyGateConfig::default(),
        )
    }

    #[test]
    fn chain_order_is_fixed() {
        assert_eq!(
            gate().policy_order(),
            vec![
                PolicyKind::FeatureFlag,
                PolicyKind::AccountStatus,
                PolicyKind::RateLimit,
                PolicyKind::Abuse,
            ]
        );
    }

    #[tokio::test]
    async fn full_pass_is_allowed_without_policy() {
        let decision = gate()
            .check(
                &CheckRequest::new(AuthAction::Login)
                    .with_ip("127.0.0.1")
                    .with_email("user@example.com"),
            )
            .await;

        assert_eq!(decision, PolicyDecision::allow());
    }

    #[test]
    fn stray_allow_on_denial_path_fails_closed() {
        let decision = deny(PolicyKind::Abuse, PolicyOutcome::Allow);

        assert!(!decision.allowed);
        assert!(decision.retryable);
        assert_eq!(decision.policy, Some(PolicyKind::Abuse));
        assert_eq!(
            decision.reason.as_deref(),
            Some("Unable to verify request safety")
        );
    }

    #[test]
    fn gate_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthPolicyGate>();
    }
}

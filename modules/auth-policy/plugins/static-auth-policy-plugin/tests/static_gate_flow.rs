#![allow(clippy::unwrap_used, clippy::expect_used)]

//! The gate running on top of the static collaborators.

use std::sync::Arc;

use auth_policy_gate::{AuthPolicyGate, AuthPolicyGateConfig};
use auth_policy_sdk::{AuthAction, AuthSettings, CheckRequest, ManualClock, PolicyKind};
use static_auth_policy_plugin::{Service, StaticAuthPolicyPluginConfig};

const NOW: i64 = 1_700_000_000_000;

const CONFIG: &str = r#"
settings:
  feature_flags:
    enable_user_registration: true
  auth:
    login: { enabled: true }
    magic_link: { enabled: true }
accounts:
  - id: "user-1"
    email: "active@example.com"
  - id: "user-2"
    email: "suspended@example.com"
    suspended: true
    suspended_reason: "Chargeback dispute"
  - id: "user-3"
    email: "dormant@example.com"
    active: false
abuse:
  blocked_ips: ["203.0.113.7"]
  blocked_user_agents: ["sqlmap"]
"#;

struct Stack {
    service: Service,
    clock: Arc<ManualClock>,
    gate: AuthPolicyGate,
}

fn stack() -> Stack {
    let cfg: StaticAuthPolicyPluginConfig = serde_saphyr::from_str(CONFIG).unwrap();
    let clock = Arc::new(ManualClock::new(NOW));
    let service = Service::with_clock(&cfg, clock.clone()).unwrap();
    let gate = AuthPolicyGate::with_clock(
        service.collaborators(),
        &AuthPolicyGateConfig::default(),
        clock.clone(),
    );
    Stack {
        service,
        clock,
        gate,
    }
}

fn login(email: &str) -> CheckRequest {
    CheckRequest::new(AuthAction::Login)
        .with_ip("198.51.100.10")
        .with_email(email)
}

#[tokio::test]
async fn sixth_login_is_rate_limited() {
    let s = stack();

    for _ in 0..5 {
        assert!(s.gate.check(&login("active@example.com")).await.allowed);
    }
    let decision = s.gate.check(&login("active@example.com")).await;

    assert!(!decision.allowed);
    assert_eq!(decision.policy, Some(PolicyKind::RateLimit));
    assert!(decision.retryable);
    assert_eq!(decision.retry_after_seconds, Some(900));
    assert_eq!(
        decision.metadata.and_then(|m| m.blocked_until),
        Some(NOW + 900_000)
    );
}

#[tokio::test]
async fn rate_limit_block_expires() {
    let s = stack();
    for _ in 0..6 {
        s.gate.check(&login("active@example.com")).await;
    }

    s.clock.advance_millis(600_000);
    let decision = s.gate.check(&login("active@example.com")).await;
    assert_eq!(decision.retry_after_seconds, Some(300));

    s.clock.advance_millis(300_000);
    assert!(s.gate.check(&login("active@example.com")).await.allowed);
}

#[tokio::test]
async fn suspended_and_inactive_accounts_are_denied() {
    let s = stack();

    let suspended = s.gate.check(&login("suspended@example.com")).await;
    assert_eq!(suspended.policy, Some(PolicyKind::AccountStatus));
    assert_eq!(suspended.reason.as_deref(), Some("Chargeback dispute"));
    assert!(!suspended.retryable);

    let dormant = s
        .gate
        .check(&CheckRequest::new(AuthAction::MagicLink).with_user_id("user-3"))
        .await;
    assert_eq!(dormant.policy, Some(PolicyKind::AccountStatus));
    assert_eq!(dormant.reason.as_deref(), Some("Account is inactive"));
}

#[tokio::test]
async fn unknown_user_reaches_abuse_check() {
    let s = stack();

    let decision = s
        .gate
        .check(
            &CheckRequest::new(AuthAction::Login)
                .with_ip("203.0.113.7")
                .with_email("nobody@example.com"),
        )
        .await;

    assert_eq!(decision.policy, Some(PolicyKind::Abuse));
    assert_eq!(
        decision.reason.as_deref(),
        Some("Request blocked due to suspicious activity")
    );
    assert!(!decision.retryable);
}

#[tokio::test]
async fn replaced_settings_apply_to_next_check() {
    let s = stack();
    assert!(s.gate.check(&CheckRequest::new(AuthAction::Register)).await.allowed);

    s.service.settings.replace(AuthSettings::default());
    let decision = s.gate.check(&CheckRequest::new(AuthAction::Register)).await;

    assert_eq!(decision.policy, Some(PolicyKind::FeatureFlag));
    assert_eq!(
        decision.reason.as_deref(),
        Some("User registration is currently disabled")
    );
}

#[tokio::test]
async fn disabling_rate_limit_flag_stops_counting() {
    let s = stack();
    let mut settings = s.service.settings.snapshot().as_ref().clone();
    settings.feature_flags.enable_rate_limit = false;
    s.service.settings.replace(settings);

    for _ in 0..10 {
        assert!(s.gate.check(&login("active@example.com")).await.allowed);
    }
    assert_eq!(s.service.rate_limiter.tracked(), 0);
}

#[tokio::test]
async fn logout_is_never_counted() {
    let s = stack();

    for _ in 0..10 {
        let decision = s
            .gate
            .check(&CheckRequest::new(AuthAction::Logout).with_user_id("user-1"))
            .await;
        assert!(decision.allowed);
    }
    assert_eq!(s.service.rate_limiter.tracked(), 0);
}

#[tokio::test]
async fn reset_lifts_block_after_successful_login() {
    let s = stack();
    for _ in 0..6 {
        s.gate.check(&login("active@example.com")).await;
    }

    s.service
        .rate_limiter
        .reset(auth_policy_sdk::RateLimitBucket::Login, "active@example.com");

    assert!(s.gate.check(&login("active@example.com")).await.allowed);
}

//! Domain models for the auth policy gate.
//!
//! Wire names are camelCase to match the JSON contract of the auth
//! endpoints (`userId`, `retryAfterSeconds`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Authentication action being attempted.
///
/// Any wire value outside the known set deserializes to
/// [`AuthAction::Unrecognized`] so the gate can deny it explicitly instead
/// of failing to parse the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum AuthAction {
    Login,
    Register,
    Logout,
    MagicLink,
    PasswordRecovery,
    TokenRefresh,
    Unrecognized,
}

impl AuthAction {
    /// Stable snake_case name, as used on the wire and in settings keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::Logout => "logout",
            Self::MagicLink => "magic_link",
            Self::PasswordRecovery => "password_recovery",
            Self::TokenRefresh => "token_refresh",
            Self::Unrecognized => "unrecognized",
        }
    }

    /// Parse a wire name. Unknown names map to [`AuthAction::Unrecognized`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "login" => Self::Login,
            "register" => Self::Register,
            "logout" => Self::Logout,
            "magic_link" => Self::MagicLink,
            "password_recovery" => Self::PasswordRecovery,
            "token_refresh" => Self::TokenRefresh,
            _ => Self::Unrecognized,
        }
    }
}

impl From<String> for AuthAction {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl fmt::Display for AuthAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input of a single gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    /// The action being attempted.
    pub action: AuthAction,
    /// Caller's network address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    /// Acting principal when no session exists yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Existing principal, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Passed through to abuse detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl CheckRequest {
    /// Create a request for `action` with no identity data.
    #[must_use]
    pub fn new(action: AuthAction) -> Self {
        Self {
            action,
            ip: None,
            email: None,
            user_id: None,
            user_agent: None,
        }
    }

    #[must_use]
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Whether the request carries any principal identifier.
    #[must_use]
    pub fn has_principal(&self) -> bool {
        self.user_id.is_some() || self.email.is_some()
    }
}

/// Identifier of a policy in the gate sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    FeatureFlag,
    AccountStatus,
    RateLimit,
    Abuse,
}

impl PolicyKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FeatureFlag => "feature_flag",
            Self::AccountStatus => "account_status",
            Self::RateLimit => "rate_limit",
            Self::Abuse => "abuse",
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy-specific detail attached to a denial.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Epoch milliseconds until which the rate limiter refuses attempts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_until: Option<i64>,
}

/// Result of a gate evaluation.
///
/// Built fresh for every call; never persisted or cached by the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDecision {
    /// `true` only if every applicable policy allowed the action.
    pub allowed: bool,
    /// Policy that produced the denial; absent when allowed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Whether resubmitting the identical request later may succeed.
    pub retryable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DecisionMetadata>,
}

impl PolicyDecision {
    /// Decision returned when all policies passed.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            allowed: true,
            policy: None,
            reason: None,
            retryable: false,
            retry_after_seconds: None,
            metadata: None,
        }
    }
}

/// Account lookup key. Matching is `id == user_id OR email == email`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountQuery {
    pub user_id: Option<String>,
    pub email: Option<String>,
}

/// Account state as seen by the account status policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatus {
    pub id: String,
    pub email: String,
    pub active: bool,
    pub suspended: bool,
    #[serde(default)]
    pub suspended_reason: Option<String>,
}

/// Rate-limit counter family an auth action is recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitBucket {
    Login,
    Signup,
    MagicLink,
    PasswordReset,
}

impl RateLimitBucket {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::MagicLink => "magic_link",
            Self::PasswordReset => "password_reset",
        }
    }
}

impl fmt::Display for RateLimitBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer of a recording rate-limit call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub remaining: u32,
    /// Epoch milliseconds until which further attempts are refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocked_until: Option<i64>,
}

/// Signals handed to abuse detection, passed through from the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbuseSignal {
    pub ip: Option<String>,
    pub email: Option<String>,
    pub user_id: Option<String>,
    pub action: AuthAction,
    pub user_agent: Option<String>,
}

impl From<&CheckRequest> for AbuseSignal {
    fn from(request: &CheckRequest) -> Self {
        Self {
            ip: request.ip.clone(),
            email: request.email.clone(),
            user_id: request.user_id.clone(),
            action: request.action,
            user_agent: request.user_agent.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn auth_action_roundtrips_known_names() {
        for action in [
            AuthAction::Login,
            AuthAction::Register,
            AuthAction::Logout,
            AuthAction::MagicLink,
            AuthAction::PasswordRecovery,
            AuthAction::TokenRefresh,
        ] {
            assert_eq!(AuthAction::parse(action.as_str()), action);
        }
    }

    #[test]
    fn unknown_action_deserializes_to_unrecognized() {
        let request: CheckRequest =
            serde_json::from_value(json!({ "action": "delete_everything", "ip": "10.0.0.1" }))
                .expect("request should parse");

        assert_eq!(request.action, AuthAction::Unrecognized);
        assert_eq!(request.ip.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn check_request_uses_camel_case_fields() {
        let request: CheckRequest = serde_json::from_value(json!({
            "action": "magic_link",
            "userId": "user-1",
            "userAgent": "curl/8.0"
        }))
        .expect("request should parse");

        assert_eq!(request.action, AuthAction::MagicLink);
        assert_eq!(request.user_id.as_deref(), Some("user-1"));
        assert_eq!(request.user_agent.as_deref(), Some("curl/8.0"));
        assert!(request.email.is_none());
        assert!(request.has_principal());
    }

    #[test]
    fn allow_decision_serializes_without_policy() {
        let value = serde_json::to_value(PolicyDecision::allow()).expect("serialize");
        assert_eq!(value, json!({ "allowed": true, "retryable": false }));
    }

    #[test]
    fn denial_serializes_camel_case_extras() {
        let decision = PolicyDecision {
            allowed: false,
            policy: Some(PolicyKind::RateLimit),
            reason: Some("Too many attempts. Please try again later.".to_owned()),
            retryable: true,
            retry_after_seconds: Some(60),
            metadata: Some(DecisionMetadata {
                blocked_until: Some(1_700_000_060_000),
                ..DecisionMetadata::default()
            }),
        };

        let value = serde_json::to_value(&decision).expect("serialize");
        assert_eq!(value["policy"], "rate_limit");
        assert_eq!(value["retryAfterSeconds"], 60);
        assert_eq!(value["metadata"], json!({ "blockedUntil": 1_700_000_060_000_i64 }));
    }

    #[test]
    fn abuse_signal_copies_request_fields_verbatim() {
        let request = CheckRequest::new(AuthAction::Login)
            .with_ip("127.0.0.1")
            .with_email("user@example.com");
        let signal = AbuseSignal::from(&request);

        assert_eq!(signal.ip.as_deref(), Some("127.0.0.1"));
        assert_eq!(signal.email.as_deref(), Some("user@example.com"));
        assert_eq!(signal.user_id, None);
        assert_eq!(signal.user_agent, None);
        assert_eq!(signal.action, AuthAction::Login);
    }
}

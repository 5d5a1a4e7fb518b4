//! Typed settings snapshot served by a [`SettingsProvider`](crate::SettingsProvider).
//!
//! The payload shape is:
//!
//! ```yaml
//! feature_flags:
//!   enable_user_registration: true
//!   ENABLE_RATE_LIMIT: true
//!   ENABLE_ABUSE_DETECTION: true
//! auth:
//!   login: { enabled: true }
//!   magic_link: { enabled: true }
//! ```
//!
//! Unknown keys are ignored so the provider can carry unrelated product
//! flags in the same document.

use serde::{Deserialize, Serialize};

use crate::models::AuthAction;

/// Flags the gate reads, addressable by key for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureFlag {
    EnableUserRegistration,
    EnableRateLimit,
    EnableAbuseDetection,
}

impl FeatureFlag {
    /// Key of the flag in the settings payload.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::EnableUserRegistration => "enable_user_registration",
            Self::EnableRateLimit => "ENABLE_RATE_LIMIT",
            Self::EnableAbuseDetection => "ENABLE_ABUSE_DETECTION",
        }
    }
}

/// Global feature flags.
///
/// Registration defaults to off. The rate-limit and abuse kill switches
/// default to on: enforcement is only disabled by an explicit `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub enable_user_registration: bool,
    #[serde(rename = "ENABLE_RATE_LIMIT")]
    pub enable_rate_limit: bool,
    #[serde(rename = "ENABLE_ABUSE_DETECTION")]
    pub enable_abuse_detection: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_user_registration: false,
            enable_rate_limit: true,
            enable_abuse_detection: true,
        }
    }
}

impl FeatureFlags {
    #[must_use]
    pub fn is_enabled(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::EnableUserRegistration => self.enable_user_registration,
            FeatureFlag::EnableRateLimit => self.enable_rate_limit,
            FeatureFlag::EnableAbuseDetection => self.enable_abuse_detection,
        }
    }
}

/// Per-action enablement switch (`auth.<action>.enabled`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionToggle {
    pub enabled: bool,
}

/// Per-action auth configuration. A missing entry means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthActionToggles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<ActionToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic_link: Option<ActionToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logout: Option<ActionToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_recovery: Option<ActionToggle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_refresh: Option<ActionToggle>,
}

impl AuthActionToggles {
    /// Configured enablement for `action`, if any.
    ///
    /// Registration is governed by
    /// [`FeatureFlag::EnableUserRegistration`], not by an `auth` entry, so
    /// `register` and unrecognized actions always return `None`.
    #[must_use]
    pub fn enabled(&self, action: AuthAction) -> Option<bool> {
        let toggle = match action {
            AuthAction::Login => self.login,
            AuthAction::MagicLink => self.magic_link,
            AuthAction::Logout => self.logout,
            AuthAction::PasswordRecovery => self.password_recovery,
            AuthAction::TokenRefresh => self.token_refresh,
            AuthAction::Register | AuthAction::Unrecognized => None,
        };
        toggle.map(|t| t.enabled)
    }
}

/// Snapshot of the settings the gate evaluates against.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub feature_flags: FeatureFlags,
    pub auth: AuthActionToggles,
}

impl AuthSettings {
    /// Settings with every action enabled and all enforcement on.
    #[must_use]
    pub fn all_enabled() -> Self {
        let on = Some(ActionToggle { enabled: true });
        Self {
            feature_flags: FeatureFlags {
                enable_user_registration: true,
                ..FeatureFlags::default()
            },
            auth: AuthActionToggles {
                login: on,
                magic_link: on,
                logout: on,
                password_recovery: on,
                token_refresh: on,
            },
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_keeps_enforcement_on() {
        let settings: AuthSettings = serde_saphyr::from_str("{}").expect("parse");

        assert!(!settings.feature_flags.enable_user_registration);
        assert!(settings.feature_flags.is_enabled(FeatureFlag::EnableRateLimit));
        assert!(settings.feature_flags.is_enabled(FeatureFlag::EnableAbuseDetection));
        assert_eq!(settings.auth.enabled(AuthAction::Login), None);
    }

    #[test]
    fn parses_reference_payload_and_ignores_extra_keys() {
        let yaml = r"
feature_flags:
  enable_user_registration: true
  ENABLE_RATE_LIMIT: false
  ENABLE_ABUSE_DETECTION: true
  enable_shield: true
auth:
  login: { enabled: true }
  signup: { enabled: true }
  magic_link: { enabled: false }
";
        let settings: AuthSettings = serde_saphyr::from_str(yaml).expect("parse");

        assert!(settings.feature_flags.enable_user_registration);
        assert!(!settings.feature_flags.enable_rate_limit);
        assert!(settings.feature_flags.enable_abuse_detection);
        assert_eq!(settings.auth.enabled(AuthAction::Login), Some(true));
        assert_eq!(settings.auth.enabled(AuthAction::MagicLink), Some(false));
        assert_eq!(settings.auth.enabled(AuthAction::Logout), None);
    }

    #[test]
    fn register_is_not_an_auth_toggle() {
        let settings = AuthSettings::all_enabled();
        assert_eq!(settings.auth.enabled(AuthAction::Register), None);
        assert_eq!(settings.auth.enabled(AuthAction::Unrecognized), None);
    }

    #[test]
    fn flag_keys_match_payload_names() {
        assert_eq!(FeatureFlag::EnableRateLimit.key(), "ENABLE_RATE_LIMIT");
        assert_eq!(FeatureFlag::EnableAbuseDetection.key(), "ENABLE_ABUSE_DETECTION");
        assert_eq!(
            FeatureFlag::EnableUserRegistration.key(),
            "enable_user_registration"
        );
    }
}

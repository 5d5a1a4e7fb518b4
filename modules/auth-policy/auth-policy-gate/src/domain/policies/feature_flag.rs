//! Policy 1: is the action switched on?

use std::sync::Arc;

use async_trait::async_trait;
use auth_policy_sdk::{AuthAction, AuthSettings, CheckRequest, PolicyKind, SettingsProvider};
use tracing::error;

use super::{PolicyContext, PolicyEvaluator};
use crate::config::UnrecognizedActionMode;
use crate::domain::fail_closed::call_async;
use crate::domain::outcome::{Denial, PolicyOutcome};

/// Checks feature flags and per-action auth config.
///
/// Also owns the settings load: the snapshot it reads is the one the rate
/// limit and abuse policies use for their kill switches.
pub struct FeatureFlagPolicy {
    settings: Arc<dyn SettingsProvider>,
    unrecognized: UnrecognizedActionMode,
}

impl FeatureFlagPolicy {
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsProvider>, unrecognized: UnrecognizedActionMode) -> Self {
        Self {
            settings,
            unrecognized,
        }
    }

    /// Load this call's settings snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyOutcome::DenyConfigUnavailable`] if the provider
    /// failed or panicked.
    pub async fn load_context(&self) -> Result<PolicyContext, PolicyOutcome> {
        match call_async(|| self.settings.load_settings()).await {
            Ok(settings) => Ok(PolicyContext { settings }),
            Err(e) => {
                error!(policy = %PolicyKind::FeatureFlag, error = %e, "settings load failed");
                Err(PolicyOutcome::DenyConfigUnavailable)
            }
        }
    }

    fn decide(&self, action: AuthAction, settings: &AuthSettings) -> PolicyOutcome {
        match action {
            AuthAction::Register => {
                if settings.feature_flags.enable_user_registration {
                    PolicyOutcome::Allow
                } else {
                    disabled("User registration is currently disabled")
                }
            }
            AuthAction::Login => opt_in(settings, action, "Login is currently disabled"),
            AuthAction::MagicLink => opt_in(
                settings,
                action,
                "Magic link authentication is currently disabled",
            ),
            AuthAction::Logout => opt_out(settings, action, "Logout is currently disabled"),
            AuthAction::PasswordRecovery => opt_out(
                settings,
                action,
                "Password recovery is currently disabled",
            ),
            AuthAction::TokenRefresh => {
                opt_out(settings, action, "Token refresh is currently disabled")
            }
            AuthAction::Unrecognized => match self.unrecognized {
                UnrecognizedActionMode::Deny => {
                    PolicyOutcome::DenyConfirmed(Denial::UnsupportedAction)
                }
                UnrecognizedActionMode::Allow => PolicyOutcome::Allow,
            },
        }
    }
}

fn disabled(reason: &str) -> PolicyOutcome {
    PolicyOutcome::DenyConfirmed(Denial::FeatureDisabled {
        reason: reason.to_owned(),
    })
}

/// Denied unless explicitly enabled.
fn opt_in(settings: &AuthSettings, action: AuthAction, reason: &str) -> PolicyOutcome {
    if settings.auth.enabled(action) == Some(true) {
        PolicyOutcome::Allow
    } else {
        disabled(reason)
    }
}

/// Allowed unless explicitly disabled.
fn opt_out(settings: &AuthSettings, action: AuthAction, reason: &str) -> PolicyOutcome {
    if settings.auth.enabled(action) == Some(false) {
        disabled(reason)
    } else {
        PolicyOutcome::Allow
    }
}

#[async_trait]
impl PolicyEvaluator for FeatureFlagPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::FeatureFlag
    }

    async fn evaluate(&self, request: &CheckRequest, ctx: &PolicyContext) -> PolicyOutcome {
        self.decide(request.action, &ctx.settings)
    }
}

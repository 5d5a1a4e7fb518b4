//! Service assembling the static collaborators from configuration.

use std::sync::Arc;

use auth_policy_sdk::{AccountStatus, Clock, Collaborators, SystemClock};
use tracing::info;

use super::{
    DenyListAbuseDetector, StaticAccountDirectory, StaticSettingsProvider, WindowedRateLimiter,
};
use crate::config::{ConfigError, StaticAuthPolicyPluginConfig};

/// The four static collaborators built from one config.
///
/// Handles stay reachable so callers can flip settings or reset rate
/// limits while a gate built from [`Service::collaborators`] is running.
pub struct Service {
    pub settings: Arc<StaticSettingsProvider>,
    pub accounts: Arc<StaticAccountDirectory>,
    pub rate_limiter: Arc<WindowedRateLimiter>,
    pub abuse_detector: Arc<DenyListAbuseDetector>,
}

impl Service {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if a rate-limit profile is
    /// unusable.
    pub fn from_config(cfg: &StaticAuthPolicyPluginConfig) -> Result<Self, ConfigError> {
        Self::with_clock(cfg, Arc::new(SystemClock))
    }

    /// Like [`Service::from_config`], with the rate limiter reading time
    /// from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] if a rate-limit profile is
    /// unusable.
    pub fn with_clock(
        cfg: &StaticAuthPolicyPluginConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ConfigError> {
        cfg.validate()?;

        let accounts: Vec<AccountStatus> =
            cfg.accounts.iter().cloned().map(AccountStatus::from).collect();
        info!(
            accounts = accounts.len(),
            blocked_ips = cfg.abuse.blocked_ips.len(),
            blocked_emails = cfg.abuse.blocked_emails.len(),
            blocked_user_agents = cfg.abuse.blocked_user_agents.len(),
            "Initializing static auth policy collaborators"
        );

        Ok(Self {
            settings: Arc::new(StaticSettingsProvider::new(cfg.settings.clone())),
            accounts: Arc::new(StaticAccountDirectory::new(accounts)),
            rate_limiter: Arc::new(WindowedRateLimiter::new(cfg.rate_limits.clone(), clock)),
            abuse_detector: Arc::new(DenyListAbuseDetector::new(&cfg.abuse)),
        })
    }

    /// Collaborator set for building a gate.
    #[must_use]
    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            settings: self.settings.clone(),
            accounts: self.accounts.clone(),
            rate_limiter: self.rate_limiter.clone(),
            abuse_detector: self.abuse_detector.clone(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::AccountConfig;

    #[test]
    fn builds_components_from_config() {
        let mut cfg = StaticAuthPolicyPluginConfig::default();
        cfg.accounts.push(AccountConfig {
            id: "user-1".to_owned(),
            email: "user@example.com".to_owned(),
            active: true,
            suspended: false,
            suspended_reason: None,
        });

        let service = Service::from_config(&cfg).unwrap();

        assert_eq!(service.accounts.len(), 1);
        assert_eq!(service.rate_limiter.tracked(), 0);
        assert_eq!(*service.settings.snapshot(), cfg.settings);
    }

    #[test]
    fn invalid_profile_is_rejected() {
        let mut cfg = StaticAuthPolicyPluginConfig::default();
        cfg.rate_limits.login.block_secs = 0;

        assert!(matches!(
            Service::from_config(&cfg),
            Err(ConfigError::InvalidRateLimit { .. })
        ));
    }
}

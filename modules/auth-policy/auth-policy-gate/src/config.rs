//! Configuration for the auth policy gate.

use serde::Deserialize;

use crate::domain::DomainError;

/// What the gate does with an action name it does not know.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrecognizedActionMode {
    /// Deny at the feature-flag policy, not retryable.
    #[default]
    Deny,
    /// Let the action through the feature-flag policy. Later policies
    /// still apply; rate limiting records it under the `login` bucket.
    Allow,
}

/// Gate configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthPolicyGateConfig {
    /// `retry_after_seconds` reported for a rate-limit denial when the
    /// limiter does not say when the block ends.
    pub default_retry_after_secs: u64,
    pub unrecognized_actions: UnrecognizedActionMode,
}

impl Default for AuthPolicyGateConfig {
    fn default() -> Self {
        Self {
            default_retry_after_secs: 900,
            unrecognized_actions: UnrecognizedActionMode::Deny,
        }
    }
}

impl AuthPolicyGateConfig {
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidConfig`] if `default_retry_after_secs`
    /// is zero.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.default_retry_after_secs == 0 {
            return Err(DomainError::InvalidConfig(
                "default_retry_after_secs must be greater than zero".to_owned(),
            ));
        }
        Ok(())
    }
}

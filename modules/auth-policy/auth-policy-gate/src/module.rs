//! Auth policy gate module.

use std::sync::{Arc, OnceLock};

use auth_policy_sdk::{AuthPolicyGatewayClient, Collaborators};
use tracing::info;

use crate::config::AuthPolicyGateConfig;
use crate::domain::{AuthPolicyGate, AuthPolicyGwLocalClient};

/// Auth policy gate module.
///
/// This module:
/// 1. Validates the gate configuration
/// 2. Builds the gate from the four collaborators
/// 3. Hands out the gateway client HTTP auth handlers depend on
///
/// Initialization is one-shot.
pub struct AuthPolicyGateModule {
    service: OnceLock<Arc<AuthPolicyGate>>,
}

impl Default for AuthPolicyGateModule {
    fn default() -> Self {
        Self {
            service: OnceLock::new(),
        }
    }
}

impl AuthPolicyGateModule {
    /// Build the gate and return its client.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the module was already
    /// initialized.
    #[tracing::instrument(skip_all, fields(default_retry_after_secs))]
    pub fn init(
        &self,
        cfg: &AuthPolicyGateConfig,
        collaborators: Collaborators,
    ) -> anyhow::Result<Arc<dyn AuthPolicyGatewayClient>> {
        tracing::Span::current().record("default_retry_after_secs", cfg.default_retry_after_secs);
        cfg.validate()?;
        anyhow::ensure!(self.service.get().is_none(), "Service already initialized");
        info!("Initializing auth policy gate");

        let svc = Arc::new(AuthPolicyGate::new(collaborators, cfg));
        self.service
            .set(svc.clone())
            .map_err(|_| anyhow::anyhow!("Service already initialized"))?;
        info!(policies = ?svc.policy_order(), "Auth policy gate ready");

        Ok(Arc::new(AuthPolicyGwLocalClient::new(svc)))
    }

    /// The gate, once initialized.
    #[must_use]
    pub fn service(&self) -> Option<Arc<AuthPolicyGate>> {
        self.service.get().cloned()
    }
}

//! Local (in-process) client for the auth policy gate.

use std::sync::Arc;

use async_trait::async_trait;
use auth_policy_sdk::{AuthPolicyGatewayClient, CheckRequest, PolicyDecision};

use super::AuthPolicyGate;

/// Local client wrapping the gate service.
pub struct AuthPolicyGwLocalClient {
    svc: Arc<AuthPolicyGate>,
}

impl AuthPolicyGwLocalClient {
    #[must_use]
    pub fn new(svc: Arc<AuthPolicyGate>) -> Self {
        Self { svc }
    }
}

#[async_trait]
impl AuthPolicyGatewayClient for AuthPolicyGwLocalClient {
    async fn check(&self, request: CheckRequest) -> PolicyDecision {
        self.svc.check(&request).await
    }
}

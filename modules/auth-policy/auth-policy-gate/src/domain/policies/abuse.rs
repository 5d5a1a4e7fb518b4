//! Policy 4: heuristic abuse detection.

use std::sync::Arc;

use async_trait::async_trait;
use auth_policy_sdk::{AbuseDetector, AbuseSignal, CheckRequest, FeatureFlag, PolicyKind};
use tracing::{debug, error};

use super::{PolicyContext, PolicyEvaluator};
use crate::domain::fail_closed::call_async;
use crate::domain::outcome::{Denial, PolicyOutcome};

pub struct AbusePolicy {
    detector: Arc<dyn AbuseDetector>,
}

impl AbusePolicy {
    #[must_use]
    pub fn new(detector: Arc<dyn AbuseDetector>) -> Self {
        Self { detector }
    }
}

#[async_trait]
impl PolicyEvaluator for AbusePolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::Abuse
    }

    async fn evaluate(&self, request: &CheckRequest, ctx: &PolicyContext) -> PolicyOutcome {
        if !ctx
            .settings
            .feature_flags
            .is_enabled(FeatureFlag::EnableAbuseDetection)
        {
            debug!(
                policy = %self.kind(),
                flag = FeatureFlag::EnableAbuseDetection.key(),
                "abuse detection disabled by flag"
            );
            return PolicyOutcome::Allow;
        }

        let signal = AbuseSignal::from(request);
        match call_async(|| self.detector.check_request(&signal)).await {
            Ok(false) => PolicyOutcome::Allow,
            Ok(true) => PolicyOutcome::DenyConfirmed(Denial::AbuseDetected),
            Err(e) => {
                error!(policy = %self.kind(), error = %e, "abuse detector failed");
                PolicyOutcome::DenyEvaluationFailed
            }
        }
    }
}

//! Collaborator trait implementations for the static components.

use async_trait::async_trait;
use auth_policy_sdk::{
    AbuseDetector, AbuseSignal, AccountQuery, AccountStatus, AccountStatusLookup,
    AuthPolicyError, AuthSettings, RateLimitBucket, RateLimitStatus, RateLimiter,
    SettingsProvider,
};

use super::{
    DenyListAbuseDetector, StaticAccountDirectory, StaticSettingsProvider, WindowedRateLimiter,
};

#[async_trait]
impl SettingsProvider for StaticSettingsProvider {
    async fn load_settings(&self) -> Result<AuthSettings, AuthPolicyError> {
        Ok(self.snapshot().as_ref().clone())
    }
}

#[async_trait]
impl AccountStatusLookup for StaticAccountDirectory {
    async fn find_account(
        &self,
        query: &AccountQuery,
    ) -> Result<Option<AccountStatus>, AuthPolicyError> {
        Ok(self.find(query).cloned())
    }
}

impl RateLimiter for WindowedRateLimiter {
    fn record_attempt(
        &self,
        bucket: RateLimitBucket,
        identity: &str,
    ) -> Result<RateLimitStatus, AuthPolicyError> {
        Ok(self.record(bucket, identity))
    }
}

#[async_trait]
impl AbuseDetector for DenyListAbuseDetector {
    async fn check_request(&self, signal: &AbuseSignal) -> Result<bool, AuthPolicyError> {
        Ok(self.is_abusive(signal))
    }
}

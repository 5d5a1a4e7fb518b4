//! Collaborator traits the gate depends on.
//!
//! Each trait is implemented outside the gate (a database-backed account
//! store, a shared rate limiter, an abuse-scoring service, ...). The
//! `static-auth-policy-plugin` crate ships in-memory implementations for
//! development and tests.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::AuthPolicyError;
use crate::models::{AbuseSignal, AccountQuery, AccountStatus, RateLimitBucket, RateLimitStatus};
use crate::settings::AuthSettings;

/// Source of feature flags and per-action auth config.
#[async_trait]
pub trait SettingsProvider: Send + Sync {
    /// Load the current settings snapshot.
    ///
    /// # Errors
    ///
    /// Any error makes the gate deny with `policy = feature_flag`.
    async fn load_settings(&self) -> Result<AuthSettings, AuthPolicyError>;
}

/// Resolves an account's active/suspended status.
#[async_trait]
pub trait AccountStatusLookup: Send + Sync {
    /// Find the first account whose id equals `query.user_id` or whose
    /// email equals `query.email`.
    ///
    /// Returns `Ok(None)` when no account matches.
    ///
    /// # Errors
    ///
    /// Any error makes the gate deny with `policy = account_status`.
    async fn find_account(
        &self,
        query: &AccountQuery,
    ) -> Result<Option<AccountStatus>, AuthPolicyError>;
}

/// Attempt counter per bucket and identity.
///
/// Synchronous: implementations are expected to be in-memory or to use a
/// local cache.
pub trait RateLimiter: Send + Sync {
    /// Record one attempt and report whether it is within budget.
    ///
    /// This is a recording call: every invocation counts.
    ///
    /// # Errors
    ///
    /// Any error makes the gate deny with `policy = rate_limit`.
    fn record_attempt(
        &self,
        bucket: RateLimitBucket,
        identity: &str,
    ) -> Result<RateLimitStatus, AuthPolicyError>;
}

/// Heuristic abuse check.
#[async_trait]
pub trait AbuseDetector: Send + Sync {
    /// Returns `true` when the request should be blocked as abusive.
    ///
    /// # Errors
    ///
    /// Any error makes the gate deny with `policy = abuse`, retryable.
    async fn check_request(&self, signal: &AbuseSignal) -> Result<bool, AuthPolicyError>;
}

/// The four collaborators a gate is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub settings: Arc<dyn SettingsProvider>,
    pub accounts: Arc<dyn AccountStatusLookup>,
    pub rate_limiter: Arc<dyn RateLimiter>,
    pub abuse_detector: Arc<dyn AbuseDetector>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

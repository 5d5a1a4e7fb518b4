//! Policy 2: is the account allowed to act?

use std::sync::Arc;

use async_trait::async_trait;
use auth_policy_sdk::{AccountQuery, AccountStatusLookup, AuthAction, CheckRequest, PolicyKind};
use tracing::{debug, error};

use super::{PolicyContext, PolicyEvaluator};
use crate::domain::fail_closed::call_async;
use crate::domain::outcome::{Denial, PolicyOutcome};

pub struct AccountStatusPolicy {
    accounts: Arc<dyn AccountStatusLookup>,
}

impl AccountStatusPolicy {
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStatusLookup>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl PolicyEvaluator for AccountStatusPolicy {
    fn kind(&self) -> PolicyKind {
        PolicyKind::AccountStatus
    }

    async fn evaluate(&self, request: &CheckRequest, _ctx: &PolicyContext) -> PolicyOutcome {
        // A registering user has no account yet.
        if request.action == AuthAction::Register || !request.has_principal() {
            debug!(policy = %self.kind(), "account status check skipped");
            return PolicyOutcome::Allow;
        }

        let query = AccountQuery {
            user_id: request.user_id.clone(),
            email: request.email.clone(),
        };

        let account = match call_async(|| self.accounts.find_account(&query)).await {
            Ok(account) => account,
            Err(e) => {
                error!(policy = %self.kind(), error = %e, "account lookup failed");
                return PolicyOutcome::DenyEvaluationFailed;
            }
        };

        // Unknown users are the auth service's business.
        let Some(account) = account else {
            return PolicyOutcome::Allow;
        };

        if account.suspended {
            PolicyOutcome::DenyConfirmed(Denial::AccountSuspended {
                reason: account.suspended_reason,
            })
        } else if account.active {
            PolicyOutcome::Allow
        } else {
            PolicyOutcome::DenyConfirmed(Denial::AccountInactive)
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use auth_policy_sdk::{AccountStatus, AuthPolicyError, AuthSettings};

    struct RecordingLookup {
        account: Option<AccountStatus>,
        queries: Mutex<Vec<AccountQuery>>,
    }

    impl RecordingLookup {
        fn new(account: Option<AccountStatus>) -> Self {
            Self {
                account,
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AccountStatusLookup for RecordingLookup {
        async fn find_account(
            &self,
            query: &AccountQuery,
        ) -> Result<Option<AccountStatus>, AuthPolicyError> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(self.account.clone())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl AccountStatusLookup for FailingLookup {
        async fn find_account(
            &self,
            _query: &AccountQuery,
        ) -> Result<Option<AccountStatus>, AuthPolicyError> {
            Err(AuthPolicyError::Backend("Database connection failed".to_owned()))
        }
    }

    fn account(active: bool, suspended: bool) -> AccountStatus {
        AccountStatus {
            id: "user-1".to_owned(),
            email: "user@example.com".to_owned(),
            active,
            suspended,
            suspended_reason: None,
        }
    }

    fn ctx() -> PolicyContext {
        PolicyContext {
            settings: AuthSettings::all_enabled(),
        }
    }

    #[tokio::test]
    async fn register_skips_lookup() {
        let lookup = Arc::new(RecordingLookup::new(Some(account(false, true))));
        let policy = AccountStatusPolicy::new(lookup.clone());

        let request = CheckRequest::new(AuthAction::Register).with_email("user@example.com");
        assert!(policy.evaluate(&request, &ctx()).await.is_allow());
        assert!(lookup.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_principal_skips_lookup() {
        let lookup = Arc::new(RecordingLookup::new(Some(account(false, true))));
        let policy = AccountStatusPolicy::new(lookup.clone());

        let request = CheckRequest::new(AuthAction::Login).with_ip("127.0.0.1");
        assert!(policy.evaluate(&request, &ctx()).await.is_allow());
        assert!(lookup.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn queries_by_user_id_and_email() {
        let lookup = Arc::new(RecordingLookup::new(None));
        let policy = AccountStatusPolicy::new(lookup.clone());

        let request = CheckRequest::new(AuthAction::Login)
            .with_user_id("user-1")
            .with_email("user@example.com");
        assert!(policy.evaluate(&request, &ctx()).await.is_allow());

        let queries = lookup.queries.lock().unwrap();
        assert_eq!(
            queries.as_slice(),
            &[AccountQuery {
                user_id: Some("user-1".to_owned()),
                email: Some("user@example.com".to_owned()),
            }]
        );
    }

    #[tokio::test]
    async fn suspended_wins_over_active() {
        let mut suspended = account(true, true);
        suspended.suspended_reason = Some("Chargeback".to_owned());
        let policy = AccountStatusPolicy::new(Arc::new(RecordingLookup::new(Some(suspended))));

        let request = CheckRequest::new(AuthAction::Login).with_user_id("user-1");
        assert_eq!(
            policy.evaluate(&request, &ctx()).await,
            PolicyOutcome::DenyConfirmed(Denial::AccountSuspended {
                reason: Some("Chargeback".to_owned())
            })
        );
    }

    #[tokio::test]
    async fn inactive_account_is_denied() {
        let policy =
            AccountStatusPolicy::new(Arc::new(RecordingLookup::new(Some(account(false, false)))));

        let request = CheckRequest::new(AuthAction::MagicLink).with_email("user@example.com");
        assert_eq!(
            policy.evaluate(&request, &ctx()).await,
            PolicyOutcome::DenyConfirmed(Denial::AccountInactive)
        );
    }

    #[tokio::test]
    async fn lookup_error_fails_closed() {
        let policy = AccountStatusPolicy::new(Arc::new(FailingLookup));

        let request = CheckRequest::new(AuthAction::Login).with_email("user@example.com");
        assert_eq!(
            policy.evaluate(&request, &ctx()).await,
            PolicyOutcome::DenyEvaluationFailed
        );
    }
}

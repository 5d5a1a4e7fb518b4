//! In-memory account directory.

use auth_policy_sdk::{AccountQuery, AccountStatus};

/// Accounts held in configuration order.
pub struct StaticAccountDirectory {
    accounts: Vec<AccountStatus>,
}

impl StaticAccountDirectory {
    #[must_use]
    pub fn new(accounts: Vec<AccountStatus>) -> Self {
        Self { accounts }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// First account whose id equals `query.user_id` or whose email equals
    /// `query.email`, ignoring ASCII case for the email.
    #[must_use]
    pub fn find(&self, query: &AccountQuery) -> Option<&AccountStatus> {
        self.accounts.iter().find(|account| {
            query.user_id.as_deref() == Some(account.id.as_str())
                || query
                    .email
                    .as_deref()
                    .is_some_and(|email| email.eq_ignore_ascii_case(&account.email))
        })
    }
}

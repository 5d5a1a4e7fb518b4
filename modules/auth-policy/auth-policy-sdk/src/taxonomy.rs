//! Public auth error catalogue.
//!
//! Clients resolve errors by `slug`, never by HTTP status, and never see
//! backend messages. The gate itself does not use this module; it is the
//! vocabulary the HTTP layer answers with.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Error family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthErrorCategory {
    Auth,
    Authz,
    Session,
    Token,
    Account,
    Policy,
}

/// Full definition of one catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthErrorDef {
    pub slug: AuthErrorSlug,
    pub http_status: u16,
    pub retryable: bool,
    pub user_message_key: &'static str,
    pub category: AuthErrorCategory,
}

macro_rules! auth_error_slugs {
    ($($variant:ident => $slug:literal, $status:literal, $retryable:literal, $key:literal, $category:ident;)*) => {
        /// Stable public error identifier.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum AuthErrorSlug {
            $($variant,)*
        }

        impl AuthErrorSlug {
            /// Every slug in catalogue order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $slug,)*
                }
            }

            #[must_use]
            pub fn definition(self) -> AuthErrorDef {
                match self {
                    $(Self::$variant => AuthErrorDef {
                        slug: self,
                        http_status: $status,
                        retryable: $retryable,
                        user_message_key: $key,
                        category: AuthErrorCategory::$category,
                    },)*
                }
            }
        }
    };
}

auth_error_slugs! {
    AuthInvalidCredentials => "AUTH_INVALID_CREDENTIALS", 401, false, "auth.error.invalid_credentials", Auth;
    AuthEmailNotConfirmed => "AUTH_EMAIL_NOT_CONFIRMED", 401, false, "auth.error.email_not_confirmed", Auth;
    AuthAccountLocked => "AUTH_ACCOUNT_LOCKED", 401, false, "auth.error.account_locked", Auth;
    AuthDisabled => "AUTH_DISABLED", 401, true, "auth.error.auth_disabled", Auth;
    AuthEmailDisabled => "AUTH_EMAIL_DISABLED", 403, false, "auth.error.email_disabled", Auth;
    AuthEmailProviderError => "AUTH_EMAIL_PROVIDER_ERROR", 502, true, "auth.error.email_provider_error", Auth;
    AuthEmailRateLimited => "AUTH_EMAIL_RATE_LIMITED", 429, true, "auth.error.email_rate_limited", Auth;
    AuthEmailSendFailed => "AUTH_EMAIL_SEND_FAILED", 500, false, "auth.error.email_send_failed", Auth;
    AuthUnknown => "AUTH_UNKNOWN", 500, false, "auth.error.unknown", Auth;

    AuthzInsufficientPermissions => "AUTHZ_INSUFFICIENT_PERMISSIONS", 403, false, "auth.error.insufficient_permissions", Authz;
    AuthzRoleNotAllowed => "AUTHZ_ROLE_NOT_ALLOWED", 403, false, "auth.error.role_not_allowed", Authz;
    AuthzMagicLinkNotAllowed => "AUTHZ_MAGIC_LINK_NOT_ALLOWED", 403, false, "auth.error.magic_link_not_allowed", Authz;
    AuthzAdminRequired => "AUTHZ_ADMIN_REQUIRED", 403, false, "auth.error.admin_required", Authz;

    SessionExpired => "SESSION_EXPIRED", 401, true, "auth.error.session_expired", Session;
    SessionInvalid => "SESSION_INVALID", 401, false, "auth.error.session_invalid", Session;
    SessionRevoked => "SESSION_REVOKED", 401, false, "auth.error.session_revoked", Session;

    TokenExpired => "TOKEN_EXPIRED", 401, true, "auth.error.token_expired", Token;
    TokenInvalid => "TOKEN_INVALID", 401, false, "auth.error.token_invalid", Token;
    TokenMissing => "TOKEN_MISSING", 401, false, "auth.error.token_missing", Token;
    TokenRevoked => "TOKEN_REVOKED", 401, false, "auth.error.token_revoked", Token;

    AccountNotFound => "ACCOUNT_NOT_FOUND", 404, false, "auth.error.account_not_found", Account;
    AccountSuspended => "ACCOUNT_SUSPENDED", 403, false, "auth.error.account_suspended", Account;
    AccountBanned => "ACCOUNT_BANNED", 403, false, "auth.error.account_banned", Account;
    AccountDeleted => "ACCOUNT_DELETED", 404, false, "auth.error.account_deleted", Account;
    AccountEmailAlreadyExists => "ACCOUNT_EMAIL_ALREADY_EXISTS", 409, false, "auth.error.email_already_exists", Account;
    AccountBlocked => "ACCOUNT_BLOCKED", 403, false, "auth.error.account_blocked", Account;

    PolicyRateLimited => "POLICY_RATE_LIMITED", 429, true, "auth.error.rate_limited", Policy;
    PolicyAbuseDetected => "POLICY_ABUSE_DETECTED", 403, false, "auth.error.abuse_detected", Policy;
    PolicyBlocked => "POLICY_BLOCKED", 403, false, "auth.error.policy_blocked", Policy;
    PolicyInvalidRequest => "POLICY_INVALID_REQUEST", 400, false, "auth.error.invalid_request", Policy;
    PolicyNotFound => "POLICY_NOT_FOUND", 404, false, "auth.error.not_found", Policy;
}

impl AuthErrorSlug {
    /// Retryability as declared in the catalogue; never inferred.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        self.definition().retryable
    }

    /// Suggested client backoff. Clients should prefer a `Retry-After`
    /// header when one is sent.
    #[must_use]
    pub fn retry_delay(self) -> Duration {
        match self {
            Self::PolicyRateLimited => Duration::from_secs(15 * 60),
            _ => Duration::ZERO,
        }
    }
}

impl fmt::Display for AuthErrorSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error body exposed to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicAuthError {
    pub slug: AuthErrorSlug,
    pub retryable: bool,
}

impl From<AuthErrorSlug> for PublicAuthError {
    fn from(slug: AuthErrorSlug) -> Self {
        Self {
            slug,
            retryable: slug.is_retryable(),
        }
    }
}

/// Coarse policy outcome reported by request-level middleware.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyResult {
    RateLimited { blocked_until: Option<i64> },
    Blocked,
    InvalidRequest,
}

impl PolicyResult {
    #[must_use]
    pub fn to_slug(self) -> AuthErrorSlug {
        match self {
            Self::RateLimited { .. } => AuthErrorSlug::PolicyRateLimited,
            Self::Blocked => AuthErrorSlug::PolicyBlocked,
            Self::InvalidRequest => AuthErrorSlug::PolicyInvalidRequest,
        }
    }
}

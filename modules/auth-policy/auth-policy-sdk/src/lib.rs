//! Auth Policy SDK
//!
//! This crate provides the public contract of the auth policy gate:
//!
//! - [`AuthPolicyGatewayClient`] - Public API trait for consumers (HTTP auth endpoints)
//! - [`SettingsProvider`], [`AccountStatusLookup`], [`RateLimiter`], [`AbuseDetector`] -
//!   Collaborator traits the gate calls, in that order
//! - [`CheckRequest`], [`PolicyDecision`] - Request and decision models
//! - [`AuthSettings`] - Typed feature-flag and auth-config snapshot
//! - [`AuthPolicyError`] - Collaborator failure type
//! - [`taxonomy`] - Stable public auth error catalogue
//!
//! ## Usage
//!
//! ```ignore
//! use auth_policy_sdk::{AuthAction, AuthPolicyGatewayClient, CheckRequest};
//!
//! let decision = gate
//!     .check(
//!         CheckRequest::new(AuthAction::Login)
//!             .with_ip("127.0.0.1")
//!             .with_email("user@example.com"),
//!     )
//!     .await;
//!
//! if !decision.allowed {
//!     // map `decision.policy` / `decision.retryable` to an HTTP response
//! }
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod clock;
pub mod error;
pub mod models;
pub mod plugin_api;
pub mod settings;
pub mod taxonomy;

// Re-export main types at crate root
pub use api::AuthPolicyGatewayClient;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::AuthPolicyError;
pub use models::{
    AbuseSignal, AccountQuery, AccountStatus, AuthAction, CheckRequest, DecisionMetadata,
    PolicyDecision, PolicyKind, RateLimitBucket, RateLimitStatus,
};
pub use plugin_api::{
    AbuseDetector, AccountStatusLookup, Collaborators, RateLimiter, SettingsProvider,
};
pub use settings::{ActionToggle, AuthActionToggles, AuthSettings, FeatureFlag, FeatureFlags};

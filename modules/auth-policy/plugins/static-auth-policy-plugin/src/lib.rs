//! Static Auth Policy Plugin
//!
//! Config-driven, in-memory implementations of the auth policy gate
//! collaborators. Intended for development, tests and single-node
//! deployments:
//!
//! - [`StaticSettingsProvider`] - settings snapshot, replaceable at runtime
//! - [`StaticAccountDirectory`] - accounts listed in config
//! - [`WindowedRateLimiter`] - fixed-window counters with a block period
//! - [`DenyListAbuseDetector`] - ip, email and user-agent deny lists
//!
//! ## Configuration
//!
//! ```yaml
//! settings:
//!   feature_flags:
//!     enable_user_registration: true
//!   auth:
//!     login: { enabled: true }
//! accounts:
//!   - id: "user-1"
//!     email: "user@example.com"
//!     suspended: true
//!     suspended_reason: "Chargeback"
//! rate_limits:
//!   login: { max_attempts: 5, window_secs: 900, block_secs: 900 }
//! abuse:
//!   blocked_ips: ["203.0.113.7"]
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;

pub use config::{
    AbuseConfig, AccountConfig, ConfigError, RateLimitProfile, RateLimitProfiles,
    StaticAuthPolicyPluginConfig,
};
pub use domain::{
    DenyListAbuseDetector, Service, StaticAccountDirectory, StaticSettingsProvider,
    WindowedRateLimiter,
};

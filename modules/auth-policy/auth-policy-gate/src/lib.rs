//! Auth Policy Gate
//!
//! Ordered, fail-closed policy chain evaluated before every auth action:
//!
//! 1. feature flags
//! 2. account status
//! 3. rate limit
//! 4. abuse detection
//!
//! The first denial short-circuits the chain. Collaborator errors and
//! panics never escape [`AuthPolicyGate::check`]; they become retryable
//! denials attributed to the policy that made the call.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::{AuthPolicyGateConfig, UnrecognizedActionMode};
pub use domain::{AuthPolicyGate, AuthPolicyGwLocalClient, Denial, DomainError, PolicyOutcome};
pub use module::AuthPolicyGateModule;

//! Domain layer for the auth policy gate.

pub mod error;
pub mod fail_closed;
pub mod local_client;
pub mod outcome;
pub mod policies;
pub mod service;

pub use error::DomainError;
pub use local_client::AuthPolicyGwLocalClient;
pub use outcome::{Denial, PolicyOutcome};
pub use service::AuthPolicyGate;

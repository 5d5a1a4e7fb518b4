//! Domain layer for the static auth policy plugin.

pub mod abuse;
pub mod accounts;
pub mod client;
pub mod rate_limiter;
pub mod service;
pub mod settings;

pub use abuse::DenyListAbuseDetector;
pub use accounts::StaticAccountDirectory;
pub use rate_limiter::WindowedRateLimiter;
pub use service::Service;
pub use settings::StaticSettingsProvider;

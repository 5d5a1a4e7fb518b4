//! Configuration for the static auth policy plugin.

use std::path::Path;

use auth_policy_sdk::{AccountStatus, AuthSettings, RateLimitBucket};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Prefix of environment variables that override file values. Nested keys
/// are separated by `__`, e.g. `AUTH_POLICY_RATE_LIMITS__LOGIN__MAX_ATTEMPTS`.
pub const ENV_PREFIX: &str = "AUTH_POLICY_";

/// Plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticAuthPolicyPluginConfig {
    /// Settings snapshot served to the gate.
    pub settings: AuthSettings,

    /// Accounts known to the directory, matched in order.
    pub accounts: Vec<AccountConfig>,

    /// Per-bucket attempt budgets.
    pub rate_limits: RateLimitProfiles,

    /// Abuse deny lists.
    pub abuse: AbuseConfig,
}

impl StaticAuthPolicyPluginConfig {
    /// Load from a YAML file, then apply `AUTH_POLICY_` environment
    /// overrides. Missing keys keep their defaults; a missing file is
    /// treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if the sources cannot be parsed into
    /// the config, or [`ConfigError::InvalidRateLimit`] if a profile is
    /// unusable.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRateLimit`] for the first profile with
    /// a zero limit, window or block period.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for bucket in RateLimitProfiles::BUCKETS {
            self.rate_limits.get(bucket).validate(bucket)?;
        }
        Ok(())
    }
}

/// A single account entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    pub id: String,
    pub email: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub suspended: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suspended_reason: Option<String>,
}

fn default_active() -> bool {
    true
}

impl From<AccountConfig> for AccountStatus {
    fn from(cfg: AccountConfig) -> Self {
        Self {
            id: cfg.id,
            email: cfg.email,
            active: cfg.active,
            suspended: cfg.suspended,
            suspended_reason: cfg.suspended_reason,
        }
    }
}

/// Fixed-window budget for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitProfile {
    /// Attempts allowed per window. The next one is refused and starts
    /// the block.
    pub max_attempts: u32,
    pub window_secs: u64,
    pub block_secs: u64,
}

impl RateLimitProfile {
    #[must_use]
    pub const fn new(max_attempts: u32, window_secs: u64, block_secs: u64) -> Self {
        Self {
            max_attempts,
            window_secs,
            block_secs,
        }
    }

    #[must_use]
    pub fn window_millis(&self) -> i64 {
        secs_to_millis(self.window_secs)
    }

    #[must_use]
    pub fn block_millis(&self) -> i64 {
        secs_to_millis(self.block_secs)
    }

    fn validate(&self, bucket: RateLimitBucket) -> Result<(), ConfigError> {
        let detail = if self.max_attempts == 0 {
            "max_attempts must be greater than zero"
        } else if self.window_secs == 0 {
            "window_secs must be greater than zero"
        } else if self.block_secs == 0 {
            "block_secs must be greater than zero"
        } else {
            return Ok(());
        };
        Err(ConfigError::InvalidRateLimit { bucket, detail })
    }
}

fn secs_to_millis(secs: u64) -> i64 {
    i64::try_from(secs.saturating_mul(1000)).unwrap_or(i64::MAX)
}

const FIFTEEN_MINUTES: u64 = 15 * 60;
const ONE_HOUR: u64 = 60 * 60;

/// Budgets for every bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RateLimitProfiles {
    pub login: RateLimitProfile,
    pub signup: RateLimitProfile,
    pub magic_link: RateLimitProfile,
    pub password_reset: RateLimitProfile,
}

impl Default for RateLimitProfiles {
    fn default() -> Self {
        Self {
            login: RateLimitProfile::new(5, FIFTEEN_MINUTES, FIFTEEN_MINUTES),
            signup: RateLimitProfile::new(10, FIFTEEN_MINUTES, FIFTEEN_MINUTES),
            magic_link: RateLimitProfile::new(3, ONE_HOUR, ONE_HOUR),
            password_reset: RateLimitProfile::new(3, ONE_HOUR, ONE_HOUR),
        }
    }
}

impl RateLimitProfiles {
    pub const BUCKETS: [RateLimitBucket; 4] = [
        RateLimitBucket::Login,
        RateLimitBucket::Signup,
        RateLimitBucket::MagicLink,
        RateLimitBucket::PasswordReset,
    ];

    #[must_use]
    pub fn get(&self, bucket: RateLimitBucket) -> &RateLimitProfile {
        match bucket {
            RateLimitBucket::Login => &self.login,
            RateLimitBucket::Signup => &self.signup,
            RateLimitBucket::MagicLink => &self.magic_link,
            RateLimitBucket::PasswordReset => &self.password_reset,
        }
    }
}

/// Requests matching any list are flagged as abusive.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AbuseConfig {
    pub blocked_ips: Vec<String>,
    /// Compared case-insensitively.
    pub blocked_emails: Vec<String>,
    /// Case-insensitive substrings of the user agent.
    pub blocked_user_agents: Vec<String>,
}

/// Plugin configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load static auth policy config: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid rate limit profile for bucket `{bucket}`: {detail}")]
    InvalidRateLimit {
        bucket: RateLimitBucket,
        detail: &'static str,
    },
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        Self::Load(Box::new(e))
    }
}

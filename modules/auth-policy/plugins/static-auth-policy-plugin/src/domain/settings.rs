//! Settings snapshot that can be swapped at runtime.

use std::sync::Arc;

use arc_swap::ArcSwap;
use auth_policy_sdk::AuthSettings;
use tracing::info;

/// Serves a fixed [`AuthSettings`] snapshot until [`replace`](Self::replace)
/// swaps it. Readers never block writers.
pub struct StaticSettingsProvider {
    current: ArcSwap<AuthSettings>,
}

impl StaticSettingsProvider {
    #[must_use]
    pub fn new(settings: AuthSettings) -> Self {
        Self {
            current: ArcSwap::from_pointee(settings),
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<AuthSettings> {
        self.current.load_full()
    }

    /// Install a new snapshot. The next `load_settings` call sees it.
    pub fn replace(&self, settings: AuthSettings) {
        info!(
            enable_user_registration = settings.feature_flags.enable_user_registration,
            enable_rate_limit = settings.feature_flags.enable_rate_limit,
            enable_abuse_detection = settings.feature_flags.enable_abuse_detection,
            "auth settings replaced"
        );
        self.current.store(Arc::new(settings));
    }
}

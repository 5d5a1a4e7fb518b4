//! Fixed-window attempt counter with a block period.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use auth_policy_sdk::{Clock, RateLimitBucket, RateLimitStatus};
use dashmap::DashMap;
use tracing::debug;

use crate::config::{RateLimitProfile, RateLimitProfiles};

/// Expired counters are swept on every `SWEEP_EVERY`-th recorded attempt.
pub const SWEEP_EVERY: u64 = 256;

#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: i64,
    attempts: u32,
    blocked_until: Option<i64>,
}

impl Window {
    fn fresh(now: i64) -> Self {
        Self {
            started_at: now,
            attempts: 0,
            blocked_until: None,
        }
    }

    fn is_stale(&self, now: i64, profile: &RateLimitProfile) -> bool {
        match self.blocked_until {
            Some(until) => now >= until,
            None => now.saturating_sub(self.started_at) >= profile.window_millis(),
        }
    }
}

/// Per `(bucket, identity)` counter.
///
/// Within a window the first `max_attempts` attempts are allowed. The next
/// one is refused and blocks the identity for `block_secs`; every attempt
/// during the block is refused with the same `blocked_until`. Once the
/// block or the window has passed the counter starts over.
///
/// Identities are trimmed and lowercased, so `User@Example.com` and
/// `user@example.com` share a counter. Counters whose window and block have
/// passed are dropped periodically while attempts are recorded.
pub struct WindowedRateLimiter {
    profiles: RateLimitProfiles,
    clock: Arc<dyn Clock>,
    windows: DashMap<(RateLimitBucket, String), Window>,
    recorded: AtomicU64,
}

impl WindowedRateLimiter {
    #[must_use]
    pub fn new(profiles: RateLimitProfiles, clock: Arc<dyn Clock>) -> Self {
        Self {
            profiles,
            clock,
            windows: DashMap::new(),
            recorded: AtomicU64::new(0),
        }
    }

    /// Record one attempt and report the resulting budget.
    #[must_use]
    pub fn record(&self, bucket: RateLimitBucket, identity: &str) -> RateLimitStatus {
        let profile = self.profiles.get(bucket);
        let now = self.clock.now_millis();

        // Must run before an entry guard is held: `retain` locks every shard.
        let recorded = self.recorded.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        if recorded % SWEEP_EVERY == 0 {
            let purged = self.sweep(now);
            if purged > 0 {
                debug!(purged, "expired rate limit counters dropped");
            }
        }

        let mut entry = self
            .windows
            .entry((bucket, normalize(identity)))
            .or_insert_with(|| Window::fresh(now));
        let window = entry.value_mut();

        if let Some(until) = window.blocked_until.filter(|until| now < *until) {
            return refused(until);
        }
        if window.is_stale(now, profile) {
            *window = Window::fresh(now);
        }

        window.attempts = window.attempts.saturating_add(1);
        if window.attempts > profile.max_attempts {
            let until = now.saturating_add(profile.block_millis());
            window.blocked_until = Some(until);
            debug!(%bucket, blocked_until = until, "rate limit block started");
            return refused(until);
        }

        RateLimitStatus {
            allowed: true,
            remaining: profile.max_attempts - window.attempts,
            blocked_until: None,
        }
    }

    /// Forget the counter for one identity, e.g. after a successful login.
    pub fn reset(&self, bucket: RateLimitBucket, identity: &str) {
        self.windows.remove(&(bucket, normalize(identity)));
    }

    /// Drop counters whose window and block have both passed. Returns the
    /// number of entries removed.
    #[must_use]
    pub fn purge_expired(&self) -> usize {
        self.sweep(self.clock.now_millis())
    }

    fn sweep(&self, now: i64) -> usize {
        let before = self.windows.len();
        self.windows
            .retain(|(bucket, _), window| !window.is_stale(now, self.profiles.get(*bucket)));
        before.saturating_sub(self.windows.len())
    }

    /// Number of tracked `(bucket, identity)` counters.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.windows.len()
    }
}

fn normalize(identity: &str) -> String {
    identity.trim().to_lowercase()
}

fn refused(until: i64) -> RateLimitStatus {
    RateLimitStatus {
        allowed: false,
        remaining: 0,
        blocked_until: Some(until),
    }
}

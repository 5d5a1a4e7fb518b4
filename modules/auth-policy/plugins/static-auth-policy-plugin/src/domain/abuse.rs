//! Deny-list abuse detector.

use std::collections::HashSet;

use auth_policy_sdk::AbuseSignal;
use tracing::debug;

use crate::config::AbuseConfig;

/// Flags a request when its ip, email or user agent is deny-listed.
pub struct DenyListAbuseDetector {
    ips: HashSet<String>,
    emails: HashSet<String>,
    user_agent_patterns: Vec<String>,
}

impl DenyListAbuseDetector {
    #[must_use]
    pub fn new(cfg: &AbuseConfig) -> Self {
        Self {
            ips: cfg
                .blocked_ips
                .iter()
                .map(|ip| ip.trim().to_owned())
                .filter(|ip| !ip.is_empty())
                .collect(),
            emails: cfg
                .blocked_emails
                .iter()
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty())
                .collect(),
            user_agent_patterns: cfg
                .blocked_user_agents
                .iter()
                .map(|ua| ua.trim().to_lowercase())
                .filter(|ua| !ua.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn is_abusive(&self, signal: &AbuseSignal) -> bool {
        let rule = if signal
            .ip
            .as_deref()
            .is_some_and(|ip| self.ips.contains(ip.trim()))
        {
            "ip"
        } else if signal
            .email
            .as_deref()
            .is_some_and(|email| self.emails.contains(&email.trim().to_lowercase()))
        {
            "email"
        } else if signal.user_agent.as_deref().is_some_and(|ua| {
            let ua = ua.to_lowercase();
            self.user_agent_patterns.iter().any(|p| ua.contains(p.as_str()))
        }) {
            "user_agent"
        } else {
            return false;
        };

        debug!(rule, action = %signal.action, "request matched abuse deny list");
        true
    }
}

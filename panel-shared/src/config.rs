//! Panel configuration.
//!
//! Defaults match the rotator's standard deployment. The frontend can
//! override them through `data-*` attributes on its mount element.

use std::time::Duration;

/// Status poll period.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// How long a notification stays visible.
pub const DEFAULT_MESSAGE_TTL: Duration = Duration::from_millis(5000);

/// Number of movement log rows requested at startup.
pub const DEFAULT_LOG_LIMIT: usize = 20;

/// Native request timeout. Browser fetches are not bounded.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct PanelConfig {
    /// Base URL of the rotator API; empty means same origin
    pub api_base: String,
    pub poll_interval: Duration,
    pub message_ttl: Duration,
    pub log_limit: usize,
    pub request_timeout: Duration,
    /// Log swallowed errors to the console
    pub debug: bool,
    /// Show the advanced (admin) controls
    pub admin: bool,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            api_base: String::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            message_ttl: DEFAULT_MESSAGE_TTL,
            log_limit: DEFAULT_LOG_LIMIT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            debug: false,
            admin: false,
        }
    }
}

impl PanelConfig {
    /// Build a config from element attributes.
    ///
    /// `lookup` receives attribute names such as `data-poll-ms`. Missing or
    /// unparseable values keep their defaults.
    pub fn from_attributes<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |name: &str, default: Duration| {
            lookup(name)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(default)
        };

        Self {
            api_base: lookup("data-api-base")
                .map(|base| base.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            poll_interval: millis("data-poll-ms", defaults.poll_interval),
            message_ttl: millis("data-message-ms", defaults.message_ttl),
            log_limit: lookup("data-log-limit")
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|limit| *limit > 0)
                .unwrap_or(defaults.log_limit),
            request_timeout: defaults.request_timeout,
            debug: lookup("data-debug").is_some_and(|value| parse_flag(&value)),
            admin: lookup("data-admin").is_some_and(|value| parse_flag(&value)),
        }
    }

    /// Poll period in whole milliseconds, as browser timers expect.
    pub fn poll_interval_ms(&self) -> u32 {
        timer_millis(self.poll_interval)
    }
}

/// Milliseconds for a browser timer, saturating at `u32::MAX`.
pub fn timer_millis(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn attrs(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_attributes() {
        let config = PanelConfig::from_attributes(|_| None);
        assert_eq!(config, PanelConfig::default());
        assert_eq!(config.poll_interval_ms(), 2000);
        assert_eq!(timer_millis(config.message_ttl), 5000);
        assert_eq!(config.log_limit, 20);
    }

    #[test]
    fn test_timer_millis_saturates() {
        assert_eq!(timer_millis(Duration::from_millis(1500)), 1500);
        assert_eq!(timer_millis(Duration::from_secs(u64::MAX)), u32::MAX);
    }

    #[test]
    fn test_overrides() {
        let map = attrs(&[
            ("data-api-base", "http://rotator.local:8000/"),
            ("data-poll-ms", "500"),
            ("data-log-limit", "5"),
            ("data-debug", "true"),
            ("data-admin", "1"),
        ]);
        let config = PanelConfig::from_attributes(|name| map.get(name).cloned());

        assert_eq!(config.api_base, "http://rotator.local:8000");
        assert_eq!(config.poll_interval, Duration::from_millis(500));
        assert_eq!(config.log_limit, 5);
        assert!(config.debug);
        assert!(config.admin);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let map = attrs(&[
            ("data-poll-ms", "0"),
            ("data-message-ms", "soon"),
            ("data-log-limit", "-2"),
            ("data-debug", "nope"),
        ]);
        let config = PanelConfig::from_attributes(|name| map.get(name).cloned());

        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
        assert_eq!(config.message_ttl, DEFAULT_MESSAGE_TTL);
        assert_eq!(config.log_limit, DEFAULT_LOG_LIMIT);
        assert!(!config.debug);
    }
}

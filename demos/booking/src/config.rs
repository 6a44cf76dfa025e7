//! Configuration management for the booking application.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Default conference name
pub const DEFAULT_CONFERENCE_NAME: &str = "Rust Conference";

/// Default number of tickets on sale
pub const DEFAULT_TOTAL_TICKETS: u32 = 50;

/// Default wait before a confirmation is sent
pub const DEFAULT_CONFIRMATION_DELAY: Duration = Duration::from_secs(5);

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name shown in the greeting and capacity messages (`CONFERENCE_NAME`)
    pub conference_name: String,
    /// Tickets on sale at startup (`CONFERENCE_TICKETS`)
    pub total_tickets: u32,
    /// Wait before a confirmation is sent (`CONFIRMATION_DELAY_SECS`)
    pub confirmation_delay: Duration,
    /// Upper bound on the wait for outstanding confirmations at exit
    /// (`SHUTDOWN_TIMEOUT_SECS`). `None` waits as long as it takes.
    pub shutdown_timeout: Option<Duration>,
    /// Keep taking requests until sold out instead of a single request
    /// (`BOOKING_REPEAT`)
    pub repeat_until_sold_out: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        Self {
            conference_name: lookup("CONFERENCE_NAME")
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_CONFERENCE_NAME.to_string()),
            total_tickets: lookup("CONFERENCE_TICKETS")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(DEFAULT_TOTAL_TICKETS),
            confirmation_delay: parsed("CONFIRMATION_DELAY_SECS")
                .map_or(DEFAULT_CONFIRMATION_DELAY, Duration::from_secs),
            shutdown_timeout: parsed("SHUTDOWN_TIMEOUT_SECS").map(Duration::from_secs),
            repeat_until_sold_out: lookup("BOOKING_REPEAT")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(false),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.conference_name, "Rust Conference");
        assert_eq!(config.total_tickets, 50);
        assert_eq!(config.confirmation_delay, Duration::from_secs(5));
        assert_eq!(config.shutdown_timeout, None);
        assert!(!config.repeat_until_sold_out);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("CONFERENCE_NAME", "RustConf"),
            ("CONFERENCE_TICKETS", "120"),
            ("CONFIRMATION_DELAY_SECS", "0"),
            ("SHUTDOWN_TIMEOUT_SECS", "30"),
            ("BOOKING_REPEAT", "true"),
        ]);

        assert_eq!(config.conference_name, "RustConf");
        assert_eq!(config.total_tickets, 120);
        assert_eq!(config.confirmation_delay, Duration::ZERO);
        assert_eq!(config.shutdown_timeout, Some(Duration::from_secs(30)));
        assert!(config.repeat_until_sold_out);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("CONFERENCE_NAME", "  "),
            ("CONFERENCE_TICKETS", "-3"),
            ("CONFIRMATION_DELAY_SECS", "soon"),
            ("SHUTDOWN_TIMEOUT_SECS", ""),
            ("BOOKING_REPEAT", "yes"),
        ]);

        assert_eq!(config, Config::default());
    }
}

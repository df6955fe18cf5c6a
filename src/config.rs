//! Configuration Module
//!
//! Handles loading and managing cache and server configuration from
//! environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::MIN_SWEEP_INTERVAL;

// == Cache Settings ==
/// Size and lifetime of one named cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Default TTL in seconds
    pub ttl_secs: u64,
    /// Maximum number of entries
    pub max_size: usize,
}

impl CacheSettings {
    /// Reads `{prefix}_TTL` and `{prefix}_MAX_SIZE`, falling back to `defaults`.
    fn from_env(prefix: &str, defaults: CacheSettings) -> Self {
        Self {
            ttl_secs: env_or(&format!("{prefix}_TTL"), defaults.ttl_secs),
            max_size: env_or(&format!("{prefix}_MAX_SIZE"), defaults.max_size),
        }
    }
}

const API_DEFAULTS: CacheSettings = CacheSettings {
    ttl_secs: 5 * 60,
    max_size: 50,
};
const USER_DATA_DEFAULTS: CacheSettings = CacheSettings {
    ttl_secs: 15 * 60,
    max_size: 20,
};
const STATIC_DEFAULTS: CacheSettings = CacheSettings {
    ttl_secs: 60 * 60,
    max_size: 100,
};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Short-lived API response cache
    pub api_cache: CacheSettings,
    /// Medium-lived user data cache
    pub user_data_cache: CacheSettings,
    /// Long-lived static data cache
    pub static_cache: CacheSettings,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 60)
    /// - `API_CACHE_TTL` / `API_CACHE_MAX_SIZE` (default: 300 / 50)
    /// - `USER_DATA_CACHE_TTL` / `USER_DATA_CACHE_MAX_SIZE` (default: 900 / 20)
    /// - `STATIC_CACHE_TTL` / `STATIC_CACHE_MAX_SIZE` (default: 3600 / 100)
    pub fn from_env() -> Self {
        Self {
            api_cache: CacheSettings::from_env("API_CACHE", API_DEFAULTS),
            user_data_cache: CacheSettings::from_env("USER_DATA_CACHE", USER_DATA_DEFAULTS),
            static_cache: CacheSettings::from_env("STATIC_CACHE", STATIC_DEFAULTS),
            server_port: env_or("SERVER_PORT", 3000),
            sweep_interval_secs: env_or("SWEEP_INTERVAL", 60),
        }
    }

    /// Sweep period, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs).max(MIN_SWEEP_INTERVAL)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_cache: API_DEFAULTS,
            user_data_cache: USER_DATA_DEFAULTS,
            static_cache: STATIC_DEFAULTS,
            server_port: 3000,
            sweep_interval_secs: 60,
        }
    }
}

/// Parses `name` from the environment, or returns `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval(), Duration::from_secs(60));
        assert_eq!(config.api_cache, API_DEFAULTS);
        assert_eq!(config.user_data_cache.ttl_secs, 900);
        assert_eq!(config.static_cache.max_size, 100);
    }

    #[test]
    fn test_config_from_env_overrides() {
        env::set_var("USER_DATA_CACHE_TTL", "120");
        env::set_var("USER_DATA_CACHE_MAX_SIZE", "not-a-number");

        let config = Config::from_env();
        assert_eq!(config.user_data_cache.ttl_secs, 120);
        assert_eq!(config.user_data_cache.max_size, 20, "Invalid values fall back");

        env::remove_var("USER_DATA_CACHE_TTL");
        env::remove_var("USER_DATA_CACHE_MAX_SIZE");
    }

    #[test]
    fn test_zero_sweep_interval_is_clamped() {
        let config = Config {
            sweep_interval_secs: 0,
            ..Config::default()
        };
        assert_eq!(config.sweep_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_env_or_missing() {
        assert_eq!(env_or("MOOD_CACHE_SURELY_UNSET_VAR", 7u64), 7);
    }
}

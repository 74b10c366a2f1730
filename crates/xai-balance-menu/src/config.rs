//! Menu configuration.

use std::path::PathBuf;
use std::time::Duration;

use xai_balance_client::DEFAULT_BASE_URL;

use crate::controller::DEFAULT_REFRESH_INTERVAL;

/// Default request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A variable held a value that cannot be used.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },
}

/// Menu configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuConfig {
    /// Management API base URL (`XAI_BASE_URL`, default: `https://management-api.x.ai`).
    pub base_url: String,

    /// Time between automatic refreshes (`XAI_REFRESH_INTERVAL_SECS`, default: 1800).
    pub refresh_interval: Duration,

    /// Request timeout in seconds (`XAI_REQUEST_TIMEOUT_SECS`, default: 30).
    pub request_timeout_seconds: u64,

    /// Credentials file (`XAI_CREDENTIALS_FILE`,
    /// default: `$XDG_CONFIG_HOME/xai-balance-menu/credentials.json`).
    pub credentials_file: PathBuf,
}

impl MenuConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a numeric variable is not a
    /// positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    ///
    /// Same as [`MenuConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let refresh_interval = match lookup("XAI_REFRESH_INTERVAL_SECS") {
            Some(value) => Duration::from_secs(positive_secs("XAI_REFRESH_INTERVAL_SECS", &value)?),
            None => defaults.refresh_interval,
        };
        let request_timeout_seconds = match lookup("XAI_REQUEST_TIMEOUT_SECS") {
            Some(value) => positive_secs("XAI_REQUEST_TIMEOUT_SECS", &value)?,
            None => defaults.request_timeout_seconds,
        };
        let credentials_file = lookup("XAI_CREDENTIALS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| default_credentials_file(&lookup));

        Ok(Self {
            base_url: lookup("XAI_BASE_URL").unwrap_or(defaults.base_url),
            refresh_interval,
            request_timeout_seconds,
            credentials_file,
        })
    }
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECS,
            credentials_file: default_credentials_file(&|name: &str| std::env::var(name).ok()),
        }
    }
}

fn positive_secs(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    let invalid = |reason| ConfigError::Invalid {
        name,
        value: value.to_string(),
        reason,
    };
    match value.trim().parse::<u64>() {
        Ok(0) => Err(invalid("must be greater than zero")),
        Ok(secs) => Ok(secs),
        Err(_) => Err(invalid("expected a whole number of seconds")),
    }
}

fn default_credentials_file(lookup: &dyn Fn(&str) -> Option<String>) -> PathBuf {
    let config_dir = lookup("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(".config")))
        .unwrap_or_else(|| PathBuf::from("."));
    config_dir.join("xai-balance-menu").join("credentials.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = MenuConfig::from_lookup(lookup(&[("HOME", "/home/me")])).unwrap();
        assert_eq!(config.base_url, "https://management-api.x.ai");
        assert_eq!(config.refresh_interval, Duration::from_secs(1800));
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(
            config.credentials_file,
            PathBuf::from("/home/me/.config/xai-balance-menu/credentials.json")
        );
    }

    #[test]
    fn overrides_from_environment() {
        let config = MenuConfig::from_lookup(lookup(&[
            ("XAI_BASE_URL", "http://localhost:9000"),
            ("XAI_REFRESH_INTERVAL_SECS", "60"),
            ("XAI_REQUEST_TIMEOUT_SECS", "5"),
            ("XAI_CREDENTIALS_FILE", "/tmp/creds.json"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
        assert_eq!(config.request_timeout_seconds, 5);
        assert_eq!(config.credentials_file, PathBuf::from("/tmp/creds.json"));
    }

    #[test]
    fn xdg_config_home_wins_over_home() {
        let config = MenuConfig::from_lookup(lookup(&[
            ("HOME", "/home/me"),
            ("XDG_CONFIG_HOME", "/cfg"),
        ]))
        .unwrap();
        assert_eq!(
            config.credentials_file,
            PathBuf::from("/cfg/xai-balance-menu/credentials.json")
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = MenuConfig::from_lookup(lookup(&[("XAI_REFRESH_INTERVAL_SECS", "0")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: "XAI_REFRESH_INTERVAL_SECS", .. }
        ));
    }

    #[test]
    fn non_numeric_timeout_is_rejected() {
        let err = MenuConfig::from_lookup(lookup(&[("XAI_REQUEST_TIMEOUT_SECS", "soon")])).unwrap_err();
        assert!(err.to_string().contains("XAI_REQUEST_TIMEOUT_SECS"));
    }
}

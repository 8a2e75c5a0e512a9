//! Centralized configuration management for fleetdash

use std::path::PathBuf;
use std::time::Duration;
use anyhow::{Result, Context};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// REST API connection settings
    pub api: ApiConfig,
    /// File holding the session token
    pub session_file: PathBuf,
    /// Log file written by both the CLI and the TUI
    pub log_file: PathBuf,
    /// How often the TUI polls for input and finished requests (milliseconds)
    pub tick_rate_ms: u64,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is joined onto
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_seconds: 30,
            user_agent: "fleetdash/0.1.0".to_string(),
        }
    }
}

impl ApiConfig {
    /// Get HTTP timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = ApiConfig::default();

        let api = ApiConfig {
            base_url: std::env::var("FLEETDASH_API_URL")
                .unwrap_or(defaults.base_url)
                .trim_end_matches('/')
                .to_string(),
            timeout_seconds: parse_env_var("FLEETDASH_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.timeout_seconds),
            user_agent: std::env::var("FLEETDASH_USER_AGENT").unwrap_or(defaults.user_agent),
        };

        let session_file = std::env::var("FLEETDASH_SESSION_FILE")
            .unwrap_or_else(|_| "./.fleetdash_session".to_string())
            .into();

        let log_file = std::env::var("FLEETDASH_LOG_FILE")
            .unwrap_or_else(|_| "fleetdash.log".to_string())
            .into();

        Ok(Config {
            api,
            session_file,
            log_file,
            tick_rate_ms: parse_env_var("FLEETDASH_TICK_RATE_MS")?.unwrap_or(250),
        })
    }

    /// Get the TUI tick rate as Duration
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API base URL must start with http:// or https://: {}",
                self.api.base_url
            ));
        }

        if self.api.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be at least one second"));
        }

        if self.tick_rate_ms == 0 {
            return Err(anyhow::anyhow!("Tick rate must be greater than zero"));
        }

        // Session file parent must exist so `login` can write it
        if let Some(parent) = self.session_file.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                return Err(anyhow::anyhow!(
                    "Session file directory does not exist: {}",
                    parent.display()
                ));
            }
        }

        Ok(())
    }
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Config {
        Config {
            api: ApiConfig::default(),
            session_file: "./.fleetdash_session".into(),
            log_file: "fleetdash.log".into(),
            tick_rate_ms: 250,
        }
    }

    #[test]
    fn test_api_config_defaults() {
        let api = ApiConfig::default();
        assert_eq!(api.base_url, "http://localhost:8080");
        assert_eq!(api.timeout(), Duration::from_secs(30));
        assert_eq!(api.user_agent, "fleetdash/0.1.0");
    }

    #[test]
    fn test_config_validation() {
        let config = sample_config();
        config.validate().unwrap();
        assert_eq!(config.tick_rate(), Duration::from_millis(250));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = sample_config();
        config.api.base_url = "localhost:8080".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_missing_session_directory() {
        let mut config = sample_config();
        config.session_file = "/definitely/not/a/real/dir/session".into();
        assert!(config.validate().is_err());
    }
}

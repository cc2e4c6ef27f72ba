//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use holdem_sync::api::DEFAULT_BASE_URL;
use std::path::PathBuf;

/// Default location of the persisted bearer token
pub const DEFAULT_TOKEN_FILE: &str = ".holdem_token";

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Game service API base URL
    pub api_base: String,
    /// File the bearer token is persisted in
    pub token_file: PathBuf,
    /// Seats for `new` when no count is given
    pub default_players: u8,
    /// Speed multiplier for `auto` when none is given
    pub auto_speed: f64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_BASE_URL.to_string(),
            token_file: PathBuf::from(DEFAULT_TOKEN_FILE),
            default_players: 4,
            auto_speed: 1.0,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `api_base_override` - Optional API base URL override (from CLI args)
    /// * `token_file_override` - Optional token file override (from CLI args)
    ///
    /// Variables: `HOLDEM_API_BASE`, `HOLDEM_TOKEN_FILE`, `HOLDEM_PLAYERS`,
    /// `HOLDEM_AUTO_SPEED`. Unparseable numbers fall back to defaults.
    pub fn from_env(
        api_base_override: Option<String>,
        token_file_override: Option<PathBuf>,
    ) -> Self {
        let defaults = Self::default();

        let api_base = api_base_override
            .or_else(|| std::env::var("HOLDEM_API_BASE").ok())
            .unwrap_or(defaults.api_base);

        let token_file = token_file_override
            .or_else(|| std::env::var("HOLDEM_TOKEN_FILE").ok().map(PathBuf::from))
            .unwrap_or(defaults.token_file);

        ClientConfig {
            api_base,
            token_file,
            default_players: parse_env_or("HOLDEM_PLAYERS", defaults.default_players),
            auto_speed: parse_env_or("HOLDEM_AUTO_SPEED", defaults.auto_speed),
        }
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: "HOLDEM_API_BASE".to_string(),
                reason: format!("Must be an http(s) URL, got '{}'", self.api_base),
            });
        }

        if !(2..=10).contains(&self.default_players) {
            return Err(ConfigError::Invalid {
                var: "HOLDEM_PLAYERS".to_string(),
                reason: "Must be between 2 and 10".to_string(),
            });
        }

        if !(self.auto_speed.is_finite() && self.auto_speed > 0.0) {
            return Err(ConfigError::Invalid {
                var: "HOLDEM_AUTO_SPEED".to_string(),
                reason: "Must be a positive number".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

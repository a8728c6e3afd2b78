//! Configuration module for loading environment variables and settings.

use crate::error::ConfigError;

/// Environment variable holding the Runware API key.
pub const API_KEY_VAR: &str = "RUNWARE_API";

/// Environment variable overriding the Runware REST endpoint.
pub const BASE_URL_VAR: &str = "RUNWARE_BASE_URL";

/// Environment variable for the HTTP transport port.
pub const PORT_VAR: &str = "PORT";

/// Default Runware REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.runware.ai/v1";

/// Default HTTP transport port.
pub const DEFAULT_PORT: u16 = 3000;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Runware API key (required)
    pub api_key: String,
    /// Runware REST endpoint
    pub base_url: String,
    /// HTTP server port
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::MissingEnvVar` if RUNWARE_API is not set, or
    /// `ConfigError::InvalidValue` if PORT is not a valid port number.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead of
    /// touching the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::missing_env_var(API_KEY_VAR))?;

        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let port = match lookup(PORT_VAR) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid_value(PORT_VAR, format!("{raw:?}: {e}")))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            api_key,
            base_url,
            port,
        })
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("port", &self.port)
            .finish()
    }
}

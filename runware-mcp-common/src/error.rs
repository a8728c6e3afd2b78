//! Error types for the common library.
//!
//! This module provides a unified error hierarchy using `thiserror` for consistent
//! error handling across the Runware MCP server.
//!
//! # Error Categories
//!
//! - `ConfigError`: Missing or invalid configuration (fatal at startup)
//! - `Error::Api`: Runware API errors (includes endpoint and status)
//! - `Error::Serialization`: Malformed request or response payloads
//! - `GenerationError`: Per-invocation outcome of an image generation call

use std::borrow::Cow;

use thiserror::Error;

/// Unified error type for the common library.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration errors (missing env vars, invalid values)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// API errors with endpoint and HTTP status context
    ///
    /// A status code of `0` means the request never produced an HTTP response
    /// (connection refused, DNS failure, TLS error).
    #[error("API error for {endpoint} (HTTP {status_code}): {message}")]
    Api {
        /// The API endpoint that was called
        endpoint: String,
        /// HTTP status code returned by the API
        status_code: u16,
        /// Error message from the API or describing the failure
        message: String,
    },

    /// JSON encoding/decoding errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new API error with endpoint, status code, and message.
    ///
    /// # Example
    ///
    /// ```
    /// use runware_mcp_common::error::Error;
    ///
    /// let err = Error::api("https://api.runware.ai/v1", 401, "Invalid API key");
    /// assert!(err.to_string().contains("api.runware.ai"));
    /// assert!(err.to_string().contains("401"));
    /// ```
    pub fn api(endpoint: impl Into<String>, status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            endpoint: endpoint.into(),
            status_code,
            message: message.into(),
        }
    }

    /// Description shown to tool callers.
    ///
    /// For `Api` errors this is the upstream message alone. Endpoint and
    /// status stay available on the variant and in its `Display`.
    ///
    /// ```
    /// use runware_mcp_common::error::Error;
    ///
    /// let err = Error::api("https://api.runware.ai/v1", 401, "Invalid API key");
    /// assert_eq!(err.upstream_message(), "Invalid API key");
    /// ```
    pub fn upstream_message(&self) -> Cow<'_, str> {
        match self {
            Error::Api { message, .. } => Cow::Borrowed(message.as_str()),
            other => Cow::Owned(other.to_string()),
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Required environment variable {0} is not set")]
    MissingEnvVar(String),

    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new missing environment variable error.
    pub fn missing_env_var(name: impl Into<String>) -> Self {
        ConfigError::MissingEnvVar(name.into())
    }

    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Why an image generation call produced no usable image.
///
/// The three variants are exhaustive: the upstream call failed, it succeeded
/// with nothing in it, or the first image carries no URL. Display strings of
/// `NoImages` and `MissingUrl` are part of the tool contract.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The upstream call itself failed; displays the upstream message only
    #[error("{}", .0.upstream_message())]
    Upstream(#[from] Error),

    /// The upstream call returned an empty result set
    #[error("No images generated")]
    NoImages,

    /// The first returned image has no resolvable URL
    #[error("Generated image has no URL")]
    MissingUrl,
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;

//! Tracing initialization for the Runware MCP server.
//!
//! Log output always goes to stderr: in stdio mode stdout carries the MCP
//! message stream and must not be interleaved with log lines.
//!
//! # Usage
//!
//! ```no_run
//! use runware_mcp_common::tracing::init_tracing;
//!
//! init_tracing();
//! tracing::info!("Application started");
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Enable debug logging for all modules
//!   - `RUST_LOG=runware_mcp_image=debug` - Enable debug for a specific crate
//!   - `RUST_LOG=warn,runware_mcp_common=debug` - Warn by default, debug for common

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
    util::TryInitError,
};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_LEVEL: &str = "info";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize the tracing subscriber with environment-based filtering.
///
/// Filtering comes from `RUST_LOG` and defaults to `info`. Does nothing if a
/// global subscriber is already installed.
pub fn init_tracing() {
    let _ = try_init_tracing_with_default(DEFAULT_LEVEL);
}

/// Try to initialize tracing, returning an error if already initialized.
pub fn try_init_tracing() -> Result<(), TryInitError> {
    try_init_tracing_with_default(DEFAULT_LEVEL)
}

/// Initialize tracing with a custom default level for when `RUST_LOG` is unset.
pub fn try_init_tracing_with_default(default_level: &str) -> Result<(), TryInitError> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(fmt_layer)
        .try_init()
}

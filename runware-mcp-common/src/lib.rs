//! Runware MCP Common Library
//!
//! Shared configuration, error handling, transport selection, server
//! bootstrap and tracing for the Runware image MCP server.

pub mod config;
pub mod error;
pub mod server;
pub mod tracing;
pub mod transport;


pub use config::Config;
pub use error::{ConfigError, Error, GenerationError, Result};
pub use server::{McpServerBuilder, ServerError, http_router, shutdown_channel};
pub use transport::{Transport, TransportArgs, TransportMode};

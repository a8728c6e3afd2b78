//! Runware MCP Image Server
//!
//! MCP server for text-to-image generation using the Runware API.

use anyhow::Result;
use clap::Parser;
use runware_mcp_common::tracing::init_tracing;
use runware_mcp_common::{Config, McpServerBuilder, TransportArgs};
use runware_mcp_image::ImageServer;

/// Command-line arguments for the image server.
#[derive(Parser, Debug)]
#[command(name = "runware-mcp-image")]
#[command(about = "MCP server for text-to-image generation using Runware")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    // A missing RUNWARE_API aborts here, before any transport is opened.
    let config = Config::from_env().inspect_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
    })?;
    tracing::info!(base_url = %config.base_url, "Configuration loaded");

    let transport = args.transport.into_transport(config.port);
    let server = ImageServer::new(config);

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

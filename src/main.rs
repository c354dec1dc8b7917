//! Reclaim MCP Server - Main Entry Point
//!
//! This is the main entry point for the Reclaim MCP server application.
//! The actual implementation is in the `reclaim_mcp` library.

use anyhow::Result;
use clap::Parser;
use mcp_attr::server::serve_stdio;
use reclaim_mcp::api::DEFAULT_BASE_URL;
use reclaim_mcp::{Config, ReclaimServerHandler};
use tracing_subscriber::EnvFilter;

/// Reclaim MCP Server - Reclaim.ai task management via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Reclaim API bearer token. Required; absence is fatal at startup.
    #[arg(long, env = "RECLAIM_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Base URL of the Reclaim API
    #[arg(long, env = "RECLAIM_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP transport; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config {
        api_token: args.api_token,
        base_url: args.api_url,
    };
    let handler = ReclaimServerHandler::new(&config)?;
    serve_stdio(handler).await?;
    Ok(())
}

//! NBA MCP Server
//!
//! A Model Context Protocol server that exposes NBA scoreboard, team,
//! roster, schedule, player, statistics and news lookups.
//!
//! # Usage
//!
//! ```bash
//! nba-mcp [--config <path>] [--base-url <url>] [--timeout-secs <n>]
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Control log verbosity (default: `nba_mcp=info`)
//!
//! # Protocol
//!
//! The server communicates via JSON-RPC 2.0 over stdio:
//! - Requests/responses go through stdout
//! - Logs go to stderr (to avoid interfering with the protocol)

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use nba_mcp::{NbaMcpServer, ServerConfig};

/// MCP server for NBA data
#[derive(Parser)]
#[command(name = "nba-mcp")]
#[command(about = "MCP server for NBA data from the ESPN API")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Upstream API base URL (overrides the config file)
    #[arg(long)]
    base_url: Option<String>,

    /// Upstream request timeout in seconds (overrides the config file)
    #[arg(long)]
    timeout_secs: Option<u64>,
}

impl Args {
    fn into_config(self) -> nba_mcp::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::load(path)?,
            None => ServerConfig::default(),
        };
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(timeout_secs) = self.timeout_secs {
            config.timeout_secs = Some(timeout_secs);
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    nba_mcp::logging::init().map_err(|e| e as Box<dyn std::error::Error>)?;

    let config = Args::parse().into_config()?;

    tracing::info!(base_url = %config.base_url, "Starting nba-mcp server");

    let server = Arc::new(NbaMcpServer::new(&config)?);
    server.run().await?;

    Ok(())
}

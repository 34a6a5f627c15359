//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging at the configured level, and
//! starts the server with the configured transport. Missing Spotify
//! credentials stop the process before anything is served.

use anyhow::{Context, Result};
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use spotify_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    init_logging(&config.logging.level);

    info!("Starting {} v{}", config.server.name, config.server.version);
    if let Some(path) = &config.auth.token_cache {
        info!("Token cache file: {}", path.display());
    }
    if !config.auth.mode.requires_user() {
        warn!("MCP_AUTH_MODE=none - invocations are not gated on a user login");
    }

    let server = McpServer::new(config.clone()).context("Failed to initialize server")?;

    info!("Server initialized");

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs go to stderr: stdout belongs to the STDIO transport.
fn init_logging(level: &str) {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}

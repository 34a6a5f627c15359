//! Spotify MCP Server Library
//!
//! An MCP (Model Context Protocol) server exposing Spotify playback control
//! as a small catalog of named resources.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server context, the call
//!   gateway and the transports (HTTP, STDIO)
//! - **domains**: business logic organized by bounded contexts
//!   - **resources**: resource registry and descriptors
//!   - **auth**: credential gate, token stores and the OAuth flow
//!   - **dispatch**: call router, correlation ids and responses
//!   - **legacy**: legacy path translation
//!   - **playback**: Spotify client and the upstream adapter
//!
//! A call flows gate → legacy translator (legacy paths only) → call router
//! → upstream adapter → response.
//!
//! # Example
//!
//! ```rust,no_run
//! use spotify_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};

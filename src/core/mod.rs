//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server:
//! error handling, configuration, the server context, the call gateway
//! and the transport layer.

pub mod config;
pub mod error;
pub mod gateway;
pub mod server;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use gateway::CallGateway;
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};

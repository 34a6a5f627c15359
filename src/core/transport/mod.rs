//! Transport layer for the MCP server.
//!
//! This module provides two transport implementations:
//! - **HTTP**: resource API, legacy paths and OAuth pages - feature: `http`
//! - **STDIO**: MCP over stdin/stdout, resources as tools - feature: `stdio`
//!
//! Both hand every invocation to the same call gateway.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;

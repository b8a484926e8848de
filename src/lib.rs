//! AIO MCP Server library.
//!
//! Provides the [`server::AioMcpServer`] MCP server handler, the
//! [`client::AioClient`] upstream HTTP client, and config resolution.
//! Used by the `aio-mcp` binary and available for integration testing.

pub mod client;
pub mod config;
pub mod server;
pub mod tools;

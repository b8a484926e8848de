//! MCP tool parameter types.
//!
//! All parameter structs derive `Deserialize + JsonSchema` for MCP tool
//! registration.

pub mod params;

pub use params::*;

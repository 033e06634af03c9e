//! Wire types and normalized models for boj-mcp.
//!
//! This crate defines the solved.ac response shapes consumed by the fetch layer
//! and the trimmed-down records handed to MCP clients.

pub mod level;
pub mod models;
pub mod schema;

pub use level::level_label;
pub use models::*;

//! MCP tool modules.
//!
//! Tools are grouped by domain: problem search, the algorithm-tag catalog,
//! contest tags, user statistics, and contest study guides.

pub mod contest;
pub mod problem;
pub mod tag;
pub mod user;
mod guide;

//! Core services for boj-mcp.
//!
//! This crate owns the resilient upstream fetch client, the coalescing TTL
//! cache over the paginated tag catalog, and the solved.ac query service built
//! on both.

pub mod catalog;
pub mod contests;
pub mod fetch;
pub mod solved;

pub use catalog::{CatalogConfig, CatalogError, PagedCollectionCache};
pub use fetch::{FetchClient, FetchError, FetchOptions};
pub use solved::{SolvedAcClient, is_http_base};

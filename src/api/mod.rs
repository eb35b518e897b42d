//! HTTP surface.
//!
//! Maps URL paths and query parameters onto the query layer, the
//! aggregation module and the report renderer, returning JSON (or,
//! for the export endpoint, a PDF attachment). The router is
//! composable and can be mounted on any axum server.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;

pub use router::api_router;
pub use types::ApiContext;

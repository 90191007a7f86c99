//! Transport-level retrieval helpers.

pub mod api_http;

pub use api_http::{ApiClient, ApiClientOptions, ApiResponse};

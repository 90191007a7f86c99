//! Backend aggregation endpoint integration.
//!
//! [`apicall::DashboardApi`] speaks to the fixed sub-resources of the
//! aggregation API; [`source::BackendSource`] layers the cache and fallback
//! substitution on top to satisfy the engine's infallible
//! [`crate::engine::scheduler::DataSource`] contract.

pub mod apicall;
pub mod source;

pub use apicall::{DashboardApi, FetchError, HttpStatusProbe};
pub use source::BackendSource;

//! Data-refresh reconciliation engine.
//!
//! Decides, on a recurring schedule and in response to connectivity changes,
//! whether to fetch live data or substitute cached/static data, and recovers
//! from repeated failures without ever leaving the presentation in an
//! inconsistent or un-updating state. Presentation and transport stay behind
//! the [`scheduler::RenderSink`] and [`scheduler::DataSource`] contracts, so
//! the engine compiles and tests without either.

pub mod cache;
pub mod connectivity;
pub mod fallback;
pub mod resource;
pub mod scheduler;

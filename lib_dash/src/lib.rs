// Declare the modules to re-export
pub mod backend;
pub mod configs;
pub mod engine;
pub mod feeds;
pub mod loggers;
pub mod retrieve;

#[cfg(test)]
mod test_http;

// Re-export the engine surface
pub use engine::cache::TtlCache;
pub use engine::connectivity::{ConnectivityMonitor, ConnectivityState, StatusProbe};
pub use engine::fallback::FallbackProvider;
pub use engine::resource::{Provenance, ResourceKind, ResourceValue};
pub use engine::scheduler::{
    CycleReport, DataSource, RefreshHandle, RefreshScheduler, RefreshTrigger, RenderSink,
};

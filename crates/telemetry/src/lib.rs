//! Internal telemetry for the warehouse reports.
//!
//! Structured logging through `tracing`, plus in-process counters that are
//! logged as a snapshot after every refresh.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;

//! Observability: scan counters and the event sink they are fed through.
//!
//! The merger and scanner never touch counters directly; every event goes
//! through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EntityCounters, EntitySummary, ScanCounters, ScanOps, ScanReport};
pub use sink::{ScanEvent, ScanSink, scan_report, scan_reset, with_scan_sink};

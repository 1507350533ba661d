//! Output module for batch results
//!
//! This module handles:
//! - The discovery event log line format
//! - Output sinks (files on disk, or memory)
//! - End-of-run batch statistics

mod events;
mod file_sink;
mod memory;
pub mod stats;
mod traits;

pub use events::{EventKind, LogEvent};
pub use file_sink::{FileSink, RESULTS_HEADER};
pub use memory::MemorySink;
pub use stats::BatchSummary;
pub use traits::{OutputSink, SiteReport};

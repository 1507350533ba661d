//! State module for site classifications and remote jobs
//!
//! # Components
//!
//! - `SiteRecord` / `DiscoveryMethod`: how each input site was classified
//! - `Job` / `JobStatus`: remote jobs and their checked state machine
//! - `JobResult`: payload of a completed job, ready to persist

mod job;
mod site;

// Re-export main types
pub use job::{Job, JobResult, JobStatus};
pub use site::{DiscoveryMethod, SiteRecord, UNKNOWN_NAME};

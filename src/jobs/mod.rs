//! Remote job processing
//!
//! Hands located sitemap URLs to the processing API and polls the resulting
//! jobs until their results can be persisted.

mod client;
mod poller;

pub use client::{JobClient, StatusReport};
pub use poller::{JobPoller, PollOutcome, PollPolicy};

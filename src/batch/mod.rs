//! Batch processing of candidate sites
//!
//! This module contains the orchestration logic, including:
//! - The per-site discovery pipeline
//! - Bounded concurrency across sites with in-order output
//! - Optional job submission and polling per located sitemap

mod coordinator;

pub use coordinator::{run_batch, Coordinator};

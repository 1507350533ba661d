//! Shared HTTP layer
//!
//! All network traffic (probes, sitemap and robots.txt fetches, job API
//! calls) goes through a single [`Fetcher`] so that per-request timeouts and
//! the global in-flight limit apply everywhere.

mod fetcher;

pub use fetcher::{build_http_client, FetchedBody, Fetcher, HeadResponse};

//! Robots.txt handling module
//!
//! Fetches a site's robots.txt and extracts its `Sitemap:` declarations,
//! which the sitemap locator uses as its fallback strategy.

mod parser;

pub use parser::ParsedRobots;

use crate::http::Fetcher;
use crate::url::candidate_url;
use crate::ScoutError;

/// Fetches and parses robots.txt for a site
///
/// Uses the TLS-lenient client: robots.txt is read-only public metadata and
/// misconfigured certificates are common on small sites.
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP access
/// * `base` - Normalized site base URL
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - robots.txt was fetched with a 2xx status
/// * `Err(ScoutError)` - Transport failure or non-success status
pub async fn fetch_robots(fetcher: &Fetcher, base: &str) -> Result<ParsedRobots, ScoutError> {
    let robots_url = candidate_url(base, "robots.txt");
    tracing::debug!("Fetching robots.txt: {}", robots_url);

    let fetched = fetcher.get_text_lenient(&robots_url).await?;
    Ok(ParsedRobots::from_content(&fetched.body))
}

//! Integration tests for Sumi-Scout
//!
//! These tests use wiremock to stand up mock sites and a mock processing API,
//! and drive discovery end-to-end over real HTTP.

mod jobs_tests;
mod locator_tests;
mod sitemap_tests;

use sumi_scout::config::Config;
use sumi_scout::http::Fetcher;

/// Creates a configuration with short timeouts and no retries
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.http.probe_timeout_secs = 2;
    config.http.fetch_timeout_secs = 2;
    config.http.connect_timeout_secs = 1;
    config.http.probe_retries = 0;
    config.http.retry_backoff_ms = 10;
    config.discovery.fetch_titles = false;
    config.jobs.poll_interval_ms = 10;
    config.jobs.max_poll_secs = 5;
    config.jobs.request_timeout_secs = 2;
    config
}

/// Creates a fetcher from the test configuration
pub fn test_fetcher(config: &Config) -> Fetcher {
    Fetcher::new(&config.http).expect("Failed to build fetcher")
}

/// Renders a `<urlset>` document
pub fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("  <url><loc>{}</loc></url>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>\n",
        entries
    )
}

/// Renders a `<sitemapindex>` document
pub fn sitemap_index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("  <sitemap><loc>{}</loc></sitemap>\n", loc))
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</sitemapindex>\n",
        entries
    )
}

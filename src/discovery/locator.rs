//! Sitemap locator
//!
//! Finds a site's sitemap entry point: well-known paths first, then the
//! first `Sitemap:` line of robots.txt.

use crate::config::DiscoveryConfig;
use crate::discovery::redirect::resolve_redirects;
use crate::http::Fetcher;
use crate::robots::fetch_robots;
use crate::url::{candidate_url, resolve_location};

/// Where a located sitemap came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapSource {
    /// One of the configured well-known paths (e.g. `/sitemap.xml`)
    WellKnownPath,

    /// A `Sitemap:` directive in robots.txt
    RobotsTxt,
}

/// A validated sitemap entry URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSitemap {
    /// Terminal URL after redirects; answered 200
    pub url: String,

    /// Which strategy found it
    pub source: SitemapSource,
}

/// Locates sitemap entry points for sites
pub struct SitemapLocator<'a> {
    fetcher: &'a Fetcher,
    config: &'a DiscoveryConfig,
}

impl<'a> SitemapLocator<'a> {
    /// Creates a locator using the discovery configuration
    pub fn new(fetcher: &'a Fetcher, config: &'a DiscoveryConfig) -> Self {
        Self { fetcher, config }
    }

    /// The first URL tried for a site; named in the "No Sitemap" log line
    pub fn primary_candidate(&self, base: &str) -> String {
        match self.config.sitemap_paths.first() {
            Some(path) => candidate_url(base, path),
            None => candidate_url(base, "robots.txt"),
        }
    }

    /// Locates the sitemap for a site
    ///
    /// # Algorithm (first success wins)
    ///
    /// 1. For each configured well-known path, validate `base/path` with the
    ///    redirect resolver; robots.txt is never fetched when one succeeds.
    /// 2. Fetch `base/robots.txt` and validate the first declared sitemap.
    ///    Later `Sitemap:` lines are not considered.
    /// 3. Otherwise, not found.
    ///
    /// # Returns
    ///
    /// * `Some(LocatedSitemap)` - A candidate resolved to a 200 response
    /// * `None` - No strategy produced a valid sitemap URL
    pub async fn locate(&self, base: &str) -> Option<LocatedSitemap> {
        for path in &self.config.sitemap_paths {
            let candidate = candidate_url(base, path);
            match resolve_redirects(self.fetcher, &candidate, self.config.hop_budget).await {
                Ok(url) => {
                    tracing::debug!("Sitemap for {} found at {}", base, url);
                    return Some(LocatedSitemap {
                        url,
                        source: SitemapSource::WellKnownPath,
                    });
                }
                Err(e) => tracing::debug!("Candidate {} rejected: {}", candidate, e),
            }
        }

        let robots = match fetch_robots(self.fetcher, base).await {
            Ok(robots) => robots,
            Err(e) => {
                tracing::debug!("No usable robots.txt for {}: {}", base, e);
                return None;
            }
        };

        let declared = robots.first_sitemap()?;
        let robots_url = candidate_url(base, "robots.txt");
        let candidate = match resolve_location(&robots_url, declared) {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::debug!("Unusable Sitemap directive '{}' for {}: {}", declared, base, e);
                return None;
            }
        };

        match resolve_redirects(self.fetcher, &candidate, self.config.hop_budget).await {
            Ok(url) => {
                tracing::debug!("Sitemap for {} declared in robots.txt: {}", base, url);
                Some(LocatedSitemap {
                    url,
                    source: SitemapSource::RobotsTxt,
                })
            }
            Err(e) => {
                tracing::debug!("Declared sitemap {} rejected: {}", candidate, e);
                None
            }
        }
    }
}

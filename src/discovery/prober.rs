//! Reachability prober
//!
//! Decides whether a site answers at all before any sitemap work is done.

use crate::http::Fetcher;
use std::time::Duration;

/// Checks whether a site responds with a 2xx status
///
/// Sends a header-only request with redirects followed and the probe
/// timeout applied. Transient transport failures (timeouts, refused
/// connections) are retried up to `retries` extra times with a linearly
/// growing delay; HTTP statuses are never retried.
///
/// Never fails: a malformed URL or a missing response means "not reachable".
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP access
/// * `url` - Normalized absolute site URL
/// * `retries` - Extra attempts after a transient failure
/// * `backoff` - Base delay between attempts
pub async fn is_reachable(fetcher: &Fetcher, url: &str, retries: u32, backoff: Duration) -> bool {
    let mut attempt = 0;

    loop {
        match fetcher.head_following(url).await {
            Ok(response) => {
                let reachable = response.status.is_success();
                tracing::debug!(
                    "Probe {} -> {} (final URL {})",
                    url,
                    response.status,
                    response.final_url
                );
                return reachable;
            }
            Err(e) if e.is_transient() && attempt < retries => {
                attempt += 1;
                tracing::debug!(
                    "Probe of {} failed ({}), retry {}/{}",
                    url,
                    e,
                    attempt,
                    retries
                );
                tokio::time::sleep(backoff * attempt).await;
            }
            Err(e) => {
                tracing::debug!("Probe of {} failed: {}", url, e);
                return false;
            }
        }
    }
}

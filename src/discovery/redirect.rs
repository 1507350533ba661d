//! Redirect resolver
//!
//! Walks a 3xx chain by hand so the hop budget and loop detection are
//! enforced here rather than inside the HTTP client.

use crate::http::Fetcher;
use crate::url::resolve_location;
use crate::ScoutError;
use reqwest::header::LOCATION;
use reqwest::StatusCode;
use std::collections::HashSet;

/// Returns true for the redirect statuses the resolver follows
pub fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

/// Follows a redirect chain to a URL that answers 200
///
/// # Resolution Rules
///
/// | Response | Action |
/// |----------|--------|
/// | 200 | Return the current URL |
/// | 301/302/303/307/308 | Follow `Location` (last value wins; relative values are resolved) |
/// | Redirect with no usable `Location` | Fail with `MissingLocation` |
/// | Redirect back to a URL already seen | Fail with `RedirectLoop` |
/// | More than `hop_budget` redirects | Fail with `RedirectLimit` |
/// | Any other status | Fail with `UnexpectedStatus` |
///
/// At most `hop_budget + 1` requests are sent, so resolution always terminates.
///
/// # Arguments
///
/// * `fetcher` - Shared HTTP access
/// * `url` - Starting URL
/// * `hop_budget` - Maximum number of redirects to follow
pub async fn resolve_redirects(
    fetcher: &Fetcher,
    url: &str,
    hop_budget: u32,
) -> Result<String, ScoutError> {
    let mut current = url.to_string();
    let mut seen: HashSet<String> = HashSet::new();
    let mut hops = 0;

    loop {
        if !seen.insert(current.clone()) {
            return Err(ScoutError::RedirectLoop { url: current });
        }

        let response = fetcher.head(&current).await?;
        let status = response.status;

        if status == StatusCode::OK {
            return Ok(current);
        }

        if !is_followed_redirect(status) {
            return Err(ScoutError::UnexpectedStatus {
                url: current,
                status: status.as_u16(),
            });
        }

        if hops >= hop_budget {
            return Err(ScoutError::RedirectLimit {
                url: url.to_string(),
            });
        }

        let location = response
            .headers
            .get_all(LOCATION)
            .iter()
            .last()
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ScoutError::MissingLocation {
                url: current.clone(),
            })?;

        let next = resolve_location(&current, location).map_err(|e| {
            tracing::debug!("Unusable Location '{}' from {}: {}", location, current, e);
            ScoutError::MissingLocation {
                url: current.clone(),
            }
        })?;

        tracing::trace!("Redirect {} -> {} ({})", current, next, status);
        current = next;
        hops += 1;
    }
}

use crate::UrlError;
use url::Url;

/// Normalizes a site URL taken from an input row
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace; reject empty input
/// 2. Parse the URL; reject if malformed
/// 3. Require an http or https scheme and a host
/// 4. Remove the query and the fragment
/// 5. Remove trailing slashes from the path so candidates can be appended
///
/// The returned string never ends with `/`, so `"{base}/sitemap.xml"` is
/// always well formed. Paths are kept: a site rooted at
/// `https://example.com/blog` has its sitemap looked up under `/blog/`.
///
/// # Examples
///
/// ```
/// use sumi_scout::url::normalize_site_url;
///
/// let url = normalize_site_url("  https://example.com/  ").unwrap();
/// assert_eq!(url, "https://example.com");
/// ```
pub fn normalize_site_url(raw: &str) -> Result<String, UrlError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut url = Url::parse(trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_query(None);
    url.set_fragment(None);

    let serialized = url.to_string();
    Ok(serialized.trim_end_matches('/').to_string())
}

/// Builds a candidate URL by appending a relative path to a site base
///
/// # Examples
///
/// ```
/// use sumi_scout::url::candidate_url;
///
/// assert_eq!(
///     candidate_url("https://example.com/", "/sitemap.xml"),
///     "https://example.com/sitemap.xml"
/// );
/// ```
pub fn candidate_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Resolves a redirect `Location` value against the URL that produced it
///
/// Absolute locations are returned as-is (after parsing); relative ones are
/// joined onto `current`. Only http and https targets are accepted.
pub fn resolve_location(current: &str, location: &str) -> Result<String, UrlError> {
    let location = location.trim();
    if location.is_empty() {
        return Err(UrlError::Empty);
    }

    let base = Url::parse(current).map_err(|e| UrlError::Parse(e.to_string()))?;
    let target = base
        .join(location)
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    match target.scheme() {
        "http" | "https" => Ok(target.to_string()),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}

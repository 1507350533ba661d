//! HTTP fetcher implementation
//!
//! This module handles all outbound HTTP for the scout, including:
//! - Building clients with the configured user agent and timeouts
//! - Header-only requests for probing and redirect resolution
//! - Body fetches for sitemaps, robots.txt, and site titles
//! - A global limit on in-flight requests
//! - Transport error classification

use crate::config::HttpConfig;
use crate::ScoutError;
use reqwest::header::HeaderMap;
use reqwest::{redirect::Policy, Client, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Semaphore, SemaphorePermit};

/// Redirect limit used by the reachability client, which lets reqwest follow hops
const PROBE_MAX_REDIRECTS: usize = 10;

/// Status and headers of a header-only request
#[derive(Debug, Clone)]
pub struct HeadResponse {
    /// HTTP status code
    pub status: StatusCode,

    /// Final URL (differs from the request URL only when redirects were followed)
    pub final_url: String,

    /// Response headers
    pub headers: HeaderMap,
}

/// A fetched document body
#[derive(Debug, Clone)]
pub struct FetchedBody {
    /// HTTP status code
    pub status: StatusCode,

    /// Decoded body text
    pub body: String,
}

/// Shared HTTP access for every discovery and job operation
///
/// Holds three clients that differ only in redirect and TLS policy, plus a
/// semaphore bounding the number of requests in flight across all sites.
/// Cloning is cheap: clients and the limiter are reference counted.
#[derive(Debug, Clone)]
pub struct Fetcher {
    /// No automatic redirects; the redirect resolver walks chains by hand
    strict: Client,

    /// Follows redirects; used for reachability probes and titles
    following: Client,

    /// Follows redirects and may skip certificate validation; robots.txt only
    lenient: Client,

    limiter: Arc<Semaphore>,
    probe_timeout: Duration,
    fetch_timeout: Duration,
}

/// Builds an HTTP client with the configured user agent and timeouts
///
/// # Arguments
///
/// * `config` - The HTTP configuration
/// * `redirects` - Redirect policy for this client
/// * `accept_invalid_certs` - Skip TLS certificate validation
pub fn build_http_client(
    config: &HttpConfig,
    redirects: Policy,
    accept_invalid_certs: bool,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.fetch_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(redirects)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

impl Fetcher {
    /// Creates a fetcher from the HTTP configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Fetcher)` - All clients were built
    /// * `Err(reqwest::Error)` - A client could not be built (e.g. TLS backend failure)
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let strict = build_http_client(config, Policy::none(), false)?;
        let following = build_http_client(config, Policy::limited(PROBE_MAX_REDIRECTS), false)?;
        let lenient = build_http_client(
            config,
            Policy::limited(PROBE_MAX_REDIRECTS),
            config.robots_accept_invalid_certs,
        )?;

        Ok(Self {
            strict,
            following,
            lenient,
            limiter: Arc::new(Semaphore::new(config.max_in_flight_requests as usize)),
            probe_timeout: Duration::from_secs(config.probe_timeout_secs),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
        })
    }

    /// The non-redirecting client, for callers that build their own requests
    pub fn client(&self) -> &Client {
        &self.strict
    }

    /// Waits for an in-flight request slot
    pub async fn acquire(&self) -> Result<SemaphorePermit<'_>, ScoutError> {
        self.limiter
            .acquire()
            .await
            .map_err(|_| ScoutError::LimiterClosed)
    }

    /// Sends a prepared request while holding a limiter slot
    ///
    /// The slot is released once the response head arrives, so use this only
    /// for bodiless requests; [`Fetcher::send_text`] keeps it for the body.
    /// Every request gets its own deadline, so one stuck request never
    /// stalls the rest of the batch.
    pub async fn send(
        &self,
        url: &str,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<Response, ScoutError> {
        let _permit = self.acquire().await?;
        dispatch(url, request, timeout).await
    }

    /// Sends a prepared request and reads its body under one limiter slot
    ///
    /// The body is read whatever the status; callers decide what a non-200
    /// response means.
    pub async fn send_text(
        &self,
        url: &str,
        request: RequestBuilder,
        timeout: Duration,
    ) -> Result<FetchedBody, ScoutError> {
        let _permit = self.acquire().await?;
        let response = dispatch(url, request, timeout).await?;
        read_body(url, response).await
    }

    /// Sends a HEAD request without following redirects
    pub async fn head(&self, url: &str) -> Result<HeadResponse, ScoutError> {
        let response = self
            .send(url, self.strict.head(url), self.fetch_timeout)
            .await?;
        Ok(to_head_response(response))
    }

    /// Sends a HEAD request, following redirects, under the probe timeout
    pub async fn head_following(&self, url: &str) -> Result<HeadResponse, ScoutError> {
        let response = self
            .send(url, self.following.head(url), self.probe_timeout)
            .await?;
        Ok(to_head_response(response))
    }

    /// Fetches a document body, following redirects
    ///
    /// Non-success statuses are returned as `ScoutError::UnexpectedStatus`.
    pub async fn get_text(&self, url: &str) -> Result<FetchedBody, ScoutError> {
        self.get_with(&self.following, url).await
    }

    /// Fetches a document body with the TLS-lenient client
    pub async fn get_text_lenient(&self, url: &str) -> Result<FetchedBody, ScoutError> {
        self.get_with(&self.lenient, url).await
    }

    async fn get_with(&self, client: &Client, url: &str) -> Result<FetchedBody, ScoutError> {
        let _permit = self.acquire().await?;
        let response = dispatch(url, client.get(url), self.fetch_timeout).await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ScoutError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        read_body(url, response).await
    }
}

async fn dispatch(
    url: &str,
    request: RequestBuilder,
    timeout: Duration,
) -> Result<Response, ScoutError> {
    request
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| ScoutError::from_transport(url, e))
}

async fn read_body(url: &str, response: Response) -> Result<FetchedBody, ScoutError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ScoutError::from_transport(url, e))?;
    Ok(FetchedBody { status, body })
}

fn to_head_response(response: Response) -> HeadResponse {
    HeadResponse {
        status: response.status(),
        final_url: response.url().to_string(),
        headers: response.headers().clone(),
    }
}

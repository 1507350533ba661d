//! Job submission client for the remote processing API
//!
//! # Endpoints
//!
//! | Request | Body | Success response |
//! |---------|------|------------------|
//! | `POST /generate/sitemapurl` | `{"url": "<sitemap>"}` | 200, `[{"JobID": "..."}]` |
//! | `GET /results/{jobId}` | - | 200, `{"status": "...", ...}` |

use crate::config::JobsConfig;
use crate::http::Fetcher;
use crate::state::Job;
use crate::{ScoutError, UrlError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct JobDescriptor {
    #[serde(rename = "JobID")]
    job_id: String,
}

/// A decoded status response
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    /// The `status` field as reported (empty when absent)
    pub status: String,

    /// The full decoded response
    pub payload: Value,
}

/// Client for the processing API
#[derive(Debug, Clone)]
pub struct JobClient {
    fetcher: Fetcher,
    base_url: String,
    timeout: Duration,
}

impl JobClient {
    /// Creates a client for the API configured in `config`
    pub fn new(fetcher: Fetcher, config: &JobsConfig) -> Self {
        Self {
            fetcher,
            base_url: config.api_base_url.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        }
    }

    /// Builds an endpoint URL below the API base, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<String, ScoutError> {
        let mut url = Url::parse(&self.base_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                UrlError::Parse(format!("API base URL cannot have paths: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url.to_string())
    }

    /// Submits a sitemap URL for processing
    ///
    /// Never fails: a transport error, non-200 status, or undecodable body
    /// is logged and yields no jobs, so the caller carries on without them.
    ///
    /// # Returns
    ///
    /// The accepted jobs, each in the Pending state
    pub async fn submit(&self, sitemap_url: &str) -> Vec<Job> {
        match self.try_submit(sitemap_url).await {
            Ok(jobs) => {
                tracing::info!("Submitted {}: {} job(s)", sitemap_url, jobs.len());
                jobs
            }
            Err(e) => {
                tracing::warn!("Job submission for {} failed: {}", sitemap_url, e);
                Vec::new()
            }
        }
    }

    async fn try_submit(&self, sitemap_url: &str) -> Result<Vec<Job>, ScoutError> {
        let endpoint = self.endpoint(&["generate", "sitemapurl"])?;
        let request = self
            .fetcher
            .client()
            .post(&endpoint)
            .json(&SubmitRequest { url: sitemap_url });

        let fetched = self.fetcher.send_text(&endpoint, request, self.timeout).await?;
        if fetched.status != reqwest::StatusCode::OK {
            return Err(ScoutError::UnexpectedStatus {
                url: endpoint,
                status: fetched.status.as_u16(),
            });
        }
        let body = fetched.body;
        let descriptors: Vec<JobDescriptor> =
            serde_json::from_str(&body).map_err(|e| ScoutError::Json {
                url: endpoint.clone(),
                message: e.to_string(),
            })?;

        Ok(descriptors
            .into_iter()
            .map(|d| Job::new(d.job_id, sitemap_url))
            .collect())
    }

    /// Queries the status of a job once
    ///
    /// # Returns
    ///
    /// * `Ok(StatusReport)` - 200 with a JSON body
    /// * `Err(ScoutError)` - Transport error, non-200 status, or invalid JSON
    pub async fn fetch_status(&self, job_id: &str) -> Result<StatusReport, ScoutError> {
        let endpoint = self.endpoint(&["results", job_id])?;
        let request = self.fetcher.client().get(&endpoint);

        let fetched = self.fetcher.send_text(&endpoint, request, self.timeout).await?;
        if fetched.status != reqwest::StatusCode::OK {
            return Err(ScoutError::UnexpectedStatus {
                url: endpoint,
                status: fetched.status.as_u16(),
            });
        }
        let body = fetched.body;
        let payload: Value = serde_json::from_str(&body).map_err(|e| ScoutError::Json {
            url: endpoint.clone(),
            message: e.to_string(),
        })?;

        let status = payload
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(StatusReport { status, payload })
    }
}

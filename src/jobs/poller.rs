//! Job poller
//!
//! Drives a submitted job to a terminal state with bounded effort:
//!
//! ```text
//! Submitted -> wait -> Queried -> Completed (persist, stop)
//!                              -> Failed (stop)
//!                              -> Pending/Unknown -> wait longer -> Queried ...
//! ```
//!
//! Polling stops at a terminal status, after `max_attempts` queries, when the
//! wall-clock budget would be exceeded, or on a non-transient error.

use crate::config::JobsConfig;
use crate::jobs::client::JobClient;
use crate::output::OutputSink;
use crate::state::{Job, JobResult, JobStatus};
use std::time::{Duration, Instant};

/// Bounds on how long and how often a job is polled
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollPolicy {
    /// Delay before the first query
    pub initial_delay: Duration,

    /// Maximum number of status queries
    pub max_attempts: u32,

    /// Delay multiplier after each query that did not end polling
    pub backoff_factor: f64,

    /// Wall-clock budget for one job
    pub max_elapsed: Duration,
}

impl From<&JobsConfig> for PollPolicy {
    fn from(config: &JobsConfig) -> Self {
        Self {
            initial_delay: Duration::from_millis(config.poll_interval_ms),
            max_attempts: config.max_attempts,
            backoff_factor: config.backoff_factor,
            max_elapsed: Duration::from_secs(config.max_poll_secs),
        }
    }
}

/// What polling a job produced
#[derive(Debug, Clone)]
pub struct PollOutcome {
    /// The job in its final polled state
    pub job: Job,

    /// Number of status queries sent
    pub attempts: u32,

    /// Last status string the API reported, if any query succeeded
    pub last_reported: Option<String>,

    /// Whether a result artifact was written
    pub persisted: bool,
}

impl PollOutcome {
    /// Status text for the log: the API's own wording when available
    pub fn status_text(&self) -> String {
        self.last_reported
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| self.job.status.to_string())
    }
}

/// Polls jobs and persists completed results through the output sink
pub struct JobPoller<'a> {
    client: &'a JobClient,
    policy: PollPolicy,
    sink: &'a dyn OutputSink,
}

impl<'a> JobPoller<'a> {
    /// Creates a poller
    pub fn new(client: &'a JobClient, policy: PollPolicy, sink: &'a dyn OutputSink) -> Self {
        Self {
            client,
            policy,
            sink,
        }
    }

    /// Polls one job until it settles or the budget runs out
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | status `completed` | Persist payload once, stop |
    /// | status `failed` / `error` | Stop |
    /// | any other status | Back off, poll again |
    /// | Timeout, connect error, HTTP 5xx | Back off, poll again |
    /// | Other HTTP status, invalid JSON | Stop |
    ///
    /// With `max_attempts = 1` this is a single delayed query.
    pub async fn poll(&self, mut job: Job) -> PollOutcome {
        let started = Instant::now();
        let mut delay = self.policy.initial_delay;
        let mut attempts = 0;
        let mut last_reported = None;
        let mut persisted = false;

        while attempts < self.policy.max_attempts {
            if attempts > 0 && started.elapsed() + delay > self.policy.max_elapsed {
                tracing::warn!(
                    "Job {}: polling budget of {:?} exhausted after {} attempt(s)",
                    job.id,
                    self.policy.max_elapsed,
                    attempts
                );
                break;
            }

            tokio::time::sleep(delay).await;
            attempts += 1;

            match self.client.fetch_status(&job.id).await {
                Ok(report) => {
                    let status = JobStatus::from_api(&report.status);
                    last_reported = Some(report.status.clone());

                    if let Err(e) = job.advance(status) {
                        tracing::error!("Job {}: {}", job.id, e);
                        break;
                    }

                    match status {
                        JobStatus::Completed => {
                            let result = JobResult {
                                job_id: job.id.clone(),
                                payload: report.payload,
                            };
                            match self.sink.record_job_result(&result) {
                                Ok(()) => persisted = true,
                                Err(e) => {
                                    tracing::error!("Job {}: failed to persist result: {}", job.id, e)
                                }
                            }
                            tracing::info!("Job {} completed", job.id);
                            break;
                        }
                        JobStatus::Failed => {
                            tracing::warn!("Job {} reported status '{}'", job.id, report.status);
                            break;
                        }
                        JobStatus::Pending | JobStatus::Unknown => {
                            tracing::info!(
                                "Job {} reported status '{}' (attempt {}/{})",
                                job.id,
                                report.status,
                                attempts,
                                self.policy.max_attempts
                            );
                        }
                    }
                }
                Err(e) if e.is_transient() => {
                    tracing::warn!(
                        "Job {}: transient error (attempt {}/{}): {}",
                        job.id,
                        attempts,
                        self.policy.max_attempts,
                        e
                    );
                }
                Err(e) => {
                    tracing::warn!("Job {}: polling stopped: {}", job.id, e);
                    break;
                }
            }

            delay = delay.mul_f64(self.policy.backoff_factor);
        }

        PollOutcome {
            job,
            attempts,
            last_reported,
            persisted,
        }
    }
}

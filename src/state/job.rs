/// Remote job state definitions
///
/// A job is created when the processing API accepts a sitemap and moves
/// through its states only as a result of polling.
use crate::ScoutError;
use serde_json::Value;
use std::fmt;

/// Represents the current state of a remote job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    // ===== Active States =====
    /// Submitted, or reported as queued / processing by the API
    Pending,

    /// The API reported a status this client does not recognize
    Unknown,

    // ===== Terminal States =====
    /// Results are ready
    Completed,

    /// The API reported the job as failed
    Failed,
}

impl JobStatus {
    /// Maps a status string reported by the API
    pub fn from_api(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "completed" => Self::Completed,
            "failed" | "error" => Self::Failed,
            "pending" | "queued" | "processing" | "running" | "in_progress" => Self::Pending,
            _ => Self::Unknown,
        }
    }

    /// Returns true if this is a terminal state (no further polling needed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Checks if transitioning from this state to another is valid
    ///
    /// Terminal states never change; active states may move anywhere.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        !self.is_terminal() || *self == next
    }

    /// Applies a transition, rejecting any attempt to leave a terminal state
    pub fn transition(self, next: JobStatus) -> Result<JobStatus, ScoutError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(ScoutError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Unknown => "unknown",
            Self::Completed => "completed",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A job accepted by the processing API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Opaque identifier assigned by the API
    pub id: String,

    /// Sitemap URL that was submitted
    pub source_url: String,

    /// Current status
    pub status: JobStatus,
}

impl Job {
    /// Creates a freshly submitted job
    pub fn new(id: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source_url: source_url.into(),
            status: JobStatus::Pending,
        }
    }

    /// Moves the job to a new status
    pub fn advance(&mut self, next: JobStatus) -> Result<(), ScoutError> {
        self.status = self.status.transition(next)?;
        Ok(())
    }
}

/// Decoded payload of a completed job
#[derive(Debug, Clone, PartialEq)]
pub struct JobResult {
    /// Identifier of the completed job
    pub job_id: String,

    /// Full decoded API response
    pub payload: Value,
}

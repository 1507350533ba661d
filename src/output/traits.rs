//! Output sink trait and the per-site report it consumes

use crate::discovery::PageUrl;
use crate::output::LogEvent;
use crate::state::{Job, JobResult, SiteRecord};
use crate::OutputResult;

/// Everything learned about one site, written as a single unit
#[derive(Debug, Clone)]
pub struct SiteReport {
    /// Classification row
    pub record: SiteRecord,

    /// Pages extracted from the sitemap tree, in document order
    pub pages: Vec<PageUrl>,

    /// Log trail for the site
    pub events: Vec<LogEvent>,

    /// Jobs submitted for the site's sitemap, in their final polled state
    pub jobs: Vec<Job>,
}

impl SiteReport {
    /// Creates a report with no pages, events, or jobs
    pub fn new(record: SiteRecord) -> Self {
        Self {
            record,
            pages: Vec::new(),
            events: Vec::new(),
            jobs: Vec::new(),
        }
    }
}

/// Trait for output sinks
///
/// A sink is opened once per batch, shared by every worker, and finalized
/// when the batch ends. Implementations must serialize their writes so that
/// one site's rows, pages, and log lines are never interleaved with another's.
pub trait OutputSink: Send + Sync {
    /// Records a fully processed site
    ///
    /// # Arguments
    ///
    /// * `report` - The site's classification, pages, and log trail
    fn record_site(&self, report: &SiteReport) -> OutputResult<()>;

    /// Persists the payload of a completed job
    ///
    /// # Arguments
    ///
    /// * `result` - The decoded API payload, keyed by job identifier
    fn record_job_result(&self, result: &JobResult) -> OutputResult<()>;

    /// Flushes any buffered output
    fn finalize(&self) -> OutputResult<()>;
}

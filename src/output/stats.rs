//! Batch statistics
//!
//! Tallies what a batch run produced, for the end-of-run summary.

use crate::output::traits::SiteReport;
use crate::state::{DiscoveryMethod, JobStatus};
use chrono::{DateTime, Utc};

/// Statistics about a batch run
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// When the batch started
    pub started_at: DateTime<Utc>,

    /// When the batch finished (None while running)
    pub finished_at: Option<DateTime<Utc>>,

    /// Input rows that were classified
    pub sites_total: u64,

    /// Input rows skipped because their URL was invalid
    pub sites_skipped: u64,

    /// Sites that answered the reachability probe
    pub sites_reachable: u64,

    /// Sites with a located sitemap
    pub sites_with_sitemap: u64,

    /// Page URLs extracted across all sitemaps
    pub pages: u64,

    /// Jobs accepted by the processing API
    pub jobs_submitted: u64,

    /// Jobs whose results were persisted
    pub jobs_completed: u64,

    /// Jobs reported as failed
    pub jobs_failed: u64,
}

impl BatchSummary {
    /// Starts a summary stamped with the current time
    pub fn start() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            sites_total: 0,
            sites_skipped: 0,
            sites_reachable: 0,
            sites_with_sitemap: 0,
            pages: 0,
            jobs_submitted: 0,
            jobs_completed: 0,
            jobs_failed: 0,
        }
    }

    /// Adds a finished site to the tallies
    pub fn record(&mut self, report: &SiteReport) {
        self.sites_total += 1;
        if report.record.reachable {
            self.sites_reachable += 1;
        }
        if report.record.discovery == DiscoveryMethod::SitemapImport {
            self.sites_with_sitemap += 1;
        }
        self.pages += report.pages.len() as u64;
        self.jobs_submitted += report.jobs.len() as u64;
        for job in &report.jobs {
            match job.status {
                JobStatus::Completed => self.jobs_completed += 1,
                JobStatus::Failed => self.jobs_failed += 1,
                JobStatus::Pending | JobStatus::Unknown => {}
            }
        }
    }

    /// Stamps the finish time
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Logs the summary through tracing
    pub fn log(&self) {
        tracing::info!(
            "Sites: {} classified ({} skipped), {} reachable, {} with sitemap",
            self.sites_total,
            self.sites_skipped,
            self.sites_reachable,
            self.sites_with_sitemap
        );
        tracing::info!("Pages discovered: {}", self.pages);
        if self.jobs_submitted > 0 {
            tracing::info!(
                "Jobs: {} submitted, {} completed, {} failed",
                self.jobs_submitted,
                self.jobs_completed,
                self.jobs_failed
            );
        }
        if let Some(seconds) = self.duration_seconds() {
            tracing::info!("Batch finished in {}s", seconds);
        }
    }
}

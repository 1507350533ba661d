//! In-memory output sink
//!
//! Collects everything a batch produces; used by library callers that post-process
//! results themselves and by tests.

use crate::output::traits::{OutputSink, SiteReport};
use crate::state::{JobResult, SiteRecord};
use crate::{OutputError, OutputResult};
use std::sync::Mutex;

#[derive(Debug, Default)]
struct Collected {
    sites: Vec<SiteRecord>,
    pages: Vec<String>,
    log_lines: Vec<String>,
    job_results: Vec<JobResult>,
}

/// Output sink that keeps all records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    collected: Mutex<Collected>,
}

impl MemorySink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Classification records, in the order they were written
    pub fn sites(&self) -> Vec<SiteRecord> {
        self.with(|c| c.sites.clone())
    }

    /// Page URLs, in the order they were written
    pub fn pages(&self) -> Vec<String> {
        self.with(|c| c.pages.clone())
    }

    /// Rendered log lines
    pub fn log_lines(&self) -> Vec<String> {
        self.with(|c| c.log_lines.clone())
    }

    /// Persisted job results
    pub fn job_results(&self) -> Vec<JobResult> {
        self.with(|c| c.job_results.clone())
    }

    fn with<T>(&self, f: impl FnOnce(&Collected) -> T) -> T {
        // A poisoned lock still holds consistent data: every write is a push
        let guard = self
            .collected
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&guard)
    }
}

impl OutputSink for MemorySink {
    fn record_site(&self, report: &SiteReport) -> OutputResult<()> {
        let mut collected = self.collected.lock().map_err(|_| OutputError::Poisoned)?;
        collected.sites.push(report.record.clone());
        collected
            .pages
            .extend(report.pages.iter().map(|p| p.url.clone()));
        collected
            .log_lines
            .extend(report.events.iter().map(|e| e.to_string()));
        Ok(())
    }

    fn record_job_result(&self, result: &JobResult) -> OutputResult<()> {
        let mut collected = self.collected.lock().map_err(|_| OutputError::Poisoned)?;
        collected.job_results.push(result.clone());
        Ok(())
    }

    fn finalize(&self) -> OutputResult<()> {
        Ok(())
    }
}

//! Batch coordinator - per-site pipeline and cross-site concurrency
//!
//! For each site:
//! 1. Probe reachability; unreachable sites stop here
//! 2. Locate the sitemap (well-known paths, then robots.txt)
//! 3. Read the site title for the Name column
//! 4. Expand the sitemap tree into pages
//! 5. Optionally submit the sitemap to the processing API and poll its jobs
//!
//! Sites run concurrently up to `max-concurrent-sites`, but each site's
//! tree is expanded sequentially inside its own task, and finished reports
//! are handed to the sink one at a time in input order.

use crate::config::Config;
use crate::discovery::{fetch_title, is_reachable, SitemapCrawler, SitemapLocator};
use crate::http::Fetcher;
use crate::input::{SiteEntry, SiteList};
use crate::jobs::{JobClient, JobPoller, PollPolicy};
use crate::output::{BatchSummary, EventKind, LogEvent, OutputSink, SiteReport};
use crate::state::{Job, SiteRecord};
use crate::Result;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::Duration;

/// Main batch coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Fetcher,
    jobs: Option<JobClient>,
    sink: Arc<dyn OutputSink>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The scout configuration
    /// * `sink` - Where finished sites and job results are written
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - HTTP clients were built
    /// * `Err(ScoutError)` - Failed to initialize
    pub fn new(config: Config, sink: Arc<dyn OutputSink>) -> Result<Self> {
        let fetcher = Fetcher::new(&config.http)?;

        let jobs = if config.jobs.enabled {
            tracing::info!("Job submission enabled: {}", config.jobs.api_base_url);
            Some(JobClient::new(fetcher.clone(), &config.jobs))
        } else {
            None
        };

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            jobs,
            sink,
        })
    }

    /// Runs the batch over a site list
    ///
    /// One site's failure never aborts the batch; only a failing output sink
    /// does, since results could no longer be recorded.
    pub async fn run(&self, list: SiteList) -> Result<BatchSummary> {
        let mut summary = BatchSummary::start();
        summary.sites_skipped = list.skipped as u64;

        let concurrency = self.config.batch.max_concurrent_sites.max(1) as usize;
        tracing::info!(
            "Processing {} sites ({} at a time)",
            list.sites.len(),
            concurrency
        );

        // `buffered` runs up to `concurrency` sites at once but yields in input order
        let mut reports = stream::iter(list.sites)
            .map(|site| async move { self.process_site(&site).await })
            .buffered(concurrency);

        while let Some(report) = reports.next().await {
            self.sink.record_site(&report)?;
            summary.record(&report);

            if summary.sites_total % 10 == 0 {
                tracing::info!(
                    "Progress: {} sites done, {} pages so far",
                    summary.sites_total,
                    summary.pages
                );
            }
        }

        self.sink.finalize()?;
        summary.finish();
        Ok(summary)
    }

    /// Runs the full pipeline for one site list entry
    ///
    /// Requests go to the normalized URL; the record and log lines carry the
    /// entry as it was written. The returned report is complete; nothing
    /// about the site is written before this returns (job results excepted,
    /// which are keyed by job).
    pub async fn process_site(&self, entry: &SiteEntry) -> SiteReport {
        let site = entry.input.as_str();
        let base = entry.url.as_str();
        let http = &self.config.http;
        let reachable = is_reachable(
            &self.fetcher,
            base,
            http.probe_retries,
            Duration::from_millis(http.retry_backoff_ms),
        )
        .await;

        if !reachable {
            tracing::info!("{}: unreachable", site);
            return SiteReport::new(SiteRecord::unreachable(site));
        }

        let locator = SitemapLocator::new(&self.fetcher, &self.config.discovery);
        let located = locator.locate(base).await;

        let name = if self.config.discovery.fetch_titles {
            fetch_title(&self.fetcher, base).await
        } else {
            None
        };

        let sitemap_url = located.as_ref().map(|l| l.url.clone());
        let mut report = SiteReport::new(SiteRecord::reachable(name, site, sitemap_url));

        let Some(located) = located else {
            tracing::info!("{}: no sitemap", site);
            report.events.push(LogEvent::new(
                site,
                locator.primary_candidate(base),
                EventKind::NoSitemap,
            ));
            return report;
        };

        tracing::info!("{}: sitemap {} ({:?})", site, located.url, located.source);

        let crawl = SitemapCrawler::new(&self.fetcher, self.config.discovery.max_depth)
            .crawl(site, &located.url)
            .await;
        tracing::info!(
            "{}: {} pages from {} sitemap documents",
            site,
            crawl.pages.len(),
            crawl.documents.len()
        );
        report.pages = crawl.pages;
        report.events.extend(crawl.events);

        if let Some(client) = &self.jobs {
            report.jobs = self
                .submit_and_poll(client, site, &located.url, &mut report.events)
                .await;
        }

        report
    }

    /// Submits a sitemap and polls each resulting job in turn
    async fn submit_and_poll(
        &self,
        client: &JobClient,
        site: &str,
        sitemap_url: &str,
        events: &mut Vec<LogEvent>,
    ) -> Vec<Job> {
        let submitted = client.submit(sitemap_url).await;
        let poller = JobPoller::new(
            client,
            PollPolicy::from(&self.config.jobs),
            self.sink.as_ref(),
        );

        let mut finished = Vec::with_capacity(submitted.len());
        for job in submitted {
            let outcome = poller.poll(job).await;
            events.push(LogEvent::new(
                site,
                sitemap_url,
                EventKind::JobStatus {
                    job_id: outcome.job.id.clone(),
                    status: outcome.status_text(),
                },
            ));
            finished.push(outcome.job);
        }
        finished
    }
}

/// Runs a complete batch
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use sumi_scout::config::load_config;
/// use sumi_scout::input::read_site_list;
/// use sumi_scout::output::FileSink;
/// use sumi_scout::batch::run_batch;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("scout.toml"))?;
/// let sites = read_site_list(Path::new(&config.input.sites_path))?;
/// let sink = Arc::new(FileSink::create(&config.output)?);
/// let summary = run_batch(config, sink, sites).await?;
/// summary.log();
/// # Ok(())
/// # }
/// ```
pub async fn run_batch(
    config: Config,
    sink: Arc<dyn OutputSink>,
    sites: SiteList,
) -> Result<BatchSummary> {
    let coordinator = Coordinator::new(config, sink)?;
    coordinator.run(sites).await
}

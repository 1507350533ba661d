//! Job submission and polling against a mock processing API

use crate::{test_config, test_fetcher};
use serde_json::json;
use std::time::Duration;
use sumi_scout::config::Config;
use sumi_scout::jobs::{JobClient, JobPoller, PollPolicy};
use sumi_scout::output::MemorySink;
use sumi_scout::state::{Job, JobStatus};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn jobs_config(api: &MockServer) -> Config {
    let mut config = test_config();
    config.jobs.enabled = true;
    config.jobs.api_base_url = api.uri();
    config
}

#[tokio::test]
async fn test_submit_returns_pending_jobs() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate/sitemapurl"))
        .and(body_json(json!({"url": "https://example.com/sitemap.xml"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"JobID": "j-1"}, {"JobID": "j-2"}])),
        )
        .expect(1)
        .mount(&api)
        .await;

    let config = jobs_config(&api);
    let client = JobClient::new(test_fetcher(&config), &config.jobs);

    let jobs = client.submit("https://example.com/sitemap.xml").await;
    let ids: Vec<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(ids, vec!["j-1", "j-2"]);
    assert!(jobs.iter().all(|j| j.status == JobStatus::Pending));
    assert!(jobs
        .iter()
        .all(|j| j.source_url == "https://example.com/sitemap.xml"));
}

#[tokio::test]
async fn test_rejected_submission_yields_no_jobs() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate/sitemapurl"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&api)
        .await;

    let config = jobs_config(&api);
    let client = JobClient::new(test_fetcher(&config), &config.jobs);

    assert!(client.submit("https://example.com/sitemap.xml").await.is_empty());
}

#[tokio::test]
async fn test_garbled_submission_body_yields_no_jobs() {
    let api = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/generate/sitemapurl"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&api)
        .await;

    let config = jobs_config(&api);
    let client = JobClient::new(test_fetcher(&config), &config.jobs);

    assert!(client.submit("https://example.com/sitemap.xml").await.is_empty());
}

#[tokio::test]
async fn test_completed_job_persists_one_artifact() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/j-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "completed", "pages": ["https://example.com/a"]})),
        )
        .expect(1)
        .mount(&api)
        .await;

    let config = jobs_config(&api);
    let client = JobClient::new(test_fetcher(&config), &config.jobs);
    let sink = MemorySink::new();
    let poller = JobPoller::new(&client, PollPolicy::from(&config.jobs), &sink);

    let outcome = poller
        .poll(Job::new("j-1", "https://example.com/sitemap.xml"))
        .await;

    assert!(outcome.persisted);
    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.job.status, JobStatus::Completed);

    let results = sink.job_results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].job_id, "j-1");
    assert_eq!(results[0].payload["pages"][0], "https://example.com/a");
}

#[tokio::test]
async fn test_single_attempt_leaves_processing_job_unpersisted() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/j-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})))
        .expect(1)
        .mount(&api)
        .await;

    let mut config = jobs_config(&api);
    config.jobs.max_attempts = 1;
    let client = JobClient::new(test_fetcher(&config), &config.jobs);
    let sink = MemorySink::new();
    let poller = JobPoller::new(&client, PollPolicy::from(&config.jobs), &sink);

    let outcome = poller
        .poll(Job::new("j-9", "https://example.com/sitemap.xml"))
        .await;

    assert!(!outcome.persisted);
    assert_eq!(outcome.last_reported.as_deref(), Some("processing"));
    assert_eq!(outcome.status_text(), "processing");
    assert_eq!(outcome.job.status, JobStatus::Pending);
    assert!(sink.job_results().is_empty());
}

#[tokio::test]
async fn test_poller_retries_until_completed() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/j-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .up_to_n_times(2)
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/results/j-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "completed"})))
        .mount(&api)
        .await;

    let config = jobs_config(&api);
    let client = JobClient::new(test_fetcher(&config), &config.jobs);
    let sink = MemorySink::new();
    let poller = JobPoller::new(&client, PollPolicy::from(&config.jobs), &sink);

    let outcome = poller
        .poll(Job::new("j-2", "https://example.com/sitemap.xml"))
        .await;

    assert_eq!(outcome.attempts, 3);
    assert!(outcome.persisted);
    assert_eq!(sink.job_results().len(), 1);
}

#[tokio::test]
async fn test_failed_job_stops_polling() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/j-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "failed"})))
        .expect(1)
        .mount(&api)
        .await;

    let config = jobs_config(&api);
    let client = JobClient::new(test_fetcher(&config), &config.jobs);
    let sink = MemorySink::new();
    let poller = JobPoller::new(&client, PollPolicy::from(&config.jobs), &sink);

    let outcome = poller
        .poll(Job::new("j-3", "https://example.com/sitemap.xml"))
        .await;

    assert_eq!(outcome.job.status, JobStatus::Failed);
    assert!(!outcome.persisted);
    assert!(sink.job_results().is_empty());
}

#[tokio::test]
async fn test_client_error_stops_polling() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/j-4"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&api)
        .await;

    let config = jobs_config(&api);
    let client = JobClient::new(test_fetcher(&config), &config.jobs);
    let sink = MemorySink::new();
    let poller = JobPoller::new(&client, PollPolicy::from(&config.jobs), &sink);

    let outcome = poller
        .poll(Job::new("j-4", "https://example.com/sitemap.xml"))
        .await;

    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.last_reported, None);
    assert_eq!(outcome.status_text(), "pending");
}

#[tokio::test]
async fn test_server_error_is_retried_within_budget() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/j-5"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&api)
        .await;
    Mock::given(method("GET"))
        .and(path("/results/j-5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "completed"})))
        .mount(&api)
        .await;

    let config = jobs_config(&api);
    let client = JobClient::new(test_fetcher(&config), &config.jobs);
    let sink = MemorySink::new();
    let poller = JobPoller::new(&client, PollPolicy::from(&config.jobs), &sink);

    let outcome = poller
        .poll(Job::new("j-5", "https://example.com/sitemap.xml"))
        .await;

    assert_eq!(outcome.attempts, 2);
    assert!(outcome.persisted);
    assert_eq!(outcome.job.status, JobStatus::Completed);
}

#[tokio::test]
async fn test_wall_clock_budget_stops_polling_early() {
    let api = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/results/j-6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "processing"})))
        .mount(&api)
        .await;

    let config = jobs_config(&api);
    let client = JobClient::new(test_fetcher(&config), &config.jobs);
    let sink = MemorySink::new();
    // Delays of 50ms, 200ms, 800ms...: the second wait already overruns 150ms
    let policy = PollPolicy {
        initial_delay: Duration::from_millis(50),
        max_attempts: 10,
        backoff_factor: 4.0,
        max_elapsed: Duration::from_millis(150),
    };
    let poller = JobPoller::new(&client, policy, &sink);

    let outcome = poller
        .poll(Job::new("j-6", "https://example.com/sitemap.xml"))
        .await;

    assert_eq!(outcome.attempts, 1);
    assert_eq!(outcome.job.status, JobStatus::Pending);
    assert_eq!(outcome.status_text(), "processing");
    assert_eq!(api.received_requests().await.unwrap().len(), 1);
}

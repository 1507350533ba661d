use serde::Deserialize;

/// Browser-like user agent; some sites refuse requests from unknown agents
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/58.0.3029.110 Safari/537.3";

/// Main configuration structure for Sumi-Scout
///
/// Every section is optional; missing sections fall back to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub discovery: DiscoveryConfig,
    pub jobs: JobsConfig,
    pub batch: BatchConfig,
    pub output: OutputConfig,
    pub input: InputConfig,
}

/// HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Timeout for the reachability probe (seconds)
    #[serde(rename = "probe-timeout-secs")]
    pub probe_timeout_secs: u64,

    /// Timeout for document fetches: sitemaps, robots.txt, titles (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Maximum number of HTTP requests in flight across the whole batch
    #[serde(rename = "max-in-flight-requests")]
    pub max_in_flight_requests: u32,

    /// Skip TLS certificate validation when fetching robots.txt.
    ///
    /// This is a trust relaxation for misconfigured sites. Disable it in
    /// security-sensitive environments.
    #[serde(rename = "robots-accept-invalid-certs")]
    pub robots_accept_invalid_certs: bool,

    /// Extra attempts for a reachability probe after a transient failure
    #[serde(rename = "probe-retries")]
    pub probe_retries: u32,

    /// Base delay between probe retries (milliseconds)
    #[serde(rename = "retry-backoff-ms")]
    pub retry_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            probe_timeout_secs: 10,
            fetch_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_in_flight_requests: 16,
            robots_accept_invalid_certs: true,
            probe_retries: 1,
            retry_backoff_ms: 500,
        }
    }
}

/// Sitemap location and traversal bounds
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Well-known sitemap paths tried before robots.txt, in order
    #[serde(rename = "sitemap-paths")]
    pub sitemap_paths: Vec<String>,

    /// Maximum number of redirects followed while validating a candidate
    #[serde(rename = "hop-budget")]
    pub hop_budget: u32,

    /// Maximum nesting depth of sitemap indexes below the root sitemap
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Fetch each reachable site's <title> for the Name column
    #[serde(rename = "fetch-titles")]
    pub fetch_titles: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            sitemap_paths: vec!["sitemap.xml".to_string(), "wp-sitemap.xml".to_string()],
            hop_budget: 5,
            max_depth: 10,
            fetch_titles: true,
        }
    }
}

/// Remote job-processing API
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JobsConfig {
    /// Submit located sitemaps to the processing API
    pub enabled: bool,

    /// Base URL of the processing API (e.g. "https://api.example.com")
    #[serde(rename = "api-base-url")]
    pub api_base_url: String,

    /// Delay before the first status query (milliseconds)
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Maximum number of status queries per job
    #[serde(rename = "max-attempts")]
    pub max_attempts: u32,

    /// Multiplier applied to the delay after every non-terminal query
    #[serde(rename = "backoff-factor")]
    pub backoff_factor: f64,

    /// Wall-clock budget for polling a single job (seconds)
    #[serde(rename = "max-poll-secs")]
    pub max_poll_secs: u64,

    /// Timeout for a single API request (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,
}

impl Default for JobsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base_url: String::new(),
            poll_interval_ms: 3000,
            max_attempts: 5,
            backoff_factor: 2.0,
            max_poll_secs: 120,
            request_timeout_secs: 30,
        }
    }
}

/// Cross-site concurrency
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of sites processed at the same time
    #[serde(rename = "max-concurrent-sites")]
    pub max_concurrent_sites: u32,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_sites: 4,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Site classification CSV (Name, URL, Discovery)
    #[serde(rename = "results-path")]
    pub results_path: String,

    /// Append-only list of discovered page URLs
    #[serde(rename = "pages-path")]
    pub pages_path: String,

    /// Append-only discovery event log
    #[serde(rename = "log-path")]
    pub log_path: String,

    /// Directory receiving one JSON artifact per completed job
    #[serde(rename = "job-results-dir")]
    pub job_results_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "results.csv".to_string(),
            pages_path: "pages.txt".to_string(),
            log_path: "discovery.log".to_string(),
            job_results_dir: "job-results".to_string(),
        }
    }
}

/// Input configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// CSV file listing candidate sites (header row, URL in the first column)
    #[serde(rename = "sites-path")]
    pub sites_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            sites_path: "websites.csv".to_string(),
        }
    }
}

//! Discovery event log entries
//!
//! Each entry renders as one line: `{site} - {sitemapUrl} - {event}`.

use std::fmt;

/// What happened while processing a sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// The document is a sitemap index
    SitemapIndex,

    /// The document is a URL set listing this many pages
    Pages(usize),

    /// The document could not be parsed as XML
    XmlError(String),

    /// No sitemap could be located for the site
    NoSitemap,

    /// The document could not be fetched
    FetchError(String),

    /// A nested sitemap was not expanded (already visited, depth bound)
    Skipped(String),

    /// Final state of a submitted job
    JobStatus { job_id: String, status: String },
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SitemapIndex => write!(f, "Sitemap Index"),
            Self::Pages(n) => write!(f, "Pages: {}", n),
            Self::XmlError(message) => write!(f, "XML Error: {}", single_line(message)),
            Self::NoSitemap => write!(f, "No Sitemap"),
            Self::FetchError(message) => write!(f, "Fetch Error: {}", single_line(message)),
            Self::Skipped(reason) => write!(f, "Skipped: {}", single_line(reason)),
            Self::JobStatus { job_id, status } => write!(f, "Job {}: {}", job_id, status),
        }
    }
}

/// One line of the discovery log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    /// Site the event belongs to
    pub site: String,

    /// Sitemap document the event is about
    pub sitemap_url: String,

    /// The event itself
    pub kind: EventKind,
}

impl LogEvent {
    /// Creates a new log event
    pub fn new(site: impl Into<String>, sitemap_url: impl Into<String>, kind: EventKind) -> Self {
        Self {
            site: site.into(),
            sitemap_url: sitemap_url.into(),
            kind,
        }
    }
}

impl fmt::Display for LogEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.site, self.sitemap_url, self.kind)
    }
}

// Keeps every event on exactly one log line
fn single_line(message: &str) -> String {
    message
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

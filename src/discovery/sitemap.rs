//! Sitemap parser and tree expansion
//!
//! This module handles:
//! - Classifying a sitemap document (index, URL set, or invalid)
//! - Extracting `<loc>` entries from the right parent elements
//! - Expanding sitemap indexes into a flat page list with a visited set
//!   and a depth bound, so cyclic or hostile trees always terminate

use crate::http::Fetcher;
use crate::output::{EventKind, LogEvent};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;

/// Classification of a fetched sitemap document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapKind {
    /// `<sitemapindex>`: lists nested sitemaps
    Index,

    /// `<urlset>`: lists pages
    UrlSet,

    /// Anything else, or a document that could not be fetched or parsed
    Invalid,
}

/// Identity and classification of one sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapRef {
    /// Document URL
    pub url: String,

    /// Kind, known only after the document was parsed
    pub kind: SitemapKind,
}

/// A page listed by a leaf sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUrl {
    /// The page URL from `<url><loc>`
    pub url: String,

    /// The URL set that listed it
    pub source_sitemap: String,
}

impl PageUrl {
    /// Creates a page entry
    pub fn new(url: impl Into<String>, source_sitemap: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source_sitemap: source_sitemap.into(),
        }
    }
}

/// Contents of one parsed sitemap document
///
/// An index only ever holds child sitemap URLs and a URL set only ever
/// holds page URLs; the two cannot mix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedSitemap {
    /// Child sitemap URLs, in document order
    Index(Vec<String>),

    /// Page URLs, in document order
    UrlSet(Vec<String>),

    /// Well-formed XML with an unrecognized root element
    Invalid { root: String },
}

impl ParsedSitemap {
    /// The kind of this document
    pub fn kind(&self) -> SitemapKind {
        match self {
            Self::Index(_) => SitemapKind::Index,
            Self::UrlSet(_) => SitemapKind::UrlSet,
            Self::Invalid { .. } => SitemapKind::Invalid,
        }
    }
}

/// Parses a sitemap document
///
/// # Extraction Rules
///
/// - Root `<sitemapindex>`: collect `<sitemap><loc>` values
/// - Root `<urlset>`: collect `<url><loc>` values
/// - Any other root: `Invalid`
/// - Namespace prefixes are ignored; empty `<loc>` values are dropped
///
/// # Returns
///
/// * `Ok(ParsedSitemap)` - The document is well-formed XML
/// * `Err(String)` - Parse error message, including the byte position
///
/// # Example
///
/// ```
/// use sumi_scout::discovery::{parse_sitemap, ParsedSitemap};
///
/// let xml = r#"<urlset><url><loc>https://example.com/a</loc></url></urlset>"#;
/// assert_eq!(
///     parse_sitemap(xml).unwrap(),
///     ParsedSitemap::UrlSet(vec!["https://example.com/a".to_string()])
/// );
/// ```
pub fn parse_sitemap(xml: &str) -> Result<ParsedSitemap, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut root: Option<String> = None;
    let mut stack: Vec<String> = Vec::new();
    let mut locs: Vec<String> = Vec::new();
    let mut loc = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| format!("{} at position {}", e, reader.buffer_position()))?;

        match event {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if root.is_none() {
                    root = Some(name.clone());
                }
                if name == "loc" {
                    loc.clear();
                }
                stack.push(name);
            }
            Event::Empty(e) => {
                if root.is_none() {
                    root = Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                }
            }
            Event::Text(e) => {
                if is_entry_loc(root.as_deref(), &stack) {
                    let text = e.unescape().map_err(|err| err.to_string())?;
                    loc.push_str(&text);
                }
            }
            Event::CData(e) => {
                if is_entry_loc(root.as_deref(), &stack) {
                    loc.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            }
            Event::End(_) => {
                if is_entry_loc(root.as_deref(), &stack) {
                    let value = loc.trim();
                    if !value.is_empty() {
                        locs.push(value.to_string());
                    }
                    loc.clear();
                }
                stack.pop();
            }
            Event::Eof => {
                if let Some(open) = stack.last() {
                    return Err(format!("unexpected end of document inside <{}>", open));
                }
                break;
            }
            _ => {}
        }
    }

    match root.as_deref() {
        Some("sitemapindex") => Ok(ParsedSitemap::Index(locs)),
        Some("urlset") => Ok(ParsedSitemap::UrlSet(locs)),
        Some(other) => Ok(ParsedSitemap::Invalid {
            root: other.to_string(),
        }),
        None => Err("document has no root element".to_string()),
    }
}

/// True when the innermost open element is an entry's `<loc>`:
/// `sitemapindex/sitemap/loc` or `urlset/url/loc`
fn is_entry_loc(root: Option<&str>, stack: &[String]) -> bool {
    let entry = match root {
        Some("sitemapindex") => "sitemap",
        Some("urlset") => "url",
        _ => return false,
    };

    matches!(stack, [_, parent, last] if parent == entry && last == "loc")
}

/// Result of expanding one site's sitemap tree
#[derive(Debug, Clone, Default)]
pub struct SitemapCrawl {
    /// Pages in document order across all branches
    pub pages: Vec<PageUrl>,

    /// Log trail for the site
    pub events: Vec<LogEvent>,

    /// Every document that was fetched, with its classification
    pub documents: Vec<SitemapRef>,
}

impl SitemapCrawl {
    /// Number of index documents expanded
    pub fn index_count(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.kind == SitemapKind::Index)
            .count()
    }
}

/// Expands sitemap trees into page lists
pub struct SitemapCrawler<'a> {
    fetcher: &'a Fetcher,
    max_depth: u32,
}

impl<'a> SitemapCrawler<'a> {
    /// Creates a crawler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared HTTP access
    /// * `max_depth` - Deepest nesting level (root is 0) whose documents are fetched
    pub fn new(fetcher: &'a Fetcher, max_depth: u32) -> Self {
        Self { fetcher, max_depth }
    }

    /// Expands the sitemap tree rooted at `root`
    ///
    /// Traversal is depth-first over an explicit stack, children pushed in
    /// reverse so pages come out in pre-order document order. A document is
    /// fetched at most once per call (visited set), and children of an index
    /// at `max_depth` are skipped.
    ///
    /// Failures stay local: a document that cannot be fetched or parsed is
    /// logged and contributes no pages, while its siblings are still expanded.
    ///
    /// # Arguments
    ///
    /// * `site` - Site the tree belongs to (used in log lines)
    /// * `root` - Located sitemap entry URL
    pub async fn crawl(&self, site: &str, root: &str) -> SitemapCrawl {
        let mut crawl = SitemapCrawl::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack: Vec<(String, u32)> = vec![(root.to_string(), 0)];

        while let Some((url, depth)) = stack.pop() {
            if !visited.insert(url.clone()) {
                tracing::warn!("{}: sitemap {} already expanded, skipping", site, url);
                crawl.events.push(LogEvent::new(
                    site,
                    &url,
                    EventKind::Skipped("already visited".to_string()),
                ));
                continue;
            }

            let body = match self.fetcher.get_text(&url).await {
                Ok(fetched) => fetched.body,
                Err(e) => {
                    tracing::warn!("{}: failed to fetch sitemap {}: {}", site, url, e);
                    crawl
                        .events
                        .push(LogEvent::new(site, &url, EventKind::FetchError(e.to_string())));
                    crawl.documents.push(SitemapRef {
                        url,
                        kind: SitemapKind::Invalid,
                    });
                    continue;
                }
            };

            let parsed = match parse_sitemap(&body) {
                Ok(parsed) => parsed,
                Err(message) => {
                    tracing::warn!("{}: XML error in {}: {}", site, url, message);
                    crawl
                        .events
                        .push(LogEvent::new(site, &url, EventKind::XmlError(message)));
                    crawl.documents.push(SitemapRef {
                        url,
                        kind: SitemapKind::Invalid,
                    });
                    continue;
                }
            };

            let kind = parsed.kind();
            match parsed {
                ParsedSitemap::Index(children) => {
                    crawl
                        .events
                        .push(LogEvent::new(site, &url, EventKind::SitemapIndex));

                    if depth >= self.max_depth {
                        tracing::warn!(
                            "{}: depth limit {} reached at {}, {} nested sitemaps not expanded",
                            site,
                            self.max_depth,
                            url,
                            children.len()
                        );
                        crawl.events.push(LogEvent::new(
                            site,
                            &url,
                            EventKind::Skipped(format!(
                                "depth limit {} reached, {} nested sitemaps not expanded",
                                self.max_depth,
                                children.len()
                            )),
                        ));
                    } else {
                        stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
                    }
                }
                ParsedSitemap::UrlSet(locs) => {
                    tracing::debug!("{}: {} pages in {}", site, locs.len(), url);
                    crawl
                        .events
                        .push(LogEvent::new(site, &url, EventKind::Pages(locs.len())));
                    crawl
                        .pages
                        .extend(locs.into_iter().map(|loc| PageUrl::new(loc, &url)));
                }
                ParsedSitemap::Invalid { root } => {
                    tracing::warn!(
                        "{}: {} has unrecognized root element <{}>, treated as empty",
                        site,
                        url,
                        root
                    );
                    crawl.events.push(LogEvent::new(
                        site,
                        &url,
                        EventKind::Skipped(format!("unrecognized root element <{}>", root)),
                    ));
                }
            }

            crawl.documents.push(SitemapRef { url, kind });
        }

        crawl
    }
}

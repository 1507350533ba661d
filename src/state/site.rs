/// Site classification records
use std::fmt;

/// How a site's pages can be imported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryMethod {
    /// A sitemap was located; pages come from the sitemap tree
    SitemapImport,

    /// The site answers but exposes no sitemap; only its root page is usable
    SinglePageImport,

    /// The site did not answer the reachability probe
    Unreachable,
}

impl DiscoveryMethod {
    /// Label written to the Discovery column of the classification output
    pub fn label(&self) -> &'static str {
        match self {
            Self::SitemapImport => "Sitemap Import",
            Self::SinglePageImport => "Single Page Import",
            Self::Unreachable => "Unreachable",
        }
    }
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Name used for sites whose title could not be read
pub const UNKNOWN_NAME: &str = "Unknown";

/// Classification of one input site
///
/// Built once per input row after probing and location; never modified after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteRecord {
    /// Display name (the page title, "Unknown", or "Unreachable")
    pub name: String,

    /// Site URL as written in the input row, trimmed
    pub url: String,

    /// Whether the reachability probe succeeded
    pub reachable: bool,

    /// How pages for this site can be imported
    pub discovery: DiscoveryMethod,

    /// Located sitemap entry URL, when discovery is SitemapImport
    pub sitemap_url: Option<String>,
}

impl SiteRecord {
    /// Record for a site that failed the reachability probe
    pub fn unreachable(url: impl Into<String>) -> Self {
        Self {
            name: "Unreachable".to_string(),
            url: url.into(),
            reachable: false,
            discovery: DiscoveryMethod::Unreachable,
            sitemap_url: None,
        }
    }

    /// Record for a reachable site, classified by whether a sitemap was found
    pub fn reachable(
        name: Option<String>,
        url: impl Into<String>,
        sitemap_url: Option<String>,
    ) -> Self {
        let discovery = if sitemap_url.is_some() {
            DiscoveryMethod::SitemapImport
        } else {
            DiscoveryMethod::SinglePageImport
        };

        Self {
            name: name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
            url: url.into(),
            reachable: true,
            discovery,
            sitemap_url,
        }
    }

    /// The `Name, URL, Discovery` row written to the classification output
    pub fn row(&self) -> [&str; 3] {
        [self.name.as_str(), self.url.as_str(), self.discovery.label()]
    }
}

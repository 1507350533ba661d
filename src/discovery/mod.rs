//! Sitemap discovery engine
//!
//! This module contains the per-site discovery pipeline pieces:
//! - Reachability probing
//! - Redirect chain resolution with a hop budget
//! - Sitemap location (well-known paths, then robots.txt)
//! - Sitemap parsing and bounded index expansion
//! - Site title extraction

mod locator;
mod prober;
mod redirect;
mod sitemap;
mod title;

pub use locator::{LocatedSitemap, SitemapLocator, SitemapSource};
pub use prober::is_reachable;
pub use redirect::{is_followed_redirect, resolve_redirects};
pub use sitemap::{
    parse_sitemap, PageUrl, ParsedSitemap, SitemapCrawl, SitemapCrawler, SitemapKind, SitemapRef,
};
pub use title::{extract_title, fetch_title};

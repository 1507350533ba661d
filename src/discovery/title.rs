//! Site title extraction for the Name column

use crate::http::Fetcher;
use scraper::{Html, Selector};

/// Fetches a site's root page and returns its `<title>`
///
/// Returns `None` when the page cannot be fetched or has no non-empty title.
pub async fn fetch_title(fetcher: &Fetcher, url: &str) -> Option<String> {
    match fetcher.get_text(url).await {
        Ok(fetched) => extract_title(&fetched.body),
        Err(e) => {
            tracing::debug!("Could not fetch title for {}: {}", url, e);
            None
        }
    }
}

/// Extracts the page title from an HTML document
///
/// Entities are decoded by the HTML parser; runs of whitespace are collapsed.
pub fn extract_title(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|s| !s.is_empty())
}

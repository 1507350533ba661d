//! Site list input
//!
//! Reads the candidate site list: a CSV file whose first row is a header and
//! whose first column holds the site URL.

use crate::url::normalize_site_url;
use crate::{ScoutError, UrlError};
use std::fmt;
use std::io::Read;
use std::path::Path;

/// One valid row of the site list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteEntry {
    /// The row's URL as written, trimmed; reported in outputs
    pub input: String,

    /// Normalized base URL; used for every request
    pub url: String,
}

impl SiteEntry {
    /// Validates and normalizes a raw first-column value
    pub fn new(raw: &str) -> Result<Self, UrlError> {
        let url = normalize_site_url(raw)?;
        Ok(Self {
            input: raw.trim().to_string(),
            url,
        })
    }
}

impl fmt::Display for SiteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.input)
    }
}

/// Valid site entries ready for the batch, plus how many rows were dropped
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteList {
    /// Valid entries, in input order
    pub sites: Vec<SiteEntry>,

    /// Rows skipped because the first field was empty or not an http(s) URL
    pub skipped: usize,
}

/// Reads a site list from a CSV file
pub fn read_site_list(path: &Path) -> Result<SiteList, ScoutError> {
    let file = std::fs::File::open(path)?;
    parse_site_list(file)
}

/// Parses a site list from any CSV source
///
/// Rows may have any number of columns; only the first is used. Invalid
/// URLs are logged and skipped, never classified.
pub fn parse_site_list<R: Read>(reader: R) -> Result<SiteList, ScoutError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut list = SiteList::default();

    for record in csv_reader.records() {
        let record = record?;
        let raw = record.get(0).unwrap_or_default();

        match SiteEntry::new(raw) {
            Ok(entry) => list.sites.push(entry),
            Err(e) => {
                tracing::warn!("Skipping invalid URL '{}': {}", raw.trim(), e);
                list.skipped += 1;
            }
        }
    }

    Ok(list)
}

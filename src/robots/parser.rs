//! Robots.txt parser implementation
//!
//! Only the `Sitemap:` directive matters for discovery; access rules are not
//! interpreted.

/// Parsed robots.txt data
#[derive(Debug, Clone, Default)]
pub struct ParsedRobots {
    /// Sitemap URLs in declaration order
    sitemaps: Vec<String>,
}

impl ParsedRobots {
    /// Parses raw robots.txt content
    ///
    /// A line declares a sitemap when it starts (case-insensitively, after
    /// leading whitespace) with `Sitemap:` and carries a non-empty value.
    /// Trailing `#` comments are stripped from the value.
    pub fn from_content(content: &str) -> Self {
        let sitemaps = content
            .lines()
            .filter_map(parse_sitemap_line)
            .map(str::to_string)
            .collect();

        Self { sitemaps }
    }

    /// All declared sitemap URLs, in the order they appear
    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    /// The first declared sitemap URL
    ///
    /// When several `Sitemap:` lines exist, the first one wins.
    pub fn first_sitemap(&self) -> Option<&str> {
        self.sitemaps.first().map(String::as_str)
    }
}

fn parse_sitemap_line(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    let (key, value) = trimmed.split_once(':')?;

    if !key.eq_ignore_ascii_case("sitemap") {
        return None;
    }

    let value = match value.split_once(" #") {
        Some((before, _)) => before,
        None => value,
    }
    .trim();

    (!value.is_empty()).then_some(value)
}

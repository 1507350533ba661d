//! Sitemap location: well-known paths, then robots.txt

use crate::{test_config, test_fetcher};
use sumi_scout::discovery::{SitemapLocator, SitemapSource};
use sumi_scout::url::normalize_site_url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_well_known_path_wins_without_robots() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    // robots.txt must never be consulted when the direct candidate is valid
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("Sitemap: https://elsewhere.example/s.xml"),
        )
        .expect(0)
        .mount(&server)
        .await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let locator = SitemapLocator::new(&fetcher, &config.discovery);

    let located = locator.locate(&server.uri()).await.unwrap();
    assert_eq!(located.url, format!("{}/sitemap.xml", server.uri()));
    assert_eq!(located.source, SitemapSource::WellKnownPath);
}

#[tokio::test]
async fn test_second_well_known_path_is_tried() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/wp-sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let locator = SitemapLocator::new(&fetcher, &config.discovery);

    let located = locator.locate(&server.uri()).await.unwrap();
    assert_eq!(located.url, format!("{}/wp-sitemap.xml", server.uri()));
}

#[tokio::test]
async fn test_robots_fallback_uses_first_declaration() {
    let server = MockServer::start().await;
    let first = format!("{}/maps/first.xml", server.uri());
    let second = format!("{}/maps/second.xml", server.uri());

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "User-agent: *\nDisallow: /private\n\nSitemap: {}\nsitemap: {}\n",
            first, second
        )))
        .mount(&server)
        .await;
    for p in ["/maps/first.xml", "/maps/second.xml"] {
        Mock::given(method("HEAD"))
            .and(path(p))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
    }

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let locator = SitemapLocator::new(&fetcher, &config.discovery);

    let located = locator.locate(&server.uri()).await.unwrap();
    assert_eq!(located.url, first);
    assert_eq!(located.source, SitemapSource::RobotsTxt);
}

#[tokio::test]
async fn test_robots_declaration_is_validated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            "Sitemap: {}/gone.xml\n",
            server.uri()
        )))
        .mount(&server)
        .await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let locator = SitemapLocator::new(&fetcher, &config.discovery);

    assert!(locator.locate(&server.uri()).await.is_none());
}

#[tokio::test]
async fn test_no_sitemap_anywhere() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nAllow: /\n"))
        .mount(&server)
        .await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let locator = SitemapLocator::new(&fetcher, &config.discovery);

    assert!(locator.locate(&server.uri()).await.is_none());
}

#[tokio::test]
async fn test_redirected_candidate_returns_final_url() {
    let server = MockServer::start().await;
    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/sitemap_index.xml"))
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/sitemap_index.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let locator = SitemapLocator::new(&fetcher, &config.discovery);

    let located = locator.locate(&server.uri()).await.unwrap();
    assert_eq!(located.url, format!("{}/sitemap_index.xml", server.uri()));
}

#[tokio::test]
async fn test_site_url_query_is_not_part_of_candidates() {
    let server = MockServer::start().await;
    // Only the homepage answers; any path under "/?lang=en" would hit it
    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let locator = SitemapLocator::new(&fetcher, &config.discovery);
    let base = normalize_site_url(&format!("{}/?lang=en", server.uri())).unwrap();

    assert_eq!(
        locator.primary_candidate(&base),
        format!("{}/sitemap.xml", server.uri())
    );
    assert!(locator.locate(&base).await.is_none());

    Mock::given(method("HEAD"))
        .and(path("/sitemap.xml"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let located = locator.locate(&base).await.unwrap();
    assert_eq!(located.url, format!("{}/sitemap.xml", server.uri()));
}

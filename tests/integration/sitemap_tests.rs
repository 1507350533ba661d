//! Sitemap tree expansion over HTTP

use crate::{sitemap_index, test_config, test_fetcher, urlset};
use sumi_scout::discovery::SitemapCrawler;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_xml(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn event_lines(crawl: &sumi_scout::discovery::SitemapCrawl) -> Vec<String> {
    crawl.events.iter().map(|e| e.kind.to_string()).collect()
}

#[tokio::test]
async fn test_three_level_tree_in_document_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    // root -> [a, b]; a -> [a1, a2]; b -> [b1, b2]; each leaf holds 5 pages
    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/a.xml", base), format!("{}/b.xml", base)]),
    )
    .await;
    for branch in ["a", "b"] {
        mount_xml(
            &server,
            &format!("/{}.xml", branch),
            sitemap_index(&[
                format!("{}/{}1.xml", base, branch),
                format!("{}/{}2.xml", base, branch),
            ]),
        )
        .await;
        for leaf in 1..=2 {
            let name = format!("{}{}", branch, leaf);
            let pages: Vec<String> = (1..=5)
                .map(|i| format!("{}/{}/page-{}", base, name, i))
                .collect();
            mount_xml(&server, &format!("/{}.xml", name), urlset(&pages)).await;
        }
    }

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let crawl = SitemapCrawler::new(&fetcher, 10)
        .crawl(&base, &format!("{}/sitemap.xml", base))
        .await;

    assert_eq!(crawl.pages.len(), 20);
    let expected: Vec<String> = ["a1", "a2", "b1", "b2"]
        .iter()
        .flat_map(|name| (1..=5).map(move |i| (name.to_string(), i)))
        .map(|(name, i)| format!("{}/{}/page-{}", base, name, i))
        .collect();
    let actual: Vec<String> = crawl.pages.iter().map(|p| p.url.clone()).collect();
    assert_eq!(actual, expected);

    let lines = event_lines(&crawl);
    assert_eq!(lines.iter().filter(|l| *l == "Sitemap Index").count(), 3);
    assert_eq!(lines.iter().filter(|l| *l == "Pages: 5").count(), 4);
    assert_eq!(crawl.index_count(), 3);
    assert_eq!(crawl.documents.len(), 7);
}

#[tokio::test]
async fn test_self_listing_index_terminates() {
    let server = MockServer::start().await;
    let base = server.uri();
    let root = format!("{}/sitemap.xml", base);
    let leaf = format!("{}/posts.xml", base);

    mount_xml(&server, "/sitemap.xml", sitemap_index(&[root.clone(), leaf.clone()])).await;
    mount_xml(
        &server,
        "/posts.xml",
        urlset(&[format!("{}/p/1", base), format!("{}/p/2", base)]),
    )
    .await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let crawl = SitemapCrawler::new(&fetcher, 10).crawl(&base, &root).await;

    let actual: Vec<String> = crawl.pages.iter().map(|p| p.url.clone()).collect();
    assert_eq!(actual, vec![format!("{}/p/1", base), format!("{}/p/2", base)]);
    assert!(event_lines(&crawl)
        .iter()
        .any(|l| l.starts_with("Skipped: already visited")));

    // Each document is fetched exactly once
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_malformed_branch_does_not_stop_siblings() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[
            format!("{}/good-1.xml", base),
            format!("{}/broken.xml", base),
            format!("{}/good-2.xml", base),
        ]),
    )
    .await;
    mount_xml(&server, "/good-1.xml", urlset(&[format!("{}/one", base)])).await;
    mount_xml(
        &server,
        "/broken.xml",
        "<urlset><url><loc>unterminated".to_string(),
    )
    .await;
    mount_xml(&server, "/good-2.xml", urlset(&[format!("{}/two", base)])).await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let crawl = SitemapCrawler::new(&fetcher, 10)
        .crawl(&base, &format!("{}/sitemap.xml", base))
        .await;

    let actual: Vec<String> = crawl.pages.iter().map(|p| p.url.clone()).collect();
    assert_eq!(actual, vec![format!("{}/one", base), format!("{}/two", base)]);

    let broken = crawl
        .events
        .iter()
        .find(|e| e.sitemap_url.ends_with("/broken.xml"))
        .unwrap();
    assert!(broken.kind.to_string().starts_with("XML Error: "));
}

#[tokio::test]
async fn test_missing_child_is_a_fetch_error() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/missing.xml", base), format!("{}/ok.xml", base)]),
    )
    .await;
    mount_xml(&server, "/ok.xml", urlset(&[format!("{}/ok", base)])).await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let crawl = SitemapCrawler::new(&fetcher, 10)
        .crawl(&base, &format!("{}/sitemap.xml", base))
        .await;

    assert_eq!(crawl.pages.len(), 1);
    assert!(event_lines(&crawl)
        .iter()
        .any(|l| l.starts_with("Fetch Error: ")));
}

#[tokio::test]
async fn test_depth_limit_skips_nested_indexes() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_xml(
        &server,
        "/sitemap.xml",
        sitemap_index(&[format!("{}/nested.xml", base)]),
    )
    .await;
    mount_xml(
        &server,
        "/nested.xml",
        urlset(&[format!("{}/never", base)]),
    )
    .await;

    let config = test_config();
    let fetcher = test_fetcher(&config);
    let crawl = SitemapCrawler::new(&fetcher, 0)
        .crawl(&base, &format!("{}/sitemap.xml", base))
        .await;

    assert!(crawl.pages.is_empty());
    let lines = event_lines(&crawl);
    assert_eq!(lines[0], "Sitemap Index");
    assert!(lines[1].starts_with("Skipped: depth limit 0 reached"));
}

//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::sync::Arc;
use std::time::Duration;
use sumi_sitemap::crawler::Coordinator;
use sumi_sitemap::{build_sitemap, CrawlOptions, DefaultFilter, SitemapError, UrlFilter};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Options tuned for tests: short timeout, a few workers
fn test_options(max_depth: u32) -> CrawlOptions {
    CrawlOptions::default()
        .with_max_depth(max_depth)
        .with_concurrency(4)
        .with_timeout(Duration::from_secs(2))
}

/// Mounts an HTML page and expects it to be fetched exactly `times` times
async fn mount_page(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .expect(times)
        .mount(server)
        .await;
}

fn root_of(server: &MockServer) -> String {
    format!("{}/", server.uri())
}

fn sorted_urls(urls: &sumi_sitemap::UrlSet) -> Vec<String> {
    let mut v: Vec<String> = urls.urls().map(String::from).collect();
    v.sort();
    v
}

#[tokio::test]
async fn test_depth_one_excludes_fragments_and_other_hosts() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let port = Url::parse(&base_url).unwrap().port().unwrap();

    // Same server reached through a different host name counts as another domain
    mount_page(
        &mock_server,
        "/",
        &format!(
            r##"<html><body>
            <a href="/about">About</a>
            <a href="#top">Top</a>
            <a href="http://localhost:{}/x">Elsewhere</a>
            <a href="{}/about">About again</a>
            </body></html>"##,
            port, base_url
        ),
        1,
    )
    .await;
    mount_page(&mock_server, "/about", "<html></html>", 0).await;
    mount_page(&mock_server, "/x", "<html></html>", 0).await;

    let urls = build_sitemap(&root_of(&mock_server), test_options(1))
        .await
        .expect("Crawl failed");

    assert_eq!(
        urls.urls().collect::<Vec<_>>(),
        vec![root_of(&mock_server), format!("{}/about", base_url)]
    );
}

#[tokio::test]
async fn test_max_depth_zero_fetches_nothing() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#, 0).await;

    let urls = build_sitemap(&root_of(&mock_server), test_options(0))
        .await
        .expect("Crawl failed");

    assert_eq!(urls.urls().collect::<Vec<_>>(), vec![root_of(&mock_server)]);
}

#[tokio::test]
async fn test_depth_limit_bounds_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Chain: / -> /a -> /b -> /c
    mount_page(&mock_server, "/", r#"<a href="/a">A</a>"#, 1).await;
    mount_page(&mock_server, "/a", r#"<a href="/b">B</a>"#, 1).await;
    mount_page(&mock_server, "/b", r#"<a href="/c">C</a>"#, 0).await;
    mount_page(&mock_server, "/c", "<html></html>", 0).await;

    let urls = build_sitemap(&root_of(&mock_server), test_options(2))
        .await
        .expect("Crawl failed");

    // /b is discovered in the last round but never fetched
    assert_eq!(
        urls.urls().collect::<Vec<_>>(),
        vec![
            format!("{}/", base_url),
            format!("{}/a", base_url),
            format!("{}/b", base_url),
        ]
    );
    assert!(!urls.contains(&format!("{}/c", base_url)));
}

#[tokio::test]
async fn test_broken_link_keeps_siblings() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/ok">OK</a><a href="/missing">Missing</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/ok", r#"<a href="/deep">Deep</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (urls, stats) = Coordinator::new(&root_of(&mock_server), test_options(2))
        .unwrap()
        .run_with_stats()
        .await
        .expect("Crawl failed");

    assert_eq!(
        sorted_urls(&urls),
        vec![
            format!("{}/", base_url),
            format!("{}/deep", base_url),
            format!("{}/missing", base_url),
            format!("{}/ok", base_url),
        ]
    );
    assert_eq!(stats.rounds.len(), 2);
    assert_eq!(stats.rounds[1].pages_fetched, 1);
    assert_eq!(stats.rounds[1].pages_failed, 1);
}

#[tokio::test]
async fn test_root_not_found_is_fatal() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = build_sitemap(&root_of(&mock_server), test_options(3)).await;

    assert!(matches!(result, Err(SitemapError::RootUnreachable { .. })));
}

#[tokio::test]
async fn test_root_connection_refused_is_fatal() {
    // Reserve a port, then free it so nothing listens there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = build_sitemap(&format!("http://127.0.0.1:{}/", port), test_options(2)).await;

    assert!(matches!(result, Err(SitemapError::RootUnreachable { .. })));
}

#[tokio::test]
async fn test_invalid_root_and_options_rejected() {
    assert!(matches!(
        build_sitemap("ftp://example.com/", test_options(1)).await,
        Err(SitemapError::Url(_))
    ));
    assert!(matches!(
        build_sitemap("not a url", test_options(1)).await,
        Err(SitemapError::Url(_))
    ));
    assert!(matches!(
        build_sitemap("http://example.com/", test_options(1).with_concurrency(0)).await,
        Err(SitemapError::InvalidOptions(_))
    ));
}

#[tokio::test]
async fn test_pages_fetched_once_across_rounds() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Every page links every other page and back to the root
    let all_links = r#"<a href="/">Home</a><a href="/a">A</a><a href="/b">B</a><a href="/c">C</a>"#;
    mount_page(&mock_server, "/", all_links, 1).await;
    mount_page(&mock_server, "/a", all_links, 1).await;
    mount_page(&mock_server, "/b", all_links, 1).await;
    mount_page(&mock_server, "/c", all_links, 1).await;

    let (urls, stats) = Coordinator::new(&root_of(&mock_server), test_options(5))
        .unwrap()
        .run_with_stats()
        .await
        .expect("Crawl failed");

    assert_eq!(urls.len(), 4);
    assert_eq!(urls.urls().next(), Some(format!("{}/", base_url).as_str()));
    // Round 1 finds nothing new, so round 2 never starts
    assert_eq!(stats.rounds.len(), 2);
    assert_eq!(stats.rounds[1].new_urls, 0);
}

#[tokio::test]
async fn test_empty_frontier_stops_before_max_depth() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", "<html><body>No links here</body></html>", 1).await;

    let (urls, stats) = Coordinator::new(&root_of(&mock_server), test_options(10))
        .unwrap()
        .run_with_stats()
        .await
        .expect("Crawl failed");

    assert_eq!(urls.len(), 1);
    assert_eq!(stats.rounds.len(), 1);
}

#[tokio::test]
async fn test_custom_filter() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/public">Public</a><a href="/private/area">Private</a>"#,
        1,
    )
    .await;
    mount_page(&mock_server, "/public", "<html></html>", 1).await;
    mount_page(&mock_server, "/private/area", "<html></html>", 0).await;

    let filter: Arc<dyn UrlFilter> = Arc::new(|root: &Url, base: &Url, href: &str| {
        DefaultFilter
            .filter(root, base, href)
            .filter(|u| !u.path().starts_with("/private"))
    });
    let urls = build_sitemap(&root_of(&mock_server), test_options(3).with_filter(filter))
        .await
        .expect("Crawl failed");

    assert_eq!(
        sorted_urls(&urls),
        vec![format!("{}/", base_url), format!("{}/public", base_url)]
    );
}

#[tokio::test]
async fn test_relative_links_resolve_against_redirect_target() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/docs/", base_url).as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/docs/", r#"<a href="intro">Intro</a>"#, 1).await;

    let urls = build_sitemap(&root_of(&mock_server), test_options(1))
        .await
        .expect("Crawl failed");

    assert!(urls.contains(&format!("{}/docs/intro", base_url)));
    assert!(!urls.contains(&format!("{}/intro", base_url)));
}

#[tokio::test]
async fn test_non_html_pages_contribute_no_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/data.json">Data</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"href": "<a href=\"/hidden\">x</a>"}"#, "application/json"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let urls = build_sitemap(&root_of(&mock_server), test_options(3))
        .await
        .expect("Crawl failed");

    assert_eq!(
        sorted_urls(&urls),
        vec![format!("{}/", base_url), format!("{}/data.json", base_url)]
    );
}

#[tokio::test]
async fn test_crawl_result_as_sitemap_xml() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/search?q=a&amp;page=2">Search</a>"#, 1).await;

    let urls = build_sitemap(&root_of(&mock_server), test_options(1))
        .await
        .expect("Crawl failed");
    let xml = urls.to_xml().expect("XML serialization failed");

    assert!(xml.contains(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#));
    assert!(xml.contains(&format!("<loc>{}/</loc>", base_url)));
    assert!(xml.contains(&format!("<loc>{}/search?q=a&amp;page=2</loc>", base_url)));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("sitemap.xml");
    sumi_sitemap::output::write_sitemap(&urls, &out).unwrap();
    assert_eq!(std::fs::read_to_string(&out).unwrap(), xml);
}

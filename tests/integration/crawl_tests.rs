//! Integration tests for the site crawler
//!
//! These tests use wiremock to create mock HTTP servers and run whole
//! crawls against them end-to-end.

use mail_ripple::config::UserAgentConfig;
use mail_ripple::crawler::{build_http_client, CrawlLimits, CrawlOutcome, SiteCrawler, SiteReport};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_crawler(max_domains: usize, max_iterations: usize) -> SiteCrawler {
    crawler_with_timeout(max_domains, max_iterations, Duration::from_secs(5))
}

fn crawler_with_timeout(max_domains: usize, max_iterations: usize, timeout: Duration) -> SiteCrawler {
    let user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
    };
    let client = build_http_client(&user_agent, timeout).expect("Failed to build HTTP client");
    SiteCrawler::new(
        client,
        CrawlLimits {
            max_domains,
            max_iterations,
        },
    )
}

/// Mounts an HTML page at `route`
async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}

async fn run(crawler: &SiteCrawler, seed: &str) -> SiteReport {
    match crawler
        .crawl_until_cancelled(seed, &CancellationToken::new())
        .await
    {
        CrawlOutcome::Completed(report) => report,
        CrawlOutcome::Cancelled => panic!("crawl was not expected to be cancelled"),
    }
}

fn host_of(uri: &str) -> String {
    url::Url::parse(uri)
        .expect("Failed to parse server URI")
        .host_str()
        .expect("Server URI has no host")
        .to_string()
}

#[tokio::test]
async fn test_crawl_collects_emails_across_link_kinds() {
    let server = MockServer::start().await;
    let base = server.uri();
    let host = host_of(&base);

    mount_page(
        &server,
        "/",
        format!(
            r#"<html><body>
            <p>Write to info@alpha.example or INFO@alpha.example</p>
            <a href="/contact">root relative</a>
            <a href="about.html">relative</a>
            <a href="{}/team">absolute</a>
            </body></html>"#,
            base
        ),
    )
    .await;
    mount_page(
        &server,
        "/contact",
        r#"<html><body><a href="mailto:sales@alpha.example">Sales</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &server,
        "/about.html",
        "<html><body>press@alpha.example</body></html>".to_string(),
    )
    .await;
    mount_page(
        &server,
        "/team",
        "<html><body>jobs@alpha.example, info@alpha.example</body></html>".to_string(),
    )
    .await;

    let report = run(&test_crawler(10, 999), &base).await;

    let found: Vec<&str> = report.emails[&host].iter().map(String::as_str).collect();
    assert_eq!(
        found,
        vec![
            "INFO@alpha.example",
            "info@alpha.example",
            "jobs@alpha.example",
            "press@alpha.example",
            "sales@alpha.example",
        ]
    );
    assert_eq!(report.emails.len(), 1);
    assert_eq!(report.stats.html_pages, 4);
    assert_eq!(report.stats.domains_admitted, 1);
}

#[tokio::test]
async fn test_failed_and_non_html_pages_are_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();
    let host = host_of(&base);

    mount_page(
        &server,
        "/",
        r#"<html><body>
        home@beta.example
        <a href="/missing">gone</a>
        <a href="/price-list.pdf">prices</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/price-list.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("pdf@beta.example", "application/pdf"))
        .mount(&server)
        .await;

    let report = run(&test_crawler(10, 999), &base).await;

    assert_eq!(report.emails.len(), 1);
    assert!(report.emails[&host].contains("home@beta.example"));
    assert!(!report.emails[&host].contains("pdf@beta.example"));
    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.non_html, 1);
}

#[tokio::test]
async fn test_iteration_cap_bounds_dequeues() {
    let server = MockServer::start().await;
    let base = server.uri();
    let host = host_of(&base);

    // A chain: / -> /p1 -> /p2 -> /p3 -> /p4
    mount_page(
        &server,
        "/",
        r#"<html><body>p0@chain.example <a href="/p1">next</a></body></html>"#.to_string(),
    )
    .await;
    for i in 1..=4 {
        mount_page(
            &server,
            &format!("/p{}", i),
            format!(
                r#"<html><body>p{}@chain.example <a href="/p{}">next</a></body></html>"#,
                i,
                i + 1
            ),
        )
        .await;
    }

    let report = run(&test_crawler(10, 2), &base).await;

    assert_eq!(report.stats.dequeued, 3);
    let found = &report.emails[&host];
    assert!(found.contains("p0@chain.example"));
    assert!(found.contains("p2@chain.example"));
    assert!(!found.contains("p3@chain.example"));
}

#[tokio::test]
async fn test_zero_iterations_fetches_seed_only() {
    let server = MockServer::start().await;
    let base = server.uri();
    let host = host_of(&base);

    mount_page(
        &server,
        "/",
        r#"<html><body>seed@zeta.example <a href="/a">a</a><a href="/b">b</a></body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>a@zeta.example</html>", "text/html"),
        )
        .expect(0)
        .mount(&server)
        .await;

    let report = run(&test_crawler(10, 0), &base).await;

    assert_eq!(report.stats.dequeued, 1);
    assert_eq!(report.stats.html_pages, 1);
    assert_eq!(report.stats.links_enqueued, 2);
    assert_eq!(report.emails.len(), 1);
    assert_eq!(report.emails[&host].len(), 1);
    assert!(report.emails[&host].contains("seed@zeta.example"));
}

#[tokio::test]
async fn test_timed_out_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let host = host_of(&base);

    mount_page(
        &server,
        "/",
        r#"<html><body><a href="/slow">slow</a><a href="/ok">ok</a></body></html>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html>late@eta.example</html>", "text/html")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/ok",
        "<html><body>ok@eta.example</body></html>".to_string(),
    )
    .await;

    let crawler = crawler_with_timeout(10, 999, Duration::from_millis(500));
    let report = run(&crawler, &base).await;

    assert_eq!(report.stats.fetch_failures, 1);
    assert_eq!(report.stats.html_pages, 2);
    assert!(report.emails[&host].contains("ok@eta.example"));
    assert!(!report.emails[&host].contains("late@eta.example"));
}

#[tokio::test]
async fn test_seed_without_scheme_is_normalized() {
    let server = MockServer::start().await;
    let bare = server.uri().trim_start_matches("http://").to_string();

    mount_page(
        &server,
        "/",
        "<html><body>hello@gamma.example</body></html>".to_string(),
    )
    .await;

    let report = run(&test_crawler(10, 999), &bare).await;

    assert_eq!(report.seed, format!("http://{}/", bare));
    assert_eq!(report.stats.html_pages, 1);
    assert_eq!(report.emails.values().map(|set| set.len()).sum::<usize>(), 1);
}

#[tokio::test]
async fn test_domain_cap_refuses_new_hostnames() {
    let server = MockServer::start().await;
    let base = server.uri();
    let port = url::Url::parse(&base)
        .expect("Failed to parse server URI")
        .port()
        .expect("Server URI has no port");

    // Same server under a second hostname
    mount_page(
        &server,
        "/",
        format!(
            r#"<html><body>root@delta.example
            <a href="http://localhost:{}/other">other host</a></body></html>"#,
            port
        ),
    )
    .await;
    mount_page(
        &server,
        "/other",
        "<html><body>other@delta.example</body></html>".to_string(),
    )
    .await;

    // A cap of zero still admits the seed's hostname, then refuses the next
    let report = run(&test_crawler(0, 999), &base).await;
    assert_eq!(report.stats.domains_admitted, 1);
    assert_eq!(report.stats.skipped_domain_cap, 1);
    assert!(!report.emails.contains_key("localhost"));

    // A cap of one admits both hostnames
    let report = run(&test_crawler(1, 999), &base).await;
    assert_eq!(report.stats.domains_admitted, 2);
    assert_eq!(report.stats.skipped_domain_cap, 0);
}

#[tokio::test]
async fn test_duplicate_links_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><body>
        <a href="/loop">a</a><a href="/loop">b</a><a href="/">home</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"<html><body><a href="/">home</a><a href="/loop">self</a></body></html>"#,
            "text/html",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let report = run(&test_crawler(10, 999), &base).await;

    assert_eq!(report.stats.html_pages, 2);
    assert!(report.emails.is_empty());
}

#[tokio::test]
async fn test_cancellation_discards_partial_results() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/",
        r#"<html><body>first@epsilon.example <a href="/slow">slow</a></body></html>"#.to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>late@epsilon.example</body></html>", "text/html")
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let crawler = test_crawler(10, 999);
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(500)).await;
        trigger.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(10),
        crawler.crawl_until_cancelled(&base, &cancel),
    )
    .await
    .expect("cancellation did not interrupt the slow fetch");

    assert!(matches!(outcome, CrawlOutcome::Cancelled));
}

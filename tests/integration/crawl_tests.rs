//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use email_hunter::config::{load_config, CrawlConfig};
use email_hunter::output::{write_csv_file, CrawlReport, Record, RecordType, SourceType};
use email_hunter::{Coordinator, CrawlState, SkipReason};
use std::io::Write;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast, robots-agnostic test configuration for the given seeds
fn create_test_config(seeds: Vec<String>) -> CrawlConfig {
    let mut config = CrawlConfig::new(vec!["example.com".to_string()], seeds);
    config.rate_interval = 0.0;
    config.honor_robots = false;
    config.user_agent = "HunterTest/1.0".to_string();
    config.retry.base_delay_ms = 1;
    config.retry.max_delay_ms = 5;
    config
}

/// An HTML response with the right content type
fn html(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: impl Into<String>, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(expected)
        .mount(server)
        .await;
}

async fn run_crawl(config: CrawlConfig) -> (Vec<Record>, CrawlReport) {
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let mut records: Vec<Record> = Vec::new();
    let report = coordinator.run(&mut records).await.expect("Crawl failed");
    assert_eq!(coordinator.state(), CrawlState::Done);
    (records, report)
}

fn values(records: &[Record]) -> Vec<&str> {
    records.iter().map(|r| r.value.as_str()).collect()
}

#[tokio::test]
async fn test_single_allowed_email() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/contact",
        "<html><head><title>Contact us</title></head><body><p>reach us at contact@example.com</p></body></html>",
        1,
    )
    .await;

    let mut config = create_test_config(vec![format!("{}/contact", server.uri())]);
    config.max_depth = 0;
    let (records, report) = run_crawl(config).await;

    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.record_type, RecordType::Email);
    assert_eq!(record.value, "contact@example.com");
    assert_eq!(record.domain.as_deref(), Some("example.com"));
    assert_eq!(record.source_url, format!("{}/contact", server.uri()));
    assert_eq!(record.source_type, Some(SourceType::Html));
    assert_eq!(record.page_title, "Contact us");
    assert!(record.snippet.contains("reach us at contact@example.com"));
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.records_emitted, 1);
    assert_eq!(report.final_state, CrawlState::Done);
}

#[tokio::test]
async fn test_other_domain_filtered_out() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/contact",
        "<html><body>write to info@other.org or sales@notexample.com</body></html>",
        1,
    )
    .await;

    let mut config = create_test_config(vec![format!("{}/contact", server.uri())]);
    config.max_depth = 0;
    let (records, report) = run_crawl(config).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_fetched, 1);
}

#[tokio::test]
async fn test_subdomain_email_allowed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>Press: press@media.example.com</p>", 1).await;

    let (records, _) = run_crawl(create_test_config(vec![format!("{}/", server.uri())])).await;

    assert_eq!(values(&records), vec!["press@media.example.com"]);
    assert_eq!(records[0].domain.as_deref(), Some("media.example.com"));
}

#[tokio::test]
async fn test_page_budget_stops_crawl() {
    let server = MockServer::start().await;
    let links: String = (1..=5)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();
    mount_page(&server, "/", format!("<html><body>{}</body></html>", links), 1).await;
    for i in 1..=5 {
        mount_page(&server, &format!("/p{}", i), "<p>never fetched</p>", 0).await;
    }

    let mut config = create_test_config(vec![format!("{}/", server.uri())]);
    config.max_pages = 1;
    let (_, report) = run_crawl(config).await;

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.frontier_remaining, 5);
    assert_eq!(report.final_state, CrawlState::Done);
}

#[tokio::test]
async fn test_zero_page_budget_fetches_nothing() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>contact@example.com</p>", 0).await;

    let mut config = create_test_config(vec![format!("{}/", server.uri())]);
    config.max_pages = 0;
    let (records, report) = run_crawl(config).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.frontier_remaining, 1);
}

#[tokio::test]
async fn test_robots_disallow_skips_seed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /contact"),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/contact", "<p>contact@example.com</p>", 0).await;

    let mut config = create_test_config(vec![format!("{}/contact", server.uri())]);
    config.honor_robots = true;
    let (records, report) = run_crawl(config).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.skipped_for(SkipReason::RobotsDisallowed), 1);
}

#[tokio::test]
async fn test_robots_fetched_once_per_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/",
        r#"<a href="/a">a</a><a href="/private">p</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/a", "<p>a@example.com</p>", 1).await;
    mount_page(&server, "/private", "<p>secret@example.com</p>", 0).await;

    let mut config = create_test_config(vec![format!("{}/", server.uri())]);
    config.honor_robots = true;
    let (records, report) = run_crawl(config).await;

    assert_eq!(values(&records), vec!["a@example.com"]);
    assert_eq!(report.pages_fetched, 2);
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/contact", "<p>contact@example.com</p>", 1).await;

    let mut config = create_test_config(vec![format!("{}/contact", server.uri())]);
    config.honor_robots = true;
    let (records, _) = run_crawl(config).await;

    assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn test_robots_crawl_delay_paces_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nCrawl-delay: 0.3"))
        .mount(&server)
        .await;
    mount_page(&server, "/a", "<p>a</p>", 1).await;
    mount_page(&server, "/b", "<p>b</p>", 1).await;

    let mut config = create_test_config(vec![
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
    ]);
    config.honor_robots = true;

    let start = Instant::now();
    let (_, report) = run_crawl(config).await;

    assert_eq!(report.pages_fetched, 2);
    assert!(start.elapsed() >= Duration::from_millis(290));
}

#[tokio::test]
async fn test_forbidden_retried_once_then_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(403))
        .expect(2)
        .mount(&server)
        .await;
    mount_page(&server, "/ok", "<p>contact@example.com</p>", 1).await;

    let config = create_test_config(vec![
        format!("{}/blocked", server.uri()),
        format!("{}/ok", server.uri()),
    ]);
    let (records, report) = run_crawl(config).await;

    assert_eq!(report.skipped_for(SkipReason::Forbidden), 1);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(values(&records), vec!["contact@example.com"]);
    assert!(records[0].source_url.ends_with("/ok"));
}

#[tokio::test]
async fn test_server_error_retried_to_bound() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let (records, report) =
        run_crawl(create_test_config(vec![format!("{}/flaky", server.uri())])).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.skipped_for(SkipReason::ServerError), 1);
}

#[tokio::test]
async fn test_not_found_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let (_, report) = run_crawl(create_test_config(vec![format!("{}/gone", server.uri())])).await;

    assert_eq!(report.skipped_for(SkipReason::HttpError), 1);
}

#[tokio::test]
async fn test_phone_extraction() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>call +8801234567890</p>", 1).await;

    let mut config = create_test_config(vec![format!("{}/", server.uri())]);
    config.include_phones = true;
    let (records, _) = run_crawl(config).await;

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, RecordType::Phone);
    assert_eq!(records[0].value, "+8801234567890");
    assert!(records[0].domain.is_none());
}

#[tokio::test]
async fn test_phones_ignored_by_default() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>call +8801234567890</p>", 1).await;

    let (records, _) = run_crawl(create_test_config(vec![format!("{}/", server.uri())])).await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_depth_limit_respected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/level1">1</a>"#, 1).await;
    mount_page(
        &server,
        "/level1",
        r#"<p>one@example.com</p><a href="/level2">2</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/level2", "<p>two@example.com</p>", 0).await;

    let mut config = create_test_config(vec![format!("{}/", server.uri())]);
    config.max_depth = 1;
    let (records, report) = run_crawl(config).await;

    assert_eq!(values(&records), vec!["one@example.com"]);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.frontier_remaining, 0);
}

#[tokio::test]
async fn test_breadth_first_order() {
    let server = MockServer::start().await;
    mount_page(&server, "/", r#"<a href="/a">a</a><a href="/b">b</a>"#, 1).await;
    mount_page(&server, "/a", r#"<p>a@example.com</p><a href="/a/deep">d</a>"#, 1).await;
    mount_page(&server, "/b", "<p>b@example.com</p>", 1).await;
    mount_page(&server, "/a/deep", "<p>deep@example.com</p>", 1).await;

    let mut config = create_test_config(vec![format!("{}/", server.uri())]);
    config.max_depth = 2;
    let (records, _) = run_crawl(config).await;

    assert_eq!(
        values(&records),
        vec!["a@example.com", "b@example.com", "deep@example.com"]
    );
}

#[tokio::test]
async fn test_external_links_not_followed_by_default() {
    let home = MockServer::start().await;
    let other = MockServer::start().await;
    mount_page(
        &home,
        "/",
        format!(r#"<a href="{}/team">Team</a>"#, other.uri()),
        1,
    )
    .await;
    mount_page(&other, "/team", "<p>team@example.com</p>", 0).await;

    let (records, report) = run_crawl(create_test_config(vec![format!("{}/", home.uri())])).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_fetched, 1);
}

#[tokio::test]
async fn test_external_links_followed_when_enabled() {
    let home = MockServer::start().await;
    let other = MockServer::start().await;
    mount_page(
        &home,
        "/",
        format!(r#"<a href="{}/team">Team</a>"#, other.uri()),
        1,
    )
    .await;
    mount_page(&other, "/team", "<p>team@example.com</p>", 1).await;

    let mut config = create_test_config(vec![format!("{}/", home.uri())]);
    config.external_follow = true;
    let (records, report) = run_crawl(config).await;

    assert_eq!(values(&records), vec!["team@example.com"]);
    assert_eq!(records[0].source_url, format!("{}/team", other.uri()));
    assert_eq!(report.pages_fetched, 2);
}

#[tokio::test]
async fn test_dedup_per_source_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<p>contact@example.com and again CONTACT@example.com</p><a href="/about">About</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/about", "<p>contact@example.com</p>", 1).await;

    let (records, report) = run_crawl(create_test_config(vec![format!("{}/", server.uri())])).await;

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.value == "contact@example.com"));
    assert_ne!(records[0].source_url, records[1].source_url);
    assert_eq!(report.records_emitted, 2);
}

#[tokio::test]
async fn test_no_url_fetched_twice() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="/a">a</a><a href="/a/">a2</a><a href="/a#top">a3</a><a href="/">home</a>"#,
        1,
    )
    .await;
    mount_page(&server, "/a", r#"<a href="/">home</a><a href="/a">self</a>"#, 1).await;

    let mut config = create_test_config(vec![format!("{}/", server.uri())]);
    config.max_depth = 3;
    let (_, report) = run_crawl(config).await;

    assert_eq!(report.pages_fetched, 2);
}

#[tokio::test]
async fn test_redirect_target_is_source_and_visited() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/new"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/new",
        r#"<p>hello@example.com</p><a href="/new">self</a>"#,
        1,
    )
    .await;

    let (records, report) = run_crawl(create_test_config(vec![format!("{}/old", server.uri())])).await;

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].source_url, format!("{}/new", server.uri()));
}

async fn mount_redirect(server: &MockServer, route: &str, status: u16, location: &str, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).insert_header("Location", location))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_redirect_to_visited_url_not_refetched() {
    let server = MockServer::start().await;
    mount_page(&server, "/a", "<p>team@example.com</p>", 1).await;
    mount_redirect(&server, "/b", 301, "/a", 1).await;

    let mut config = create_test_config(vec![
        format!("{}/a", server.uri()),
        format!("{}/b", server.uri()),
    ]);
    config.max_depth = 0;
    let (records, report) = run_crawl(config).await;

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.skipped_for(SkipReason::AlreadyVisited), 1);
    assert_eq!(values(&records), vec!["team@example.com"]);
    assert_eq!(records[0].source_url, format!("{}/a", server.uri()));
}

#[tokio::test]
async fn test_redirect_off_seed_host_not_followed() {
    let seed = MockServer::start().await;
    let outside = MockServer::start().await;
    mount_redirect(&seed, "/x", 302, &format!("{}/y", outside.uri()), 1).await;
    mount_page(&outside, "/y", "<p>leak@example.com</p>", 0).await;

    let (records, report) = run_crawl(create_test_config(vec![format!("{}/x", seed.uri())])).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.skipped_for(SkipReason::OffScope), 1);
}

#[tokio::test]
async fn test_redirect_off_seed_host_followed_when_external_enabled() {
    let seed = MockServer::start().await;
    let outside = MockServer::start().await;
    mount_redirect(&seed, "/x", 302, &format!("{}/y", outside.uri()), 1).await;
    mount_page(&outside, "/y", "<p>partner@example.com</p>", 1).await;

    let mut config = create_test_config(vec![format!("{}/x", seed.uri())]);
    config.external_follow = true;
    let (records, report) = run_crawl(config).await;

    assert_eq!(report.pages_fetched, 1);
    assert_eq!(values(&records), vec!["partner@example.com"]);
    assert_eq!(records[0].source_url, format!("{}/y", outside.uri()));
}

#[tokio::test]
async fn test_redirect_loop_is_bounded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop/"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/loop/"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/loop"))
        .mount(&server)
        .await;

    let (records, report) = run_crawl(create_test_config(vec![format!("{}/loop", server.uri())])).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_fetched, 0);
    assert_eq!(report.skipped_for(SkipReason::TooManyRedirects), 1);
}

#[tokio::test]
async fn test_mailto_addresses_found() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        r#"<a href="mailto:hello@example.com?subject=Hi">Write to us</a>"#,
        1,
    )
    .await;

    let (records, _) = run_crawl(create_test_config(vec![format!("{}/", server.uri())])).await;

    assert_eq!(values(&records), vec!["hello@example.com"]);
}

#[tokio::test]
async fn test_pdf_skipped_when_disabled() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/brochure.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4 fake".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;

    let (records, report) =
        run_crawl(create_test_config(vec![format!("{}/brochure.pdf", server.uri())])).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.skipped_for(SkipReason::UnsupportedContent), 1);
}

#[tokio::test]
async fn test_malformed_pdf_does_not_abort_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/broken.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"not really a pdf".to_vec(), "application/pdf"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/contact", "<p>contact@example.com</p>", 1).await;

    let mut config = create_test_config(vec![
        format!("{}/broken.pdf", server.uri()),
        format!("{}/contact", server.uri()),
    ]);
    config.include_pdfs = true;
    let (records, report) = run_crawl(config).await;

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.skipped_for(SkipReason::ExtractionFailed), 1);
    assert_eq!(values(&records), vec!["contact@example.com"]);
}

#[tokio::test]
async fn test_unsupported_content_counts_against_budget() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/logo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0x89, 0x50, 0x4e, 0x47], "image/png"))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/contact", "<p>contact@example.com</p>", 0).await;

    let mut config = create_test_config(vec![
        format!("{}/logo.png", server.uri()),
        format!("{}/contact", server.uri()),
    ]);
    config.max_pages = 1;
    let (records, report) = run_crawl(config).await;

    assert!(records.is_empty());
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.frontier_remaining, 1);
}

#[tokio::test]
async fn test_run_twice_is_rejected() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>nothing</p>", 1).await;

    let mut coordinator =
        Coordinator::new(create_test_config(vec![format!("{}/", server.uri())])).unwrap();
    let mut records: Vec<Record> = Vec::new();
    coordinator.run(&mut records).await.unwrap();

    assert!(coordinator.run(&mut records).await.is_err());
}

#[tokio::test]
async fn test_crawl_from_config_file_to_csv() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        "<html><head><title>Team, Inc.</title></head><body>Contact: hello@example.com</body></html>",
        1,
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("hunter.toml");
    let mut file = std::fs::File::create(&config_path).unwrap();
    write!(
        file,
        r#"
allowed-domains = ["Example.com"]
seed-urls = ["{}/"]
max-pages = 5
max-depth = 0
rate-interval = 0.0
honor-robots = false
user-agent = "HunterTest/1.0"
"#,
        server.uri()
    )
    .unwrap();
    drop(file);

    let config = load_config(&config_path).unwrap();
    let (records, _) = run_crawl(config).await;

    let csv_path = dir.path().join("findings.csv");
    let rows = write_csv_file(&csv_path, &records).unwrap();
    assert_eq!(rows, 1);

    let content = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("type,value,domain,source_url,source_type,page_title,snippet,first_seen")
    );
    let row = lines.next().unwrap();
    assert!(row.starts_with(&format!(
        "email,hello@example.com,example.com,{}/,html,\"Team, Inc.\",",
        server.uri()
    )));
    assert!(row.ends_with('Z'));
}

#[tokio::test]
async fn test_empty_run_writes_no_hits() {
    let server = MockServer::start().await;
    mount_page(&server, "/", "<p>nothing to see</p>", 1).await;

    let (records, _) = run_crawl(create_test_config(vec![format!("{}/", server.uri())])).await;
    assert!(records.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("findings.csv");
    write_csv_file(&csv_path, &records).unwrap();

    let content = std::fs::read_to_string(&csv_path).unwrap();
    assert!(content.lines().nth(1).unwrap().starts_with("info,no_hits,"));
}

#[test]
fn test_invalid_config_never_starts() {
    let config = CrawlConfig::new(vec!["example.com".to_string()], vec![]);
    assert!(Coordinator::new(config).is_err());

    let config = CrawlConfig::new(vec![], vec!["https://example.com/".to_string()]);
    assert!(Coordinator::new(config).is_err());
}

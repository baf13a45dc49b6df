//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the study site and test the
//! full login, download, save and audit cycle end-to-end.

use koohii_mirror::config::SessionConfig;
use koohii_mirror::crawler::{CrawlSettings, Crawler};
use koohii_mirror::integrity::{audit_directory, IntegrityReport};
use koohii_mirror::range::{Codepoint, Domain, RangeSpec};
use koohii_mirror::session::{Credentials, KoohiiSession};
use koohii_mirror::store::{ArtifactNaming, ArtifactStore, DirectoryStore};
use koohii_mirror::{ErrorKind, MirrorError};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGGED_IN_PAGE: &str = r#"<html><body><div id="EditStoryComponent"></div></body></html>"#;
const LOGGED_OUT_PAGE: &str = r#"<html><body><form action="/login">Sign in</form></body></html>"#;

/// Creates a session pointed at the mock server
fn create_session(server: &MockServer) -> KoohiiSession {
    let config = SessionConfig {
        base_url: server.uri(),
        ..SessionConfig::default()
    };
    KoohiiSession::new(&config).expect("Failed to create session")
}

/// The domain 'a'..='c', whose pages live at plain ASCII paths
fn letters() -> Domain {
    Domain::new('a' as u32, 'c' as u32)
}

/// Creates crawl settings over `letters()`
fn create_settings(spec: Option<&str>) -> CrawlSettings {
    let domain = letters();
    CrawlSettings {
        credentials: Credentials::new("alice", "secret"),
        range: RangeSpec::parse(spec, domain).expect("Failed to parse range"),
        domain,
        delay: Duration::from_millis(5),
    }
}

async fn mount_login(server: &MockServer, expected_logins: u64) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "session=abc"))
        .expect(expected_logins)
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, letter: char, body: &str, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/study/kanji/{}", letter)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_and_audit() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 1).await;

    // Pages are only served to the logged-in session
    for letter in ['a', 'b', 'c'] {
        Mock::given(method("GET"))
            .and(path(format!("/study/kanji/{}", letter)))
            .and(header("cookie", "session=abc"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LOGGED_IN_PAGE))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = DirectoryStore::create(dir.path().join("pages"), ArtifactNaming::default())
        .expect("Failed to create store");

    let crawler = Crawler::new(create_session(&mock_server), store, create_settings(None));
    let stats = crawler.run().await.expect("Crawl failed");

    assert_eq!(stats.artifacts_written, 3);
    assert!(dir.path().join("pages/u000061.html").is_file());
    assert!(dir.path().join("pages/u000063.html").is_file());

    let report = audit_directory(&dir.path().join("pages"), &ArtifactNaming::default(), letters())
        .expect("Audit failed");
    assert_eq!(report, IntegrityReport::Complete { unchecked: 0 });
}

#[tokio::test]
async fn test_logged_out_page_aborts_run() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 1).await;
    mount_page(&mock_server, 'a', LOGGED_IN_PAGE, 1).await;
    mount_page(&mock_server, 'b', LOGGED_OUT_PAGE, 1).await;
    // Never requested once the session is lost
    mount_page(&mock_server, 'c', LOGGED_IN_PAGE, 0).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = DirectoryStore::create(dir.path(), ArtifactNaming::default())
        .expect("Failed to create store");

    let crawler = Crawler::new(
        create_session(&mock_server),
        store,
        create_settings(Some("a..c")),
    );
    let err = crawler.run().await.unwrap_err();

    assert!(matches!(
        err,
        MirrorError::InvalidSession { codepoint } if codepoint == Codepoint('b' as u32)
    ));
    assert_eq!(
        crawler.store().list_identifiers().unwrap(),
        vec![Codepoint('a' as u32)]
    );

    let report = audit_directory(dir.path(), &ArtifactNaming::default(), letters())
        .expect("Audit failed");
    assert_eq!(
        report,
        IntegrityReport::Gap {
            first_missing: Codepoint('b' as u32)
        }
    );
}

#[tokio::test]
async fn test_rejected_login_fetches_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LOGGED_IN_PAGE))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = DirectoryStore::create(dir.path(), ArtifactNaming::default())
        .expect("Failed to create store");

    let crawler = Crawler::new(create_session(&mock_server), store, create_settings(None));
    let retried = crawler.run_with_retries(2).await;

    assert!(!retried.succeeded());
    assert_eq!(retried.attempts(), 2);
    assert_eq!(
        retried.last().and_then(|o| o.failure),
        Some(ErrorKind::Auth)
    );
    assert!(crawler.store().list_identifiers().unwrap().is_empty());
}

#[tokio::test]
async fn test_retry_resumes_after_server_error() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 2).await;
    mount_page(&mock_server, 'a', LOGGED_IN_PAGE, 1).await;

    // 'b' fails once, then succeeds on the next run
    Mock::given(method("GET"))
        .and(path("/study/kanji/b"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, 'b', LOGGED_IN_PAGE, 1).await;
    mount_page(&mock_server, 'c', LOGGED_IN_PAGE, 1).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = DirectoryStore::create(dir.path(), ArtifactNaming::default())
        .expect("Failed to create store");

    let crawler = Crawler::new(create_session(&mock_server), store, create_settings(None));
    let retried = crawler.run_with_retries(3).await;

    assert!(retried.succeeded());
    assert_eq!(retried.attempts(), 2);
    assert_eq!(retried.outcomes[0].failure, Some(ErrorKind::Fetch));
    assert_eq!(retried.outcomes[0].artifacts_written, 1);
    assert_eq!(retried.outcomes[1].artifacts_written, 2);

    let report = audit_directory(dir.path(), &ArtifactNaming::default(), letters())
        .expect("Audit failed");
    assert!(report.is_complete());
}

#[tokio::test]
async fn test_explicit_range_overwrites_existing_pages() {
    let mock_server = MockServer::start().await;
    mount_login(&mock_server, 1).await;
    mount_page(&mock_server, 'b', LOGGED_IN_PAGE, 1).await;

    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = DirectoryStore::create(dir.path(), ArtifactNaming::default())
        .expect("Failed to create store");
    store
        .write(Codepoint('b' as u32), b"stale")
        .expect("Failed to seed store");

    let crawler = Crawler::new(
        create_session(&mock_server),
        store,
        create_settings(Some("b")),
    );
    crawler.run().await.expect("Crawl failed");

    assert_eq!(
        crawler.store().read(Codepoint('b' as u32)).unwrap(),
        Some(LOGGED_IN_PAGE.as_bytes().to_vec())
    );
}

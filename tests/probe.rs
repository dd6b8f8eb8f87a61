//! Direct-link prober against a local HTTP server.

mod common;

use std::time::{Duration, Instant};

use common::media_server::{self, MediaServerOptions};
use media_relay_lib::downloader::probe::BROWSER_USER_AGENT;
use media_relay_lib::downloader::{ErrorKind, HttpProber, LinkProber, Strictness};

fn prober(timeout: Duration) -> HttpProber {
    HttpProber::new(timeout, None).expect("client")
}

#[tokio::test]
async fn head_length_is_used_without_get() {
    let (url, counts) = media_server::start(MediaServerOptions {
        head_length: Some(4096),
        get_length: Some(1),
        ..Default::default()
    });

    let result = prober(Duration::from_secs(5))
        .probe_size(&url, Strictness::Lenient)
        .await
        .unwrap();

    assert_eq!(result.size_bytes, 4096);
    assert_eq!(counts.head(), 1);
    assert_eq!(counts.get(), 0);
}

#[tokio::test]
async fn falls_back_to_get_when_head_lacks_length() {
    let (url, counts) = media_server::start(MediaServerOptions {
        head_length: None,
        get_length: Some(1_048_576),
        ..Default::default()
    });

    let result = prober(Duration::from_secs(5))
        .probe_size(&url, Strictness::Lenient)
        .await
        .unwrap();

    assert_eq!(result.size_bytes, 1_048_576);
    assert_eq!(result.title, None);
    assert_eq!(counts.head(), 1);
    assert_eq!(counts.get(), 1);
}

#[tokio::test]
async fn unknown_everywhere_is_zero() {
    let (url, _counts) = media_server::start(MediaServerOptions::default());

    let result = prober(Duration::from_secs(5))
        .probe_size(&url, Strictness::Lenient)
        .await
        .unwrap();

    assert_eq!(result.size_bytes, 0);
}

#[tokio::test]
async fn strict_probe_rejects_unknown_size() {
    let (url, _counts) = media_server::start(MediaServerOptions::default());

    let err = prober(Duration::from_secs(5))
        .probe_size(&url, Strictness::Strict)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProbeFailed);
}

#[tokio::test]
async fn head_timeout_fails_instead_of_hanging() {
    let (url, counts) = media_server::start(MediaServerOptions {
        head_length: Some(10),
        head_delay: Some(Duration::from_secs(3)),
        ..Default::default()
    });

    let started = Instant::now();
    let err = prober(Duration::from_millis(500))
        .probe_size(&url, Strictness::Lenient)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProbeFailed);
    assert!(started.elapsed() < Duration::from_millis(2500));
    assert_eq!(counts.get(), 0);
}

#[tokio::test]
async fn follows_redirects_on_both_stages() {
    let (url, counts) = media_server::start(MediaServerOptions {
        head_length: None,
        get_length: Some(1_048_576),
        redirect: true,
        ..Default::default()
    });
    assert!(url.ends_with("/start"));

    let result = prober(Duration::from_secs(5))
        .probe_size(&url, Strictness::Lenient)
        .await
        .unwrap();

    assert_eq!(result.size_bytes, 1_048_576);
    assert_eq!(counts.redirects(), 2);
    assert_eq!(counts.head(), 1);
    assert_eq!(counts.get(), 1);
}

#[tokio::test]
async fn sends_browser_user_agent() {
    let (url, counts) = media_server::start(MediaServerOptions {
        head_length: None,
        get_length: Some(10),
        ..Default::default()
    });

    prober(Duration::from_secs(5))
        .probe_size(&url, Strictness::Lenient)
        .await
        .unwrap();

    let agents = counts.user_agents();
    assert_eq!(agents.len(), 2);
    assert!(agents.iter().all(|ua| ua == BROWSER_USER_AGENT));
    assert!(BROWSER_USER_AGENT.starts_with("Mozilla/5.0"));
}

#[tokio::test]
async fn dropped_get_connection_fails_the_size_check() {
    let (url, counts) = media_server::start(MediaServerOptions {
        head_length: None,
        get_length: Some(10),
        drop_get: true,
        ..Default::default()
    });

    let err = prober(Duration::from_secs(5))
        .probe_size(&url, Strictness::Lenient)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProbeFailed);
    assert_eq!(counts.head(), 1);
    assert!(counts.get() >= 1);
}

#[tokio::test]
async fn connection_refused_is_probe_failure() {
    let err = prober(Duration::from_secs(2))
        .probe_size(&media_server::closed_port_url(), Strictness::Lenient)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProbeFailed);
}

#[tokio::test]
async fn malformed_url_is_probe_failure() {
    let err = prober(Duration::from_secs(2))
        .probe_size("not a url", Strictness::Lenient)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ProbeFailed);
}

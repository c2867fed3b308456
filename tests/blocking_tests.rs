//! Integration tests driving the blocking client against wiremock.

use scholar_client::blocking::Client;
use scholar_client::{ClientConfig, ClientConfigBuilder, Error};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// The mock server needs an async runtime of its own; the blocking client
/// under test brings its private one. The server must drop before the
/// returned runtime does.
fn start_server() -> (tokio::runtime::Runtime, MockServer) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap();
    let server = runtime.block_on(MockServer::start());
    (runtime, server)
}

fn client_config(server: &MockServer) -> ClientConfigBuilder {
    ClientConfig::builder()
        .api_key("test-key")
        .base_url(server.uri())
        .backoff_base(Duration::from_millis(10))
}

fn health_body() -> serde_json::Value {
    json!({
        "status": "healthy",
        "version": "0.1.0",
        "uptime_seconds": 120,
        "components": {}
    })
}

fn enveloped_stats() -> serde_json::Value {
    json!({
        "data": {
            "total_entries": 4,
            "expired_entries": 0,
            "total_size_bytes": 512,
            "hit_rate": 0.5,
            "hits": 2,
            "misses": 2,
            "average_age_seconds": 30.0,
            "by_research_type": {}
        },
        "request_id": "req-blocking-1",
        "timestamp": "2024-01-15T10:30:00Z",
        "success": true
    })
}

#[test]
fn test_blocking_health() {
    let (runtime, server) = start_server();

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(health_body()))
            .mount(&server),
    );

    let client = Client::new(client_config(&server).build().unwrap()).unwrap();
    let health = client.health().unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(health.uptime_seconds, 120);
}

#[test]
fn test_blocking_retries_transient_failures() {
    let (runtime, server) = start_server();
    let attempt_count = Arc::new(AtomicUsize::new(0));
    let attempt_count_clone = attempt_count.clone();

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(move |_req: &wiremock::Request| {
                let count = attempt_count_clone.fetch_add(1, Ordering::SeqCst);
                if count == 0 {
                    ResponseTemplate::new(503).set_body_string("overloaded")
                } else {
                    ResponseTemplate::new(200).set_body_json(health_body())
                }
            })
            .mount(&server),
    );

    let client = Client::new(client_config(&server).build().unwrap()).unwrap();
    let health = client.health().unwrap();

    assert_eq!(health.status, "healthy");
    assert_eq!(attempt_count.load(Ordering::SeqCst), 2);
}

#[test]
fn test_blocking_exhausted_retries() {
    let (runtime, server) = start_server();

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503).set_body_json(json!({
                "message": "overloaded"
            })))
            .mount(&server),
    );

    let config = client_config(&server).max_retries(1).build().unwrap();
    let client = Client::new(config).unwrap();

    match client.health() {
        Err(Error::ExhaustedRetries { attempts, source }) => {
            assert_eq!(attempts, 2);
            assert!(matches!(*source, Error::Api { .. }));
        }
        other => panic!("Expected ExhaustedRetries, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_blocking_cache_serves_repeats() {
    let (runtime, server) = start_server();
    let hit_count = Arc::new(AtomicUsize::new(0));
    let hit_count_clone = hit_count.clone();

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/api/v1/cache/stats"))
            .respond_with(move |_req: &wiremock::Request| {
                hit_count_clone.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(200).set_body_json(enveloped_stats())
            })
            .mount(&server),
    );

    let config = client_config(&server).cache_enabled(true).build().unwrap();
    let client = Client::new(config).unwrap();

    let first = client.cache_stats().unwrap();
    let second = client.cache_stats().unwrap();

    assert_eq!(first.total_entries, 4);
    assert_eq!(second.total_entries, 4);
    assert_eq!(hit_count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_blocking_clones_are_usable_across_threads() {
    let (runtime, server) = start_server();
    let hit_count = Arc::new(AtomicUsize::new(0));
    let hit_count_clone = hit_count.clone();

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(move |_req: &wiremock::Request| {
                hit_count_clone.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(200).set_body_json(health_body())
            })
            .mount(&server),
    );

    let client = Client::new(client_config(&server).build().unwrap()).unwrap();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let client = client.clone();
            std::thread::spawn(move || client.health().unwrap())
        })
        .collect();
    for handle in handles {
        let health = handle.join().unwrap();
        assert_eq!(health.status, "healthy");
    }

    assert_eq!(hit_count.load(Ordering::SeqCst), 2);
}

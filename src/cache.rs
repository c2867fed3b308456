//! Response cache keyed by request fingerprint, with TTL-based expiry.
//!
//! Expiry is lazy: a lookup older than the TTL reports a miss but the entry
//! stays in the map, so storage grows for the life of the client. Lookups
//! and stores are serialized by an internal lock; two callers that miss the
//! same key both fetch and both store, and the last write wins.

use http::Method;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use url::Url;

/// Fingerprint of a cacheable request: method, resolved URL, and the query
/// parameters sorted into a canonical order so equivalent parameter sets
/// produce the same key. The body is not part of the fingerprint; cacheable
/// requests are GETs and carry none.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    method: Method,
    url: String,
    query: Vec<(String, String)>,
}

impl CacheKey {
    /// Builds a fingerprint from the endpoint URL (without its query string)
    /// and the query pairs as the request carries them.
    pub(crate) fn new(method: &Method, url: &Url, query: &[(String, String)]) -> Self {
        let mut query = query.to_vec();
        query.sort();
        Self {
            method: method.clone(),
            url: url.as_str().to_string(),
            query,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    body: String,
    stored_at: Instant,
}

/// TTL-bounded store of raw response bodies.
#[derive(Debug)]
pub(crate) struct ResponseCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the stored body if the entry is younger than the TTL.
    ///
    /// An expired entry is treated as absent without being removed. A
    /// poisoned lock degrades to a miss.
    pub(crate) fn get(&self, key: &CacheKey) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() < self.ttl {
            Some(entry.body.clone())
        } else {
            None
        }
    }

    /// Stores a body under the key, stamped now. Replaces any prior entry.
    pub(crate) fn put(&self, key: CacheKey, body: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key,
                CacheEntry {
                    body,
                    stored_at: Instant::now(),
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(method: Method, url: &str, query: &[(&str, &str)]) -> CacheKey {
        let url = Url::parse(url).unwrap();
        let query: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        CacheKey::new(&method, &url, &query)
    }

    #[test]
    fn test_live_entry_is_served() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let k = key(Method::GET, "http://localhost:8080/health", &[]);

        cache.put(k.clone(), r#"{"status":"ok"}"#.to_string());
        assert_eq!(cache.get(&k), Some(r#"{"status":"ok"}"#.to_string()));
    }

    #[test]
    fn test_expired_entry_reports_miss_but_stays_stored() {
        let cache = ResponseCache::new(Duration::ZERO);
        let k = key(Method::GET, "http://localhost:8080/health", &[]);

        cache.put(k.clone(), "{}".to_string());
        assert_eq!(cache.get(&k), None);
        assert_eq!(cache.entries.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_entry_expires_after_ttl_elapses() {
        let cache = ResponseCache::new(Duration::from_millis(20));
        let k = key(Method::GET, "http://localhost:8080/api/v1/cache/stats", &[]);

        cache.put(k.clone(), "{}".to_string());
        assert!(cache.get(&k).is_some());

        std::thread::sleep(Duration::from_millis(40));
        assert_eq!(cache.get(&k), None);
    }

    #[test]
    fn test_store_replaces_prior_entry() {
        let cache = ResponseCache::new(Duration::from_secs(60));
        let k = key(Method::GET, "http://localhost:8080/health", &[]);

        cache.put(k.clone(), "first".to_string());
        cache.put(k.clone(), "second".to_string());
        assert_eq!(cache.get(&k), Some("second".to_string()));
        assert_eq!(cache.entries.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_query_order_does_not_change_the_fingerprint() {
        let a = key(
            Method::GET,
            "http://localhost:8080/api/v1/research",
            &[("limit", "20"), ("offset", "0")],
        );
        let b = key(
            Method::GET,
            "http://localhost:8080/api/v1/research",
            &[("offset", "0"), ("limit", "20")],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_differing_parameters_produce_distinct_fingerprints() {
        let a = key(
            Method::GET,
            "http://localhost:8080/api/v1/research",
            &[("limit", "20")],
        );
        let b = key(
            Method::GET,
            "http://localhost:8080/api/v1/research",
            &[("limit", "50")],
        );
        assert_ne!(a, b);
    }

    #[test]
    fn test_method_and_url_are_part_of_the_fingerprint() {
        let get = key(Method::GET, "http://localhost:8080/api/v1/research", &[]);
        let post = key(Method::POST, "http://localhost:8080/api/v1/research", &[]);
        let other = key(Method::GET, "http://localhost:8080/api/v1/classify", &[]);

        assert_ne!(get, post);
        assert_ne!(get, other);
    }
}

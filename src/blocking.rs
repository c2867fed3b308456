//! Blocking client for callers without an async runtime.
//!
//! [`blocking::Client`](Client) wraps the asynchronous [`crate::Client`]
//! together with a small private tokio runtime and drives each call to
//! completion with `block_on`. Configuration, retry behavior, caching, and
//! error types are identical to the async client.
//!
//! # Panics
//!
//! Methods on this client must not be called from inside an async runtime;
//! doing so panics. Use [`crate::Client`] directly in async code.

use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::types::{
    CacheItem, CacheSearch, CacheSearchParams, CacheStats, Classification, ClassificationList,
    ClassificationListParams, ClassificationTypes, ClassifyRequest, HealthStatus, ListParams,
    ResearchList, ResearchRequest, ResearchResult,
};
use crate::{ApiRequest, ClientConfig, Error, Result};

/// A blocking client for the Scholar research and classification API.
///
/// Clones share the underlying runtime and connection pool, so a clone is
/// cheap and clones may be used from multiple threads at once.
///
/// # Examples
///
/// ```no_run
/// use scholar_client::blocking::Client;
/// use scholar_client::ClientConfig;
///
/// # fn example() -> Result<(), scholar_client::Error> {
/// let config = ClientConfig::builder()
///     .api_key("my-api-key")
///     .base_url("https://scholar.example.com")
///     .build()?;
/// let client = Client::new(config)?;
///
/// let health = client.health()?;
/// println!("service is {}", health.status);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: crate::Client,
    runtime: Arc<Runtime>,
}

impl Client {
    /// Creates a blocking client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the async client or its private
    /// runtime cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("scholar-client-blocking")
            .enable_all()
            .build()
            .map_err(|e| Error::Configuration(format!("failed to start runtime: {}", e)))?;

        Ok(Self {
            inner: crate::Client::new(config)?,
            runtime: Arc::new(runtime),
        })
    }

    /// Creates a blocking client configured entirely from `SCHOLAR_*`
    /// environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        self.inner.config()
    }

    /// Blocking version of [`Client::execute`](crate::Client::execute).
    pub fn execute<Res>(&self, request: &ApiRequest) -> Result<Res>
    where
        Res: serde::de::DeserializeOwned,
    {
        self.runtime.block_on(self.inner.execute(request))
    }

    /// Blocking version of [`Client::health`](crate::Client::health).
    pub fn health(&self) -> Result<HealthStatus> {
        self.runtime.block_on(self.inner.health())
    }

    /// Blocking version of
    /// [`Client::protected_health`](crate::Client::protected_health).
    pub fn protected_health(&self) -> Result<HealthStatus> {
        self.runtime.block_on(self.inner.protected_health())
    }

    /// Blocking version of
    /// [`Client::submit_research`](crate::Client::submit_research).
    pub fn submit_research(&self, request: &ResearchRequest) -> Result<ResearchResult> {
        self.runtime.block_on(self.inner.submit_research(request))
    }

    /// Blocking version of
    /// [`Client::research_result`](crate::Client::research_result).
    pub fn research_result(&self, id: &str) -> Result<ResearchResult> {
        self.runtime.block_on(self.inner.research_result(id))
    }

    /// Blocking version of
    /// [`Client::list_research`](crate::Client::list_research).
    pub fn list_research(&self, params: &ListParams) -> Result<ResearchList> {
        self.runtime.block_on(self.inner.list_research(params))
    }

    /// Blocking version of [`Client::classify`](crate::Client::classify).
    pub fn classify(&self, request: &ClassifyRequest) -> Result<Classification> {
        self.runtime.block_on(self.inner.classify(request))
    }

    /// Blocking version of
    /// [`Client::classification_result`](crate::Client::classification_result).
    pub fn classification_result(&self, id: &str) -> Result<Classification> {
        self.runtime.block_on(self.inner.classification_result(id))
    }

    /// Blocking version of
    /// [`Client::list_classifications`](crate::Client::list_classifications).
    pub fn list_classifications(
        &self,
        params: &ClassificationListParams,
    ) -> Result<ClassificationList> {
        self.runtime.block_on(self.inner.list_classifications(params))
    }

    /// Blocking version of
    /// [`Client::classification_types`](crate::Client::classification_types).
    pub fn classification_types(&self) -> Result<ClassificationTypes> {
        self.runtime.block_on(self.inner.classification_types())
    }

    /// Blocking version of
    /// [`Client::cache_stats`](crate::Client::cache_stats).
    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.runtime.block_on(self.inner.cache_stats())
    }

    /// Blocking version of
    /// [`Client::search_cache`](crate::Client::search_cache).
    pub fn search_cache(&self, params: &CacheSearchParams) -> Result<CacheSearch> {
        self.runtime.block_on(self.inner.search_cache(params))
    }

    /// Blocking version of
    /// [`Client::cache_entry`](crate::Client::cache_entry).
    pub fn cache_entry(&self, id: &str) -> Result<CacheItem> {
        self.runtime.block_on(self.inner.cache_entry(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_and_clones_cheaply() {
        let config = ClientConfig::builder()
            .api_key("test-key")
            .base_url("https://scholar.test")
            .build()
            .unwrap();
        let client = Client::new(config).unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.runtime, &clone.runtime));
    }
}

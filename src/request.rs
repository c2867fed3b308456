//! Request values handed to the execution engine.

use crate::{Error, Result};
use http::Method;
use serde::Serialize;

/// One API request: method, path, query parameters, optional JSON body, and
/// whether the engine may serve it from cache.
///
/// Immutable once built. GET requests are cacheable by default and can opt
/// out per call with [`ApiRequest::no_store`]; POST requests are never
/// cacheable and cannot be made so.
///
/// The typed operations on [`Client`](crate::Client) build these internally.
/// Construct one yourself to reach an endpoint generically or to disable
/// caching for a single call:
///
/// ```no_run
/// use scholar_client::{ApiRequest, Client, ClientConfig, HealthStatus};
///
/// # async fn example() -> Result<(), scholar_client::Error> {
/// # let client = Client::new(ClientConfig::builder().api_key("key").build()?)?;
/// let request = ApiRequest::get("/health").no_store();
/// let health: HealthStatus = client.execute(&request).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<serde_json::Value>,
    pub(crate) cacheable: bool,
}

impl ApiRequest {
    /// A GET request for the given path, cacheable by default.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            query: Vec::new(),
            body: None,
            cacheable: true,
        }
    }

    /// A POST request with a JSON body. Never cacheable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the body cannot be converted to
    /// JSON.
    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self> {
        let body = serde_json::to_value(body).map_err(|e| Error::Serialization(e.to_string()))?;
        Ok(Self {
            method: Method::POST,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            cacheable: false,
        })
    }

    /// Appends a query parameter. Parameters are sent in insertion order;
    /// the cache fingerprint is order-insensitive.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Disables caching for this request only. The call will hit the
    /// transport even when a live cached response exists, and its response
    /// will not be stored.
    pub fn no_store(mut self) -> Self {
        self.cacheable = false;
        self
    }
}

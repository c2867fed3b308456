//! Asynchronous client for the Scholar API.
//!
//! The [`Client`] type is the main entry point. It owns the connection pool,
//! the retry policy, and the optional response cache, and exposes one method
//! per API operation.

use crate::{
    cache::{CacheKey, ResponseCache},
    config::ClientConfig,
    request::ApiRequest,
    retry::{RetryPolicy, RetryState},
    types::{
        CacheItem, CacheSearch, CacheSearchParams, CacheStats, Classification,
        ClassificationList, ClassificationListParams, ClassificationTypes, ClassifyRequest,
        Envelope, HealthStatus, ListParams, ResearchList, ResearchRequest, ResearchResult,
    },
    Error, Result,
};
use http::header::{self, HeaderMap, HeaderValue};
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

const USER_AGENT: &str = concat!("scholar-client/", env!("CARGO_PKG_VERSION"));

/// An asynchronous client for the Scholar research and classification API.
///
/// The client is designed to be created once and reused: it maintains a
/// connection pool, and cloning it is cheap (clones share the pool and the
/// response cache). Transient failures are retried with exponential backoff,
/// and GET responses can be served from an in-memory TTL cache when
/// [`cache_enabled`](crate::ClientConfigBuilder::cache_enabled) is set.
///
/// # Examples
///
/// ```no_run
/// use scholar_client::{Client, ClientConfig, ResearchRequest};
///
/// # async fn example() -> Result<(), scholar_client::Error> {
/// let config = ClientConfig::builder()
///     .api_key("my-api-key")
///     .base_url("https://scholar.example.com")
///     .build()?;
/// let client = Client::new(config)?;
///
/// let result = client
///     .submit_research(&ResearchRequest::new("How does tokio schedule tasks?"))
///     .await?;
/// println!("{}: {}", result.id, result.immediate_answer);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    cache: Option<ResponseCache>,
    policy: RetryPolicy,
}

impl Client {
    /// Creates a client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the API key cannot be carried in
    /// a header or the underlying HTTP client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut api_key = HeaderValue::try_from(config.api_key.as_str()).map_err(|e| {
            Error::Configuration(format!("API key is not a valid header value: {}", e))
        })?;
        api_key.set_sensitive(true);
        headers.insert("x-api-key", api_key);
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {}", e)))?;

        let cache = config
            .cache_enabled()
            .then(|| ResponseCache::new(config.cache_ttl()));
        let policy = RetryPolicy::new(config.max_retries(), config.backoff_base());

        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                config,
                cache,
                policy,
            }),
        })
    }

    /// Creates a client configured entirely from `SCHOLAR_*` environment
    /// variables.
    ///
    /// Equivalent to `Client::new(ClientConfig::from_env()?)`; see
    /// [`ClientConfig::from_env`] for the variables consulted.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// Executes a request and decodes the response body into `Res`.
    ///
    /// This is the engine behind every operation method: it consults the
    /// response cache for cacheable GETs, retries transient failures with
    /// exponential backoff, and stores successfully decoded GET responses
    /// back into the cache. Operation methods are usually more convenient,
    /// but `execute` is available for endpoints this crate does not model.
    ///
    /// ```no_run
    /// use scholar_client::{ApiRequest, Client};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Flags {
    ///     experimental_search: bool,
    /// }
    ///
    /// # async fn example(client: Client) -> Result<(), scholar_client::Error> {
    /// let request = ApiRequest::get("/api/v1/flags").no_store();
    /// let flags: Flags = client.execute(&request).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute<Res>(&self, request: &ApiRequest) -> Result<Res>
    where
        Res: DeserializeOwned,
    {
        let url = self.endpoint_url(&request.path);

        let cache_key = match &self.inner.cache {
            Some(_) if request.cacheable && request.method == Method::GET => {
                Some(CacheKey::new(&request.method, &url, &request.query))
            }
            _ => None,
        };

        if let (Some(cache), Some(key)) = (&self.inner.cache, &cache_key) {
            if let Some(body) = cache.get(key) {
                tracing::debug!(path = %request.path, "serving response from cache");
                return decode_body(StatusCode::OK, &body);
            }
        }

        let (status, body) = self.fetch_with_retries(request, &url).await?;
        let value = decode_body(status, &body)?;

        // Only responses that decoded cleanly are worth replaying later.
        if let (Some(cache), Some(key)) = (&self.inner.cache, cache_key) {
            cache.put(key, body);
            tracing::debug!(path = %request.path, "stored response in cache");
        }

        Ok(value)
    }

    /// Runs the attempt loop for one request, returning the first successful
    /// status and body.
    async fn fetch_with_retries(
        &self,
        request: &ApiRequest,
        url: &Url,
    ) -> Result<(StatusCode, String)> {
        let start = Instant::now();
        let mut state = RetryState::new(self.inner.policy);

        loop {
            let error = match self.dispatch(request, url).await {
                Ok((status, body)) => {
                    if status.is_success() {
                        tracing::info!(
                            method = %request.method,
                            path = %request.path,
                            status = status.as_u16(),
                            latency_ms = start.elapsed().as_millis() as u64,
                            attempts = state.attempts_made(),
                            "request succeeded"
                        );
                        return Ok((status, body));
                    }
                    Error::from_error_response(status, &body)
                }
                Err(error) => error,
            };

            if !error.is_transient() {
                tracing::error!(
                    method = %request.method,
                    path = %request.path,
                    error = %error,
                    "request failed"
                );
                return Err(error);
            }

            let attempts = state.attempts_made();
            match state.next_delay() {
                Some(delay) => {
                    tracing::warn!(
                        method = %request.method,
                        path = %request.path,
                        error = %error,
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                None => {
                    tracing::error!(
                        method = %request.method,
                        path = %request.path,
                        error = %error,
                        attempts = attempts,
                        "retries exhausted"
                    );
                    return Err(Error::ExhaustedRetries {
                        attempts,
                        source: Box::new(error),
                    });
                }
            }
        }
    }

    /// Sends one HTTP request and reads the body. Transport failures
    /// anywhere in the exchange surface as [`Error::Transport`].
    async fn dispatch(&self, request: &ApiRequest, url: &Url) -> Result<(StatusCode, String)> {
        let mut url = url.clone();
        for (key, value) in &request.query {
            url.query_pairs_mut().append_pair(key, value);
        }

        tracing::debug!(method = %request.method, url = %url, "dispatching request");

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), url)
            .timeout(self.inner.config.timeout());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        Ok((status, body))
    }

    fn endpoint_url(&self, path: &str) -> Url {
        let mut url = self.inner.config.base_url().clone();
        url.set_path(path);
        url
    }

    /// Executes a request whose payload arrives wrapped in the standard
    /// [`Envelope`], returning the inner data.
    async fn execute_enveloped<Res>(&self, request: &ApiRequest) -> Result<Res>
    where
        Res: DeserializeOwned,
    {
        Ok(self.execute::<Envelope<Res>>(request).await?.data)
    }

    // -----------------------------------------------------------------------
    // Health

    /// Checks service health. The server does not require authentication on
    /// this endpoint.
    pub async fn health(&self) -> Result<HealthStatus> {
        self.execute(&ApiRequest::get("/health")).await
    }

    /// Checks service health through the authenticated endpoint, verifying
    /// the API key in passing.
    pub async fn protected_health(&self) -> Result<HealthStatus> {
        self.execute(&ApiRequest::get("/api/v1/health/protected"))
            .await
    }

    // -----------------------------------------------------------------------
    // Research

    /// Submits a research query and waits for the completed result.
    pub async fn submit_research(&self, request: &ResearchRequest) -> Result<ResearchResult> {
        self.execute_enveloped(&ApiRequest::post("/api/v1/research", request)?)
            .await
    }

    /// Fetches a previously completed research result by id.
    pub async fn research_result(&self, id: &str) -> Result<ResearchResult> {
        self.execute_enveloped(&ApiRequest::get(format!("/api/v1/research/{}", id)))
            .await
    }

    /// Lists stored research results.
    ///
    /// ```no_run
    /// use scholar_client::{Client, ListParams};
    ///
    /// # async fn example(client: Client) -> Result<(), scholar_client::Error> {
    /// let page = client
    ///     .list_research(&ListParams {
    ///         query: Some("async".to_string()),
    ///         ..Default::default()
    ///     })
    ///     .await?;
    /// println!("{} of {} results", page.results.len(), page.total_count);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list_research(&self, params: &ListParams) -> Result<ResearchList> {
        self.execute_enveloped(&params.apply(ApiRequest::get("/api/v1/research")))
            .await
    }

    // -----------------------------------------------------------------------
    // Classification

    /// Classifies a piece of content and returns the classification outcome.
    pub async fn classify(&self, request: &ClassifyRequest) -> Result<Classification> {
        self.execute_enveloped(&ApiRequest::post("/api/v1/classify", request)?)
            .await
    }

    /// Fetches a previously computed classification by id.
    pub async fn classification_result(&self, id: &str) -> Result<Classification> {
        self.execute_enveloped(&ApiRequest::get(format!("/api/v1/classify/{}", id)))
            .await
    }

    /// Lists stored classification results.
    pub async fn list_classifications(
        &self,
        params: &ClassificationListParams,
    ) -> Result<ClassificationList> {
        self.execute_enveloped(&params.apply(ApiRequest::get("/api/v1/classify")))
            .await
    }

    /// Describes the research types and context dimensions the classifier
    /// understands.
    pub async fn classification_types(&self) -> Result<ClassificationTypes> {
        self.execute_enveloped(&ApiRequest::get("/api/v1/classify/types"))
            .await
    }

    // -----------------------------------------------------------------------
    // Server-side cache

    /// Reports statistics for the service's own result cache.
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        self.execute_enveloped(&ApiRequest::get("/api/v1/cache/stats"))
            .await
    }

    /// Searches the service's result cache.
    pub async fn search_cache(&self, params: &CacheSearchParams) -> Result<CacheSearch> {
        self.execute_enveloped(&params.apply(ApiRequest::get("/api/v1/cache/search")))
            .await
    }

    /// Fetches a single entry from the service's result cache by key.
    pub async fn cache_entry(&self, id: &str) -> Result<CacheItem> {
        self.execute_enveloped(&ApiRequest::get(format!("/api/v1/cache/{}", id)))
            .await
    }
}

/// Decodes a response body, mapping JSON failures to
/// [`Error::MalformedResponse`].
fn decode_body<Res>(status: StatusCode, body: &str) -> Result<Res>
where
    Res: DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        tracing::error!(
            status = status.as_u16(),
            error = %e,
            "failed to decode response body"
        );
        Error::MalformedResponse {
            status,
            raw_body: body.to_string(),
            decode_error: e.to_string(),
        }
    })
}

//! Client configuration with single-shot environment resolution.
//!
//! Every setting resolves once, at [`ClientConfigBuilder::build`], from the
//! explicit value if one was given, else the matching `SCHOLAR_*` environment
//! variable, else the default. The resulting [`ClientConfig`] is immutable
//! and the environment is never re-read.
//!
//! | Setting | Environment variable | Default |
//! |---|---|---|
//! | API key | `SCHOLAR_API_KEY` | required |
//! | base URL | `SCHOLAR_BASE_URL` | `http://localhost:8080` |
//! | timeout (seconds) | `SCHOLAR_TIMEOUT` | 30 |
//! | max retries | `SCHOLAR_MAX_RETRIES` | 3 |
//! | cache enabled | `SCHOLAR_CACHE_ENABLED` | off |
//! | cache TTL (seconds) | `SCHOLAR_CACHE_TTL` | 300 |

use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_MAX_RETRIES: usize = 3;
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(1);

/// Resolved, immutable client configuration.
///
/// Build one with [`ClientConfig::builder`], or [`ClientConfig::from_env`]
/// to resolve everything from the environment.
///
/// ```
/// use scholar_client::ClientConfig;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), scholar_client::Error> {
/// let config = ClientConfig::builder()
///     .api_key("secret")
///     .base_url("http://localhost:8080")
///     .timeout(Duration::from_secs(10))
///     .cache_enabled(true)
///     .build()?;
///
/// assert!(config.cache_enabled());
/// assert_eq!(config.timeout(), Duration::from_secs(10));
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ClientConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: Url,
    pub(crate) timeout: Duration,
    pub(crate) max_retries: usize,
    pub(crate) cache_enabled: bool,
    pub(crate) cache_ttl: Duration,
    pub(crate) backoff_base: Duration,
}

impl ClientConfig {
    /// Creates a builder with nothing set; unset fields resolve from the
    /// environment, then defaults.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Resolves every setting from the environment and defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when `SCHOLAR_API_KEY` is unset or a
    /// `SCHOLAR_*` value is malformed.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    /// The base address requests resolve against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Maximum retries per call; total transport attempts are one more.
    pub fn max_retries(&self) -> usize {
        self.max_retries
    }

    /// Whether GET responses are cached.
    pub fn cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// How long a cached response stays servable.
    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// The backoff time unit: retry `n` waits `backoff_base * 2^n`.
    pub fn backoff_base(&self) -> Duration {
        self.backoff_base
    }
}

// The API key never appears in logs or debug output.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("cache_enabled", &self.cache_enabled)
            .field("cache_ttl", &self.cache_ttl)
            .field("backoff_base", &self.backoff_base)
            .finish()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    max_retries: Option<usize>,
    cache_enabled: Option<bool>,
    cache_ttl: Option<Duration>,
    backoff_base: Option<Duration>,
}

impl ClientConfigBuilder {
    /// Sets the API key, overriding `SCHOLAR_API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the base address, overriding `SCHOLAR_BASE_URL`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the per-request timeout, overriding `SCHOLAR_TIMEOUT`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the retry limit, overriding `SCHOLAR_MAX_RETRIES`.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    /// Enables or disables response caching, overriding
    /// `SCHOLAR_CACHE_ENABLED`.
    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = Some(enabled);
        self
    }

    /// Sets the cache TTL, overriding `SCHOLAR_CACHE_TTL`.
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Sets the backoff time unit. Retry `n` (0-indexed) waits
    /// `backoff_base * 2^n`; the default unit is one second.
    pub fn backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = Some(base);
        self
    }

    /// Resolves the configuration: explicit values win, then `SCHOLAR_*`
    /// environment variables, then defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when no API key is available or an
    /// environment value does not parse, and [`Error::InvalidUrl`] when the
    /// base address is not a valid URL.
    pub fn build(self) -> Result<ClientConfig> {
        self.build_with(|name| match std::env::var(name) {
            Ok(value) if !value.trim().is_empty() => Some(value),
            _ => None,
        })
    }

    fn build_with<F>(self, env: F) -> Result<ClientConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = self
            .api_key
            .or_else(|| env("SCHOLAR_API_KEY"))
            .ok_or_else(|| {
                Error::Configuration(
                    "API key is required: pass one explicitly or set SCHOLAR_API_KEY".to_string(),
                )
            })?;
        if api_key.trim().is_empty() {
            return Err(Error::Configuration("API key must not be empty".to_string()));
        }

        let base_url = self
            .base_url
            .or_else(|| env("SCHOLAR_BASE_URL"))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base_url)?;

        let timeout = match self.timeout {
            Some(timeout) => timeout,
            None => match env("SCHOLAR_TIMEOUT") {
                Some(raw) => Duration::from_secs(parse_setting("SCHOLAR_TIMEOUT", &raw)?),
                None => DEFAULT_TIMEOUT,
            },
        };

        let max_retries = match self.max_retries {
            Some(max_retries) => max_retries,
            None => match env("SCHOLAR_MAX_RETRIES") {
                Some(raw) => parse_setting("SCHOLAR_MAX_RETRIES", &raw)?,
                None => DEFAULT_MAX_RETRIES,
            },
        };

        let cache_enabled = match self.cache_enabled {
            Some(enabled) => enabled,
            None => match env("SCHOLAR_CACHE_ENABLED") {
                Some(raw) => parse_flag("SCHOLAR_CACHE_ENABLED", &raw)?,
                None => false,
            },
        };

        let cache_ttl = match self.cache_ttl {
            Some(ttl) => ttl,
            None => match env("SCHOLAR_CACHE_TTL") {
                Some(raw) => Duration::from_secs(parse_setting("SCHOLAR_CACHE_TTL", &raw)?),
                None => DEFAULT_CACHE_TTL,
            },
        };

        Ok(ClientConfig {
            api_key,
            base_url,
            timeout,
            max_retries,
            cache_enabled,
            cache_ttl,
            backoff_base: self.backoff_base.unwrap_or(DEFAULT_BACKOFF_BASE),
        })
    }
}

fn parse_setting<T>(name: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.trim().parse().map_err(|e| {
        Error::Configuration(format!("Invalid {} value {:?}: {}", name, raw, e))
    })
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Configuration(format!(
            "Invalid {} value {:?}: expected a boolean",
            name, raw
        ))),
    }
}

//! Error types for Scholar API calls.
//!
//! Every failure a call can produce is a variant of [`Error`]. Server errors
//! are decoded from the service's structured error body so callers get the
//! message, machine error code, and request id without touching raw JSON;
//! transport failures and undecodable payloads keep their underlying detail.

use http::StatusCode;
use serde::Deserialize;

/// The error type for Scholar API calls.
///
/// The variants follow how a call fails rather than where: transport
/// problems, classified server responses, undecodable payloads, exhausted
/// retries, and configuration mistakes are all distinct.
///
/// # Examples
///
/// ```no_run
/// use scholar_client::{Client, ClientConfig, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new(ClientConfig::builder().api_key("key").build()?)?;
///
/// match client.research_result("missing-id").await {
///     Ok(result) => println!("Answer: {}", result.immediate_answer),
///     Err(Error::Api { status, message, error_code, .. }) => {
///         eprintln!("Server said no ({status}): {message} [{error_code:?}]");
///     }
///     Err(Error::ExhaustedRetries { attempts, source }) => {
///         eprintln!("Gave up after {attempts} attempts: {source}");
///     }
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A transport-level failure: connection refused, DNS lookup failure,
    /// timeout, or an interrupted body read.
    ///
    /// These are retried up to the configured retry limit before surfacing
    /// inside [`Error::ExhaustedRetries`].
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    ///
    /// The fields come from the service's structured error body
    /// (`{message, error_code?, request_id?, details?}`). When the body is
    /// not decodable JSON, `message` embeds the raw status and body text and
    /// the optional fields are absent.
    #[error("API error {status}: {message}")]
    Api {
        /// The HTTP status code.
        status: StatusCode,
        /// Human-readable description from the error body.
        message: String,
        /// Machine-readable error code, e.g. `NOT_FOUND` or `VALIDATION_ERROR`.
        error_code: Option<String>,
        /// Server-assigned request identifier for tracing.
        request_id: Option<String>,
        /// Additional context from the error body.
        details: Option<String>,
    },

    /// A success response whose body could not be decoded into the expected
    /// payload type.
    ///
    /// The raw body is preserved for debugging. Never retried.
    #[error("Failed to decode response (status {status}): {decode_error}")]
    MalformedResponse {
        /// The HTTP status code of the response.
        status: StatusCode,
        /// The raw response body that failed to decode.
        raw_body: String,
        /// The deserializer's error message.
        decode_error: String,
    },

    /// The request body could not be serialized to JSON.
    #[error("Failed to serialize request body: {0}")]
    Serialization(String),

    /// Invalid client configuration: a missing credential, a malformed
    /// environment value, or a header-unsafe setting.
    ///
    /// Raised at construction time, before any network activity.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// All retry attempts were used without a successful response.
    ///
    /// `attempts` counts transport attempts, so it is always
    /// `max_retries + 1`. `source` is the final classified failure: a
    /// [`Error::Transport`] or a transient [`Error::Api`].
    #[error("Retries exhausted after {attempts} attempts: {source}")]
    ExhaustedRetries {
        /// Total transport attempts made.
        attempts: usize,
        /// The last failure observed before giving up.
        source: Box<Error>,
    },

    /// The base address could not be parsed as a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Structured error body the service attaches to non-2xx responses.
///
/// Extra fields (timestamps, paths) are ignored.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error_code: Option<String>,
    request_id: Option<String>,
    details: Option<String>,
}

impl Error {
    /// Classifies a non-2xx response into an [`Error::Api`].
    ///
    /// Decodes the structured error body when possible; otherwise the
    /// message carries the raw status and body text.
    pub(crate) fn from_error_response(status: StatusCode, body: &str) -> Error {
        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => Error::Api {
                status,
                message: parsed
                    .message
                    .unwrap_or_else(|| "Unknown error".to_string()),
                error_code: parsed.error_code,
                request_id: parsed.request_id,
                details: parsed.details,
            },
            Err(_) => Error::Api {
                status,
                message: format!("HTTP {}: {}", status.as_u16(), body),
                error_code: None,
                request_id: None,
                details: None,
            },
        }
    }

    /// Returns `true` if this failure is worth retrying.
    ///
    /// Transport failures and the transient statuses 429, 500, 502, 503, and
    /// 504 qualify. Everything else, including other 4xx/5xx statuses and
    /// decode failures, is terminal.
    ///
    /// # Examples
    ///
    /// ```
    /// use http::StatusCode;
    /// use scholar_client::Error;
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::SERVICE_UNAVAILABLE,
    ///     message: "try later".to_string(),
    ///     error_code: None,
    ///     request_id: None,
    ///     details: None,
    /// };
    /// assert!(err.is_transient());
    ///
    /// let err = Error::Api {
    ///     status: StatusCode::NOT_FOUND,
    ///     message: "no such result".to_string(),
    ///     error_code: Some("NOT_FOUND".to_string()),
    ///     request_id: None,
    ///     details: None,
    /// };
    /// assert!(!err.is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Api { status, .. } => crate::retry::is_transient_status(*status),
            _ => false,
        }
    }

    /// Returns the HTTP status code if this error carries one.
    ///
    /// [`Error::ExhaustedRetries`] reports the status of its final failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::MalformedResponse { status, .. } => Some(*status),
            Error::ExhaustedRetries { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Returns the machine error code from the server's error body, if any.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Error::Api { error_code, .. } => error_code.as_deref(),
            Error::ExhaustedRetries { source, .. } => source.error_code(),
            _ => None,
        }
    }

    /// Returns the server-assigned request id, if any.
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Error::Api { request_id, .. } => request_id.as_deref(),
            Error::ExhaustedRetries { source, .. } => source.request_id(),
            _ => None,
        }
    }

    /// Returns the raw response body for decode failures.
    pub fn raw_body(&self) -> Option<&str> {
        match self {
            Error::MalformedResponse { raw_body, .. } => Some(raw_body),
            Error::ExhaustedRetries { source, .. } => source.raw_body(),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Scholar API calls.
pub type Result<T> = std::result::Result<T, Error>;

//! # Scholar Client - a typed client for the Scholar research API
//!
//! `scholar-client` is a type-safe, retry-aware client for the Scholar
//! research and classification service, built on top of `reqwest`. It handles
//! API-key authentication, retries transient failures with exponential
//! backoff, and can serve repeated GET requests from an in-memory TTL cache.
//!
//! ## Quick Start
//!
//! ```no_run
//! use scholar_client::{Client, ClientConfig, ResearchRequest};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), scholar_client::Error> {
//!     // Reads SCHOLAR_API_KEY and friends from the environment
//!     let client = Client::from_env()?;
//!
//!     // Or configure explicitly
//!     let config = ClientConfig::builder()
//!         .api_key("my-api-key")
//!         .base_url("https://scholar.example.com")
//!         .timeout(Duration::from_secs(10))
//!         .max_retries(5)
//!         .cache_enabled(true)
//!         .build()?;
//!     let client = Client::new(config)?;
//!
//!     // Submit a research query
//!     let result = client
//!         .submit_research(&ResearchRequest::new("How does tokio schedule tasks?"))
//!         .await?;
//!     println!("{}", result.immediate_answer);
//!
//!     // Check service health
//!     let health = client.health().await?;
//!     println!("service {} ({})", health.status, health.version);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed operations** - One method per API endpoint, with serde-backed
//!   request and response types
//! - **Automatic retries** - Rate limits (429), server errors (5xx), and
//!   transport failures are retried with exponential backoff
//! - **Response caching** - Optional in-memory TTL cache for GET responses,
//!   shared across clones of a client
//! - **Environment configuration** - Every setting can come from a
//!   `SCHOLAR_*` environment variable
//! - **Structured logging** - Request lifecycle events via `tracing`
//! - **Blocking facade** - [`blocking::Client`] for callers without an async
//!   runtime
//!
//! ## Blocking Usage
//!
//! Synchronous callers get the same behavior through
//! [`blocking::Client`], which drives the async client on a private runtime:
//!
//! ```no_run
//! use scholar_client::blocking::Client;
//!
//! fn main() -> Result<(), scholar_client::Error> {
//!     let client = Client::from_env()?;
//!     let health = client.health()?;
//!     println!("service is {}", health.status);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every failure maps to a variant of [`Error`]. API rejections keep the
//! server's diagnostic fields, and exhausted retries wrap the final error:
//!
//! ```no_run
//! use scholar_client::{Client, Error};
//!
//! # async fn example(client: Client) -> Result<(), Error> {
//! match client.research_result("res-123").await {
//!     Ok(result) => println!("{}", result.immediate_answer),
//!     Err(Error::Api { status, message, request_id, .. }) => {
//!         eprintln!("API rejected the request ({}): {}", status, message);
//!         if let Some(id) = request_id {
//!             eprintln!("  request id: {}", id);
//!         }
//!     }
//!     Err(Error::ExhaustedRetries { attempts, source }) => {
//!         eprintln!("gave up after {} attempts: {}", attempts, source);
//!     }
//!     Err(e) => eprintln!("request failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod blocking;
mod cache;
mod client;
mod config;
mod error;
mod request;
mod retry;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, Result};
pub use request::ApiRequest;
pub use types::*;

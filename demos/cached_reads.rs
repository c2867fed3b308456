//! Serving repeated reads from the client-side response cache.
//!
//! This example shows how to:
//! - Enable the in-memory TTL cache
//! - Watch a repeat GET skip the network
//! - Search the service's own result cache through the API
//!
//! Run with: `cargo run --example cached_reads`

use scholar_client::{CacheSearchParams, Client, ClientConfig, Error};
use std::time::{Duration, Instant};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("scholar_client=debug,cached_reads=info")
        .init();

    // API key comes from SCHOLAR_API_KEY
    let config = ClientConfig::builder()
        .cache_enabled(true)
        .cache_ttl(Duration::from_secs(60))
        .build()?;
    let client = Client::new(config)?;

    println!("=== Repeated Reads ===");
    let start = Instant::now();
    let stats = client.cache_stats().await?;
    println!(
        "First read took {:?} ({} entries server-side)",
        start.elapsed(),
        stats.total_entries
    );

    let start = Instant::now();
    let stats = client.cache_stats().await?;
    println!(
        "Second read took {:?} (served from the client cache)",
        start.elapsed()
    );
    println!("Server hit rate: {:.0}%", stats.hit_rate * 100.0);
    println!();

    println!("=== Search the Server Cache ===");
    let results = client
        .search_cache(&CacheSearchParams {
            min_quality: Some(0.8),
            limit: 5,
            ..Default::default()
        })
        .await?;

    for item in &results.results {
        println!(
            "{}  {:.2}  {}",
            item.key, item.quality_score, item.original_query
        );
    }
    println!("{} matching entries", results.total_count);

    Ok(())
}

//! Submitting research queries and reading stored results back.
//!
//! This example shows how to:
//! - Configure a client from the environment
//! - Submit a research query with context
//! - Page through stored results
//!
//! Run with: `cargo run --example research`
//! (expects SCHOLAR_API_KEY, and SCHOLAR_BASE_URL if the service is remote)

use scholar_client::{Client, Error, ListParams, ResearchRequest};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("scholar_client=debug,research=info")
        .init();

    let client = Client::from_env()?;

    println!("=== Submit Research ===");
    let request = ResearchRequest::new("How does async cancellation work in Rust?")
        .with_context("tokio-based services")
        .with_priority("high");
    let result = client.submit_research(&request).await?;

    println!("Result {} ({})", result.id, result.research_type);
    println!("{}", result.immediate_answer);
    for evidence in &result.supporting_evidence {
        println!("  evidence [{}] {}", evidence.source, evidence.content);
    }
    println!("Quality score: {:.2}", result.metadata.quality_score);
    println!();

    println!("=== List Stored Results ===");
    let page = client
        .list_research(&ListParams {
            limit: 5,
            ..Default::default()
        })
        .await?;

    for summary in &page.results {
        println!(
            "{}  {:.2}  {}",
            summary.id, summary.quality_score, summary.query
        );
    }
    println!(
        "{} total results, more pages: {}",
        page.total_count, page.pagination.has_more
    );

    Ok(())
}

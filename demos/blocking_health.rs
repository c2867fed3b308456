//! Checking service health from synchronous code.
//!
//! This example shows how to:
//! - Use the blocking client without an async runtime
//! - Verify the API key against the protected health endpoint
//!
//! Run with: `cargo run --example blocking_health`

use scholar_client::blocking::Client;
use scholar_client::Error;

fn main() -> Result<(), Error> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("scholar_client=info")
        .init();

    let client = Client::from_env()?;

    let health = client.health()?;
    println!("Service: {} (version {})", health.status, health.version);
    println!("Up for {}s", health.uptime_seconds);
    for (name, component) in &health.components {
        println!("  {}: {}", name, component.status);
    }

    let protected = client.protected_health()?;
    println!("API key accepted, service still {}", protected.status);

    Ok(())
}

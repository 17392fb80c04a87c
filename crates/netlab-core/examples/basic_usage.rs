//! Basic usage example - fetch posts, run the retry demo, dump the network log

use netlab_core::{CancellationToken, ClientConfig, NetLab, Result};

#[tokio::main]
async fn main() -> Result<()> {
    // Base URL from args or NETLAB_API_BASE_URL
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = std::env::args().nth(1) {
        config.base_url = base_url;
    }

    println!("Using API at {}", config.base_url);
    let lab = NetLab::new(config)?;

    let posts = lab.list_posts(5).await?;
    println!("Fetched {} posts:", posts.len());
    for post in &posts {
        println!("  - #{} {}", post.id, post.title);
    }

    println!("Running retry demo with 2 retries...");
    let report = lab.run_retry(2, &CancellationToken::new()).await?;
    for attempt in &report.attempts {
        println!(
            "  attempt {}: {:?} {}",
            attempt.attempt_number, attempt.status, attempt.message
        );
    }
    println!("Outcome: {:?}", report.outcome);

    println!("Network log (newest first):");
    for entry in lab.recent_logs() {
        println!("  #{} [{}] {}", entry.id, entry.kind, entry.message);
    }

    Ok(())
}

//! Background image cache sync
//!
//! Ensures every catalog image is present in `img/`, marks the ones still in
//! use, and evicts images that have not been wanted for the retention window.

use clap::Parser;
use tracing::info;

use backdrop::cache::CacheManager;
use backdrop::cli::SyncCli;
use backdrop::config::Config;
use backdrop::logging::init_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _cli = SyncCli::parse();
    init_tracing();

    let config = Config::default();
    let cache = CacheManager::new(config)?;

    let report = cache.sync().await?;
    if !report.failed.is_empty() {
        info!(
            "{} images will be retried on the next run: {}",
            report.failed.len(),
            report.failed.join(", ")
        );
    }

    info!("Done.");
    Ok(())
}

//! Background image manifest generator
//!
//! Writes `img/images.js`, assigning the sorted list of cached images to
//! `window.manifestImages` for the front-end.

use clap::Parser;
use tracing::info;

use backdrop::cli::ManifestCli;
use backdrop::config::Config;
use backdrop::logging::init_tracing;
use backdrop::manifest::generate_manifest;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _cli = ManifestCli::parse();
    init_tracing();

    let config = Config::default();
    generate_manifest(&config)?;

    info!("Done.");
    Ok(())
}

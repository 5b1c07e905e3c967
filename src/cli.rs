//! Command-line interface parsing for the backdrop binaries
//!
//! Both jobs take no arguments; clap still provides `--help` and `--version`
//! and rejects anything else.

use clap::Parser;

/// Download missing background images and evict stale ones
///
/// Works on the `img` directory under the current working directory.
#[derive(Parser, Debug)]
#[command(name = "backdrop-sync")]
#[command(about = "Sync the local background image cache with the catalog")]
#[command(version)]
pub struct SyncCli {}

/// Write img/images.js listing every image in the cache directory
#[derive(Parser, Debug)]
#[command(name = "backdrop-manifest")]
#[command(about = "Generate the background image manifest for the front-end")]
#[command(version)]
pub struct ManifestCli {}

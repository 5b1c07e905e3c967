//! Runtime configuration shared by both jobs
//!
//! Everything is fixed at compile time; `Config::default()` assembles the
//! constants once at startup and the value is passed down explicitly.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::Catalog;

/// Directory holding the cached images, relative to the working directory
pub const IMAGE_DIR: &str = "img";

/// Path prefix the front-end uses to reach the image directory
pub const PUBLIC_PREFIX: &str = "img";

/// Manifest file written inside the image directory
pub const MANIFEST_FILE_NAME: &str = "images.js";

/// Global script variable assigned by the manifest
pub const MANIFEST_VARIABLE: &str = "window.manifestImages";

/// Hidden file recording when each image was last wanted
pub const LEDGER_FILE_NAME: &str = ".wanted.json";

/// Days an unreferenced image survives before eviction
pub const RETENTION_DAYS: i64 = 7;

/// Total timeout for a single image request
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the sync and manifest jobs
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where images are stored
    pub image_dir: PathBuf,
    /// Prefix prepended to filenames in the manifest
    pub public_prefix: String,
    /// Manifest filename inside `image_dir`
    pub manifest_file_name: String,
    /// Script variable the manifest assigns
    pub manifest_variable: String,
    /// Ledger filename inside `image_dir`
    pub ledger_file_name: String,
    /// How long an unreferenced image is kept
    pub retention: chrono::Duration,
    /// Timeout for each download
    pub request_timeout: Duration,
    /// Images the cache should contain
    pub catalog: Catalog,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from(IMAGE_DIR),
            public_prefix: PUBLIC_PREFIX.to_string(),
            manifest_file_name: MANIFEST_FILE_NAME.to_string(),
            manifest_variable: MANIFEST_VARIABLE.to_string(),
            ledger_file_name: LEDGER_FILE_NAME.to_string(),
            retention: chrono::Duration::days(RETENTION_DAYS),
            request_timeout: REQUEST_TIMEOUT,
            catalog: Catalog::default(),
        }
    }
}

impl Config {
    /// Default configuration rooted at a different image directory
    pub fn with_image_dir(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            ..Default::default()
        }
    }

    /// Replaces the catalog
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.image_dir.join(&self.manifest_file_name)
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.image_dir.join(&self.ledger_file_name)
    }
}

//! Cache manager keeping the image directory in sync with the catalog
//!
//! Provides a `CacheManager` that downloads missing catalog images, marks the
//! ones still referenced, and evicts files nobody has wanted for longer than
//! the retention window. Every per-file failure is logged and skipped.

use chrono::{DateTime, Utc};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::fetch::ImageFetcher;
use super::ledger::WantedLedger;
use crate::config::Config;

/// Errors that abort a sync run
///
/// Download, touch and delete failures on individual files are not errors at
/// this level, nor is a ledger that cannot be saved; they are logged and the
/// run carries on.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The image directory could not be created or listed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of a single sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Files fetched during this run
    pub downloaded: Vec<String>,
    /// Files already present and marked as still wanted
    pub refreshed: Vec<String>,
    /// Catalog files that could not be downloaded
    pub failed: Vec<String>,
    /// Unreferenced files deleted by the sweep
    pub evicted: Vec<String>,
    /// Stale files the sweep could not delete
    pub delete_failed: Vec<String>,
}

/// Manages the on-disk image cache
#[derive(Debug, Clone)]
pub struct CacheManager {
    config: Config,
    fetcher: ImageFetcher,
}

impl CacheManager {
    /// Creates a CacheManager with an HTTP fetcher honoring the configured timeout
    pub fn new(config: Config) -> Result<Self, CacheError> {
        let fetcher = ImageFetcher::new(config.request_timeout)?;
        Ok(Self { config, fetcher })
    }

    /// Creates a CacheManager with a custom fetcher
    pub fn with_fetcher(config: Config, fetcher: ImageFetcher) -> Self {
        Self { config, fetcher }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the path of an image file in the cache directory
    fn image_path(&self, filename: &str) -> PathBuf {
        self.config.image_dir.join(filename)
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.config.image_dir).map_err(|source| CacheError::Io {
            path: self.config.image_dir.clone(),
            source,
        })
    }

    /// Runs a full sync against the current time
    pub async fn sync(&self) -> Result<SyncReport, CacheError> {
        self.sync_at(Utc::now()).await
    }

    /// Runs a full sync treating `now` as the current time
    ///
    /// Downloads every missing catalog image (one attempt each), sets the
    /// modification time of every present catalog image to `now`, records it
    /// in the ledger, then deletes unreferenced files whose last-wanted time
    /// is older than the retention window.
    ///
    /// # Returns
    /// * `Ok(SyncReport)` - What happened to each file, including failures
    /// * `Err(CacheError)` - Only if the directory cannot be created or listed
    pub async fn sync_at(&self, now: DateTime<Utc>) -> Result<SyncReport, CacheError> {
        self.ensure_dir()?;

        let mut ledger = WantedLedger::load(self.config.ledger_path());
        let mut report = SyncReport::default();

        info!(
            "Syncing {} images into {}",
            self.config.catalog.len(),
            self.config.image_dir.display()
        );

        for image in self.config.catalog.entries() {
            let filename = image.filename();
            let path = self.image_path(&filename);

            if path.is_file() {
                if let Err(e) = touch(&path, now) {
                    warn!("Could not refresh timestamp of {}: {}", filename, e);
                }
                debug!("Still wanted: {}", filename);
                report.refreshed.push(filename.clone());
            } else {
                info!("Downloading {} from {}", filename, image.url);
                match self.fetcher.download(&image.url, &path).await {
                    Ok(bytes) => {
                        if let Err(e) = touch(&path, now) {
                            warn!("Could not set timestamp of {}: {}", filename, e);
                        }
                        info!("Saved {} ({} bytes)", filename, bytes);
                        report.downloaded.push(filename.clone());
                    }
                    Err(e) => {
                        warn!("Failed to download {}: {}", filename, e);
                        report.failed.push(filename);
                        continue;
                    }
                }
            }

            ledger.mark(&filename, now);
        }

        self.sweep(&mut ledger, now, &mut report, |path| fs::remove_file(path))?;

        let dir = &self.config.image_dir;
        ledger.retain_existing(|filename| dir.join(filename).is_file());
        if let Err(e) = ledger.save() {
            warn!("Could not save ledger {}: {}", ledger.path().display(), e);
        }

        info!(
            "Sync finished: {} downloaded, {} refreshed, {} failed, {} evicted",
            report.downloaded.len(),
            report.refreshed.len(),
            report.failed.len(),
            report.evicted.len()
        );

        Ok(report)
    }

    /// Deletes unreferenced files not wanted within the retention window
    ///
    /// Hidden files, non-regular files, catalog files and the manifest are
    /// never candidates. A file's last-wanted time comes from the ledger when
    /// present, otherwise from its modification time. Each stale file is handed
    /// to `remove`; a failure is logged and the sweep moves on.
    fn sweep(
        &self,
        ledger: &mut WantedLedger,
        now: DateTime<Utc>,
        report: &mut SyncReport,
        mut remove: impl FnMut(&Path) -> io::Result<()>,
    ) -> Result<(), CacheError> {
        let dir = &self.config.image_dir;
        let entries = fs::read_dir(dir).map_err(|source| CacheError::Io {
            path: dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }

            let metadata = match entry.metadata() {
                Ok(metadata) if metadata.is_file() => metadata,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Could not stat {}: {}", name, e);
                    continue;
                }
            };

            if self.config.catalog.contains_filename(&name)
                || name == self.config.manifest_file_name
            {
                continue;
            }

            let last_wanted = match ledger.last_wanted(&name) {
                Some(at) => at,
                None => match metadata.modified() {
                    Ok(modified) => DateTime::<Utc>::from(modified),
                    Err(e) => {
                        warn!("Could not read modification time of {}: {}", name, e);
                        continue;
                    }
                },
            };

            if now - last_wanted <= self.config.retention {
                continue;
            }

            match remove(&entry.path()) {
                Ok(()) => {
                    info!("Evicted {} (last wanted {})", name, last_wanted.to_rfc3339());
                    ledger.forget(&name);
                    report.evicted.push(name);
                }
                Err(e) => {
                    warn!("Failed to delete {}: {}", name, e);
                    report.delete_failed.push(name);
                }
            }
        }

        report.evicted.sort();
        report.delete_failed.sort();
        Ok(())
    }
}

/// Sets the modification time of `path` without altering its content
///
/// Opened read-only: the owner may set times on a file it cannot write.
fn touch(path: &Path, at: DateTime<Utc>) -> io::Result<()> {
    let file = fs::File::open(path)?;
    file.set_modified(SystemTime::from(at))
}

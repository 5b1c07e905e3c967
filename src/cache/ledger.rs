//! Record of when each cached image was last wanted
//!
//! The ledger is a small JSON file kept next to the images. Eviction reads it
//! instead of trusting modification times alone, so an unrelated process that
//! touches a file cannot keep an unreferenced image alive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use super::atomic::write_atomic;

/// On-disk representation of the ledger
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerFile {
    /// When the ledger was last written
    updated_at: Option<DateTime<Utc>>,
    /// Filename to the last time a sync run found it referenced
    #[serde(default)]
    entries: BTreeMap<String, DateTime<Utc>>,
}

/// Errors that can occur when saving the ledger
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("Failed to serialize ledger: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Last-wanted timestamps for files in the image directory
#[derive(Debug)]
pub struct WantedLedger {
    path: PathBuf,
    entries: BTreeMap<String, DateTime<Utc>>,
}

impl WantedLedger {
    /// Loads the ledger at `path`
    ///
    /// A missing file yields an empty ledger. An unreadable or corrupt file is
    /// logged and also treated as empty; it is rewritten on the next save.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<LedgerFile>(&content) {
                Ok(file) => file.entries,
                Err(e) => {
                    warn!("Ignoring corrupt ledger {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Could not read ledger {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self { path, entries }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Records that `filename` was wanted at `at`
    pub fn mark(&mut self, filename: &str, at: DateTime<Utc>) {
        self.entries.insert(filename.to_string(), at);
    }

    /// When `filename` was last wanted, if the ledger has seen it
    pub fn last_wanted(&self, filename: &str) -> Option<DateTime<Utc>> {
        self.entries.get(filename).copied()
    }

    pub fn forget(&mut self, filename: &str) {
        self.entries.remove(filename);
    }

    /// Drops entries for which `exists` returns false
    pub fn retain_existing(&mut self, mut exists: impl FnMut(&str) -> bool) {
        self.entries.retain(|filename, _| exists(filename));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes the ledger back to disk, replacing any previous content
    ///
    /// On failure the previous ledger file is left as it was.
    pub fn save(&self) -> Result<(), LedgerError> {
        let file = LedgerFile {
            updated_at: Some(Utc::now()),
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        write_atomic(&self.path, json.as_bytes()).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

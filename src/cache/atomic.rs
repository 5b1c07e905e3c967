//! Atomic file replacement for images and the ledger
//!
//! Content goes to a hidden temp file next to the target, is synced to disk,
//! then renamed over the target. A failed write never leaves a partial file
//! under the final name, and the temp file is removed.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use tracing::debug;

/// Hidden sibling path used while `path` is being written
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.{}.tmp", name, process::id()))
}

/// Replaces `path` with `contents`, or leaves it untouched on failure
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let temp_path = temp_path_for(path);

    let result = write_and_rename(&temp_path, path, contents);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_rename(temp_path: &Path, path: &Path, contents: &[u8]) -> io::Result<()> {
    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
    }

    fs::rename(temp_path, path)?;
    debug!("Atomically wrote {}", path.display());
    Ok(())
}

//! Manifest generator for the front-end
//!
//! Lists the images in the cache directory and writes them as a script that
//! assigns a global array, so a page opened over `file://` can load the list
//! with a plain `<script>` tag instead of fetching it.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::config::Config;

/// File extensions recognized as images (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Errors that can occur while generating the manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Directory listing or file writing failed
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result of a manifest run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestReport {
    /// Where the manifest was written
    pub path: PathBuf,
    /// Number of images listed
    pub count: usize,
}

/// Returns true if `name` ends with one of the recognized image extensions
pub fn is_image_file_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Lists image files in `dir` as `<prefix>/<filename>`, sorted by filename
///
/// A missing directory is treated as empty.
pub fn collect_images(dir: &Path, prefix: &str) -> Result<Vec<String>, ManifestError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(ManifestError::Io {
                path: dir.to_path_buf(),
                source,
            })
        }
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ManifestError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(_) => continue,
        };
        if !is_image_file_name(&name) {
            continue;
        }
        if !entry.path().is_file() {
            continue;
        }
        names.push(name);
    }

    names.sort();

    let prefix = prefix.trim_end_matches('/');
    Ok(names
        .into_iter()
        .map(|name| {
            if prefix.is_empty() {
                name
            } else {
                format!("{}/{}", prefix, name)
            }
        })
        .collect())
}

/// Renders `<variable> = [...];` with two-space indentation and ASCII-only output
pub fn render_script(images: &[String], variable: &str) -> Result<String, ManifestError> {
    let json = serde_json::to_string_pretty(images)?;
    Ok(format!("{} = {};", variable, escape_non_ascii(&json)))
}

/// Replaces every non-ASCII character with `\uXXXX` escapes (UTF-16 units)
///
/// Only valid on JSON text, where non-ASCII can only appear inside strings.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{:04x}", unit));
            }
        }
    }
    out
}

/// Writes the manifest for the configured image directory
///
/// Creates the directory if needed and overwrites any previous manifest.
pub fn generate_manifest(config: &Config) -> Result<ManifestReport, ManifestError> {
    let path = config.manifest_path();
    info!("Generating image manifest ({})...", config.manifest_file_name);

    fs::create_dir_all(&config.image_dir).map_err(|source| ManifestError::Io {
        path: config.image_dir.clone(),
        source,
    })?;

    let images = collect_images(&config.image_dir, &config.public_prefix)?;
    let script = render_script(&images, &config.manifest_variable)?;

    fs::write(&path, script).map_err(|source| ManifestError::Io {
        path: path.clone(),
        source,
    })?;

    info!("Wrote manifest {} ({} images)", path.display(), images.len());

    Ok(ManifestReport {
        path,
        count: images.len(),
    })
}

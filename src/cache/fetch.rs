//! HTTP client for downloading catalog images

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::atomic::write_atomic;

/// Errors that can occur when downloading an image
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Server answered with something other than 200
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(StatusCode),

    /// Body was received but could not be stored
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Downloads images with a single attempt per request
#[derive(Debug, Clone)]
pub struct ImageFetcher {
    client: Client,
}

impl ImageFetcher {
    /// Creates a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Creates a fetcher around a preconfigured HTTP client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches `url` and writes the full body to `dest`
    ///
    /// Only a 200 response is accepted. The body is stored through a temp file
    /// and renamed into place, so `dest` only ever holds a complete image.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of bytes written
    /// * `Err(FetchError)` - Transport failure, non-200 status, or write failure
    pub async fn download(&self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::UnexpectedStatus(status));
        }

        let body = response.bytes().await?;
        write_atomic(dest, &body).map_err(|source| FetchError::Write {
            path: dest.to_path_buf(),
            source,
        })?;

        Ok(body.len() as u64)
    }
}

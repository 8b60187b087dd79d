//! Download-by-name client for hosted checkpoint files.
//!
//! Resolves a `{repo, path}` pair against a HuggingFace-style endpoint
//! (`{endpoint}/{repo}/resolve/main/{path}`) and caches the file on disk.
//! Synchronous by design: the post-load callbacks that consume it run once
//! per model load with no retry or timeout logic, so failures propagate
//! immediately.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CheckpointError, Result};

/// Default hosted-checkpoint endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://huggingface.co";

/// Environment variable overriding the endpoint.
pub const ENDPOINT_ENV: &str = "IR_HUB_ENDPOINT";

/// Environment variable overriding the cache directory.
pub const CACHE_ENV: &str = "IR_HUB_CACHE";

/// Cached, synchronous client for hosted checkpoint files.
pub struct HubClient {
    endpoint: String,
    cache_dir: PathBuf,
    client: reqwest::blocking::Client,
}

impl Default for HubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HubClient {
    /// Create a client with the default endpoint and cache directory.
    pub fn new() -> Self {
        let cache_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("ir-registry");

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            cache_dir,
            client: reqwest::blocking::Client::new(),
        }
    }

    /// Create a client honouring `IR_HUB_ENDPOINT` and `IR_HUB_CACHE`.
    pub fn from_env() -> Self {
        let mut client = Self::new();

        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            client.endpoint = endpoint;
        }
        if let Ok(cache) = std::env::var(CACHE_ENV) {
            client.cache_dir = PathBuf::from(cache);
        }

        client
    }

    /// Builder: set the endpoint
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Builder: set the cache directory
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }

    /// Resolved URL for a file within a hosted checkpoint repository.
    pub fn file_url(&self, repo: &str, path: &str) -> String {
        format!("{}/{repo}/resolve/main/{path}", self.endpoint)
    }

    /// Local cache location for a file within a repository.
    pub fn cache_path(&self, repo: &str, path: &str) -> PathBuf {
        let mut local = self.cache_dir.join(repo.replace('/', "--"));
        for part in path.split('/') {
            local = local.join(part);
        }
        local
    }

    /// Download a file by repository name, serving from cache when present.
    ///
    /// Returns the local path of the cached file. Any HTTP or I/O failure
    /// propagates as an error; there is no retry or partial-success path.
    pub fn download(&self, repo: &str, path: &str) -> Result<PathBuf> {
        let local = self.cache_path(repo, path);
        if local.exists() {
            tracing::debug!(repo, path, "serving checkpoint file from cache");
            return Ok(local);
        }

        let url = self.file_url(repo, path);
        tracing::debug!(%url, "fetching checkpoint file");

        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            return Err(CheckpointError::Download(format!(
                "GET {url} returned {}",
                response.status()
            )));
        }
        let bytes = response.bytes()?;

        if let Some(parent) = local.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&local, &bytes)?;

        Ok(local)
    }
}

/// Read a cached or local checkpoint file into memory.
pub fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| CheckpointError::ModelLoad(format!("Failed to read {path:?}: {e}")))
}

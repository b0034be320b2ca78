//! Dataset retrieval backends.
//!
//! Every backend resolves a relative document path (e.g.
//! `"combined_state_data.json"`) against its own root and returns the raw
//! bytes. Fetches are never retried; a failure is reported once and the
//! caller leaves the dependent chart unrendered.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;

use crate::DatasetError;

/// A source of static dataset documents.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Retrieves the document at `path`, relative to the fetcher root.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError`] if the document is missing or cannot be
    /// read.
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, DatasetError>;

    /// Human-readable description of where documents come from.
    fn describe(&self) -> String;
}

/// Reads documents from a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    /// Creates a fetcher rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DatasetFetcher for DirectoryFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, DatasetError> {
        let full_path = self.root.join(path);
        log::debug!("Reading dataset {}", full_path.display());

        tokio::fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DatasetError::NotFound {
                    path: path.to_string(),
                }
            } else {
                DatasetError::Io {
                    path: path.to_string(),
                    source: e,
                }
            }
        })
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Downloads documents relative to an HTTP base URL.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher for documents under `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl DatasetFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, DatasetError> {
        let url = self.url_for(path);
        log::debug!("Downloading dataset {url}");

        let response = self.client.get(&url).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(DatasetError::NotFound {
                path: path.to_string(),
            });
        }

        let bytes = response.error_for_status()?.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn describe(&self) -> String {
        format!("url {}", self.base_url)
    }
}

/// Serves documents held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticFetcher {
    documents: BTreeMap<String, Vec<u8>>,
}

impl StaticFetcher {
    /// Creates an empty fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the document served at `path`.
    #[must_use]
    pub fn with_document(mut self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.documents.insert(path.to_string(), body.into());
        self
    }
}

#[async_trait]
impl DatasetFetcher for StaticFetcher {
    async fn fetch(&self, path: &str) -> Result<Vec<u8>, DatasetError> {
        self.documents
            .get(path)
            .cloned()
            .ok_or_else(|| DatasetError::NotFound {
                path: path.to_string(),
            })
    }

    fn describe(&self) -> String {
        format!("{} in-memory documents", self.documents.len())
    }
}

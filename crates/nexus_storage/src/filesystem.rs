//! JSON files in a data directory.

use crate::{Document, DocumentStore, document::decode};
use nexus_error::{JsonError, NexusResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};

/// Stores each document as a pretty-printed JSON file in one directory.
///
/// ```text
/// data/
/// ├── config.json
/// ├── users.json
/// └── last_version.json
/// ```
///
/// Writes go to a sibling `.tmp` file that is then renamed over the target,
/// so a crash never leaves a half-written document behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_path: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `base_path`, creating the directory if needed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> NexusResult<Self> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        tracing::info!(path = %base_path.display(), "Opened document store");
        Ok(Self { base_path })
    }

    /// Directory holding the documents.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of a document on disk.
    pub fn path_of<D: Document>(&self) -> PathBuf {
        self.base_path.join(D::NAME)
    }

    /// Strictly read a document: `None` when absent, an error when corrupt.
    #[tracing::instrument(skip(self), fields(document = D::NAME))]
    pub async fn verify<D: Document>(&self) -> NexusResult<Option<D>> {
        let path = self.path_of::<D>();
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
                .into());
            }
        };
        let document = serde_json::from_str::<D>(&text)
            .map_err(|e| JsonError::new(format!("{}: {}", path.display(), e)))?;
        Ok(Some(document.normalize()))
    }
}

#[async_trait::async_trait]
impl DocumentStore for JsonFileStore {
    #[tracing::instrument(skip(self), fields(document = D::NAME))]
    async fn load<D: Document>(&self) -> NexusResult<D> {
        let path = self.path_of::<D>();
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Document absent, using defaults");
                return Ok(D::default());
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Document unreadable, using defaults");
                return Ok(D::default());
            }
        };

        Ok(decode::<D>(&text).unwrap_or_default())
    }

    #[tracing::instrument(skip(self, document), fields(document = D::NAME))]
    async fn save<D: Document>(&self, document: &D) -> NexusResult<()> {
        let path = self.path_of::<D>();
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StorageError::new(StorageErrorKind::Encode(e.to_string())))?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, json.as_bytes())
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::FileWrite(format!(
                    "{}: {}",
                    temp_path.display(),
                    e
                )))
            })?;

        tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            )))
        })?;

        tracing::debug!(path = %path.display(), bytes = json.len(), "Saved document");
        Ok(())
    }
}

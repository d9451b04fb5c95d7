//! In-memory document store for testing.

use crate::{Document, DocumentStore, document::decode};
use nexus_error::{NexusResult, StorageError, StorageErrorKind};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Keeps each document as its serialized JSON text.
///
/// Storing text rather than values keeps the encode and decode path identical
/// to the file store, and lets tests compare exact bytes and count writes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    documents: HashMap<&'static str, String>,
    writes: HashMap<&'static str, usize>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a document with raw JSON text.
    pub fn insert_raw<D: Document>(&self, text: impl Into<String>) {
        self.inner.lock().documents.insert(D::NAME, text.into());
    }

    /// Raw JSON text of a document, if it was ever written or seeded.
    pub fn raw<D: Document>(&self) -> Option<String> {
        self.inner.lock().documents.get(D::NAME).cloned()
    }

    /// Number of saves of a document.
    pub fn writes<D: Document>(&self) -> usize {
        self.inner.lock().writes.get(D::NAME).copied().unwrap_or(0)
    }
}

#[async_trait::async_trait]
impl DocumentStore for InMemoryStore {
    async fn load<D: Document>(&self) -> NexusResult<D> {
        let text = self.inner.lock().documents.get(D::NAME).cloned();
        Ok(text.and_then(|t| decode::<D>(&t)).unwrap_or_default())
    }

    async fn save<D: Document>(&self, document: &D) -> NexusResult<()> {
        let json = serde_json::to_string_pretty(document)
            .map_err(|e| StorageError::new(StorageErrorKind::Encode(e.to_string())))?;
        let mut inner = self.inner.lock();
        inner.documents.insert(D::NAME, json);
        *inner.writes.entry(D::NAME).or_insert(0) += 1;
        Ok(())
    }
}

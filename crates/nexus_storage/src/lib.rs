//! Whole-document persistence for the NEXUS community bot.
//!
//! Every read loads an entire document and every write replaces an entire
//! document. Nothing is cached between calls, so the store on disk is always
//! the single source of truth.
//!
//! # Example
//!
//! ```rust
//! use nexus_core::GuildConfig;
//! use nexus_storage::{DocumentStore, InMemoryStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = InMemoryStore::new();
//! let mut config: GuildConfig = store.load().await?;
//! config.autopost.interval_min = 60;
//! store.save(&config).await?;
//!
//! let reloaded: GuildConfig = store.load().await?;
//! assert_eq!(reloaded.autopost.interval_min, 60);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod document;
mod filesystem;
mod memory;

pub use document::{CONFIG_FILE, Document, USERS_FILE, VERSION_FILE};
pub use filesystem::JsonFileStore;
pub use memory::InMemoryStore;
pub use nexus_error::{StorageError, StorageErrorKind};

use nexus_error::NexusResult;

/// Trait for pluggable document stores.
///
/// Loading never fails on absent or unreadable content: the document's
/// defaults are returned instead. Saving reports failures so callers can
/// decide whether to tolerate them.
#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Load a whole document, falling back to its defaults.
    async fn load<D: Document>(&self) -> NexusResult<D>;

    /// Replace a whole document.
    async fn save<D: Document>(&self, document: &D) -> NexusResult<()>;
}

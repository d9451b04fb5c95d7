//! Documents known to the store.

use nexus_core::{GuildConfig, UserProgressBook, VersionMarker};
use serde::{Serialize, de::DeserializeOwned};

/// File name of the guild configuration document.
pub const CONFIG_FILE: &str = "config.json";
/// File name of the user progress document.
pub const USERS_FILE: &str = "users.json";
/// File name of the version marker document.
pub const VERSION_FILE: &str = "last_version.json";

/// A persisted JSON document with a fixed name.
pub trait Document: Serialize + DeserializeOwned + Default + Send + Sync + 'static {
    /// Name of the document, used as the file name on disk.
    const NAME: &'static str;

    /// Repair a freshly decoded document.
    fn normalize(self) -> Self {
        self
    }
}

impl Document for GuildConfig {
    const NAME: &'static str = CONFIG_FILE;

    fn normalize(self) -> Self {
        self.normalized()
    }
}

impl Document for UserProgressBook {
    const NAME: &'static str = USERS_FILE;
}

impl Document for VersionMarker {
    const NAME: &'static str = VERSION_FILE;
}

/// Decode a document, or `None` when the text is not valid for it.
pub(crate) fn decode<D: Document>(text: &str) -> Option<D> {
    match serde_json::from_str::<D>(text) {
        Ok(document) => Some(document.normalize()),
        Err(e) => {
            tracing::warn!(document = D::NAME, error = %e, "Document is corrupt, using defaults");
            None
        }
    }
}

//! Version announcement marker.

use serde::{Deserialize, Serialize};

/// Remembers which build version was last announced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionMarker {
    /// Semantic version string.
    pub last_announced: String,
}

impl Default for VersionMarker {
    fn default() -> Self {
        Self {
            last_announced: "0.0.0".to_string(),
        }
    }
}

impl VersionMarker {
    /// Marker for `version`.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            last_announced: version.into(),
        }
    }
}

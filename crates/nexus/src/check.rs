//! Offline validation of the stored documents.

use nexus_core::{GuildConfig, UserProgressBook, VersionMarker};
use nexus_error::NexusResult;
use nexus_storage::JsonFileStore;
use std::fmt;
use tracing::instrument;

/// Summary of what the data directory holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CheckReport {
    /// Whether `config.json` exists.
    pub has_config: bool,
    /// Guilds whose setup completed.
    pub provisioned_guilds: usize,
    /// Members with recorded progress.
    pub tracked_members: usize,
    /// Last announced version, `None` when never announced.
    pub last_announced: Option<String>,
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "config:      {}",
            if self.has_config { "present" } else { "defaults" }
        )?;
        writeln!(f, "provisioned: {}", self.provisioned_guilds)?;
        writeln!(f, "members:     {}", self.tracked_members)?;
        write!(
            f,
            "announced:   {}",
            self.last_announced.as_deref().unwrap_or("never")
        )
    }
}

/// Strictly read every document in `store`.
///
/// # Errors
///
/// Fails on the first document that exists but cannot be read or parsed.
#[instrument(skip_all, fields(path = %store.base_path().display()))]
pub async fn check_documents(store: &JsonFileStore) -> NexusResult<CheckReport> {
    let config = store.verify::<GuildConfig>().await?;
    let users = store.verify::<UserProgressBook>().await?;
    let marker = store.verify::<VersionMarker>().await?;

    Ok(CheckReport {
        has_config: config.is_some(),
        provisioned_guilds: config
            .as_ref()
            .map(|c| c.guild_setup.values().filter(|s| s.done).count())
            .unwrap_or_default(),
        tracked_members: users.map(|u| u.len()).unwrap_or_default(),
        last_announced: marker.map(|m| m.last_announced),
    })
}

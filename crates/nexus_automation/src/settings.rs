//! Runtime switches for the automation components.

use nexus_core::{BrandOverrides, GuildId};
use std::path::PathBuf;
use std::time::Duration;

/// Process-level settings, fixed for the lifetime of an [`Automation`](crate::Automation).
///
/// ```
/// use nexus_automation::AutomationSettings;
///
/// let settings = AutomationSettings::builder()
///     .block_links(true)
///     .version("3.3.1")
///     .build()
///     .unwrap();
/// assert!(*settings.anti_spam());
/// assert!(*settings.block_links());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into))]
pub struct AutomationSettings {
    /// Delete messages longer than the length ceiling.
    #[builder(default = "true")]
    anti_spam: bool,
    /// Delete messages containing links or invites.
    #[builder(default)]
    block_links: bool,
    /// Brand values that override the stored ones on every load.
    #[builder(default)]
    brand_overrides: BrandOverrides,
    /// Register commands for this guild only instead of globally.
    #[builder(default)]
    dev_guild: Option<GuildId>,
    /// Build version announced to guilds.
    #[builder(default = "env!(\"CARGO_PKG_VERSION\").to_string()")]
    version: String,
    /// Markdown changelog read by the announcer.
    #[builder(default = "PathBuf::from(\"CHANGELOG.md\")")]
    changelog_path: PathBuf,
    /// Stop the dispatch loop on the first handler failure.
    #[builder(default)]
    strict_exit: bool,
    /// Autopost polling period.
    #[builder(default = "Duration::from_secs(60)")]
    autopost_poll: Duration,
}

impl AutomationSettings {
    /// Start building settings.
    pub fn builder() -> AutomationSettingsBuilder {
        AutomationSettingsBuilder::default()
    }
}

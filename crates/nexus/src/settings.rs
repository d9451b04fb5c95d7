//! Process settings from bundled defaults, a user file and the environment.

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use nexus_automation::AutomationSettings;
use nexus_core::{BrandOverrides, GuildId};
use nexus_error::{ConfigError, NexusResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, instrument};

/// Bundled defaults, shipped with the binary.
const DEFAULT_SETTINGS: &str = include_str!("../../../nexus.toml");

/// Everything the bot reads from its environment.
///
/// Sources in order of precedence (later sources override earlier):
/// 1. Bundled defaults (`nexus.toml` shipped with the binary)
/// 2. Optional user file
/// 3. Process environment, keys upper-cased (`BOT_TOKEN`, `PORT`, ...)
///
/// Empty strings count as unset.
#[derive(Clone, Deserialize, Getters)]
pub struct Settings {
    /// Bot token.
    bot_token: String,
    /// Application id used for command registration.
    client_id: String,
    /// Development guild; commands are registered there only when set.
    guild_id: String,
    /// Developer account, shown by `check`.
    dev_user_id: String,
    /// Delete over-long messages.
    antispam_enabled: bool,
    /// Delete messages containing links or invites.
    block_links: bool,
    /// Brand name override.
    server_name: String,
    /// Brand color override (`#RRGGBB`).
    brand_color: String,
    /// Brand banner override.
    banner_url: String,
    /// Brand logo override.
    logo_url: String,
    /// Exit on unhandled panics and handler failures.
    auto_exit_on_fail: bool,
    /// Health API port.
    port: u16,
    /// Directory holding the JSON documents.
    data_dir: PathBuf,
    /// Markdown changelog announced on version changes.
    changelog_path: PathBuf,
    /// Autopost polling period in seconds.
    autopost_poll_secs: u64,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("bot_token", &"<redacted>")
            .field("client_id", &self.client_id)
            .field("guild_id", &self.guild_id)
            .field("antispam_enabled", &self.antispam_enabled)
            .field("block_links", &self.block_links)
            .field("auto_exit_on_fail", &self.auto_exit_on_fail)
            .field("port", &self.port)
            .field("data_dir", &self.data_dir)
            .field("changelog_path", &self.changelog_path)
            .field("autopost_poll_secs", &self.autopost_poll_secs)
            .finish_non_exhaustive()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn parse_id(name: &str, value: &str) -> NexusResult<Option<u64>> {
    match non_empty(value) {
        None => Ok(None),
        Some(text) => text.parse().map(Some).map_err(|_| {
            ConfigError::new(format!("{} must be a numeric id, got {:?}", name, text)).into()
        }),
    }
}

impl Settings {
    /// Load settings with `user_file` and the process environment applied.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a source cannot be parsed or a
    /// required value is missing.
    #[instrument(skip_all, fields(user_file = %user_file.display()))]
    pub fn load(user_file: &Path) -> NexusResult<Self> {
        Self::from_sources(Some(user_file), None)
    }

    /// Load settings from explicit sources.
    ///
    /// `env` replaces the process environment when given.
    pub fn from_sources(
        user_file: Option<&Path>,
        env: Option<HashMap<String, String>>,
    ) -> NexusResult<Self> {
        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_SETTINGS, FileFormat::Toml));
        if let Some(path) = user_file {
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(false));
        }
        builder = builder.add_source(Environment::default().ignore_empty(true).source(env));

        let settings: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build settings: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse settings: {}", e)))?;
        settings.validate()?;
        debug!(?settings, "Settings loaded");
        Ok(settings)
    }

    /// Check required values and id formats.
    pub fn validate(&self) -> NexusResult<()> {
        if non_empty(&self.bot_token).is_none() {
            return Err(ConfigError::new("BOT_TOKEN is not set").into());
        }
        self.application_id()?;
        self.dev_guild()?;
        parse_id("DEV_USER_ID", &self.dev_user_id)?;
        Ok(())
    }

    /// Numeric application id.
    pub fn application_id(&self) -> NexusResult<u64> {
        parse_id("CLIENT_ID", &self.client_id)?
            .ok_or_else(|| ConfigError::new("CLIENT_ID is not set").into())
    }

    /// Development guild, if configured.
    pub fn dev_guild(&self) -> NexusResult<Option<GuildId>> {
        Ok(parse_id("GUILD_ID", &self.guild_id)?.map(GuildId))
    }

    /// Developer account id, if configured.
    pub fn dev_user(&self) -> Option<String> {
        non_empty(&self.dev_user_id)
    }

    /// Brand values that override the stored brand.
    pub fn brand_overrides(&self) -> BrandOverrides {
        BrandOverrides {
            server_name: non_empty(&self.server_name),
            color: non_empty(&self.brand_color),
            banner_url: non_empty(&self.banner_url),
            logo_url: non_empty(&self.logo_url),
        }
    }

    /// Settings for the automation components.
    pub fn automation_settings(&self) -> NexusResult<AutomationSettings> {
        AutomationSettings::builder()
            .anti_spam(self.antispam_enabled)
            .block_links(self.block_links)
            .brand_overrides(self.brand_overrides())
            .dev_guild(self.dev_guild()?)
            .version(env!("CARGO_PKG_VERSION"))
            .changelog_path(self.changelog_path.clone())
            .strict_exit(self.auto_exit_on_fail)
            .autopost_poll(Duration::from_secs(self.autopost_poll_secs.max(1)))
            .build()
            .map_err(|e| ConfigError::new(format!("Invalid automation settings: {}", e)).into())
    }
}

//! The guild configuration document.

use crate::{ChannelId, GuildId, RoleId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Brand color used when none is configured or the configured one is invalid.
pub const DEFAULT_BRAND_COLOR: u32 = 0x00A3FF;

/// Lower bound for the autopost interval, in minutes.
pub const MIN_AUTOPOST_INTERVAL_MIN: u64 = 5;

/// Branding, autopost and leveling settings plus the setup record of every
/// provisioned guild.
///
/// Missing fields fall back to their defaults one by one:
///
/// ```
/// use nexus_core::GuildConfig;
///
/// let cfg: GuildConfig = serde_json::from_str(r#"{"level":{"messageXp":10}}"#).unwrap();
/// assert_eq!(cfg.level.message_xp, 10);
/// assert_eq!(cfg.level.cooldown_sec, 60);
/// assert_eq!(cfg.brand.server_name, "NEXUS Community");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuildConfig {
    /// Display metadata for welcome messages.
    pub brand: Brand,
    /// Scheduled content posting.
    pub autopost: AutopostConfig,
    /// Experience and level thresholds.
    pub level: LevelConfig,
    /// Setup state per guild.
    pub guild_setup: BTreeMap<GuildId, GuildSetup>,
}

impl GuildConfig {
    /// Replace zero or empty values with their defaults.
    ///
    /// Hand-edited documents may carry `0` intervals or an empty type list;
    /// those would otherwise disable cooldowns or make autopost pick from
    /// nothing.
    pub fn normalized(mut self) -> Self {
        let level_defaults = LevelConfig::default();
        if self.level.message_xp == 0 {
            self.level.message_xp = level_defaults.message_xp;
        }
        if self.level.cooldown_sec == 0 {
            self.level.cooldown_sec = level_defaults.cooldown_sec;
        }
        if self.autopost.interval_min == 0 {
            self.autopost.interval_min = AutopostConfig::default().interval_min;
        }
        self.autopost.types.sort();
        self.autopost.types.dedup();
        if self.autopost.types.is_empty() {
            self.autopost.types = ContentKind::all();
        }
        self
    }

    /// Whether provisioning already completed for `guild`.
    pub fn is_provisioned(&self, guild: GuildId) -> bool {
        self.guild_setup.get(&guild).is_some_and(|setup| setup.done)
    }

    /// Setup record of `guild`, if any.
    pub fn setup(&self, guild: GuildId) -> Option<&GuildSetup> {
        self.guild_setup.get(&guild)
    }
}

/// Display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Brand {
    /// Server name shown in the welcome title.
    pub server_name: String,
    /// Hex color such as `#00A3FF`.
    pub color: String,
    /// Large image shown in the welcome embed.
    pub banner_url: String,
    /// Thumbnail shown in the welcome embed.
    pub logo_url: String,
}

impl Default for Brand {
    fn default() -> Self {
        Self {
            server_name: "NEXUS Community".to_string(),
            color: "#00A3FF".to_string(),
            banner_url: String::new(),
            logo_url: String::new(),
        }
    }
}

impl Brand {
    /// Parse the configured color, falling back to [`DEFAULT_BRAND_COLOR`].
    ///
    /// ```
    /// use nexus_core::{Brand, DEFAULT_BRAND_COLOR};
    ///
    /// let mut brand = Brand::default();
    /// brand.color = "#FF0000".to_string();
    /// assert_eq!(brand.color_value(), 0xFF0000);
    /// brand.color = "teal".to_string();
    /// assert_eq!(brand.color_value(), DEFAULT_BRAND_COLOR);
    /// ```
    pub fn color_value(&self) -> u32 {
        u32::from_str_radix(self.color.trim().trim_start_matches('#'), 16)
            .ok()
            .filter(|c| *c <= 0xFF_FF_FF)
            .unwrap_or(DEFAULT_BRAND_COLOR)
    }
}

/// Environment overrides for [`Brand`], applied on every load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandOverrides {
    /// Overrides `serverName`.
    pub server_name: Option<String>,
    /// Overrides `color`.
    pub color: Option<String>,
    /// Overrides `bannerUrl`.
    pub banner_url: Option<String>,
    /// Overrides `logoUrl`.
    pub logo_url: Option<String>,
}

impl BrandOverrides {
    /// Apply every non-empty override to `brand`.
    pub fn apply(&self, brand: &mut Brand) {
        let pairs = [
            (&self.server_name, &mut brand.server_name),
            (&self.color, &mut brand.color),
            (&self.banner_url, &mut brand.banner_url),
            (&self.logo_url, &mut brand.logo_url),
        ];
        for (value, target) in pairs {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                *target = value.to_string();
            }
        }
    }
}

/// Category of scheduled content.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// Image link from the meme pool.
    #[display("meme")]
    Meme,
    /// Motivational quote.
    #[display("quote")]
    Quote,
    /// Fun fact.
    #[display("fact")]
    Fact,
}

impl ContentKind {
    /// Every kind, in declaration order.
    pub fn all() -> Vec<Self> {
        use strum::IntoEnumIterator;
        Self::iter().collect()
    }
}

/// Scheduled content posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutopostConfig {
    /// Master switch.
    pub enabled: bool,
    /// Destination channel. Defaults to the chat channel after provisioning.
    #[serde(deserialize_with = "empty_string_as_none")]
    pub channel_id: Option<ChannelId>,
    /// Enabled content categories.
    pub types: Vec<ContentKind>,
    /// Minimum minutes between posts (never below [`MIN_AUTOPOST_INTERVAL_MIN`]).
    pub interval_min: u64,
    /// Epoch milliseconds of the last post.
    pub last_post: i64,
}

impl Default for AutopostConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel_id: None,
            types: ContentKind::all(),
            interval_min: 180,
            last_post: 0,
        }
    }
}

impl AutopostConfig {
    /// Effective interval between posts in milliseconds.
    ///
    /// ```
    /// use nexus_core::AutopostConfig;
    ///
    /// let mut autopost = AutopostConfig::default();
    /// autopost.interval_min = 1;
    /// assert_eq!(autopost.interval_ms(), 5 * 60_000);
    /// ```
    pub fn interval_ms(&self) -> i64 {
        let minutes = self.interval_min.max(MIN_AUTOPOST_INTERVAL_MIN);
        i64::try_from(minutes.saturating_mul(60_000)).unwrap_or(i64::MAX)
    }
}

/// Experience settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelConfig {
    /// Experience granted per qualifying message.
    pub message_xp: u64,
    /// Seconds between two qualifying messages of the same member in a guild.
    pub cooldown_sec: u64,
    /// Roles granted once a level is reached, ordered by level.
    pub thresholds: Vec<LevelThreshold>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            message_xp: 5,
            cooldown_sec: 60,
            thresholds: vec![
                LevelThreshold::new(5, "VIP"),
                LevelThreshold::new(10, "Elite"),
            ],
        }
    }
}

impl LevelConfig {
    /// Names of every threshold role whose level is at most `level`.
    pub fn roles_due_at(&self, level: u64) -> Vec<String> {
        self.thresholds
            .iter()
            .filter(|t| t.level <= level)
            .map(|t| t.role_name.clone())
            .collect()
    }
}

/// A level requirement paired with the role it unlocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelThreshold {
    /// Required level.
    pub level: u64,
    /// Role granted on reaching it.
    pub role_name: String,
}

impl LevelThreshold {
    /// Create a threshold.
    pub fn new(level: u64, role_name: impl Into<String>) -> Self {
        Self {
            level,
            role_name: role_name.into(),
        }
    }
}

/// Result of provisioning one guild.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuildSetup {
    /// Set once the provisioning pass finished, even partially.
    pub done: bool,
    /// Logical channel name to channel id, `None` when creation failed.
    pub channels: BTreeMap<String, Option<ChannelId>>,
    /// Role name to role id, `None` when creation failed.
    pub roles: BTreeMap<String, Option<RoleId>>,
}

impl GuildSetup {
    /// Recorded id of a logical channel.
    pub fn channel(&self, name: &str) -> Option<ChannelId> {
        self.channels.get(name).copied().flatten()
    }

    /// Recorded id of a role.
    pub fn role(&self, name: &str) -> Option<RoleId> {
        self.roles.get(name).copied().flatten()
    }
}

// Older documents store an unset channel as "".
fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<ChannelId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) if s.is_empty() => Ok(None),
        Some(other) => ChannelId::deserialize(other)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

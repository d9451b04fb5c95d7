//! Core data types for the NEXUS community bot.
//!
//! This crate holds the three persisted documents and the platform
//! identifiers they reference:
//! - [`GuildConfig`] - branding, autopost, leveling and per-guild setup state
//! - [`UserProgress`] - per-member experience, keyed globally by user id
//! - [`VersionMarker`] - the last version announced to guilds
//!
//! Every document applies its defaults field by field while deserializing,
//! so partially written or older documents load cleanly.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod ids;
mod progress;
mod version;

pub use config::{
    AutopostConfig, Brand, BrandOverrides, ContentKind, DEFAULT_BRAND_COLOR, GuildConfig,
    GuildSetup, LevelConfig, LevelThreshold, MIN_AUTOPOST_INTERVAL_MIN,
};
pub use ids::{ChannelId, GuildId, MessageId, RoleId, UserId};
pub use progress::{UserProgress, UserProgressBook, XP_PER_LEVEL};
pub use version::VersionMarker;

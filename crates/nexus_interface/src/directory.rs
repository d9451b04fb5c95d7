//! Guild directory types: roles, channels and permission overwrites.

use nexus_core::{ChannelId, GuildId, RoleId, UserId};
use serde::{Deserialize, Serialize};

/// Permissions the bot assigns to roles and overwrites.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum Permission {
    /// See a channel.
    ViewChannel,
    /// Post in a text channel.
    SendMessages,
    /// Read earlier messages.
    ReadMessageHistory,
    /// Delete or pin messages of others.
    ManageMessages,
    /// Create, edit and delete channels.
    ManageChannels,
    /// Create and assign roles.
    ManageRoles,
    /// Edit guild settings.
    ManageGuild,
    /// Time out members.
    ModerateMembers,
}

/// Kind of a guild channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum ChannelKind {
    /// Container for other channels.
    Category,
    /// Text channel.
    Text,
    /// Voice channel.
    Voice,
    /// Anything else (threads, forums, stages).
    Other,
}

/// Who a permission overwrite applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverwriteTarget {
    /// A role, including `@everyone`.
    Role(RoleId),
    /// A single member.
    Member(UserId),
}

/// Channel-level permission overwrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionOverwrite {
    /// Role or member the overwrite targets.
    pub target: OverwriteTarget,
    /// Explicitly granted permissions.
    pub allow: Vec<Permission>,
    /// Explicitly denied permissions.
    pub deny: Vec<Permission>,
}

impl PermissionOverwrite {
    /// Overwrite for a role.
    pub fn role(role: RoleId, allow: &[Permission], deny: &[Permission]) -> Self {
        Self {
            target: OverwriteTarget::Role(role),
            allow: allow.to_vec(),
            deny: deny.to_vec(),
        }
    }

    /// Overwrite for a member.
    pub fn member(user: UserId, allow: &[Permission], deny: &[Permission]) -> Self {
        Self {
            target: OverwriteTarget::Member(user),
            allow: allow.to_vec(),
            deny: deny.to_vec(),
        }
    }
}

/// An existing role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleInfo {
    /// Role id.
    pub id: RoleId,
    /// Display name.
    pub name: String,
}

/// An existing guild channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    /// Channel id.
    pub id: ChannelId,
    /// Owning guild.
    pub guild: Option<GuildId>,
    /// Display name.
    pub name: String,
    /// Channel kind.
    pub kind: ChannelKind,
    /// Parent category.
    pub parent: Option<ChannelId>,
}

/// Attributes of a role to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRole {
    /// Display name.
    pub name: String,
    /// Shown separately in the member list.
    pub hoist: bool,
    /// Guild-wide permissions.
    pub permissions: Vec<Permission>,
}

/// Attributes of a channel or category to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewChannel {
    /// Display name.
    pub name: String,
    /// Channel kind.
    pub kind: ChannelKind,
    /// Parent category.
    pub parent: Option<ChannelId>,
    /// Channel topic, ignored for categories and voice channels.
    pub topic: Option<String>,
    /// Permission overwrites.
    pub overwrites: Vec<PermissionOverwrite>,
}

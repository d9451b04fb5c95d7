//! The platform capability trait.

use crate::{
    ChannelInfo, CommandSpec, InteractionHandle, InteractionReply, NewChannel, NewRole,
    OutgoingMessage, RoleInfo,
};
use async_trait::async_trait;
use nexus_core::{ChannelId, GuildId, MessageId, RoleId, UserId};
use nexus_error::PlatformResult;

/// Commands the automation core issues to a chat platform.
///
/// Implementations perform exactly one remote call per method and report
/// failures as [`nexus_error::PlatformError`]. They never retry; the core
/// decides which failures are tolerable.
///
/// # Example Implementation
///
/// ```rust,ignore
/// pub struct SerenityPlatform {
///     http: Arc<Http>,
/// }
///
/// #[async_trait]
/// impl Platform for SerenityPlatform {
///     async fn roles(&self, guild: GuildId) -> PlatformResult<Vec<RoleInfo>> {
///         let roles = serenity::all::GuildId::new(guild.get()).roles(&self.http).await?;
///         // ...
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait Platform: Send + Sync {
    /// Every role of `guild`.
    async fn roles(&self, guild: GuildId) -> PlatformResult<Vec<RoleInfo>>;

    /// Create a role in `guild`.
    async fn create_role(&self, guild: GuildId, role: &NewRole) -> PlatformResult<RoleInfo>;

    /// Every channel and category of `guild`.
    async fn channels(&self, guild: GuildId) -> PlatformResult<Vec<ChannelInfo>>;

    /// Create a channel or category in `guild`.
    async fn create_channel(
        &self,
        guild: GuildId,
        channel: &NewChannel,
    ) -> PlatformResult<ChannelInfo>;

    /// Fetch one channel by id.
    async fn channel(&self, channel: ChannelId) -> PlatformResult<ChannelInfo>;

    /// Delete a channel.
    async fn delete_channel(&self, channel: ChannelId) -> PlatformResult<()>;

    /// Send a message, returning its id.
    async fn send_message(
        &self,
        channel: ChannelId,
        message: &OutgoingMessage,
    ) -> PlatformResult<MessageId>;

    /// Delete a message.
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()>;

    /// Roles currently held by a member.
    async fn member_roles(&self, guild: GuildId, user: UserId) -> PlatformResult<Vec<RoleId>>;

    /// Grant a role to a member.
    async fn add_member_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> PlatformResult<()>;

    /// Revoke a role from a member.
    async fn remove_member_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> PlatformResult<()>;

    /// Send the initial response to an interaction.
    async fn respond(
        &self,
        interaction: &InteractionHandle,
        reply: &InteractionReply,
    ) -> PlatformResult<()>;

    /// Replace the content of the initial interaction response.
    async fn edit_response(
        &self,
        interaction: &InteractionHandle,
        content: &str,
    ) -> PlatformResult<()>;

    /// Replace the registered slash commands, for one guild or globally.
    async fn register_commands(
        &self,
        scope: Option<GuildId>,
        commands: &[CommandSpec],
    ) -> PlatformResult<()>;
}

//! Platform capabilities backed by the Discord REST API.

use crate::convert::{
    channel_info, create_channel, create_command, create_message, edit_role,
    interaction_response, sf_channel, sf_guild, sf_message, sf_role, sf_user,
};
use async_trait::async_trait;
use nexus_core::{ChannelId, GuildId, MessageId, RoleId, UserId};
use nexus_error::{PlatformError, PlatformErrorKind, PlatformResult};
use nexus_interface::{
    ChannelInfo, CommandSpec, InteractionHandle, InteractionReply, NewChannel, NewRole,
    OutgoingMessage, Platform, RoleInfo,
};
use serenity::all::{Command, EditInteractionResponse, InteractionId};
use serenity::http::Http;
use std::sync::Arc;
use tracing::{debug, instrument};

/// [`Platform`] implementation over Serenity's HTTP client.
///
/// Shares the HTTP client (and therefore its rate limiter) with the gateway
/// client it was taken from.
#[derive(Clone)]
pub struct SerenityPlatform {
    http: Arc<Http>,
}

impl SerenityPlatform {
    /// Wrap an existing HTTP client.
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    fn http(&self) -> &Http {
        &self.http
    }
}

#[async_trait]
impl Platform for SerenityPlatform {
    #[instrument(skip_all, fields(guild = %guild))]
    async fn roles(&self, guild: GuildId) -> PlatformResult<Vec<RoleInfo>> {
        let roles = self.http.get_guild_roles(sf_guild(guild)).await?;
        debug!(count = roles.len(), "Fetched roles");
        Ok(roles
            .into_iter()
            .map(|role| RoleInfo {
                id: RoleId(role.id.get()),
                name: role.name,
            })
            .collect())
    }

    #[instrument(skip_all, fields(guild = %guild, name = %role.name))]
    async fn create_role(&self, guild: GuildId, role: &NewRole) -> PlatformResult<RoleInfo> {
        let created = sf_guild(guild)
            .create_role(self.http(), edit_role(role))
            .await?;
        debug!(role = %created.id, "Created role");
        Ok(RoleInfo {
            id: RoleId(created.id.get()),
            name: created.name,
        })
    }

    #[instrument(skip_all, fields(guild = %guild))]
    async fn channels(&self, guild: GuildId) -> PlatformResult<Vec<ChannelInfo>> {
        let channels = self.http.get_channels(sf_guild(guild)).await?;
        debug!(count = channels.len(), "Fetched channels");
        Ok(channels.into_iter().map(channel_info).collect())
    }

    #[instrument(skip_all, fields(guild = %guild, name = %channel.name))]
    async fn create_channel(
        &self,
        guild: GuildId,
        channel: &NewChannel,
    ) -> PlatformResult<ChannelInfo> {
        let created = sf_guild(guild)
            .create_channel(self.http(), create_channel(channel))
            .await?;
        debug!(channel = %created.id, "Created channel");
        Ok(channel_info(created))
    }

    #[instrument(skip_all, fields(channel = %channel))]
    async fn channel(&self, channel: ChannelId) -> PlatformResult<ChannelInfo> {
        self.http
            .get_channel(sf_channel(channel))
            .await?
            .guild()
            .map(channel_info)
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::ChannelNotFound(channel.get())))
    }

    #[instrument(skip_all, fields(channel = %channel))]
    async fn delete_channel(&self, channel: ChannelId) -> PlatformResult<()> {
        self.http.delete_channel(sf_channel(channel), None).await?;
        Ok(())
    }

    #[instrument(skip_all, fields(channel = %channel))]
    async fn send_message(
        &self,
        channel: ChannelId,
        message: &OutgoingMessage,
    ) -> PlatformResult<MessageId> {
        let sent = sf_channel(channel)
            .send_message(self.http(), create_message(message))
            .await
            .map_err(|e| PlatformError::new(PlatformErrorKind::MessageSendFailed(e.to_string())))?;
        Ok(MessageId(sent.id.get()))
    }

    #[instrument(skip_all, fields(channel = %channel, message = %message))]
    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        self.http
            .delete_message(sf_channel(channel), sf_message(message), None)
            .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(guild = %guild, user = %user))]
    async fn member_roles(&self, guild: GuildId, user: UserId) -> PlatformResult<Vec<RoleId>> {
        let member = self.http.get_member(sf_guild(guild), sf_user(user)).await?;
        Ok(member.roles.iter().map(|role| RoleId(role.get())).collect())
    }

    #[instrument(skip_all, fields(guild = %guild, user = %user, role = %role))]
    async fn add_member_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> PlatformResult<()> {
        self.http
            .add_member_role(sf_guild(guild), sf_user(user), sf_role(role), None)
            .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(guild = %guild, user = %user, role = %role))]
    async fn remove_member_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> PlatformResult<()> {
        self.http
            .remove_member_role(sf_guild(guild), sf_user(user), sf_role(role), None)
            .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(interaction = interaction.id))]
    async fn respond(
        &self,
        interaction: &InteractionHandle,
        reply: &InteractionReply,
    ) -> PlatformResult<()> {
        self.http
            .create_interaction_response(
                InteractionId::new(interaction.id),
                &interaction.token,
                &interaction_response(reply),
                Vec::new(),
            )
            .await
            .map_err(|e| PlatformError::new(PlatformErrorKind::InteractionFailed(e.to_string())))
    }

    #[instrument(skip_all, fields(interaction = interaction.id))]
    async fn edit_response(
        &self,
        interaction: &InteractionHandle,
        content: &str,
    ) -> PlatformResult<()> {
        self.http
            .edit_original_interaction_response(
                &interaction.token,
                &EditInteractionResponse::new().content(content),
                Vec::new(),
            )
            .await
            .map_err(|e| PlatformError::new(PlatformErrorKind::InteractionFailed(e.to_string())))?;
        Ok(())
    }

    #[instrument(skip_all, fields(count = commands.len()))]
    async fn register_commands(
        &self,
        scope: Option<GuildId>,
        commands: &[CommandSpec],
    ) -> PlatformResult<()> {
        let commands = commands.iter().map(create_command).collect();
        match scope {
            Some(guild) => {
                sf_guild(guild).set_commands(self.http(), commands).await?;
            }
            None => {
                Command::set_global_commands(self.http(), commands).await?;
            }
        }
        Ok(())
    }
}

//! Mapping between core types and Serenity models.

use nexus_core::{ChannelId, GuildId, MessageId, RoleId, UserId};
use nexus_interface::{
    ChannelInfo, ChannelKind, CommandSpec, Embed, InteractionReply, NewChannel, NewRole,
    OutgoingMessage, OverwriteTarget, Permission, PermissionOverwrite,
};
use serenity::all::{
    ButtonStyle, ChannelType, CreateActionRow, CreateButton, CreateChannel, CreateCommand,
    CreateEmbed, CreateEmbedAuthor, CreateEmbedFooter, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, EditRole, GuildChannel,
    PermissionOverwriteType, Permissions, Timestamp,
};

/// Milliseconds since 2015-01-01, the Discord epoch.
const DISCORD_EPOCH_MS: u64 = 1_420_070_400_000;

/// Creation time of a Discord snowflake in epoch milliseconds.
///
/// ```
/// use nexus_discord::snowflake_ms;
///
/// assert_eq!(snowflake_ms(175928847299117063), 1462015105796);
/// ```
pub fn snowflake_ms(id: u64) -> i64 {
    ((id >> 22) + DISCORD_EPOCH_MS) as i64
}

pub(crate) fn sf_guild(id: GuildId) -> serenity::all::GuildId {
    serenity::all::GuildId::new(id.get())
}

pub(crate) fn sf_channel(id: ChannelId) -> serenity::all::ChannelId {
    serenity::all::ChannelId::new(id.get())
}

pub(crate) fn sf_role(id: RoleId) -> serenity::all::RoleId {
    serenity::all::RoleId::new(id.get())
}

pub(crate) fn sf_user(id: UserId) -> serenity::all::UserId {
    serenity::all::UserId::new(id.get())
}

pub(crate) fn sf_message(id: MessageId) -> serenity::all::MessageId {
    serenity::all::MessageId::new(id.get())
}

pub(crate) fn permission_bits(permissions: &[Permission]) -> Permissions {
    permissions
        .iter()
        .fold(Permissions::empty(), |bits, permission| {
            bits | match permission {
                Permission::ViewChannel => Permissions::VIEW_CHANNEL,
                Permission::SendMessages => Permissions::SEND_MESSAGES,
                Permission::ReadMessageHistory => Permissions::READ_MESSAGE_HISTORY,
                Permission::ManageMessages => Permissions::MANAGE_MESSAGES,
                Permission::ManageChannels => Permissions::MANAGE_CHANNELS,
                Permission::ManageRoles => Permissions::MANAGE_ROLES,
                Permission::ManageGuild => Permissions::MANAGE_GUILD,
                Permission::ModerateMembers => Permissions::MODERATE_MEMBERS,
            }
        })
}

fn overwrite(overwrite: &PermissionOverwrite) -> serenity::all::PermissionOverwrite {
    let kind = match overwrite.target {
        OverwriteTarget::Role(role) => PermissionOverwriteType::Role(sf_role(role)),
        OverwriteTarget::Member(user) => PermissionOverwriteType::Member(sf_user(user)),
    };
    serenity::all::PermissionOverwrite {
        allow: permission_bits(&overwrite.allow),
        deny: permission_bits(&overwrite.deny),
        kind,
    }
}

pub(crate) fn channel_kind(kind: ChannelType) -> ChannelKind {
    match kind {
        ChannelType::Category => ChannelKind::Category,
        ChannelType::Text => ChannelKind::Text,
        ChannelType::Voice => ChannelKind::Voice,
        _ => ChannelKind::Other,
    }
}

fn channel_type(kind: ChannelKind) -> ChannelType {
    match kind {
        ChannelKind::Category => ChannelType::Category,
        ChannelKind::Voice => ChannelType::Voice,
        ChannelKind::Text | ChannelKind::Other => ChannelType::Text,
    }
}

pub(crate) fn channel_info(channel: GuildChannel) -> ChannelInfo {
    ChannelInfo {
        id: ChannelId(channel.id.get()),
        guild: Some(GuildId(channel.guild_id.get())),
        name: channel.name,
        kind: channel_kind(channel.kind),
        parent: channel.parent_id.map(|parent| ChannelId(parent.get())),
    }
}

pub(crate) fn edit_role(role: &NewRole) -> EditRole<'static> {
    EditRole::new()
        .name(role.name.clone())
        .hoist(role.hoist)
        .permissions(permission_bits(&role.permissions))
}

pub(crate) fn create_channel(channel: &NewChannel) -> CreateChannel<'static> {
    let mut builder = CreateChannel::new(channel.name.clone())
        .kind(channel_type(channel.kind))
        .permissions(channel.overwrites.iter().map(overwrite).collect::<Vec<_>>());
    if let Some(parent) = channel.parent {
        builder = builder.category(sf_channel(parent));
    }
    // Topics only exist on text channels.
    if let (ChannelKind::Text, Some(topic)) = (channel.kind, &channel.topic) {
        builder = builder.topic(topic.clone());
    }
    builder
}

pub(crate) fn create_embed(embed: &Embed) -> CreateEmbed {
    let mut builder = CreateEmbed::new();
    if let Some(title) = &embed.title {
        builder = builder.title(title.clone());
    }
    if let Some(description) = &embed.description {
        builder = builder.description(description.clone());
    }
    if let Some(color) = embed.color {
        builder = builder.color(color);
    }
    if let Some(author) = &embed.author {
        builder = builder.author(CreateEmbedAuthor::new(author.clone()));
    }
    if let Some(footer) = &embed.footer {
        builder = builder.footer(CreateEmbedFooter::new(footer.clone()));
    }
    if let Some(image) = &embed.image_url {
        builder = builder.image(image.clone());
    }
    if let Some(thumbnail) = &embed.thumbnail_url {
        builder = builder.thumbnail(thumbnail.clone());
    }
    if let Some(timestamp) = embed
        .timestamp_ms
        .and_then(|ms| Timestamp::from_unix_timestamp(ms.div_euclid(1000)).ok())
    {
        builder = builder.timestamp(timestamp);
    }
    builder
}

pub(crate) fn create_message(message: &OutgoingMessage) -> CreateMessage {
    let mut builder = CreateMessage::new().embeds(message.embeds.iter().map(create_embed).collect());
    if let Some(content) = &message.content {
        builder = builder.content(content.clone());
    }
    if !message.buttons.is_empty() {
        let buttons = message
            .buttons
            .iter()
            .map(|button| {
                CreateButton::new(button.custom_id.clone())
                    .label(button.label.clone())
                    .style(ButtonStyle::Primary)
            })
            .collect();
        builder = builder.components(vec![CreateActionRow::Buttons(buttons)]);
    }
    builder
}

pub(crate) fn interaction_response(reply: &InteractionReply) -> CreateInteractionResponse {
    CreateInteractionResponse::Message(
        CreateInteractionResponseMessage::new()
            .content(reply.content.clone())
            .ephemeral(reply.ephemeral),
    )
}

pub(crate) fn create_command(command: &CommandSpec) -> CreateCommand {
    CreateCommand::new(command.name.clone()).description(command.description.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_interface::Button;

    #[test]
    fn test_snowflake_epoch() {
        assert_eq!(snowflake_ms(0), DISCORD_EPOCH_MS as i64);
        assert_eq!(snowflake_ms(1 << 22), DISCORD_EPOCH_MS as i64 + 1);
    }

    #[test]
    fn test_permission_bits_combine() {
        let bits = permission_bits(&[Permission::ViewChannel, Permission::SendMessages]);
        assert_eq!(bits, Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES);
        assert!(permission_bits(&[]).is_empty());
    }

    #[test]
    fn test_overwrite_targets() {
        let role = overwrite(&PermissionOverwrite::role(
            RoleId(10),
            &[],
            &[Permission::ViewChannel],
        ));
        assert_eq!(
            role.kind,
            PermissionOverwriteType::Role(serenity::all::RoleId::new(10))
        );
        assert_eq!(role.deny, Permissions::VIEW_CHANNEL);
        assert!(role.allow.is_empty());

        let member = overwrite(&PermissionOverwrite::member(
            UserId(20),
            &[Permission::SendMessages],
            &[],
        ));
        assert_eq!(
            member.kind,
            PermissionOverwriteType::Member(serenity::all::UserId::new(20))
        );
    }

    #[test]
    fn test_channel_kinds() {
        assert_eq!(channel_kind(ChannelType::Text), ChannelKind::Text);
        assert_eq!(channel_kind(ChannelType::Category), ChannelKind::Category);
        assert_eq!(channel_kind(ChannelType::Voice), ChannelKind::Voice);
        assert_eq!(channel_kind(ChannelType::PublicThread), ChannelKind::Other);
        assert_eq!(channel_type(ChannelKind::Other), ChannelType::Text);
    }

    #[test]
    fn test_embed_fields_serialized() {
        let embed = Embed::default()
            .title("📢 Update 3.3.1")
            .color(0x00A3FF)
            .footer("#chat • ⭐ 3 • 1")
            .timestamp_ms(1_700_000_000_000);
        let json = serde_json::to_value(create_embed(&embed)).unwrap();
        assert_eq!(json["title"], "📢 Update 3.3.1");
        assert_eq!(json["color"], 0x00A3FF);
        assert_eq!(json["footer"]["text"], "#chat • ⭐ 3 • 1");
        assert!(json["timestamp"].is_string());
        assert!(json.get("image").is_none());
    }

    #[test]
    fn test_message_with_buttons() {
        let message = OutgoingMessage::text("Pick your roles:")
            .buttons(vec![Button::new("rr_gaming", "Gaming")]);
        let json = serde_json::to_value(create_message(&message)).unwrap();
        assert_eq!(json["content"], "Pick your roles:");
        assert_eq!(json["components"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_ephemeral_reply_flag() {
        let json =
            serde_json::to_value(interaction_response(&InteractionReply::ephemeral("x"))).unwrap();
        assert_eq!(json["data"]["content"], "x");
    }
}

//! Transport-neutral events delivered to the automation core.

use crate::InteractionHandle;
use nexus_core::{ChannelId, GuildId, MessageId, UserId};

/// One unit of work for the automation dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum AutomationEvent {
    /// Connected; the bot is a member of `guilds`.
    #[display("ready")]
    Ready {
        /// Guilds visible at startup.
        guilds: Vec<GuildSummary>,
    },
    /// The bot was added to a guild.
    #[display("guild_joined")]
    GuildJoined(GuildSummary),
    /// The bot was removed from a guild.
    #[display("guild_left")]
    GuildLeft(GuildId),
    /// A member joined a guild.
    #[display("member_joined")]
    MemberJoined(MemberEvent),
    /// A member left a guild.
    #[display("member_left")]
    MemberLeft(MemberEvent),
    /// A message was posted in a guild channel.
    #[display("message_created")]
    MessageCreated(MessageEvent),
    /// A reaction was added to a guild message.
    #[display("reaction_added")]
    ReactionAdded(ReactionEvent),
    /// A slash command was invoked.
    #[display("command_invoked")]
    CommandInvoked(CommandEvent),
    /// A button was clicked.
    #[display("component_invoked")]
    ComponentInvoked(ComponentEvent),
    /// Periodic autopost poll.
    #[display("autopost_tick")]
    AutopostTick {
        /// Epoch milliseconds of the tick.
        now_ms: i64,
    },
}

/// Identity of a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildSummary {
    /// Guild id.
    pub id: GuildId,
    /// Guild name.
    pub name: String,
}

impl GuildSummary {
    /// Describe a guild.
    pub fn new(id: GuildId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Membership change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberEvent {
    /// Guild joined or left.
    pub guild: GuildId,
    /// Name of that guild.
    pub guild_name: String,
    /// Member.
    pub user: UserId,
    /// Display tag such as `name` or `name#1234`.
    pub user_tag: String,
}

/// A newly created guild message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Guild of the channel.
    pub guild: GuildId,
    /// Channel the message was posted in.
    pub channel: ChannelId,
    /// Message id.
    pub message: MessageId,
    /// Author.
    pub author: UserId,
    /// Whether the author is a bot or webhook.
    pub author_bot: bool,
    /// Message body.
    pub content: String,
    /// Epoch milliseconds the message was received.
    pub received_at_ms: i64,
}

/// A reaction added to a message, with the message state at that moment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionEvent {
    /// Guild of the channel.
    pub guild: GuildId,
    /// Channel of the reacted message.
    pub channel: ChannelId,
    /// Name of that channel, when it could be resolved.
    pub channel_name: Option<String>,
    /// Reacted message.
    pub message: MessageId,
    /// User who reacted.
    pub reactor: UserId,
    /// Whether the reacting account is a bot.
    pub reactor_bot: bool,
    /// Unicode emoji, or the custom emoji name.
    pub emoji: String,
    /// Current total count of this emoji on the message.
    pub count: u64,
    /// Tag of the message author.
    pub author_tag: Option<String>,
    /// Message body.
    pub content: String,
    /// Epoch milliseconds the message was created.
    pub created_at_ms: i64,
    /// Attachment URLs in message order.
    pub attachments: Vec<String>,
}

/// A slash command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    /// Handle used to answer.
    pub interaction: InteractionHandle,
    /// Command name.
    pub name: String,
    /// Guild, absent in direct messages.
    pub guild: Option<GuildId>,
    /// Channel the command was used in.
    pub channel: ChannelId,
    /// Invoking user.
    pub user: UserId,
    /// Username of the invoking user.
    pub username: String,
    /// Display tag of the invoking user.
    pub user_tag: String,
    /// Epoch milliseconds the interaction was created.
    pub created_at_ms: i64,
}

/// A button click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentEvent {
    /// Handle used to answer.
    pub interaction: InteractionHandle,
    /// Id of the clicked button.
    pub custom_id: String,
    /// Guild, absent in direct messages.
    pub guild: Option<GuildId>,
    /// Clicking user.
    pub user: UserId,
}

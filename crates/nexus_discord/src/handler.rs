//! Gateway event translation.

use crate::convert::{sf_guild, snowflake_ms};
use nexus_core::{ChannelId, GuildId, MessageId, UserId};
use nexus_interface::{
    AutomationEvent, CommandEvent, ComponentEvent, GuildSummary, InteractionHandle, MemberEvent,
    MessageEvent, ReactionEvent,
};
use parking_lot::Mutex;
use serenity::all::{
    Context, EventHandler, GatewayIntents, Guild, Interaction, Member, Message, Reaction,
    ReactionType, Ready, UnavailableGuild, User,
};
use serenity::async_trait;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

/// Only star reactions are enriched and forwarded.
const STAR: &str = "⭐";

/// Guilds the bot is known to be in, with their names.
///
/// Guild create events are replayed for every guild after each connect; only
/// guilds missing from the roster count as newly joined. Membership comes
/// from the ready payload, names arrive later.
#[derive(Debug, Default)]
pub(crate) struct GuildRoster {
    inner: Mutex<RosterState>,
}

#[derive(Debug, Default)]
struct RosterState {
    names: HashMap<GuildId, String>,
    // No guild counts as new until a ready payload listed the current ones.
    seeded: bool,
}

impl GuildRoster {
    /// Replace the membership with `guilds`, keeping names already known.
    pub(crate) fn seed(&self, guilds: &[GuildId]) {
        let mut state = self.inner.lock();
        let names = guilds
            .iter()
            .map(|id| (*id, state.names.get(id).cloned().unwrap_or_default()))
            .collect();
        state.names = names;
        state.seeded = true;
    }

    /// Record a guild and its name; returns whether it was newly joined.
    pub(crate) fn insert(&self, guild: GuildId, name: &str) -> bool {
        let mut state = self.inner.lock();
        let unknown = state.names.insert(guild, name.to_string()).is_none();
        unknown && state.seeded
    }

    /// Set the name of a guild still in the roster.
    pub(crate) fn rename(&self, guild: GuildId, name: &str) {
        if let Some(entry) = self.inner.lock().names.get_mut(&guild) {
            *entry = name.to_string();
        }
    }

    /// Drop a guild; returns whether it was present.
    pub(crate) fn remove(&self, guild: GuildId) -> bool {
        self.inner.lock().names.remove(&guild).is_some()
    }

    /// Name of a guild, empty when unknown or not fetched yet.
    pub(crate) fn name(&self, guild: GuildId) -> String {
        self.inner
            .lock()
            .names
            .get(&guild)
            .cloned()
            .unwrap_or_default()
    }
}

/// Serenity event handler feeding the automation dispatcher.
///
/// Events are forwarded over a bounded channel so they are processed one at
/// a time in arrival order.
pub struct NexusHandler {
    events: mpsc::Sender<AutomationEvent>,
    roster: GuildRoster,
}

impl NexusHandler {
    /// Create a handler forwarding into `events`.
    pub fn new(events: mpsc::Sender<AutomationEvent>) -> Self {
        Self {
            events,
            roster: GuildRoster::default(),
        }
    }

    /// Gateway intents the automation needs.
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILDS
            | GatewayIntents::GUILD_MEMBERS
            | GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::GUILD_MESSAGE_REACTIONS
            | GatewayIntents::MESSAGE_CONTENT
    }

    async fn forward(&self, event: AutomationEvent) {
        let name = event.to_string();
        if self.events.send(event).await.is_err() {
            warn!(event = %name, "Dispatcher stopped, dropping event");
        }
    }
}

fn core_guild(id: serenity::all::GuildId) -> GuildId {
    GuildId(id.get())
}

fn core_user(id: serenity::all::UserId) -> UserId {
    UserId(id.get())
}

fn member_event(guild: GuildId, guild_name: String, user: &User) -> MemberEvent {
    MemberEvent {
        guild,
        guild_name,
        user: core_user(user.id),
        user_tag: user.tag(),
    }
}

fn is_star(emoji: &ReactionType) -> bool {
    matches!(emoji, ReactionType::Unicode(text) if text == STAR)
}

#[async_trait]
impl EventHandler for NexusHandler {
    #[instrument(skip_all, fields(guilds = ready.guilds.len()))]
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!(user = %ready.user.name, "Connected to Discord");

        let ids: Vec<GuildId> = ready.guilds.iter().map(|g| core_guild(g.id)).collect();
        self.roster.seed(&ids);

        let mut guilds = Vec::with_capacity(ids.len());
        for id in ids {
            let known = self.roster.name(id);
            let name = if !known.is_empty() {
                known
            } else {
                match ctx.http.get_guild(sf_guild(id)).await {
                    Ok(guild) => guild.name,
                    Err(e) => {
                        warn!(guild = %id, error = %e, "Could not fetch guild name");
                        id.to_string()
                    }
                }
            };
            self.roster.rename(id, &name);
            guilds.push(GuildSummary::new(id, name));
        }
        self.forward(AutomationEvent::Ready { guilds }).await;
    }

    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: Option<bool>) {
        let id = core_guild(guild.id);
        if self.roster.insert(id, &guild.name) {
            self.forward(AutomationEvent::GuildJoined(GuildSummary::new(id, guild.name)))
                .await;
        }
    }

    async fn guild_delete(
        &self,
        _ctx: Context,
        incomplete: UnavailableGuild,
        _full: Option<Guild>,
    ) {
        // Outages are reported as unavailable; the bot is still a member.
        if incomplete.unavailable {
            debug!(guild = %incomplete.id, "Guild unavailable");
            return;
        }
        let id = core_guild(incomplete.id);
        if self.roster.remove(id) {
            self.forward(AutomationEvent::GuildLeft(id)).await;
        }
    }

    async fn guild_member_addition(&self, _ctx: Context, new_member: Member) {
        let guild = core_guild(new_member.guild_id);
        let event = member_event(guild, self.roster.name(guild), &new_member.user);
        self.forward(AutomationEvent::MemberJoined(event)).await;
    }

    async fn guild_member_removal(
        &self,
        _ctx: Context,
        guild_id: serenity::all::GuildId,
        user: User,
        _member_data_if_available: Option<Member>,
    ) {
        let guild = core_guild(guild_id);
        let event = member_event(guild, self.roster.name(guild), &user);
        self.forward(AutomationEvent::MemberLeft(event)).await;
    }

    async fn message(&self, _ctx: Context, new_message: Message) {
        let Some(guild) = new_message.guild_id else {
            return;
        };
        let event = MessageEvent {
            guild: core_guild(guild),
            channel: ChannelId(new_message.channel_id.get()),
            message: MessageId(new_message.id.get()),
            author: core_user(new_message.author.id),
            author_bot: new_message.author.bot,
            received_at_ms: snowflake_ms(new_message.id.get()),
            content: new_message.content,
        };
        self.forward(AutomationEvent::MessageCreated(event)).await;
    }

    #[instrument(skip_all, fields(message = %add_reaction.message_id))]
    async fn reaction_add(&self, ctx: Context, add_reaction: Reaction) {
        let (Some(guild), Some(reactor)) = (add_reaction.guild_id, add_reaction.user_id) else {
            return;
        };
        if !is_star(&add_reaction.emoji) {
            return;
        }

        let reactor_bot = match &add_reaction.member {
            Some(member) => member.user.bot,
            None => match ctx.http.get_user(reactor).await {
                Ok(user) => user.bot,
                Err(e) => {
                    warn!(error = %e, "Could not fetch reacting user");
                    return;
                }
            },
        };
        let message = match ctx
            .http
            .get_message(add_reaction.channel_id, add_reaction.message_id)
            .await
        {
            Ok(message) => message,
            Err(e) => {
                warn!(error = %e, "Could not fetch reacted message");
                return;
            }
        };
        let count = message
            .reactions
            .iter()
            .find(|reaction| is_star(&reaction.reaction_type))
            .map(|reaction| reaction.count)
            .unwrap_or(1);
        let channel_name = ctx
            .http
            .get_channel(add_reaction.channel_id)
            .await
            .ok()
            .and_then(|channel| channel.guild())
            .map(|channel| channel.name);
        debug!(count, "Star reaction");

        let event = ReactionEvent {
            guild: core_guild(guild),
            channel: ChannelId(add_reaction.channel_id.get()),
            channel_name,
            message: MessageId(message.id.get()),
            reactor: core_user(reactor),
            reactor_bot,
            emoji: STAR.to_string(),
            count,
            author_tag: Some(message.author.tag()),
            created_at_ms: snowflake_ms(message.id.get()),
            attachments: message
                .attachments
                .iter()
                .map(|attachment| attachment.url.clone())
                .collect(),
            content: message.content,
        };
        self.forward(AutomationEvent::ReactionAdded(event)).await;
    }

    async fn interaction_create(&self, _ctx: Context, interaction: Interaction) {
        let event = match interaction {
            Interaction::Command(command) => AutomationEvent::CommandInvoked(CommandEvent {
                interaction: InteractionHandle {
                    id: command.id.get(),
                    token: command.token.clone(),
                },
                name: command.data.name.clone(),
                guild: command.guild_id.map(core_guild),
                channel: ChannelId(command.channel_id.get()),
                user: core_user(command.user.id),
                username: command.user.name.clone(),
                user_tag: command.user.tag(),
                created_at_ms: snowflake_ms(command.id.get()),
            }),
            Interaction::Component(component) => {
                AutomationEvent::ComponentInvoked(ComponentEvent {
                    interaction: InteractionHandle {
                        id: component.id.get(),
                        token: component.token.clone(),
                    },
                    custom_id: component.data.custom_id.clone(),
                    guild: component.guild_id.map(core_guild),
                    user: core_user(component.user.id),
                })
            }
            _ => return,
        };
        self.forward(event).await;
    }
}

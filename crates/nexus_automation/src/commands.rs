//! Slash commands, tickets and role-selection buttons.

use crate::{Context, attempt, provisioning::same_name};
use nexus_core::{ChannelId, GuildId, RoleId};
use nexus_error::NexusResult;
use nexus_interface::{
    ChannelKind, CommandEvent, CommandSpec, ComponentEvent, InteractionHandle, InteractionReply,
    NewChannel, OutgoingMessage, Permission, PermissionOverwrite, Platform,
};
use nexus_storage::DocumentStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Registered slash commands as (name, description).
pub const COMMANDS: [(&str, &str); 4] = [
    ("ping", "Shows the bot latency"),
    ("help", "Lists the available commands"),
    ("ticket-open", "Opens a private support ticket"),
    ("ticket-close", "Closes the current ticket"),
];

/// Role-selection buttons as (custom id, role name).
pub const ROLE_BUTTONS: [(&str, &str); 3] = [
    ("rr_gaming", "Gaming"),
    ("rr_music", "Music"),
    ("rr_tech", "Tech"),
];

/// Delay between the close reply and the ticket channel deletion.
pub const TICKET_CLOSE_DELAY: Duration = Duration::from_secs(3);

const HELP_TEXT: &str = "NEXUS BOT is active ✅. Tickets: **/ticket-open**. Roles: buttons in **#welcome**. Updates and autopost run automatically.";

/// Declarations for [`COMMANDS`].
pub fn command_specs() -> Vec<CommandSpec> {
    COMMANDS
        .iter()
        .map(|(name, description)| CommandSpec::new(*name, *description))
        .collect()
}

/// Channel name for a member's ticket: lower-cased, `[a-z0-9-]` only.
///
/// ```
/// use nexus_automation::ticket_channel_name;
///
/// assert_eq!(ticket_channel_name("Alice_W.99"), "ticket-alicew99");
/// ```
pub fn ticket_channel_name(username: &str) -> String {
    format!("ticket-{}", username)
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Answers slash commands and role-selection buttons.
pub struct CommandRouter<P, S> {
    ctx: Context<P, S>,
}

impl<P: Platform + 'static, S: DocumentStore> CommandRouter<P, S> {
    /// Create a router.
    pub fn new(ctx: Context<P, S>) -> Self {
        Self { ctx }
    }

    /// Register [`COMMANDS`] for the development guild, or globally.
    #[instrument(skip_all)]
    pub async fn register(&self) -> bool {
        let scope = *self.ctx.settings.dev_guild();
        let registered = attempt(
            "register commands",
            self.ctx
                .platform
                .register_commands(scope, &command_specs()),
        )
        .await
        .is_some();
        if registered {
            info!(guild_scoped = scope.is_some(), "Commands registered");
        }
        registered
    }

    /// Handle a slash command.
    #[instrument(skip_all, fields(command = %command.name, user = %command.user))]
    pub async fn on_command(&self, command: &CommandEvent) -> NexusResult<()> {
        match command.name.as_str() {
            "ping" => self.ping(command).await,
            "help" => {
                self.reply(&command.interaction, InteractionReply::ephemeral(HELP_TEXT))
                    .await;
            }
            "ticket-open" => self.ticket_open(command).await,
            "ticket-close" => self.ticket_close(command).await,
            other => debug!(command = other, "Unknown command"),
        }
        Ok(())
    }

    /// Toggle the role behind a role-selection button.
    #[instrument(skip_all, fields(custom_id = %component.custom_id, user = %component.user))]
    pub async fn on_component(&self, component: &ComponentEvent) -> NexusResult<()> {
        let Some((_, role_name)) = ROLE_BUTTONS
            .iter()
            .find(|(custom_id, _)| *custom_id == component.custom_id)
        else {
            debug!("Unknown component");
            return Ok(());
        };
        let Some(guild) = component.guild else {
            return Ok(());
        };

        let config = self.ctx.load_config().await?;
        let recorded = config.setup(guild).and_then(|setup| setup.role(role_name));
        let role = match recorded {
            Some(role) => Some(role),
            None => self.role_by_name(guild, role_name).await,
        };
        let Some(role) = role else {
            self.reply(
                &component.interaction,
                InteractionReply::ephemeral(format!("The **{}** role is not available.", role_name)),
            )
            .await;
            return Ok(());
        };

        let platform = self.ctx.platform.as_ref();
        let Some(held) = attempt("fetch member roles", platform.member_roles(guild, component.user))
            .await
        else {
            self.reply(
                &component.interaction,
                InteractionReply::ephemeral("Could not read your roles, try again later."),
            )
            .await;
            return Ok(());
        };

        let reply = if held.contains(&role) {
            attempt(
                "remove selected role",
                platform.remove_member_role(guild, component.user, role),
            )
            .await
            .map(|_| format!("Removed the **{}** role.", role_name))
        } else {
            attempt(
                "add selected role",
                platform.add_member_role(guild, component.user, role),
            )
            .await
            .map(|_| format!("You now have the **{}** role.", role_name))
        };
        let reply =
            reply.unwrap_or_else(|| format!("Could not update the **{}** role.", role_name));
        self.reply(&component.interaction, InteractionReply::ephemeral(reply))
            .await;
        Ok(())
    }

    async fn ping(&self, command: &CommandEvent) {
        if !self
            .reply(&command.interaction, InteractionReply::public("Pong!"))
            .await
        {
            return;
        }
        let latency = (chrono::Utc::now().timestamp_millis() - command.created_at_ms).max(0);
        attempt(
            "edit ping reply",
            self.ctx.platform.edit_response(
                &command.interaction,
                &format!("Pong! Latency: **{} ms**", latency),
            ),
        )
        .await;
    }

    async fn ticket_open(&self, command: &CommandEvent) {
        let Some(guild) = command.guild else {
            self.reply(
                &command.interaction,
                InteractionReply::ephemeral("Tickets can only be opened inside a server."),
            )
            .await;
            return;
        };
        let platform = self.ctx.platform.as_ref();

        let channels = attempt("list channels", platform.channels(guild))
            .await
            .unwrap_or_default();
        let Some(category) = channels
            .iter()
            .find(|c| c.kind == ChannelKind::Category && c.name.contains("Support"))
        else {
            self.reply(
                &command.interaction,
                InteractionReply::ephemeral("Support category not found."),
            )
            .await;
            return;
        };

        let spec = ticket_channel(guild, category.id, command);
        let Some(ticket) = attempt("create ticket", platform.create_channel(guild, &spec)).await
        else {
            self.reply(
                &command.interaction,
                InteractionReply::ephemeral("Could not create the ticket channel."),
            )
            .await;
            return;
        };

        info!(channel = %ticket.id, "Ticket opened");
        self.reply(
            &command.interaction,
            InteractionReply::ephemeral(format!("Ticket created: <#{}>", ticket.id)),
        )
        .await;
        let greeting = OutgoingMessage::text(format!(
            "Hello <@{}>, a team member will be with you shortly.",
            command.user
        ));
        attempt(
            "greet in ticket",
            platform.send_message(ticket.id, &greeting),
        )
        .await;
    }

    async fn ticket_close(&self, command: &CommandEvent) {
        let channel = attempt("fetch channel", self.ctx.platform.channel(command.channel)).await;
        let is_ticket = channel.is_some_and(|c| {
            c.kind == ChannelKind::Text && c.name.starts_with("ticket-")
        });
        if !is_ticket {
            self.reply(
                &command.interaction,
                InteractionReply::ephemeral("Only usable in ticket channels."),
            )
            .await;
            return;
        }

        self.reply(
            &command.interaction,
            InteractionReply::ephemeral("Closing ticket…"),
        )
        .await;
        schedule_delete(Arc::clone(&self.ctx.platform), command.channel);
    }

    async fn role_by_name(&self, guild: GuildId, name: &str) -> Option<RoleId> {
        attempt("list roles", self.ctx.platform.roles(guild))
            .await?
            .into_iter()
            .find(|role| same_name(&role.name, name))
            .map(|role| role.id)
    }

    async fn reply(&self, interaction: &InteractionHandle, reply: InteractionReply) -> bool {
        attempt(
            "respond to interaction",
            self.ctx.platform.respond(interaction, &reply),
        )
        .await
        .is_some()
    }
}

fn ticket_channel(guild: GuildId, category: ChannelId, command: &CommandEvent) -> NewChannel {
    NewChannel {
        name: ticket_channel_name(&command.username),
        kind: ChannelKind::Text,
        parent: Some(category),
        topic: Some(format!("Ticket from {}", command.user_tag)),
        overwrites: vec![
            PermissionOverwrite::role(guild.everyone_role(), &[], &[Permission::ViewChannel]),
            PermissionOverwrite::member(
                command.user,
                &[
                    Permission::ViewChannel,
                    Permission::SendMessages,
                    Permission::ReadMessageHistory,
                ],
                &[],
            ),
        ],
    }
}

fn schedule_delete<P: Platform + 'static>(platform: Arc<P>, channel: ChannelId) {
    tokio::spawn(async move {
        tokio::time::sleep(TICKET_CLOSE_DELAY).await;
        if attempt("delete ticket", platform.delete_channel(channel))
            .await
            .is_some()
        {
            info!(%channel, "Ticket closed");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_name_strips_disallowed() {
        assert_eq!(ticket_channel_name("Bob"), "ticket-bob");
        assert_eq!(ticket_channel_name("über cool!"), "ticket-bercool");
        assert_eq!(ticket_channel_name("x-Y_z"), "ticket-x-yz");
    }

    #[test]
    fn test_command_specs_cover_all_commands() {
        let names: Vec<String> = command_specs().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["ping", "help", "ticket-open", "ticket-close"]);
    }
}

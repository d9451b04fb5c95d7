//! Standard role and channel topology, created once per guild.

use crate::{Context, ROLE_BUTTONS, attempt, find_or_create, welcome_embed};
use nexus_core::{ChannelId, GuildConfig, GuildId, GuildSetup, RoleId};
use nexus_error::NexusResult;
use nexus_interface::{
    Button, ChannelInfo, ChannelKind, GuildSummary, NewChannel, NewRole, OutgoingMessage,
    Permission, PermissionOverwrite, Platform, RoleInfo,
};
use nexus_storage::DocumentStore;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument};

/// A role the provisioner ensures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleBlueprint {
    /// Role name, matched case-insensitively.
    pub name: &'static str,
    /// Shown separately in the member list.
    pub hoist: bool,
    /// Guild-wide permissions.
    pub permissions: &'static [Permission],
}

/// Category a channel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Read-only information.
    Info,
    /// General conversation.
    Community,
    /// Tickets.
    Support,
    /// Starboard.
    Highlights,
    /// Giveaways and events.
    Events,
    /// Voice channels.
    Talk,
    /// Suggestions.
    Ideas,
    /// Team only.
    Staff,
}

/// Who may see and write a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Platform defaults.
    Public,
    /// Everyone reads, only DeveloperBot and Staff write.
    ReadOnly,
    /// Hidden from everyone except DeveloperBot and Staff.
    StaffOnly,
}

/// A category the provisioner ensures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryBlueprint {
    /// Section the category hosts.
    pub section: Section,
    /// Category name.
    pub name: &'static str,
    /// Visibility.
    pub access: Access,
}

/// A text channel the provisioner ensures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelBlueprint {
    /// Channel name.
    pub name: &'static str,
    /// Parent category.
    pub section: Section,
    /// Channel topic.
    pub topic: &'static str,
    /// Visibility.
    pub access: Access,
    /// Logical name under which the id is recorded in the setup state.
    pub record_as: Option<&'static str>,
}

/// A voice channel the provisioner ensures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceBlueprint {
    /// Channel name.
    pub name: &'static str,
    /// Parent category.
    pub section: Section,
}

/// Roles, in creation order.
pub const ROLE_BLUEPRINT: [RoleBlueprint; 10] = [
    RoleBlueprint {
        name: "DeveloperBot",
        hoist: true,
        permissions: &[
            Permission::ManageGuild,
            Permission::ManageChannels,
            Permission::ManageRoles,
            Permission::ModerateMembers,
        ],
    },
    RoleBlueprint {
        name: "Staff",
        hoist: true,
        permissions: &[
            Permission::ManageMessages,
            Permission::ModerateMembers,
            Permission::ManageChannels,
        ],
    },
    RoleBlueprint {
        name: "Moderator",
        hoist: false,
        permissions: &[Permission::ManageMessages, Permission::ModerateMembers],
    },
    RoleBlueprint {
        name: "Supporter",
        hoist: false,
        permissions: &[],
    },
    RoleBlueprint {
        name: "Verified",
        hoist: false,
        permissions: &[],
    },
    RoleBlueprint {
        name: "Gaming",
        hoist: false,
        permissions: &[],
    },
    RoleBlueprint {
        name: "Music",
        hoist: false,
        permissions: &[],
    },
    RoleBlueprint {
        name: "Tech",
        hoist: false,
        permissions: &[],
    },
    RoleBlueprint {
        name: "VIP",
        hoist: false,
        permissions: &[],
    },
    RoleBlueprint {
        name: "Elite",
        hoist: false,
        permissions: &[],
    },
];

/// Categories, in creation order.
pub const CATEGORY_BLUEPRINT: [CategoryBlueprint; 8] = [
    CategoryBlueprint {
        section: Section::Info,
        name: "📣 Info",
        access: Access::Public,
    },
    CategoryBlueprint {
        section: Section::Community,
        name: "💬 Community",
        access: Access::Public,
    },
    CategoryBlueprint {
        section: Section::Support,
        name: "🛠 Support",
        access: Access::Public,
    },
    CategoryBlueprint {
        section: Section::Highlights,
        name: "⭐ Highlights",
        access: Access::Public,
    },
    CategoryBlueprint {
        section: Section::Events,
        name: "🎉 Events",
        access: Access::Public,
    },
    CategoryBlueprint {
        section: Section::Talk,
        name: "🎙 Talk & Hangout",
        access: Access::Public,
    },
    CategoryBlueprint {
        section: Section::Ideas,
        name: "💡 Ideas & Feedback",
        access: Access::Public,
    },
    CategoryBlueprint {
        section: Section::Staff,
        name: "🧰 Staff",
        access: Access::StaffOnly,
    },
];

const fn text(
    name: &'static str,
    section: Section,
    topic: &'static str,
    access: Access,
    record_as: Option<&'static str>,
) -> ChannelBlueprint {
    ChannelBlueprint {
        name,
        section,
        topic,
        access,
        record_as,
    }
}

/// Text channels, in creation order.
pub const CHANNEL_BLUEPRINT: [ChannelBlueprint; 14] = [
    text("rules", Section::Info, "Server rules", Access::ReadOnly, None),
    text(
        "welcome",
        Section::Info,
        "Greetings & roles",
        Access::ReadOnly,
        Some("welcome"),
    ),
    text(
        "updates",
        Section::Info,
        "Server updates & patch notes",
        Access::ReadOnly,
        Some("updates"),
    ),
    text(
        "announcements",
        Section::Info,
        "Important announcements",
        Access::ReadOnly,
        Some("announcements"),
    ),
    text(
        "chat",
        Section::Community,
        "General chat",
        Access::Public,
        Some("chat"),
    ),
    text(
        "media",
        Section::Community,
        "Pictures & clips",
        Access::Public,
        None,
    ),
    text(
        "commands",
        Section::Community,
        "Commands & bot",
        Access::Public,
        None,
    ),
    text(
        "ticket",
        Section::Support,
        "Info & ticket creation",
        Access::Public,
        Some("ticketsInfo"),
    ),
    text(
        "starboard",
        Section::Highlights,
        "⭐ Community highlights",
        Access::Public,
        Some("starboard"),
    ),
    text(
        "giveaways",
        Section::Events,
        "Giveaways & events",
        Access::Public,
        None,
    ),
    text(
        "suggestions",
        Section::Ideas,
        "Suggestions & voting",
        Access::Public,
        Some("suggestions"),
    ),
    text(
        "modlog",
        Section::Staff,
        "Moderation logs",
        Access::StaffOnly,
        Some("modlog"),
    ),
    text(
        "staff-chat",
        Section::Staff,
        "Team internal",
        Access::StaffOnly,
        None,
    ),
    text(
        "transcripts",
        Section::Staff,
        "Ticket transcripts",
        Access::StaffOnly,
        None,
    ),
];

/// Voice channels, in creation order.
pub const VOICE_BLUEPRINT: [VoiceBlueprint; 4] = [
    VoiceBlueprint {
        name: "voice-chat-1",
        section: Section::Talk,
    },
    VoiceBlueprint {
        name: "music-lounge",
        section: Section::Talk,
    },
    VoiceBlueprint {
        name: "gaming-squad",
        section: Section::Talk,
    },
    VoiceBlueprint {
        name: "chill-corner",
        section: Section::Talk,
    },
];

pub(crate) fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Ensures the standard topology exists in a guild, exactly once.
pub struct Provisioner<P, S> {
    ctx: Context<P, S>,
}

impl<P: Platform, S: DocumentStore> Provisioner<P, S> {
    /// Create a provisioner.
    pub fn new(ctx: Context<P, S>) -> Self {
        Self { ctx }
    }

    /// Provision `guild` unless its setup is already recorded as done.
    ///
    /// Individual creation failures are recorded as `null` ids and never
    /// retried; the guild is marked done regardless.
    #[instrument(skip_all, fields(guild = %guild.id))]
    pub async fn ensure_provisioned(&self, guild: &GuildSummary) -> NexusResult<GuildConfig> {
        let mut config = self.ctx.load_config().await?;
        if config.is_provisioned(guild.id) {
            debug!("Guild already provisioned");
            return Ok(config);
        }
        info!(name = %guild.name, "Provisioning guild");

        let roles = self.ensure_roles(guild.id).await;

        let mut channels = attempt("list channels", self.ctx.platform.channels(guild.id))
            .await
            .unwrap_or_default();

        let mut sections: HashMap<Section, ChannelId> = HashMap::new();
        for blueprint in &CATEGORY_BLUEPRINT {
            let spec = NewChannel {
                name: blueprint.name.to_string(),
                kind: ChannelKind::Category,
                parent: None,
                topic: None,
                overwrites: overwrites(guild.id, blueprint.access, &roles),
            };
            if let Some(category) = self.ensure_channel(guild.id, &mut channels, spec).await {
                sections.insert(blueprint.section, category.id);
            }
        }

        let mut recorded: BTreeMap<String, Option<ChannelId>> = BTreeMap::new();
        let mut by_name: HashMap<&'static str, ChannelId> = HashMap::new();
        for blueprint in &CHANNEL_BLUEPRINT {
            let spec = NewChannel {
                name: blueprint.name.to_string(),
                kind: ChannelKind::Text,
                parent: sections.get(&blueprint.section).copied(),
                topic: Some(blueprint.topic.to_string()),
                overwrites: overwrites(guild.id, blueprint.access, &roles),
            };
            let id = self
                .ensure_channel(guild.id, &mut channels, spec)
                .await
                .map(|channel| channel.id);
            if let Some(id) = id {
                by_name.insert(blueprint.name, id);
            }
            if let Some(key) = blueprint.record_as {
                recorded.insert(key.to_string(), id);
            }
        }

        for blueprint in &VOICE_BLUEPRINT {
            let spec = NewChannel {
                name: blueprint.name.to_string(),
                kind: ChannelKind::Voice,
                parent: sections.get(&blueprint.section).copied(),
                topic: None,
                overwrites: Vec::new(),
            };
            self.ensure_channel(guild.id, &mut channels, spec).await;
        }

        let welcome = by_name.get("welcome").copied();
        let chat = by_name.get("chat").copied();

        if let Some(target) = welcome.or(chat) {
            let buttons = ROLE_BUTTONS
                .iter()
                .map(|(custom_id, role)| Button::new(*custom_id, *role))
                .collect();
            let message = OutgoingMessage::text("Pick your roles:").buttons(buttons);
            attempt(
                "send role selection",
                self.ctx.platform.send_message(target, &message),
            )
            .await;
        }

        if let Some(target) = welcome {
            let embed = welcome_embed(
                &config.brand,
                &guild.name,
                chrono::Utc::now().timestamp_millis(),
            );
            let message = OutgoingMessage::default().embeds(vec![embed]);
            attempt(
                "send welcome embed",
                self.ctx.platform.send_message(target, &message),
            )
            .await;
        }

        let setup = GuildSetup {
            done: true,
            channels: recorded,
            roles: roles
                .iter()
                .map(|(name, id)| (name.to_string(), *id))
                .collect(),
        };
        config.guild_setup.insert(guild.id, setup);
        if config.autopost.channel_id.is_none() {
            config.autopost.channel_id = chat;
        }
        self.ctx.store.save(&config).await?;

        self.ctx.metrics.record_provisioned();
        info!(channels = channels.len(), "Guild provisioned");
        Ok(config)
    }

    async fn ensure_roles(&self, guild: GuildId) -> BTreeMap<&'static str, Option<RoleId>> {
        let platform = self.ctx.platform.as_ref();
        let mut existing: Vec<RoleInfo> = attempt("list roles", platform.roles(guild))
            .await
            .unwrap_or_default();

        let mut roles = BTreeMap::new();
        for blueprint in &ROLE_BLUEPRINT {
            let spec = NewRole {
                name: blueprint.name.to_string(),
                hoist: blueprint.hoist,
                permissions: blueprint.permissions.to_vec(),
            };
            let role = find_or_create(
                &mut existing,
                |role| same_name(&role.name, blueprint.name),
                || attempt("create role", platform.create_role(guild, &spec)),
            )
            .await;
            debug!(role = blueprint.name, found = role.is_some(), "Role ensured");
            roles.insert(blueprint.name, role.map(|role| role.id));
        }
        roles
    }

    async fn ensure_channel(
        &self,
        guild: GuildId,
        existing: &mut Vec<ChannelInfo>,
        spec: NewChannel,
    ) -> Option<ChannelInfo> {
        let platform = self.ctx.platform.as_ref();
        find_or_create(
            existing,
            |channel| channel.kind == spec.kind && same_name(&channel.name, &spec.name),
            || attempt("create channel", platform.create_channel(guild, &spec)),
        )
        .await
    }
}

fn overwrites(
    guild: GuildId,
    access: Access,
    roles: &BTreeMap<&'static str, Option<RoleId>>,
) -> Vec<PermissionOverwrite> {
    let everyone = guild.everyone_role();
    let team = ["DeveloperBot", "Staff"]
        .iter()
        .filter_map(|name| roles.get(name).copied().flatten());

    match access {
        Access::Public => Vec::new(),
        Access::ReadOnly => std::iter::once(PermissionOverwrite::role(
            everyone,
            &[Permission::ViewChannel, Permission::ReadMessageHistory],
            &[Permission::SendMessages],
        ))
        .chain(team.map(|role| PermissionOverwrite::role(role, &[Permission::SendMessages], &[])))
        .collect(),
        Access::StaffOnly => {
            std::iter::once(PermissionOverwrite::role(everyone, &[], &[Permission::ViewChannel]))
                .chain(
                    team.map(|role| PermissionOverwrite::role(role, &[Permission::ViewChannel], &[])),
                )
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blueprint_counts() {
        assert_eq!(ROLE_BLUEPRINT.len(), 10);
        assert_eq!(CATEGORY_BLUEPRINT.len(), 8);
        assert_eq!(CHANNEL_BLUEPRINT.len() + VOICE_BLUEPRINT.len(), 18);
    }

    #[test]
    fn test_recorded_channel_names() {
        let recorded: Vec<_> = CHANNEL_BLUEPRINT
            .iter()
            .filter_map(|c| c.record_as)
            .collect();
        assert_eq!(
            recorded,
            vec![
                "welcome",
                "updates",
                "announcements",
                "chat",
                "ticketsInfo",
                "starboard",
                "suggestions",
                "modlog"
            ]
        );
    }

    #[test]
    fn test_staff_overwrites_skip_missing_roles() {
        let mut roles = BTreeMap::new();
        roles.insert("DeveloperBot", Some(RoleId(10)));
        roles.insert("Staff", None);

        let result = overwrites(GuildId(1), Access::StaffOnly, &roles);
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].deny, vec![Permission::ViewChannel]);
        assert_eq!(
            result[1],
            PermissionOverwrite::role(RoleId(10), &[Permission::ViewChannel], &[])
        );
    }

    #[test]
    fn test_read_only_overwrites() {
        let mut roles = BTreeMap::new();
        roles.insert("DeveloperBot", Some(RoleId(10)));
        roles.insert("Staff", Some(RoleId(11)));

        let result = overwrites(GuildId(1), Access::ReadOnly, &roles);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].deny, vec![Permission::SendMessages]);
        assert!(result[1..].iter().all(|o| o.allow == vec![Permission::SendMessages]));
        assert!(overwrites(GuildId(1), Access::Public, &roles).is_empty());
    }

    #[test]
    fn test_same_name_ignores_case() {
        assert!(same_name("VIP", "vip"));
        assert!(same_name("📣 INFO", "📣 Info"));
        assert!(!same_name("Staff", "staff-chat"));
    }
}

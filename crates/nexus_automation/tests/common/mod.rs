//! Shared fixtures for automation tests.

#![allow(dead_code)]

use async_trait::async_trait;
use nexus_automation::{Automation, AutomationSettings, AutomationSettingsBuilder};
use nexus_core::{ChannelId, GuildId, MessageId, RoleId, UserId};
use nexus_error::{PlatformError, PlatformErrorKind, PlatformResult};
use nexus_interface::{
    ChannelInfo, ChannelKind, CommandEvent, CommandSpec, ComponentEvent, GuildSummary,
    InteractionHandle, InteractionReply, MemberEvent, MessageEvent, NewChannel, NewRole,
    OutgoingMessage, Platform, ReactionEvent, RoleInfo,
};
use nexus_storage::InMemoryStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

pub const GUILD: GuildId = GuildId(1000);

/// Everything the mock platform was asked to do.
#[derive(Debug, Default)]
pub struct MockState {
    pub roles: Vec<RoleInfo>,
    pub channels: Vec<ChannelInfo>,
    pub created_roles: Vec<NewRole>,
    pub created_channels: Vec<NewChannel>,
    pub sent: Vec<(ChannelId, OutgoingMessage)>,
    pub deleted_messages: Vec<(ChannelId, MessageId)>,
    pub deleted_channels: Vec<ChannelId>,
    pub member_roles: HashMap<(GuildId, UserId), Vec<RoleId>>,
    pub replies: Vec<InteractionReply>,
    pub edits: Vec<String>,
    pub registered: Vec<(Option<GuildId>, Vec<CommandSpec>)>,
    next_id: u64,
}

/// Recording platform with switchable failures.
#[derive(Debug, Default)]
pub struct MockPlatform {
    pub state: Mutex<MockState>,
    pub fail_create: bool,
    pub fail_send: bool,
    pub fail_fetch: bool,
    pub fail_channel: Option<&'static str>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_creates() -> Self {
        Self {
            fail_create: true,
            ..Self::default()
        }
    }

    pub fn failing_fetches() -> Self {
        Self {
            fail_fetch: true,
            ..Self::default()
        }
    }

    /// Pre-existing role.
    pub fn add_role(&self, name: &str) -> RoleId {
        let mut state = self.state.lock();
        let id = RoleId(next_id(&mut state));
        state.roles.push(RoleInfo {
            id,
            name: name.to_string(),
        });
        id
    }

    /// Pre-existing channel.
    pub fn add_channel(&self, name: &str, kind: ChannelKind) -> ChannelId {
        let mut state = self.state.lock();
        let id = ChannelId(next_id(&mut state));
        state.channels.push(ChannelInfo {
            id,
            guild: Some(GUILD),
            name: name.to_string(),
            kind,
            parent: None,
        });
        id
    }

    pub fn channels_of(&self, kind: ChannelKind) -> Vec<ChannelInfo> {
        self.state
            .lock()
            .channels
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect()
    }

    pub fn channel_named(&self, name: &str) -> Option<ChannelInfo> {
        self.state
            .lock()
            .channels
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }

    pub fn role_named(&self, name: &str) -> Option<RoleId> {
        self.state
            .lock()
            .roles
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.id)
    }

    pub fn sent(&self) -> Vec<(ChannelId, OutgoingMessage)> {
        self.state.lock().sent.clone()
    }

    pub fn sent_to(&self, channel: ChannelId) -> Vec<OutgoingMessage> {
        self.state
            .lock()
            .sent
            .iter()
            .filter(|(target, _)| *target == channel)
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn replies(&self) -> Vec<InteractionReply> {
        self.state.lock().replies.clone()
    }

    pub fn roles_of(&self, user: UserId) -> Vec<RoleId> {
        self.state
            .lock()
            .member_roles
            .get(&(GUILD, user))
            .cloned()
            .unwrap_or_default()
    }
}

fn next_id(state: &mut MockState) -> u64 {
    state.next_id += 1;
    9_000 + state.next_id
}

fn failure(what: &str) -> PlatformError {
    PlatformError::new(PlatformErrorKind::Api(format!("mock {} failure", what)))
}

#[async_trait]
impl Platform for MockPlatform {
    async fn roles(&self, _guild: GuildId) -> PlatformResult<Vec<RoleInfo>> {
        Ok(self.state.lock().roles.clone())
    }

    async fn create_role(&self, _guild: GuildId, role: &NewRole) -> PlatformResult<RoleInfo> {
        if self.fail_create {
            return Err(failure("create role"));
        }
        let mut state = self.state.lock();
        let info = RoleInfo {
            id: RoleId(next_id(&mut state)),
            name: role.name.clone(),
        };
        state.created_roles.push(role.clone());
        state.roles.push(info.clone());
        Ok(info)
    }

    async fn channels(&self, _guild: GuildId) -> PlatformResult<Vec<ChannelInfo>> {
        Ok(self.state.lock().channels.clone())
    }

    async fn create_channel(
        &self,
        guild: GuildId,
        channel: &NewChannel,
    ) -> PlatformResult<ChannelInfo> {
        if self.fail_create || self.fail_channel == Some(channel.name.as_str()) {
            return Err(failure("create channel"));
        }
        let mut state = self.state.lock();
        let info = ChannelInfo {
            id: ChannelId(next_id(&mut state)),
            guild: Some(guild),
            name: channel.name.clone(),
            kind: channel.kind,
            parent: channel.parent,
        };
        state.created_channels.push(channel.clone());
        state.channels.push(info.clone());
        Ok(info)
    }

    async fn channel(&self, channel: ChannelId) -> PlatformResult<ChannelInfo> {
        if self.fail_fetch {
            return Err(failure("fetch channel"));
        }
        self.state
            .lock()
            .channels
            .iter()
            .find(|c| c.id == channel)
            .cloned()
            .ok_or_else(|| PlatformError::new(PlatformErrorKind::ChannelNotFound(channel.get())))
    }

    async fn delete_channel(&self, channel: ChannelId) -> PlatformResult<()> {
        let mut state = self.state.lock();
        state.channels.retain(|c| c.id != channel);
        state.deleted_channels.push(channel);
        Ok(())
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        message: &OutgoingMessage,
    ) -> PlatformResult<MessageId> {
        if self.fail_send {
            return Err(failure("send"));
        }
        let mut state = self.state.lock();
        state.sent.push((channel, message.clone()));
        Ok(MessageId(next_id(&mut state)))
    }

    async fn delete_message(&self, channel: ChannelId, message: MessageId) -> PlatformResult<()> {
        self.state.lock().deleted_messages.push((channel, message));
        Ok(())
    }

    async fn member_roles(&self, guild: GuildId, user: UserId) -> PlatformResult<Vec<RoleId>> {
        Ok(self
            .state
            .lock()
            .member_roles
            .get(&(guild, user))
            .cloned()
            .unwrap_or_default())
    }

    async fn add_member_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        let held = state.member_roles.entry((guild, user)).or_default();
        if !held.contains(&role) {
            held.push(role);
        }
        Ok(())
    }

    async fn remove_member_role(
        &self,
        guild: GuildId,
        user: UserId,
        role: RoleId,
    ) -> PlatformResult<()> {
        let mut state = self.state.lock();
        if let Some(held) = state.member_roles.get_mut(&(guild, user)) {
            held.retain(|r| *r != role);
        }
        Ok(())
    }

    async fn respond(
        &self,
        _interaction: &InteractionHandle,
        reply: &InteractionReply,
    ) -> PlatformResult<()> {
        self.state.lock().replies.push(reply.clone());
        Ok(())
    }

    async fn edit_response(
        &self,
        _interaction: &InteractionHandle,
        content: &str,
    ) -> PlatformResult<()> {
        self.state.lock().edits.push(content.to_string());
        Ok(())
    }

    async fn register_commands(
        &self,
        scope: Option<GuildId>,
        commands: &[CommandSpec],
    ) -> PlatformResult<()> {
        self.state
            .lock()
            .registered
            .push((scope, commands.to_vec()));
        Ok(())
    }
}

/// Settings with a changelog path that does not exist.
pub fn settings() -> AutomationSettingsBuilder {
    let mut builder = AutomationSettings::builder();
    builder
        .version("3.3.1")
        .changelog_path("/nonexistent/CHANGELOG.md");
    builder
}

pub fn automation(
    platform: Arc<MockPlatform>,
    store: Arc<InMemoryStore>,
) -> Automation<MockPlatform, InMemoryStore> {
    automation_with(platform, store, settings().build().unwrap())
}

pub fn automation_with(
    platform: Arc<MockPlatform>,
    store: Arc<InMemoryStore>,
    settings: AutomationSettings,
) -> Automation<MockPlatform, InMemoryStore> {
    Automation::new(platform, store, settings).unwrap()
}

pub fn guild() -> GuildSummary {
    GuildSummary::new(GUILD, "Test Guild")
}

pub fn message(author: u64, content: &str, now_ms: i64) -> MessageEvent {
    MessageEvent {
        guild: GUILD,
        channel: ChannelId(77),
        message: MessageId(now_ms as u64 + 1),
        author: UserId(author),
        author_bot: false,
        content: content.to_string(),
        received_at_ms: now_ms,
    }
}

pub fn member(user: u64) -> MemberEvent {
    MemberEvent {
        guild: GUILD,
        guild_name: "Test Guild".to_string(),
        user: UserId(user),
        user_tag: format!("user{}", user),
    }
}

pub fn star(count: u64) -> ReactionEvent {
    ReactionEvent {
        guild: GUILD,
        channel: ChannelId(77),
        channel_name: Some("chat".to_string()),
        message: MessageId(555),
        reactor: UserId(42),
        reactor_bot: false,
        emoji: "⭐".to_string(),
        count,
        author_tag: Some("author".to_string()),
        content: "great post".to_string(),
        created_at_ms: 1_700_000_000_000,
        attachments: Vec::new(),
    }
}

pub fn command(name: &str, channel: ChannelId) -> CommandEvent {
    CommandEvent {
        interaction: InteractionHandle {
            id: 1,
            token: "token".to_string(),
        },
        name: name.to_string(),
        guild: Some(GUILD),
        channel,
        user: UserId(42),
        username: "Alice_W".to_string(),
        user_tag: "Alice_W".to_string(),
        created_at_ms: chrono::Utc::now().timestamp_millis(),
    }
}

pub fn button(custom_id: &str, user: u64) -> ComponentEvent {
    ComponentEvent {
        interaction: InteractionHandle {
            id: 2,
            token: "token".to_string(),
        },
        custom_id: custom_id.to_string(),
        guild: Some(GUILD),
        user: UserId(user),
    }
}

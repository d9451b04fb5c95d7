//! Message activity to experience, levels and role grants.

use crate::{Context, attempt, find_or_create, provisioning::same_name};
use nexus_core::{GuildId, UserId, UserProgressBook};
use nexus_error::NexusResult;
use nexus_interface::{MessageEvent, NewRole, OutgoingMessage, Platform, RoleInfo};
use nexus_storage::DocumentStore;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Last rewarded activity per (guild, member), kept in memory only.
#[derive(Debug, Default)]
pub struct CooldownTracker {
    last: Mutex<HashMap<(GuildId, UserId), i64>>,
}

impl CooldownTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark activity at `now_ms` unless the previous mark is younger than
    /// `cooldown_ms`. Returns whether the activity passed.
    pub fn try_mark(&self, guild: GuildId, user: UserId, now_ms: i64, cooldown_ms: i64) -> bool {
        let mut last = self.last.lock();
        if let Some(previous) = last.get(&(guild, user)) {
            if now_ms - previous < cooldown_ms {
                return false;
            }
        }
        last.insert((guild, user), now_ms);
        true
    }
}

/// Result of recording one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityOutcome {
    /// Whether experience was awarded.
    pub rewarded: bool,
    /// Whether the level rose.
    pub leveled_up: bool,
    /// Level after the update.
    pub new_level: u64,
    /// Threshold roles due at the new level, when the level rose.
    pub roles_to_grant: Vec<String>,
}

/// Awards experience for messages and grants threshold roles.
pub struct ProgressionTracker<P, S> {
    ctx: Context<P, S>,
    cooldowns: CooldownTracker,
}

impl<P: Platform, S: DocumentStore> ProgressionTracker<P, S> {
    /// Create a tracker with a fresh cooldown map.
    pub fn new(ctx: Context<P, S>) -> Self {
        Self::with_cooldowns(ctx, CooldownTracker::new())
    }

    /// Create a tracker with an existing cooldown map.
    pub fn with_cooldowns(ctx: Context<P, S>, cooldowns: CooldownTracker) -> Self {
        Self { ctx, cooldowns }
    }

    /// Award experience for one message by `user`.
    ///
    /// Bots, and members still inside their cooldown, are ignored without
    /// touching the user document.
    #[instrument(skip_all, fields(guild = %guild, user = %user))]
    pub async fn record_activity(
        &self,
        guild: GuildId,
        user: UserId,
        is_bot: bool,
        now_ms: i64,
    ) -> NexusResult<ActivityOutcome> {
        if is_bot {
            return Ok(ActivityOutcome::default());
        }

        let config = self.ctx.load_config().await?;
        let cooldown_ms = i64::try_from(config.level.cooldown_sec.saturating_mul(1000))
            .unwrap_or(i64::MAX);
        if !self.cooldowns.try_mark(guild, user, now_ms, cooldown_ms) {
            debug!("Member on cooldown");
            return Ok(ActivityOutcome::default());
        }

        let mut users: UserProgressBook = self.ctx.store.load().await?;
        let progress = users.entry(user).or_default();
        let risen = progress.add_xp(config.level.message_xp);
        let new_level = progress.level;
        let xp = progress.xp;
        self.ctx.store.save(&users).await?;
        debug!(xp, level = new_level, "Experience awarded");

        Ok(match risen {
            Some(level) => ActivityOutcome {
                rewarded: true,
                leveled_up: true,
                new_level: level,
                roles_to_grant: config.level.roles_due_at(level),
            },
            None => ActivityOutcome {
                rewarded: true,
                new_level,
                ..Default::default()
            },
        })
    }

    /// Record a message and, on level-up, announce it and grant due roles.
    #[instrument(skip_all, fields(guild = %message.guild, user = %message.author))]
    pub async fn on_message(&self, message: &MessageEvent) -> NexusResult<ActivityOutcome> {
        let outcome = self
            .record_activity(
                message.guild,
                message.author,
                message.author_bot,
                message.received_at_ms,
            )
            .await?;
        if !outcome.leveled_up {
            return Ok(outcome);
        }

        info!(level = outcome.new_level, "Member leveled up");
        self.ctx.metrics.record_level_up();

        let announcement = OutgoingMessage::text(format!(
            "🎉 **Level Up!** <@{}> is now level **{}**!",
            message.author, outcome.new_level
        ));
        attempt(
            "send level-up",
            self.ctx.platform.send_message(message.channel, &announcement),
        )
        .await;

        self.grant_roles(message.guild, message.author, &outcome.roles_to_grant)
            .await;
        Ok(outcome)
    }

    async fn grant_roles(&self, guild: GuildId, user: UserId, names: &[String]) {
        if names.is_empty() {
            return;
        }
        let platform = self.ctx.platform.as_ref();
        let mut existing: Vec<RoleInfo> = attempt("list roles", platform.roles(guild))
            .await
            .unwrap_or_default();

        for name in names {
            let spec = NewRole {
                name: name.clone(),
                hoist: false,
                permissions: Vec::new(),
            };
            let role = find_or_create(
                &mut existing,
                |role| same_name(&role.name, name),
                || attempt("create role", platform.create_role(guild, &spec)),
            )
            .await;
            if let Some(role) = role {
                attempt(
                    "grant level role",
                    platform.add_member_role(guild, user, role.id),
                )
                .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cooldown_blocks_within_window() {
        let tracker = CooldownTracker::new();
        assert!(tracker.try_mark(GuildId(1), UserId(2), 1_000, 60_000));
        assert!(!tracker.try_mark(GuildId(1), UserId(2), 30_000, 60_000));
        assert!(tracker.try_mark(GuildId(1), UserId(2), 61_000, 60_000));
    }

    #[test]
    fn test_cooldown_is_per_guild_and_user() {
        let tracker = CooldownTracker::new();
        assert!(tracker.try_mark(GuildId(1), UserId(2), 0, 60_000));
        assert!(tracker.try_mark(GuildId(3), UserId(2), 0, 60_000));
        assert!(tracker.try_mark(GuildId(1), UserId(4), 0, 60_000));
    }

    #[test]
    fn test_blocked_activity_keeps_previous_mark() {
        let tracker = CooldownTracker::new();
        assert!(tracker.try_mark(GuildId(1), UserId(2), 0, 60_000));
        assert!(!tracker.try_mark(GuildId(1), UserId(2), 59_999, 60_000));
        assert!(tracker.try_mark(GuildId(1), UserId(2), 60_000, 60_000));
    }
}

//! Event-driven community automation.
//!
//! This crate is the bot's brain. It receives transport-neutral
//! [`AutomationEvent`](nexus_interface::AutomationEvent)s, reads and rewrites
//! whole documents through a [`DocumentStore`](nexus_storage::DocumentStore),
//! and issues platform commands through a [`Platform`](nexus_interface::Platform).
//!
//! # Components
//!
//! - [`Provisioner`] - creates the standard role and channel topology once per guild
//! - [`ProgressionTracker`] - message activity to experience, levels and role grants
//! - [`ModerationFilter`] - length and link rules
//! - [`HighlightCurator`] - reposts starred messages to the starboard
//! - [`Scheduler`] - periodic random content posts
//! - [`VersionAnnouncer`] - posts the changelog when the build version changes
//! - [`MemberGreeter`] - join and leave handling
//! - [`CommandRouter`] - slash commands and role-selection buttons
//!
//! [`Automation`] owns one of each and runs them sequentially from a single
//! dispatch loop.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod announcer;
mod attempt;
mod branding;
mod commands;
mod context;
mod dispatcher;
mod highlight;
mod members;
mod metrics;
mod moderation;
mod progression;
mod provisioning;
mod scheduler;
mod settings;

pub use announcer::{NO_CHANGELOG_BODY, VersionAnnouncer, parse_changelog};
pub use attempt::{attempt, find_or_create};
pub use branding::welcome_embed;
pub use commands::{
    COMMANDS, CommandRouter, ROLE_BUTTONS, TICKET_CLOSE_DELAY, command_specs, ticket_channel_name,
};
pub use context::Context;
pub use dispatcher::Automation;
pub use highlight::{HIGHLIGHT_THRESHOLD, HighlightCurator, STAR_EMOJI};
pub use members::MemberGreeter;
pub use metrics::{AutomationMetrics, MetricsSnapshot};
pub use moderation::{MAX_MESSAGE_CHARS, ModerationFilter, Verdict, ViolationReason};
pub use progression::{ActivityOutcome, CooldownTracker, ProgressionTracker};
pub use provisioning::{
    Access, CATEGORY_BLUEPRINT, CHANNEL_BLUEPRINT, CategoryBlueprint, ChannelBlueprint,
    Provisioner, ROLE_BLUEPRINT, RoleBlueprint, Section, VOICE_BLUEPRINT, VoiceBlueprint,
};
pub use scheduler::{FACTS, MEMES, QUOTES, Scheduler};
pub use settings::{AutomationSettings, AutomationSettingsBuilder};

//! Capability interface between the automation core and a chat transport.
//!
//! The automation core never talks to a gateway or REST API directly. It
//! receives [`AutomationEvent`]s and issues commands through the [`Platform`]
//! trait, which a transport adapter implements.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod directory;
mod events;
mod message;
mod platform;

pub use directory::{
    ChannelInfo, ChannelKind, NewChannel, NewRole, OverwriteTarget, Permission,
    PermissionOverwrite, RoleInfo,
};
pub use events::{
    AutomationEvent, CommandEvent, ComponentEvent, GuildSummary, MemberEvent, MessageEvent,
    ReactionEvent,
};
pub use message::{
    Button, CommandSpec, Embed, InteractionHandle, InteractionReply, OutgoingMessage,
};
pub use platform::Platform;

//! Outgoing messages, interaction replies and command declarations.

use derive_setters::Setters;
use serde::{Deserialize, Serialize};

/// Rich embed attached to a message.
///
/// ```
/// use nexus_interface::Embed;
///
/// let embed = Embed::default().title("Hello").color(0x00A3FF);
/// assert_eq!(embed.title.as_deref(), Some("Hello"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(strip_option)]
pub struct Embed {
    /// Title line.
    #[setters(into)]
    pub title: Option<String>,
    /// Body text.
    #[setters(into)]
    pub description: Option<String>,
    /// Sidebar color.
    pub color: Option<u32>,
    /// Author line.
    #[setters(into)]
    pub author: Option<String>,
    /// Footer text.
    #[setters(into)]
    pub footer: Option<String>,
    /// Large image.
    #[setters(into)]
    pub image_url: Option<String>,
    /// Thumbnail image.
    #[setters(into)]
    pub thumbnail_url: Option<String>,
    /// Epoch milliseconds shown as the embed timestamp.
    pub timestamp_ms: Option<i64>,
}

/// Clickable button with an application-defined id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    /// Id echoed back in component interactions.
    pub custom_id: String,
    /// Visible label.
    pub label: String,
}

impl Button {
    /// Create a button.
    pub fn new(custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            custom_id: custom_id.into(),
            label: label.into(),
        }
    }
}

/// Message sent to a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Setters)]
#[setters(strip_option)]
pub struct OutgoingMessage {
    /// Plain text content.
    #[setters(into)]
    pub content: Option<String>,
    /// Embeds below the content.
    pub embeds: Vec<Embed>,
    /// One row of buttons.
    pub buttons: Vec<Button>,
}

impl OutgoingMessage {
    /// Text-only message.
    pub fn text(content: impl Into<String>) -> Self {
        Self::default().content(content)
    }
}

/// Identity needed to answer an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionHandle {
    /// Interaction id.
    pub id: u64,
    /// Continuation token.
    pub token: String,
}

/// Reply to a command or component interaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionReply {
    /// Reply text.
    pub content: String,
    /// Only visible to the invoking user.
    pub ephemeral: bool,
}

impl InteractionReply {
    /// Reply visible to everyone in the channel.
    pub fn public(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: false,
        }
    }

    /// Reply only the invoking user sees.
    pub fn ephemeral(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ephemeral: true,
        }
    }
}

/// Slash command declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Command name as typed after `/`.
    pub name: String,
    /// Short description.
    pub description: String,
}

impl CommandSpec {
    /// Declare a command.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

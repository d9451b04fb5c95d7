//! Starboard reposts of popular messages.

use crate::{Context, attempt};
use nexus_error::NexusResult;
use nexus_interface::{Embed, OutgoingMessage, Platform, ReactionEvent};
use nexus_storage::DocumentStore;
use tracing::{debug, info, instrument};

/// Reaction that nominates a message for the starboard.
pub const STAR_EMOJI: &str = "⭐";

/// Star count at which a message is reposted.
pub const HIGHLIGHT_THRESHOLD: u64 = 3;

/// Reposts messages that collected enough stars.
///
/// Every qualifying reaction produces a repost; earlier reposts of the same
/// message are not tracked.
pub struct HighlightCurator<P, S> {
    ctx: Context<P, S>,
}

impl<P: Platform, S: DocumentStore> HighlightCurator<P, S> {
    /// Create a curator.
    pub fn new(ctx: Context<P, S>) -> Self {
        Self { ctx }
    }

    /// Handle one added reaction. Returns whether a summary was posted.
    #[instrument(skip_all, fields(guild = %reaction.guild, message = %reaction.message))]
    pub async fn on_reaction(&self, reaction: &ReactionEvent) -> NexusResult<bool> {
        if reaction.reactor_bot || reaction.emoji != STAR_EMOJI {
            return Ok(false);
        }
        if reaction.count < HIGHLIGHT_THRESHOLD {
            debug!(count = reaction.count, "Below highlight threshold");
            return Ok(false);
        }

        let config = self.ctx.load_config().await?;
        let Some(starboard) = config
            .setup(reaction.guild)
            .and_then(|setup| setup.channel("starboard"))
        else {
            debug!("No starboard recorded");
            return Ok(false);
        };

        let message = OutgoingMessage::text(format!(
            "{} **{}** by <@{}>",
            STAR_EMOJI, reaction.count, reaction.reactor
        ))
        .embeds(vec![summary_embed(reaction)]);

        let sent = attempt(
            "send highlight",
            self.ctx.platform.send_message(starboard, &message),
        )
        .await
        .is_some();
        if sent {
            info!(count = reaction.count, "Message highlighted");
            self.ctx.metrics.record_highlight();
        }
        Ok(sent)
    }
}

fn summary_embed(reaction: &ReactionEvent) -> Embed {
    let body = if reaction.content.is_empty() {
        "(no text)".to_string()
    } else {
        reaction.content.clone()
    };
    let channel = reaction.channel_name.as_deref().unwrap_or("unknown");

    let mut embed = Embed::default()
        .author(reaction.author_tag.as_deref().unwrap_or("Unknown"))
        .description(body)
        .footer(format!(
            "#{} • {} {} • {}",
            channel, STAR_EMOJI, reaction.count, reaction.message
        ))
        .timestamp_ms(reaction.created_at_ms);
    if let Some(first) = reaction.attachments.first() {
        embed = embed.image_url(first.clone());
    }
    embed
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_core::{ChannelId, GuildId, MessageId, UserId};

    fn reaction() -> ReactionEvent {
        ReactionEvent {
            guild: GuildId(1),
            channel: ChannelId(2),
            channel_name: Some("chat".to_string()),
            message: MessageId(3),
            reactor: UserId(4),
            reactor_bot: false,
            emoji: STAR_EMOJI.to_string(),
            count: 3,
            author_tag: Some("alice".to_string()),
            content: String::new(),
            created_at_ms: 1_700_000_000_000,
            attachments: vec![
                "https://cdn.example.com/a.png".to_string(),
                "https://cdn.example.com/b.png".to_string(),
            ],
        }
    }

    #[test]
    fn test_summary_embed_fields() {
        let embed = summary_embed(&reaction());
        assert_eq!(embed.author.as_deref(), Some("alice"));
        assert_eq!(embed.description.as_deref(), Some("(no text)"));
        assert_eq!(embed.footer.as_deref(), Some("#chat • ⭐ 3 • 3"));
        assert_eq!(embed.timestamp_ms, Some(1_700_000_000_000));
        assert_eq!(
            embed.image_url.as_deref(),
            Some("https://cdn.example.com/a.png")
        );
    }
}

//! Length and link rules for guild messages.

use crate::{Context, attempt};
use nexus_error::{ConfigError, NexusResult};
use nexus_interface::{MessageEvent, Platform};
use nexus_storage::DocumentStore;
use regex::Regex;
use tracing::{info, instrument};

/// Longest message body, in characters, that anti-spam keeps.
pub const MAX_MESSAGE_CHARS: usize = 2000;

const LINK_PATTERN: &str = r"(?i)(https?://|discord\.gg/)";

/// Why a message is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum ViolationReason {
    /// Body longer than [`MAX_MESSAGE_CHARS`].
    #[display("too_long")]
    TooLong,
    /// Body contains a link or invite.
    #[display("link")]
    Link,
}

/// Decision for one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Leave the message alone.
    Keep,
    /// Remove the message.
    Delete(ViolationReason),
}

/// Applies the anti-spam and link rules and removes violators.
pub struct ModerationFilter<P, S> {
    ctx: Context<P, S>,
    link_regex: Regex,
}

impl<P: Platform, S: DocumentStore> ModerationFilter<P, S> {
    /// Create a filter using the rule switches from the settings.
    pub fn new(ctx: Context<P, S>) -> NexusResult<Self> {
        let link_regex = Regex::new(LINK_PATTERN)
            .map_err(|e| ConfigError::new(format!("Invalid link pattern: {}", e)))?;
        Ok(Self { ctx, link_regex })
    }

    /// Judge a message body. The length rule wins over the link rule.
    pub fn evaluate(&self, content: &str) -> Verdict {
        let settings = &self.ctx.settings;
        if *settings.anti_spam() && content.chars().count() > MAX_MESSAGE_CHARS {
            return Verdict::Delete(ViolationReason::TooLong);
        }
        if *settings.block_links() && self.link_regex.is_match(content) {
            return Verdict::Delete(ViolationReason::Link);
        }
        Verdict::Keep
    }

    /// Judge a message and delete it when it violates a rule.
    ///
    /// The deletion is best-effort; the verdict is returned either way.
    #[instrument(skip_all, fields(guild = %message.guild, message = %message.message))]
    pub async fn enforce(&self, message: &MessageEvent) -> Verdict {
        if message.author_bot {
            return Verdict::Keep;
        }
        let verdict = self.evaluate(&message.content);
        if let Verdict::Delete(reason) = verdict {
            info!(%reason, author = %message.author, "Removing message");
            let deleted = attempt(
                "delete message",
                self.ctx
                    .platform
                    .delete_message(message.channel, message.message),
            )
            .await;
            if deleted.is_some() {
                self.ctx.metrics.record_moderation_deletion();
            }
        }
        verdict
    }
}

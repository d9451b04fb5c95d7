//! Periodic posting of random content.

use crate::{Context, attempt};
use nexus_core::ContentKind;
use nexus_error::NexusResult;
use nexus_interface::{OutgoingMessage, Platform};
use nexus_storage::DocumentStore;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, instrument};

/// Meme image links.
pub const MEMES: [&str; 3] = [
    "https://i.imgflip.com/30b1gx.jpg",
    "https://i.imgflip.com/1bij.jpg",
    "https://i.imgflip.com/2/26am.jpg",
];

/// Motivational quotes.
pub const QUOTES: [&str; 3] = [
    "“Success is not a destination, it is a journey.”",
    "“Whoever fights can lose. Whoever doesn't fight has already lost.”",
    "“Stay humble, hustle hard.”",
];

/// Fun facts, posted with a 💡 prefix.
pub const FACTS: [&str; 3] = [
    "Did you know? Honey never spoils.",
    "Fun fact: Japan sells green-tea KitKat.",
    "Fun fact: An octopus has three hearts.",
];

fn pool(kind: ContentKind) -> &'static [&'static str] {
    match kind {
        ContentKind::Meme => &MEMES,
        ContentKind::Quote => &QUOTES,
        ContentKind::Fact => &FACTS,
    }
}

/// Pick a random enabled category and a random item from its pool.
pub(crate) fn pick_content<R: Rng + ?Sized>(kinds: &[ContentKind], rng: &mut R) -> String {
    let kinds = if kinds.is_empty() {
        ContentKind::all()
    } else {
        kinds.to_vec()
    };
    let kind = kinds.choose(rng).copied().unwrap_or(ContentKind::Quote);
    let item = pool(kind).choose(rng).copied().unwrap_or_default();
    match kind {
        ContentKind::Fact => format!("💡 {}", item),
        ContentKind::Meme | ContentKind::Quote => item.to_string(),
    }
}

/// Posts random content to the autopost channel at most once per interval.
pub struct Scheduler<P, S> {
    ctx: Context<P, S>,
}

impl<P: Platform, S: DocumentStore> Scheduler<P, S> {
    /// Create a scheduler.
    pub fn new(ctx: Context<P, S>) -> Self {
        Self { ctx }
    }

    /// Run one poll at `now_ms`. Returns whether content was posted.
    pub async fn tick(&self, now_ms: i64) -> NexusResult<bool> {
        let mut rng = StdRng::from_entropy();
        self.tick_with(now_ms, &mut rng).await
    }

    /// Run one poll with a caller-supplied random source.
    #[instrument(skip_all, fields(now_ms = now_ms))]
    pub async fn tick_with<R: Rng + Send>(&self, now_ms: i64, rng: &mut R) -> NexusResult<bool> {
        let mut config = self.ctx.load_config().await?;
        let autopost = &config.autopost;
        if !autopost.enabled {
            return Ok(false);
        }
        let Some(channel) = autopost.channel_id else {
            debug!("No autopost channel");
            return Ok(false);
        };
        if now_ms.saturating_sub(autopost.last_post) < autopost.interval_ms() {
            return Ok(false);
        }
        if attempt("fetch autopost channel", self.ctx.platform.channel(channel))
            .await
            .is_none()
        {
            return Ok(false);
        }

        let content = pick_content(&config.autopost.types, rng);
        let sent = attempt(
            "send autopost",
            self.ctx
                .platform
                .send_message(channel, &OutgoingMessage::text(content)),
        )
        .await
        .is_some();

        config.autopost.last_post = now_ms;
        self.ctx.store.save(&config).await?;

        if sent {
            info!(%channel, "Autopost sent");
            self.ctx.metrics.record_autopost();
        }
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_respects_enabled_kinds() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let content = pick_content(&[ContentKind::Fact], &mut rng);
            assert!(content.starts_with("💡 "));
            assert!(FACTS.contains(&content.trim_start_matches("💡 ")));
        }
    }

    #[test]
    fn test_pick_meme_is_link() {
        let mut rng = StdRng::seed_from_u64(1);
        let content = pick_content(&[ContentKind::Meme], &mut rng);
        assert!(MEMES.contains(&content.as_str()));
    }

    #[test]
    fn test_pick_from_empty_kinds_uses_all() {
        let mut rng = StdRng::seed_from_u64(3);
        let content = pick_content(&[], &mut rng);
        assert!(!content.is_empty());
    }
}

//! Changelog announcement when the build version changes.

use crate::{Context, attempt};
use nexus_core::{ChannelId, GuildId, VersionMarker};
use nexus_error::{ConfigError, NexusResult};
use nexus_interface::{ChannelInfo, ChannelKind, Embed, NewChannel, OutgoingMessage, Platform};
use nexus_storage::DocumentStore;
use regex::Regex;
use tracing::{debug, info, instrument, warn};

/// Announcement body used when the changelog has no section for the version.
pub const NO_CHANGELOG_BODY: &str = "Update without changelog entry.";

const UPDATES_PATTERN: &str = r"(?i)updates|news|announcements";
const INFO_PATTERN: &str = r"(?i)info|📣";

/// Extract the changelog section whose `## ` heading mentions `version`.
///
/// The section runs until the next `## ` heading. Returns `None` when there is
/// no such heading or the section is blank.
///
/// ```
/// use nexus_automation::parse_changelog;
///
/// let changelog = "# Changelog\n\n## 3.3.1\n- Fixed tickets\n\n## 3.3.0\n- Starboard\n";
/// assert_eq!(parse_changelog(changelog, "3.3.1").as_deref(), Some("- Fixed tickets"));
/// assert_eq!(parse_changelog(changelog, "9.9.9"), None);
/// ```
pub fn parse_changelog(changelog: &str, version: &str) -> Option<String> {
    let mut lines = changelog.lines();
    lines.find(|line| line.starts_with("## ") && line.contains(version))?;
    let section: Vec<&str> = lines.take_while(|line| !line.starts_with("## ")).collect();
    let body = section.join("\n").trim().to_string();
    (!body.is_empty()).then_some(body)
}

/// Posts the changelog of a new build version once.
pub struct VersionAnnouncer<P, S> {
    ctx: Context<P, S>,
    updates_regex: Regex,
    info_regex: Regex,
}

impl<P: Platform, S: DocumentStore> VersionAnnouncer<P, S> {
    /// Create an announcer for the version configured in the settings.
    pub fn new(ctx: Context<P, S>) -> NexusResult<Self> {
        let updates_regex = Regex::new(UPDATES_PATTERN)
            .map_err(|e| ConfigError::new(format!("Invalid updates pattern: {}", e)))?;
        let info_regex = Regex::new(INFO_PATTERN)
            .map_err(|e| ConfigError::new(format!("Invalid info pattern: {}", e)))?;
        Ok(Self {
            ctx,
            updates_regex,
            info_regex,
        })
    }

    /// Announce the build version in `guild` unless it was already announced.
    ///
    /// Returns whether the marker advanced. When no updates channel can be
    /// found or created the marker is left untouched so a later start retries.
    #[instrument(skip_all, fields(guild = %guild))]
    pub async fn announce_if_changed(&self, guild: GuildId) -> NexusResult<bool> {
        let current = self.ctx.settings.version().as_str();
        let marker: VersionMarker = self.ctx.store.load().await?;
        if marker.last_announced == current {
            debug!(version = current, "Version already announced");
            return Ok(false);
        }

        let Some(channel) = self.updates_channel(guild).await? else {
            warn!("No updates channel available, skipping announcement");
            return Ok(false);
        };

        let body = self
            .changelog_section(current)
            .await
            .unwrap_or_else(|| NO_CHANGELOG_BODY.to_string());
        let embed = Embed::default()
            .title(format!("📢 Update {}", current))
            .description(body)
            .timestamp_ms(chrono::Utc::now().timestamp_millis());
        let sent = attempt(
            "send announcement",
            self.ctx
                .platform
                .send_message(channel, &OutgoingMessage::default().embeds(vec![embed])),
        )
        .await;

        self.ctx.store.save(&VersionMarker::new(current)).await?;
        if sent.is_some() {
            self.ctx.metrics.record_announcement();
        }
        info!(
            from = %marker.last_announced,
            to = current,
            sent = sent.is_some(),
            "Version announced"
        );
        Ok(true)
    }

    async fn updates_channel(&self, guild: GuildId) -> NexusResult<Option<ChannelId>> {
        let platform = self.ctx.platform.as_ref();

        let config = self.ctx.load_config().await?;
        if let Some(recorded) = config
            .setup(guild)
            .and_then(|setup| setup.channel("updates"))
        {
            if attempt("fetch updates channel", platform.channel(recorded))
                .await
                .is_some()
            {
                return Ok(Some(recorded));
            }
        }

        let channels = attempt("list channels", platform.channels(guild))
            .await
            .unwrap_or_default();
        if let Some(found) = self.find(&channels, ChannelKind::Text, &self.updates_regex) {
            return Ok(Some(found));
        }

        let category = match self.find(&channels, ChannelKind::Category, &self.info_regex) {
            Some(id) => Some(id),
            None => {
                let spec = NewChannel {
                    name: "📣 Info".to_string(),
                    kind: ChannelKind::Category,
                    parent: None,
                    topic: None,
                    overwrites: Vec::new(),
                };
                attempt("create info category", platform.create_channel(guild, &spec))
                    .await
                    .map(|category| category.id)
            }
        };

        let spec = NewChannel {
            name: "updates".to_string(),
            kind: ChannelKind::Text,
            parent: category,
            topic: None,
            overwrites: Vec::new(),
        };
        Ok(
            attempt("create updates channel", platform.create_channel(guild, &spec))
                .await
                .map(|channel| channel.id),
        )
    }

    fn find(&self, channels: &[ChannelInfo], kind: ChannelKind, pattern: &Regex) -> Option<ChannelId> {
        channels
            .iter()
            .find(|channel| channel.kind == kind && pattern.is_match(&channel.name))
            .map(|channel| channel.id)
    }

    async fn changelog_section(&self, version: &str) -> Option<String> {
        let path = self.ctx.settings.changelog_path();
        match tokio::fs::read_to_string(path).await {
            Ok(text) => parse_changelog(&text, version),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Changelog unreadable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHANGELOG: &str = "\
# Changelog

## [3.3.1] - 2025-01-10
- Tickets close after three seconds
- Starboard footer shows the channel

## [3.3.0]
- Autopost

## [3.2.0]
";

    #[test]
    fn test_section_stops_at_next_heading() {
        assert_eq!(
            parse_changelog(CHANGELOG, "3.3.1").as_deref(),
            Some("- Tickets close after three seconds\n- Starboard footer shows the channel")
        );
        assert_eq!(parse_changelog(CHANGELOG, "3.3.0").as_deref(), Some("- Autopost"));
    }

    #[test]
    fn test_empty_section_is_none() {
        assert_eq!(parse_changelog(CHANGELOG, "3.2.0"), None);
    }

    #[test]
    fn test_heading_level_must_match() {
        let text = "# 1.0.0\n### 1.0.0\nbody\n";
        assert_eq!(parse_changelog(text, "1.0.0"), None);
    }
}

//! Counters for automation activity.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics collector shared by the dispatcher and the health API.
#[derive(Debug, Clone)]
pub struct AutomationMetrics {
    inner: Arc<AutomationMetricsInner>,
}

#[derive(Debug)]
struct AutomationMetricsInner {
    started: Instant,
    guilds: AtomicU64,

    events_handled: AtomicU64,
    handler_failures: AtomicU64,

    guilds_provisioned: AtomicU64,
    autoposts: AtomicU64,
    moderation_deletions: AtomicU64,
    highlights: AtomicU64,
    level_ups: AtomicU64,
    announcements: AtomicU64,

    last_autopost: parking_lot::Mutex<Option<Instant>>,
}

impl Default for AutomationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl AutomationMetrics {
    /// Creates a new metrics collector; uptime counts from here.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AutomationMetricsInner {
                started: Instant::now(),
                guilds: AtomicU64::new(0),
                events_handled: AtomicU64::new(0),
                handler_failures: AtomicU64::new(0),
                guilds_provisioned: AtomicU64::new(0),
                autoposts: AtomicU64::new(0),
                moderation_deletions: AtomicU64::new(0),
                highlights: AtomicU64::new(0),
                level_ups: AtomicU64::new(0),
                announcements: AtomicU64::new(0),
                last_autopost: parking_lot::Mutex::new(None),
            }),
        }
    }

    /// Sets the number of guilds the bot is a member of.
    pub fn set_guilds(&self, count: u64) {
        self.inner.guilds.store(count, Ordering::Relaxed);
    }

    /// Records that the bot joined one more guild.
    pub fn record_guild_joined(&self) {
        self.inner.guilds.fetch_add(1, Ordering::Relaxed);
    }

    /// Records that the bot left a guild.
    pub fn record_guild_left(&self) {
        let _ = self
            .inner
            .guilds
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Records a dispatched event.
    pub fn record_event(&self) {
        self.inner.events_handled.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a handler that returned an error.
    pub fn record_failure(&self) {
        self.inner.handler_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a completed provisioning pass.
    pub fn record_provisioned(&self) {
        self.inner.guilds_provisioned.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a scheduled post.
    pub fn record_autopost(&self) {
        self.inner.autoposts.fetch_add(1, Ordering::Relaxed);
        *self.inner.last_autopost.lock() = Some(Instant::now());
    }

    /// Records a message removed by moderation.
    pub fn record_moderation_deletion(&self) {
        self.inner.moderation_deletions.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a starboard post.
    pub fn record_highlight(&self) {
        self.inner.highlights.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a member level-up.
    pub fn record_level_up(&self) {
        self.inner.level_ups.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a version announcement.
    pub fn record_announcement(&self) {
        self.inner.announcements.fetch_add(1, Ordering::Relaxed);
    }

    /// Gets the known guild count.
    pub fn guilds(&self) -> u64 {
        self.inner.guilds.load(Ordering::Relaxed)
    }

    /// Gets time since the collector was created.
    pub fn uptime(&self) -> std::time::Duration {
        self.inner.started.elapsed()
    }

    /// Gets dispatched event count.
    pub fn events_handled(&self) -> u64 {
        self.inner.events_handled.load(Ordering::Relaxed)
    }

    /// Gets handler failure count.
    pub fn handler_failures(&self) -> u64 {
        self.inner.handler_failures.load(Ordering::Relaxed)
    }

    /// Gets provisioned guild count.
    pub fn guilds_provisioned(&self) -> u64 {
        self.inner.guilds_provisioned.load(Ordering::Relaxed)
    }

    /// Gets scheduled post count.
    pub fn autoposts(&self) -> u64 {
        self.inner.autoposts.load(Ordering::Relaxed)
    }

    /// Gets moderation deletion count.
    pub fn moderation_deletions(&self) -> u64 {
        self.inner.moderation_deletions.load(Ordering::Relaxed)
    }

    /// Gets starboard post count.
    pub fn highlights(&self) -> u64 {
        self.inner.highlights.load(Ordering::Relaxed)
    }

    /// Gets level-up count.
    pub fn level_ups(&self) -> u64 {
        self.inner.level_ups.load(Ordering::Relaxed)
    }

    /// Gets version announcement count.
    pub fn announcements(&self) -> u64 {
        self.inner.announcements.load(Ordering::Relaxed)
    }

    /// Gets time since the last scheduled post.
    pub fn time_since_autopost(&self) -> Option<std::time::Duration> {
        self.inner
            .last_autopost
            .lock()
            .map(|instant| instant.elapsed())
    }

    /// Creates a serializable snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_seconds: self.uptime().as_secs(),
            guilds: self.guilds(),
            events_handled: self.events_handled(),
            handler_failures: self.handler_failures(),
            guilds_provisioned: self.guilds_provisioned(),
            autoposts: self.autoposts(),
            seconds_since_autopost: self.time_since_autopost().map(|d| d.as_secs()),
            moderation_deletions: self.moderation_deletions(),
            highlights: self.highlights(),
            level_ups: self.level_ups(),
            announcements: self.announcements(),
        }
    }
}

/// Serializable snapshot of automation metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Seconds since startup
    pub uptime_seconds: u64,
    /// Guilds the bot is a member of
    pub guilds: u64,
    /// Events dispatched
    pub events_handled: u64,
    /// Handlers that returned an error
    pub handler_failures: u64,
    /// Guilds provisioned by this process
    pub guilds_provisioned: u64,
    /// Scheduled posts
    pub autoposts: u64,
    /// Seconds since the last scheduled post
    pub seconds_since_autopost: Option<u64>,
    /// Messages removed by moderation
    pub moderation_deletions: u64,
    /// Starboard posts
    pub highlights: u64,
    /// Member level-ups
    pub level_ups: u64,
    /// Version announcements
    pub announcements: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_counters() {
        let metrics = AutomationMetrics::new();
        let handle = metrics.clone();
        handle.record_autopost();
        handle.record_guild_joined();
        metrics.record_guild_joined();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.autoposts, 1);
        assert_eq!(snapshot.guilds, 2);
        assert!(snapshot.seconds_since_autopost.is_some());
    }

    #[test]
    fn test_set_guilds_replaces_count() {
        let metrics = AutomationMetrics::new();
        metrics.record_guild_joined();
        metrics.set_guilds(5);
        assert_eq!(metrics.guilds(), 5);
    }

    #[test]
    fn test_guild_left_never_underflows() {
        let metrics = AutomationMetrics::new();
        metrics.record_guild_joined();
        metrics.record_guild_left();
        metrics.record_guild_left();
        assert_eq!(metrics.guilds(), 0);
    }
}

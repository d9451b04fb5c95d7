//! Tests for event routing and the dispatch loop.

mod common;

use async_trait::async_trait;
use common::{GUILD, MockPlatform, automation, automation_with, guild, member, message, settings};
use nexus_automation::Automation;
use nexus_core::{GuildConfig, UserId, UserProgressBook, VersionMarker};
use nexus_error::NexusResult;
use nexus_interface::AutomationEvent;
use nexus_storage::{Document, DocumentStore, InMemoryStore, StorageError, StorageErrorKind};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Store that reads normally and refuses every write.
#[derive(Default)]
struct ReadOnlyStore {
    inner: InMemoryStore,
}

#[async_trait]
impl DocumentStore for ReadOnlyStore {
    async fn load<D: Document>(&self) -> NexusResult<D> {
        self.inner.load().await
    }

    async fn save<D: Document>(&self, _document: &D) -> NexusResult<()> {
        Err(StorageError::new(StorageErrorKind::FileWrite("read-only".to_string())).into())
    }
}

fn ready() -> AutomationEvent {
    AutomationEvent::Ready {
        guilds: vec![guild()],
    }
}

#[tokio::test]
async fn test_ready_prepares_every_guild() {
    let platform = Arc::new(MockPlatform::new());
    let store = Arc::new(InMemoryStore::new());
    let automation = automation(platform.clone(), store.clone());

    automation.handle(ready()).await.unwrap();

    let config: GuildConfig = store.load().await.unwrap();
    assert!(config.is_provisioned(GUILD));
    let marker: VersionMarker = store.load().await.unwrap();
    assert_eq!(marker.last_announced, "3.3.1");
    let updates = platform.channel_named("updates").unwrap();
    assert_eq!(platform.sent_to(updates.id).len(), 1);
    assert_eq!(platform.state.lock().registered.len(), 1);

    let metrics = automation.metrics();
    assert_eq!(metrics.guilds(), 1);
    assert_eq!(metrics.guilds_provisioned(), 1);
    assert_eq!(metrics.announcements(), 1);
}

#[tokio::test]
async fn test_restart_is_quiet() {
    let platform = Arc::new(MockPlatform::new());
    let store = Arc::new(InMemoryStore::new());

    automation(platform.clone(), store.clone())
        .handle(ready())
        .await
        .unwrap();
    let sent = platform.sent().len();

    automation(platform.clone(), store.clone())
        .handle(ready())
        .await
        .unwrap();
    assert_eq!(platform.sent().len(), sent);
    assert_eq!(store.writes::<VersionMarker>(), 1);
}

#[tokio::test]
async fn test_guild_joined_provisions() {
    let platform = Arc::new(MockPlatform::new());
    let store = Arc::new(InMemoryStore::new());
    let automation = automation(platform.clone(), store.clone());

    automation
        .handle(AutomationEvent::GuildJoined(guild()))
        .await
        .unwrap();

    let config: GuildConfig = store.load().await.unwrap();
    assert!(config.is_provisioned(GUILD));
    assert_eq!(automation.metrics().guilds(), 1);
}

#[tokio::test]
async fn test_guild_left_lowers_guild_count() {
    let platform = Arc::new(MockPlatform::new());
    let store = Arc::new(InMemoryStore::new());
    let automation = automation(platform.clone(), store.clone());

    automation.handle(ready()).await.unwrap();
    assert_eq!(automation.metrics().guilds(), 1);

    automation
        .handle(AutomationEvent::GuildLeft(GUILD))
        .await
        .unwrap();
    assert_eq!(automation.metrics().guilds(), 0);

    // Leaving does not touch the stored setup.
    let config: GuildConfig = store.load().await.unwrap();
    assert!(config.is_provisioned(GUILD));
}

#[tokio::test]
async fn test_member_join_and_leave() {
    let platform = Arc::new(MockPlatform::new());
    let automation = automation(platform.clone(), Arc::new(InMemoryStore::new()));
    automation.handle(ready()).await.unwrap();
    let welcome = platform.channel_named("welcome").unwrap().id;
    let modlog = platform.channel_named("modlog").unwrap().id;
    let verified = platform.role_named("Verified").unwrap();

    automation
        .handle(AutomationEvent::MemberJoined(member(31)))
        .await
        .unwrap();
    automation
        .handle(AutomationEvent::MemberLeft(member(31)))
        .await
        .unwrap();

    let greeting = platform.sent_to(welcome).pop().unwrap();
    assert_eq!(greeting.content.as_deref(), Some("Welcome <@31>!"));
    assert_eq!(
        greeting.embeds[0].title.as_deref(),
        Some("Welcome to NEXUS Community!")
    );
    assert_eq!(platform.roles_of(UserId(31)), vec![verified]);

    let log: Vec<Option<String>> = platform
        .sent_to(modlog)
        .into_iter()
        .map(|m| m.content)
        .collect();
    assert_eq!(
        log,
        vec![
            Some("🟢 **Join:** user31 (31)".to_string()),
            Some("🔴 **Leave:** user31 (31)".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_member_events_without_setup_are_ignored() {
    let platform = Arc::new(MockPlatform::new());
    let automation = automation(platform.clone(), Arc::new(InMemoryStore::new()));

    automation
        .handle(AutomationEvent::MemberJoined(member(31)))
        .await
        .unwrap();

    assert!(platform.sent().is_empty());
    assert!(platform.roles_of(UserId(31)).is_empty());
}

#[tokio::test]
async fn test_bot_messages_are_ignored() {
    let platform = Arc::new(MockPlatform::new());
    let store = Arc::new(InMemoryStore::new());
    let automation = automation(platform.clone(), store.clone());

    let mut event = message(50, &"a".repeat(5000), 1_000_000);
    event.author_bot = true;
    automation
        .handle(AutomationEvent::MessageCreated(event))
        .await
        .unwrap();

    assert!(platform.state.lock().deleted_messages.is_empty());
    assert_eq!(store.writes::<UserProgressBook>(), 0);
}

#[tokio::test]
async fn test_failures_are_logged_and_swallowed() {
    let platform = Arc::new(MockPlatform::new());
    let automation = Automation::new(
        platform,
        Arc::new(ReadOnlyStore::default()),
        settings().build().unwrap(),
    )
    .unwrap();

    automation
        .dispatch(AutomationEvent::GuildJoined(guild()))
        .await
        .unwrap();
    assert_eq!(automation.metrics().handler_failures(), 1);
    assert_eq!(automation.metrics().events_handled(), 1);
}

#[tokio::test]
async fn test_strict_exit_surfaces_failures() {
    let platform = Arc::new(MockPlatform::new());
    let automation = Automation::new(
        platform,
        Arc::new(ReadOnlyStore::default()),
        settings().strict_exit(true).build().unwrap(),
    )
    .unwrap();

    let (tx, rx) = mpsc::channel(4);
    tx.send(AutomationEvent::GuildJoined(guild())).await.unwrap();
    tx.send(AutomationEvent::MemberLeft(member(1))).await.unwrap();

    assert!(automation.run(rx).await.is_err());
    assert_eq!(automation.metrics().events_handled(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_posts_after_ready_and_stops_on_close() {
    let platform = Arc::new(MockPlatform::new());
    let store = Arc::new(InMemoryStore::new());
    let automation = automation_with(
        platform.clone(),
        store.clone(),
        settings()
            .autopost_poll(Duration::from_secs(60))
            .build()
            .unwrap(),
    );

    let (tx, rx) = mpsc::channel(4);
    let feeder = async move {
        tx.send(ready()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(90)).await;
    };
    let (outcome, ()) = tokio::join!(automation.run(rx), feeder);
    outcome.unwrap();

    let chat = platform.channel_named("chat").unwrap().id;
    assert_eq!(platform.sent_to(chat).len(), 1);
    let config: GuildConfig = store.load().await.unwrap();
    assert!(config.autopost.last_post > 0);
    assert_eq!(automation.metrics().autoposts(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_without_ready_never_posts() {
    let platform = Arc::new(MockPlatform::new());
    let automation = automation(platform.clone(), Arc::new(InMemoryStore::new()));

    let (tx, rx) = mpsc::channel::<AutomationEvent>(4);
    let feeder = async move {
        tokio::time::sleep(Duration::from_secs(600)).await;
        drop(tx);
    };
    let (outcome, ()) = tokio::join!(automation.run(rx), feeder);
    outcome.unwrap();

    assert!(platform.sent().is_empty());
    assert_eq!(automation.metrics().events_handled(), 0);
}

//! Tests for starboard highlights.

mod common;

use common::{MockPlatform, automation, guild, star};
use nexus_automation::HighlightCurator;
use nexus_interface::AutomationEvent;
use nexus_storage::InMemoryStore;
use std::sync::Arc;

async fn provisioned() -> (
    Arc<MockPlatform>,
    nexus_automation::Automation<MockPlatform, InMemoryStore>,
) {
    let platform = Arc::new(MockPlatform::new());
    let automation = automation(platform.clone(), Arc::new(InMemoryStore::new()));
    automation
        .provisioner()
        .ensure_provisioned(&guild())
        .await
        .unwrap();
    (platform, automation)
}

fn curator(
    automation: &nexus_automation::Automation<MockPlatform, InMemoryStore>,
) -> HighlightCurator<MockPlatform, InMemoryStore> {
    HighlightCurator::new(automation.context().clone())
}

#[tokio::test]
async fn test_threshold_reached_posts_summary() {
    let (platform, automation) = provisioned().await;
    let starboard = platform.channel_named("starboard").unwrap();

    assert!(curator(&automation).on_reaction(&star(3)).await.unwrap());

    let sent = platform.sent_to(starboard.id);
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].content.as_deref(), Some("⭐ **3** by <@42>"));
    let embed = &sent[0].embeds[0];
    assert_eq!(embed.author.as_deref(), Some("author"));
    assert_eq!(embed.description.as_deref(), Some("great post"));
    assert_eq!(embed.footer.as_deref(), Some("#chat • ⭐ 3 • 555"));
}

#[tokio::test]
async fn test_below_threshold_is_ignored() {
    let (platform, automation) = provisioned().await;
    let before = platform.sent().len();
    assert!(!curator(&automation).on_reaction(&star(2)).await.unwrap());
    assert_eq!(platform.sent().len(), before);
}

#[tokio::test]
async fn test_bot_and_other_emoji_are_ignored() {
    let (platform, automation) = provisioned().await;
    let before = platform.sent().len();

    let mut by_bot = star(5);
    by_bot.reactor_bot = true;
    assert!(!curator(&automation).on_reaction(&by_bot).await.unwrap());

    let mut heart = star(5);
    heart.emoji = "❤️".to_string();
    assert!(!curator(&automation).on_reaction(&heart).await.unwrap());

    assert_eq!(platform.sent().len(), before);
}

#[tokio::test]
async fn test_without_starboard_nothing_is_posted() {
    let platform = Arc::new(MockPlatform::new());
    let automation = automation(platform.clone(), Arc::new(InMemoryStore::new()));
    assert!(!curator(&automation).on_reaction(&star(10)).await.unwrap());
    assert!(platform.sent().is_empty());
}

#[tokio::test]
async fn test_every_qualifying_reaction_reposts() {
    let (platform, automation) = provisioned().await;
    let starboard = platform.channel_named("starboard").unwrap();

    automation
        .handle(AutomationEvent::ReactionAdded(star(3)))
        .await
        .unwrap();
    automation
        .handle(AutomationEvent::ReactionAdded(star(4)))
        .await
        .unwrap();

    assert_eq!(platform.sent_to(starboard.id).len(), 2);
    assert_eq!(automation.metrics().highlights(), 2);
}

//! Discord client setup and lifecycle management.

use crate::{NexusHandler, SerenityPlatform};
use nexus_error::{PlatformError, PlatformErrorKind, PlatformResult};
use nexus_interface::AutomationEvent;
use serenity::Client;
use serenity::all::ApplicationId;
use serenity::gateway::ShardManager;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, instrument};

/// Gateway connection of the NEXUS bot.
///
/// # Example
/// ```no_run
/// use nexus_discord::NexusBot;
/// use tokio::sync::mpsc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let token = std::env::var("BOT_TOKEN")?;
///     let application_id: u64 = std::env::var("CLIENT_ID")?.parse()?;
///     let (tx, _rx) = mpsc::channel(256);
///
///     let mut bot = NexusBot::new(&token, application_id, tx).await?;
///     bot.start().await?;
///     Ok(())
/// }
/// ```
pub struct NexusBot {
    client: Client,
}

impl NexusBot {
    /// Build the client for `application_id`; gateway events are forwarded
    /// into `events`.
    ///
    /// # Errors
    /// Returns an error if the Serenity client fails to initialize.
    #[instrument(skip_all, fields(token_len = token.len(), application_id = application_id))]
    pub async fn new(
        token: &str,
        application_id: u64,
        events: mpsc::Sender<AutomationEvent>,
    ) -> PlatformResult<Self> {
        let intents = NexusHandler::intents();
        info!(?intents, "Building Serenity client");

        let client = Client::builder(token, intents)
            .application_id(ApplicationId::new(application_id))
            .event_handler(NexusHandler::new(events))
            .await
            .map_err(|e| {
                PlatformError::new(PlatformErrorKind::ConnectionFailed(format!(
                    "Failed to build client: {}",
                    e
                )))
            })?;

        Ok(Self { client })
    }

    /// Platform capabilities sharing this client's HTTP connection.
    pub fn platform(&self) -> SerenityPlatform {
        SerenityPlatform::new(Arc::clone(&self.client.http))
    }

    /// Handle used to close the gateway connection from another task.
    pub fn shard_manager(&self) -> Arc<ShardManager> {
        Arc::clone(&self.client.shard_manager)
    }

    /// Connect and process gateway events until shut down.
    ///
    /// # Errors
    /// Returns an error if the gateway connection fails.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> PlatformResult<()> {
        info!("Starting Discord client");
        self.client.start().await.map_err(|e| {
            PlatformError::new(PlatformErrorKind::ConnectionFailed(format!(
                "Client error: {}",
                e
            )))
        })
    }
}

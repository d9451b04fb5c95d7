//! Shared handles passed to every component.

use crate::{AutomationMetrics, AutomationSettings};
use nexus_core::GuildConfig;
use nexus_error::NexusResult;
use nexus_storage::DocumentStore;
use std::sync::Arc;

/// Platform, store, settings and metrics shared by the components.
pub struct Context<P, S> {
    /// Chat platform.
    pub platform: Arc<P>,
    /// Document store.
    pub store: Arc<S>,
    /// Runtime switches.
    pub settings: Arc<AutomationSettings>,
    /// Counters.
    pub metrics: AutomationMetrics,
}

impl<P, S> Clone for Context<P, S> {
    fn clone(&self) -> Self {
        Self {
            platform: Arc::clone(&self.platform),
            store: Arc::clone(&self.store),
            settings: Arc::clone(&self.settings),
            metrics: self.metrics.clone(),
        }
    }
}

impl<P, S: DocumentStore> Context<P, S> {
    /// Bundle the shared handles.
    pub fn new(platform: Arc<P>, store: Arc<S>, settings: AutomationSettings) -> Self {
        Self {
            platform,
            store,
            settings: Arc::new(settings),
            metrics: AutomationMetrics::new(),
        }
    }

    /// Load the guild configuration with the environment brand applied.
    pub async fn load_config(&self) -> NexusResult<GuildConfig> {
        let mut config: GuildConfig = self.store.load().await?;
        self.settings.brand_overrides().apply(&mut config.brand);
        Ok(config)
    }
}

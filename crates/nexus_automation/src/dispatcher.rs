//! Sequential event dispatch.

use crate::{
    AutomationMetrics, AutomationSettings, CommandRouter, Context, HighlightCurator,
    MemberGreeter, ModerationFilter, ProgressionTracker, Provisioner, Scheduler,
    VersionAnnouncer, Verdict,
};
use nexus_error::{NexusError, NexusResult};
use nexus_interface::{AutomationEvent, GuildSummary, Platform};
use nexus_storage::DocumentStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, instrument, warn};

/// All automation components behind one sequential entry point.
///
/// Events are handled one at a time, so components never observe each
/// other's half-written documents.
pub struct Automation<P, S> {
    ctx: Context<P, S>,
    provisioner: Provisioner<P, S>,
    progression: ProgressionTracker<P, S>,
    moderation: ModerationFilter<P, S>,
    highlights: HighlightCurator<P, S>,
    scheduler: Scheduler<P, S>,
    announcer: VersionAnnouncer<P, S>,
    members: MemberGreeter<P, S>,
    commands: CommandRouter<P, S>,
}

impl<P, S> Automation<P, S>
where
    P: Platform + 'static,
    S: DocumentStore + 'static,
{
    /// Wire every component to the same platform, store and settings.
    pub fn new(platform: Arc<P>, store: Arc<S>, settings: AutomationSettings) -> NexusResult<Self> {
        let ctx = Context::new(platform, store, settings);
        Ok(Self {
            provisioner: Provisioner::new(ctx.clone()),
            progression: ProgressionTracker::new(ctx.clone()),
            moderation: ModerationFilter::new(ctx.clone())?,
            highlights: HighlightCurator::new(ctx.clone()),
            scheduler: Scheduler::new(ctx.clone()),
            announcer: VersionAnnouncer::new(ctx.clone())?,
            members: MemberGreeter::new(ctx.clone()),
            commands: CommandRouter::new(ctx.clone()),
            ctx,
        })
    }

    /// Shared counters.
    pub fn metrics(&self) -> AutomationMetrics {
        self.ctx.metrics.clone()
    }

    /// Shared handles.
    pub fn context(&self) -> &Context<P, S> {
        &self.ctx
    }

    /// The provisioning engine.
    pub fn provisioner(&self) -> &Provisioner<P, S> {
        &self.provisioner
    }

    /// The progression tracker.
    pub fn progression(&self) -> &ProgressionTracker<P, S> {
        &self.progression
    }

    /// The moderation filter.
    pub fn moderation(&self) -> &ModerationFilter<P, S> {
        &self.moderation
    }

    /// The scheduler.
    pub fn scheduler(&self) -> &Scheduler<P, S> {
        &self.scheduler
    }

    /// The version announcer.
    pub fn announcer(&self) -> &VersionAnnouncer<P, S> {
        &self.announcer
    }

    /// Route one event to its component.
    #[instrument(skip_all, fields(event = %event))]
    pub async fn handle(&self, event: AutomationEvent) -> NexusResult<()> {
        self.ctx.metrics.record_event();
        match event {
            AutomationEvent::Ready { guilds } => self.on_ready(&guilds).await?,
            AutomationEvent::GuildJoined(guild) => {
                info!(guild = %guild.id, name = %guild.name, "Joined guild");
                self.ctx.metrics.record_guild_joined();
                self.provisioner.ensure_provisioned(&guild).await?;
            }
            AutomationEvent::GuildLeft(guild) => {
                info!(guild = %guild, "Left guild");
                self.ctx.metrics.record_guild_left();
            }
            AutomationEvent::MemberJoined(member) => self.members.on_join(&member).await?,
            AutomationEvent::MemberLeft(member) => self.members.on_leave(&member).await?,
            AutomationEvent::MessageCreated(message) => {
                if message.author_bot {
                    return Ok(());
                }
                // Removed messages earn no experience.
                if let Verdict::Delete(_) = self.moderation.enforce(&message).await {
                    return Ok(());
                }
                self.progression.on_message(&message).await?;
            }
            AutomationEvent::ReactionAdded(reaction) => {
                self.highlights.on_reaction(&reaction).await?;
            }
            AutomationEvent::CommandInvoked(command) => self.commands.on_command(&command).await?,
            AutomationEvent::ComponentInvoked(component) => {
                self.commands.on_component(&component).await?
            }
            AutomationEvent::AutopostTick { now_ms } => {
                self.scheduler.tick(now_ms).await?;
            }
        }
        Ok(())
    }

    /// Handle one event, logging its failure.
    ///
    /// Returns the failure only when strict exit is enabled.
    pub async fn dispatch(&self, event: AutomationEvent) -> NexusResult<()> {
        let name = event.to_string();
        match self.handle(event).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.ctx.metrics.record_failure();
                error!(event = %name, error = %e, "Event handler failed");
                if *self.ctx.settings.strict_exit() {
                    Err(e)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Dispatch events until the sender side closes.
    ///
    /// After the first `Ready` event an autopost tick is injected every
    /// polling period, serialized with the other events.
    pub async fn run(&self, mut events: mpsc::Receiver<AutomationEvent>) -> NexusResult<()> {
        let period = *self.ctx.settings.autopost_poll();
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut ready = false;

        info!(poll_secs = period.as_secs(), "Automation dispatcher started");
        loop {
            tokio::select! {
                event = events.recv() => {
                    let Some(event) = event else {
                        break;
                    };
                    if !ready && matches!(event, AutomationEvent::Ready { .. }) {
                        ready = true;
                        ticker.reset();
                    }
                    self.dispatch(event).await?;
                }
                _ = ticker.tick(), if ready => {
                    let now_ms = chrono::Utc::now().timestamp_millis();
                    self.dispatch(AutomationEvent::AutopostTick { now_ms }).await?;
                }
            }
        }
        info!("Event channel closed, dispatcher stopping");
        Ok(())
    }

    async fn on_ready(&self, guilds: &[GuildSummary]) -> NexusResult<()> {
        info!(guilds = guilds.len(), "Automation ready");
        self.ctx.metrics.set_guilds(guilds.len() as u64);
        self.commands.register().await;

        let mut first_error: Option<NexusError> = None;
        for guild in guilds {
            let prepared = async {
                self.provisioner.ensure_provisioned(guild).await?;
                self.announcer.announce_if_changed(guild.id).await?;
                NexusResult::Ok(())
            }
            .await;
            if let Err(e) = prepared {
                warn!(guild = %guild.id, error = %e, "Guild preparation failed");
                first_error.get_or_insert(e);
            } else {
                debug!(guild = %guild.id, "Guild prepared");
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

//! Member join and leave handling.

use crate::{Context, attempt, welcome_embed};
use nexus_error::NexusResult;
use nexus_interface::{MemberEvent, OutgoingMessage, Platform};
use nexus_storage::DocumentStore;
use tracing::{debug, instrument};

/// Welcomes new members and logs membership changes to the modlog.
pub struct MemberGreeter<P, S> {
    ctx: Context<P, S>,
}

impl<P: Platform, S: DocumentStore> MemberGreeter<P, S> {
    /// Create a greeter.
    pub fn new(ctx: Context<P, S>) -> Self {
        Self { ctx }
    }

    /// Greet a new member, grant Verified and log the join.
    #[instrument(skip_all, fields(guild = %member.guild, user = %member.user))]
    pub async fn on_join(&self, member: &MemberEvent) -> NexusResult<()> {
        let config = self.ctx.load_config().await?;
        let Some(setup) = config.setup(member.guild) else {
            debug!("Guild has no setup record");
            return Ok(());
        };
        let platform = self.ctx.platform.as_ref();

        if let Some(welcome) = setup.channel("welcome") {
            let embed = welcome_embed(
                &config.brand,
                &member.guild_name,
                chrono::Utc::now().timestamp_millis(),
            );
            let message =
                OutgoingMessage::text(format!("Welcome <@{}>!", member.user)).embeds(vec![embed]);
            attempt("send welcome", platform.send_message(welcome, &message)).await;
        }

        if let Some(verified) = setup.role("Verified") {
            attempt(
                "grant verified",
                platform.add_member_role(member.guild, member.user, verified),
            )
            .await;
        }

        if let Some(modlog) = setup.channel("modlog") {
            let line = format!("🟢 **Join:** {} ({})", member.user_tag, member.user);
            attempt(
                "log join",
                platform.send_message(modlog, &OutgoingMessage::text(line)),
            )
            .await;
        }
        Ok(())
    }

    /// Log a departed member.
    #[instrument(skip_all, fields(guild = %member.guild, user = %member.user))]
    pub async fn on_leave(&self, member: &MemberEvent) -> NexusResult<()> {
        let config = self.ctx.load_config().await?;
        let Some(modlog) = config
            .setup(member.guild)
            .and_then(|setup| setup.channel("modlog"))
        else {
            return Ok(());
        };
        let line = format!("🔴 **Leave:** {} ({})", member.user_tag, member.user);
        attempt(
            "log leave",
            self.ctx
                .platform
                .send_message(modlog, &OutgoingMessage::text(line)),
        )
        .await;
        Ok(())
    }
}

//! NEXUS community bot.
//!
//! Connects to Discord, forwards gateway events to the automation
//! dispatcher and serves the health API next to it.

use clap::Parser;
use nexus::{
    ApiState, Cli, Commands, Settings, check_documents, init_telemetry, install_panic_hook, serve,
};
use nexus_automation::Automation;
use nexus_discord::NexusBot;
use nexus_storage::JsonFileStore;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Events buffered between the gateway and the dispatcher.
const EVENT_BUFFER: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_telemetry(cli.log_json);

    let settings = Settings::load(&cli.config)?;
    match cli.command() {
        Commands::Check => check(&settings).await,
        Commands::Run => run(settings).await,
    }
}

async fn check(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
    let store = JsonFileStore::new(settings.data_dir())?;
    let report = check_documents(&store).await?;

    println!("NEXUS BOT V{}", env!("CARGO_PKG_VERSION"));
    println!("client id:   {}", settings.application_id()?);
    match settings.dev_guild()? {
        Some(guild) => println!("commands:    guild {}", guild),
        None => println!("commands:    global"),
    }
    if let Some(dev) = settings.dev_user() {
        println!("developer:   {}", dev);
    }
    println!("data dir:    {}", store.base_path().display());
    println!("{}", report);
    Ok(())
}

async fn run(settings: Settings) -> Result<(), Box<dyn std::error::Error>> {
    install_panic_hook(*settings.auto_exit_on_fail());
    info!(version = env!("CARGO_PKG_VERSION"), "Starting NEXUS bot");

    let store = Arc::new(JsonFileStore::new(settings.data_dir())?);
    let (tx, rx) = mpsc::channel(EVENT_BUFFER);

    let mut bot = NexusBot::new(settings.bot_token(), settings.application_id()?, tx).await?;
    let shard_manager = bot.shard_manager();
    let platform = Arc::new(bot.platform());

    let automation = Arc::new(Automation::new(
        platform,
        store,
        settings.automation_settings()?,
    )?);

    let api_state = ApiState::new(automation.metrics(), env!("CARGO_PKG_VERSION"));
    let port = *settings.port();
    tokio::spawn(async move {
        if let Err(e) = serve(port, api_state).await {
            error!(error = %e, "Health API stopped");
        }
    });

    let dispatcher = {
        let automation = Arc::clone(&automation);
        tokio::spawn(async move { automation.run(rx).await })
    };

    tokio::select! {
        result = bot.start() => {
            result?;
            info!("Discord client stopped");
        }
        joined = dispatcher => {
            shard_manager.shutdown_all().await;
            match joined {
                Ok(Ok(())) => info!("Dispatcher finished"),
                Ok(Err(e)) => {
                    error!(error = %e, "Dispatcher stopped on failure");
                    return Err(e.into());
                }
                Err(e) => {
                    error!(error = %e, "Dispatcher task aborted");
                    return Err(e.into());
                }
            }
        }
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Cannot listen for shutdown signal");
            }
            info!("Shutting down");
            shard_manager.shutdown_all().await;
        }
    }
    Ok(())
}

//! Command-line interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// NEXUS community bot.
#[derive(Parser, Debug)]
#[command(name = "nexus")]
#[command(about = "NEXUS community bot - server setup, leveling, moderation and autopost")]
#[command(version)]
pub struct Cli {
    /// Optional settings file layered over the bundled defaults
    #[arg(short, long, default_value = "nexus.toml", global = true)]
    pub config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON", global = true)]
    pub log_json: bool,

    /// What to do (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Commands {
    /// Connect to Discord and run the automation
    #[default]
    Run,
    /// Validate settings and stored documents, then exit
    Check,
}

impl Cli {
    /// The selected subcommand.
    pub fn command(&self) -> Commands {
        self.command.unwrap_or_default()
    }
}

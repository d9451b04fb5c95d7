//! Discord transport for the NEXUS community bot.
//!
//! This crate connects the automation core to Discord using Serenity:
//!
//! - **client**: gateway client setup and lifecycle
//! - **handler**: translates gateway events into [`AutomationEvent`]s
//! - **platform**: implements [`Platform`] on top of the REST client
//! - **convert**: mapping between core types and Serenity models
//!
//! # Usage
//!
//! ```rust,ignore
//! use nexus_discord::NexusBot;
//! use tokio::sync::mpsc;
//!
//! let (tx, rx) = mpsc::channel(256);
//! let mut bot = NexusBot::new(&token, application_id, tx).await?;
//! let platform = bot.platform();
//! // hand `platform` and `rx` to the automation dispatcher
//! bot.start().await?;
//! ```
//!
//! [`AutomationEvent`]: nexus_interface::AutomationEvent
//! [`Platform`]: nexus_interface::Platform

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod convert;
mod handler;
mod platform;

pub use client::NexusBot;
pub use convert::snowflake_ms;
pub use handler::NexusHandler;
pub use platform::SerenityPlatform;

//! NEXUS community bot runtime: settings, telemetry, health API and the
//! `check` report.
//!
//! The binary in `main.rs` wires these together with the Discord transport
//! and the automation dispatcher.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod check;
mod cli;
mod settings;
mod telemetry;

pub use api::{ApiState, HealthReport, banner, create_router, get_metrics, health_check, serve};
pub use check::{CheckReport, check_documents};
pub use cli::{Cli, Commands};
pub use settings::Settings;
pub use telemetry::{init_telemetry, install_panic_hook};

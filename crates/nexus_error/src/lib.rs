//! Error types for the NEXUS community bot.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use nexus_error::{NexusResult, PlatformError, PlatformErrorKind};
//!
//! fn send() -> NexusResult<()> {
//!     Err(PlatformError::new(PlatformErrorKind::MessageSendFailed(
//!         "Missing Access".to_string(),
//!     )))?
//! }
//!
//! assert!(send().is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod json;
mod platform;
mod storage;

pub use config::ConfigError;
pub use error::{NexusError, NexusErrorKind, NexusResult};
pub use json::JsonError;
pub use platform::{PlatformError, PlatformErrorKind, PlatformResult};
pub use storage::{StorageError, StorageErrorKind};

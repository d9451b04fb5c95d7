//! Top-level error wrapper types.

use crate::{ConfigError, JsonError, PlatformError, StorageError};

/// Every error the bot can surface, grouped by origin.
///
/// # Examples
///
/// ```
/// use nexus_error::{ConfigError, NexusError};
///
/// let err: NexusError = ConfigError::new("CLIENT_ID is not set").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum NexusErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Document storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Chat platform error
    #[from(PlatformError)]
    Platform(PlatformError),
}

/// NEXUS error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("NEXUS Error: {}", _0)]
pub struct NexusError(Box<NexusErrorKind>);

impl NexusError {
    /// Create a new error from a kind.
    pub fn new(kind: NexusErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &NexusErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to NexusErrorKind
impl<T> From<T> for NexusError
where
    T: Into<NexusErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for NEXUS operations.
pub type NexusResult<T> = std::result::Result<T, NexusError>;

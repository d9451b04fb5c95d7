//! Chat platform error types.
//!
//! Every call the automation core makes through the platform capability
//! interface reports failures with these types. Transport adapters convert
//! their native errors into a [`PlatformErrorKind`].

/// Platform error variants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PlatformErrorKind {
    /// Transport-level API error (HTTP failure, gateway error, rate limit).
    #[display("Platform API error: {_0}")]
    Api(String),

    /// Channel not found by ID.
    #[display("Channel not found: {_0}")]
    ChannelNotFound(u64),

    /// Bot lacks required permissions for an operation.
    #[display("Insufficient permissions: {_0}")]
    InsufficientPermissions(String),

    /// Message failed to send.
    #[display("Message send failed: {_0}")]
    MessageSendFailed(String),

    /// Interaction (slash command, button) response failed.
    #[display("Interaction failed: {_0}")]
    InteractionFailed(String),

    /// Connection to the platform gateway failed.
    #[display("Connection failed: {_0}")]
    ConnectionFailed(String),
}

/// Platform error with source location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Platform Error: {} at line {} in {}", kind, line, file)]
pub struct PlatformError {
    /// Error kind.
    pub kind: PlatformErrorKind,
    /// Line number where the error occurred.
    pub line: u32,
    /// File where the error occurred.
    pub file: &'static str,
}

impl PlatformError {
    /// Create a new PlatformError with automatic location tracking.
    ///
    /// # Example
    /// ```
    /// use nexus_error::{PlatformError, PlatformErrorKind};
    ///
    /// let err = PlatformError::new(PlatformErrorKind::ChannelNotFound(42));
    /// assert!(err.to_string().contains("42"));
    /// ```
    #[track_caller]
    pub fn new(kind: PlatformErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PlatformErrorKind {
        &self.kind
    }
}

/// Result type for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

#[cfg(feature = "discord")]
impl From<serenity::Error> for PlatformError {
    #[track_caller]
    fn from(err: serenity::Error) -> Self {
        use serenity::http::HttpError;

        let kind = match &err {
            serenity::Error::Http(HttpError::UnsuccessfulRequest(response))
                if response.status_code.as_u16() == 403 =>
            {
                PlatformErrorKind::InsufficientPermissions(response.error.message.clone())
            }
            serenity::Error::Gateway(e) => PlatformErrorKind::ConnectionFailed(e.to_string()),
            other => PlatformErrorKind::Api(other.to_string()),
        };
        PlatformError::new(kind)
    }
}

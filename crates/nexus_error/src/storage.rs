//! Document storage error types.

/// What went wrong while reading or writing a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StorageErrorKind {
    /// Failed to create the data directory
    #[display("Failed to create data directory: {}", _0)]
    DirectoryCreation(String),
    /// Failed to write a document
    #[display("Failed to write document: {}", _0)]
    FileWrite(String),
    /// Failed to read a document
    #[display("Failed to read document: {}", _0)]
    FileRead(String),
    /// Document could not be encoded
    #[display("Failed to encode document: {}", _0)]
    Encode(String),
}

/// A storage failure and where it was raised.
///
/// # Examples
///
/// ```
/// use nexus_error::{StorageError, StorageErrorKind};
///
/// let err = StorageError::new(StorageErrorKind::FileWrite("data/users.json".to_string()));
/// assert!(format!("{}", err).contains("users.json"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Storage Error: {} at line {} in {}", kind, line, file)]
pub struct StorageError {
    /// What failed
    pub kind: StorageErrorKind,
    /// Line that raised the error
    pub line: u32,
    /// Source file that raised the error
    pub file: &'static str,
}

impl StorageError {
    /// Wrap `kind`, recording the caller's location.
    #[track_caller]
    pub fn new(kind: StorageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

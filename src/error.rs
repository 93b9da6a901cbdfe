//! Error types for the encryption library.
//!
//! This module defines all error types that can occur while loading, encrypting
//! and saving a PDF.

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during PDF encryption.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input bytes are not a loadable PDF document
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    /// Malformed hex text or file identifier data
    #[error("Invalid format: {0}")]
    Format(String),

    /// RC4 key that is empty or longer than 256 bytes
    #[error("Invalid RC4 key length: {0} bytes")]
    InvalidKeyLength(usize),

    /// Document already carries an /Encrypt dictionary
    #[error("PDF is already password protected")]
    AlreadyEncrypted,

    /// The document model failed to serialize the output
    #[error("Failed to write PDF: {0}")]
    Serialize(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Object graph nested deeper than the traversal allows
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(u32),

    /// Any failure during an encryption call, wrapped once at the top level
    #[error("Failed to encrypt PDF: {0}")]
    EncryptionFailure(#[source] Box<Error>),
}

impl Error {
    /// Wrap an error as an [`Error::EncryptionFailure`].
    ///
    /// Already wrapped errors are returned unchanged so callers never see a
    /// doubled "Failed to encrypt PDF" prefix.
    pub fn encryption_failure(cause: Error) -> Self {
        match cause {
            Error::EncryptionFailure(_) => cause,
            other => Error::EncryptionFailure(Box::new(other)),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        Error::Parse(err.to_string())
    }
}

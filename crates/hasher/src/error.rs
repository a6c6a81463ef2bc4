use thiserror::Error;

/// Errors that can occur while hashing or verifying a password.
///
/// A wrong password is *not* an error: it is reported as
/// [`Verification::NoMatch`](crate::Verification::NoMatch). Callers must map
/// every variant here to the same generic authentication failure when talking
/// to an end user.
#[derive(Debug, Error)]
pub enum HashError {
    /// The caller supplied an empty or whitespace-only plaintext or blob.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The stored hash passed comparison but its header could not be parsed.
    ///
    /// This indicates a corrupted or forged stored value and should be
    /// investigated server-side.
    #[error("stored hash is corrupt: {0}")]
    CorruptHash(String),

    /// The cost configuration cannot be used to derive keys.
    #[error("invalid cost configuration: {0}")]
    InvalidConfig(String),

    /// The scrypt primitive rejected the derivation request.
    #[error("key derivation failed: {0}")]
    Derivation(String),

    /// A blocking hashing task panicked or was cancelled.
    #[error("hashing worker failed: {0}")]
    Worker(String),
}

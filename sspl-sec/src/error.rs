//! Defines custom error types for the security library.

use thiserror::Error;

#[derive(Error, Debug)]
/// Error type returned when a security operation fails.
pub enum SecError {
    #[error("Invalid method: '{0}'")]
    InvalidMethod(String),

    #[error("Invalid session token: expected {expected} bytes, got {actual}")]
    InvalidTokenLength { expected: usize, actual: usize },

    #[error("Invalid signature: expected {expected} bytes, got {actual}")]
    InvalidSignatureLength { expected: usize, actual: usize },

    #[error("Session length of {0} seconds overflows the expiry timestamp")]
    SessionLengthOverflow(u64),

    #[error("Session expired at {expiry} (now {now})")]
    SessionExpired { expiry: u64, now: u64 },

    #[error("User '{0}' has no enrolled public key")]
    UnknownUser(String),

    #[error("Signature verification failed: {0}")]
    BadSignature(String),

    #[error("Failed to derive user key: {0}")]
    KeyDerivation(String),

    #[error("Invalid base64 data: {0}")]
    Base64(String),

    #[error("Key store error: {0}")]
    KeyStore(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SecError>;

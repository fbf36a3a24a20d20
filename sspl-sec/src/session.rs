//! Fixed-length session tokens.

use crate::b64;
use crate::error::{Result, SecError};
use crate::method::Method;
use crate::pki;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Every token starts with its expiry as big-endian unix seconds.
pub const EXPIRY_LEN: usize = 8;

/// Default lifetime of a session.
pub const DEFAULT_SESSION_LENGTH: Duration = Duration::from_secs(60 * 60);

/// Size in bytes of a session token produced by `method`.
pub fn token_length(method: Method) -> usize {
    match method {
        Method::None => EXPIRY_LEN,
        Method::Pki => pki::TOKEN_LEN,
    }
}

/// Current time as unix seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

pub(crate) fn expiry_after(now: u64, session_length: Duration) -> Result<u64> {
    let seconds = session_length.as_secs();
    now.checked_add(seconds)
        .ok_or(SecError::SessionLengthOverflow(seconds))
}

pub(crate) fn read_expiry(bytes: &[u8]) -> u64 {
    let mut expiry = [0u8; EXPIRY_LEN];
    expiry.copy_from_slice(&bytes[..EXPIRY_LEN]);
    u64::from_be_bytes(expiry)
}

/// Opaque credential returned by
/// [`SecContext::generate_session_token`](crate::SecContext::generate_session_token).
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken {
    method: Method,
    bytes: Vec<u8>,
}

impl SessionToken {
    /// Wraps raw token bytes, checking they have the length `method` produces.
    pub fn from_bytes(method: Method, bytes: &[u8]) -> Result<Self> {
        let expected = token_length(method);
        if bytes.len() != expected {
            return Err(SecError::InvalidTokenLength {
                expected,
                actual: bytes.len(),
            });
        }

        Ok(Self {
            method,
            bytes: bytes.to_vec(),
        })
    }

    pub fn from_base64(method: Method, text: &str) -> Result<Self> {
        Self::from_bytes(method, &b64::decode(text)?)
    }

    pub(crate) fn from_vec(method: Method, bytes: Vec<u8>) -> Self {
        debug_assert_eq!(bytes.len(), token_length(method));
        Self { method, bytes }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Unix second at which the session stops verifying.
    pub fn expiry(&self) -> u64 {
        read_expiry(&self.bytes)
    }

    pub fn to_base64(&self) -> String {
        b64::encode(&self.bytes)
    }
}

// Tokens hold session secrets; keep them out of logs.
impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionToken")
            .field("method", &self.method)
            .field("expiry", &self.expiry())
            .finish_non_exhaustive()
    }
}

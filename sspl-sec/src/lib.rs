//! `sspl-sec` produces session tokens and signs messages on behalf of a
//! user, with a selectable security method.
//!
//! Two methods are available:
//!
//! - [`Method::None`]: no cryptographic protection. Tokens only carry their
//!   expiry, signatures are empty and every signature verifies.
//! - [`Method::Pki`]: each session gets a fresh Ed25519 key, endorsed by a
//!   long-term key derived from the user's password. Verifiers only need the
//!   user's public key, held in a [`KeyStore`].
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use sspl_sec::{KeyStore, Method, SecContext};
//!
//! # fn demo() -> Result<(), sspl_sec::error::SecError> {
//! let ctx = SecContext::new("PKI".parse::<Method>()?);
//! let token = ctx.generate_session_token("admin", b"secret", Duration::from_secs(3600))?;
//! assert_eq!(token.len(), ctx.token_length());
//!
//! let signature = ctx.sign_message(&token, b"actuator request")?;
//!
//! let mut keys = KeyStore::new();
//! keys.enroll("admin", b"secret")?;
//! ctx.verify_message(&keys, "admin", b"actuator request", &signature)?;
//! # Ok(())
//! # }
//! ```

pub mod b64;
pub mod error;
pub mod keys;
pub mod method;
mod pki;
pub mod session;
pub mod signing;

pub use crate::keys::KeyStore;
pub use crate::method::Method;
pub use crate::session::SessionToken;

use crate::error::{Result, SecError};
use crate::session::{expiry_after, token_length, unix_now};
use crate::signing::{MessageSigner, MessageVerifier};
use std::time::Duration;

/// Security operations bound to one [`Method`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SecContext {
    method: Method,
}

impl SecContext {
    pub fn new(method: Method) -> Self {
        Self { method }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Size in bytes of every token this context produces.
    pub fn token_length(&self) -> usize {
        token_length(self.method)
    }

    /// Size in bytes of every signature this context produces.
    pub fn sig_length(&self) -> usize {
        match self.method {
            Method::None => 0,
            Method::Pki => pki::SIG_LEN,
        }
    }

    /// Opens a session for `username` that expires `session_length` from now.
    pub fn generate_session_token(
        &self,
        username: &str,
        password: &[u8],
        session_length: Duration,
    ) -> Result<SessionToken> {
        self.generate_session_token_at(username, password, session_length, unix_now())
    }

    /// Same as [`generate_session_token`](Self::generate_session_token) with an
    /// explicit current time (unix seconds).
    pub fn generate_session_token_at(
        &self,
        username: &str,
        password: &[u8],
        session_length: Duration,
        now: u64,
    ) -> Result<SessionToken> {
        let expiry = expiry_after(now, session_length)?;
        let bytes = match self.method {
            Method::None => expiry.to_be_bytes().to_vec(),
            Method::Pki => pki::generate(username, password, expiry)?,
        };

        log::debug!(
            "Generated {} session token for user '{username}' expiring at {expiry}",
            self.method
        );

        Ok(SessionToken::from_vec(self.method, bytes))
    }

    pub fn sign_init<'a>(&self, token: &'a SessionToken) -> Result<MessageSigner<'a>> {
        self.check_token(token)?;
        Ok(MessageSigner::new(token))
    }

    pub fn sign_message(&self, token: &SessionToken, message: &[u8]) -> Result<Vec<u8>> {
        let mut signer = self.sign_init(token)?;
        signer.update(message);
        Ok(signer.finish())
    }

    pub fn verify_init<'a>(
        &self,
        keys: &'a KeyStore,
        username: &'a str,
        signature: &'a [u8],
    ) -> MessageVerifier<'a> {
        MessageVerifier::new(self.method, keys, username, signature)
    }

    pub fn verify_message(
        &self,
        keys: &KeyStore,
        username: &str,
        message: &[u8],
        signature: &[u8],
    ) -> Result<()> {
        self.verify_message_at(keys, username, message, signature, unix_now())
    }

    pub fn verify_message_at(
        &self,
        keys: &KeyStore,
        username: &str,
        message: &[u8],
        signature: &[u8],
        now: u64,
    ) -> Result<()> {
        let mut verifier = self.verify_init(keys, username, signature);
        verifier.update(message);
        verifier.finish_at(now)
    }

    fn check_token(&self, token: &SessionToken) -> Result<()> {
        if token.method() != self.method {
            return Err(SecError::InvalidTokenLength {
                expected: self.token_length(),
                actual: token.len(),
            });
        }
        Ok(())
    }
}

//! Incremental message signing and verification.
//!
//! Messages are hashed with SHA-256 as they are fed in; the method-specific
//! signature is computed over the final digest. One-shot calls on
//! [`SecContext`](crate::SecContext) go through the same path, so both forms
//! produce identical signatures for identical input.

use crate::error::Result;
use crate::keys::KeyStore;
use crate::method::Method;
use crate::pki;
use crate::session::{unix_now, SessionToken};
use sha2::{Digest, Sha256};

/// Accumulates a message and signs it with a session token.
pub struct MessageSigner<'a> {
    token: &'a SessionToken,
    hasher: Sha256,
}

impl<'a> MessageSigner<'a> {
    pub(crate) fn new(token: &'a SessionToken) -> Self {
        Self {
            token,
            hasher: Sha256::new(),
        }
    }

    pub fn update(&mut self, chunk: &[u8]) -> &mut Self {
        self.hasher.update(chunk);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        let digest = self.hasher.finalize();
        match self.token.method() {
            Method::None => Vec::new(),
            Method::Pki => pki::sign_digest(self.token.as_bytes(), &digest),
        }
    }
}

/// Accumulates a message and checks it against a signature.
pub struct MessageVerifier<'a> {
    method: Method,
    keys: &'a KeyStore,
    username: &'a str,
    signature: &'a [u8],
    hasher: Sha256,
}

impl<'a> MessageVerifier<'a> {
    pub(crate) fn new(
        method: Method,
        keys: &'a KeyStore,
        username: &'a str,
        signature: &'a [u8],
    ) -> Self {
        Self {
            method,
            keys,
            username,
            signature,
            hasher: Sha256::new(),
        }
    }

    pub fn update(&mut self, chunk: &[u8]) -> &mut Self {
        self.hasher.update(chunk);
        self
    }

    pub fn finish(self) -> Result<()> {
        self.finish_at(unix_now())
    }

    /// Verifies as if the current time were `now` (unix seconds).
    pub fn finish_at(self, now: u64) -> Result<()> {
        let digest = self.hasher.finalize();
        let outcome = match self.method {
            Method::None => Ok(()),
            Method::Pki => {
                pki::verify_digest(self.keys, self.username, &digest, self.signature, now)
            }
        };

        if let Err(err) = &outcome {
            log::warn!(
                "Rejected {} signature from user '{}': {err}",
                self.method,
                self.username
            );
        }

        outcome
    }
}

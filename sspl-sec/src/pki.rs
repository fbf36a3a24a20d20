//! PKI method: per-session Ed25519 keys endorsed by the user's long-term key.
//!
//! Token layout (136 bytes):
//!
//! ```text
//! expiry_be64 | session_secret[32] | session_public[32] | endorsement[64]
//! ```
//!
//! Signature layout (168 bytes):
//!
//! ```text
//! expiry_be64 | session_public[32] | endorsement[64] | Ed25519(session_secret, SHA-256(msg))[64]
//! ```

use crate::error::{Result, SecError};
use crate::keys::{derive_user_key, KeyStore};
use crate::session::{read_expiry, EXPIRY_LEN};
use ed25519_dalek::{
    Signature, Signer, SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH,
    SIGNATURE_LENGTH,
};
use rand::rngs::OsRng;
use rand::RngCore;

pub(crate) const TOKEN_LEN: usize =
    EXPIRY_LEN + SECRET_KEY_LENGTH + PUBLIC_KEY_LENGTH + SIGNATURE_LENGTH;
pub(crate) const SIG_LEN: usize =
    EXPIRY_LEN + PUBLIC_KEY_LENGTH + SIGNATURE_LENGTH + SIGNATURE_LENGTH;

const ENDORSEMENT_DOMAIN: &[u8] = b"sspl_sec/session";

const SECRET_START: usize = EXPIRY_LEN;
const PUBLIC_START: usize = SECRET_START + SECRET_KEY_LENGTH;

fn endorsement_message(username: &str, expiry: u64, session_public: &[u8]) -> Vec<u8> {
    let mut message = Vec::with_capacity(
        ENDORSEMENT_DOMAIN.len() + 8 + username.len() + EXPIRY_LEN + session_public.len(),
    );
    message.extend_from_slice(ENDORSEMENT_DOMAIN);
    message.extend_from_slice(&(username.len() as u64).to_be_bytes());
    message.extend_from_slice(username.as_bytes());
    message.extend_from_slice(&expiry.to_be_bytes());
    message.extend_from_slice(session_public);
    message
}

fn array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes[..N]);
    out
}

pub(crate) fn generate(username: &str, password: &[u8], expiry: u64) -> Result<Vec<u8>> {
    let user_key = derive_user_key(username, password)?;

    let mut session_secret = [0u8; SECRET_KEY_LENGTH];
    OsRng.fill_bytes(&mut session_secret);
    let session_key = SigningKey::from_bytes(&session_secret);
    let session_public = session_key.verifying_key().to_bytes();

    let endorsement = user_key.sign(&endorsement_message(username, expiry, &session_public));

    let mut token = Vec::with_capacity(TOKEN_LEN);
    token.extend_from_slice(&expiry.to_be_bytes());
    token.extend_from_slice(&session_secret);
    token.extend_from_slice(&session_public);
    token.extend_from_slice(&endorsement.to_bytes());
    Ok(token)
}

/// Signs a message digest with the session key held in `token`.
pub(crate) fn sign_digest(token: &[u8], digest: &[u8]) -> Vec<u8> {
    let session_key = SigningKey::from_bytes(&array(&token[SECRET_START..]));
    let message_signature = session_key.sign(digest);

    let mut signature = Vec::with_capacity(SIG_LEN);
    signature.extend_from_slice(&token[..EXPIRY_LEN]);
    signature.extend_from_slice(&token[PUBLIC_START..]);
    signature.extend_from_slice(&message_signature.to_bytes());
    signature
}

pub(crate) fn verify_digest(
    keys: &KeyStore,
    username: &str,
    digest: &[u8],
    signature: &[u8],
    now: u64,
) -> Result<()> {
    if signature.len() != SIG_LEN {
        return Err(SecError::InvalidSignatureLength {
            expected: SIG_LEN,
            actual: signature.len(),
        });
    }

    let expiry = read_expiry(signature);
    let session_public = &signature[EXPIRY_LEN..EXPIRY_LEN + PUBLIC_KEY_LENGTH];
    let endorsement_start = EXPIRY_LEN + PUBLIC_KEY_LENGTH;
    let endorsement = Signature::from_bytes(&array(&signature[endorsement_start..]));
    let message_signature =
        Signature::from_bytes(&array(&signature[endorsement_start + SIGNATURE_LENGTH..]));

    let user_key = keys
        .get(username)
        .ok_or_else(|| SecError::UnknownUser(username.to_string()))?;

    user_key
        .verify_strict(
            &endorsement_message(username, expiry, session_public),
            &endorsement,
        )
        .map_err(|e| SecError::BadSignature(format!("session endorsement: {e}")))?;

    let session_key = VerifyingKey::from_bytes(&array(session_public))
        .map_err(|e| SecError::BadSignature(format!("session key: {e}")))?;
    session_key
        .verify_strict(digest, &message_signature)
        .map_err(|e| SecError::BadSignature(format!("message: {e}")))?;

    if now >= expiry {
        return Err(SecError::SessionExpired { expiry, now });
    }

    Ok(())
}

//! Long-term user keys and the public key store used to verify PKI signatures.

use crate::b64;
use crate::error::{Result, SecError};
use argon2::Argon2;
use ed25519_dalek::{SigningKey, VerifyingKey, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::Builder as TempFileBuilder;

const USER_SALT_DOMAIN: &[u8] = b"sspl_sec/user/";

/// Derives the user's long-term signing key from their credentials.
///
/// The password is stretched with Argon2id (default parameters) using a salt
/// bound to the username, so the same credentials always yield the same key
/// and identical passwords for different users yield unrelated keys.
pub fn derive_user_key(username: &str, password: &[u8]) -> Result<SigningKey> {
    let salt = Sha256::new()
        .chain_update(USER_SALT_DOMAIN)
        .chain_update(username.as_bytes())
        .finalize();

    let mut seed = [0u8; SECRET_KEY_LENGTH];
    Argon2::default()
        .hash_password_into(password, &salt, &mut seed)
        .map_err(|e| SecError::KeyDerivation(e.to_string()))?;

    Ok(SigningKey::from_bytes(&seed))
}

/// Enrolled users and their public keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyStore {
    keys: BTreeMap<String, VerifyingKey>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives the user's key pair and records the public half.
    pub fn enroll(&mut self, username: &str, password: &[u8]) -> Result<VerifyingKey> {
        let public = derive_user_key(username, password)?.verifying_key();
        self.insert(username, public);
        Ok(public)
    }

    pub fn insert(&mut self, username: &str, key: VerifyingKey) {
        if self.keys.insert(username.to_string(), key).is_some() {
            log::debug!("Replaced public key for user '{username}'");
        }
    }

    pub fn get(&self, username: &str) -> Option<&VerifyingKey> {
        self.keys.get(username)
    }

    pub fn remove(&mut self, username: &str) -> Option<VerifyingKey> {
        self.keys.remove(username)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Loads a store from a JSON object of `username -> base64 public key`.
    /// A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::debug!("Key store {} does not exist; starting empty", path.display());
                return Ok(Self::new());
            }
            Err(err) => return Err(err.into()),
        };

        let encoded: BTreeMap<String, String> = serde_json::from_str(&content)
            .map_err(|e| SecError::KeyStore(format!("{}: {e}", path.display())))?;

        let mut store = Self::new();
        for (username, text) in encoded {
            let bytes = b64::decode(&text)?;
            let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
                SecError::KeyStore(format!(
                    "public key for '{username}' must be {PUBLIC_KEY_LENGTH} bytes, got {}",
                    bytes.len()
                ))
            })?;
            let key = VerifyingKey::from_bytes(&bytes)
                .map_err(|e| SecError::KeyStore(format!("public key for '{username}': {e}")))?;
            store.keys.insert(username, key);
        }

        Ok(store)
    }

    /// Writes the store atomically next to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let encoded: BTreeMap<&str, String> = self
            .keys
            .iter()
            .map(|(username, key)| (username.as_str(), b64::encode(key.as_bytes())))
            .collect();
        let mut rendered = serde_json::to_string_pretty(&encoded)
            .map_err(|e| SecError::KeyStore(e.to_string()))?;
        rendered.push('\n');

        let parent_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };

        let mut temp_file = TempFileBuilder::new()
            .prefix(".sspl-keys-")
            .suffix(".tmp")
            .tempfile_in(parent_dir)?;
        temp_file.write_all(rendered.as_bytes())?;
        temp_file.flush()?;
        temp_file.persist(path).map_err(|e| SecError::Io(e.error))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let first = derive_user_key("admin", b"secret").unwrap();
        let second = derive_user_key("admin", b"secret").unwrap();
        assert_eq!(first.to_bytes(), second.to_bytes());
    }

    #[test]
    fn derivation_depends_on_username_and_password() {
        let base = derive_user_key("admin", b"secret").unwrap().verifying_key();
        let other_user = derive_user_key("guest", b"secret").unwrap().verifying_key();
        let other_password = derive_user_key("admin", b"Secret").unwrap().verifying_key();

        assert_ne!(base, other_user);
        assert_ne!(base, other_password);
    }

    #[test]
    fn enroll_records_public_key() {
        let mut store = KeyStore::new();
        let public = store.enroll("admin", b"secret").unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("admin"), Some(&public));
        assert!(store.get("guest").is_none());
        assert_eq!(store.remove("admin"), Some(public));
        assert!(store.is_empty());
    }
}

//! Configuration-loaded credential set.
//!
//! Secrets are stored as SHA-256 digests (standard base64), never as
//! plaintext. When no credentials file is configured, a built-in demo
//! set seeds the three accounts of the deployment this portal
//! replaces; their digests are computed at load time.
//!
//! Authentication is deliberately uninformative on failure: unknown
//! user and wrong password return the same error.

use std::collections::HashMap;
use std::path::Path;

use base64::Engine;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::models::{Identity, Role};

/// Login failure. One variant on purpose — the caller must not learn
/// whether the username or the password was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("cannot read credentials file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed credentials file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("malformed password digest for user {username}")]
    BadDigest { username: String },
}

/// One entry of the credentials file.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialEntry {
    pub username: String,
    /// Standard-base64 SHA-256 digest of the password.
    pub password_sha256: String,
    pub role: Role,
    /// Display name carried into the session identity.
    pub name: String,
}

#[derive(Debug)]
struct StoredCredential {
    digest: [u8; 32],
    identity: Identity,
}

/// The set of accounts that may log in.
#[derive(Debug)]
pub struct CredentialSet {
    by_username: HashMap<String, StoredCredential>,
}

/// SHA-256 digest of a password.
pub fn password_digest(password: &str) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.finalize().into()
}

/// Encode a digest the way the credentials file stores it.
pub fn encode_digest(digest: &[u8; 32]) -> String {
    base64::engine::general_purpose::STANDARD.encode(digest)
}

impl CredentialSet {
    /// Build a set from parsed file entries.
    pub fn from_entries(entries: Vec<CredentialEntry>) -> Result<Self, CredentialError> {
        let mut by_username = HashMap::new();
        for entry in entries {
            let decoded = base64::engine::general_purpose::STANDARD
                .decode(&entry.password_sha256)
                .ok()
                .and_then(|bytes| <[u8; 32]>::try_from(bytes).ok());
            let digest = decoded.ok_or(CredentialError::BadDigest {
                username: entry.username.clone(),
            })?;
            by_username.insert(
                entry.username,
                StoredCredential {
                    digest,
                    identity: Identity {
                        role: entry.role,
                        name: entry.name,
                    },
                },
            );
        }
        Ok(Self { by_username })
    }

    /// Load a credential set from a JSON file.
    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<CredentialEntry> = serde_json::from_str(&raw)?;
        Self::from_entries(entries)
    }

    /// The built-in demo accounts, digests computed on the spot.
    pub fn demo() -> Self {
        let demo_users = [
            ("Patient", "AAAAAAAA", Role::Patient, "Liao"),
            ("DoctorWu", "DDDDDDDD", Role::Doctor, "Doctor Wu"),
            ("Manager", "XXXXXXXX", Role::Manager, "Manager"),
        ];

        let by_username = demo_users
            .into_iter()
            .map(|(username, password, role, name)| {
                (
                    username.to_string(),
                    StoredCredential {
                        digest: password_digest(password),
                        identity: Identity {
                            role,
                            name: name.to_string(),
                        },
                    },
                )
            })
            .collect();
        Self { by_username }
    }

    /// Validate a username/password pair.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Identity, AuthError> {
        let stored = self
            .by_username
            .get(username)
            .ok_or(AuthError::InvalidCredentials)?;
        if stored.digest != password_digest(password) {
            return Err(AuthError::InvalidCredentials);
        }
        Ok(stored.identity.clone())
    }

    pub fn len(&self) -> usize {
        self.by_username.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_username.is_empty()
    }
}

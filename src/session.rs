//! Server-side session store.
//!
//! The cookie carries an opaque token; only its SHA-256 hash is kept
//! server-side, mapped to the logged-in identity. Sessions live in
//! memory for the process lifetime and are never persisted.

use std::collections::HashMap;

use crate::models::Identity;

/// Cookie the session token travels in.
pub const SESSION_COOKIE: &str = "portal_session";

/// Generate a random session token (URL-safe base64, 32 bytes of entropy).
pub fn generate_token() -> String {
    use base64::Engine;
    let bytes: [u8; 32] = rand::random();
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

/// Hash a session token string using SHA-256.
pub fn hash_token(token: &str) -> [u8; 32] {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hasher.finalize().into()
}

/// `Set-Cookie` value establishing a session.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session cookie.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; Max-Age=0")
}

/// In-memory session store keyed by token hash.
#[derive(Default)]
pub struct SessionStore {
    sessions: HashMap<[u8; 32], Identity>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Create a session for an identity; returns the raw cookie token.
    pub fn create(&mut self, identity: Identity) -> String {
        let token = generate_token();
        self.sessions.insert(hash_token(&token), identity);
        token
    }

    /// Resolve a token to its identity, if the session exists.
    pub fn identity(&self, token: &str) -> Option<Identity> {
        self.sessions.get(&hash_token(token)).cloned()
    }

    /// Drop the session for a token. Idempotent.
    pub fn destroy(&mut self, token: &str) {
        self.sessions.remove(&hash_token(token));
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

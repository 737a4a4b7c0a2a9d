//! Shared state for the portal API.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::credentials::CredentialSet;
use crate::db::{self, DatabaseError};
use crate::session::SessionStore;

/// Shared context for all routes and middleware: the store handle,
/// the in-memory session store, and the credential set.
#[derive(Clone)]
pub struct ApiContext {
    db: Arc<Mutex<Connection>>,
    pub sessions: Arc<Mutex<SessionStore>>,
    pub credentials: Arc<CredentialSet>,
}

impl ApiContext {
    pub fn new(conn: Connection, credentials: CredentialSet) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            sessions: Arc::new(Mutex::new(SessionStore::new())),
            credentials: Arc::new(credentials),
        }
    }

    /// Open (or create) the on-disk store and wrap it in a context.
    pub fn open(path: &Path, credentials: CredentialSet) -> Result<Self, DatabaseError> {
        Ok(Self::new(db::open_database(path)?, credentials))
    }

    /// In-memory store, for tests and ephemeral runs.
    pub fn in_memory(credentials: CredentialSet) -> Result<Self, DatabaseError> {
        Ok(Self::new(db::open_memory_database()?, credentials))
    }

    /// Scoped store handle. Each request acquires it for the duration
    /// of its reads/writes and releases it when the guard drops, on
    /// every exit path.
    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".into()))
    }

    /// Resolve a session token to its identity.
    pub fn session_identity(&self, token: &str) -> Result<Option<crate::models::Identity>, ApiError> {
        let sessions = self
            .sessions
            .lock()
            .map_err(|_| ApiError::Internal("session lock poisoned".into()))?;
        Ok(sessions.identity(token))
    }
}

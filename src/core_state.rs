//! Shared application state.
//!
//! `AppState` is the single state object behind every IPC command: the
//! in-memory session, the local store path, the backend client, and the
//! form-submission gate. Wrapped in `Arc` at startup. Uses `RwLock` for
//! the session to allow concurrent reads (most commands) while blocking
//! only on writes (login/logout).

use std::path::PathBuf;
use std::sync::RwLock;

use crate::backend::{BackendApi, BackendClient};
use crate::config;
use crate::db::{self, StoreError};
use crate::session::{self, SessionError, UserSession};
use crate::submit_gate::SubmitGate;

pub struct AppState {
    /// Signed-in user. `None` when anonymous.
    session: RwLock<Option<UserSession>>,
    /// Path of the local SQLite store.
    pub store_path: PathBuf,
    /// Backend API client (trait object so tests can swap in a mock).
    backend: Box<dyn BackendApi>,
    /// Double-submit prevention + form phase observability.
    gate: SubmitGate,
}

impl AppState {
    /// Production state: configured store path + live backend client.
    pub fn new() -> Self {
        let data_dir = config::app_data_dir();
        if let Err(e) = std::fs::create_dir_all(&data_dir) {
            tracing::warn!("Cannot create data dir {}: {e}", data_dir.display());
        }
        Self::with_backend(config::store_path(), Box::new(BackendClient::from_config()))
    }

    /// State with an explicit store path and backend (tests use a temp
    /// path and `MockBackend`).
    pub fn with_backend(store_path: PathBuf, backend: Box<dyn BackendApi>) -> Self {
        Self {
            session: RwLock::new(None),
            store_path,
            backend,
            gate: SubmitGate::new(),
        }
    }

    // ── Store access ────────────────────────────────────────

    /// Open a connection to the local store.
    pub fn open_store(&self) -> Result<rusqlite::Connection, CoreError> {
        db::open_store(&self.store_path).map_err(CoreError::Store)
    }

    // ── Session ─────────────────────────────────────────────

    /// The signed-in user, if any.
    pub fn current_session(&self) -> Option<UserSession> {
        self.session.read().ok().and_then(|guard| guard.clone())
    }

    /// Route guard: commands behind the authenticated shell call this
    /// first. Presence of a session is the whole check — there is no
    /// token expiry or server-side validation.
    pub fn require_session(&self) -> Result<UserSession, CoreError> {
        self.current_session().ok_or(CoreError::NotAuthenticated)
    }

    /// Install a session (login).
    pub fn set_session(&self, session: UserSession) -> Result<(), CoreError> {
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = Some(session);
        Ok(())
    }

    /// Drop the in-memory session (logout).
    pub fn clear_session(&self) -> Result<(), CoreError> {
        let mut guard = self.session.write().map_err(|_| CoreError::LockPoisoned)?;
        *guard = None;
        Ok(())
    }

    /// Restore the persisted session at startup, if one survives in the
    /// store. No-op when the store has no session marker.
    pub fn hydrate_session(&self) -> Result<(), CoreError> {
        let conn = self.open_store()?;
        if let Some(session) = session::load(&conn)? {
            tracing::info!(user = %session.name, "Restored persisted session");
            self.set_session(session)?;
        }
        Ok(())
    }

    // ── Collaborators ───────────────────────────────────────

    pub fn backend(&self) -> &dyn BackendApi {
        self.backend.as_ref()
    }

    pub fn gate(&self) -> &SubmitGate {
        &self.gate
    }
}

/// Errors from AppState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not signed in")]
    NotAuthenticated,
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

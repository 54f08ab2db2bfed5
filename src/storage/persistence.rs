//! Active-session and history records.
//!
//! ## Session record
//!
//! Written on every state change while the session is past setup; removed
//! when the state returns to setup so a fresh setup screen never
//! rehydrates stale data.
//!
//! ## History record
//!
//! Written on every archive change, including when it is empty.
//!
//! Loading never fails: absent or corrupt records fall back to defaults.

use tracing::{debug, error, warn};

use super::KeyValueStore;
use crate::cards::CardId;
use crate::core::{GameState, SessionConfig, SessionPhase, Status};
use crate::error::StorageError;
use crate::history::{HistoryArchive, PastSession};

/// Mirrors session state and history into a `KeyValueStore`.
#[derive(Debug)]
pub struct Persistence<S> {
    store: S,
    session_key: String,
    history_key: String,
    history_limit: usize,
    default_theme: String,
}

impl<S: KeyValueStore> Persistence<S> {
    /// Create a persistence layer over `store` using the keys in `config`.
    pub fn new(store: S, config: &SessionConfig) -> Self {
        Self {
            store,
            session_key: config.session_key.clone(),
            history_key: config.history_key.clone(),
            history_limit: config.history_limit,
            default_theme: config.default_theme.clone(),
        }
    }

    /// Get the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the layer and return the store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Read the stored session, if any.
    ///
    /// Errors are returned as-is; `load_session` is the forgiving variant.
    pub fn read_session(&self) -> Result<Option<GameState>, StorageError> {
        let Some(raw) = self.store.get(&self.session_key)? else {
            return Ok(None);
        };
        let state = serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: self.session_key.clone(),
            source,
        })?;
        Ok(Some(state))
    }

    /// Rehydrate the active session.
    ///
    /// Absent, unreadable or corrupt records yield a default setup state.
    /// A stored `loading` state has lost its deck request, so it comes back
    /// as setup with its players and themes intact. Impactful marks for
    /// cards that were never shown are dropped.
    pub fn load_session(&self) -> GameState {
        let fallback = || GameState {
            theme: self.default_theme.clone(),
            ..GameState::default()
        };

        match self.read_session() {
            Ok(Some(mut state)) => {
                if let SessionPhase::Loading { request } = state.phase {
                    warn!(%request, "stored session was loading, returning to setup");
                    state.phase = SessionPhase::Setup;
                }
                let stray: Vec<CardId> = state
                    .impactful
                    .iter()
                    .filter(|id| !state.has_shown(id))
                    .cloned()
                    .collect();
                if !stray.is_empty() {
                    warn!(count = stray.len(), "dropping impactful marks for unshown cards");
                    for id in &stray {
                        state.impactful.remove(id);
                    }
                }
                debug!(status = %state.status(), "session rehydrated");
                state
            }
            Ok(None) => fallback(),
            Err(e) => {
                error!(error = %e, "failed to hydrate session");
                fallback()
            }
        }
    }

    /// Mirror `state`: write it when past setup, clear the record otherwise.
    pub fn save_session(&mut self, state: &GameState) -> Result<(), StorageError> {
        if state.status() == Status::Setup {
            return self.store.remove(&self.session_key);
        }

        let json = serde_json::to_string(state).map_err(|source| StorageError::Encode {
            key: self.session_key.clone(),
            source,
        })?;
        self.store.set(&self.session_key, &json)
    }

    /// Read the stored history list, if any.
    pub fn read_history(&self) -> Result<Option<Vec<PastSession>>, StorageError> {
        let Some(raw) = self.store.get(&self.history_key)? else {
            return Ok(None);
        };
        let sessions = serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
            key: self.history_key.clone(),
            source,
        })?;
        Ok(Some(sessions))
    }

    /// Rehydrate the history archive; empty on absence or corruption.
    pub fn load_history(&self) -> HistoryArchive {
        match self.read_history() {
            Ok(Some(sessions)) => HistoryArchive::from_sessions(sessions, self.history_limit),
            Ok(None) => HistoryArchive::with_limit(self.history_limit),
            Err(e) => {
                error!(error = %e, "failed to hydrate history");
                HistoryArchive::with_limit(self.history_limit)
            }
        }
    }

    /// Write the full history list.
    pub fn save_history(&mut self, history: &HistoryArchive) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(&history.sessions()).map_err(|source| StorageError::Encode {
                key: self.history_key.clone(),
                source,
            })?;
        self.store.set(&self.history_key, &json)
    }
}

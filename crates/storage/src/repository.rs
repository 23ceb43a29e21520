use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use math_core::model::{LearnerId, SessionState};
use thiserror::Error;

/// Errors surfaced by session store backends.
///
/// Note what is *not* here: a missing or unparsable document is not an error.
/// Per the store contract, `load` degrades to the default document instead.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Contract for the per-learner session document store.
///
/// Each `save` is a full replace of the whole document, so partial writes are
/// impossible by construction. Backends are swappable: in-memory for tests,
/// SQLite rows for server-side persistence, or the signed cookie itself at
/// the HTTP layer.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Fetch the learner's document, or the default document if none exists
    /// or the stored value cannot be parsed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures (lost connection),
    /// never for missing or corrupt data.
    async fn load(&self, learner: LearnerId) -> Result<SessionState, StorageError>;

    /// Replace the learner's document wholesale.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be persisted.
    async fn save(&self, learner: LearnerId, state: &SessionState) -> Result<(), StorageError>;

    /// Delete the learner's document; the next `load` yields defaults.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete cannot be applied.
    async fn reset(&self, learner: LearnerId) -> Result<(), StorageError>;
}

/// In-memory store for tests and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    sessions: Arc<Mutex<HashMap<LearnerId, SessionState>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn load(&self, learner: LearnerId) -> Result<SessionState, StorageError> {
        let guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&learner).cloned().unwrap_or_default())
    }

    async fn save(&self, learner: LearnerId, state: &SessionState) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(learner, state.clone());
        Ok(())
    }

    async fn reset(&self, learner: LearnerId) -> Result<(), StorageError> {
        let mut guard = self
            .sessions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&learner);
        Ok(())
    }
}

use async_trait::async_trait;
use math_core::model::{LearnerId, SessionState};
use sqlx::Row;

use super::SqliteStore;
use crate::codec::{decode_state, encode_state};
use crate::repository::{SessionStore, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait]
impl SessionStore for SqliteStore {
    async fn load(&self, learner: LearnerId) -> Result<SessionState, StorageError> {
        let row = sqlx::query("SELECT state FROM sessions WHERE learner_id = ?1")
            .bind(learner.to_string())
            .fetch_optional(self.pool())
            .await
            .map_err(conn)?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("state").map_err(conn)?;
                Ok(decode_state(&raw))
            }
            None => Ok(SessionState::default()),
        }
    }

    async fn save(&self, learner: LearnerId, state: &SessionState) -> Result<(), StorageError> {
        let raw = encode_state(state)?;

        sqlx::query(
            r"
                INSERT INTO sessions (learner_id, state, last_active)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(learner_id) DO UPDATE SET
                    state = excluded.state,
                    last_active = excluded.last_active
            ",
        )
        .bind(learner.to_string())
        .bind(raw)
        .bind(state.last_active.to_rfc3339())
        .execute(self.pool())
        .await
        .map_err(conn)?;

        Ok(())
    }

    async fn reset(&self, learner: LearnerId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM sessions WHERE learner_id = ?1")
            .bind(learner.to_string())
            .execute(self.pool())
            .await
            .map_err(conn)?;
        Ok(())
    }
}

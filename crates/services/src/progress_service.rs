use std::sync::Arc;

use math_core::Clock;
use math_core::model::{
    LearnerId, ModuleUpdate, PracticeOutcome, SessionState, SessionStateUpdate,
};
use storage::repository::SessionStore;
use tracing::debug;

use crate::error::ProgressError;
use crate::practice::PracticeSession;

/// Store-backed implementation of the progress operations.
///
/// Every mutating call is load -> fold -> stamp `lastActive` -> one save, so
/// the stored document is always replaced atomically and never written twice
/// for a single outcome.
#[derive(Clone)]
pub struct ProgressService {
    clock: Clock,
    store: Arc<dyn SessionStore>,
}

impl ProgressService {
    #[must_use]
    pub fn new(clock: Clock, store: Arc<dyn SessionStore>) -> Self {
        Self { clock, store }
    }

    /// The learner's current document (defaults for a fresh learner).
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` for backend failures.
    pub async fn state(&self, learner: LearnerId) -> Result<SessionState, ProgressError> {
        Ok(self.store.load(learner).await?)
    }

    /// Shallow-merge a partial document and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` for backend failures.
    pub async fn merge_state(
        &self,
        learner: LearnerId,
        update: SessionStateUpdate,
    ) -> Result<SessionState, ProgressError> {
        let mut state = self.store.load(learner).await?;
        state.merge(update);
        self.persist(learner, state).await
    }

    /// Apply a module progress update and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` for backend failures.
    pub async fn apply_module(
        &self,
        learner: LearnerId,
        update: ModuleUpdate,
    ) -> Result<SessionState, ProgressError> {
        let mut state = self.store.load(learner).await?;
        state.apply_module(update);
        self.persist(learner, state).await
    }

    /// Bump a lesson's visit counter and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` for backend failures.
    pub async fn record_lesson_visit(
        &self,
        learner: LearnerId,
        lesson: &str,
    ) -> Result<SessionState, ProgressError> {
        let mut state = self.store.load(learner).await?;
        state.record_lesson_visit(lesson, self.clock.now());
        self.persist(learner, state).await
    }

    /// Fold a completed practice session's tallies into the document: one
    /// save covers the practice record and the star total together.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` for backend failures.
    pub async fn record_practice(
        &self,
        learner: LearnerId,
        correct: u32,
        total: u32,
    ) -> Result<(SessionState, PracticeOutcome), ProgressError> {
        let mut state = self.store.load(learner).await?;
        let outcome = state.record_practice_session(correct, total);
        let state = self.persist(learner, state).await?;
        Ok((state, outcome))
    }

    /// Close out an in-memory practice session and record it.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Practice` if the session is unfinished or was
    /// already recorded, and `ProgressError::Storage` for backend failures.
    pub async fn finish_practice(
        &self,
        learner: LearnerId,
        session: &mut PracticeSession,
    ) -> Result<(SessionState, PracticeOutcome), ProgressError> {
        let (correct, total) = session.finish()?;
        self.record_practice(learner, correct, total).await
    }

    /// Delete the learner's document; returns the fresh defaults.
    ///
    /// # Errors
    ///
    /// Returns `ProgressError::Storage` for backend failures.
    pub async fn reset(&self, learner: LearnerId) -> Result<SessionState, ProgressError> {
        self.store.reset(learner).await?;
        Ok(SessionState::default())
    }

    async fn persist(
        &self,
        learner: LearnerId,
        mut state: SessionState,
    ) -> Result<SessionState, ProgressError> {
        state.last_active = self.clock.now();
        self.store.save(learner, &state).await?;
        debug!(%learner, total_stars = state.total_stars, "session document saved");
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math_core::model::{ModuleUpdate, QuizUpdate};
    use math_core::time::fixed_clock;
    use storage::repository::InMemoryStore;

    fn service() -> ProgressService {
        ProgressService::new(fixed_clock(), Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn writes_stamp_last_active() {
        let service = service();
        let learner = LearnerId::generate();

        let state = service
            .apply_module(
                learner,
                ModuleUpdate::Division(QuizUpdate {
                    questions_attempted: Some(1),
                    questions_correct: Some(1),
                }),
            )
            .await
            .unwrap();

        assert_eq!(state.last_active, math_core::time::fixed_now());
        assert_eq!(state.division.questions_attempted, 1);
    }

    #[tokio::test]
    async fn reset_returns_defaults() {
        let service = service();
        let learner = LearnerId::generate();

        service.record_practice(learner, 10, 10).await.unwrap();
        let state = service.reset(learner).await.unwrap();
        assert_eq!(state, SessionState::default());
        assert_eq!(service.state(learner).await.unwrap(), SessionState::default());
    }
}

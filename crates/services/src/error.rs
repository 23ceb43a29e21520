//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;

/// Errors emitted by the practice-session flow.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PracticeError {
    #[error("practice session has no problems")]
    Empty,

    #[error("practice session already completed")]
    Completed,

    #[error("practice session is still in progress")]
    InProgress,

    #[error("practice session was already recorded")]
    AlreadyRecorded,
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Practice(#[from] PracticeError),
}

#![forbid(unsafe_code)]

pub mod error;
pub mod practice;
pub mod problems;
pub mod progress_service;

pub use math_core::Clock;

pub use error::{PracticeError, ProgressError};
pub use practice::{PracticeAnswer, PracticeKind, PracticeProgress, PracticeSession};
pub use problems::{Difficulty, Place, PlaceValueQuestion, Problem, ProblemKind};
pub use progress_service::ProgressService;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no problem is currently presented")]
    NotPresented,

    #[error("the current problem was already answered")]
    AlreadyAnswered,
}

/// Where a quiz is in its per-problem cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    Idle,
    Presented,
    Answered {
        correct: bool,
    },
}

/// Anything a quiz can pose: a problem with a single integer solution.
pub trait QuizProblem {
    fn solution(&self) -> i64;
}

/// Running tally for one quiz area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizScore {
    pub attempted: u32,
    pub correct: u32,
}

/// Per-module quiz state machine: `Idle -> Presented -> Answered -> Idle`.
///
/// Each presented problem is scored at most once; answering again is
/// rejected so double submissions cannot inflate the tally.
#[derive(Debug, Clone)]
pub struct Quiz<P> {
    phase: QuizPhase,
    problem: Option<P>,
    score: QuizScore,
}

impl<P> Default for Quiz<P> {
    fn default() -> Self {
        Self {
            phase: QuizPhase::Idle,
            problem: None,
            score: QuizScore::default(),
        }
    }
}

impl<P: QuizProblem> Quiz<P> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn score(&self) -> QuizScore {
        self.score
    }

    #[must_use]
    pub fn current(&self) -> Option<&P> {
        self.problem.as_ref()
    }

    /// Present the next problem. An unanswered problem is abandoned without
    /// being scored, matching the "new question" button.
    pub fn present(&mut self, problem: P) {
        self.problem = Some(problem);
        self.phase = QuizPhase::Presented;
    }

    /// Score the learner's answer against the presented problem.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotPresented` when no problem is up, and
    /// `QuizError::AlreadyAnswered` when the current problem was already
    /// scored; callers treat the latter as inert input.
    pub fn answer(&mut self, given: i64) -> Result<bool, QuizError> {
        match self.phase {
            QuizPhase::Idle => Err(QuizError::NotPresented),
            QuizPhase::Answered { .. } => Err(QuizError::AlreadyAnswered),
            QuizPhase::Presented => {
                let problem = self.problem.as_ref().ok_or(QuizError::NotPresented)?;
                let correct = problem.solution() == given;

                self.score.attempted += 1;
                if correct {
                    self.score.correct += 1;
                }
                self.phase = QuizPhase::Answered { correct };
                Ok(correct)
            }
        }
    }

    /// Return to `Idle`, ready for the next problem.
    pub fn next(&mut self) {
        self.problem = None;
        self.phase = QuizPhase::Idle;
    }
}

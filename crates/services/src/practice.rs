use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::PracticeError;
use crate::problems::{self, Difficulty, Problem, ProblemKind};

/// What a practice session drills: one operation, or a random mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PracticeKind {
    Mixed,
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl PracticeKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            PracticeKind::Mixed => "mixed",
            PracticeKind::Addition => "addition",
            PracticeKind::Subtraction => "subtraction",
            PracticeKind::Multiplication => "multiplication",
            PracticeKind::Division => "division",
        }
    }
}

/// Aggregated view of where a practice session stands, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeProgress {
    pub index: usize,
    pub total: usize,
    pub score: u32,
    pub is_complete: bool,
}

/// Result of answering one practice problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeAnswer {
    pub correct: bool,
    pub expected: u32,
    pub is_last: bool,
}

/// One timed batch of problems scored as a unit.
///
/// Flow: `NotStarted -> InProgress(index, score) -> Completed`. The index
/// advances by exactly one per answered-or-skipped problem; once every
/// problem is consumed the session completes and can be recorded exactly
/// once.
#[derive(Debug, Clone)]
pub struct PracticeSession {
    kind: PracticeKind,
    problems: Vec<Problem>,
    current: usize,
    score: u32,
    recorded: bool,
}

impl PracticeSession {
    /// Generate a session of `count` problems.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Empty` when `count` is zero.
    pub fn start(
        kind: PracticeKind,
        difficulty: Difficulty,
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, PracticeError> {
        let problems = (0..count)
            .map(|_| match kind {
                PracticeKind::Mixed => problems::generate_mixed(difficulty, rng),
                PracticeKind::Addition => problems::generate(ProblemKind::Addition, difficulty, rng),
                PracticeKind::Subtraction => {
                    problems::generate(ProblemKind::Subtraction, difficulty, rng)
                }
                PracticeKind::Multiplication => {
                    problems::generate(ProblemKind::Multiplication, difficulty, rng)
                }
                PracticeKind::Division => problems::generate(ProblemKind::Division, difficulty, rng),
            })
            .collect();
        Self::with_problems(kind, problems)
    }

    /// Build a session over a fixed problem list (used by tests).
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Empty` when no problems are provided.
    pub fn with_problems(kind: PracticeKind, problems: Vec<Problem>) -> Result<Self, PracticeError> {
        if problems.is_empty() {
            return Err(PracticeError::Empty);
        }
        Ok(Self {
            kind,
            problems,
            current: 0,
            score: 0,
            recorded: false,
        })
    }

    #[must_use]
    pub fn kind(&self) -> PracticeKind {
        self.kind
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.problems.len()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn current_problem(&self) -> Option<&Problem> {
        self.problems.get(self.current)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.current >= self.problems.len()
    }

    #[must_use]
    pub fn progress(&self) -> PracticeProgress {
        PracticeProgress {
            index: self.current,
            total: self.problems.len(),
            score: self.score,
            is_complete: self.is_complete(),
        }
    }

    /// Score the learner's answer against the current problem and advance.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Completed` once every problem is consumed.
    pub fn answer_current(&mut self, given: i64) -> Result<PracticeAnswer, PracticeError> {
        let Some(problem) = self.problems.get(self.current) else {
            return Err(PracticeError::Completed);
        };

        let correct = i64::from(problem.answer) == given;
        let expected = problem.answer;
        if correct {
            self.score += 1;
        }
        self.current += 1;

        Ok(PracticeAnswer {
            correct,
            expected,
            is_last: self.is_complete(),
        })
    }

    /// Skip the current problem without scoring it.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::Completed` once every problem is consumed.
    pub fn skip(&mut self) -> Result<(), PracticeError> {
        if self.is_complete() {
            return Err(PracticeError::Completed);
        }
        self.current += 1;
        Ok(())
    }

    /// Take the final `(correct, total)` tallies for recording.
    ///
    /// May be called exactly once, and only after the session completes, so
    /// no session can be scored into the progress document twice.
    ///
    /// # Errors
    ///
    /// Returns `PracticeError::InProgress` before completion and
    /// `PracticeError::AlreadyRecorded` on a second call.
    pub fn finish(&mut self) -> Result<(u32, u32), PracticeError> {
        if !self.is_complete() {
            return Err(PracticeError::InProgress);
        }
        if self.recorded {
            return Err(PracticeError::AlreadyRecorded);
        }
        self.recorded = true;
        let total = u32::try_from(self.problems.len()).unwrap_or(u32::MAX);
        Ok((self.score, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_problems(n: usize) -> Vec<Problem> {
        (0..n)
            .map(|i| Problem {
                left: i as u32,
                right: 1,
                kind: ProblemKind::Addition,
                answer: i as u32 + 1,
            })
            .collect()
    }

    #[test]
    fn empty_session_is_rejected() {
        assert_eq!(
            PracticeSession::with_problems(PracticeKind::Mixed, Vec::new()).unwrap_err(),
            PracticeError::Empty
        );
    }

    #[test]
    fn index_advances_once_per_answer_or_skip() {
        let mut session =
            PracticeSession::with_problems(PracticeKind::Mixed, fixed_problems(3)).unwrap();

        session.answer_current(1).unwrap();
        assert_eq!(session.progress().index, 1);
        session.skip().unwrap();
        assert_eq!(session.progress().index, 2);
        let last = session.answer_current(0).unwrap();
        assert!(last.is_last);
        assert!(session.is_complete());

        assert_eq!(session.answer_current(0), Err(PracticeError::Completed));
        assert_eq!(session.skip(), Err(PracticeError::Completed));
    }

    #[test]
    fn skipped_problems_do_not_score() {
        let mut session =
            PracticeSession::with_problems(PracticeKind::Mixed, fixed_problems(2)).unwrap();
        session.answer_current(1).unwrap();
        session.skip().unwrap();
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn finish_records_exactly_once() {
        let mut session =
            PracticeSession::with_problems(PracticeKind::Mixed, fixed_problems(2)).unwrap();
        assert_eq!(session.finish(), Err(PracticeError::InProgress));

        session.answer_current(1).unwrap();
        session.answer_current(2).unwrap();

        assert_eq!(session.finish(), Ok((2, 2)));
        assert_eq!(session.finish(), Err(PracticeError::AlreadyRecorded));
    }

    #[test]
    fn generated_sessions_have_the_requested_length() {
        let mut rng = rand::rng();
        let session =
            PracticeSession::start(PracticeKind::Division, Difficulty::Easy, 10, &mut rng).unwrap();
        assert_eq!(session.total(), 10);
        assert!(!session.is_complete());
    }
}

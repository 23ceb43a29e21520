//! Problem generators for quizzes and practice sessions.

use std::ops::RangeInclusive;

use math_core::model::QuizProblem;
use math_core::walkthrough::{needs_borrow, needs_carry};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// The four arithmetic operations a problem can use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl ProblemKind {
    pub const ALL: [ProblemKind; 4] = [
        ProblemKind::Addition,
        ProblemKind::Subtraction,
        ProblemKind::Multiplication,
        ProblemKind::Division,
    ];

    #[must_use]
    pub fn operator(&self) -> char {
        match self {
            ProblemKind::Addition => '+',
            ProblemKind::Subtraction => '-',
            ProblemKind::Multiplication => '×',
            ProblemKind::Division => '÷',
        }
    }
}

/// Practice difficulty, controlling the operand range for addition and
/// subtraction. Multiplication and division always stay within the tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    fn operand_range(self) -> RangeInclusive<u32> {
        match self {
            Difficulty::Easy => 1..=10,
            Difficulty::Medium => 10..=100,
            Difficulty::Hard => 100..=1000,
        }
    }
}

/// One generated arithmetic problem with its solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub left: u32,
    pub right: u32,
    pub kind: ProblemKind,
    pub answer: u32,
}

impl QuizProblem for Problem {
    fn solution(&self) -> i64 {
        i64::from(self.answer)
    }
}

/// Generate one problem of the given kind.
///
/// Subtraction never goes negative, multiplication stays within the 1-12
/// tables, and division is always clean (built from divisor x quotient).
pub fn generate(kind: ProblemKind, difficulty: Difficulty, rng: &mut impl Rng) -> Problem {
    let range = difficulty.operand_range();
    match kind {
        ProblemKind::Addition => {
            let left = rng.random_range(range.clone());
            let right = rng.random_range(range);
            Problem {
                left,
                right,
                kind,
                answer: left + right,
            }
        }
        ProblemKind::Subtraction => {
            let a = rng.random_range(range.clone());
            let b = rng.random_range(range);
            let (left, right) = (a.max(b), a.min(b));
            Problem {
                left,
                right,
                kind,
                answer: left - right,
            }
        }
        ProblemKind::Multiplication => {
            let left = rng.random_range(1..=12);
            let right = rng.random_range(1..=12);
            Problem {
                left,
                right,
                kind,
                answer: left * right,
            }
        }
        ProblemKind::Division => {
            let divisor = rng.random_range(1..=11);
            let quotient = rng.random_range(1..=11);
            Problem {
                left: divisor * quotient,
                right: divisor,
                kind,
                answer: quotient,
            }
        }
    }
}

/// Generate a problem of a random kind (the "mixed" practice setting).
pub fn generate_mixed(difficulty: Difficulty, rng: &mut impl Rng) -> Problem {
    let kind = ProblemKind::ALL[rng.random_range(0..ProblemKind::ALL.len())];
    generate(kind, difficulty, rng)
}

/// A 3-digit addition where at least one column carries.
pub fn carry_problem(rng: &mut impl Rng) -> Problem {
    loop {
        let left = rng.random_range(100..=499);
        let right = rng.random_range(100..=499);
        if needs_carry(left, right) {
            return Problem {
                left,
                right,
                kind: ProblemKind::Addition,
                answer: left + right,
            };
        }
    }
}

/// A 3-digit subtraction where at least one column borrows.
pub fn borrow_problem(rng: &mut impl Rng) -> Problem {
    loop {
        let left = rng.random_range(200..=599);
        let right = rng.random_range(100..=498);
        if right < left && needs_borrow(left, right) {
            return Problem {
                left,
                right,
                kind: ProblemKind::Subtraction,
                answer: left - right,
            };
        }
    }
}

/// A 3-digit column problem for the stacked add/subtract module.
pub fn stacked_problem(kind: ProblemKind, rng: &mut impl Rng) -> Problem {
    match kind {
        ProblemKind::Subtraction => {
            let a = rng.random_range(100..=999);
            let b = rng.random_range(100..=999);
            let (left, right) = (a.max(b), a.min(b));
            Problem {
                left,
                right,
                kind,
                answer: left - right,
            }
        }
        _ => {
            let left = rng.random_range(100..=999);
            let right = rng.random_range(100..=999);
            Problem {
                left,
                right,
                kind: ProblemKind::Addition,
                answer: left + right,
            }
        }
    }
}

/// The place a place-value question can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Place {
    Thousands,
    Hundreds,
    Tens,
    Ones,
}

impl Place {
    pub const ALL: [Place; 4] = [Place::Thousands, Place::Hundreds, Place::Tens, Place::Ones];

    /// The digit of `number` in this place.
    #[must_use]
    pub fn digit_of(self, number: u32) -> u8 {
        let digit = match self {
            Place::Thousands => number / 1000 % 10,
            Place::Hundreds => number / 100 % 10,
            Place::Tens => number / 10 % 10,
            Place::Ones => number % 10,
        };
        digit as u8
    }
}

/// A multiple-choice place-value question over a 4-digit number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceValueQuestion {
    pub number: u32,
    pub place: Place,
    pub answer: u8,
    /// Four distinct choices, answer included, in shuffled order.
    pub options: Vec<u8>,
}

impl QuizProblem for PlaceValueQuestion {
    fn solution(&self) -> i64 {
        i64::from(self.answer)
    }
}

/// Generate a place-value question with four distinct options.
pub fn place_value_question(rng: &mut impl Rng) -> PlaceValueQuestion {
    let number = rng.random_range(1000..=9999);
    let place = Place::ALL[rng.random_range(0..Place::ALL.len())];
    let answer = place.digit_of(number);

    let mut options = vec![answer];
    while options.len() < 4 {
        let candidate = rng.random_range(0..=9);
        if !options.contains(&candidate) {
            options.push(candidate);
        }
    }
    options.shuffle(rng);

    PlaceValueQuestion {
        number,
        place,
        answer,
        options,
    }
}

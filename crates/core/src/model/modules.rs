use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Multiplication tables run 1 through 12.
pub const MAX_TABLE: u8 = 12;

/// The learning modules that carry their own progress record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModuleName {
    NumberPlaces,
    StackedMath,
    Multiplication,
    Division,
    CarryOver,
    Borrowing,
    SightWords,
}

impl ModuleName {
    pub const ALL: [ModuleName; 7] = [
        ModuleName::NumberPlaces,
        ModuleName::StackedMath,
        ModuleName::Multiplication,
        ModuleName::Division,
        ModuleName::CarryOver,
        ModuleName::Borrowing,
        ModuleName::SightWords,
    ];

    /// The camelCase name used in API paths and the persisted document.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleName::NumberPlaces => "numberPlaces",
            ModuleName::StackedMath => "stackedMath",
            ModuleName::Multiplication => "multiplication",
            ModuleName::Division => "division",
            ModuleName::CarryOver => "carryOver",
            ModuleName::Borrowing => "borrowing",
            ModuleName::SightWords => "sightWords",
        }
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown module: {0}")]
pub struct UnknownModule(pub String);

impl FromStr for ModuleName {
    type Err = UnknownModule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModuleName::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| UnknownModule(s.to_owned()))
    }
}

//
// ─── PROGRESS RECORDS ──────────────────────────────────────────────────────────
//
// Each record is a plain counter bag serialized into the session document.
// Updates carry caller-supplied *new totals*; `apply` replaces the named
// fields and re-establishes `correct <= attempted` afterwards.

/// Attempt/correct tally shared by division, carry-over, and borrowing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizProgress {
    pub questions_attempted: u32,
    pub questions_correct: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QuizUpdate {
    pub questions_attempted: Option<u32>,
    pub questions_correct: Option<u32>,
}

impl QuizProgress {
    pub fn apply(&mut self, update: QuizUpdate) {
        if let Some(v) = update.questions_attempted {
            self.questions_attempted = v;
        }
        if let Some(v) = update.questions_correct {
            self.questions_correct = v;
        }
        self.questions_correct = self.questions_correct.min(self.questions_attempted);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberPlacesProgress {
    pub questions_attempted: u32,
    pub questions_correct: u32,
    /// Largest number the learner has broken into place values.
    pub highest_number: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NumberPlacesUpdate {
    pub questions_attempted: Option<u32>,
    pub questions_correct: Option<u32>,
    pub highest_number: Option<u32>,
}

impl NumberPlacesProgress {
    pub fn apply(&mut self, update: NumberPlacesUpdate) {
        if let Some(v) = update.questions_attempted {
            self.questions_attempted = v;
        }
        if let Some(v) = update.questions_correct {
            self.questions_correct = v;
        }
        if let Some(v) = update.highest_number {
            self.highest_number = v;
        }
        self.questions_correct = self.questions_correct.min(self.questions_attempted);
    }
}

/// Column addition/subtraction tallies, split by operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StackedMathProgress {
    pub addition_attempted: u32,
    pub addition_correct: u32,
    pub subtraction_attempted: u32,
    pub subtraction_correct: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StackedMathUpdate {
    pub addition_attempted: Option<u32>,
    pub addition_correct: Option<u32>,
    pub subtraction_attempted: Option<u32>,
    pub subtraction_correct: Option<u32>,
}

impl StackedMathProgress {
    pub fn apply(&mut self, update: StackedMathUpdate) {
        if let Some(v) = update.addition_attempted {
            self.addition_attempted = v;
        }
        if let Some(v) = update.addition_correct {
            self.addition_correct = v;
        }
        if let Some(v) = update.subtraction_attempted {
            self.subtraction_attempted = v;
        }
        if let Some(v) = update.subtraction_correct {
            self.subtraction_correct = v;
        }
        self.addition_correct = self.addition_correct.min(self.addition_attempted);
        self.subtraction_correct = self.subtraction_correct.min(self.subtraction_attempted);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiplicationProgress {
    pub questions_attempted: u32,
    pub questions_correct: u32,
    /// Times tables the learner has worked through. The set type keeps each
    /// table index at most once no matter how often it is re-marked.
    pub tables_completed: BTreeSet<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiplicationUpdate {
    pub questions_attempted: Option<u32>,
    pub questions_correct: Option<u32>,
    pub tables_completed: Option<BTreeSet<u8>>,
}

impl MultiplicationProgress {
    pub fn apply(&mut self, update: MultiplicationUpdate) {
        if let Some(v) = update.questions_attempted {
            self.questions_attempted = v;
        }
        if let Some(v) = update.questions_correct {
            self.questions_correct = v;
        }
        if let Some(mut tables) = update.tables_completed {
            tables.retain(|t| (1..=MAX_TABLE).contains(t));
            self.tables_completed = tables;
        }
        self.questions_correct = self.questions_correct.min(self.questions_attempted);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SightWordsProgress {
    pub questions_attempted: u32,
    pub questions_correct: u32,
    pub levels_completed: BTreeSet<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SightWordsUpdate {
    pub questions_attempted: Option<u32>,
    pub questions_correct: Option<u32>,
    pub levels_completed: Option<BTreeSet<u8>>,
}

impl SightWordsProgress {
    pub fn apply(&mut self, update: SightWordsUpdate) {
        if let Some(v) = update.questions_attempted {
            self.questions_attempted = v;
        }
        if let Some(v) = update.questions_correct {
            self.questions_correct = v;
        }
        if let Some(levels) = update.levels_completed {
            self.levels_completed = levels;
        }
        self.questions_correct = self.questions_correct.min(self.questions_attempted);
    }
}

/// A typed update for one named module, as posted to `/api/progress/{module}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleUpdate {
    NumberPlaces(NumberPlacesUpdate),
    StackedMath(StackedMathUpdate),
    Multiplication(MultiplicationUpdate),
    Division(QuizUpdate),
    CarryOver(QuizUpdate),
    Borrowing(QuizUpdate),
    SightWords(SightWordsUpdate),
}

impl ModuleUpdate {
    #[must_use]
    pub fn module(&self) -> ModuleName {
        match self {
            ModuleUpdate::NumberPlaces(_) => ModuleName::NumberPlaces,
            ModuleUpdate::StackedMath(_) => ModuleName::StackedMath,
            ModuleUpdate::Multiplication(_) => ModuleName::Multiplication,
            ModuleUpdate::Division(_) => ModuleName::Division,
            ModuleUpdate::CarryOver(_) => ModuleName::CarryOver,
            ModuleUpdate::Borrowing(_) => ModuleName::Borrowing,
            ModuleUpdate::SightWords(_) => ModuleName::SightWords,
        }
    }
}

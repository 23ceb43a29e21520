use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::modules::{
    ModuleUpdate, MultiplicationProgress, NumberPlacesProgress, QuizProgress, SightWordsProgress,
    StackedMathProgress,
};
use crate::model::practice::{PracticeOutcome, PracticeRecord};

/// Visit tally for one lesson/section of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonVisit {
    pub visits: u32,
    pub last_visited: DateTime<Utc>,
}

/// The full persisted progress document for one learner.
///
/// Serialized camelCase; every field defaults so a partial or legacy document
/// still parses. A missing or corrupt document is replaced by
/// `SessionState::default()` rather than surfacing an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionState {
    pub user_name: Option<String>,
    pub total_stars: u32,
    pub last_active: DateTime<Utc>,
    pub number_places: NumberPlacesProgress,
    pub stacked_math: StackedMathProgress,
    pub multiplication: MultiplicationProgress,
    pub division: QuizProgress,
    pub carry_over: QuizProgress,
    pub borrowing: QuizProgress,
    pub sight_words: SightWordsProgress,
    pub practice: PracticeRecord,
    pub lessons: BTreeMap<String, LessonVisit>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            user_name: None,
            total_stars: 0,
            last_active: DateTime::<Utc>::UNIX_EPOCH,
            number_places: NumberPlacesProgress::default(),
            stacked_math: StackedMathProgress::default(),
            multiplication: MultiplicationProgress::default(),
            division: QuizProgress::default(),
            carry_over: QuizProgress::default(),
            borrowing: QuizProgress::default(),
            sight_words: SightWordsProgress::default(),
            practice: PracticeRecord::default(),
            lessons: BTreeMap::new(),
        }
    }
}

/// Partial top-level update posted to `POST /api/state`.
///
/// Named fields replace the stored ones wholesale (shallow merge); omitted
/// fields are untouched. `totalStars` can only grow through this path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionStateUpdate {
    pub user_name: Option<String>,
    pub total_stars: Option<u32>,
    pub number_places: Option<NumberPlacesProgress>,
    pub stacked_math: Option<StackedMathProgress>,
    pub multiplication: Option<MultiplicationProgress>,
    pub division: Option<QuizProgress>,
    pub carry_over: Option<QuizProgress>,
    pub borrowing: Option<QuizProgress>,
    pub sight_words: Option<SightWordsProgress>,
    pub practice: Option<PracticeRecord>,
}

impl SessionState {
    /// Shallow-merge a partial document.
    ///
    /// Invariants are re-established afterwards: correct counts are clamped
    /// to attempts, `totalStars` and `bestScore` never decrease.
    pub fn merge(&mut self, update: SessionStateUpdate) {
        if let Some(name) = update.user_name {
            self.user_name = Some(name);
        }
        if let Some(stars) = update.total_stars {
            self.total_stars = self.total_stars.max(stars);
        }
        if let Some(v) = update.number_places {
            self.number_places = v;
        }
        if let Some(v) = update.stacked_math {
            self.stacked_math = v;
        }
        if let Some(v) = update.multiplication {
            self.multiplication = v;
        }
        if let Some(v) = update.division {
            self.division = v;
        }
        if let Some(v) = update.carry_over {
            self.carry_over = v;
        }
        if let Some(v) = update.borrowing {
            self.borrowing = v;
        }
        if let Some(v) = update.sight_words {
            self.sight_words = v;
        }
        if let Some(v) = update.practice {
            let best = self.practice.best_score;
            self.practice = v;
            self.practice.best_score = self.practice.best_score.max(best);
        }
        self.normalize();
    }

    /// Apply a typed per-module update (the `mergeModuleProgress` operation).
    pub fn apply_module(&mut self, update: ModuleUpdate) {
        match update {
            ModuleUpdate::NumberPlaces(u) => self.number_places.apply(u),
            ModuleUpdate::StackedMath(u) => self.stacked_math.apply(u),
            ModuleUpdate::Multiplication(u) => self.multiplication.apply(u),
            ModuleUpdate::Division(u) => self.division.apply(u),
            ModuleUpdate::CarryOver(u) => self.carry_over.apply(u),
            ModuleUpdate::Borrowing(u) => self.borrowing.apply(u),
            ModuleUpdate::SightWords(u) => self.sight_words.apply(u),
        }
    }

    /// Fold one completed practice session into the document: updates the
    /// practice record and adds the earned stars, as a single mutation so the
    /// caller can persist with one write.
    pub fn record_practice_session(&mut self, correct: u32, total: u32) -> PracticeOutcome {
        let outcome = self.practice.record_session(correct, total);
        self.practice = outcome.practice;
        self.total_stars = self.total_stars.saturating_add(u32::from(outcome.stars_earned));
        outcome
    }

    /// Bump the visit counter and timestamp for a named lesson.
    pub fn record_lesson_visit(&mut self, lesson: &str, now: DateTime<Utc>) {
        self.lessons
            .entry(lesson.to_owned())
            .and_modify(|visit| {
                visit.visits = visit.visits.saturating_add(1);
                visit.last_visited = now;
            })
            .or_insert(LessonVisit {
                visits: 1,
                last_visited: now,
            });
    }

    fn normalize(&mut self) {
        self.number_places.questions_correct = self
            .number_places
            .questions_correct
            .min(self.number_places.questions_attempted);
        self.stacked_math.addition_correct = self
            .stacked_math
            .addition_correct
            .min(self.stacked_math.addition_attempted);
        self.stacked_math.subtraction_correct = self
            .stacked_math
            .subtraction_correct
            .min(self.stacked_math.subtraction_attempted);
        self.multiplication.questions_correct = self
            .multiplication
            .questions_correct
            .min(self.multiplication.questions_attempted);
        self.division.questions_correct = self
            .division
            .questions_correct
            .min(self.division.questions_attempted);
        self.carry_over.questions_correct = self
            .carry_over
            .questions_correct
            .min(self.carry_over.questions_attempted);
        self.borrowing.questions_correct = self
            .borrowing
            .questions_correct
            .min(self.borrowing.questions_attempted);
        self.sight_words.questions_correct = self
            .sight_words
            .questions_correct
            .min(self.sight_words.questions_attempted);
        self.practice.total_correct = self.practice.total_correct.min(self.practice.total_problems);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn default_document_is_all_zero() {
        let state = SessionState::default();
        assert_eq!(state.total_stars, 0);
        assert_eq!(state.number_places.questions_attempted, 0);
        assert_eq!(state.practice.total_sessions, 0);
        assert!(state.multiplication.tables_completed.is_empty());
        assert!(state.lessons.is_empty());
        assert!(state.user_name.is_none());
    }

    #[test]
    fn merge_is_shallow_and_keeps_stars_monotonic() {
        let mut state = SessionState::default();
        state.total_stars = 12;

        state.merge(SessionStateUpdate {
            user_name: Some("Kae".to_owned()),
            total_stars: Some(4),
            ..SessionStateUpdate::default()
        });

        assert_eq!(state.user_name.as_deref(), Some("Kae"));
        assert_eq!(state.total_stars, 12);
    }

    #[test]
    fn merge_clamps_correct_counts() {
        let mut state = SessionState::default();
        state.merge(SessionStateUpdate {
            division: Some(QuizProgress {
                questions_attempted: 2,
                questions_correct: 5,
            }),
            ..SessionStateUpdate::default()
        });
        assert_eq!(state.division.questions_correct, 2);
    }

    #[test]
    fn merge_keeps_best_score() {
        let mut state = SessionState::default();
        state.practice.best_score = 90;
        state.merge(SessionStateUpdate {
            practice: Some(PracticeRecord {
                total_sessions: 5,
                total_problems: 50,
                total_correct: 30,
                best_score: 60,
            }),
            ..SessionStateUpdate::default()
        });
        assert_eq!(state.practice.total_sessions, 5);
        assert_eq!(state.practice.best_score, 90);
    }

    #[test]
    fn recording_practice_adds_stars_once() {
        let mut state = SessionState::default();
        let outcome = state.record_practice_session(9, 10);
        assert_eq!(outcome.percent, 90);
        assert!(outcome.stars_earned > 0);
        assert_eq!(state.total_stars, u32::from(outcome.stars_earned));
        assert_eq!(state.practice.total_sessions, 1);
    }

    #[test]
    fn lesson_visits_accumulate() {
        let mut state = SessionState::default();
        let now = fixed_now();
        state.record_lesson_visit("multiplication", now);
        state.record_lesson_visit("multiplication", now + chrono::Duration::minutes(5));

        let visit = &state.lessons["multiplication"];
        assert_eq!(visit.visits, 2);
        assert_eq!(visit.last_visited, now + chrono::Duration::minutes(5));
    }

    #[test]
    fn document_serializes_camel_case() {
        let json = serde_json::to_value(SessionState::default()).unwrap();
        assert!(json.get("totalStars").is_some());
        assert!(json.get("numberPlaces").is_some());
        assert!(json.get("carryOver").is_some());
        assert!(json["practice"].get("bestScore").is_some());
    }

    #[test]
    fn corrupt_adjacent_fields_do_not_break_parsing() {
        let state: SessionState =
            serde_json::from_str(r#"{"totalStars": 7, "practice": {"totalSessions": 2}}"#).unwrap();
        assert_eq!(state.total_stars, 7);
        assert_eq!(state.practice.total_sessions, 2);
        assert_eq!(state.practice.best_score, 0);
    }
}

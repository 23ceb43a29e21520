use serde::{Deserialize, Serialize};

use crate::rewards;

/// Lifetime aggregate over all completed practice sessions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PracticeRecord {
    pub total_sessions: u32,
    pub total_problems: u32,
    pub total_correct: u32,
    /// Best session percentage ever achieved, 0-100. Never decreases.
    pub best_score: u8,
}

/// Result of folding one completed session into the practice record.
///
/// The caller is responsible for adding `stars_earned` to the document's
/// `totalStars` and persisting everything in a single write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PracticeOutcome {
    pub practice: PracticeRecord,
    pub percent: u8,
    pub stars_earned: u8,
}

impl PracticeRecord {
    /// Fold one completed session (`correct` of `total` problems) into the
    /// record and derive the star reward for that session.
    ///
    /// `correct` is clamped to `total`; a zero-problem session scores 0%.
    #[must_use]
    pub fn record_session(&self, correct: u32, total: u32) -> PracticeOutcome {
        let correct = correct.min(total);
        let percent = rewards::percent_score(correct, total);

        let practice = PracticeRecord {
            total_sessions: self.total_sessions.saturating_add(1),
            total_problems: self.total_problems.saturating_add(total),
            total_correct: self.total_correct.saturating_add(correct),
            best_score: self.best_score.max(percent),
        };

        PracticeOutcome {
            practice,
            percent,
            stars_earned: rewards::stars_for_percent(percent),
        }
    }

    /// Lifetime accuracy as a 0-100 percentage.
    #[must_use]
    pub fn accuracy(&self) -> u8 {
        rewards::percent_score(self.total_correct, self.total_problems)
    }
}

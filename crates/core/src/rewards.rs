//! Reward derivation: a fixed, monotonic mapping from session accuracy to
//! stars.
//!
//! The mapping is `stars = ceil(percent / 20)` clamped to `[0, 5]`, the same
//! step function the results screen uses to fill its five-star row. A higher
//! percentage never yields fewer stars.

/// Star ceiling for a single session.
pub const MAX_STARS: u8 = 5;

/// Sessions at or above this percentage trigger the celebration state.
pub const CELEBRATION_PERCENT: u8 = 80;

/// Rounded percentage score, 0-100. Zero totals score zero instead of
/// dividing by zero.
#[must_use]
pub fn percent_score(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let correct = u64::from(correct.min(total));
    let total = u64::from(total);
    // round-half-up of 100 * correct / total
    let percent = (correct * 100 + total / 2) / total;
    u8::try_from(percent).unwrap_or(100)
}

/// Stars earned for a session scoring `percent`.
#[must_use]
pub fn stars_for_percent(percent: u8) -> u8 {
    let percent = u32::from(percent.min(100));
    let stars = (percent * u32::from(MAX_STARS)).div_ceil(100);
    u8::try_from(stars).unwrap_or(MAX_STARS).min(MAX_STARS)
}

/// Whether a session score is worth a celebration.
#[must_use]
pub fn is_celebration(percent: u8) -> bool {
    percent >= CELEBRATION_PERCENT
}

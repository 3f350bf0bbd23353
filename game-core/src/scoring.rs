use std::time::Duration;

/// Points awarded for any solved round before bonuses and multipliers.
pub const BASE_POINTS: u32 = 100;
/// Maximum bonus for solving at the very start of a round.
pub const MAX_TIME_BONUS: u32 = 75;
/// Floor applied after the attempt multiplier.
pub const MIN_ROUND_SCORE: u32 = 50;

pub struct ScoringEngine;

impl ScoringEngine {
    /// Score for a winning guess made `elapsed` into a round of `round_duration`
    /// on the player's `attempt`-th try (1-based).
    pub fn round_score(elapsed: Duration, round_duration: Duration, attempt: u32) -> u32 {
        let raw = (BASE_POINTS + Self::time_bonus(elapsed, round_duration))
            * Self::attempt_multiplier_percent(attempt)
            / 100;
        raw.max(MIN_ROUND_SCORE)
    }

    /// floor((1 - elapsed / duration) * 75), never negative.
    pub fn time_bonus(elapsed: Duration, round_duration: Duration) -> u32 {
        let duration_ms = round_duration.as_millis();
        let elapsed_ms = elapsed.as_millis();
        if duration_ms == 0 || elapsed_ms >= duration_ms {
            return 0;
        }
        (MAX_TIME_BONUS as u128 * (duration_ms - elapsed_ms) / duration_ms) as u32
    }

    /// Attempt multiplier in whole percent.
    ///
    /// 1-5 attempts: 100% down to 80% in 5% steps.
    /// 6-10 attempts: 75% down to 59% in 4% steps.
    /// 11-15 attempts: 50% down to 34% in 4% steps.
    /// 16 or more: flat 30%.
    pub fn attempt_multiplier_percent(attempt: u32) -> u32 {
        match attempt {
            0 | 1 => 100,
            2..=5 => 100 - (attempt - 1) * 5,
            6..=10 => 75 - (attempt - 6) * 4,
            11..=15 => 50 - (attempt - 11) * 4,
            _ => 30,
        }
    }
}

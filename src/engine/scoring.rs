//! Score arithmetic for a single step.

use scenario_catalog::DecisionOption;

/// Applied when a step's countdown reaches zero without a selection.
pub const TIMEOUT_PENALTY: i32 = -3;

/// Seconds of remaining time worth one bonus point.
pub const SECONDS_PER_BONUS_POINT: u32 = 8;

pub const MAX_TIME_BONUS: i32 = 3;

/// `clamp(floor(time_remaining / 8), 0, 3)`.
#[must_use]
pub fn time_bonus(time_remaining: u32) -> i32 {
    let points = time_remaining / SECONDS_PER_BONUS_POINT;
    i32::try_from(points).map_or(MAX_TIME_BONUS, |points| points.min(MAX_TIME_BONUS))
}

#[must_use]
pub fn choice_delta(option: &DecisionOption, time_remaining: u32) -> i32 {
    option.score.saturating_add(time_bonus(time_remaining))
}

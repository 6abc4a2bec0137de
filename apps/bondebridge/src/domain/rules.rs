use std::ops::RangeInclusive;

pub const DECK_SIZE: u8 = 52;
/// Smallest hand dealt in any round; the schedule turns around here.
pub const MIN_HAND_SIZE: u8 = 2;
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = (DECK_SIZE / MIN_HAND_SIZE) as usize;
/// Repeated largest/second-largest rounds only apply to tables bigger than this.
pub const REPEATS_ABOVE_PLAYERS: usize = 4;

pub const STAND_BASE_POINTS: i32 = 10;
pub const STAND_STREAK_BONUS: i32 = 30;
pub const STAND_STREAK_THRESHOLDS: [u32; 4] = [8, 12, 16, 20];
/// (consecutive fails, penalty) pairs; each fires once at the exact count.
pub const FAIL_STREAK_PENALTIES: [(u32, i32); 3] = [(3, 10), (6, 30), (9, 50)];
pub const WARNING_PENALTY: i32 = 10;

/// Largest hand for a table of `players`: floor(52 / N).
///
/// Returns `None` when the table cannot play a full schedule.
pub fn largest_round_size(players: usize) -> Option<u8> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
        return None;
    }
    Some(DECK_SIZE / players as u8)
}

/// Number of rounds in the down + up phases before any repeats: 2 * (M - 1).
pub fn base_round_count(players: usize) -> Option<usize> {
    largest_round_size(players).map(|m| 2 * (m as usize - 1))
}

pub fn valid_bid_range(num_cards: u8) -> RangeInclusive<u8> {
    0..=num_cards
}

/// Points for a round stood on `bid`: 10 + bid².
pub fn stand_points(bid: u8) -> i32 {
    let b = bid as i32;
    STAND_BASE_POINTS + b * b
}

pub fn fail_streak_penalty(consecutive_fails: u32) -> i32 {
    FAIL_STREAK_PENALTIES
        .iter()
        .find(|(count, _)| *count == consecutive_fails)
        .map(|(_, penalty)| *penalty)
        .unwrap_or(0)
}

pub fn stand_streak_bonus(consecutive_stands: u32) -> i32 {
    if STAND_STREAK_THRESHOLDS.contains(&consecutive_stands) {
        STAND_STREAK_BONUS
    } else {
        0
    }
}

/// Every second warning costs ten points.
pub fn warning_deduction(warnings: u32) -> i32 {
    (warnings / 2) as i32 * WARNING_PENALTY
}

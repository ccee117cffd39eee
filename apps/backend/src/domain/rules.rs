//! Game constants, the adjacency rule, and the round schedules.

/// Room size limits.
pub const MIN_PLAYERS: usize = 1;
pub const MAX_PLAYERS: usize = 6;

/// Points for a successful play before the combo multiplier.
pub const BASE_POINTS: i64 = 10;
/// Awarded once when the board is cleared with cards left in the draw pile.
pub const PERFECT_BONUS: i64 = 500;
/// Per remaining second on a won board.
pub const TIME_BONUS_MULTIPLIER: i64 = 10;
/// Cost of attempting a move that fits no open slot. Score has no floor.
pub const INVALID_MOVE_PENALTY: i64 = 25;
/// Per fully cleared peak, surfaced in the score breakdown.
pub const TOWER_BONUS: i64 = 100;

/// Combo thresholds at which the bonus slots auto-activate.
pub const BONUS_SLOT_1_COMBO: u32 = 5;
pub const BONUS_SLOT_2_COMBO: u32 = 10;

/// Multiplayer match schedule.
pub const TOTAL_ROUNDS: u8 = 7;
pub const BASE_ROUND_TIME: u32 = 90;
const ROUND_TIME_STEP: u32 = 15;
const MIN_ROUND_TIME: u32 = 30;
/// Seconds between a round expiring and the next one starting.
pub const ROUND_TRANSITION_DELAY_SECS: u64 = 3;

/// Multiplayer tower variant sizing.
pub const TOWER_SIZE: usize = 5;
pub const HAND_SIZE: usize = 6;

/// Brick-pyramid row sizes, backmost row first.
pub const BRICK_ROWS: [usize; 6] = [5, 6, 7, 8, 9, 10];

/// Whether `candidate` may be played on `reference`: rank distance 1 under
/// circular adjacency, so Ace (1) and King (13) are neighbors. Symmetric.
pub fn can_play_card(candidate: u8, reference: u8) -> bool {
    debug_assert!((1..=13).contains(&candidate) && (1..=13).contains(&reference));
    let diff = (candidate as i16 - reference as i16).rem_euclid(13);
    diff == 1 || diff == 12
}

/// Time budget for a 1-based round number: flat through round 3, then
/// shrinking by a fixed step, floored so it never reaches zero.
pub fn round_time_for_round(round_no: u8) -> u32 {
    if round_no <= 3 {
        return BASE_ROUND_TIME;
    }
    let steps = (round_no as u32).saturating_sub(3);
    BASE_ROUND_TIME
        .saturating_sub(steps * ROUND_TIME_STEP)
        .max(MIN_ROUND_TIME)
}

/// Elimination schedule: for the late rounds, the active-player count at or
/// below which the bottom-ranked player is cut. Rounds outside the window
/// eliminate nobody.
///
/// The schedule is fixed per round number, independent of how many players
/// the room started with.
pub fn elimination_rank_for_round(round_no: u8) -> Option<usize> {
    match round_no {
        5 => Some(4),
        6 => Some(3),
        7 => Some(2),
        _ => None,
    }
}

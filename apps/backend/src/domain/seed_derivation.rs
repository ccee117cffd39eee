//! RNG seed derivation utilities for deterministic game behavior.
//!
//! All randomness in a match flows from one base seed. These helpers derive
//! unique-but-deterministic sub-seeds for each context so that replaying a
//! match (or reconnecting mid-round) reproduces the exact same cards.

/// Derive the base seed for one round of a match.
///
/// Unique per (match, round); per-player seeds extend it, so a round's
/// deals are fully determined by the match seed and round number.
pub fn derive_round_seed(match_seed: u64, round_no: u8) -> u64 {
    match_seed.wrapping_add((round_no as u64).wrapping_mul(10_000))
}

/// Derive the seed for one player's tower and hand in a round.
///
/// Unique per (match, round, player index) so players get distinct towers
/// that are still reproducible for reconnection and replay.
pub fn derive_player_seed(match_seed: u64, round_no: u8, player_index: usize) -> u64 {
    derive_round_seed(match_seed, round_no)
        .wrapping_add((player_index as u64).wrapping_mul(100))
        .wrapping_add(1)
}

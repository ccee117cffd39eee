//! Deck generation and deterministic shuffling.

use rand::rngs::OsRng;
use rand::seq::SliceRandom;
use rand::TryRngCore;

use crate::domain::cards::{Card, Rank, Suit};

/// Deterministic generator behind every seeded shuffle and bonus card.
///
/// Linear-congruential: `state = state * 1103515245 + 12345 mod 2^31`,
/// normalized to [0, 1). Multiplayer fairness depends on two calls with
/// the same seed producing byte-identical orderings, so the constants
/// must not change.
pub struct SeededRng {
    state: u64,
}

const LCG_MOD: u64 = 1 << 31;

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: seed % LCG_MOD,
        }
    }

    fn next_f64(&mut self) -> f64 {
        self.state = (self.state.wrapping_mul(1103515245).wrapping_add(12345)) % LCG_MOD;
        self.state as f64 / LCG_MOD as f64
    }

    /// Uniform index in `0..max`.
    pub fn next_range(&mut self, max: usize) -> usize {
        ((self.next_f64() * max as f64) as usize).min(max.saturating_sub(1))
    }
}

/// Generate a full 52-card deck in standard order, ids keyed by suit+rank.
pub fn generate_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(52);
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card::keyed(suit, rank));
        }
    }
    deck
}

/// Fisher-Yates shuffle. With a seed the ordering is fully deterministic;
/// without one the OS RNG is used.
pub fn shuffle_deck(deck: &mut [Card], seed: Option<u64>) {
    match seed {
        Some(seed) => {
            let mut rng = SeededRng::new(seed);
            for i in (1..deck.len()).rev() {
                let j = rng.next_range(i + 1);
                deck.swap(i, j);
            }
        }
        None => {
            let mut rng = OsRng.unwrap_err();
            deck.shuffle(&mut rng);
        }
    }
}

/// Deterministic bonus-slot card.
///
/// Same (game_seed, slot_number, activation_count) always yields the same
/// card, which is what makes bonus slots replayable and desync-proof in
/// multiplayer. The id is derived so repeated generation compares equal.
pub fn generate_bonus_card(game_seed: u64, slot_number: u8, activation_count: u32) -> Card {
    let unique_seed =
        game_seed ^ (slot_number as u64 * 1_000_000) ^ (activation_count as u64 * 10_000);
    let mut rng = SeededRng::new(unique_seed);
    let suit = Suit::ALL[rng.next_range(4)];
    let rank = Rank::ALL[rng.next_range(13)];
    Card {
        id: format!("bonus{slot_number}-{activation_count}-{}", Card::keyed(suit, rank).id),
        suit,
        rank,
    }
}

// Proptest generators for domain types.

use proptest::prelude::*;

use crate::domain::cards::{Card, Rank, Suit};

pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Hearts),
        Just(Suit::Diamonds),
        Just(Suit::Clubs),
        Just(Suit::Spades),
    ]
}

pub fn rank() -> impl Strategy<Value = Rank> {
    (0usize..13).prop_map(|i| Rank::ALL[i])
}

pub fn card() -> impl Strategy<Value = Card> {
    (suit(), rank()).prop_map(|(suit, rank)| Card::keyed(suit, rank))
}

/// Numeric rank value in the 1..=13 space used by the adjacency rule.
pub fn rank_value() -> impl Strategy<Value = u8> {
    1u8..=13
}

/// An arbitrary seed for shuffle/bonus determinism properties.
pub fn seed() -> impl Strategy<Value = u64> {
    any::<u64>()
}

use std::collections::HashSet;

use crate::domain::cards::{Rank, Suit};
use crate::domain::deck::{generate_bonus_card, generate_deck, shuffle_deck};

#[test]
fn deck_has_52_unique_cards() {
    let deck = generate_deck();
    assert_eq!(deck.len(), 52);

    let pairs: HashSet<(Suit, Rank)> = deck.iter().map(|c| (c.suit, c.rank)).collect();
    assert_eq!(pairs.len(), 52, "duplicate (suit, rank) pair in fresh deck");

    let ids: HashSet<&str> = deck.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), 52, "duplicate card id in fresh deck");
}

#[test]
fn deck_covers_all_suits_and_ranks() {
    let deck = generate_deck();
    for suit in Suit::ALL {
        assert_eq!(deck.iter().filter(|c| c.suit == suit).count(), 13);
    }
    for rank in Rank::ALL {
        assert_eq!(deck.iter().filter(|c| c.rank == rank).count(), 4);
    }
}

#[test]
fn seeded_shuffle_is_deterministic() {
    let mut a = generate_deck();
    let mut b = generate_deck();
    shuffle_deck(&mut a, Some(42));
    shuffle_deck(&mut b, Some(42));
    assert_eq!(a, b);
}

#[test]
fn different_seeds_give_different_orderings() {
    let mut a = generate_deck();
    let mut b = generate_deck();
    shuffle_deck(&mut a, Some(42));
    shuffle_deck(&mut b, Some(43));
    assert_ne!(a, b);
}

#[test]
fn shuffle_is_a_permutation() {
    let mut deck = generate_deck();
    shuffle_deck(&mut deck, Some(9001));
    let mut sorted = deck.clone();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));
    let mut reference = generate_deck();
    reference.sort_by(|a, b| a.id.cmp(&b.id));
    assert_eq!(sorted, reference);
}

#[test]
fn unseeded_shuffle_keeps_all_cards() {
    let mut deck = generate_deck();
    shuffle_deck(&mut deck, None);
    assert_eq!(deck.len(), 52);
    let ids: HashSet<&str> = deck.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), 52);
}

#[test]
fn bonus_card_is_deterministic_per_inputs() {
    let a = generate_bonus_card(12345, 1, 0);
    let b = generate_bonus_card(12345, 1, 0);
    assert_eq!(a, b);
}

#[test]
fn bonus_card_varies_with_slot_and_activation() {
    let base = generate_bonus_card(12345, 1, 0);
    let other_slot = generate_bonus_card(12345, 2, 0);
    let other_activation = generate_bonus_card(12345, 1, 1);
    // Ids always differ; suit/rank differ for almost all seeds and these
    // fixed inputs are known to.
    assert_ne!(base.id, other_slot.id);
    assert_ne!(base.id, other_activation.id);
}

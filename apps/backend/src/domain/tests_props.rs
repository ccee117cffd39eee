use proptest::prelude::*;

use crate::domain::deck::{generate_bonus_card, generate_deck, shuffle_deck};
use crate::domain::layout::{create_brick_pyramid, take_card, update_playability};
use crate::domain::rules::can_play_card;
use crate::domain::test_gens;
use crate::domain::test_prelude::proptest_config;
use crate::domain::tower::{target_value, ActionKind};

proptest! {
    #![proptest_config(proptest_config())]

    /// Adjacency is symmetric: if a can go on b, b can go on a.
    #[test]
    fn adjacency_is_symmetric(
        a in test_gens::rank_value(),
        b in test_gens::rank_value(),
    ) {
        prop_assert_eq!(can_play_card(a, b), can_play_card(b, a));
    }

    /// Exactly two values are playable on any reference card, and they are
    /// the wrapping neighbors.
    #[test]
    fn every_value_has_exactly_two_neighbors(reference in test_gens::rank_value()) {
        let playable: Vec<u8> =
            (1u8..=13).filter(|&c| can_play_card(c, reference)).collect();
        prop_assert_eq!(playable.len(), 2);
        let up = target_value(ActionKind::Plus, reference);
        let down = target_value(ActionKind::Minus, reference);
        prop_assert!(playable.contains(&up));
        prop_assert!(playable.contains(&down));
    }

    /// A card is never adjacent to itself.
    #[test]
    fn value_is_not_adjacent_to_itself(v in test_gens::rank_value()) {
        prop_assert!(!can_play_card(v, v));
    }

    /// Seeded shuffles are deterministic and always a permutation of the
    /// full deck.
    #[test]
    fn seeded_shuffle_is_a_deterministic_permutation(seed in test_gens::seed()) {
        let mut a = generate_deck();
        let mut b = generate_deck();
        shuffle_deck(&mut a, Some(seed));
        shuffle_deck(&mut b, Some(seed));
        prop_assert_eq!(&a, &b);

        let mut ids: Vec<&str> = a.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        prop_assert_eq!(ids.len(), 52);
    }

    /// Bonus cards depend on all three seed inputs deterministically.
    #[test]
    fn bonus_card_is_a_pure_function_of_its_inputs(
        seed in test_gens::seed(),
        slot in 1u8..=2,
        activation in 0u32..50,
    ) {
        let a = generate_bonus_card(seed, slot, activation);
        let b = generate_bonus_card(seed, slot, activation);
        prop_assert_eq!(a, b);
    }

    /// However cards are removed from the pyramid, a covered node is never
    /// playable and removal order never strands a card unreachable.
    #[test]
    fn coverage_invariant_holds_under_any_removal_order(
        seed in test_gens::seed(),
        picks in proptest::collection::vec(0usize..64, 0..45),
    ) {
        let mut deck = generate_deck();
        shuffle_deck(&mut deck, Some(seed));
        let mut pyramid = create_brick_pyramid(deck[..45].to_vec());
        update_playability(&mut pyramid);

        for pick in picks {
            let playable: Vec<String> = pyramid
                .iter()
                .filter(|n| n.is_playable && n.card.is_some())
                .map(|n| n.card.as_ref().unwrap().id.clone())
                .collect();
            if playable.is_empty() {
                break;
            }
            // Invariant before every removal: playable nodes are uncovered.
            for node in pyramid.iter().filter(|n| n.is_playable) {
                let intact = node.covered_by.iter().all(|id| {
                    pyramid
                        .iter()
                        .any(|n| n.card.as_ref().is_some_and(|c| &c.id == id))
                });
                prop_assert!(node.covered_by.is_empty() || !intact);
            }
            let id = &playable[pick % playable.len()];
            prop_assert!(take_card(&mut pyramid, id).is_some());
            update_playability(&mut pyramid);
        }
    }
}

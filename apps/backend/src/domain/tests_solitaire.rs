use crate::domain::cards::{Card, Rank, Suit};
use crate::domain::layout::{self, PyramidNode};
use crate::domain::rules::{
    can_play_card, BASE_POINTS, BONUS_SLOT_1_COMBO, INVALID_MOVE_PENALTY, PERFECT_BONUS,
    TIME_BONUS_MULTIPLIER, TOWER_BONUS,
};
use crate::domain::solitaire::{
    apply_invalid_move_penalty, draw_card, has_valid_moves, init_game, play_card,
    play_card_on_bonus_slot, score_breakdown, tick_timer, BonusSlot, SoloPhase, SoloState,
};
use crate::domain::{generate_bonus_card, scoring::ComboScore};

fn card(value: u8) -> Card {
    Card::keyed(Suit::Spades, Rank::from_value(value).unwrap())
}

fn card_of(suit: Suit, value: u8) -> Card {
    Card::keyed(suit, Rank::from_value(value).unwrap())
}

/// Minimal playing state: every board card sits in one exposed front row.
fn solo_with_front(front: Vec<Card>, discard: Card, draw: Vec<Card>) -> SoloState {
    let mut pyramid: Vec<PyramidNode> = front
        .into_iter()
        .enumerate()
        .map(|(col, card)| PyramidNode {
            row: 0,
            col,
            peak: 0,
            card: Some(card),
            covered_by: Vec::new(),
            is_face_up: false,
            is_playable: false,
            is_second_row: false,
            is_dimmed: false,
        })
        .collect();
    layout::update_playability(&mut pyramid);
    SoloState {
        cards_remaining: layout::cards_remaining(&pyramid),
        pyramid,
        draw_pile: draw,
        discard_pile: vec![discard],
        bonus_slot_1: BonusSlot::default(),
        bonus_slot_2: BonusSlot::default(),
        game_seed: 42,
        tally: ComboScore::default(),
        level: 1,
        time_remaining: 60,
        total_time: 60,
        towers_cleared: 0,
        phase: SoloPhase::Playing,
    }
}

#[test]
fn init_deals_45_pyramid_1_discard_6_draw() {
    let state = init_game(1, Some(42));
    assert_eq!(state.cards_remaining, 45);
    assert_eq!(layout::cards_remaining(&state.pyramid), 45);
    assert_eq!(state.discard_pile.len(), 1);
    assert_eq!(state.draw_pile.len(), 6);
    assert_eq!(state.phase, SoloPhase::Playing);
    assert_eq!(state.game_seed, 42);
    assert_eq!(state.tally, ComboScore::default());
}

#[test]
fn init_is_deterministic_for_a_seed() {
    let a = init_game(1, Some(42));
    let b = init_game(1, Some(42));
    assert_eq!(a, b);
    let c = init_game(1, Some(43));
    assert_ne!(a.discard_pile, c.discard_pile);
}

#[test]
fn end_to_end_first_play_scores_base_points() {
    let mut state = init_game(1, Some(42));
    assert_eq!(state.cards_remaining, 45);

    // Find (drawing if needed) a front-row card adjacent to the discard top,
    // then verify the first successful play's bookkeeping.
    loop {
        let top = state.discard_pile.last().unwrap().value();
        let candidate = layout::playable_cards(&state.pyramid)
            .find(|c| can_play_card(c.value(), top))
            .map(|c| c.id.clone());
        if let Some(id) = candidate {
            let before_remaining = state.cards_remaining;
            let next = play_card(&state, &id);
            assert_eq!(next.tally.combo, 1);
            assert_eq!(next.tally.score, BASE_POINTS);
            assert_eq!(next.cards_remaining, before_remaining - 1);
            return;
        }
        assert!(
            !state.draw_pile.is_empty(),
            "seeded deal left no playable line at all"
        );
        state = draw_card(&state);
    }
}

#[test]
fn combo_increases_per_play_and_draw_resets_it() {
    // The 11 stays on the board so the chain never clears it into a win.
    let state = solo_with_front(
        vec![
            card(6),
            card_of(Suit::Hearts, 7),
            card_of(Suit::Clubs, 8),
            card_of(Suit::Diamonds, 11),
        ],
        card(5),
        vec![card(13)],
    );

    let s1 = play_card(&state, &card(6).id);
    assert_eq!(s1.tally.combo, 1);
    assert_eq!(s1.tally.score, BASE_POINTS);

    let s2 = play_card(&s1, &card_of(Suit::Hearts, 7).id);
    assert_eq!(s2.tally.combo, 2);
    assert_eq!(s2.tally.score, BASE_POINTS * 3);

    let s3 = play_card(&s2, &card_of(Suit::Clubs, 8).id);
    assert_eq!(s3.phase, SoloPhase::Playing);
    assert_eq!(s3.tally.combo, 3);
    assert_eq!(s3.tally.score, BASE_POINTS * 6);
    assert_eq!(s3.tally.max_combo, 3);

    let s4 = draw_card(&s3);
    assert_eq!(s4.tally.combo, 0);
    assert_eq!(s4.tally.score, BASE_POINTS * 6);
    assert_eq!(s4.discard_pile.last().unwrap().value(), 13);
}

#[test]
fn transitions_never_mutate_their_input() {
    let state = solo_with_front(
        vec![card(6), card_of(Suit::Hearts, 7)],
        card(5),
        vec![card(13)],
    );
    let before = state.clone();

    let _ = play_card(&state, &card(6).id);
    assert_eq!(state, before);
    let _ = draw_card(&state);
    assert_eq!(state, before);
    let _ = tick_timer(&state);
    assert_eq!(state, before);
    let _ = apply_invalid_move_penalty(&state);
    assert_eq!(state, before);
}

#[test]
fn unplayable_card_is_a_pure_no_op() {
    let state = solo_with_front(vec![card(6), card(9)], card(5), vec![card(13)]);
    // Value 9 is not adjacent to the discard top 5.
    let next = play_card(&state, &card(9).id);
    assert_eq!(next, state);
    // Unknown id likewise.
    let next = play_card(&state, "no-such-card");
    assert_eq!(next, state);
}

#[test]
fn winning_awards_perfect_and_time_bonus_once() {
    let state = solo_with_front(vec![card(6)], card(5), vec![card(13)]);
    let won = play_card(&state, &card(6).id);
    assert_eq!(won.phase, SoloPhase::Won);
    assert_eq!(won.cards_remaining, 0);
    // Base play + cleared board + perfect (draw non-empty) + time bonus.
    let expected =
        BASE_POINTS + TOWER_BONUS + PERFECT_BONUS + 60 * TIME_BONUS_MULTIPLIER;
    assert_eq!(won.tally.score, expected);

    // Terminal states are absorbing.
    assert_eq!(play_card(&won, &card(6).id), won);
    assert_eq!(tick_timer(&won), won);
    assert_eq!(draw_card(&won), won);
}

#[test]
fn no_perfect_bonus_with_empty_draw_pile() {
    let state = solo_with_front(vec![card(6)], card(5), Vec::new());
    let won = play_card(&state, &card(6).id);
    assert_eq!(won.phase, SoloPhase::Won);
    assert_eq!(
        won.tally.score,
        BASE_POINTS + TOWER_BONUS + 60 * TIME_BONUS_MULTIPLIER
    );
}

#[test]
fn score_breakdown_is_a_projection() {
    let state = solo_with_front(vec![card(6)], card(5), vec![card(13)]);
    let won = play_card(&state, &card(6).id);
    let breakdown = score_breakdown(&won);
    assert_eq!(breakdown.tower_bonus, TOWER_BONUS);
    assert_eq!(breakdown.perfect_bonus, PERFECT_BONUS);
    assert_eq!(breakdown.time_bonus, 60 * TIME_BONUS_MULTIPLIER);
    assert_eq!(breakdown.base_score, won.tally.score - TOWER_BONUS);

    // While playing, the won-only components stay zero.
    let mid = score_breakdown(&state);
    assert_eq!(mid.time_bonus, 0);
    assert_eq!(mid.perfect_bonus, 0);
}

#[test]
fn bonus_slot_activates_at_threshold_with_deterministic_card() {
    // Front row 6..=12 over discard 5 gives a clean ascending chain; stop
    // one short of clearing the board so the game stays in Playing.
    let front: Vec<Card> = (6..=12).map(card).collect();
    let mut state = solo_with_front(front.clone(), card(5), vec![card(13)]);

    for (i, c) in front.iter().take(6).enumerate() {
        state = play_card(&state, &c.id);
        let combo = (i + 1) as u32;
        assert_eq!(state.tally.combo, combo);
        if combo >= BONUS_SLOT_1_COMBO {
            assert!(state.bonus_slot_1.is_active);
        } else {
            assert!(!state.bonus_slot_1.is_active);
        }
    }
    assert_eq!(
        state.bonus_slot_1.card,
        Some(generate_bonus_card(42, 1, 0))
    );
    assert_eq!(state.bonus_slot_1.activation_count, 1);
    assert!(!state.bonus_slot_2.is_active);

    // A draw clears the slot and advances its activation counter so the
    // next activation generates a fresh card.
    let drawn = draw_card(&state);
    assert!(!drawn.bonus_slot_1.is_active);
    assert_eq!(drawn.bonus_slot_1.card, None);
    assert_eq!(drawn.bonus_slot_1.activation_count, 2);
}

#[test]
fn bonus_slot_play_pushes_displaced_card_to_discard() {
    let mut state = solo_with_front(vec![card(10), card(2)], card(1), vec![card(13)]);
    state.bonus_slot_1 = BonusSlot {
        card: Some(card_of(Suit::Diamonds, 9)),
        is_active: true,
        activation_count: 1,
    };

    let next = play_card_on_bonus_slot(&state, &card(10).id, 1);
    assert_eq!(next.bonus_slot_1.card, Some(card(10)));
    assert_eq!(next.discard_pile.last(), Some(&card_of(Suit::Diamonds, 9)));
    assert_eq!(next.tally.combo, 1);
    assert_eq!(next.cards_remaining, 1);

    // Inactive slot rejects the play outright.
    let mut inactive = state.clone();
    inactive.bonus_slot_1.is_active = false;
    assert_eq!(play_card_on_bonus_slot(&inactive, &card(10).id, 1), inactive);
}

#[test]
fn timer_runs_out_to_a_loss() {
    let mut state = solo_with_front(vec![card(9)], card(5), vec![card(13)]);
    state.time_remaining = 2;
    let s1 = tick_timer(&state);
    assert_eq!(s1.time_remaining, 1);
    assert_eq!(s1.phase, SoloPhase::Playing);
    let s2 = tick_timer(&s1);
    assert_eq!(s2.time_remaining, 0);
    assert_eq!(s2.phase, SoloPhase::Lost);
    assert_eq!(tick_timer(&s2), s2);
}

#[test]
fn empty_draw_pile_with_no_moves_is_a_loss() {
    let state = solo_with_front(vec![card(9)], card(5), Vec::new());
    assert!(!has_valid_moves(&state));
    let lost = draw_card(&state);
    assert_eq!(lost.phase, SoloPhase::Lost);

    // With a legal play still open, drawing from empty is a no-op.
    let open = solo_with_front(vec![card(6)], card(5), Vec::new());
    assert!(has_valid_moves(&open));
    assert_eq!(draw_card(&open), open);
}

#[test]
fn invalid_move_penalty_hits_score_only() {
    // The 12 keeps the game in Playing; penalties no-op on terminal states.
    let state = solo_with_front(
        vec![card(6), card_of(Suit::Hearts, 12)],
        card(5),
        vec![card(13)],
    );
    let s1 = play_card(&state, &card(6).id); // combo 1, then a failed attempt
    assert_eq!(s1.phase, SoloPhase::Playing);
    let penalized = apply_invalid_move_penalty(&s1);
    assert_eq!(penalized.tally.score, s1.tally.score - INVALID_MOVE_PENALTY);
    assert_eq!(penalized.tally.combo, s1.tally.combo);
    assert_eq!(penalized.pyramid, s1.pyramid);

    // Score has no floor.
    let deep = apply_invalid_move_penalty(&apply_invalid_move_penalty(&state));
    assert_eq!(deep.tally.score, -2 * INVALID_MOVE_PENALTY);
}

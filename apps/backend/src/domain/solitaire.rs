//! Single-player solitaire engine.
//!
//! Every transition is a pure function: it takes a state snapshot and
//! returns a new one, leaving the input untouched. Terminal phases are
//! absorbing; transitions on a finished game return the input unchanged.

use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;
use crate::domain::deck::{generate_bonus_card, generate_deck, shuffle_deck};
use crate::domain::layout::{self, create_brick_pyramid, PyramidNode};
use crate::domain::rules::{
    can_play_card, BASE_POINTS, BONUS_SLOT_1_COMBO, BONUS_SLOT_2_COMBO, INVALID_MOVE_PENALTY,
    PERFECT_BONUS, TIME_BONUS_MULTIPLIER, TOWER_BONUS,
};
use crate::domain::scoring::ComboScore;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SoloPhase {
    Playing,
    Won,
    Lost,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BonusSlot {
    pub card: Option<Card>,
    pub is_active: bool,
    /// Feeds the bonus-card seed derivation; bumped on every activation and
    /// again when a draw deactivates the slot, so no generated card repeats.
    pub activation_count: u32,
}

/// Full single-player snapshot. Mutated exclusively through the transition
/// functions below, each of which returns a fresh snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoloState {
    pub pyramid: Vec<PyramidNode>,
    /// Ordered, last element is the top.
    pub draw_pile: Vec<Card>,
    pub discard_pile: Vec<Card>,
    pub bonus_slot_1: BonusSlot,
    pub bonus_slot_2: BonusSlot,
    pub game_seed: u64,
    pub tally: ComboScore,
    pub level: u32,
    pub time_remaining: u32,
    pub total_time: u32,
    pub cards_remaining: usize,
    pub towers_cleared: usize,
    pub phase: SoloPhase,
}

/// Display-only score decomposition; never fed back into state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub base_score: i64,
    pub tower_bonus: i64,
    pub time_bonus: i64,
    pub perfect_bonus: i64,
}

fn time_for_level(level: u32) -> u32 {
    180u32.saturating_sub(level.saturating_sub(1) * 15).max(60)
}

/// Start a brick-pyramid game: 45 cards dealt to the pyramid, one opener on
/// the discard pile, the remaining 6 in the draw pile.
pub fn init_game(level: u32, seed: Option<u64>) -> SoloState {
    // A missing seed still gets one from the OS so that bonus-card
    // generation stays deterministic for the rest of the run.
    let game_seed = seed.unwrap_or_else(|| OsRng.try_next_u64().unwrap_or(0x5EED));
    let mut deck = generate_deck();
    shuffle_deck(&mut deck, Some(game_seed));

    let board: Vec<Card> = deck.drain(..45).collect();
    let pyramid = create_brick_pyramid(board);
    let opener = deck.remove(0);
    let total_time = time_for_level(level);

    SoloState {
        cards_remaining: layout::cards_remaining(&pyramid),
        pyramid,
        draw_pile: deck,
        discard_pile: vec![opener],
        bonus_slot_1: BonusSlot::default(),
        bonus_slot_2: BonusSlot::default(),
        game_seed,
        tally: ComboScore::default(),
        level,
        time_remaining: total_time,
        total_time,
        towers_cleared: 0,
        phase: SoloPhase::Playing,
    }
}

fn discard_top(state: &SoloState) -> Option<&Card> {
    state.discard_pile.last()
}

/// Play an exposed card onto the discard pile.
///
/// Returns the input unchanged unless the card is currently playable and
/// rank-adjacent to the discard top.
pub fn play_card(state: &SoloState, card_id: &str) -> SoloState {
    if state.phase != SoloPhase::Playing {
        return state.clone();
    }
    let playable = layout::playable_cards(&state.pyramid).any(|c| c.id == card_id);
    let legal = match discard_top(state) {
        Some(top) => {
            let candidate = state
                .pyramid
                .iter()
                .filter_map(|n| n.card.as_ref())
                .find(|c| c.id == card_id);
            candidate.is_some_and(|c| can_play_card(c.value(), top.value()))
        }
        None => false,
    };
    if !playable || !legal {
        return state.clone();
    }

    let mut next = state.clone();
    let Some(card) = layout::take_card(&mut next.pyramid, card_id) else {
        return state.clone();
    };
    next.discard_pile.push(card);
    settle_successful_play(&mut next);
    next
}

/// Play an exposed card onto an active bonus slot. The displaced slot card
/// goes to the discard pile rather than leaving the game.
pub fn play_card_on_bonus_slot(state: &SoloState, card_id: &str, slot_number: u8) -> SoloState {
    if state.phase != SoloPhase::Playing {
        return state.clone();
    }
    let slot = match slot_number {
        1 => &state.bonus_slot_1,
        2 => &state.bonus_slot_2,
        _ => return state.clone(),
    };
    let Some(slot_card) = slot.card.as_ref().filter(|_| slot.is_active) else {
        return state.clone();
    };
    let playable = layout::playable_cards(&state.pyramid).any(|c| c.id == card_id);
    let candidate = state
        .pyramid
        .iter()
        .filter_map(|n| n.card.as_ref())
        .find(|c| c.id == card_id);
    let legal = candidate.is_some_and(|c| can_play_card(c.value(), slot_card.value()));
    if !playable || !legal {
        return state.clone();
    }

    let mut next = state.clone();
    let Some(card) = layout::take_card(&mut next.pyramid, card_id) else {
        return state.clone();
    };
    let slot = if slot_number == 1 {
        &mut next.bonus_slot_1
    } else {
        &mut next.bonus_slot_2
    };
    let displaced = slot.card.replace(card);
    if let Some(displaced) = displaced {
        next.discard_pile.push(displaced);
    }
    settle_successful_play(&mut next);
    next
}

/// Shared bookkeeping after any successful play: combo/score, playability
/// recompute, peak bonuses, win check, bonus-slot auto-activation.
fn settle_successful_play(next: &mut SoloState) {
    next.tally.record_match(BASE_POINTS);
    next.cards_remaining -= 1;
    layout::update_playability(&mut next.pyramid);

    let cleared_now = layout::cleared_peaks(&next.pyramid);
    if cleared_now > next.towers_cleared {
        let newly = (cleared_now - next.towers_cleared) as i64;
        next.tally.add(newly * TOWER_BONUS);
        next.towers_cleared = cleared_now;
    }

    if next.cards_remaining == 0 {
        next.phase = SoloPhase::Won;
        if !next.draw_pile.is_empty() {
            next.tally.add(PERFECT_BONUS);
        }
        next.tally.add(next.time_remaining as i64 * TIME_BONUS_MULTIPLIER);
        return;
    }

    activate_bonus_slots(next);
}

fn activate_bonus_slots(next: &mut SoloState) {
    let combo = next.tally.combo;
    let seed = next.game_seed;
    for (slot_no, threshold, slot) in [
        (1u8, BONUS_SLOT_1_COMBO, &mut next.bonus_slot_1),
        (2u8, BONUS_SLOT_2_COMBO, &mut next.bonus_slot_2),
    ] {
        if combo >= threshold && !slot.is_active {
            slot.card = Some(generate_bonus_card(seed, slot_no, slot.activation_count));
            slot.is_active = true;
            slot.activation_count += 1;
        }
    }
}

/// Flip the top draw card onto the discard pile. Resets the combo and
/// deactivates both bonus slots. With an empty draw pile this instead
/// checks for stalemate and may end the game.
pub fn draw_card(state: &SoloState) -> SoloState {
    if state.phase != SoloPhase::Playing {
        return state.clone();
    }
    if state.draw_pile.is_empty() {
        if !has_valid_moves(state) {
            let mut next = state.clone();
            next.phase = SoloPhase::Lost;
            return next;
        }
        return state.clone();
    }

    let mut next = state.clone();
    let Some(card) = next.draw_pile.pop() else {
        return state.clone();
    };
    next.discard_pile.push(card);
    next.tally.reset_combo();
    for slot in [&mut next.bonus_slot_1, &mut next.bonus_slot_2] {
        if slot.is_active {
            slot.activation_count += 1;
        }
        slot.card = None;
        slot.is_active = false;
    }
    next
}

/// One second of game clock. At zero the game is lost.
pub fn tick_timer(state: &SoloState) -> SoloState {
    if state.phase != SoloPhase::Playing {
        return state.clone();
    }
    let mut next = state.clone();
    next.time_remaining = next.time_remaining.saturating_sub(1);
    if next.time_remaining == 0 {
        next.phase = SoloPhase::Lost;
    }
    next
}

/// Penalty for attempting a move that fits no open slot. Combo and card
/// state are untouched; the score may go negative.
pub fn apply_invalid_move_penalty(state: &SoloState) -> SoloState {
    if state.phase != SoloPhase::Playing {
        return state.clone();
    }
    let mut next = state.clone();
    next.tally.add(-INVALID_MOVE_PENALTY);
    next
}

/// True while the player can still do something: a playable card matching
/// the discard top, or cards left to draw.
pub fn has_valid_moves(state: &SoloState) -> bool {
    if !state.draw_pile.is_empty() {
        return true;
    }
    let Some(top) = discard_top(state) else {
        return false;
    };
    layout::playable_cards(&state.pyramid).any(|c| can_play_card(c.value(), top.value()))
}

/// Pure projection of the score for end-of-game display.
pub fn score_breakdown(state: &SoloState) -> ScoreBreakdown {
    let tower_bonus = state.towers_cleared as i64 * TOWER_BONUS;
    let won = state.phase == SoloPhase::Won;
    ScoreBreakdown {
        base_score: state.tally.score - tower_bonus,
        tower_bonus,
        time_bonus: if won {
            state.time_remaining as i64 * TIME_BONUS_MULTIPLIER
        } else {
            0
        },
        perfect_bonus: if won && !state.draw_pile.is_empty() {
            PERFECT_BONUS
        } else {
            0
        },
    }
}

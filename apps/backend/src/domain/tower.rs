//! Multiplayer tower mini-game: per-player 5-card towers and ±1 action cards.
//!
//! This variant is rules-independent from the solitaire pyramid: an action
//! card applied to one of your tower cards targets the neighboring value,
//! and the play succeeds if a *different* tower card already holds that
//! value. Dealing is deterministic per (match seed, round, player) so a
//! reconnecting client sees the same cards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::cards::{Card, CardId, Rank, Suit};
use crate::domain::deck::SeededRng;
use crate::domain::rules::{HAND_SIZE, TOWER_SIZE};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Plus,
    Minus,
}

/// A +1/−1 modifier card in a player's hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionCard {
    pub id: CardId,
    pub kind: ActionKind,
}

/// Target value when `kind` is applied to a tower card, with wraparound.
pub fn target_value(kind: ActionKind, value: u8) -> u8 {
    match kind {
        ActionKind::Plus => (value % 13) + 1,
        ActionKind::Minus => {
            if value == 1 {
                13
            } else {
                value - 1
            }
        }
    }
}

fn tower_card(rng: &mut SeededRng) -> Card {
    let suit = Suit::ALL[rng.next_range(4)];
    let rank = Rank::ALL[rng.next_range(13)];
    Card {
        id: Uuid::new_v4().to_string(),
        suit,
        rank,
    }
}

/// Deal a fresh 5-card tower. Values are seed-deterministic; ids are fresh.
pub fn deal_tower(seed: u64) -> Vec<Card> {
    let mut rng = SeededRng::new(seed);
    (0..TOWER_SIZE).map(|_| tower_card(&mut rng)).collect()
}

/// The `index`-th action card of a player's deterministic stream. Indices
/// 0..6 form the opening hand; replacements continue the stream.
pub fn action_card(seed: u64, index: u32) -> ActionCard {
    let mut rng = SeededRng::new(seed.wrapping_add((index as u64).wrapping_mul(7919)));
    let kind = if rng.next_range(2) == 0 {
        ActionKind::Plus
    } else {
        ActionKind::Minus
    };
    ActionCard {
        id: Uuid::new_v4().to_string(),
        kind,
    }
}

/// Deal the opening 6-card action hand.
pub fn deal_hand(seed: u64) -> Vec<ActionCard> {
    (0..HAND_SIZE as u32).map(|i| action_card(seed, i)).collect()
}

/// Find the tower card consumed by playing `kind` on `source_id`.
///
/// Returns the index of the first card (by tower position) holding the
/// target value that is not the source card itself. Duplicate values
/// resolve by position.
pub fn find_match(tower: &[Card], kind: ActionKind, source_id: &str) -> Option<usize> {
    let source = tower.iter().find(|c| c.id == source_id)?;
    let target = target_value(kind, source.value());
    tower
        .iter()
        .position(|c| c.value() == target && c.id != source_id)
}

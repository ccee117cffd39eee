//! Wire-facing views of rooms and matches.
//!
//! Broadcast payloads are built from these instead of the mutable domain
//! state, so the wire format can stay stable (and omit server-only fields
//! like seeds) while the engine evolves.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::cards::Card;
use crate::domain::round::{LastAction, MatchPhase, MatchState, RoundState};
use crate::domain::tower::ActionCard;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomPlayerSnapshot {
    pub id: String,
    pub name: String,
    pub is_ready: bool,
    pub is_host: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub id: String,
    pub code: String,
    pub host_id: String,
    pub players: Vec<RoomPlayerSnapshot>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub in_game: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: String,
    pub name: String,
    pub score: i64,
    pub combo: u32,
    pub is_eliminated: bool,
    pub is_ready: bool,
    pub tower: Vec<Card>,
    pub hand: Vec<ActionCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_action: Option<LastAction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub room_id: String,
    pub phase: MatchPhase,
    pub round: RoundState,
    pub players: Vec<PlayerSnapshot>,
    pub eliminated_player_ids: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
}

impl MatchSnapshot {
    pub fn of(state: &MatchState) -> Self {
        Self {
            room_id: state.room_id.clone(),
            phase: state.phase,
            round: state.round.clone(),
            players: state
                .players
                .iter()
                .map(|p| PlayerSnapshot {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    score: p.tally.score,
                    combo: p.tally.combo,
                    is_eliminated: p.is_eliminated,
                    is_ready: p.is_ready,
                    tower: p.tower.clone(),
                    hand: p.hand.clone(),
                    last_action: p.last_action.clone(),
                })
                .collect(),
            eliminated_player_ids: state.eliminated_player_ids.clone(),
            winner: state.winner.clone(),
        }
    }
}

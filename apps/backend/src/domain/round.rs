//! Multiplayer match state machine: rounds, standings, elimination.
//!
//! Pure logic only. The orchestrator service drives this from timer ticks
//! and client intents and broadcasts the returned events; nothing here
//! touches sockets or clocks, which is what keeps the schedule testable
//! with direct calls instead of a real timer.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;
use crate::domain::rules::{
    elimination_rank_for_round, round_time_for_round, BASE_POINTS, TOTAL_ROUNDS,
};
use crate::domain::scoring::ComboScore;
use crate::domain::seed_derivation::derive_player_seed;
use crate::domain::tower::{action_card, deal_hand, deal_tower, find_match, ActionCard};

pub type PlayerId = String;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    Waiting,
    Playing,
    RoundTransition,
    GameOver,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub round_number: u8,
    pub time_remaining: u32,
    pub total_time: u32,
    pub is_active: bool,
}

impl RoundState {
    fn for_round(round_number: u8) -> Self {
        let total = round_time_for_round(round_number);
        Self {
            round_number,
            time_remaining: total,
            total_time: total,
            is_active: true,
        }
    }
}

/// What a player did most recently, echoed to the room for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastAction {
    pub action_card_id: String,
    pub tower_card_id: String,
    pub matched_card_id: Option<String>,
    pub points_awarded: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub tally: ComboScore,
    pub is_eliminated: bool,
    pub is_ready: bool,
    pub tower: Vec<Card>,
    pub hand: Vec<ActionCard>,
    /// How many action cards this player has drawn from their stream;
    /// the next replacement continues from here.
    pub action_draws: u32,
    pub last_action: Option<LastAction>,
}

/// Server-authoritative multiplayer game state for one room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub room_id: String,
    pub match_seed: u64,
    pub phase: MatchPhase,
    pub round: RoundState,
    pub players: Vec<Player>,
    pub eliminated_player_ids: Vec<PlayerId>,
    pub winner: Option<PlayerId>,
}

/// Edge events produced by a timer tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundEvent {
    Tick { time_remaining: u32 },
    RoundExpired { round_number: u8 },
}

/// Result of `advance_round`, so the caller can notify the room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceOutcome {
    /// Player eliminated at the end of the expired round, if any.
    pub eliminated: Option<PlayerId>,
    /// Round number the elimination belongs to.
    pub ended_round: u8,
    pub game_over: bool,
}

/// Outcome of a single tower play attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Target value found: matched card and action card consumed.
    Matched { points_awarded: i64, combo: u32 },
    /// No different tower card holds the target value; combo resets.
    NoMatch,
    /// Stale player, inactive round, or unknown card ids. Silently dropped.
    Ignored,
}

impl MatchState {
    /// Start a match for the given (id, name) roster. Every player gets a
    /// round-1 tower and hand derived from the match seed.
    pub fn start(room_id: String, roster: &[(PlayerId, String)], match_seed: u64) -> Self {
        let mut state = Self {
            room_id,
            match_seed,
            phase: MatchPhase::Playing,
            round: RoundState::for_round(1),
            players: roster
                .iter()
                .map(|(id, name)| Player {
                    id: id.clone(),
                    name: name.clone(),
                    tally: ComboScore::default(),
                    is_eliminated: false,
                    is_ready: true,
                    tower: Vec::new(),
                    hand: Vec::new(),
                    action_draws: 0,
                    last_action: None,
                })
                .collect(),
            eliminated_player_ids: Vec::new(),
            winner: None,
        };
        state.deal_round(1);
        state
    }

    fn deal_round(&mut self, round_number: u8) {
        let seed = self.match_seed;
        for (index, player) in self.players.iter_mut().enumerate() {
            if player.is_eliminated {
                // Frozen for spectators; no regeneration.
                continue;
            }
            let player_seed = derive_player_seed(seed, round_number, index);
            player.tower = deal_tower(player_seed);
            player.hand = deal_hand(player_seed);
            player.action_draws = player.hand.len() as u32;
            player.tally.reset_combo();
            player.last_action = None;
        }
    }

    pub fn active_players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_eliminated)
    }

    /// Apply an action card to one of the player's own tower cards.
    pub fn process_card_play(
        &mut self,
        player_id: &str,
        action_card_id: &str,
        tower_card_id: &str,
    ) -> PlayOutcome {
        if self.phase != MatchPhase::Playing || !self.round.is_active {
            return PlayOutcome::Ignored;
        }
        let Some(player_index) = self
            .players
            .iter()
            .position(|p| p.id == player_id && !p.is_eliminated)
        else {
            return PlayOutcome::Ignored;
        };
        let match_seed = self.match_seed;
        let round_number = self.round.round_number;
        let player = &mut self.players[player_index];

        let Some(action_index) = player.hand.iter().position(|a| a.id == action_card_id) else {
            return PlayOutcome::Ignored;
        };
        if !player.tower.iter().any(|c| c.id == tower_card_id) {
            return PlayOutcome::Ignored;
        }

        let kind = player.hand[action_index].kind;
        match find_match(&player.tower, kind, tower_card_id) {
            Some(matched_index) => {
                let matched = player.tower.remove(matched_index);
                player.hand.remove(action_index);
                // Replacement continues the player's deterministic stream.
                let player_seed = derive_player_seed(match_seed, round_number, player_index);
                player.hand.push(action_card(player_seed, player.action_draws));
                player.action_draws += 1;

                let outcome = player.tally.record_match(BASE_POINTS);
                player.last_action = Some(LastAction {
                    action_card_id: action_card_id.to_string(),
                    tower_card_id: tower_card_id.to_string(),
                    matched_card_id: Some(matched.id),
                    points_awarded: outcome.points_awarded,
                });
                PlayOutcome::Matched {
                    points_awarded: outcome.points_awarded,
                    combo: outcome.combo,
                }
            }
            None => {
                player.tally.reset_combo();
                player.last_action = Some(LastAction {
                    action_card_id: action_card_id.to_string(),
                    tower_card_id: tower_card_id.to_string(),
                    matched_card_id: None,
                    points_awarded: 0,
                });
                PlayOutcome::NoMatch
            }
        }
    }

    /// One second of round clock. At zero the round freezes and the match
    /// enters the transition phase; the caller schedules `advance_round`
    /// after the settle delay.
    pub fn tick(&mut self) -> Vec<RoundEvent> {
        if self.phase != MatchPhase::Playing || !self.round.is_active {
            return Vec::new();
        }
        self.round.time_remaining = self.round.time_remaining.saturating_sub(1);
        let mut events = vec![RoundEvent::Tick {
            time_remaining: self.round.time_remaining,
        }];
        if self.round.time_remaining == 0 {
            self.round.is_active = false;
            self.phase = MatchPhase::RoundTransition;
            events.push(RoundEvent::RoundExpired {
                round_number: self.round.round_number,
            });
        }
        events
    }

    /// Close out the expired round: apply the elimination schedule, then
    /// either finish the match or set up the next round.
    pub fn advance_round(&mut self) -> AdvanceOutcome {
        let ended_round = self.round.round_number;
        let eliminated = self.apply_elimination(ended_round);

        if ended_round >= TOTAL_ROUNDS {
            self.phase = MatchPhase::GameOver;
            self.round.is_active = false;
            self.winner = self.standings_leader();
            return AdvanceOutcome {
                eliminated,
                ended_round,
                game_over: true,
            };
        }

        let next_round = ended_round + 1;
        self.round = RoundState::for_round(next_round);
        self.deal_round(next_round);
        self.phase = MatchPhase::Playing;
        AdvanceOutcome {
            eliminated,
            ended_round,
            game_over: false,
        }
    }

    /// Cut the lowest-scoring active player when the schedule says so.
    /// Ties break by roster order, first found.
    fn apply_elimination(&mut self, round_number: u8) -> Option<PlayerId> {
        let rank = elimination_rank_for_round(round_number)?;
        let active_count = self.active_players().count();
        if active_count < rank || active_count <= 1 {
            return None;
        }
        let lowest = self
            .players
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_eliminated)
            .min_by_key(|(_, p)| p.tally.score)
            .map(|(i, _)| i)?;
        let player = &mut self.players[lowest];
        player.is_eliminated = true;
        let id = player.id.clone();
        self.eliminated_player_ids.push(id.clone());
        Some(id)
    }

    /// Highest-scoring still-active player, ties by roster order.
    fn standings_leader(&self) -> Option<PlayerId> {
        let mut best: Option<&Player> = None;
        for player in self.active_players() {
            if best.is_none_or(|b| player.tally.score > b.tally.score) {
                best = Some(player);
            }
        }
        best.map(|p| p.id.clone())
    }

    /// Final (name, score) pairs for the game_over broadcast, every player
    /// included, sorted descending by score.
    pub fn final_scores(&self) -> Vec<(PlayerId, i64)> {
        let mut scores: Vec<(PlayerId, i64)> = self
            .players
            .iter()
            .map(|p| (p.id.clone(), p.tally.score))
            .collect();
        scores.sort_by(|a, b| b.1.cmp(&a.1));
        scores
    }
}

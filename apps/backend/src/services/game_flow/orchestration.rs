use std::sync::Arc;

use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::{info, warn};

use super::GameFlowService;
use crate::domain::round::{MatchState, PlayOutcome};
use crate::domain::snapshot::MatchSnapshot;
use crate::errors::domain::DomainError;
use crate::services::leaderboard::DEFAULT_LEADERBOARD_LIMIT;
use crate::ws::protocol::{FinalScore, ServerMsg};

impl GameFlowService {
    /// Host-only game start. Validates the lobby through the room
    /// registry, deals round 1, and brings up the room's timer task.
    pub fn start_game(
        self: &Arc<Self>,
        room_id: &str,
        requester_id: &str,
    ) -> Result<(), DomainError> {
        let roster = self.rooms.start_roster(room_id, requester_id)?;
        let match_seed = OsRng.try_next_u64().unwrap_or(0x5EED);

        let state = MatchState::start(room_id.to_string(), &roster, match_seed);
        let snapshot = MatchSnapshot::of(&state);
        self.matches.insert(room_id.to_string(), state);

        info!(room_id, players = roster.len(), "Match started");
        self.hub
            .broadcast(room_id, ServerMsg::GameStarted { game_state: snapshot });
        self.spawn_round_timer(room_id.to_string());
        Ok(())
    }

    /// Apply one tower play and broadcast the result. Stale ids are
    /// dropped without a broadcast, per the orchestration error policy.
    pub fn handle_play(
        &self,
        room_id: &str,
        player_id: &str,
        action_card_id: &str,
        tower_card_id: &str,
    ) {
        let Some(mut state) = self.matches.get_mut(room_id) else {
            return;
        };
        let outcome = state.process_card_play(player_id, action_card_id, tower_card_id);
        let snapshot = MatchSnapshot::of(&state);
        drop(state);

        match outcome {
            PlayOutcome::Matched { combo, .. } => {
                self.hub.broadcast(
                    room_id,
                    ServerMsg::ComboTrigger {
                        player_id: player_id.to_string(),
                        combo,
                    },
                );
                self.hub
                    .broadcast(room_id, ServerMsg::GameUpdate { game_state: snapshot });
            }
            PlayOutcome::NoMatch => {
                self.hub
                    .broadcast(room_id, ServerMsg::GameUpdate { game_state: snapshot });
            }
            PlayOutcome::Ignored => {}
        }
    }

    pub fn match_snapshot(&self, room_id: &str) -> Option<MatchSnapshot> {
        self.matches.get(room_id).map(|state| MatchSnapshot::of(&state))
    }

    /// Drop the room's match and cancel its timer. Called when the room
    /// empties out mid-game.
    pub fn teardown_room(&self, room_id: &str) {
        if let Some((_, handle)) = self.timers.remove(room_id) {
            handle.abort();
        }
        if self.matches.remove(room_id).is_some() {
            info!(room_id, "Match torn down");
        }
    }

    /// Record a completed solo run. Store failures are logged and
    /// swallowed so a flaky leaderboard never breaks game flow.
    pub async fn submit_solo_run(&self, name: &str, points: i64) {
        if let Err(err) = self.leaderboard.add_run(name, points).await {
            warn!(error = %err, name, "Failed to record solo run");
        }
    }

    /// Close out a finished match: broadcast the result, push every run
    /// to the leaderboard, and reopen the lobby.
    pub(super) async fn finish_match(&self, room_id: &str) {
        let Some((_, state)) = self.matches.remove(room_id) else {
            return;
        };

        let final_scores: Vec<FinalScore> = state
            .final_scores()
            .into_iter()
            .map(|(player_id, points)| {
                let name = state
                    .players
                    .iter()
                    .find(|p| p.id == player_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default();
                FinalScore {
                    player_id,
                    name,
                    points,
                }
            })
            .collect();

        info!(room_id, winner = ?state.winner, "Match finished");
        self.hub.broadcast(
            room_id,
            ServerMsg::GameOver {
                winner: state.winner.clone(),
                final_scores: final_scores.clone(),
            },
        );

        for score in &final_scores {
            if let Err(err) = self.leaderboard.add_run(&score.name, score.points).await {
                warn!(error = %err, player = score.name, "Failed to record run");
            }
        }
        match self.leaderboard.get_leaderboard(DEFAULT_LEADERBOARD_LIMIT).await {
            Ok(entries) => {
                self.hub
                    .broadcast(room_id, ServerMsg::LeaderboardUpdate { entries });
            }
            Err(err) => warn!(error = %err, "Failed to load leaderboard after match"),
        }

        self.rooms.end_game(room_id);
        if let Some(room) = self.rooms.snapshot(room_id) {
            self.hub.broadcast(room_id, ServerMsg::RoomUpdate { room });
        }
    }
}

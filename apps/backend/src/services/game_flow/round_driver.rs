//! Per-room timer task.
//!
//! One tokio task per active match drives the 1s round clock and the
//! settle delay between rounds. The domain emits `RoundEvent`s from
//! `tick`; this driver only translates them into broadcasts, so the
//! schedule itself stays testable with direct calls on `MatchState`.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::debug;

use super::GameFlowService;
use crate::domain::round::RoundEvent;
use crate::domain::rules::ROUND_TRANSITION_DELAY_SECS;
use crate::domain::snapshot::MatchSnapshot;
use crate::ws::protocol::ServerMsg;

impl GameFlowService {
    /// Start the room's driver task, replacing (and aborting) any
    /// previous one. Exactly one timer may run per room.
    ///
    /// Registrations are only removed here (on replacement) and in
    /// `teardown_room`; a finished driver never touches the map, so it
    /// cannot scrub a replacement's handle. Aborting an already-finished
    /// handle is a no-op.
    pub(super) fn spawn_round_timer(self: &Arc<Self>, room_id: String) {
        let service = Arc::clone(self);
        let task_room = room_id.clone();
        let handle = tokio::spawn(async move {
            service.drive_room(&task_room).await;
        });
        if let Some(old) = self.timers.insert(room_id, handle) {
            old.abort();
        }
    }

    async fn drive_room(&self, room_id: &str) {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a fresh interval fires immediately.
        interval.tick().await;

        loop {
            interval.tick().await;

            let Some(events) = self
                .matches
                .get_mut(room_id)
                .map(|mut state| state.tick())
            else {
                debug!(room_id, "Match gone, stopping round driver");
                return;
            };

            let mut expired = false;
            for event in events {
                match event {
                    RoundEvent::Tick { time_remaining } => {
                        self.hub
                            .broadcast(room_id, ServerMsg::TimerTick { time_remaining });
                    }
                    RoundEvent::RoundExpired { round_number } => {
                        debug!(room_id, round_number, "Round expired");
                        expired = true;
                    }
                }
            }
            if !expired {
                continue;
            }

            // Frozen-round snapshot goes out before the settle delay so
            // clients can show the transition.
            if let Some(snapshot) = self.match_snapshot(room_id) {
                self.hub
                    .broadcast(room_id, ServerMsg::GameUpdate { game_state: snapshot });
            }
            tokio::time::sleep(Duration::from_secs(ROUND_TRANSITION_DELAY_SECS)).await;

            let advanced = self.matches.get_mut(room_id).map(|mut state| {
                let outcome = state.advance_round();
                (outcome, MatchSnapshot::of(&state))
            });
            let Some((outcome, snapshot)) = advanced else {
                return;
            };

            if let Some(player_id) = outcome.eliminated {
                self.hub.broadcast(
                    room_id,
                    ServerMsg::EliminationNotice {
                        player_id,
                        round_number: outcome.ended_round,
                    },
                );
            }
            if outcome.game_over {
                self.finish_match(room_id).await;
                return;
            }
            self.hub
                .broadcast(room_id, ServerMsg::GameUpdate { game_state: snapshot });
            interval.reset();
        }
    }
}

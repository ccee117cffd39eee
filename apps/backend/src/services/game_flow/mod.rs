//! Game flow orchestration service - bridges the pure domain engine with
//! the room registry, the leaderboard store, and the websocket hub.
//!
//! All match mutation funnels through this service. The domain stays
//! synchronous and snapshot-based; this layer owns the per-room timer
//! tasks and turns domain events into broadcasts.

mod orchestration;
mod round_driver;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;

use crate::domain::round::MatchState;
use crate::services::leaderboard::LeaderboardStore;
use crate::services::rooms::RoomRegistry;
use crate::ws::hub::RoomSessionRegistry;

pub struct GameFlowService {
    rooms: Arc<RoomRegistry>,
    leaderboard: Arc<dyn LeaderboardStore>,
    hub: Arc<RoomSessionRegistry>,
    matches: DashMap<String, MatchState>,
    timers: DashMap<String, JoinHandle<()>>,
}

impl GameFlowService {
    pub fn new(
        rooms: Arc<RoomRegistry>,
        leaderboard: Arc<dyn LeaderboardStore>,
        hub: Arc<RoomSessionRegistry>,
    ) -> Self {
        Self {
            rooms,
            leaderboard,
            hub,
            matches: DashMap::new(),
            timers: DashMap::new(),
        }
    }
}

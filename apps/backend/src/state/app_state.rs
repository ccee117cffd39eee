use std::sync::Arc;

use crate::services::game_flow::GameFlowService;
use crate::services::leaderboard::{InMemoryLeaderboardStore, LeaderboardStore};
use crate::services::rooms::RoomRegistry;
use crate::ws::hub::RoomSessionRegistry;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    rooms: Arc<RoomRegistry>,
    leaderboard: Arc<dyn LeaderboardStore>,
    hub: Arc<RoomSessionRegistry>,
    game_flow: Arc<GameFlowService>,
}

impl AppState {
    /// Create a new AppState around the given leaderboard store.
    pub fn new(leaderboard: Arc<dyn LeaderboardStore>) -> Self {
        let rooms = Arc::new(RoomRegistry::new());
        let hub = Arc::new(RoomSessionRegistry::new());
        let game_flow = Arc::new(GameFlowService::new(
            rooms.clone(),
            leaderboard.clone(),
            hub.clone(),
        ));
        Self {
            rooms,
            leaderboard,
            hub,
            game_flow,
        }
    }

    /// Default wiring: everything in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryLeaderboardStore::new()))
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    pub fn leaderboard(&self) -> &Arc<dyn LeaderboardStore> {
        &self.leaderboard
    }

    pub fn hub(&self) -> &RoomSessionRegistry {
        &self.hub
    }

    pub fn game_flow(&self) -> &Arc<GameFlowService> {
        &self.game_flow
    }
}

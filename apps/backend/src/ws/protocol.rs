use serde::{Deserialize, Serialize};

use crate::domain::snapshot::{MatchSnapshot, RoomSnapshot};
use crate::services::leaderboard::LeaderboardEntry;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    CreateRoom { player_name: String },
    JoinRoom { room_code: String, player_name: String },
    LeaveRoom,
    SetReady { ready: bool },
    StartGame,
    PlayCard { action_card_id: String, tower_card_id: String },
    RequestState,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalScore {
    pub player_id: String,
    pub name: String,
    pub points: i64,
}

#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    RoomCreated {
        room: RoomSnapshot,
        player_id: String,
    },

    RoomJoined {
        room: RoomSnapshot,
        player_id: String,
    },

    RoomUpdate {
        room: RoomSnapshot,
    },

    GameStarted {
        game_state: MatchSnapshot,
    },

    GameUpdate {
        game_state: MatchSnapshot,
    },

    TimerTick {
        time_remaining: u32,
    },

    ComboTrigger {
        player_id: String,
        combo: u32,
    },

    EliminationNotice {
        player_id: String,
        round_number: u8,
    },

    GameOver {
        winner: Option<String>,
        final_scores: Vec<FinalScore>,
    },

    LeaderboardUpdate {
        entries: Vec<LeaderboardEntry>,
    },

    Error {
        message: String,
    },
}

pub mod game_flow;
pub mod leaderboard;
pub mod rooms;

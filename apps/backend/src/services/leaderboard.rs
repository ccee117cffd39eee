//! Leaderboard store behind a trait so the HTTP layer and the game flow
//! never depend on where runs are kept.
//!
//! The in-memory implementation is the only one shipped; swapping in a
//! persistent backend means implementing `LeaderboardStore` and wiring it
//! into `AppState`. Store failures are logged by callers and never abort
//! room flow.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::errors::domain::{DomainError, ValidationKind};

pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;
pub const MAX_LEADERBOARD_LIMIT: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub points: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Record one completed run.
    async fn add_run(&self, name: &str, points: i64) -> Result<LeaderboardEntry, DomainError>;

    /// Top runs, descending by points. Ties keep insertion order.
    async fn get_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError>;
}

/// In-memory store; entries beyond the retention cap are dropped from the
/// bottom on insert.
#[derive(Default)]
pub struct InMemoryLeaderboardStore {
    entries: RwLock<Vec<LeaderboardEntry>>,
}

impl InMemoryLeaderboardStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeaderboardStore for InMemoryLeaderboardStore {
    async fn add_run(&self, name: &str, points: i64) -> Result<LeaderboardEntry, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::PlayerName,
                "run name must not be empty",
            ));
        }
        let entry = LeaderboardEntry {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            points,
            created_at: OffsetDateTime::now_utc(),
        };

        let mut entries = self.entries.write();
        // Stable sort keeps earlier runs ahead on ties.
        let position = entries
            .iter()
            .position(|e| e.points < points)
            .unwrap_or(entries.len());
        entries.insert(position, entry.clone());
        entries.truncate(MAX_LEADERBOARD_LIMIT);
        debug!(name = entry.name, points, "Leaderboard run recorded");
        Ok(entry)
    }

    async fn get_leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, DomainError> {
        let limit = limit.clamp(1, MAX_LEADERBOARD_LIMIT);
        Ok(self.entries.read().iter().take(limit).cloned().collect())
    }
}

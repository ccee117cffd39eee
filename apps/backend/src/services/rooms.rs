//! Room registry: lobby lifecycle from create through game start.
//!
//! Rooms live in memory only. A room exists from the moment its host
//! creates it until the last member leaves; there is no persistence and
//! no reconnect grace period.

use dashmap::DashMap;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::domain::rules::{MAX_PLAYERS, MIN_PLAYERS};
use crate::domain::snapshot::{RoomPlayerSnapshot, RoomSnapshot};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use crate::utils::join_code::generate_join_code;

const MAX_NAME_LEN: usize = 20;

#[derive(Debug, Clone)]
pub struct RoomMember {
    pub id: String,
    pub name: String,
    pub is_ready: bool,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: String,
    pub code: String,
    pub host_id: String,
    pub members: Vec<RoomMember>,
    pub created_at: OffsetDateTime,
    pub in_game: bool,
}

impl Room {
    fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            id: self.id.clone(),
            code: self.code.clone(),
            host_id: self.host_id.clone(),
            players: self
                .members
                .iter()
                .map(|m| RoomPlayerSnapshot {
                    id: m.id.clone(),
                    name: m.name.clone(),
                    is_ready: m.is_ready,
                    is_host: m.id == self.host_id,
                })
                .collect(),
            created_at: self.created_at,
            in_game: self.in_game,
        }
    }
}

/// In-memory registry of every open room, keyed by room id with a join
/// code index alongside.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<String, Room>,
    codes: DashMap<String, String>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a room with the caller as host. Returns the snapshot and the
    /// freshly assigned player id.
    pub fn create_room(&self, player_name: &str) -> Result<(RoomSnapshot, String), DomainError> {
        let name = valid_name(player_name)?;
        let room_id = Uuid::new_v4().to_string();
        let player_id = Uuid::new_v4().to_string();
        let code = self.claim_code(&room_id);

        let room = Room {
            id: room_id.clone(),
            code: code.clone(),
            host_id: player_id.clone(),
            members: vec![RoomMember {
                id: player_id.clone(),
                name,
                is_ready: false,
            }],
            created_at: OffsetDateTime::now_utc(),
            in_game: false,
        };
        let snapshot = room.snapshot();
        self.rooms.insert(room_id.clone(), room);

        info!(room_id, code, "Room created");
        Ok((snapshot, player_id))
    }

    /// Join by code. Codes are matched case-insensitively.
    pub fn join_room(
        &self,
        room_code: &str,
        player_name: &str,
    ) -> Result<(RoomSnapshot, String), DomainError> {
        let name = valid_name(player_name)?;
        let code = room_code.trim().to_ascii_uppercase();
        let room_id = self
            .codes
            .get(&code)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Room, format!("no room with code {code}"))
            })?;
        let mut room = self.rooms.get_mut(&room_id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, format!("no room with code {code}"))
        })?;

        if room.in_game {
            return Err(DomainError::conflict(
                ConflictKind::GameInProgress,
                "game already in progress",
            ));
        }
        if room.members.len() >= MAX_PLAYERS {
            return Err(DomainError::conflict(ConflictKind::RoomFull, "room is full"));
        }

        let player_id = Uuid::new_v4().to_string();
        room.members.push(RoomMember {
            id: player_id.clone(),
            name,
            is_ready: false,
        });
        info!(room_id = room.id, player_id, "Player joined room");
        Ok((room.snapshot(), player_id))
    }

    /// Remove a member. Host leaving promotes the longest-standing member;
    /// the last member leaving deletes the room and returns `None`.
    pub fn leave_room(
        &self,
        room_id: &str,
        player_id: &str,
    ) -> Result<Option<RoomSnapshot>, DomainError> {
        let (snapshot, code) = {
            let mut room = self.require_room_mut(room_id)?;
            let before = room.members.len();
            room.members.retain(|m| m.id != player_id);
            if room.members.len() == before {
                return Err(DomainError::not_found(
                    NotFoundKind::Player,
                    format!("player {player_id} not in room"),
                ));
            }
            if room.members.is_empty() {
                (None, Some(room.code.clone()))
            } else {
                if room.host_id == player_id {
                    room.host_id = room.members[0].id.clone();
                    info!(room_id, new_host = room.host_id, "Host reassigned");
                }
                (Some(room.snapshot()), None)
            }
        };

        if let Some(code) = code {
            self.rooms.remove(room_id);
            self.codes.remove(&code);
            info!(room_id, "Room deleted (empty)");
        }
        Ok(snapshot)
    }

    pub fn set_ready(
        &self,
        room_id: &str,
        player_id: &str,
        ready: bool,
    ) -> Result<RoomSnapshot, DomainError> {
        let mut room = self.require_room_mut(room_id)?;
        let member = room
            .members
            .iter_mut()
            .find(|m| m.id == player_id)
            .ok_or_else(|| {
                DomainError::not_found(
                    NotFoundKind::Player,
                    format!("player {player_id} not in room"),
                )
            })?;
        member.is_ready = ready;
        Ok(room.snapshot())
    }

    /// Validate a start request and flip the room into its in-game state.
    /// Returns the (id, name) roster in join order.
    pub fn start_roster(
        &self,
        room_id: &str,
        requester_id: &str,
    ) -> Result<Vec<(String, String)>, DomainError> {
        let mut room = self.require_room_mut(room_id)?;
        if room.host_id != requester_id {
            return Err(DomainError::conflict(
                ConflictKind::NotHost,
                "only the host can start the game",
            ));
        }
        if room.in_game {
            return Err(DomainError::conflict(
                ConflictKind::GameInProgress,
                "game already in progress",
            ));
        }
        if room.members.len() < MIN_PLAYERS {
            return Err(DomainError::conflict(
                ConflictKind::PlayersNotReady,
                "not enough players",
            ));
        }
        if !room.members.iter().all(|m| m.is_ready) {
            return Err(DomainError::conflict(
                ConflictKind::PlayersNotReady,
                "all players must be ready",
            ));
        }
        room.in_game = true;
        info!(room_id, players = room.members.len(), "Game starting");
        Ok(room
            .members
            .iter()
            .map(|m| (m.id.clone(), m.name.clone()))
            .collect())
    }

    /// Reopen the lobby after a match ends so the room can play again.
    pub fn end_game(&self, room_id: &str) {
        if let Some(mut room) = self.rooms.get_mut(room_id) {
            room.in_game = false;
            for member in &mut room.members {
                member.is_ready = false;
            }
        }
    }

    pub fn snapshot(&self, room_id: &str) -> Option<RoomSnapshot> {
        self.rooms.get(room_id).map(|room| room.snapshot())
    }

    fn require_room_mut(
        &self,
        room_id: &str,
    ) -> Result<dashmap::mapref::one::RefMut<'_, String, Room>, DomainError> {
        self.rooms.get_mut(room_id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Room, format!("no room {room_id}"))
        })
    }

    /// Reserve a join code, retrying on the (unlikely) collision.
    fn claim_code(&self, room_id: &str) -> String {
        loop {
            let code = generate_join_code();
            let mut claimed = false;
            self.codes.entry(code.clone()).or_insert_with(|| {
                claimed = true;
                room_id.to_string()
            });
            if claimed {
                return code;
            }
        }
    }
}

fn valid_name(raw: &str) -> Result<String, DomainError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(DomainError::validation(
            ValidationKind::PlayerName,
            "player name must not be empty",
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            ValidationKind::PlayerName,
            format!("player name must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(name.to_string())
}

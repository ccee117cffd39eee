//! Per-room registry of live websocket sessions.
//!
//! Broadcast is fire-and-forget: `do_send` to each registered recipient,
//! dead mailboxes dropped silently. A stalled client never blocks the
//! room's timer or the other members.

use actix::prelude::*;
use dashmap::DashMap;
use uuid::Uuid;

use crate::ws::protocol::ServerMsg;

#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct SessionBroadcast(pub ServerMsg);

#[derive(Default)]
pub struct RoomSessionRegistry {
    sessions: DashMap<String, DashMap<Uuid, Recipient<SessionBroadcast>>>,
}

impl RoomSessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn register(&self, room_id: &str, conn_id: Uuid, recipient: Recipient<SessionBroadcast>) {
        let entry = self
            .sessions
            .entry(room_id.to_string())
            .or_insert_with(DashMap::new);
        entry.insert(conn_id, recipient);
    }

    pub fn unregister(&self, room_id: &str, conn_id: Uuid) {
        if let Some(entry) = self.sessions.get(room_id) {
            entry.remove(&conn_id);
            if entry.is_empty() {
                drop(entry);
                self.sessions.remove(room_id);
            }
        }
    }

    pub fn broadcast(&self, room_id: &str, message: ServerMsg) {
        if let Some(entry) = self.sessions.get(room_id) {
            for recipient in entry.iter() {
                recipient.value().do_send(SessionBroadcast(message.clone()));
            }
        }
    }
}

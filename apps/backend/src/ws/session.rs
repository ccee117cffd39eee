use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::domain::DomainError;
use crate::state::app_state::AppState;
use crate::ws::hub::SessionBroadcast;
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(Uuid::new_v4(), app_state);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    app_state: web::Data<AppState>,

    /// Set once the client has created or joined a room.
    room_id: Option<String>,
    player_id: Option<String>,

    last_heartbeat: Instant,
}

impl WsSession {
    fn new(conn_id: Uuid, app_state: web::Data<AppState>) -> Self {
        Self {
            conn_id,
            app_state,
            room_id: None,
            player_id: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_domain_error(ctx: &mut ws::WebsocketContext<Self>, err: &DomainError) {
        Self::send_json(
            ctx,
            &ServerMsg::Error {
                message: err.to_string(),
            },
        );
    }

    fn start_heartbeat(&self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(conn_id = %actor.conn_id, "[WS SESSION] heartbeat timed out");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn enter_room(&mut self, ctx: &mut ws::WebsocketContext<Self>, room_id: String, player_id: String) {
        let recipient = ctx.address().recipient::<SessionBroadcast>();
        self.app_state
            .hub()
            .register(&room_id, self.conn_id, recipient);
        self.room_id = Some(room_id);
        self.player_id = Some(player_id);
    }

    /// Leave the current room, if any: deregister from the hub, update
    /// the registry, and tear the match down when the room emptied.
    fn leave_current_room(&mut self) {
        let (Some(room_id), Some(player_id)) = (self.room_id.take(), self.player_id.take()) else {
            return;
        };
        self.app_state.hub().unregister(&room_id, self.conn_id);

        match self.app_state.rooms().leave_room(&room_id, &player_id) {
            Ok(Some(room)) => {
                self.app_state
                    .hub()
                    .broadcast(&room_id, ServerMsg::RoomUpdate { room });
            }
            Ok(None) => {
                self.app_state.game_flow().teardown_room(&room_id);
            }
            Err(err) => {
                // Stale leave; the room already forgot this player.
                info!(room_id, player_id, error = %err, "[WS SESSION] leave ignored");
            }
        }
    }

    fn handle_client_msg(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        match cmd {
            ClientMsg::CreateRoom { player_name } => {
                if self.room_id.is_some() {
                    self.leave_current_room();
                }
                match self.app_state.rooms().create_room(&player_name) {
                    Ok((room, player_id)) => {
                        self.enter_room(ctx, room.id.clone(), player_id.clone());
                        Self::send_json(ctx, &ServerMsg::RoomCreated { room, player_id });
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }

            ClientMsg::JoinRoom {
                room_code,
                player_name,
            } => {
                if self.room_id.is_some() {
                    self.leave_current_room();
                }
                match self.app_state.rooms().join_room(&room_code, &player_name) {
                    Ok((room, player_id)) => {
                        let room_id = room.id.clone();
                        self.enter_room(ctx, room_id.clone(), player_id.clone());
                        Self::send_json(
                            ctx,
                            &ServerMsg::RoomJoined {
                                room: room.clone(),
                                player_id,
                            },
                        );
                        self.app_state
                            .hub()
                            .broadcast(&room_id, ServerMsg::RoomUpdate { room });
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }

            ClientMsg::LeaveRoom => {
                self.leave_current_room();
            }

            ClientMsg::SetReady { ready } => {
                let (Some(room_id), Some(player_id)) = (&self.room_id, &self.player_id) else {
                    return;
                };
                match self.app_state.rooms().set_ready(room_id, player_id, ready) {
                    Ok(room) => {
                        self.app_state
                            .hub()
                            .broadcast(room_id, ServerMsg::RoomUpdate { room });
                    }
                    Err(err) => Self::send_domain_error(ctx, &err),
                }
            }

            ClientMsg::StartGame => {
                let (Some(room_id), Some(player_id)) = (&self.room_id, &self.player_id) else {
                    return;
                };
                if let Err(err) = self.app_state.game_flow().start_game(room_id, player_id) {
                    Self::send_domain_error(ctx, &err);
                }
            }

            ClientMsg::PlayCard {
                action_card_id,
                tower_card_id,
            } => {
                let (Some(room_id), Some(player_id)) = (&self.room_id, &self.player_id) else {
                    return;
                };
                self.app_state
                    .game_flow()
                    .handle_play(room_id, player_id, &action_card_id, &tower_card_id);
            }

            ClientMsg::RequestState => {
                let Some(room_id) = &self.room_id else {
                    return;
                };
                if let Some(game_state) = self.app_state.game_flow().match_snapshot(room_id) {
                    Self::send_json(ctx, &ServerMsg::GameUpdate { game_state });
                } else if let Some(room) = self.app_state.rooms().snapshot(room_id) {
                    Self::send_json(ctx, &ServerMsg::RoomUpdate { room });
                }
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");
        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.leave_current_room();
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                match serde_json::from_str::<ClientMsg>(&text) {
                    Ok(cmd) => self.handle_client_msg(cmd, ctx),
                    Err(_) => Self::send_json(
                        ctx,
                        &ServerMsg::Error {
                            message: "Malformed JSON".to_string(),
                        },
                    ),
                }
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                Self::send_json(
                    ctx,
                    &ServerMsg::Error {
                        message: "Binary not supported".to_string(),
                    },
                );
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(conn_id = %self.conn_id, error = %err, "[WS SESSION] protocol error");
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}

impl Handler<SessionBroadcast> for WsSession {
    type Result = ();

    fn handle(&mut self, msg: SessionBroadcast, ctx: &mut Self::Context) -> Self::Result {
        Self::send_json(ctx, &msg.0);
    }
}

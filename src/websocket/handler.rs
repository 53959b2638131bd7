use actix::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use log::{info, warn};
use uuid::Uuid;

use crate::models::{ClientMessage, GameWebSocketMessage, ServerMessage};
use crate::state::{AppState, Outbox};

/// WebSocket handler for one player connection; the connection id doubles
/// as the player id
pub struct GameWebSocket {
    pub id: String,
    pub app_state: web::Data<AppState>,
}

impl Actor for GameWebSocket {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        // Register the actor with the application state
        self.app_state.register_connection(&self.id, ctx.address());
        let total = self.app_state.sessions.lock().unwrap().len();
        info!("WebSocket connection started: {}", self.id);
        info!("Total active connections: {}", total);
    }

    fn stopping(&mut self, ctx: &mut Self::Context) -> Running {
        // Give up our queue entry or session seat and tell anyone affected
        let out = self.app_state.disconnect(&self.id);
        self.deliver(out, ctx);
        info!("WebSocket connection closed: {}", self.id);
        Running::Stop
    }
}

impl Handler<GameWebSocketMessage> for GameWebSocket {
    type Result = ();

    fn handle(&mut self, msg: GameWebSocketMessage, ctx: &mut Self::Context) {
        ctx.text(msg.0);
    }
}

// WebSocket message handler
impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for GameWebSocket {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(msg)) => {
                ctx.pong(&msg);
            }
            Ok(ws::Message::Pong(_)) => {
                // Do nothing for pong messages
            }
            Ok(ws::Message::Text(text)) => {
                info!("Received text message: {}", text);
                match serde_json::from_str::<ClientMessage>(text.as_ref()) {
                    Ok(client_msg) => {
                        self.handle_message(client_msg, ctx);
                    }
                    Err(e) => {
                        warn!("Error parsing client message: {}", e);
                        self.deliver(
                            vec![(
                                self.id.clone(),
                                ServerMessage::error(format!("Invalid message format: {}", e)),
                            )],
                            ctx,
                        );
                    }
                }
            }
            Ok(ws::Message::Binary(_)) => {
                warn!("Binary messages are not supported");
                self.deliver(
                    vec![(
                        self.id.clone(),
                        ServerMessage::error("Binary messages are not supported"),
                    )],
                    ctx,
                );
            }
            Ok(ws::Message::Close(reason)) => {
                info!("Connection closed: {:?}", reason);
                ctx.close(reason);
                ctx.stop();
            }
            _ => {
                ctx.stop();
            }
        }
    }
}

impl GameWebSocket {
    fn handle_message(&mut self, msg: ClientMessage, ctx: &mut ws::WebsocketContext<Self>) {
        let out = match msg.action.as_str() {
            "createGame" => self.app_state.create_game(&self.id, msg.name),
            "joinGame" => self.app_state.join_game(&self.id, msg.game_id, msg.name),
            "joinQueue" => self.app_state.join_queue(&self.id, msg.name),
            "leaveQueue" => self.app_state.leave_queue(&self.id),
            "makeMove" => self.app_state.make_move(&self.id, msg.game_id, msg.position),
            other => {
                warn!("Unknown action: {}", other);
                vec![(
                    self.id.clone(),
                    ServerMessage::error(format!("Unknown action: {}", other)),
                )]
            }
        };
        self.deliver(out, ctx);
    }

    // Our own messages go straight onto this socket, the rest are
    // forwarded through the registered actor addresses.
    fn deliver(&self, out: Outbox, ctx: &mut ws::WebsocketContext<Self>) {
        let sessions = self.app_state.sessions.lock().unwrap();
        for (conn_id, message) in out {
            let text = match serde_json::to_string(&message) {
                Ok(t) => t,
                Err(e) => {
                    warn!("Error serializing message: {}", e);
                    continue;
                }
            };
            if conn_id == self.id {
                ctx.text(text);
            } else if let Some(addr) = sessions.get(&conn_id) {
                addr.do_send(GameWebSocketMessage(text));
            } else {
                warn!("Connection {} not found in sessions", conn_id);
            }
        }
    }
}

/// WebSocket connection handler
pub async fn ws_index(
    req: HttpRequest,
    stream: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let id = Uuid::new_v4().to_string();
    info!("New WebSocket connection: {}", id);

    let ws = GameWebSocket {
        id,
        app_state: app_state.clone(),
    };

    ws::start(ws, &req, stream)
}

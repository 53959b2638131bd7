use actix::Message;
use serde::{Deserialize, Serialize};

use crate::game::SessionSnapshot;

/// Message sent from client to server
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClientMessage {
    pub action: String,
    pub game_id: Option<String>,
    pub name: Option<String>,
    pub position: Option<i64>,
}

/// Message sent from server to client
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerMessage {
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<SessionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServerMessage {
    fn new(message_type: &str) -> Self {
        ServerMessage {
            message_type: message_type.to_string(),
            game_id: None,
            game: None,
            queue_size: None,
            error: None,
        }
    }

    pub fn game_created(snapshot: SessionSnapshot) -> Self {
        let mut msg = ServerMessage::new("gameCreated");
        msg.game_id = Some(snapshot.id.clone());
        msg.game = Some(snapshot);
        msg
    }

    pub fn game_found(game_id: &str) -> Self {
        let mut msg = ServerMessage::new("gameFound");
        msg.game_id = Some(game_id.to_string());
        msg
    }

    // Full resync after every accepted join or move
    pub fn game_update(snapshot: SessionSnapshot) -> Self {
        let mut msg = ServerMessage::new("gameUpdate");
        msg.game_id = Some(snapshot.id.clone());
        msg.game = Some(snapshot);
        msg
    }

    pub fn queue_size(depth: usize) -> Self {
        let mut msg = ServerMessage::new("queueSize");
        msg.queue_size = Some(depth);
        msg
    }

    pub fn error(text: impl Into<String>) -> Self {
        let mut msg = ServerMessage::new("error");
        msg.error = Some(text.into());
        msg
    }
}

/// Message type for WebSocket communication
#[derive(Message)]
#[rtype(result = "()")]
pub struct GameWebSocketMessage(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_message_tolerates_missing_fields() {
        let msg: ClientMessage = serde_json::from_str(r#"{"action":"leaveQueue"}"#).unwrap();
        assert_eq!(msg.action, "leaveQueue");
        assert!(msg.game_id.is_none());
        assert!(msg.name.is_none());
        assert!(msg.position.is_none());
    }

    #[test]
    fn unset_fields_are_left_off_the_wire() {
        let json = serde_json::to_value(ServerMessage::queue_size(3)).unwrap();
        assert_eq!(json["message_type"], "queueSize");
        assert_eq!(json["queue_size"], 3);
        assert!(json.get("error").is_none());
        assert!(json.get("game").is_none());
    }
}

use std::collections::HashMap;
use std::sync::Mutex;

use actix::Addr;
use log::info;

use crate::game::GameError;
use crate::matchmaking::MatchQueue;
use crate::models::ServerMessage;
use crate::registry::SessionRegistry;
use crate::websocket::GameWebSocket;

/// Where a connection currently lives. `Matched` covers the window between
/// pairing and the player's own join, keeping the name they queued with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Binding {
    Queued,
    Matched { game_id: String, name: String },
    InSession(String),
}

/// Messages addressed by connection id, delivered after every lock is released.
pub type Outbox = Vec<(String, ServerMessage)>;

/// Application state shared between connections.
// Lock order where more than one is held: bindings, queue, registry,
// connections. The sessions map is only ever taken on its own.
pub struct AppState {
    pub registry: SessionRegistry,
    pub queue: Mutex<MatchQueue>,
    pub bindings: Mutex<HashMap<String, Binding>>,
    /// game id -> connection ids bound to it
    pub connections: Mutex<HashMap<String, Vec<String>>>,
    /// connection id -> actor address, for push delivery
    pub sessions: Mutex<HashMap<String, Addr<GameWebSocket>>>,
}

impl AppState {
    pub fn new() -> Self {
        AppState {
            registry: SessionRegistry::new(),
            queue: Mutex::new(MatchQueue::new()),
            bindings: Mutex::new(HashMap::new()),
            connections: Mutex::new(HashMap::new()),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn register_connection(&self, conn_id: &str, addr: Addr<GameWebSocket>) {
        self.sessions
            .lock()
            .unwrap()
            .insert(conn_id.to_string(), addr);
    }

    /// Tear down everything a closed connection owned. The session itself
    /// is removed once its last connection is gone; a surviving opponent
    /// keeps the session as-is.
    pub fn disconnect(&self, conn_id: &str) -> Outbox {
        self.sessions.lock().unwrap().remove(conn_id);
        let binding = self.bindings.lock().unwrap().remove(conn_id);
        match binding {
            Some(Binding::Queued) => {
                let mut queue = self.queue.lock().unwrap();
                if queue.remove(conn_id).is_err() {
                    return Vec::new();
                }
                info!("Removed disconnected player {} from the queue", conn_id);
                let depth = queue.len();
                queue
                    .waiting_ids()
                    .into_iter()
                    .map(|id| (id, ServerMessage::queue_size(depth)))
                    .collect()
            }
            Some(Binding::InSession(game_id)) | Some(Binding::Matched { game_id, .. }) => {
                let mut connections = self.connections.lock().unwrap();
                if let Some(conn_list) = connections.get_mut(&game_id) {
                    conn_list.retain(|id| id != conn_id);
                    info!("Removed player {} from game {}'s connections", conn_id, game_id);
                    if conn_list.is_empty() {
                        info!("No more players in game {}. Cleaning up.", game_id);
                        connections.remove(&game_id);
                        self.registry.remove(&game_id);
                    }
                }
                Vec::new()
            }
            None => Vec::new(),
        }
    }

    pub fn create_game(&self, conn_id: &str, name: Option<String>) -> Outbox {
        self.respond(conn_id, self.try_create_game(conn_id, name))
    }

    pub fn join_game(
        &self,
        conn_id: &str,
        game_id: Option<String>,
        name: Option<String>,
    ) -> Outbox {
        self.respond(conn_id, self.try_join_game(conn_id, game_id, name))
    }

    pub fn join_queue(&self, conn_id: &str, name: Option<String>) -> Outbox {
        self.respond(conn_id, self.try_join_queue(conn_id, name))
    }

    pub fn leave_queue(&self, conn_id: &str) -> Outbox {
        self.respond(conn_id, self.try_leave_queue(conn_id))
    }

    pub fn make_move(
        &self,
        conn_id: &str,
        game_id: Option<String>,
        position: Option<i64>,
    ) -> Outbox {
        self.respond(conn_id, self.try_make_move(conn_id, game_id, position))
    }

    /// Errors go back to the requester only; nothing else hears about them.
    fn respond(&self, conn_id: &str, result: Result<Outbox, GameError>) -> Outbox {
        match result {
            Ok(out) => out,
            Err(e) => vec![(conn_id.to_string(), ServerMessage::error(e.to_string()))],
        }
    }

    fn try_create_game(&self, conn_id: &str, name: Option<String>) -> Result<Outbox, GameError> {
        let name = require_name(name)?;
        self.ensure_unbound(conn_id)?;

        let (game_id, session) = self.registry.create();
        let snapshot = {
            let mut session = session.lock().unwrap();
            session.join(conn_id, &name)?;
            session.snapshot()
        };
        self.bindings
            .lock()
            .unwrap()
            .insert(conn_id.to_string(), Binding::InSession(game_id.clone()));
        self.connections
            .lock()
            .unwrap()
            .insert(game_id.clone(), vec![conn_id.to_string()]);
        info!("Player {} created game {}", conn_id, game_id);

        Ok(vec![(
            conn_id.to_string(),
            ServerMessage::game_created(snapshot),
        )])
    }

    fn try_join_game(
        &self,
        conn_id: &str,
        game_id: Option<String>,
        name: Option<String>,
    ) -> Result<Outbox, GameError> {
        let game_id = game_id.ok_or(GameError::MissingGameId)?;
        // A matched player may join the game reserved for them, under the
        // name they queued with unless the join supplies a fresh one.
        let reserved = {
            let bindings = self.bindings.lock().unwrap();
            match bindings.get(conn_id) {
                Some(Binding::Queued) => return Err(GameError::AlreadyQueued),
                Some(Binding::InSession(_)) => return Err(GameError::AlreadyInGame),
                Some(Binding::Matched { game_id: matched, name }) if *matched == game_id => {
                    Some(name.clone())
                }
                Some(Binding::Matched { .. }) => return Err(GameError::AlreadyInGame),
                None => None,
            }
        };
        let name = name
            .filter(|n| !n.trim().is_empty())
            .or(reserved)
            .ok_or(GameError::EmptyName)?;

        let session = self
            .registry
            .get(&game_id)
            .ok_or(GameError::GameNotFound)?;
        let snapshot = {
            let mut session = session.lock().unwrap();
            session.join(conn_id, &name)?;
            session.snapshot()
        };
        self.bindings
            .lock()
            .unwrap()
            .insert(conn_id.to_string(), Binding::InSession(game_id.clone()));

        let recipients = {
            let mut connections = self.connections.lock().unwrap();
            let conn_list = connections.entry(game_id.clone()).or_default();
            if !conn_list.iter().any(|id| id == conn_id) {
                conn_list.push(conn_id.to_string());
            }
            conn_list.clone()
        };
        info!("Player {} joined game {}", conn_id, game_id);

        Ok(recipients
            .into_iter()
            .map(|id| (id, ServerMessage::game_update(snapshot.clone())))
            .collect())
    }

    fn try_join_queue(&self, conn_id: &str, name: Option<String>) -> Result<Outbox, GameError> {
        let name = require_name(name)?;

        let mut bindings = self.bindings.lock().unwrap();
        match bindings.get(conn_id) {
            Some(Binding::Queued) => return Err(GameError::AlreadyQueued),
            Some(Binding::InSession(_)) | Some(Binding::Matched { .. }) => {
                return Err(GameError::AlreadyInGame)
            }
            None => {}
        }
        let mut queue = self.queue.lock().unwrap();
        queue.enqueue(conn_id, &name)?;
        bindings.insert(conn_id.to_string(), Binding::Queued);
        info!("Player {} joined the queue (depth {})", conn_id, queue.len());

        let mut out = Outbox::new();
        let depth_ahead = queue.len() - 1;
        if let Some((first, second)) = queue.pop_pair() {
            // The arrival that triggered pairing is told how many players
            // were ahead of it before it learns about the match.
            out.push((
                conn_id.to_string(),
                ServerMessage::queue_size(depth_ahead),
            ));
            let (game_id, _session) = self.registry.create();
            // Both connections reference the session from this moment, so
            // the last-connection-gone cleanup fires even if a matched
            // player drops before issuing their join.
            self.connections.lock().unwrap().insert(
                game_id.clone(),
                vec![first.player_id.clone(), second.player_id.clone()],
            );
            bindings.insert(
                first.player_id.clone(),
                Binding::Matched {
                    game_id: game_id.clone(),
                    name: first.name.clone(),
                },
            );
            bindings.insert(
                second.player_id.clone(),
                Binding::Matched {
                    game_id: game_id.clone(),
                    name: second.name.clone(),
                },
            );
            info!(
                "Paired {} and {} into game {}",
                first.player_id, second.player_id, game_id
            );
            out.push((first.player_id, ServerMessage::game_found(&game_id)));
            out.push((second.player_id, ServerMessage::game_found(&game_id)));
        } else {
            let depth = queue.len();
            for id in queue.waiting_ids() {
                out.push((id, ServerMessage::queue_size(depth)));
            }
        }
        Ok(out)
    }

    fn try_leave_queue(&self, conn_id: &str) -> Result<Outbox, GameError> {
        let mut bindings = self.bindings.lock().unwrap();
        let mut queue = self.queue.lock().unwrap();
        queue.remove(conn_id)?;
        bindings.remove(conn_id);
        info!("Player {} left the queue (depth {})", conn_id, queue.len());

        let depth = queue.len();
        Ok(queue
            .waiting_ids()
            .into_iter()
            .map(|id| (id, ServerMessage::queue_size(depth)))
            .collect())
    }

    fn try_make_move(
        &self,
        conn_id: &str,
        game_id: Option<String>,
        position: Option<i64>,
    ) -> Result<Outbox, GameError> {
        let game_id = game_id.ok_or(GameError::MissingGameId)?;
        let position = position.ok_or(GameError::InvalidPosition)?;

        let session = self
            .registry
            .get(&game_id)
            .ok_or(GameError::GameNotFound)?;
        let snapshot = {
            let mut session = session.lock().unwrap();
            session.apply_move(conn_id, position)?;
            session.snapshot()
        };
        info!("Player {} moved at {} in game {}", conn_id, position, game_id);

        let recipients = self
            .connections
            .lock()
            .unwrap()
            .get(&game_id)
            .cloned()
            .unwrap_or_default();
        Ok(recipients
            .into_iter()
            .map(|id| (id, ServerMessage::game_update(snapshot.clone())))
            .collect())
    }

    fn ensure_unbound(&self, conn_id: &str) -> Result<(), GameError> {
        match self.bindings.lock().unwrap().get(conn_id) {
            Some(Binding::Queued) => Err(GameError::AlreadyQueued),
            Some(Binding::InSession(_)) | Some(Binding::Matched { .. }) => {
                Err(GameError::AlreadyInGame)
            }
            None => Ok(()),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

fn require_name(name: Option<String>) -> Result<String, GameError> {
    match name {
        Some(n) if !n.trim().is_empty() => Ok(n),
        _ => Err(GameError::EmptyName),
    }
}
